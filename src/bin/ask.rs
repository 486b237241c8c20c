use aurora_chat_analyst::{config::Config, AnswerService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        eprintln!("usage: ask <question>");
        std::process::exit(2);
    }

    let config = Config::from_env()?;
    let service = AnswerService::bootstrap(&config).await?;

    match service.answer(&question).await {
        Ok(answer) => {
            println!("{}", answer);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to answer: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
