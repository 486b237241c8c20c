//! Question answering over the cached corpus
//!
//! Every question is answered from the full corpus: the rendered context is
//! embedded in the system instruction and the LLM is asked for a one-sentence
//! answer. Failed calls are retried with exponential backoff.

use crate::cache::MessageCache;
use crate::config::Config;
use crate::corpus::{load_or_fetch, Corpus};
use crate::error::AnalystError;
use crate::fetcher::{HttpMessageSource, PaginationConfig};
use crate::gemini::{GeminiClient, LanguageModel};
use crate::retry::{retry, RetryError, RetryPolicy};
use crate::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const MISSING_API_KEY: &str =
    "Gemini API key is missing. Please set the GEMINI_API_KEY environment variable.";
pub const NO_MESSAGE_DATA: &str =
    "Message data is not available. Please check the data fetching process.";
pub const NOT_IN_CONTEXT: &str =
    "The information is not available in the current message context.";
pub const NO_TEXT: &str = "Error: LLM returned no text.";
pub const NO_RESPONSE: &str = "Failed to get response from AI.";

/// Build the analyst persona with the rendered context appended.
pub fn build_system_instruction(context: &str) -> String {
    format!(
        "You are Aurora AI, a corporate chat analyst. Your job is to analyze the provided \
         corporate chat messages and answer the user's question directly and concisely. \
         The answer MUST be derived ONLY from the context provided. \
         If the answer cannot be found, you must respond with: '{}'\n\n\
         Messages Context:\n{}",
        NOT_IN_CONTEXT, context
    )
}

pub fn build_user_prompt(question: &str) -> String {
    format!(
        "Question: {}\n\nAnswer in 1 short, professional sentence. \
         Use real names found in the context.",
        question
    )
}

pub struct AnswerService {
    corpus: Arc<Corpus>,
    model: Arc<dyn LanguageModel>,
    retry_policy: RetryPolicy,
}

impl AnswerService {
    pub fn new(corpus: Arc<Corpus>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            corpus,
            model,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Load or fetch the corpus and wire up the Gemini client from `config`.
    pub async fn bootstrap(config: &Config) -> Result<Self> {
        let cache = MessageCache::new(&config.cache_file);
        let source = HttpMessageSource::new(&config.messages_api_url)?;
        let corpus = load_or_fetch(&cache, &source, &PaginationConfig::default()).await;

        if config.gemini_api_key.is_empty() {
            warn!("GEMINI_API_KEY not set; questions will not be forwarded to the LLM");
        }
        let model = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.api_base_url.clone(),
            config.model.clone(),
        )?;

        Ok(Self::new(Arc::new(corpus), Arc::new(model)))
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn api_key_set(&self) -> bool {
        self.model.is_configured()
    }

    /// Answer `question` from the corpus.
    ///
    /// Missing credentials and an empty corpus yield diagnostic answers rather
    /// than errors. An error is returned only once every attempt has failed.
    pub async fn answer(&self, question: &str) -> Result<String> {
        if !self.model.is_configured() {
            return Ok(MISSING_API_KEY.to_string());
        }
        if self.corpus.is_empty() {
            return Ok(NO_MESSAGE_DATA.to_string());
        }

        let system_instruction = build_system_instruction(&self.corpus.context());
        let prompt = build_user_prompt(question);

        let outcome = retry(&self.retry_policy, |attempt| {
            let system_instruction = &system_instruction;
            let prompt = &prompt;
            async move {
                info!("LLM attempt {}", attempt + 1);
                self.model.generate(system_instruction, prompt).await
            }
        })
        .await;

        match outcome {
            Ok(text) => Ok(text.unwrap_or_else(|| NO_TEXT.to_string())),
            Err(RetryError::Exhausted { attempts, last }) => {
                error!("LLM call failed after {} attempts: {}", attempts, last);
                Err(match last {
                    AnalystError::UpstreamStatus { .. } => AnalystError::Upstream {
                        attempts,
                        detail: last.to_string(),
                    },
                    other => AnalystError::LlmConnection(other.to_string()),
                })
            }
            Err(RetryError::NotAttempted) => Ok(NO_RESPONSE.to_string()),
        }
    }
}
