//! Context rendering
//!
//! Renders the whole corpus as the grounding text sent to the LLM. Every
//! message is included on every call, so the context grows linearly with the
//! corpus; there is no cap or summarization step.

use crate::models::Message;
use tracing::info;

/// Render `messages` as newline-joined `member: message` lines, in order.
pub fn build_context(messages: &[Message]) -> String {
    let mut context = String::with_capacity(
        messages
            .iter()
            .map(|m| m.member.len() + m.message.len() + 3)
            .sum(),
    );

    for (i, msg) in messages.iter().enumerate() {
        if i > 0 {
            context.push('\n');
        }
        context.push_str(&msg.member);
        context.push_str(": ");
        context.push_str(&msg.message);
    }

    info!("Passing {} messages as context to the LLM", messages.len());
    context
}
