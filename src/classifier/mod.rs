//! Constrained-prompt ticket classification
//!
//! One chat call at temperature zero, parsed as strict JSON. Any malformed
//! reply or provider error is absorbed into the fixed fallback triple, so
//! `classify` is total and never surfaces an error to the caller.

use std::sync::Arc;

use tracing::warn;

use crate::errors::Result;
use crate::models::{ChatMessage, ChatModel};
use crate::types::labels::{Classification, Priority, Sentiment, Topic};

/// Ticket classifier backed by a chat model
#[derive(Clone)]
pub struct TicketClassifier {
    chat: Arc<dyn ChatModel>,
    system_prompt: String,
}

impl TicketClassifier {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self {
            chat,
            system_prompt: system_prompt(),
        }
    }

    /// Classify free ticket text into the fixed label vocabulary.
    ///
    /// Total: classification failure is invisible to the caller and yields
    /// `Classification::fallback()` instead. No retries.
    pub async fn classify(&self, text: &str) -> Classification {
        match self.request_labels(text).await {
            Ok(classification) => classification,
            Err(e) => {
                warn!(error = %e, "classification failed, using fallback labels");
                Classification::fallback()
            }
        }
    }

    async fn request_labels(&self, text: &str) -> Result<Classification> {
        let messages = [
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(text),
        ];
        let reply = self.chat.chat(&messages, 0.0).await?;
        let classification: Classification = serde_json::from_str(reply.trim())?;
        Ok(classification)
    }

    /// The instruction sent with every classification call
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

/// Render the classification instruction from the label enums, so the
/// allowed-value lists in the prompt are the same ones the parser accepts.
fn system_prompt() -> String {
    let topics = Topic::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let sentiments = Sentiment::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let priorities = Priority::ALL
        .iter()
        .map(|p| format!("{} ({})", p.as_str(), p.label()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an expert support-ticket classifier for a data-catalog product. \
         Given a customer message, output strict JSON with the following keys: \
         topic, sentiment, priority.\n\n\
         Allowed topic values: {topics}.\n\
         Allowed sentiment values: {sentiments}.\n\
         Allowed priority values: {priorities}.\n\
         Rules:\n\
         - Only output JSON, no extra text.\n\
         - If urgency words like 'urgent', 'blocking', 'ASAP' appear, set priority to P0.\n\
         - If the user complains loudly (e.g., 'infuriating', 'not working'), set sentiment to Angry.\n\
         - How-to / Product questions are usually P2 unless urgent.\n"
    )
}
