//! Triage pipeline: classify, then answer or route
//!
//! The single routing decision point. Topics answerable from documentation
//! go through the answer composer; the rest get a fixed routing message
//! with no retrieval or generation call.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::TicketClassifier;
use crate::errors::Result;
use crate::rag::composer::AnswerComposer;
use crate::types::labels::Classification;

/// The pipeline's result for one ticket or question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub analysis: Classification,
    pub response: String,
    pub sources: Vec<String>,
}

/// End-to-end triage pipeline
pub struct TriageOrchestrator {
    classifier: TicketClassifier,
    composer: AnswerComposer,
}

impl TriageOrchestrator {
    pub fn new(classifier: TicketClassifier, composer: AnswerComposer) -> Self {
        Self {
            classifier,
            composer,
        }
    }

    /// Triage one piece of ticket text.
    ///
    /// Classification never fails (the classifier absorbs its own errors);
    /// retrieval-infrastructure and generation errors propagate.
    pub async fn handle(&self, text: &str) -> Result<TriageOutcome> {
        let analysis = self.classifier.classify(text).await;
        info!(
            topic = %analysis.topic,
            sentiment = %analysis.sentiment,
            priority = %analysis.priority,
            "ticket classified"
        );

        if analysis.topic.answerable_from_docs() {
            let answer = self.composer.compose(text, analysis.topic).await?;
            Ok(TriageOutcome {
                analysis,
                response: answer.answer_text,
                sources: answer.source_urls,
            })
        } else {
            Ok(TriageOutcome {
                analysis,
                response: routing_message(&analysis),
                sources: Vec::new(),
            })
        }
    }
}

fn routing_message(analysis: &Classification) -> String {
    format!(
        "This ticket has been classified as a '{}' issue and routed to the appropriate team.",
        analysis.topic
    )
}
