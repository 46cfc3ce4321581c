//! Sample-ticket corpus and startup classification cache
//!
//! The demo corpus is classified once at startup and served from memory for
//! the lifetime of the process. There is no invalidation: the corpus is
//! static data, and re-classifying requires a restart.

use std::path::Path;

use tracing::{info, warn};

use crate::classifier::TicketClassifier;
use crate::errors::Result;
use crate::types::{ClassifiedTicket, Ticket};

/// Load the sample corpus. A missing file yields an empty corpus rather
/// than an error, so the service still starts with no demo data.
pub fn load_sample_tickets(path: &Path) -> Result<Vec<Ticket>> {
    if !path.exists() {
        warn!(path = %path.display(), "sample ticket corpus not found, starting empty");
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path)?;
    let tickets: Vec<Ticket> = serde_json::from_str(&contents)?;
    Ok(tickets)
}

/// Classify every corpus ticket once, producing the cached listing served
/// by `GET /api/tickets`.
pub async fn classify_corpus(
    classifier: &TicketClassifier,
    tickets: Vec<Ticket>,
) -> Vec<ClassifiedTicket> {
    let mut classified = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        let classification = classifier.classify(&ticket.full_text()).await;
        classified.push(ClassifiedTicket {
            ticket,
            classification,
        });
    }
    info!(count = classified.len(), "sample tickets classified");
    classified
}
