//! Support ticket types.

use serde::{Deserialize, Serialize};

use crate::types::labels::Classification;

/// A raw customer support message, as found in the sample corpus or
/// submitted over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub subject: String,
    pub body: String,
}

impl Ticket {
    /// The text the classifier sees: subject and body concatenated.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.subject, self.body)
    }
}

/// A ticket paired with the labels assigned to it. Serializes flat, so the
/// ticket-listing endpoint returns one object per ticket with all six keys
/// at the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedTicket {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(flatten)]
    pub classification: Classification,
}
