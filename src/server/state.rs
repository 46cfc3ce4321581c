//! Shared application state

use crate::orchestrator::TriageOrchestrator;
use crate::types::ClassifiedTicket;

/// State shared across request handlers. The orchestrator is safe to call
/// concurrently; the ticket cache is read-only after startup.
pub struct AppState {
    pub orchestrator: TriageOrchestrator,
    pub tickets: Vec<ClassifiedTicket>,
}

impl AppState {
    pub fn new(orchestrator: TriageOrchestrator, tickets: Vec<ClassifiedTicket>) -> Self {
        Self {
            orchestrator,
            tickets,
        }
    }
}
