//! helpdesk-triage - LLM-powered support-ticket triage
//!
//! Incoming ticket text is classified into a fixed (topic, sentiment,
//! priority) vocabulary; topics answerable from documentation are routed
//! through retrieval-augmented answer generation with source citations,
//! everything else gets a fixed routing message.
//!
//! # Architecture
//!
//! - **classifier**: constrained-prompt classification with safe fallback
//! - **rag**: memoized retrieval over two document collections + grounded
//!   answer composition
//! - **orchestrator**: the single answer-or-route decision point
//! - **server**: thin axum surface over the pipeline

pub mod errors;
pub mod types;

// Re-export commonly used types
pub use errors::{Result, TriageError};

// External collaborators: chat provider, query embeddings
pub mod embedding;
pub mod models;

// The pipeline
pub mod classifier;
pub mod orchestrator;
pub mod rag;

// Demo corpus, configuration, transport
pub mod config;
pub mod server;
pub mod tickets;
