//! Core data types shared across the pipeline

pub mod labels;
pub mod ticket;

pub use labels::{Classification, Priority, Sentiment, Topic};
pub use ticket::{ClassifiedTicket, Ticket};
