//! Query embedding engine

pub mod engine;

pub use engine::EmbeddingEngine;
