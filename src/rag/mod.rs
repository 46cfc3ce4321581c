// Retrieval-augmented answering: semantic retrieval over the two document
// collections plus grounded answer composition.

pub mod composer;
pub mod retriever;
pub mod store;

pub use composer::{AnswerComposer, AnswerResult};
pub use retriever::{Collection, DocumentChunk, Retriever};
pub use store::QdrantStoreFactory;
