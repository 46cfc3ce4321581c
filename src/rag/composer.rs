//! Grounded answer generation
//!
//! Retrieves top-k chunks from the collection the topic routes to, then
//! asks the model to answer strictly from those snippets with bracketed
//! numeric citations. With nothing retrieved there is no grounding, so no
//! generation call is made at all.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{Result, TriageError};
use crate::models::{ChatMessage, ChatModel};
use crate::rag::retriever::{Collection, DocumentChunk, Retriever};
use crate::types::labels::Topic;

/// Chunks retrieved per query
const TOP_K: usize = 3;

/// Per-chunk snippet cap, in characters, to bound prompt size
const SNIPPET_MAX_CHARS: usize = 800;

/// Reply used when retrieval comes back empty
pub const NO_INFORMATION_REPLY: &str = "I don't have enough information at the moment.";

const GROUNDING_INSTRUCTION: &str = "Use the following documentation snippets to answer the \
     user question. Answer only from the snippets. Cite sources with markdown footnotes \
     (e.g., [1], [2]) and include links to the sources. If the answer is not in the \
     snippets, say you don't know.";

/// A grounded answer with the source URLs of the chunks that fed it,
/// in retrieval rank order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer_text: String,
    pub source_urls: Vec<String>,
}

/// Which collection a topic's questions are answered from
pub fn collection_for_topic(topic: Topic) -> Collection {
    match topic {
        Topic::Product | Topic::HowTo | Topic::BestPractices | Topic::Sso => Collection::Docs,
        Topic::ApiSdk
        | Topic::Connector
        | Topic::Lineage
        | Topic::Glossary
        | Topic::SensitiveData => Collection::Dev,
    }
}

/// Retrieval-grounded answer composer
pub struct AnswerComposer {
    retriever: Arc<Retriever>,
    chat: Arc<dyn ChatModel>,
}

impl AnswerComposer {
    pub fn new(retriever: Arc<Retriever>, chat: Arc<dyn ChatModel>) -> Self {
        Self { retriever, chat }
    }

    /// Compose a grounded answer for the query under the given topic.
    ///
    /// Retrieval errors and generation failures propagate; an empty
    /// retrieval is a normal outcome and short-circuits to the fixed
    /// "insufficient information" reply.
    pub async fn compose(&self, query: &str, topic: Topic) -> Result<AnswerResult> {
        let collection = collection_for_topic(topic);
        let chunks = self.retriever.search(query, collection, TOP_K).await?;

        if chunks.is_empty() {
            debug!(topic = %topic, collection = %collection, "no chunks retrieved");
            return Ok(AnswerResult {
                answer_text: NO_INFORMATION_REPLY.to_string(),
                source_urls: Vec::new(),
            });
        }

        let messages = [
            ChatMessage::system(GROUNDING_INSTRUCTION),
            ChatMessage::user(grounding_prompt(query, &chunks)),
        ];
        let answer_text = self
            .chat
            .chat(&messages, 0.0)
            .await
            .map_err(|e| TriageError::Generation(e.to_string()))?;

        let source_urls = chunks
            .iter()
            .filter_map(|c| c.source_url.clone())
            .collect();

        Ok(AnswerResult {
            answer_text,
            source_urls,
        })
    }
}

/// Format the user message: URL-annotated, length-bounded snippets followed
/// by the question.
fn grounding_prompt(query: &str, chunks: &[DocumentChunk]) -> String {
    let snippets = chunks
        .iter()
        .map(snippet)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Snippets:\n{snippets}\n\nQuestion: {query}\nAnswer:")
}

fn snippet(chunk: &DocumentChunk) -> String {
    let url = chunk.source_url.as_deref().unwrap_or("");
    let text = truncate_chars(chunk.text.trim(), SNIPPET_MAX_CHARS);
    format!("[{url}]\n{text}")
}

/// Truncate to a character count without splitting a code point
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::rag::retriever::{StoreFactory, VectorStore};

    struct StubStore {
        chunks: Vec<DocumentChunk>,
    }

    #[async_trait]
    impl VectorStore for StubStore {
        async fn similarity_search(&self, _query: &str, k: usize) -> Result<Vec<DocumentChunk>> {
            Ok(self.chunks.iter().take(k).cloned().collect())
        }
    }

    struct StubFactory {
        chunks: Vec<DocumentChunk>,
    }

    #[async_trait]
    impl StoreFactory for StubFactory {
        async fn open(&self, _collection: Collection) -> Result<Arc<dyn VectorStore>> {
            Ok(Arc::new(StubStore {
                chunks: self.chunks.clone(),
            }))
        }
    }

    struct RecordingChat {
        reply: String,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl RecordingChat {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatModel for RecordingChat {
        async fn chat(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = messages.last().map(|m| m.content.clone());
            Ok(self.reply.clone())
        }
    }

    fn chunk(text: &str, url: Option<&str>) -> DocumentChunk {
        DocumentChunk {
            text: text.to_string(),
            source_url: url.map(String::from),
        }
    }

    fn composer(
        chunks: Vec<DocumentChunk>,
        chat: Arc<RecordingChat>,
    ) -> AnswerComposer {
        let retriever = Arc::new(Retriever::new(Arc::new(StubFactory { chunks })));
        AnswerComposer::new(retriever, chat)
    }

    #[test]
    fn test_routing_table() {
        assert_eq!(collection_for_topic(Topic::Product), Collection::Docs);
        assert_eq!(collection_for_topic(Topic::HowTo), Collection::Docs);
        assert_eq!(collection_for_topic(Topic::BestPractices), Collection::Docs);
        assert_eq!(collection_for_topic(Topic::Sso), Collection::Docs);
        assert_eq!(collection_for_topic(Topic::ApiSdk), Collection::Dev);
    }

    #[tokio::test]
    async fn test_empty_retrieval_short_circuits() {
        let chat = Arc::new(RecordingChat::replying("should never be used"));
        let composer = composer(Vec::new(), chat.clone());

        let result = composer.compose("How do I set up SSO?", Topic::Sso).await.unwrap();
        assert_eq!(result.answer_text, NO_INFORMATION_REPLY);
        assert!(result.source_urls.is_empty());
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sources_preserve_rank_and_skip_missing_urls() {
        let chat = Arc::new(RecordingChat::replying("Grounded answer [1]"));
        let composer = composer(
            vec![
                chunk("first", Some("https://docs.example.com/a")),
                chunk("second", None),
                chunk("third", Some("https://docs.example.com/c")),
            ],
            chat.clone(),
        );

        let result = composer.compose("question", Topic::Product).await.unwrap();
        assert_eq!(result.answer_text, "Grounded answer [1]");
        assert_eq!(
            result.source_urls,
            vec![
                "https://docs.example.com/a".to_string(),
                "https://docs.example.com/c".to_string(),
            ]
        );
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prompt_contains_snippets_and_question() {
        let chat = Arc::new(RecordingChat::replying("ok"));
        let composer = composer(
            vec![chunk("Okta SAML setup steps", Some("https://docs.example.com/sso"))],
            chat.clone(),
        );

        composer.compose("How do I set up SSO with Okta?", Topic::Sso).await.unwrap();

        let prompt = chat.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Okta SAML setup steps"));
        assert!(prompt.contains("[https://docs.example.com/sso]"));
        assert!(prompt.contains("Question: How do I set up SSO with Okta?"));
    }

    #[tokio::test]
    async fn test_snippets_are_truncated() {
        let long_text = "x".repeat(2000);
        let chat = Arc::new(RecordingChat::replying("ok"));
        let composer = composer(vec![chunk(&long_text, None)], chat.clone());

        composer.compose("q", Topic::Product).await.unwrap();

        let prompt = chat.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains(&"x".repeat(SNIPPET_MAX_CHARS)));
        assert!(!prompt.contains(&"x".repeat(SNIPPET_MAX_CHARS + 1)));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(900);
        let truncated = truncate_chars(&text, SNIPPET_MAX_CHARS);
        assert_eq!(truncated.chars().count(), SNIPPET_MAX_CHARS);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        struct FailingChat;

        #[async_trait]
        impl ChatModel for FailingChat {
            async fn chat(&self, _messages: &[ChatMessage], _temperature: f32) -> Result<String> {
                Err(TriageError::Provider("HTTP 500".to_string()))
            }
        }

        let retriever = Arc::new(Retriever::new(Arc::new(StubFactory {
            chunks: vec![chunk("content", Some("https://a"))],
        })));
        let composer = AnswerComposer::new(retriever, Arc::new(FailingChat));

        let err = composer.compose("q", Topic::Product).await.unwrap_err();
        assert!(matches!(err, TriageError::Generation(_)));
    }
}
