//! helpdesk-triage - service entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use helpdesk_triage::classifier::TicketClassifier;
use helpdesk_triage::config::Config;
use helpdesk_triage::embedding::EmbeddingEngine;
use helpdesk_triage::models::{ChatModel, OllamaChatClient};
use helpdesk_triage::orchestrator::TriageOrchestrator;
use helpdesk_triage::rag::{AnswerComposer, QdrantStoreFactory, Retriever};
use helpdesk_triage::server::{self, AppState};
use helpdesk_triage::tickets;

/// LLM-powered support-ticket triage with retrieval-grounded answers
#[derive(Parser, Debug)]
#[command(name = "helpdesk-triage", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long)]
    bind: Option<String>,

    /// Ollama base URL
    #[arg(long)]
    ollama_url: Option<String>,

    /// Chat model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Qdrant base URL
    #[arg(long)]
    qdrant_url: Option<String>,

    /// Sample ticket corpus path
    #[arg(long)]
    tickets: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(url) = args.ollama_url {
        config.ollama.url = url;
    }
    if let Some(model) = args.model {
        config.ollama.chat_model = model;
    }
    if let Some(url) = args.qdrant_url {
        config.qdrant.url = url;
    }
    if let Some(path) = args.tickets {
        config.server.tickets_path = path;
    }

    info!(
        model = %config.ollama.chat_model,
        ollama = %config.ollama.url,
        qdrant = %config.qdrant.url,
        "starting helpdesk-triage"
    );

    let chat: Arc<dyn ChatModel> =
        Arc::new(OllamaChatClient::with_config(&config.ollama.url, &config.ollama.chat_model)?);

    info!("loading embedding model (downloads on first run)");
    let embedder = Arc::new(
        tokio::task::spawn_blocking(EmbeddingEngine::new)
            .await
            .context("embedding engine task panicked")??,
    );

    let factory = Arc::new(QdrantStoreFactory::new(
        &config.qdrant.url,
        embedder,
        config.qdrant.docs_collection.clone(),
        config.qdrant.dev_collection.clone(),
    )?);
    let retriever = Arc::new(Retriever::new(factory));

    let classifier = TicketClassifier::new(chat.clone());
    let composer = AnswerComposer::new(retriever, chat);
    let orchestrator = TriageOrchestrator::new(classifier.clone(), composer);

    let corpus = tickets::load_sample_tickets(&config.server.tickets_path)?;
    info!(count = corpus.len(), "classifying sample tickets");
    let classified = tickets::classify_corpus(&classifier, corpus).await;

    let state = Arc::new(AppState::new(orchestrator, classified));
    server::serve(&config.server.bind, state).await?;

    Ok(())
}
