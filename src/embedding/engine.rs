// Query embeddings via nomic-embed-text, the same scheme the ingestion job
// uses when building the document collections.
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;

const MODEL_ID: &str = "nomic-ai/nomic-embed-text-v1.5";
const EMBEDDING_DIM: usize = 768;

/// BERT-based embedding engine. Construction downloads the model from the
/// HuggingFace Hub on first use; embedding itself is CPU-bound and
/// lock-free, so one engine is shared across all collections.
pub struct EmbeddingEngine {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl EmbeddingEngine {
    /// Load the model and tokenizer (downloads on first use)
    pub fn new() -> Result<Self> {
        let device = Device::Cpu;

        let api = Api::new().context("failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(MODEL_ID.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .context("failed to download model config")?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .context("failed to download tokenizer")?;
        let weights_path = repo
            .get("model.safetensors")
            .context("failed to download model weights")?;

        let config: Config = serde_json::from_str(
            &std::fs::read_to_string(config_path).context("failed to read model config")?,
        )
        .context("failed to parse model config")?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {}", e))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("failed to load model weights")?
        };
        let model = BertModel::load(vb, &config).context("failed to load BERT model")?;

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Embed a single query string into a unit-length vector
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {}", e))?;

        let ids = encoding.get_ids().to_vec();
        let mask = encoding.get_attention_mask().to_vec();
        let len = ids.len();

        let token_ids = Tensor::from_vec(ids, (1, len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask, (1, len), &self.device)?;

        let hidden = self.model.forward(&token_ids, &attention_mask, None)?;
        let pooled = mean_pool(&hidden, &attention_mask)?;
        let normalized = l2_normalize(&pooled)?;

        let mut rows = normalized.to_vec2::<f32>()?;
        Ok(rows.pop().unwrap_or_default())
    }

    /// Embedding dimension of the loaded model
    pub fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Mean pooling over the sequence dimension, weighted by the attention mask
fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let mask = attention_mask
        .unsqueeze(2)?
        .expand(hidden.shape())?
        .to_dtype(hidden.dtype())?;

    let summed = (hidden * &mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;

    Ok(summed.broadcast_div(&counts)?)
}

/// Scale each row to unit length, matching the cosine metric the
/// collections are indexed under
fn l2_normalize(embeddings: &Tensor) -> Result<Tensor> {
    let norms = embeddings.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f64::MAX)?;
    Ok(embeddings.broadcast_div(&norms)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires model download
    fn test_embedding_dimension() {
        let engine = EmbeddingEngine::new().expect("failed to create engine");
        let embedding = engine.embed("How do I set up SSO?").expect("failed to embed");
        assert_eq!(embedding.len(), engine.dimension());
    }

    #[test]
    #[ignore] // Requires model download
    fn test_embedding_is_normalized() {
        let engine = EmbeddingEngine::new().expect("failed to create engine");
        let embedding = engine.embed("connector crawl failure").expect("failed to embed");
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }
}
