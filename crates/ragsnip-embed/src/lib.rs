//! ragsnip-embed
//!
//! Default embedding backends behind `ragsnip_core::Embedder`: a candle BERT
//! sentence encoder (MiniLM family) and a model-free hashing embedder for
//! tests and offline use.

use anyhow::{Result, anyhow, Context};
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{Device, DType};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use ragsnip_core::config::{EmbeddingSettings, expand_path};
use ragsnip_core::types::Vector;
use ragsnip_core::Embedder;

pub mod device;
pub mod hash;
pub mod pool;
pub mod tokenize;

pub use hash::HashEmbedder;
pub use pool::masked_mean_l2;

const BATCH_SIZE: usize = 32;

pub struct BertEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, dim: usize, max_len: usize }

impl BertEmbedder {
    pub fn new(settings: &EmbeddingSettings) -> Result<Self> {
        let model_dir = resolve_model_dir(settings)?;
        Self::load(&model_dir, settings.max_len)
    }

    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = device::select_device();
        info!(model_dir = %model_dir.display(), "loading sentence encoder");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?)?;
        let vb = load_weights(model_dir, &device)?;
        let model = BertModel::load(vb, &config)?;
        info!(dim = config.hidden_size, "sentence encoder loaded");
        Ok(Self { model, tokenizer, device, dim: config.hidden_size, max_len })
    }

    fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let batch = tokenize::tokenize_batch(&self.tokenizer, texts, self.max_len, &self.device)?;
        let hidden = self.model.forward(&batch.input_ids, &batch.token_type_ids, Some(&batch.attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &batch.attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_dtype(DType::F32)?.to_vec2()?)
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let start = Instant::now();
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) { out.extend(self.embed_chunk(chunk)?); }
        debug!(texts = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "encoded batch");
        Ok(out)
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        let bytes = std::fs::read(&safetensors).with_context(|| format!("reading {}", safetensors.display()))?;
        return Ok(VarBuilder::from_buffered_safetensors(bytes, DType::F32, device)?);
    }
    let weights_path = model_dir.join("pytorch_model.bin");
    let weights = candle_core::pickle::read_all(&weights_path).with_context(|| format!("reading {}", weights_path.display()))?;
    let weights_map: std::collections::HashMap<String, candle_core::Tensor> = weights.into_iter().collect();
    Ok(VarBuilder::from_tensors(weights_map, DType::F32, device))
}

fn use_fake_from_env() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Build the default embedder for `settings`.
///
/// Returns the hashing embedder when `use_fake` is set (or
/// `APP_USE_FAKE_EMBEDDINGS=1`), otherwise loads the BERT encoder. Any failure
/// to construct a backend surfaces as `Error::MissingDependency`.
pub fn default_embedder(settings: &EmbeddingSettings) -> ragsnip_core::Result<Box<dyn Embedder>> {
    if settings.use_fake || use_fake_from_env() {
        info!(dim = settings.fake_dim, "using hash embedder");
        return Ok(Box::new(HashEmbedder::new(settings.fake_dim)));
    }
    match BertEmbedder::new(settings) {
        Ok(model) => Ok(Box::new(model)),
        Err(e) => {
            warn!(error = %e, model = %settings.model, "default embedder unavailable");
            Err(ragsnip_core::Error::missing_embedder(format!("{:#}", e)))
        }
    }
}

/// Locate the model directory: explicit setting, then `APP_MODEL_DIR`,
/// `MODEL_DIR`, then `models/<model>` relative to the working directory or
/// its parent.
pub fn resolve_model_dir(settings: &EmbeddingSettings) -> Result<PathBuf> {
    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    if let Some(dir) = &settings.model_dir { candidates.push(("embedding.model_dir".into(), expand_path(dir))); }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) { candidates.push((var.into(), expand_path(dir))); }
    }
    candidates.push(("models/".into(), Path::new("models").join(&settings.model)));
    candidates.push(("../models/".into(), Path::new("../models").join(&settings.model)));
    for (origin, path) in candidates {
        if path.is_dir() { debug!(%origin, path = %path.display(), "using model dir"); return Ok(path); }
    }
    Err(anyhow!("Could not locate a model directory for '{}'", settings.model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Tensor;
    use std::collections::HashMap;

    #[test]
    fn safetensors_weights_load_from_memory() {
        let tmp = tempfile::tempdir().unwrap();
        let device = Device::Cpu;
        let w = Tensor::new(&[[1f32, 2.], [3., 4.]], &device).unwrap();
        candle_core::safetensors::save(&HashMap::from([("w".to_string(), w)]), tmp.path().join("model.safetensors")).unwrap();

        let vb = load_weights(tmp.path(), &device).expect("weights");
        let loaded = vb.get((2, 2), "w").unwrap();
        assert_eq!(loaded.to_vec2::<f32>().unwrap(), vec![vec![1., 2.], vec![3., 4.]]);
    }

    #[test]
    fn missing_weights_are_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_weights(tmp.path(), &Device::Cpu).is_err());
    }
}
