#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use ragsnip_core::types::Vector;
use ragsnip_retrieval::Embedder;

pub const VOCAB: &[&str] = &["cat", "dog", "bird", "alpha", "beta", "gamma", "rust", "sea"];

/// One dimension per vocabulary word; a text lights up the words it contains.
/// Texts without vocabulary words embed to the zero vector (cosine 0).
#[derive(Default)]
pub struct KeywordEmbedder {
    pub batch_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn calls(&self) -> usize { self.batch_calls.load(Ordering::SeqCst) }

    pub fn vector(text: &str) -> Vector {
        let lower = text.to_lowercase();
        VOCAB.iter().map(|w| if lower.contains(w) { 1.0 } else { 0.0 }).collect()
    }
}

impl Embedder for KeywordEmbedder {
    fn dim(&self) -> usize { VOCAB.len() }

    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vector>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn dim(&self) -> usize { 4 }
    fn encode_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vector>> { anyhow::bail!("backend offline") }
}

/// Drops the last vector of every batch.
pub struct ShortEmbedder;

impl Embedder for ShortEmbedder {
    fn dim(&self) -> usize { VOCAB.len() }
    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vector>> {
        let mut out: Vec<Vector> = texts.iter().map(|t| KeywordEmbedder::vector(t)).collect();
        if texts.len() > 1 { out.pop(); }
        Ok(out)
    }
}
