use crate::similarity::cosine_scores;
use crate::types::Vector;

/// Text embedding capability consumed by the retrieval engine.
///
/// Implementations must be deterministic for identical input if callers rely
/// on reproducible results, and must return one vector per input text in
/// input order from [`Embedder::encode_batch`].
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality.
    fn dim(&self) -> usize;

    /// Embed a batch of texts in a single backend call.
    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vector>>;

    /// Embed a single text.
    fn encode(&self, text: &str) -> anyhow::Result<Vector> {
        self.encode_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for a single input"))
    }

    /// Cosine similarity of `query` against each of `vectors`, same order.
    fn similarity(&self, query: &[f32], vectors: &[Vector]) -> anyhow::Result<Vec<f32>> {
        Ok(cosine_scores(query, vectors))
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn dim(&self) -> usize { (**self).dim() }
    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vector>> { (**self).encode_batch(texts) }
    fn encode(&self, text: &str) -> anyhow::Result<Vector> { (**self).encode(text) }
    fn similarity(&self, query: &[f32], vectors: &[Vector]) -> anyhow::Result<Vec<f32>> { (**self).similarity(query, vectors) }
}
