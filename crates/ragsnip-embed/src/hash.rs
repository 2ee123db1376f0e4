use std::hash::Hasher;
use twox_hash::XxHash64;

use ragsnip_core::similarity::l2_normalize;
use ragsnip_core::types::Vector;
use ragsnip_core::Embedder;

/// Bag-of-words embedder that hashes lowercase word tokens into a fixed
/// number of buckets. Deterministic, needs no model files, and texts sharing
/// words get a positive cosine similarity.
#[derive(Debug, Clone)]
pub struct HashEmbedder { dim: usize }

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    pub fn embed_one(&self, text: &str) -> Vector {
        let mut v = vec![0f32; self.dim];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.to_lowercase().as_bytes());
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let weight = 0.5 + 0.5 * (((h >> 32) as u32) as f32 / u32::MAX as f32);
            v[idx] += weight;
        }
        l2_normalize(&mut v);
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn encode_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vector>> { Ok(texts.iter().map(|t| self.embed_one(t)).collect()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragsnip_core::similarity::cosine_similarity;

    #[test]
    fn shared_words_score_higher_than_disjoint() {
        let e = HashEmbedder::new(256);
        let q = e.embed_one("cat");
        let hit = e.embed_one("The cat sat");
        let miss = e.embed_one("Birds flew high");
        assert!(cosine_similarity(&q, &hit) > cosine_similarity(&q, &miss));
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        let e = HashEmbedder::new(64);
        assert_eq!(e.embed_one("Cat, dog!"), e.embed_one("cat dog"));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let e = HashEmbedder::new(8);
        assert!(e.embed_one("  ").iter().all(|x| *x == 0.0));
    }
}
