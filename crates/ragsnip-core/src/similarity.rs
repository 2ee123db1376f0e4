use crate::types::Vector;

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero norm or the lengths differ, so a
/// degenerate embedding never matches anything at a positive threshold.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() { return 0.0; }
    let mut dot = 0f32; let mut norm_a = 0f32; let mut norm_b = 0f32;
    for (x, y) in a.iter().zip(b) { dot += x * y; norm_a += x * x; norm_b += y * y; }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f32::EPSILON { 0.0 } else { (dot / denom).clamp(-1.0, 1.0) }
}

/// Score every vector in `vectors` against `query`, preserving order.
pub fn cosine_scores(query: &[f32], vectors: &[Vector]) -> Vec<f32> {
    vectors.iter().map(|v| cosine_similarity(query, v)).collect()
}

/// L2-normalise in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-12 { for x in v.iter_mut() { *x /= norm; } }
}
