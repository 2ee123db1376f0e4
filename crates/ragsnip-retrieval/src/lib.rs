//! ragsnip-retrieval
//!
//! Threshold-based semantic snippet retrieval over a single document or a set
//! of named sources. See `engine::search` for the entry point and `segment`
//! for how text is cut into comparable units.

pub mod engine;
pub mod segment;

pub use engine::{search, search_with_fallback, RetrievalEngine};
pub use segment::{segment_corpus, window, SegmentMode, SegmentedSource};
pub use ragsnip_core::types::SearchOptions;
pub use ragsnip_core::{Corpus, Embedder, Error, Precomputed, Result, Snippet};
