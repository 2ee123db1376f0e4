//! Domain types shared by the retrieval engine, the loader and the CLI.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

pub type SourceId = String;
pub type Vector = Vec<f32>;
pub type SourceMap = IndexMap<SourceId, String>;

/// The body of text being searched.
///
/// - `SingleText`: one free-text document, segmented into sentences
/// - `MultiSource`: source id → content, segmented into lines per source;
///   iteration (insertion) order defines result order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corpus {
    SingleText(String),
    MultiSource(SourceMap),
}

impl From<&str> for Corpus {
    fn from(text: &str) -> Self { Corpus::SingleText(text.to_string()) }
}

impl From<String> for Corpus {
    fn from(text: String) -> Self { Corpus::SingleText(text) }
}

impl From<SourceMap> for Corpus {
    fn from(sources: SourceMap) -> Self { Corpus::MultiSource(sources) }
}

impl<K: Into<SourceId>, V: Into<String>> FromIterator<(K, V)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Corpus::MultiSource(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Segment embeddings computed ahead of time, in segment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Precomputed {
    Single(Vec<Vector>),
    PerSource(HashMap<SourceId, Vec<Vector>>),
}

/// One match expanded into its context window.
///
/// `source` is `None` for single-text corpora. `segments` is the half-open
/// range of segment indices joined into `text`; `index` is the matching
/// segment within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub source: Option<SourceId>,
    pub text: String,
    pub index: usize,
    pub score: f32,
    pub segments: Range<usize>,
}

pub const DEFAULT_THRESHOLD: f32 = 0.3;
pub const DEFAULT_WINDOW: usize = 10;

/// Knobs for one retrieval call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Segments scoring `>= threshold` are matches.
    pub threshold: f32,
    /// Segments kept on each side of a match.
    pub window: usize,
}

impl Default for SearchOptions {
    fn default() -> Self { Self { threshold: DEFAULT_THRESHOLD, window: DEFAULT_WINDOW } }
}

impl SearchOptions {
    pub fn with_threshold(threshold: f32) -> Self { Self { threshold, ..Self::default() } }
}
