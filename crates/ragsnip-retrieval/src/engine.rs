use std::collections::HashMap;

use tracing::debug;

use ragsnip_core::config::{EmbeddingSettings, Settings};
use ragsnip_core::types::{SearchOptions, Vector};
use ragsnip_core::{Corpus, Embedder, Error, Precomputed, Result, Snippet};
use ragsnip_embed::default_embedder;

use crate::segment::{segment_corpus, window, SegmentedSource};

/// Return the context-expanded snippets of `corpus` that match `query`.
///
/// When `embedder` is `None` the default backend for
/// [`EmbeddingSettings::default`] is built; if that fails the call returns
/// [`Error::MissingDependency`]. Results come in discovery order: sources in
/// corpus order, then matching segments in ascending index order.
pub fn search(
    query: &str,
    corpus: &Corpus,
    embedder: Option<&dyn Embedder>,
    precomputed: Option<&Precomputed>,
    options: &SearchOptions,
) -> Result<Vec<Snippet>> {
    search_with_fallback(query, corpus, embedder, precomputed, options, &EmbeddingSettings::default())
}

/// Like [`search`], but builds the fallback embedder from `fallback`.
pub fn search_with_fallback(
    query: &str,
    corpus: &Corpus,
    embedder: Option<&dyn Embedder>,
    precomputed: Option<&Precomputed>,
    options: &SearchOptions,
    fallback: &EmbeddingSettings,
) -> Result<Vec<Snippet>> {
    let sources = segment_corpus(corpus);
    if sources.iter().all(SegmentedSource::is_empty) { return Ok(Vec::new()); }
    let owned;
    let embedder: &dyn Embedder = match embedder {
        Some(e) => e,
        None => { owned = default_embedder(fallback)?; owned.as_ref() }
    };
    retrieve(query, &sources, embedder, precomputed, options)
}

/// Retrieval engine bound to one embedding backend.
pub struct RetrievalEngine {
    embedder: Box<dyn Embedder>,
    options: SearchOptions,
}

impl RetrievalEngine {
    pub fn new(embedder: Box<dyn Embedder>) -> Self { Self { embedder, options: SearchOptions::default() } }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(default_embedder(&settings.embedding)?).with_options(settings.retrieval))
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self { self.options = options; self }

    pub fn options(&self) -> &SearchOptions { &self.options }

    pub fn search(&self, query: &str, corpus: &Corpus, precomputed: Option<&Precomputed>) -> Result<Vec<Snippet>> {
        let sources = segment_corpus(corpus);
        if sources.iter().all(SegmentedSource::is_empty) { return Ok(Vec::new()); }
        retrieve(query, &sources, self.embedder.as_ref(), precomputed, &self.options)
    }

    /// Embed every segment of `corpus` so repeated queries can skip re-encoding.
    pub fn embed_corpus(&self, corpus: &Corpus) -> Result<Precomputed> {
        let sources = segment_corpus(corpus);
        match corpus {
            Corpus::SingleText(_) => {
                let vectors = match sources.first() { Some(s) if !s.is_empty() => encode_source(self.embedder.as_ref(), s)?, _ => Vec::new() };
                Ok(Precomputed::Single(vectors))
            }
            Corpus::MultiSource(_) => {
                let mut per_source = HashMap::new();
                for source in sources.iter().filter(|s| !s.is_empty()) {
                    if let Some(id) = source.id { per_source.insert(id.to_string(), encode_source(self.embedder.as_ref(), source)?); }
                }
                Ok(Precomputed::PerSource(per_source))
            }
        }
    }
}

fn retrieve(
    query: &str,
    sources: &[SegmentedSource<'_>],
    embedder: &dyn Embedder,
    precomputed: Option<&Precomputed>,
    options: &SearchOptions,
) -> Result<Vec<Snippet>> {
    let query_vec = embedder.encode(query).map_err(Error::Embedding)?;
    let mut results = Vec::new();
    for source in sources {
        if source.is_empty() { continue; }
        let computed;
        let vectors: &[Vector] = match reuse_precomputed(precomputed, source)? {
            Some(vectors) => { validate_precomputed(source, vectors, query_vec.len())?; vectors }
            None => { computed = encode_source(embedder, source)?; &computed }
        };
        let scores = embedder.similarity(&query_vec, vectors).map_err(Error::Embedding)?;
        if scores.len() != source.len() {
            return Err(Error::Embedding(anyhow::anyhow!("similarity returned {} scores for {} segments", scores.len(), source.len())));
        }
        let before = results.len();
        for (idx, &score) in scores.iter().enumerate() {
            if score < options.threshold || score.is_nan() { continue; }
            let segments = window(idx, source.len(), options.window);
            results.push(Snippet { source: source.id.map(str::to_string), text: source.join(segments.clone()), index: idx, score, segments });
        }
        debug!(source = source.id.unwrap_or("<text>"), segments = source.len(), matches = results.len() - before, "scored source");
    }
    Ok(results)
}

fn encode_source(embedder: &dyn Embedder, source: &SegmentedSource<'_>) -> Result<Vec<Vector>> {
    let vectors = embedder.encode_batch(&source.texts()).map_err(Error::Embedding)?;
    if vectors.len() != source.len() {
        return Err(Error::Embedding(anyhow::anyhow!("embedder returned {} vectors for {} segments", vectors.len(), source.len())));
    }
    Ok(vectors)
}

fn reuse_precomputed<'p>(precomputed: Option<&'p Precomputed>, source: &SegmentedSource<'_>) -> Result<Option<&'p [Vector]>> {
    match (precomputed, source.id) {
        (None, _) => Ok(None),
        (Some(Precomputed::Single(vectors)), None) => Ok(Some(vectors.as_slice())),
        (Some(Precomputed::PerSource(map)), Some(id)) => Ok(map.get(id).map(Vec::as_slice)),
        (Some(Precomputed::Single(_)), Some(id)) => Err(Error::MalformedPrecomputedEmbeddings {
            source_id: Some(id.to_string()),
            reason: "got one vector list for a multi-source corpus".into(),
        }),
        (Some(Precomputed::PerSource(_)), None) => Err(Error::MalformedPrecomputedEmbeddings {
            source_id: None,
            reason: "got per-source vectors for a single-text corpus".into(),
        }),
    }
}

fn validate_precomputed(source: &SegmentedSource<'_>, vectors: &[Vector], dim: usize) -> Result<()> {
    let source_id = source.id.map(str::to_string);
    if vectors.len() != source.len() {
        return Err(Error::InvalidPrecomputedEmbeddings { source_id, expected: source.len(), actual: vectors.len() });
    }
    if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
        return Err(Error::MalformedPrecomputedEmbeddings { source_id, reason: format!("vector {i} has dimension {}, query has {dim}", v.len()) });
    }
    Ok(())
}
