use thiserror::Error;

use crate::types::SourceId;

#[derive(Debug, Error)]
pub enum Error {
    /// No embedding capability was supplied and none could be constructed.
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// Caller-supplied embeddings hold a different number of vectors than
    /// the source has segments.
    #[error("Invalid precomputed embeddings for {}: expected {expected} vectors, got {actual}", .source_id.as_deref().unwrap_or("<text>"))]
    InvalidPrecomputedEmbeddings { source_id: Option<SourceId>, expected: usize, actual: usize },

    /// Caller-supplied embeddings have the wrong shape for the corpus or the
    /// wrong dimension for the query.
    #[error("Malformed precomputed embeddings for {}: {reason}", .source_id.as_deref().unwrap_or("<text>"))]
    MalformedPrecomputedEmbeddings { source_id: Option<SourceId>, reason: String },

    #[error("Embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn missing_embedder(cause: impl std::fmt::Display) -> Self {
        Self::MissingDependency(format!(
            "no embedding model available ({cause}); pass an Embedder explicitly or point `embedding.model_dir` / APP_MODEL_DIR at a local sentence-transformer checkpoint"
        ))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
