#![deny(unused_imports)]

//! ragsnip-core
//!
//! Shared types, the `Embedder` seam, configuration and the filesystem corpus
//! loader used by the retrieval engine and the CLI.

pub mod config;
pub mod error;
pub mod loader;
pub mod similarity;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::Embedder;
pub use types::{Corpus, Precomputed, Snippet};
