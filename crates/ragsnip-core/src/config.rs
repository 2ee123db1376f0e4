//! Layered configuration and path helpers.
//!
//! Uses Figment to merge `ragsnip.toml` + `ragsnip.<env>.toml` + `APP_*` env
//! vars (`__` separates nested keys, e.g. `APP_RETRIEVAL__THRESHOLD`).
//! `expand_path` expands `~` and `${VAR}` in user-supplied paths.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::loader::DEFAULT_EXTENSIONS;
use crate::types::SearchOptions;

pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub extensions: Vec<String>,
    pub depth: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self { extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(), depth: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Model name; also the directory name looked up under `models/`.
    pub model: String,
    pub model_dir: Option<String>,
    pub max_len: usize,
    /// Use the hashing embedder instead of loading model weights.
    pub use_fake: bool,
    pub fake_dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model: DEFAULT_MODEL.to_string(), model_dir: None, max_len: 256, use_fake: false, fake_dim: 384 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub retrieval: SearchOptions,
    pub loader: LoaderSettings,
    pub embedding: EmbeddingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let t = self.retrieval.threshold;
        if !t.is_finite() || !(-1.0..=1.0).contains(&t) {
            return Err(Error::InvalidConfig(format!("retrieval.threshold must be within [-1, 1], got {t}")));
        }
        if self.embedding.max_len == 0 { return Err(Error::InvalidConfig("embedding.max_len must be > 0".into())); }
        if self.embedding.fake_dim == 0 { return Err(Error::InvalidConfig("embedding.fake_dim must be > 0".into())); }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Config {
    figment: Figment,
}

impl Config {
    /// Load for the environment named by `RUST_ENV` (default `dev`) and
    /// reject settings that fail validation.
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let config = Self::load_for_env(&env_name);
        config.settings()?;
        Ok(config)
    }

    pub fn load_for_env(env_name: &str) -> Self {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("ragsnip.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("ragsnip.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("ragsnip.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("ragsnip.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Self { figment }
    }

    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
