use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file with the job postings corpus.
    pub dataset_path: PathBuf,
    /// Base URL of the embedding model service.
    pub embedder_url: String,
    /// Model identifier forwarded to the model service, tagged so a model
    /// change is detectable.
    pub embedder_model: String,
    pub embed_batch_size: usize,
    pub embed_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            dataset_path: PathBuf::from(require_env("DATASET_PATH")?),
            embedder_url: require_env("EMBEDDER_URL")?,
            embedder_model: std::env::var("EMBEDDER_MODEL")
                .unwrap_or_else(|_| "fine_tuned_mpnet".to_string()),
            embed_batch_size: env_or("EMBED_BATCH_SIZE", 32)?,
            embed_timeout_secs: env_or("EMBED_TIMEOUT_SECS", 30)?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid number")),
        Err(_) => Ok(default),
    }
}
