use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub openai_api_key: String,
    pub embeddings_base_url: String,
    pub embeddings_model: String,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            embeddings_base_url: std::env::var("EMBEDDINGS_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            embeddings_model: std::env::var("EMBEDDINGS_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Directory holding the stored job-posting uploads for one session.
    pub fn requirements_dir(&self, session_id: &str) -> PathBuf {
        self.data_dir
            .join("requirements")
            .join("sessions")
            .join(session_id)
    }

    /// Directory holding the stored resume uploads for one session.
    pub fn resumes_dir(&self, session_id: &str) -> PathBuf {
        self.data_dir.join("resumes").join(session_id)
    }

    /// Creates the top-level data directories if they do not exist yet.
    pub fn ensure_data_dirs(&self) -> Result<()> {
        for dir in [
            self.data_dir.join("requirements").join("sessions"),
            self.data_dir.join("resumes"),
        ] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
