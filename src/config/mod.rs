use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,
    /// Where the logged-in user is persisted between runs
    #[serde(default = "default_session_file")]
    pub session_file: String,
    /// Directory receiving uploaded receipt images
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_session_file() -> String {
    ".billed/session.json".to_string()
}

fn default_upload_dir() -> String {
    ".billed/receipts".to_string()
}

fn default_log_file() -> String {
    ".billed/billed.log".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Variables from a `.env` file are loaded first if the file exists.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;
    Ok(config)
}
