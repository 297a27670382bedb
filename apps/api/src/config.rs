use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    /// Base URL of the food image classification service.
    pub classifier_url: String,
    pub classifier_top_k: u32,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            classifier_url: require_env("CLASSIFIER_URL")?
                .trim_end_matches('/')
                .to_string(),
            classifier_top_k: parse_top_k(std::env::var("CLASSIFIER_TOP_K").ok())?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Number of labels requested per photo. Defaults to 5; zero is rejected.
fn parse_top_k(raw: Option<String>) -> Result<u32> {
    let top_k = raw
        .as_deref()
        .unwrap_or("5")
        .trim()
        .parse::<u32>()
        .context("CLASSIFIER_TOP_K must be a positive integer")?;
    if top_k == 0 {
        bail!("CLASSIFIER_TOP_K must be a positive integer, got 0");
    }
    Ok(top_k)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
