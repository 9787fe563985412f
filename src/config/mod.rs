use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Root directory fan submissions are written into.
    pub upload_dir: String,
    /// URL prefix the upload root is served under. May be absolute.
    #[serde(default = "default_url_prefix")]
    pub public_url_prefix: String,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

/// Credentials default to the environment so the config file can stay
/// secret-free; explicit values in the file win.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub artist_id: String,
    #[serde(default = "default_market")]
    pub market: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            artist_id: String::new(),
            market: default_market(),
            token_url: default_token_url(),
            api_base: default_api_base(),
            client_id: None,
            client_secret: None,
        }
    }
}

impl CatalogConfig {
    pub fn client_id(&self) -> String {
        self.client_id
            .clone()
            .or_else(|| std::env::var("CATALOG_CLIENT_ID").ok())
            .unwrap_or_default()
    }

    pub fn client_secret(&self) -> String {
        self.client_secret
            .clone()
            .or_else(|| std::env::var("CATALOG_CLIENT_SECRET").ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_lifetime_days")]
    pub session_lifetime_days: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_lifetime_days: default_session_lifetime_days(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_url_prefix() -> String {
    "/media".to_string()
}

fn default_max_upload_mb() -> usize {
    15
}

fn default_allowed_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/webp", "image/gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_market() -> String {
    "NL".to_string()
}

fn default_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_api_base() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_session_lifetime_days() -> u32 {
    7
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Run `backline init` first?",
                path.display(),
                e
            )
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.media.max_upload_mb == 0 {
            anyhow::bail!("media.max_upload_mb must be greater than 0");
        }
        if self.media.allowed_types.is_empty() {
            anyhow::bail!("media.allowed_types must not be empty");
        }
        if !self.media.public_url_prefix.starts_with('/') {
            url::Url::parse(&self.media.public_url_prefix)
                .map_err(|_| anyhow::anyhow!("media.public_url_prefix must be a path or absolute URL"))?;
        }
        url::Url::parse(&self.catalog.token_url)
            .map_err(|_| anyhow::anyhow!("catalog.token_url must be an absolute URL"))?;
        url::Url::parse(&self.catalog.api_base)
            .map_err(|_| anyhow::anyhow!("catalog.api_base must be an absolute URL"))?;
        Ok(())
    }

    /// Upload cap in bytes, as enforced by both the staging queue and the
    /// HTTP body limit.
    pub fn max_upload_bytes(&self) -> usize {
        self.media.max_upload_mb * 1024 * 1024
    }
}
