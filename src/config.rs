use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Absolute origin encoded into QR codes, e.g. `https://printdrop.example`.
    /// Falls back to the listen address when unset.
    pub base_url: Option<String>,
    pub storage_root: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let base_url = env::var("APP_BASE_URL").ok().filter(|url| !url.is_empty());
        let storage_root = env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            storage_root,
        })
    }

    pub fn public_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}
