use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Fixed offset of US Eastern Standard Time, in seconds east of UTC.
pub const EST_OFFSET_SECS: i32 = -5 * 3600;

/// Largest magnitude a fixed UTC offset may take.
const MAX_OFFSET_SECS: i32 = 86_399;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub users: UsersConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Settings for the `/user` transformation.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    /// Offset used when rendering `created_on`, seconds east of UTC.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_secs: i32,
    /// Most request bodies whose results are remembered; 0 disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self { utc_offset_secs: default_utc_offset(), cache_capacity: default_cache_capacity() }
    }
}

/// Settings for the `/image` resize endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { max_body_bytes: default_max_body_bytes() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_utc_offset() -> i32 { EST_OFFSET_SECS }
fn default_cache_capacity() -> usize { 10_000 }
fn default_max_body_bytes() -> usize { 10 * 1024 * 1024 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Build a config purely from `SERVER_HOST`, `SERVER_PORT` and
/// `TOKIO_WORKER_THREADS`, used when no config file is present.
pub fn from_env() -> AppConfig {
    let mut cfg = AppConfig::default();
    if let Ok(host) = std::env::var("SERVER_HOST") {
        cfg.server.host = host;
    }
    if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        cfg.server.port = port;
    }
    cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .or(cfg.server.worker_threads);
    cfg
}

impl AppConfig {
    /// Load from `CONFIG_PATH`, falling back to the environment when the file
    /// is missing, then normalize. A file that exists but fails to parse is
    /// an error.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            from_env()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.users.validate()?;
        if self.images.max_body_bytes == 0 {
            return Err(anyhow!("images.max_body_bytes must be > 0"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl UsersConfig {
    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_secs.abs() > MAX_OFFSET_SECS {
            return Err(anyhow!(
                "users.utc_offset_secs must be within -{MAX_OFFSET_SECS}..={MAX_OFFSET_SECS}"
            ));
        }
        Ok(())
    }
}
