use std::io;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Run pending migrations before serving.
    #[serde(default)]
    pub auto_migrate: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub ttl_days: i64,
}

fn default_token_ttl_days() -> i64 { 7 }

impl Default for JwtConfig {
    fn default() -> Self {
        Self { secret: String::new(), ttl_days: default_token_ttl_days() }
    }
}

/// Credentials for the external image host. Empty credentials disable remote deletes.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    /// Public id of the shared placeholder image; never deleted.
    #[serde(default)]
    pub default_public_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// `None` when the file does not exist; read and parse errors are returned.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("reading {path}")),
    };
    let cfg: AppConfig = toml::from_str(&content).with_context(|| format!("parsing {path}"))?;
    Ok(Some(cfg))
}

impl AppConfig {
    /// Load `config.toml` when present, otherwise start from defaults, then
    /// fill gaps from the environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_optional(&config_path())?.unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.jwt.normalize_from_env();
        self.jwt.validate()?;
        self.cloudinary.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow!("SERVER_PORT must be a valid port number"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl JwtConfig {
    pub fn normalize_from_env(&mut self) {
        if self.secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret.len() < 16 {
            return Err(anyhow!("jwt.secret must be at least 16 bytes; set it in config.toml or JWT_SECRET"));
        }
        if self.ttl_days <= 0 {
            return Err(anyhow!("jwt.ttl_days must be positive"));
        }
        Ok(())
    }
}

impl CloudinaryConfig {
    pub fn normalize_from_env(&mut self) {
        fill_from_env(&mut self.cloud_name, "CLOUDINARY_CLOUD_NAME");
        fill_from_env(&mut self.api_key, "CLOUDINARY_API_KEY");
        fill_from_env(&mut self.api_secret, "CLOUDINARY_API_SECRET");
        if self.default_public_id.is_none() {
            self.default_public_id = std::env::var("CLOUDINARY_DEFAULT_PUBLIC_ID").ok();
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.cloud_name.trim().is_empty()
            && !self.api_key.trim().is_empty()
            && !self.api_secret.trim().is_empty()
    }
}

fn fill_from_env(slot: &mut String, var: &str) {
    if slot.trim().is_empty() {
        if let Ok(v) = std::env::var(var) {
            *slot = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 3600,
            acquire_timeout_secs: 30,
            sqlx_logging: false,
            auto_migrate: false,
        }
    }

    #[test]
    fn parses_toml_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "postgres://u:p@localhost/volta"

            [jwt]
            secret = "0123456789abcdef"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.jwt.ttl_days, 7);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert!(!cfg.cloudinary.is_configured());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("volta-pets-no-such-config.toml");
        assert!(load_optional(path.to_str().unwrap()).unwrap().is_none());
    }

    #[test]
    fn malformed_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = \"ocho mil\"\n").unwrap();
        std::env::set_var("CONFIG_PATH", &path);
        let err = AppConfig::load_and_validate().unwrap_err();
        std::env::remove_var("CONFIG_PATH");
        assert!(format!("{err:#}").contains("parsing"), "{err:#}");
    }

    #[test]
    fn rejects_non_postgres_url() {
        assert!(db("mysql://localhost/volta").validate().is_err());
        assert!(db("postgres://localhost/volta").validate().is_ok());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let mut cfg = db("postgres://localhost/volta");
        cfg.max_connections = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let cfg = JwtConfig { secret: "short".into(), ttl_days: 7 };
        assert!(cfg.validate().is_err());
    }
}
