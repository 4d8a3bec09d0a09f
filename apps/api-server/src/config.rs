//! Application configuration, loaded once at startup from a YAML file.
//!
//! Environment variables (`HOST`, `PORT`, `DATABASE_URL`, `JWT_SECRET`) override
//! the file so deployments can keep secrets out of it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use quill_infra::JwtConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yml";
const DEFAULT_JWT_SECRET: &str = "change-me-in-production";
/// One year.
const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported database type: {0}")]
    UnsupportedDatabase(String),

    #[error("invalid value for {key}: {value}")]
    InvalidOverride { key: &'static str, value: String },

    #[error("{key} must be between {min} and {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub db: DbConfig,
    pub jwt: JwtSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// When false, update/delete accept a body `user_id` if no token is sent.
    pub require_auth_for_mutations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            require_auth_for_mutations: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Mysql,
    Postgres,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub dbname: String,
    #[serde(default)]
    pub charset: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Full connection URL from `DATABASE_URL`; wins over the parts above.
    #[serde(skip)]
    pub url_override: Option<String>,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

impl DbConfig {
    pub fn kind(&self) -> Result<DbKind, ConfigError> {
        match self.kind.to_ascii_lowercase().as_str() {
            "mysql" => Ok(DbKind::Mysql),
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite" => Ok(DbKind::Sqlite),
            "memory" => Ok(DbKind::Memory),
            other => Err(ConfigError::UnsupportedDatabase(other.to_string())),
        }
    }

    /// Connection URL, or `None` when running on the in-memory store.
    pub fn url(&self) -> Result<Option<String>, ConfigError> {
        if let Some(url) = &self.url_override {
            return Ok(Some(url.clone()));
        }

        let url = match self.kind()? {
            DbKind::Memory => return Ok(None),
            DbKind::Sqlite => format!("sqlite://{}?mode=rwc", self.dbname),
            DbKind::Mysql => {
                let mut url = format!(
                    "mysql://{}:{}@{}:{}/{}",
                    self.user,
                    self.password,
                    self.host,
                    self.port.unwrap_or(3306),
                    self.dbname
                );
                if let Some(charset) = &self.charset {
                    url.push_str("?charset=");
                    url.push_str(charset);
                }
                url
            }
            DbKind::Postgres => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user,
                self.password,
                self.host,
                self.port.unwrap_or(5432),
                self.dbname
            ),
        };

        Ok(Some(url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_expiration_hours() -> i64 {
    24
}

fn default_issuer() -> String {
    "quill-api".to_string()
}

impl JwtSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(ConfigError::OutOfRange {
                key: "jwt.expiration_hours",
                value: self.expiration_hours,
                min: 1,
                max: MAX_EXPIRATION_HOURS,
            });
        }
        Ok(())
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            expiration_hours: settings.expiration_hours,
            issuer: settings.issuer.clone(),
        }
    }
}

impl AppConfig {
    /// Load from `QUILL_CONFIG` (or the default path), then apply env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("QUILL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.warn_on_default_secret();
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        // Reject unknown database types at startup, not on first connect.
        config.db.kind()?;
        config.jwt.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by name; `lookup` is `std::env::var` in production.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidOverride {
                key: "PORT",
                value: port,
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.db.url_override = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt.secret = secret;
        }
        Ok(())
    }

    fn warn_on_default_secret(&self) {
        if self.jwt.secret != DEFAULT_JWT_SECRET {
            return;
        }

        let is_production = std::env::var("RUST_ENV")
            .map(|v| v == "production" || v == "prod")
            .unwrap_or(false);

        if is_production {
            tracing::error!(
                "SECURITY: Using default JWT secret in production! Set jwt.secret or JWT_SECRET."
            );
        } else {
            tracing::warn!(
                "Using default JWT secret. Set jwt.secret or JWT_SECRET for production use."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
server:
  port: 9090
db:
  type: mysql
  host: db.local
  port: 3307
  user: blog
  password: pw
  dbname: blog
  charset: utf8mb4
jwt:
  secret: s3cret
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = AppConfig::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.server.require_auth_for_mutations);
        assert_eq!(config.db.kind().unwrap(), DbKind::Mysql);
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.jwt.issuer, "quill-api");
    }

    #[test]
    fn test_mysql_url_includes_charset() {
        let config = AppConfig::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(
            config.db.url().unwrap().as_deref(),
            Some("mysql://blog:pw@db.local:3307/blog?charset=utf8mb4")
        );
    }

    #[test]
    fn test_memory_database_has_no_url() {
        let config =
            AppConfig::from_yaml_str("db:\n  type: memory\njwt:\n  secret: x\n").unwrap();

        assert_eq!(config.db.url().unwrap(), None);
    }

    #[test]
    fn test_unknown_database_type_is_rejected() {
        let result = AppConfig::from_yaml_str("db:\n  type: oracle\njwt:\n  secret: x\n");

        assert!(matches!(result, Err(ConfigError::UnsupportedDatabase(_))));
    }

    #[test]
    fn test_missing_jwt_section_is_a_parse_error() {
        let result = AppConfig::from_yaml_str("db:\n  type: memory\n");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_expiration_hours_out_of_range_is_rejected() {
        for hours in ["0", "-5", "9000000000000"] {
            let raw = format!(
                "db:\n  type: memory\njwt:\n  secret: x\n  expiration_hours: {hours}\n"
            );

            let result = AppConfig::from_yaml_str(&raw);

            assert!(
                matches!(
                    result,
                    Err(ConfigError::OutOfRange {
                        key: "jwt.expiration_hours",
                        ..
                    })
                ),
                "{hours}"
            );
        }
    }

    #[test]
    fn test_expiration_of_one_year_is_accepted() {
        let raw = "db:\n  type: memory\njwt:\n  secret: x\n  expiration_hours: 8760\n";

        let config = AppConfig::from_yaml_str(raw).unwrap();

        assert_eq!(config.jwt.expiration_hours, 8760);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = AppConfig::from_yaml_str(SAMPLE).unwrap();

        config
            .apply_overrides(|key| match key {
                "PORT" => Some("7000".to_string()),
                "DATABASE_URL" => Some("postgres://u:p@h/db".to_string()),
                "JWT_SECRET" => Some("from-env".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.jwt.secret, "from-env");
        assert_eq!(config.db.url().unwrap().as_deref(), Some("postgres://u:p@h/db"));
    }

    #[test]
    fn test_bad_port_override_is_rejected() {
        let mut config = AppConfig::from_yaml_str(SAMPLE).unwrap();

        let result = config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride { key: "PORT", .. })
        ));
    }
}
