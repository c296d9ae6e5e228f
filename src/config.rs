use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment { Development, Production }

impl Environment {
    /// Anything other than `production` runs in development mode.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool { self == Environment::Production }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub database_url: String,
    pub static_dir: PathBuf,
}

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_STATIC_DIR: &str = "./client/dist";

impl AppConfig {
    /// `environment` is resolved once at startup, before `.env` is loaded,
    /// so logging and the static bundle always agree on the mode.
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        Self::from_lookup(environment, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(environment: Environment, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let database_url = lookup("DATABASE_URL").filter(|u| !u.is_empty()).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let static_dir = lookup("STATIC_DIR").filter(|d| !d.is_empty()).unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()).into();
        Ok(Self { environment, port, database_url, static_dir })
    }

    /// Static bundle to serve, only in production.
    pub fn static_bundle(&self) -> Option<&std::path::Path> {
        self.environment.is_production().then_some(self.static_dir.as_path())
    }
}

/// Loads `.env` outside production. `ENV` must already be in the real
/// environment. Returns the loaded file, if any, so it can be logged once
/// tracing is up.
pub fn load_dotenv(environment: Environment) -> Result<Option<PathBuf>, dotenvy::Error> {
    if environment.is_production() { return Ok(None); }
    dotenvy::dotenv().map(Some)
}
