use std::{env, fmt, net::SocketAddr};

use url::Url;

use super::{non_empty_var, server_bind_address};

pub const KV_URL_VAR: &str = "KV_REST_API_URL";
pub const KV_TOKEN_VAR: &str = "KV_REST_API_TOKEN";

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Returns the canonical name used for logging/metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Presence of the hosted key-value store credentials.
///
/// Both the REST endpoint and its token must be set for the store to be
/// usable; anything less is the degraded `NotConfigured` mode.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Configured { url: Url, token: String },
    NotConfigured,
}

impl StoreConfig {
    /// Resolves the store credentials from `KV_REST_API_URL` and `KV_REST_API_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let (Some(raw_url), Some(token)) = (non_empty_var(KV_URL_VAR), non_empty_var(KV_TOKEN_VAR))
        else {
            return Ok(Self::NotConfigured);
        };

        let url = Url::parse(&raw_url).map_err(ConfigError::StoreUrl)?;
        Ok(Self::Configured { url, token })
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured { .. })
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured { url, .. } => f
                .debug_struct("Configured")
                .field("url", &url.as_str())
                .field("token", &"<redacted>")
                .finish(),
            Self::NotConfigured => f.write_str("NotConfigured"),
        }
    }
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Constructs the configuration by reading and validating environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_value = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let environment = Environment::from_str(&env_value)?;
        let bind_addr = server_bind_address().map_err(ConfigError::BindAddress)?;
        let store = StoreConfig::from_env()?;

        Ok(Self {
            bind_addr,
            environment,
            store,
        })
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    BindAddress(std::net::AddrParseError),
    StoreUrl(url::ParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment(value) => write!(
                f,
                "APP_ENV must be one of 'development', 'production', or 'test' (got {value})"
            ),
            Self::BindAddress(err) => write!(f, "invalid APP_BIND_ADDR value: {err}"),
            Self::StoreUrl(err) => write!(f, "invalid {KV_URL_VAR} value: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}
