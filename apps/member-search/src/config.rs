use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime configuration
///
/// Read from process environment variables, after `.env` has been loaded.
///
/// | Variable                   | Default   |
/// |----------------------------|-----------|
/// | `DATABASE_URL`             | unset, the in-memory store is used |
/// | `DATABASE_MAX_CONNECTIONS` | 5         |
/// | `SEARCH_PAGE_SIZE`         | 10        |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub page_size: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse_positive("DATABASE_MAX_CONNECTIONS", value)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let page_size = match lookup("SEARCH_PAGE_SIZE") {
            Some(value) => parse_positive("SEARCH_PAGE_SIZE", value)?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            database_url,
            max_connections,
            page_size,
        })
    }
}

fn parse_positive<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}
