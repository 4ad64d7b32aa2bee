use std::{
    env,
    net::{AddrParseError, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid WEB_BIND_ADDRESS `{0}`: {1}")]
    InvalidBindAddress(String, #[source] AddrParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub bind_address: SocketAddr,
    /// IP2Location csv file used to locate clients. Without it no client can
    /// be located.
    pub geolocation_db_path: Option<PathBuf>,
}

impl WebConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = lookup("WEB_BIND_ADDRESS")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned());
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .map_err(|why| ConfigError::InvalidBindAddress(bind_address.clone(), why))?;

        let geolocation_db_path = lookup("GEOLOCATION_DB_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_address,
            geolocation_db_path,
        })
    }
}
