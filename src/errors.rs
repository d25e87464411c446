use thiserror::Error;
use crate::manager_mail::MailError;
use crate::manager_open_meteo::OpenMeteoError;
use crate::policy::PolicyError;
use crate::report::RenderError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid configuration value for {0}: '{1}'")]
    Invalid(&'static str, String),
    #[error("error reading configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors that end a run, nothing is retried and no partial brief is sent
#[derive(Error, Debug)]
pub enum BriefError {
    #[error("configuration missing: {0}")]
    ConfigurationMissing(&'static str),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("forecast unavailable: {0}")]
    ForecastUnavailable(#[from] OpenMeteoError),
    #[error("{0}")]
    NoMatchingTier(#[from] PolicyError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("dispatch failed: {0}")]
    DispatchFailed(#[from] MailError),
}
impl From<ConfigError> for BriefError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Missing(name) => BriefError::ConfigurationMissing(name),
            other => BriefError::Configuration(other.to_string()),
        }
    }
}
