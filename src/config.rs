use std::fs;
use chrono::TimeDelta;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::report::ReportFormat;

#[derive(Deserialize)]
#[serde(default)]
pub struct GeoRef {
    pub location: String,
    pub lat: f64,
    pub long: f64,
    pub timezone: String,
}

impl Default for GeoRef {
    fn default() -> Self {
        Self {
            location: "Inwood".to_string(),
            lat: 39.36,
            long: -78.05,
            timezone: "America/New_York".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct ReportParameters {
    pub format: ReportFormat,
    pub subject_prefix: String,
}

impl Default for ReportParameters {
    fn default() -> Self {
        Self { format: ReportFormat::Html, subject_prefix: "WX Brief".to_string() }
    }
}

/// Mail providers that can deliver the brief
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    SendGrid,
    Smtp,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct MailParameters {
    pub transport: Transport,
    pub api_key: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_endpoint: Option<String>,
    pub from: Option<String>,
    pub to: Vec<String>,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Files {
    pub output_dir: String,
    pub keep_days: i64,
}

impl Default for Files {
    fn default() -> Self {
        Self { output_dir: "./output/".to_string(), keep_days: 7 }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

impl Default for General {
    fn default() -> Self {
        Self { log_path: None, log_level: LevelFilter::Info, log_to_stdout: true }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub geo_ref: GeoRef,
    pub report: ReportParameters,
    pub mail: MailParameters,
    pub files: Files,
    pub general: General,
}

/// Loads the configuration and returns a struct with all configuration items.
/// Environment variables override values from the file, and the mail settings needed
/// to deliver the brief are checked before anything else is set up.
///
/// # Arguments
///
/// * 'config_path' - optional path to a TOML configuration file
/// * 'env' - lookup for environment variables
pub fn load_config(config_path: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let mut config: Config = match config_path {
        Some(path) => {
            let toml = fs::read_to_string(path)?;
            toml::from_str(&toml)?
        }
        None => Config::default(),
    };

    apply_env(&mut config, &env)?;
    check_mail(&config.mail)?;
    check_files(&config.files)?;

    Ok(config)
}

fn apply_env(config: &mut Config, env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
    if let Some(v) = env("LATITUDE") {
        config.geo_ref.lat = v.trim().parse().map_err(|_| ConfigError::Invalid("LATITUDE", v))?;
    }
    if let Some(v) = env("LONGITUDE") {
        config.geo_ref.long = v.trim().parse().map_err(|_| ConfigError::Invalid("LONGITUDE", v))?;
    }
    if let Some(v) = env("TIMEZONE") {
        config.geo_ref.timezone = v;
    }
    if let Some(v) = env("LOCATION_NAME") {
        config.geo_ref.location = v;
    }
    if let Some(v) = env("REPORT_FORMAT") {
        config.report.format = v.parse().map_err(|_| ConfigError::Invalid("REPORT_FORMAT", v))?;
    }
    if let Some(v) = env("SENDGRID_API_KEY") {
        config.mail.api_key = Some(v);
    }
    if let Some(v) = env("SMTP_PASSWORD") {
        config.mail.smtp_password = Some(v);
    }
    if let Some(v) = env("EMAIL_FROM") {
        config.mail.from = Some(v);
    }
    if let Some(v) = env("EMAIL_TO") {
        config.mail.to = split_recipients(&v);
    }
    config.mail.to.retain(|t| !t.trim().is_empty());

    Ok(())
}

/// Splits a comma separated recipient list, dropping blank entries
pub fn split_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn check_mail(mail: &MailParameters) -> Result<(), ConfigError> {
    match mail.transport {
        Transport::SendGrid => {
            required(&mail.api_key, "SENDGRID_API_KEY")?;
        }
        Transport::Smtp => {
            required(&mail.smtp_endpoint, "mail.smtp_endpoint")?;
            required(&mail.smtp_user, "mail.smtp_user")?;
            required(&mail.smtp_password, "SMTP_PASSWORD")?;
        }
    }
    required(&mail.from, "EMAIL_FROM")?;
    if mail.to.is_empty() {
        return Err(ConfigError::Missing("EMAIL_TO"));
    }

    Ok(())
}

fn check_files(files: &Files) -> Result<(), ConfigError> {
    if files.keep_days < 0 || TimeDelta::try_days(files.keep_days).is_none() {
        return Err(ConfigError::Invalid("files.keep_days", files.keep_days.to_string()));
    }

    Ok(())
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}
