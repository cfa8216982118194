use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";
pub const DEFAULT_PIOPIY_API_BASE: &str = "https://sms.piopiy.com";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// SMS providers the notifier knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Twilio,
    Piopiy,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twilio" => Ok(Self::Twilio),
            "piopiy" => Ok(Self::Piopiy),
            other => Err(AppError::Config(format!(
                "SMS_PROVIDER_ORDER: unknown provider '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct PiopiyConfig {
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub leads_file: PathBuf,
    pub upload_dir: PathBuf,
    /// Present only when both the account SID and auth token are set.
    pub twilio: Option<TwilioConfig>,
    pub piopiy: Option<PiopiyConfig>,
    pub provider_order: Vec<ProviderKind>,
    pub provider_timeout: Duration,
    /// Largest CSV accepted by `POST /upload_csv`.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns an error if `PORT`, `SMS_PROVIDER_ORDER`,
    /// `SMS_PROVIDER_TIMEOUT_SECS` or `MAX_UPLOAD_BYTES` hold values that
    /// cannot be parsed, or if either of the last two is zero.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// are treated the same as unset ones.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("PORT: {e}")))?,
            None => DEFAULT_PORT,
        };

        let provider_timeout = match get("SMS_PROVIDER_TIMEOUT_SECS") {
            Some(raw) => {
                Duration::from_secs(parse_positive::<u64>("SMS_PROVIDER_TIMEOUT_SECS", &raw)?)
            }
            None => Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => parse_positive::<usize>("MAX_UPLOAD_BYTES", &raw)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let provider_order = match get("SMS_PROVIDER_ORDER") {
            Some(raw) => raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(ProviderKind::from_str)
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![ProviderKind::Twilio, ProviderKind::Piopiy],
        };

        let twilio = match (get("TWILIO_ACCOUNT_SID"), get("TWILIO_AUTH_TOKEN")) {
            (Some(account_sid), Some(auth_token)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number: get("TWILIO_PHONE_NUMBER"),
                api_base: get("TWILIO_API_BASE")
                    .unwrap_or_else(|| DEFAULT_TWILIO_API_BASE.to_string()),
            }),
            _ => None,
        };

        let piopiy = get("PIOPIY_API_KEY").map(|api_key| PiopiyConfig {
            api_key,
            api_base: get("PIOPIY_API_BASE").unwrap_or_else(|| DEFAULT_PIOPIY_API_BASE.to_string()),
        });

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            leads_file: get("LEADS_FILE").map_or_else(|| PathBuf::from("leads.json"), PathBuf::from),
            upload_dir: get("UPLOAD_DIR").map_or_else(|| PathBuf::from("uploads"), PathBuf::from),
            twilio,
            piopiy,
            provider_order,
            provider_timeout,
            max_upload_bytes,
        })
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value = raw
        .parse::<T>()
        .map_err(|e| AppError::Config(format!("{key}: {e}")))?;
    if value == T::default() {
        return Err(AppError::Config(format!("{key}: must be greater than zero")));
    }
    Ok(value)
}
