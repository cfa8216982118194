//! Outbound SMS notification.
//!
//! The [`Notifier`] picks one provider when it is built, following the
//! configured preference order:
//! 1. Twilio, when an account SID and auth token are configured
//! 2. Piopiy, when an API key is configured
//! 3. A simulated provider that only logs
//!
//! Sending never fails from the caller's point of view: every outcome is
//! reported as a [`Delivery`].

pub mod piopiy;
pub mod provider;
pub mod twilio;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::config::{AppConfig, ProviderKind};
use crate::errors::AppError;

pub use piopiy::PiopiyProvider;
pub use provider::{SimulatedProvider, SmsProvider};
pub use twilio::TwilioProvider;

/// Outcome of a single send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub delivered: bool,
    pub detail: String,
    pub provider: String,
}

impl Delivery {
    #[must_use]
    pub fn delivered(provider: &str, detail: impl Into<String>) -> Self {
        Self {
            delivered: true,
            detail: detail.into(),
            provider: provider.to_string(),
        }
    }

    #[must_use]
    pub fn failed(provider: &str, detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: detail.into(),
            provider: provider.to_string(),
        }
    }
}

/// Anything that can send a text message and report how it went.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, message: &str) -> Delivery;
}

pub struct Notifier {
    provider: Box<dyn SmsProvider>,
}

impl Notifier {
    /// Resolves the provider from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the provider cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let http = Client::builder().timeout(config.provider_timeout).build()?;

        for kind in &config.provider_order {
            match kind {
                ProviderKind::Twilio => {
                    if let Some(twilio) = &config.twilio {
                        return Ok(Self::with_provider(Box::new(TwilioProvider::new(
                            http,
                            twilio.clone(),
                        ))));
                    }
                }
                ProviderKind::Piopiy => {
                    if let Some(piopiy) = &config.piopiy {
                        return Ok(Self::with_provider(Box::new(PiopiyProvider::new(
                            http,
                            piopiy.clone(),
                        ))));
                    }
                }
            }
        }

        info!("No SMS provider configured, messages will be simulated");
        Ok(Self::simulated())
    }

    #[must_use]
    pub fn with_provider(provider: Box<dyn SmsProvider>) -> Self {
        info!(provider = provider.name(), "SMS provider selected");
        Self { provider }
    }

    #[must_use]
    pub fn simulated() -> Self {
        Self::with_provider(Box::new(SimulatedProvider))
    }

    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

#[async_trait]
impl SmsSender for Notifier {
    async fn send(&self, to: &str, message: &str) -> Delivery {
        let provider = self.provider.name();

        match self.provider.deliver(to, message).await {
            Ok(detail) => {
                info!(provider, to = %to, "SMS delivered");
                Delivery::delivered(provider, detail)
            }
            Err(e) => {
                warn!(provider, to = %to, error = %e, "SMS delivery failed");
                Delivery::failed(provider, e.to_string())
            }
        }
    }
}
