//! Piopiy SMS gateway client (secondary provider).

use async_trait::async_trait;
use reqwest::Client;

use super::provider::SmsProvider;
use crate::core::config::PiopiyConfig;
use crate::errors::AppError;

pub struct PiopiyProvider {
    http: Client,
    config: PiopiyConfig,
}

impl PiopiyProvider {
    #[must_use]
    pub fn new(http: Client, config: PiopiyConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl SmsProvider for PiopiyProvider {
    fn name(&self) -> &'static str {
        "piopiy"
    }

    async fn deliver(&self, to: &str, body: &str) -> Result<String, AppError> {
        let url = format!("{}/api/send", self.config.api_base.trim_end_matches('/'));
        let resp = self
            .http
            .get(url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("phone", to),
                ("message", body),
            ])
            .send()
            .await?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());

        if !status.is_success() {
            return Err(AppError::Provider(format!("Piopiy returned {status}: {text}")));
        }

        let text = text.trim();
        if text.is_empty() {
            Ok("SMS sent via Piopiy".to_string())
        } else {
            Ok(text.to_string())
        }
    }
}
