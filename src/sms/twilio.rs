//! Twilio Programmable Messaging client (primary provider).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::provider::SmsProvider;
use crate::core::config::TwilioConfig;
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

pub struct TwilioProvider {
    http: Client,
    config: TwilioConfig,
}

impl TwilioProvider {
    #[must_use]
    pub fn new(http: Client, config: TwilioConfig) -> Self {
        Self { http, config }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsProvider for TwilioProvider {
    fn name(&self) -> &'static str {
        "twilio"
    }

    async fn deliver(&self, to: &str, body: &str) -> Result<String, AppError> {
        let from = self
            .config
            .from_number
            .as_deref()
            .ok_or_else(|| AppError::Config("TWILIO_PHONE_NUMBER is not set".to_string()))?;

        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", to), ("From", from), ("Body", body)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            let reason = serde_json::from_str::<TwilioErrorBody>(&body_text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body_text);
            return Err(AppError::Provider(format!("Twilio returned {status}: {reason}")));
        }

        // The message SID is informational only; an unparseable body still
        // means Twilio accepted the message.
        if let Ok(TwilioMessage { sid: Some(sid) }) = resp.json::<TwilioMessage>().await {
            debug!(message_sid = %sid, "Twilio accepted message");
        }

        Ok("SMS sent via Twilio".to_string())
    }
}
