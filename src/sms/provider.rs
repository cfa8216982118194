use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;

/// A concrete SMS delivery backend.
///
/// Implementations make exactly one attempt per call and report any failure
/// as an error; the [`Notifier`](super::Notifier) turns those into
/// [`Delivery`](super::Delivery) values.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Sends `body` to `to`, returning the provider's diagnostic on success.
    async fn deliver(&self, to: &str, body: &str) -> Result<String, AppError>;
}

/// Used when no provider is configured. Always succeeds.
#[derive(Debug, Default)]
pub struct SimulatedProvider;

#[async_trait]
impl SmsProvider for SimulatedProvider {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn deliver(&self, to: &str, body: &str) -> Result<String, AppError> {
        info!(to = %to, message = %body, "Simulated SMS");
        Ok("Simulated".to_string())
    }
}
