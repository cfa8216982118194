use csv::{ReaderBuilder, Trim};
use tracing::{info, warn};

use super::summary::{IngestSummary, RowReport};
use crate::core::LeadStore;
use crate::core::models::{LeadRow, NewLead};
use crate::errors::AppError;
use crate::sms::SmsSender;

/// Builds the text sent to every lead.
#[must_use]
pub fn notification_message(name: &str, project: &str) -> String {
    format!("Hello {name}, thanks for showing interest in {project}")
}

/// Row-by-row CSV ingestion: notify, then persist.
pub struct IngestPipeline<'a> {
    sender: &'a dyn SmsSender,
    store: &'a LeadStore,
}

impl<'a> IngestPipeline<'a> {
    #[must_use]
    pub fn new(sender: &'a dyn SmsSender, store: &'a LeadStore) -> Self {
        Self { sender, store }
    }

    /// Processes every data row of `csv`.
    ///
    /// Rows without a phone number are skipped; rows that cannot be decoded
    /// are reported as malformed. Every other row is notified and then stored,
    /// whatever the notification outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the header line cannot be read, or if the lead
    /// store fails. Rows already stored stay stored.
    #[tracing::instrument(level = "info", skip_all, fields(bytes = csv.len()))]
    pub async fn process(&self, csv: &[u8]) -> Result<IngestSummary, AppError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(csv);

        let headers = reader
            .headers()
            .map_err(|e| AppError::Csv(format!("Failed to read CSV headers: {e}")))?
            .clone();

        let mut summary = IngestSummary::default();

        for (index, record) in reader.records().enumerate() {
            let row = index + 1;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(row, error = %e, "Skipping unreadable CSV row");
                    summary.record(RowReport::malformed(row, e.to_string()));
                    continue;
                }
            };

            let lead_row = LeadRow::from_record(&headers, &record);

            let Some(phone) = lead_row.phone() else {
                summary.record(RowReport::skipped(row));
                continue;
            };

            let message = notification_message(lead_row.name(), lead_row.project());
            let delivery = self.sender.send(phone, &message).await;

            self.store
                .append(NewLead {
                    name: lead_row.name().to_string(),
                    phone: phone.to_string(),
                    project: lead_row.project().to_string(),
                })
                .await?;

            summary.record(RowReport::notified(row, phone, &delivery));
        }

        info!(
            total = summary.total_rows,
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            malformed = summary.malformed,
            "CSV processed"
        );

        Ok(summary)
    }
}
