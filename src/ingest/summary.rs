use serde::Serialize;

use crate::sms::Delivery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Sent,
    NotificationFailed,
    Skipped,
    Malformed,
}

/// What happened to one data row. `row` is 1-based and excludes the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub row: usize,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RowReport {
    #[must_use]
    pub fn notified(row: usize, phone: &str, delivery: &Delivery) -> Self {
        Self {
            row,
            status: if delivery.delivered {
                RowStatus::Sent
            } else {
                RowStatus::NotificationFailed
            },
            phone: Some(phone.to_string()),
            detail: Some(delivery.detail.clone()),
        }
    }

    #[must_use]
    pub fn skipped(row: usize) -> Self {
        Self {
            row,
            status: RowStatus::Skipped,
            phone: None,
            detail: Some("missing phone".to_string()),
        }
    }

    #[must_use]
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Self {
            row,
            status: RowStatus::Malformed,
            phone: None,
            detail: Some(reason.into()),
        }
    }
}

/// Per-upload tally returned by the ingestion pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub total_rows: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub rows: Vec<RowReport>,
}

impl IngestSummary {
    pub fn record(&mut self, report: RowReport) {
        self.total_rows += 1;
        match report.status {
            RowStatus::Sent => self.sent += 1,
            RowStatus::NotificationFailed => self.failed += 1,
            RowStatus::Skipped => self.skipped += 1,
            RowStatus::Malformed => self.malformed += 1,
        }
        self.rows.push(report);
    }

    /// Number of leads written to the store; notification outcome is irrelevant.
    #[must_use]
    pub fn stored(&self) -> usize {
        self.sent + self.failed
    }
}
