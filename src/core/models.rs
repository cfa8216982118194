use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use serde::{Deserialize, Deserializer, Serialize};

/// A persisted lead. Field order matches the stored JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub project: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Parses a stored timestamp. RFC 3339 values keep their offset; ISO 8601
/// values without one are read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
}

/// A lead that has not been persisted yet and therefore has no timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    pub project: String,
}

impl NewLead {
    #[must_use]
    pub fn stamp(self, timestamp: DateTime<Utc>) -> Lead {
        Lead {
            name: self.name,
            phone: self.phone,
            project: self.project,
            timestamp,
        }
    }
}

/// One CSV row, looked up by header name. Any column may be missing.
#[derive(Debug, Default)]
pub struct LeadRow {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub project: Option<String>,
}

impl LeadRow {
    /// Picks the lead columns out of `record`. When a header repeats, the
    /// last column with that name wins.
    #[must_use]
    pub fn from_record(headers: &StringRecord, record: &StringRecord) -> Self {
        let cell = |column: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == column)
                .map(|(index, _)| index)
                .last()
                .and_then(|index| record.get(index))
                .map(str::to_string)
        };

        Self {
            name: cell("name"),
            phone: cell("phone"),
            project: cell("project"),
        }
    }

    /// The destination number, or `None` when the cell is missing or blank.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().map_or("", str::trim)
    }

    #[must_use]
    pub fn project(&self) -> &str {
        self.project.as_deref().map_or("", str::trim)
    }
}

/// Body of `POST /send`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SmsRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub message: String,
}
