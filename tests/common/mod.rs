#![allow(dead_code)]

use async_trait::async_trait;
use lead_intake::sms::{Delivery, SmsSender};
use std::sync::Mutex;

/// Records every send and answers with a fixed outcome.
pub struct RecordingSender {
    deliver: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn succeeding() -> Self {
        Self {
            deliver: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            deliver: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for RecordingSender {
    async fn send(&self, to: &str, message: &str) -> Delivery {
        self.calls
            .lock()
            .unwrap()
            .push((to.to_string(), message.to_string()));

        if self.deliver {
            Delivery::delivered("recording", "recorded")
        } else {
            Delivery::failed("recording", "provider unavailable")
        }
    }
}

pub const BOUNDARY: &str = "----lead-intake-test-boundary";

/// Builds a multipart/form-data body with one part per `(field, filename, content)`.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\nContent-Type: text/csv\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
