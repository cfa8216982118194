//! Lead intake - accepts CSV uploads of prospects, texts each one and keeps a
//! record of every lead.
//!
//! # Architecture
//!
//! - [`sms`]: the `Notifier`, which picks Twilio, Piopiy or a simulated
//!   provider once at startup and reports every send as a `Delivery`
//! - [`core::LeadStore`]: an append-only JSON file of leads
//! - [`ingest`]: the row-by-row pipeline driving both of the above
//! - [`api`]: the actix-web surface (`/upload_csv`, `/leads`, `/send`, ...)
//!
//! # Example
//!
//! ```no_run
//! use lead_intake::core::LeadStore;
//! use lead_intake::ingest::IngestPipeline;
//! use lead_intake::sms::Notifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     lead_intake::setup_logging();
//!
//!     let store = LeadStore::open("leads.json").await?;
//!     let notifier = Notifier::simulated();
//!
//!     let csv = b"name,phone,project\nAlice,+1555000111,SolarRoof\n";
//!     let summary = IngestPipeline::new(&notifier, &store).process(csv).await?;
//!     println!("stored {} leads", summary.stored());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod core;
pub mod errors;
pub mod ingest;
pub mod sms;
pub mod utils;

/// Configure structured logging with JSON output.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; only the first call installs a subscriber.
///
/// # Example
///
/// ```
/// lead_intake::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
