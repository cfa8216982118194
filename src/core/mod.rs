//! Configuration, domain models and lead persistence

pub mod config;
pub mod lead_store;
pub mod models;

pub use lead_store::LeadStore;
