//! HTTP API and request processing

pub mod handler;
pub mod helpers;
pub mod server;
pub mod upload;

pub use handler::configure;
pub use server::{AppState, start_server};
