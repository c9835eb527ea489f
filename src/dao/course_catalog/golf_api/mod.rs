mod client;
mod config;
mod error;
mod models;

pub use client::GolfApiCatalog;
pub use config::GolfApiConfig;
pub use error::GolfApiError;
