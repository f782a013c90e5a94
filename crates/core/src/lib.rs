//! MediBuddy core configuration and utilities

pub mod config;
pub mod error;
pub mod logging;

pub use config::ClientConfig;
pub use error::{CoreError, CoreResult};
