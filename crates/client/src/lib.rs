//! MediBuddy admin API client
//!
//! Every console page talks to the backend through [`ApiClient::request`]. The
//! client includes session cookies on every call, refreshes an expired session
//! once when the backend answers 401/403, and hands a dead session over to the
//! [`Platform`] for a forced logout.

#[macro_use]
extern crate tracing;

mod client;
pub mod error;
pub mod global;
pub mod headers;
pub mod platform;
mod refresh;
pub mod request;
pub mod session;
mod unauthorized;
pub mod url;

pub use client::{ApiClient, ApiClientBuilder, ApiErrorBody};
pub use error::ClientError;
pub use headers::Headers;
pub use platform::{HeadlessPlatform, Platform};
pub use request::RequestOptions;
pub use session::SessionState;

#[cfg(target_arch = "wasm32")]
pub use platform::WebPlatform;

pub use medibuddy_core::ClientConfig;

// Re-export the HTTP types callers handle directly
pub use reqwest::{Method, Response, StatusCode};
