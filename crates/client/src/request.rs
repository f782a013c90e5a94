//! Request descriptors

use crate::{ClientError, Headers};
use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;

/// Everything needed to issue, and re-issue, one API call
///
/// The body is held as [`Bytes`] so a retry after a session refresh sends
/// exactly what the first attempt sent.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Headers,
    pub body: Option<Bytes>,
    /// Never attempt a session refresh for this call
    pub skip_auth: bool,
    /// Never force a logout when this call ends unauthorized
    pub skip_auth_redirect: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub const fn new(method: Method) -> Self {
        Self {
            method,
            headers: Headers::new(),
            body: None,
            skip_auth: false,
            skip_auth_redirect: false,
        }
    }

    pub const fn get() -> Self {
        Self::new(Method::GET)
    }

    pub const fn post() -> Self {
        Self::new(Method::POST)
    }

    pub const fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub const fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub const fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Set a single header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merge a header list, map or `HeaderMap` into the request headers
    #[must_use]
    pub fn headers(mut self, headers: impl Into<Headers>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Use raw bytes as the request body
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Use a text body
    #[must_use]
    pub fn text(self, body: impl Into<String>) -> Self {
        self.body(body.into())
    }

    /// Serialize `value` as the JSON request body
    ///
    /// Sets `content-type: application/json` unless the caller already chose
    /// a content type.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, ClientError> {
        let body = serde_json::to_vec(value)?;
        if !self.headers.contains("content-type") {
            self.headers.insert("content-type", "application/json");
        }
        Ok(self.body(body))
    }

    #[must_use]
    pub const fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    #[must_use]
    pub const fn skip_auth_redirect(mut self) -> Self {
        self.skip_auth_redirect = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.headers.is_empty());
        assert!(options.body.is_none());
        assert!(!options.skip_auth);
        assert!(!options.skip_auth_redirect);
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let options = RequestOptions::post()
            .json(&json!({"name": "Paracetamol", "stock": 40}))
            .unwrap();

        assert_eq!(options.headers.get("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(options.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["name"], "Paracetamol");
    }

    #[test]
    fn test_json_keeps_explicit_content_type() {
        let options = RequestOptions::post()
            .header("Content-Type", "application/merge-patch+json")
            .json(&json!({"stock": 12}))
            .unwrap();

        assert_eq!(
            options.headers.get("content-type"),
            Some("application/merge-patch+json")
        );
    }

    #[test]
    fn test_flags() {
        let options = RequestOptions::delete().skip_auth().skip_auth_redirect();
        assert_eq!(options.method, Method::DELETE);
        assert!(options.skip_auth);
        assert!(options.skip_auth_redirect);
    }
}
