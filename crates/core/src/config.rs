//! Configuration management for the MediBuddy API client

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Environment variable prefix for all client settings
pub const ENV_PREFIX: &str = "MEDIBUDDY";

/// Default session refresh endpoint
pub const DEFAULT_REFRESH_PATH: &str = "/api/auth/refresh";

/// Default session logout endpoint
pub const DEFAULT_LOGOUT_PATH: &str = "/api/auth/logout";

/// Default application root the console navigates to on session loss
pub const DEFAULT_APP_ROOT: &str = "/";

/// API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL. When unset, requests are same-origin relative.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Path of the session refresh endpoint
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Path of the session logout endpoint
    #[serde(default = "default_logout_path")]
    pub logout_path: String,

    /// Application root used for forced navigation
    #[serde(default = "default_app_root")]
    pub app_root: String,

    /// User agent sent on native targets
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds (ignored on wasm32)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

fn default_logout_path() -> String {
    DEFAULT_LOGOUT_PATH.to_string()
}

fn default_app_root() -> String {
    DEFAULT_APP_ROOT.to_string()
}

fn default_user_agent() -> String {
    format!("medibuddy-admin/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        // Build-time injection is the only environment a wasm bundle has
        let base_url = option_env!("MEDIBUDDY_BASE_URL")
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Self {
            base_url,
            refresh_path: default_refresh_path(),
            logout_path: default_logout_path(),
            app_root: default_app_root(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from file, overlaid with `MEDIBUDDY_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> CoreResult<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with defaults and `MEDIBUDDY_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = ::config::Config::builder()
            .set_default("refresh_path", defaults.refresh_path)?
            .set_default("logout_path", defaults.logout_path)?
            .set_default("app_root", defaults.app_root)?
            .set_default("user_agent", defaults.user_agent)?;
        if let Some(base_url) = defaults.base_url {
            builder = builder.set_default("base_url", base_url)?;
        }

        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that endpoint paths are usable
    ///
    /// # Errors
    ///
    /// Returns an error naming the first empty path setting
    pub fn validate(&self) -> CoreResult<()> {
        for (name, value) in [
            ("refresh_path", &self.refresh_path),
            ("logout_path", &self.logout_path),
            ("app_root", &self.app_root),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::invalid_config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.refresh_path, "/api/auth/refresh");
        assert_eq!(config.logout_path, "/api/auth/logout");
        assert_eq!(config.app_root, "/");
        assert!(config.user_agent.starts_with("medibuddy-admin/"));
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_from_env_matches_defaults() {
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_file() {
        let file = write_config(
            r#"
base_url = "https://api.medibuddy.test/"
refresh_path = "/auth/refresh"
timeout_secs = 15
"#,
        );

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://api.medibuddy.test/")
        );
        assert_eq!(config.refresh_path, "/auth/refresh");
        assert_eq!(config.logout_path, DEFAULT_LOGOUT_PATH);
        assert_eq!(config.timeout_secs, Some(15));
    }

    #[test]
    fn test_from_file_rejects_empty_path() {
        let file = write_config("logout_path = \"  \"\n");

        let result = ClientConfig::from_file(file.path());
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let result = ClientConfig::from_file("/nonexistent/medibuddy.toml");
        assert!(matches!(result, Err(CoreError::ConfigSource(_))));
    }
}
