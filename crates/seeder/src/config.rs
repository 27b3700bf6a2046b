//! Emulator configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `FIRESTORE_EMULATOR_HOST` - Emulator address as `host:port` (default: localhost:8080)
//! - `FIRESTORE_PROJECT_ID` - Project the seed data belongs to (default: tandberg-pantry)
//! - `FIRESTORE_EMULATOR_TOKEN` - Bearer token sent with every request (default: owner,
//!   which the emulator treats as an admin that bypasses security rules)
//! - `FIRESTORE_PAGE_SIZE` - Documents fetched per list request (default: 300, max: 1000)

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_EMULATOR_HOST: &str = "localhost:8080";
pub const DEFAULT_PROJECT_ID: &str = "tandberg-pantry";
const DEFAULT_TOKEN: &str = "owner";
const DEFAULT_PAGE_SIZE: u32 = 300;
const MAX_PAGE_SIZE: u32 = 1000;

/// Hosts treated as a local emulator without a warning.
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "0.0.0.0"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the emulator lives and how to talk to it.
#[derive(Clone)]
pub struct EmulatorConfig {
    /// `host:port` of the emulator
    pub host: String,
    /// Project ID used in every document path
    pub project_id: String,
    /// Bearer token for the `Authorization` header
    pub token: SecretString,
    /// Page size for collection listing
    pub page_size: u32,
}

impl std::fmt::Debug for EmulatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmulatorConfig")
            .field("host", &self.host)
            .field("project_id", &self.project_id)
            .field("token", &"[REDACTED]")
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_EMULATOR_HOST.to_owned(),
            project_id: DEFAULT_PROJECT_ID.to_owned(),
            token: SecretString::from(DEFAULT_TOKEN),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl EmulatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("FIRESTORE_EMULATOR_HOST")
            .unwrap_or_else(|| DEFAULT_EMULATOR_HOST.to_owned());
        validate_host(&host)?;
        if !is_local(&host) {
            tracing::warn!(%host, "FIRESTORE_EMULATOR_HOST does not look like a local emulator");
        }

        let project_id =
            lookup("FIRESTORE_PROJECT_ID").unwrap_or_else(|| DEFAULT_PROJECT_ID.to_owned());
        validate_project_id(&project_id)?;

        let token = lookup("FIRESTORE_EMULATOR_TOKEN")
            .map_or_else(|| SecretString::from(DEFAULT_TOKEN), SecretString::from);

        let page_size = match lookup("FIRESTORE_PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            host,
            project_id,
            token,
            page_size,
        })
    }

    /// Root URL for document paths:
    /// `http://{host}/v1/projects/{project}/databases/(default)/documents`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the host does not form a valid URL.
    pub fn documents_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&format!("http://{}/", self.host)).map_err(|e| {
            ConfigError::InvalidEnvVar("FIRESTORE_EMULATOR_HOST".to_string(), e.to_string())
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                ConfigError::InvalidEnvVar(
                    "FIRESTORE_EMULATOR_HOST".to_string(),
                    "cannot be a base URL".to_string(),
                )
            })?
            .pop_if_empty()
            .push("v1")
            .extend(self.database_name().split('/'))
            .push("documents");
        Ok(url)
    }

    /// Resource name of the database:
    /// `projects/{project}/databases/(default)`.
    #[must_use]
    pub fn database_name(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }
}

/// Check that the host is `host:port` with a numeric port.
fn validate_host(host: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar("FIRESTORE_EMULATOR_HOST".to_string(), reason.to_string())
    };

    if host.contains("://") {
        return Err(invalid("must be host:port without a scheme"));
    }
    let (name, port) = host.rsplit_once(':').ok_or_else(|| invalid("missing :port"))?;
    if name.is_empty() {
        return Err(invalid("missing host name"));
    }
    port.parse::<u16>()
        .map_err(|e| invalid(&format!("invalid port {port:?}: {e}")))?;
    Ok(())
}

fn is_local(host: &str) -> bool {
    host.rsplit_once(':')
        .is_some_and(|(name, _)| LOCAL_HOSTS.contains(&name))
}

/// Project IDs are lowercase letters, digits and hyphens.
fn validate_project_id(project_id: &str) -> Result<(), ConfigError> {
    let valid = !project_id.is_empty()
        && project_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(ConfigError::InvalidEnvVar(
            "FIRESTORE_PROJECT_ID".to_string(),
            format!("{project_id:?} must be lowercase letters, digits and hyphens"),
        ));
    }
    Ok(())
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidEnvVar("FIRESTORE_PAGE_SIZE".to_string(), reason);
    let size = raw.parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE}")));
    }
    Ok(size)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<EmulatorConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EmulatorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "localhost:8080");
        assert_eq!(config.project_id, "tandberg-pantry");
        assert_eq!(config.token.expose_secret(), "owner");
        assert_eq!(config.page_size, 300);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FIRESTORE_EMULATOR_HOST", "127.0.0.1:9090"),
            ("FIRESTORE_PROJECT_ID", "demo-pantry"),
            ("FIRESTORE_PAGE_SIZE", "50"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1:9090");
        assert_eq!(config.project_id, "demo-pantry");
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_documents_url() {
        let config = EmulatorConfig::default();
        assert_eq!(
            config.documents_url().unwrap().as_str(),
            "http://localhost:8080/v1/projects/tandberg-pantry/databases/(default)/documents"
        );
    }

    #[test]
    fn test_rejects_scheme_in_host() {
        assert!(load(&[("FIRESTORE_EMULATOR_HOST", "http://localhost:8080")]).is_err());
    }

    #[test]
    fn test_rejects_missing_port() {
        assert!(load(&[("FIRESTORE_EMULATOR_HOST", "localhost")]).is_err());
        assert!(load(&[("FIRESTORE_EMULATOR_HOST", "localhost:http")]).is_err());
    }

    #[test]
    fn test_rejects_bad_project_id() {
        assert!(load(&[("FIRESTORE_PROJECT_ID", "Tandberg Pantry")]).is_err());
        assert!(load(&[("FIRESTORE_PROJECT_ID", "")]).is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(load(&[("FIRESTORE_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("FIRESTORE_PAGE_SIZE", "1001")]).is_err());
        assert!(load(&[("FIRESTORE_PAGE_SIZE", "1000")]).is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = load(&[("FIRESTORE_EMULATOR_TOKEN", "super-secret-value")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_local_hosts() {
        assert!(is_local("localhost:8080"));
        assert!(is_local("[::1]:8080"));
        assert!(!is_local("firestore.example.com:443"));
    }
}
