//! Runtime configuration read from the environment.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const HEALTH_PORT: u16 = 8080;

/// Ports and certificate locations for the webhook process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Port of the TLS admission endpoint
    pub webhook_port: u16,
    /// Port of the health and metrics endpoint
    pub health_port: u16,
    /// PEM certificate served by the admission endpoint
    pub cert_path: PathBuf,
    /// PEM private key for `cert_path`
    pub key_path: PathBuf,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            webhook_port: WEBHOOK_PORT,
            health_port: HEALTH_PORT,
            cert_path: PathBuf::from(WEBHOOK_CERT_PATH),
            key_path: PathBuf::from(WEBHOOK_KEY_PATH),
        }
    }
}

impl WebhookConfig {
    /// Build a configuration from `WEBHOOK_PORT`, `HEALTH_PORT`,
    /// `WEBHOOK_CERT_PATH` and `WEBHOOK_KEY_PATH`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            webhook_port: parse_port(&lookup, "WEBHOOK_PORT", defaults.webhook_port)?,
            health_port: parse_port(&lookup, "HEALTH_PORT", defaults.health_port)?,
            cert_path: lookup("WEBHOOK_CERT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cert_path),
            key_path: lookup("WEBHOOK_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.key_path),
        })
    }

    /// Whether both TLS files exist on disk.
    pub fn tls_available(&self) -> bool {
        self.cert_path.exists() && self.key_path.exists()
    }
}

fn parse_port<F>(lookup: &F, key: &str, default: u16) -> Result<u16>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} must be a port number, got {:?}: {}", key, value, e))),
        None => Ok(default),
    }
}
