//! # API Key Directory
//!
//! Alternate authentication scheme for service callers that cannot hold
//! a session: a fixed set of keys from configuration, presented in the
//! `X-API-Key` header. Each key maps to a service name used as the
//! caller identity.

use super::errors::{AuthError, AuthResult};

/// One registered key
#[derive(Debug, Clone)]
struct ApiKeyEntry {
    key: String,
    service: String,
}

/// In-memory directory of registered API keys
#[derive(Debug, Clone, Default)]
pub struct ApiKeyDirectory {
    entries: Vec<ApiKeyEntry>,
}

impl ApiKeyDirectory {
    /// Build the directory from a `key:service` spec string.
    ///
    /// Entries without a service name are skipped; an empty spec yields
    /// an empty directory, which rejects every key.
    pub fn from_spec(spec: &str) -> Self {
        let entries = spec
            .split(',')
            .filter_map(|entry| {
                let (key, service) = entry.trim().split_once(':')?;
                if key.is_empty() || service.is_empty() {
                    return None;
                }
                Some(ApiKeyEntry {
                    key: key.to_string(),
                    service: service.to_string(),
                })
            })
            .collect();

        Self { entries }
    }

    /// Resolve a presented key to its service name
    pub fn validate(&self, key: &str) -> AuthResult<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.service.as_str())
            .ok_or(AuthError::InvalidApiKey)
    }
}
