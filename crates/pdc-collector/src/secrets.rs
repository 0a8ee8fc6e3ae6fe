//! Secret store and token sealing
//!
//! The host platform's credential store is modeled as an opaque
//! key-value secret service: get/put/delete of a string payload by
//! identifier. The default implementation is a JSON file in the state
//! directory with owner-only permissions; the trait boundary exists so a
//! platform-native store can be substituted.
//!
//! Sealing follows the upstream credential flow: a plaintext token in
//! the run configuration is written into the store keyed by base URL,
//! and the operator is expected to replace the configured value with the
//! mask sentinel. The token used for requests is always the one read
//! back from the store.

use crate::error::{CollectorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Sentinel standing in for a token that has been sealed into the store
pub const MASK: &str = "***ENCRYPTED***";

/// Secret store file name within the state directory
pub const SECRET_STORE_FILE: &str = "secrets.json";

/// Credential payload stored under the base-URL key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedCredentials {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "apiToken")]
    pub api_token: String,
}

/// Opaque secret storage keyed by identifier
pub trait SecretStore {
    /// Read the payload stored under `id`, if any
    fn get(&self, id: &str) -> Result<Option<String>>;

    /// Store `value` under `id`, replacing any previous payload
    fn put(&mut self, id: &str, value: &str) -> Result<()>;

    /// Remove the payload stored under `id`; removing a missing entry is
    /// not an error
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// File-backed secret store (JSON map, owner-only permissions)
pub struct FileSecretStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileSecretStore {
    /// Open the store at `path`, creating an empty one if absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)
                .map_err(|e| CollectorError::secret(format!("corrupt secret store: {}", e)))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, raw)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, id: &str) -> Result<Option<String>> {
        Ok(self.entries.get(id).cloned())
    }

    fn put(&mut self, id: &str, value: &str) -> Result<()> {
        self.entries.insert(id.to_string(), value.to_string());
        self.persist()
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        if self.entries.remove(id).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// In-memory secret store for tests
#[derive(Default)]
pub struct MemorySecretStore {
    entries: BTreeMap<String, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, id: &str) -> Result<Option<String>> {
        Ok(self.entries.get(id).cloned())
    }

    fn put(&mut self, id: &str, value: &str) -> Result<()> {
        self.entries.insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.entries.remove(id);
        Ok(())
    }
}

/// Resolve the bearer token for a run, sealing a plaintext token first
///
/// If the configured token is not the mask sentinel it is written into
/// the store under the base-URL key (replacing any stale entry). The
/// returned token is always the one read back from the store; a masked
/// configuration with no stored entry is an error.
pub fn resolve_token(
    store: &mut dyn SecretStore,
    base_url: &str,
    configured_token: &str,
) -> Result<String> {
    if configured_token != MASK {
        store.delete(base_url)?;
        let sealed = SealedCredentials {
            base_url: base_url.to_string(),
            api_token: configured_token.to_string(),
        };
        store.put(base_url, &serde_json::to_string(&sealed)?)?;
        warn!(
            base_url,
            "api_token sealed into the secret store; replace the configured value with \"{}\"",
            MASK
        );
    } else {
        debug!(base_url, "using sealed credentials");
    }

    let raw = store.get(base_url)?.ok_or_else(|| {
        CollectorError::secret(format!(
            "no sealed credentials for {}; configure a plaintext api_token once to seal it",
            base_url
        ))
    })?;

    let sealed: SealedCredentials = serde_json::from_str(&raw)
        .map_err(|e| CollectorError::secret(format!("corrupt sealed credentials: {}", e)))?;

    Ok(sealed.api_token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BASE: &str = "https://acme.my.onetrust.com";

    #[test]
    fn test_seal_and_resolve_round_trip() {
        let mut store = MemorySecretStore::new();
        let token = resolve_token(&mut store, BASE, "plain-token").unwrap();
        assert_eq!(token, "plain-token");

        // Subsequent masked runs read the sealed value
        let token = resolve_token(&mut store, BASE, MASK).unwrap();
        assert_eq!(token, "plain-token");
    }

    #[test]
    fn test_sealing_is_idempotent() {
        let mut store = MemorySecretStore::new();
        resolve_token(&mut store, BASE, "plain-token").unwrap();
        let before = store.get(BASE).unwrap();

        resolve_token(&mut store, BASE, MASK).unwrap();
        resolve_token(&mut store, BASE, MASK).unwrap();

        assert_eq!(store.get(BASE).unwrap(), before);
    }

    #[test]
    fn test_reseal_replaces_stale_entry() {
        let mut store = MemorySecretStore::new();
        resolve_token(&mut store, BASE, "old-token").unwrap();
        let token = resolve_token(&mut store, BASE, "new-token").unwrap();
        assert_eq!(token, "new-token");
        assert_eq!(resolve_token(&mut store, BASE, MASK).unwrap(), "new-token");
    }

    #[test]
    fn test_masked_without_entry_is_an_error() {
        let mut store = MemorySecretStore::new();
        let result = resolve_token(&mut store, BASE, MASK);
        assert!(matches!(result, Err(CollectorError::Secret(_))));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.json");

        {
            let mut store = FileSecretStore::open(&path).unwrap();
            resolve_token(&mut store, BASE, "persisted-token").unwrap();
        }

        let mut store = FileSecretStore::open(&path).unwrap();
        assert_eq!(
            resolve_token(&mut store, BASE, MASK).unwrap(),
            "persisted-token"
        );
    }

    #[test]
    fn test_file_store_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSecretStore::open(dir.path().join("secrets.json")).unwrap();
        store.delete("missing").unwrap();
        store.put("a", "1").unwrap();
        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
