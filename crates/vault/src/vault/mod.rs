//! Request orchestration: mode routing glued to the object store.
//!
//! Each call is independent. The vault holds only shared read-only state (the
//! store handle and the key), so clones can serve requests concurrently.

pub mod error;

pub use error::VaultError;

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, warn};

use crate::key::KeyManager;
use crate::mode::{self, EncryptionMode, StoredMode, ORIGINAL_NAME_META_KEY};
use crate::storage::StorageGateway;

/// Longest ciphertext preview (in base64 characters) returned after an upload.
pub const PREVIEW_LEN: usize = 512;

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub storage_key: String,
    pub original_name: String,
    pub mode: EncryptionMode,
    /// Bytes handed to the store.
    pub size: usize,
    /// Truncated base64 of the stored envelope (caller-managed only).
    pub ciphertext_preview: Option<String>,
}

/// Result of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedObject {
    /// Name to present the object under.
    pub name: String,
    pub mode: StoredMode,
    pub plaintext: Vec<u8>,
}

/// Cheaply cloneable handle combining the store, the key, and write defaults.
#[derive(Clone)]
pub struct ObjectVault {
    store: Arc<dyn StorageGateway>,
    keys: KeyManager,
    default_provider_key_id: Option<String>,
}

impl ObjectVault {
    /// Create a vault over `store`.
    ///
    /// `default_provider_key_id` is used for provider-managed uploads that do
    /// not name a key id themselves.
    pub fn new(
        store: Arc<dyn StorageGateway>,
        keys: KeyManager,
        default_provider_key_id: Option<String>,
    ) -> Self {
        Self {
            store,
            keys,
            default_provider_key_id: default_provider_key_id.filter(|id| !id.trim().is_empty()),
        }
    }

    /// Protect and store `plaintext` under the mode named by `method`.
    ///
    /// # Errors
    ///
    /// Mode errors for an unknown method, a missing provider key id, or an
    /// unusable name; storage errors from the store.
    pub async fn upload(
        &self,
        name: &str,
        plaintext: Vec<u8>,
        method: &str,
        key_id: Option<&str>,
    ) -> Result<UploadReceipt, VaultError> {
        let key_id = key_id
            .filter(|id| !id.trim().is_empty())
            .or(self.default_provider_key_id.as_deref());
        let mode = EncryptionMode::from_request(method, key_id)?;
        let plan = mode::route_write(self.keys.current(), plaintext, &mode, name)?;

        let size = plan.body.len();
        let ciphertext_preview = match mode {
            EncryptionMode::CallerManaged => Some(preview(&plan.body)),
            EncryptionMode::ProviderManaged { .. } => None,
        };

        self.store
            .put(&plan.storage_key, plan.body, plan.metadata, plan.provider_key_id)
            .await?;
        info!(storage_key = %plan.storage_key, mode = %mode, size, "object uploaded");

        Ok(UploadReceipt {
            storage_key: plan.storage_key,
            original_name: plan.original_name,
            mode,
            size,
            ciphertext_preview,
        })
    }

    /// Fetch `storage_key` and recover its plaintext.
    ///
    /// # Errors
    ///
    /// Storage errors unchanged (including `NotFound`), an unknown `cipher` tag,
    /// or a decryption failure. A failed decryption is never reported as a
    /// missing object or an empty body.
    pub async fn download(&self, storage_key: &str) -> Result<DownloadedObject, VaultError> {
        let object = self.store.get(storage_key).await?;

        let name = object
            .metadata
            .get(ORIGINAL_NAME_META_KEY)
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| base_name(storage_key).to_owned());

        let outcome = mode::route_read(
            self.keys.current(),
            &object.key,
            object.body,
            &object.metadata,
        )
        .map_err(|e| {
            warn!(storage_key, error = %e, "cannot decrypt object");
            e
        })?;
        info!(storage_key, mode = %outcome.mode, "object downloaded");

        Ok(DownloadedObject {
            name,
            mode: outcome.mode,
            plaintext: outcome.plaintext,
        })
    }

    /// List up to `max` storage keys under `prefix`.
    pub async fn list(&self, prefix: &str, max: i32) -> Result<Vec<String>, VaultError> {
        Ok(self.store.list(prefix, max).await?)
    }
}

fn base_name(storage_key: &str) -> &str {
    storage_key.rsplit('/').next().unwrap_or(storage_key)
}

fn preview(body: &[u8]) -> String {
    let mut encoded = STANDARD.encode(body);
    if encoded.len() > PREVIEW_LEN {
        encoded.truncate(PREVIEW_LEN);
        encoded.push_str("...(truncated)");
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{CryptoError, KEY_LEN};
    use crate::key::CustomerKey;
    use crate::mode::{Metadata, ModeError, RouteError};
    use crate::storage::memory::MemoryStore;
    use crate::storage::{MockStorageGateway, StorageError};

    fn keys(fill: u8) -> KeyManager {
        KeyManager::from(CustomerKey::from_bytes(&[fill; KEY_LEN]).unwrap())
    }

    fn vault_over(store: Arc<MemoryStore>) -> ObjectVault {
        ObjectVault::new(store, keys(0x42), Some("default-kms-key".into()))
    }

    #[tokio::test]
    async fn caller_managed_end_to_end() {
        let store = Arc::new(MemoryStore::default());
        let vault = vault_over(store.clone());

        let receipt = vault
            .upload("notes.txt", b"hello world".to_vec(), "caller", None)
            .await
            .unwrap();
        assert_eq!(receipt.storage_key, "caller/notes.txt");
        assert_eq!(receipt.size, 39);

        let entry = store.entry("caller/notes.txt").unwrap();
        assert_eq!(entry.body.len(), 39);
        assert_eq!(
            entry.metadata,
            Metadata::from([
                ("cipher".to_owned(), "aes-256-gcm".to_owned()),
                ("original_name".to_owned(), "notes.txt".to_owned()),
            ])
        );
        assert!(entry.provider_key_id.is_none());
        assert_eq!(
            receipt.ciphertext_preview.as_deref(),
            Some(STANDARD.encode(&entry.body).as_str())
        );

        let downloaded = vault.download("caller/notes.txt").await.unwrap();
        assert_eq!(downloaded.plaintext, b"hello world");
        assert_eq!(downloaded.mode, StoredMode::CallerManaged);
        assert_eq!(downloaded.name, "notes.txt");
    }

    #[tokio::test]
    async fn caller_managed_empty_object() {
        let store = Arc::new(MemoryStore::default());
        let vault = vault_over(store.clone());
        vault.upload("empty.bin", Vec::new(), "customer", None).await.unwrap();
        assert_eq!(store.entry("caller/empty.bin").unwrap().body.len(), 28);
        let downloaded = vault.download("caller/empty.bin").await.unwrap();
        assert!(downloaded.plaintext.is_empty());
    }

    #[tokio::test]
    async fn provider_managed_end_to_end() {
        let store = Arc::new(MemoryStore::default());
        let vault = vault_over(store.clone());

        let receipt = vault
            .upload("report.pdf", b"%PDF-1.7".to_vec(), "sse-kms", Some("k1"))
            .await
            .unwrap();
        assert_eq!(receipt.storage_key, "provider/report.pdf");
        assert!(receipt.ciphertext_preview.is_none());

        let entry = store.entry("provider/report.pdf").unwrap();
        assert_eq!(entry.body, b"%PDF-1.7");
        assert!(!entry.metadata.contains_key("cipher"));
        assert_eq!(entry.provider_key_id.as_deref(), Some("k1"));

        let downloaded = vault.download("provider/report.pdf").await.unwrap();
        assert_eq!(downloaded.mode, StoredMode::ProviderManaged);
        assert_eq!(downloaded.plaintext, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn provider_key_falls_back_to_default() {
        let store = Arc::new(MemoryStore::default());
        let vault = vault_over(store.clone());
        vault.upload("a.txt", b"a".to_vec(), "provider", Some("  ")).await.unwrap();
        assert_eq!(
            store.entry("provider/a.txt").unwrap().provider_key_id.as_deref(),
            Some("default-kms-key")
        );
    }

    #[tokio::test]
    async fn provider_upload_without_any_key_id_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let vault = ObjectVault::new(store.clone(), keys(0x42), Some("".into()));
        let err = vault.upload("a.txt", b"a".to_vec(), "provider", None).await.unwrap_err();
        assert_eq!(err, VaultError::from(ModeError::MissingKeyId));
        assert!(store.entry("provider/a.txt").is_none());
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let vault = vault_over(Arc::new(MemoryStore::default()));
        let err = vault.upload("a.txt", b"a".to_vec(), "plain", None).await.unwrap_err();
        assert_eq!(err, VaultError::from(ModeError::UnknownMode("plain".into())));
    }

    #[tokio::test]
    async fn object_sealed_under_other_key_fails_to_decrypt() {
        let store = Arc::new(MemoryStore::default());
        let writer = ObjectVault::new(store.clone(), keys(0x01), None);
        let reader = ObjectVault::new(store, keys(0x02), None);
        writer.upload("x", b"secret".to_vec(), "caller", None).await.unwrap();
        assert_eq!(
            reader.download("caller/x").await.unwrap_err(),
            VaultError::Route(RouteError::Crypto(CryptoError::AuthenticationFailed))
        );
    }

    #[tokio::test]
    async fn stripped_metadata_still_decrypts_under_caller_namespace() {
        let store = Arc::new(MemoryStore::default());
        let vault = vault_over(store.clone());
        vault.upload("doc", b"body".to_vec(), "caller", None).await.unwrap();
        let sealed = store.entry("caller/doc").unwrap().body;
        store.insert("caller/doc", sealed, Metadata::new());

        let downloaded = vault.download("caller/doc").await.unwrap();
        assert_eq!(downloaded.plaintext, b"body");
        assert_eq!(downloaded.name, "doc");
    }

    #[tokio::test]
    async fn not_found_propagates_unchanged() {
        let mut mock = MockStorageGateway::new();
        mock.expect_get()
            .withf(|key: &str| key == "caller/missing")
            .returning(|key| Err(StorageError::NotFound(key.to_owned())));
        let vault = ObjectVault::new(Arc::new(mock), keys(0x42), None);
        assert_eq!(
            vault.download("caller/missing").await.unwrap_err(),
            VaultError::Storage(StorageError::NotFound("caller/missing".into()))
        );
    }

    #[tokio::test]
    async fn storage_failure_on_put_is_returned() {
        let mut mock = MockStorageGateway::new();
        mock.expect_put()
            .withf(|key: &str, _, metadata: &Metadata, provider: &Option<String>| {
                key == "caller/a" && metadata.contains_key("cipher") && provider.is_none()
            })
            .times(1)
            .returning(|_, _, _, _| Err(StorageError::Io("connection reset".into())));
        let vault = ObjectVault::new(Arc::new(mock), keys(0x42), None);
        assert_eq!(
            vault.upload("a", b"a".to_vec(), "caller", None).await.unwrap_err(),
            VaultError::Storage(StorageError::Io("connection reset".into()))
        );
    }

    #[tokio::test]
    async fn list_passes_prefix_and_limit() {
        let mut mock = MockStorageGateway::new();
        mock.expect_list()
            .withf(|prefix: &str, max: &i32| prefix == "caller/" && *max == 10)
            .returning(|_, _| Ok(vec!["caller/a".into(), "caller/b".into()]));
        let vault = ObjectVault::new(Arc::new(mock), keys(0x42), None);
        assert_eq!(
            vault.list("caller/", 10).await.unwrap(),
            vec!["caller/a".to_owned(), "caller/b".to_owned()]
        );
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_vault() {
        let vault = vault_over(Arc::new(MemoryStore::default()));
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let vault = vault.clone();
                tokio::spawn(async move {
                    let name = format!("file-{i}");
                    let body = name.clone().into_bytes();
                    vault.upload(&name, body.clone(), "caller", None).await.unwrap();
                    let downloaded = vault.download(&format!("caller/{name}")).await.unwrap();
                    assert_eq!(downloaded.plaintext, body);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[test]
    fn preview_is_truncated() {
        let long = preview(&[0u8; 1024]);
        assert!(long.ends_with("...(truncated)"));
        assert_eq!(long.len(), PREVIEW_LEN + "...(truncated)".len());
        assert_eq!(preview(b"abc"), "YWJj");
    }

    #[test]
    fn base_name_of_storage_key() {
        assert_eq!(base_name("caller/notes.txt"), "notes.txt");
        assert_eq!(base_name("plain"), "plain");
    }
}
