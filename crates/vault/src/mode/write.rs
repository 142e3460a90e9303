//! Write-side routing: namespace selection, sealing, and metadata.

use crate::crypto::{self, CIPHER_NAME};
use crate::key::CustomerKey;

use super::{
    EncryptionMode, Metadata, ModeError, RouteError, CALLER_PREFIX, CIPHER_META_KEY,
    ORIGINAL_NAME_META_KEY, PROVIDER_PREFIX,
};

/// Everything the store needs to persist one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePlan {
    /// Namespaced storage key, e.g. `caller/notes.txt`.
    pub storage_key: String,
    /// Sanitised base name of the object.
    pub original_name: String,
    /// Bytes to hand to the store: plaintext or a sealed envelope.
    pub body: Vec<u8>,
    /// User metadata to persist alongside the object.
    pub metadata: Metadata,
    /// Provider key id the store should encrypt with, if any.
    pub provider_key_id: Option<String>,
}

/// Reduce an uploaded name to its final path component.
///
/// Both `/` and `\` count as separators and trailing separators are ignored,
/// so `../../etc/passwd` becomes `passwd` and `docs/` becomes `docs`.
///
/// # Errors
///
/// Returns [`ModeError::InvalidName`] when nothing usable remains
/// (empty, `.` or `..`).
pub fn sanitize_name(name: &str) -> Result<&str, ModeError> {
    let is_sep = |c: char| c == '/' || c == '\\';
    let base = name
        .trim_end_matches(is_sep)
        .rsplit(is_sep)
        .next()
        .unwrap_or_default();
    match base {
        "" | "." | ".." => Err(ModeError::InvalidName),
        base => Ok(base),
    }
}

/// Plan the storage of `plaintext` under `mode`.
///
/// Provider-managed objects are stored unchanged under `provider/` and carry
/// the key id for the store. Caller-managed objects are sealed with `key`
/// and stored under `caller/` with the `cipher` metadata tag.
///
/// # Errors
///
/// [`ModeError::MissingKeyId`] for a provider mode with a blank key id,
/// [`ModeError::InvalidName`] for an unusable name, and
/// [`crypto::CryptoError::SealFailed`] if sealing fails.
pub fn route_write(
    key: &CustomerKey,
    plaintext: Vec<u8>,
    mode: &EncryptionMode,
    name: &str,
) -> Result<WritePlan, RouteError> {
    let name = sanitize_name(name)?;
    let mut metadata = Metadata::new();
    metadata.insert(ORIGINAL_NAME_META_KEY.to_owned(), name.to_owned());

    let plan = match mode {
        EncryptionMode::ProviderManaged { key_id } => {
            if key_id.trim().is_empty() {
                return Err(ModeError::MissingKeyId.into());
            }
            WritePlan {
                storage_key: format!("{PROVIDER_PREFIX}{name}"),
                original_name: name.to_owned(),
                body: plaintext,
                metadata,
                provider_key_id: Some(key_id.clone()),
            }
        }
        EncryptionMode::CallerManaged => {
            let body = crypto::seal(key, &plaintext)?;
            metadata.insert(CIPHER_META_KEY.to_owned(), CIPHER_NAME.to_owned());
            WritePlan {
                storage_key: format!("{CALLER_PREFIX}{name}"),
                original_name: name.to_owned(),
                body,
                metadata,
                provider_key_id: None,
            }
        }
    };
    Ok(plan)
}
