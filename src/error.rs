//! Error types for the encryption workflow

use thiserror::Error;

use crate::document::SIGNED_DOCUMENT_REASON;
use crate::engine::EngineError;

/// Result type for workflow operations
pub type EncryptResult<T> = std::result::Result<T, EncryptError>;

/// Failures of a single encryption request
///
/// Every variant is terminal for the request; no partial artifact is ever
/// produced. Kinds are never conflated: a load failure stays a load
/// failure, so callers can branch on the variant to decide whether to show
/// a failure message, a refusal, or a confirmation prompt.
#[derive(Debug, Error)]
pub enum EncryptError {
    /// Source bytes could not be opened as a document, or a password would
    /// be needed to open them
    #[error("file is invalid or password-protected: {0}")]
    Load(#[source] EngineError),

    /// The document is digitally signed; encryption is refused outright,
    /// never retried
    #[error("{}", SIGNED_DOCUMENT_REASON)]
    SignatureBlocked,

    /// Both passwords are empty and the caller has not confirmed writing an
    /// unprotected document. Recoverable: re-submit with confirmation.
    #[error("document would be left without any password; explicit confirmation is required")]
    ConfirmationRequired,

    /// The engine failed to re-encrypt or serialize
    #[error("encryption failed: {0}")]
    Engine(#[source] EngineError),
}

impl EncryptError {
    /// True for the confirmation signal, which callers should present as a
    /// prompt rather than a failure
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, EncryptError::ConfirmationRequired)
    }
}
