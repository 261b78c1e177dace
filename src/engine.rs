//! Interface to the external cryptographic PDF engine
//!
//! The workflow never implements cryptography itself. Parsing, signature
//! discovery, key derivation and AES-256 stream encryption all live behind
//! [`PdfEngine`] and [`EngineDocument`]; this crate only computes and
//! validates the policy object passed across the boundary.
//!
//! A [`MockEngine`] is shipped for testing and development. It records call
//! counts and can be configured to simulate signed, password-protected or
//! failing documents.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::permissions::AccessPermissions;
use crate::policy::PasswordPolicy;

/// Result type for engine-boundary calls
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failures reported by the crypto engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input bytes are not a parseable document
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The document requires a password to open
    #[error("a password is required to open the document")]
    PasswordProtected,

    /// The engine does not support the requested encryption profile
    #[error("unsupported encryption algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Any other engine fault
    #[error("engine fault: {0}")]
    Internal(String),
}

/// Encryption profile requested from the engine
///
/// A single AES-256 profile is exposed; there is no algorithm choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionAlgorithm {
    /// AES-256 per the standard security handler
    #[default]
    Aes256,
}

impl EncryptionAlgorithm {
    /// Identifier handed to the engine
    pub fn name(&self) -> &'static str {
        match self {
            EncryptionAlgorithm::Aes256 => "AES-256",
        }
    }
}

/// Re-encryption policy handed to the engine
#[derive(Debug, Clone)]
pub struct ReencryptOptions {
    /// Effective user/owner password pair
    pub passwords: PasswordPolicy,
    /// Access permission bitmask
    pub permissions: AccessPermissions,
    /// Encryption profile; always AES-256
    pub algorithm: EncryptionAlgorithm,
}

impl ReencryptOptions {
    /// Build options for the fixed AES-256 profile
    pub fn new(passwords: PasswordPolicy, permissions: AccessPermissions) -> Self {
        Self {
            passwords,
            permissions,
            algorithm: EncryptionAlgorithm::Aes256,
        }
    }
}

/// A digital signature reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureInfo {
    /// Signature field name as recorded in the document
    pub field_name: String,
}

/// External cryptographic PDF engine
///
/// Implementations wrap whatever library actually performs parsing and
/// encryption. `Send + Sync` so independent requests can run concurrently,
/// each against its own document chain.
pub trait PdfEngine: Send + Sync {
    /// Parsed document type produced by this engine
    type Document: EngineDocument;

    /// Parse raw bytes into a document
    ///
    /// # Errors
    ///
    /// [`EngineError::Malformed`] when the bytes are not a valid document,
    /// [`EngineError::PasswordProtected`] when a password would be needed
    /// to open it.
    fn load(&self, bytes: &[u8]) -> EngineResult<Self::Document>;

    /// Engine name for diagnostics
    fn engine_name(&self) -> &str;
}

/// A document loaded by a [`PdfEngine`]
pub trait EngineDocument {
    /// Digital signatures present in the document
    fn signatures(&self) -> Vec<SignatureInfo>;

    /// Produce a re-encrypted copy of this document
    ///
    /// Clone semantics: the receiver is left unmodified.
    fn reencrypt(&self, options: &ReencryptOptions) -> EngineResult<Self>
    where
        Self: Sized;

    /// Serialize the document to bytes
    fn serialize(&self) -> EngineResult<Vec<u8>>;
}

/// Quick check that a byte stream starts like a PDF file
///
/// Real-world files may carry junk ahead of the marker, so the first KiB is
/// scanned rather than just the first five bytes.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    const MARKER: &[u8] = b"%PDF-";
    bytes
        .windows(MARKER.len())
        .take(1024)
        .any(|window| window == MARKER)
}

/// Call counters recorded by [`MockEngine`]
///
/// Shared between the engine and every document it produces, so tests can
/// assert which boundary calls a workflow actually made.
#[derive(Debug, Default)]
pub struct MockCallCounts {
    loads: AtomicUsize,
    reencrypts: AtomicUsize,
    serializes: AtomicUsize,
}

impl MockCallCounts {
    /// Number of `load` calls
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of `reencrypt` calls across all documents
    pub fn reencrypts(&self) -> usize {
        self.reencrypts.load(Ordering::Relaxed)
    }

    /// Number of `serialize` calls across all documents
    pub fn serializes(&self) -> usize {
        self.serializes.load(Ordering::Relaxed)
    }
}

/// Mock crypto engine for testing and development
///
/// Simulates the engine boundary without doing any real cryptography.
/// Loading validates the `%PDF-` marker; re-encryption stamps the policy
/// into the serialized output so tests can assert what reached the engine.
///
/// # Examples
///
/// ```rust
/// use pdf_seal::engine::{MockEngine, PdfEngine};
///
/// let engine = MockEngine::new();
/// let doc = engine.load(b"%PDF-1.7\nhello").unwrap();
/// assert_eq!(engine.calls().loads(), 1);
/// # let _ = doc;
/// ```
#[derive(Debug, Default)]
pub struct MockEngine {
    /// Signature field names stamped onto every loaded document
    signatures: Vec<String>,
    /// Simulate a password-to-open document
    password_protected: bool,
    /// Error message returned by every `reencrypt` call, if set
    reencrypt_failure: Option<String>,
    calls: Arc<MockCallCounts>,
}

impl MockEngine {
    /// Engine producing unsigned, unprotected documents
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose documents carry the given signature fields
    pub fn with_signatures<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            signatures: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Simulate documents that need a password to open
    pub fn set_password_protected(&mut self, protected: bool) {
        self.password_protected = protected;
    }

    /// Make every `reencrypt` call fail with the given message
    pub fn set_reencrypt_failure(&mut self, message: impl Into<String>) {
        self.reencrypt_failure = Some(message.into());
    }

    /// Recorded call counts, shared with loaded documents
    pub fn calls(&self) -> Arc<MockCallCounts> {
        Arc::clone(&self.calls)
    }
}

impl PdfEngine for MockEngine {
    type Document = MockDocument;

    fn load(&self, bytes: &[u8]) -> EngineResult<MockDocument> {
        self.calls.loads.fetch_add(1, Ordering::Relaxed);

        if !looks_like_pdf(bytes) {
            return Err(EngineError::Malformed("missing %PDF- marker".to_string()));
        }
        if self.password_protected {
            return Err(EngineError::PasswordProtected);
        }

        Ok(MockDocument {
            bytes: bytes.to_vec(),
            signatures: self
                .signatures
                .iter()
                .map(|name| SignatureInfo {
                    field_name: name.clone(),
                })
                .collect(),
            encryption: None,
            reencrypt_failure: self.reencrypt_failure.clone(),
            calls: Arc::clone(&self.calls),
        })
    }

    fn engine_name(&self) -> &str {
        "mock"
    }
}

/// Document produced by [`MockEngine`]
#[derive(Debug)]
pub struct MockDocument {
    bytes: Vec<u8>,
    signatures: Vec<SignatureInfo>,
    encryption: Option<ReencryptOptions>,
    reencrypt_failure: Option<String>,
    calls: Arc<MockCallCounts>,
}

impl MockDocument {
    /// Policy applied by `reencrypt`, if any
    pub fn applied_encryption(&self) -> Option<&ReencryptOptions> {
        self.encryption.as_ref()
    }
}

impl EngineDocument for MockDocument {
    fn signatures(&self) -> Vec<SignatureInfo> {
        self.signatures.clone()
    }

    fn reencrypt(&self, options: &ReencryptOptions) -> EngineResult<Self> {
        self.calls.reencrypts.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = &self.reencrypt_failure {
            return Err(EngineError::Internal(message.clone()));
        }

        Ok(Self {
            bytes: self.bytes.clone(),
            signatures: self.signatures.clone(),
            encryption: Some(options.clone()),
            reencrypt_failure: self.reencrypt_failure.clone(),
            calls: Arc::clone(&self.calls),
        })
    }

    fn serialize(&self) -> EngineResult<Vec<u8>> {
        self.calls.serializes.fetch_add(1, Ordering::Relaxed);

        // Deterministic output: original bytes plus a trailer describing the
        // applied policy, so identical requests serialize identically.
        let mut out = self.bytes.clone();
        if let Some(enc) = &self.encryption {
            out.extend_from_slice(
                format!(
                    "\n%%enc alg={} p={:#010x} user={} owner={}\n",
                    enc.algorithm.name(),
                    enc.permissions.bits(),
                    enc.passwords.user.0,
                    enc.passwords.owner.0,
                )
                .as_bytes(),
            );
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::resolve_policy;

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf(b"%PDF-1.7\n"));
        // Junk before the marker is tolerated within the scan window.
        assert!(looks_like_pdf(b"\xef\xbb\xbfgarbage%PDF-1.4"));
        assert!(!looks_like_pdf(b"PK\x03\x04 not a pdf"));
        assert!(!looks_like_pdf(b""));
    }

    #[test]
    fn test_mock_load_rejects_non_pdf() {
        let engine = MockEngine::new();
        let err = engine.load(b"plain text").unwrap_err();
        assert!(matches!(err, EngineError::Malformed(_)));
        assert_eq!(engine.calls().loads(), 1);
    }

    #[test]
    fn test_mock_load_password_protected() {
        let mut engine = MockEngine::new();
        engine.set_password_protected(true);
        let err = engine.load(b"%PDF-1.7").unwrap_err();
        assert!(matches!(err, EngineError::PasswordProtected));
    }

    #[test]
    fn test_mock_documents_carry_configured_signatures() {
        let engine = MockEngine::with_signatures(["Sig1", "Sig2"]);
        let doc = engine.load(b"%PDF-1.7").unwrap();
        let sigs = doc.signatures();
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0].field_name, "Sig1");
    }

    #[test]
    fn test_reencrypt_has_clone_semantics() {
        let engine = MockEngine::new();
        let doc = engine.load(b"%PDF-1.7").unwrap();

        let options = ReencryptOptions::new(
            resolve_policy("u", "o").policy,
            AccessPermissions::PRINT_DOCUMENT,
        );
        let encrypted = doc.reencrypt(&options).unwrap();

        assert!(doc.applied_encryption().is_none());
        assert!(encrypted.applied_encryption().is_some());
        assert_eq!(engine.calls().reencrypts(), 1);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let engine = MockEngine::new();
        let options = ReencryptOptions::new(
            resolve_policy("u", "").policy,
            AccessPermissions::PRINT_DOCUMENT | AccessPermissions::COPY,
        );

        let a = engine
            .load(b"%PDF-1.7 body")
            .unwrap()
            .reencrypt(&options)
            .unwrap()
            .serialize()
            .unwrap();
        let b = engine
            .load(b"%PDF-1.7 body")
            .unwrap()
            .reencrypt(&options)
            .unwrap()
            .serialize()
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_reencrypt_failure_knob() {
        let mut engine = MockEngine::new();
        engine.set_reencrypt_failure("key derivation failed");
        let doc = engine.load(b"%PDF-1.7").unwrap();

        let options =
            ReencryptOptions::new(resolve_policy("u", "").policy, AccessPermissions::empty());
        let err = doc.reencrypt(&options).unwrap_err();
        assert!(matches!(err, EngineError::Internal(_)));
        assert!(err.to_string().contains("key derivation failed"));
    }

    #[test]
    fn test_algorithm_is_fixed_aes_256() {
        let options =
            ReencryptOptions::new(resolve_policy("", "o").policy, AccessPermissions::empty());
        assert_eq!(options.algorithm, EncryptionAlgorithm::Aes256);
        assert_eq!(options.algorithm.name(), "AES-256");
    }
}
