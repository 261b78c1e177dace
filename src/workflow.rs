//! The encryption workflow
//!
//! One request runs a linear pipeline: obtain a document (at most one engine
//! load), apply the signature gate, resolve the password policy, compute the
//! permission mask, then hand everything to the engine for re-encryption and
//! serialization. The orchestrator holds no state across invocations; each
//! request owns its own document chain.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::document::{check_signature_gate, DocumentHandle, GateDecision};
use crate::engine::{EngineDocument, PdfEngine, ReencryptOptions};
use crate::error::{EncryptError, EncryptResult};
use crate::permissions::{AccessPermissions, PermissionSet};
use crate::policy::resolve_policy;

/// MIME type of the produced artifact
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Prefix for suggested output file names
const ENCRYPTED_NAME_PREFIX: &str = "encrypted_";

/// Where the document to encrypt comes from
///
/// Either raw bytes the engine still has to parse, or a handle parsed
/// earlier (typically for signature inspection at file-selection time). The
/// workflow never loads twice: a `Loaded` source is used as-is.
#[derive(Debug)]
pub enum DocumentSource<D> {
    /// Unparsed bytes; the workflow loads them through the engine
    Bytes(Vec<u8>),
    /// An already-parsed document handle
    Loaded(DocumentHandle<D>),
}

/// A single encryption request
///
/// Password fields carry the raw form input; the effective pair is resolved
/// inside the workflow so the fallback rule lives in exactly one place.
#[derive(Debug)]
pub struct EncryptionRequest<D> {
    /// Document to encrypt
    pub source: DocumentSource<D>,
    /// Original file name; the artifact name derives from it
    pub file_name: String,
    /// Raw user password input, possibly empty
    pub user_password: String,
    /// Raw owner password input, possibly empty
    pub owner_password: String,
    /// Permission toggles from the form
    pub permissions: PermissionSet,
    /// Caller consent for writing a document with no password at all
    pub confirmed_unprotected: bool,
}

impl<D> EncryptionRequest<D> {
    /// Request over raw bytes
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self::with_source(DocumentSource::Bytes(bytes), file_name)
    }

    /// Request over a document parsed earlier
    pub fn from_document(handle: DocumentHandle<D>, file_name: impl Into<String>) -> Self {
        Self::with_source(DocumentSource::Loaded(handle), file_name)
    }

    fn with_source(source: DocumentSource<D>, file_name: impl Into<String>) -> Self {
        Self {
            source,
            file_name: file_name.into(),
            user_password: String::new(),
            owner_password: String::new(),
            permissions: PermissionSet::default(),
            confirmed_unprotected: false,
        }
    }

    /// Set the raw password inputs
    pub fn with_passwords(
        mut self,
        user_password: impl Into<String>,
        owner_password: impl Into<String>,
    ) -> Self {
        self.user_password = user_password.into();
        self.owner_password = owner_password.into();
        self
    }

    /// Set the permission toggles
    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    /// Record caller consent for an unprotected result
    pub fn confirm_unprotected(mut self) -> Self {
        self.confirmed_unprotected = true;
        self
    }
}

/// Result of a successful encryption request, ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedArtifact {
    bytes: Vec<u8>,
    suggested_file_name: String,
}

impl EncryptedArtifact {
    fn new(bytes: Vec<u8>, original_name: &str) -> Self {
        Self {
            bytes,
            suggested_file_name: format!("{ENCRYPTED_NAME_PREFIX}{original_name}"),
        }
    }

    /// Serialized document bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the artifact, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// File name to offer when saving; collision handling is the saver's job
    pub fn suggested_file_name(&self) -> &str {
        &self.suggested_file_name
    }

    /// Always `application/pdf`
    pub fn mime_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    /// Artifact size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the artifact carries no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact to disk
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

/// Orchestrator for the encryption workflow
///
/// Stateless apart from the engine it wraps; requests are independent and a
/// failed request can be retried once its cause is fixed.
pub struct PdfEncryptor<E: PdfEngine> {
    engine: E,
}

impl<E: PdfEngine> PdfEncryptor<E> {
    /// Create an encryptor over the given engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// The wrapped engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Parse bytes into a document handle
    ///
    /// Exposed so callers can inspect signature presence at file-selection
    /// time and later submit the handle via [`DocumentSource::Loaded`]
    /// without a second parse.
    pub fn load(&self, bytes: &[u8]) -> EncryptResult<DocumentHandle<E::Document>> {
        debug!(engine = self.engine.engine_name(), len = bytes.len(), "loading document");
        let doc = self.engine.load(bytes).map_err(EncryptError::Load)?;
        Ok(DocumentHandle::new(doc))
    }

    /// Run one encryption request to completion
    ///
    /// # Errors
    ///
    /// [`EncryptError::Load`] when byte sources cannot be opened,
    /// [`EncryptError::SignatureBlocked`] for signed documents (checked
    /// before any password handling), [`EncryptError::ConfirmationRequired`]
    /// when both passwords are empty without caller consent, and
    /// [`EncryptError::Engine`] when re-encryption or serialization fails.
    pub fn encrypt(
        &self,
        request: EncryptionRequest<E::Document>,
    ) -> EncryptResult<EncryptedArtifact> {
        // At most one load per request; a pre-parsed handle is used as-is.
        let handle = match request.source {
            DocumentSource::Bytes(bytes) => self.load(&bytes)?,
            DocumentSource::Loaded(handle) => handle,
        };

        // The gate runs before any password or permission processing.
        if let GateDecision::Blocked { reason } = check_signature_gate(&handle) {
            warn!(file = %request.file_name, reason, "encryption refused");
            return Err(EncryptError::SignatureBlocked);
        }

        let resolved = resolve_policy(&request.user_password, &request.owner_password);
        if resolved.requires_confirmation && !request.confirmed_unprotected {
            return Err(EncryptError::ConfirmationRequired);
        }

        let permissions = AccessPermissions::from_set(&request.permissions);
        let options = ReencryptOptions::new(resolved.policy, permissions);

        debug!(
            algorithm = options.algorithm.name(),
            permissions = permissions.bits(),
            "requesting re-encryption"
        );
        let encrypted = handle
            .document()
            .reencrypt(&options)
            .map_err(EncryptError::Engine)?;
        let bytes = encrypted.serialize().map_err(EncryptError::Engine)?;

        info!(
            file = %request.file_name,
            len = bytes.len(),
            "document re-encrypted"
        );
        Ok(EncryptedArtifact::new(bytes, &request.file_name))
    }
}

/// Encrypt a document in one call
///
/// Convenience wrapper over [`PdfEncryptor`] for callers that do not keep an
/// encryptor around.
pub fn encrypt_pdf<E: PdfEngine>(
    engine: E,
    request: EncryptionRequest<E::Document>,
) -> EncryptResult<EncryptedArtifact> {
    PdfEncryptor::new(engine).encrypt(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockEngine;

    const PDF: &[u8] = b"%PDF-1.7\nbody";

    #[test]
    fn test_happy_path_produces_named_artifact() {
        let encryptor = PdfEncryptor::new(MockEngine::new());
        let request = EncryptionRequest::from_bytes(PDF.to_vec(), "report.pdf")
            .with_passwords("secret", "")
            .with_permissions(PermissionSet::default());

        let artifact = encryptor.encrypt(request).unwrap();
        assert_eq!(artifact.suggested_file_name(), "encrypted_report.pdf");
        assert_eq!(artifact.mime_type(), "application/pdf");
        assert!(!artifact.is_empty());
    }

    #[test]
    fn test_owner_falls_back_to_user_in_engine_call() {
        let encryptor = PdfEncryptor::new(MockEngine::new());
        let request =
            EncryptionRequest::from_bytes(PDF.to_vec(), "a.pdf").with_passwords("secret", "");

        let artifact = encryptor.encrypt(request).unwrap();
        let trailer = String::from_utf8(artifact.into_bytes()).unwrap();
        assert!(trailer.contains("user=secret owner=secret"));
    }

    #[test]
    fn test_invalid_bytes_fail_as_load_error() {
        let encryptor = PdfEncryptor::new(MockEngine::new());
        let request = EncryptionRequest::from_bytes(b"not a pdf".to_vec(), "a.pdf")
            .with_passwords("secret", "");

        let err = encryptor.encrypt(request).unwrap_err();
        assert!(matches!(err, EncryptError::Load(_)));
        assert_eq!(encryptor.engine().calls().reencrypts(), 0);
    }

    #[test]
    fn test_signed_document_blocks_before_engine_work() {
        let encryptor = PdfEncryptor::new(MockEngine::with_signatures(["Sig1"]));
        let request =
            EncryptionRequest::from_bytes(PDF.to_vec(), "signed.pdf").with_passwords("secret", "");

        let err = encryptor.encrypt(request).unwrap_err();
        assert!(matches!(err, EncryptError::SignatureBlocked));
        let calls = encryptor.engine().calls();
        assert_eq!(calls.reencrypts(), 0);
        assert_eq!(calls.serializes(), 0);
    }

    #[test]
    fn test_signed_document_blocks_regardless_of_passwords() {
        // Gate runs before password handling: even the confirmation case
        // never surfaces for a signed document.
        let encryptor = PdfEncryptor::new(MockEngine::with_signatures(["Sig1"]));
        let request = EncryptionRequest::from_bytes(PDF.to_vec(), "signed.pdf");

        let err = encryptor.encrypt(request).unwrap_err();
        assert!(matches!(err, EncryptError::SignatureBlocked));
    }

    #[test]
    fn test_unprotected_requires_confirmation() {
        let encryptor = PdfEncryptor::new(MockEngine::new());
        let request = EncryptionRequest::from_bytes(PDF.to_vec(), "a.pdf");

        let err = encryptor.encrypt(request).unwrap_err();
        assert!(err.needs_confirmation());
        assert_eq!(encryptor.engine().calls().reencrypts(), 0);
    }

    #[test]
    fn test_confirmed_unprotected_proceeds() {
        let encryptor = PdfEncryptor::new(MockEngine::new());
        let request = EncryptionRequest::from_bytes(PDF.to_vec(), "a.pdf").confirm_unprotected();

        let artifact = encryptor.encrypt(request).unwrap();
        let trailer = String::from_utf8(artifact.into_bytes()).unwrap();
        assert!(trailer.contains("user= owner="));
        assert_eq!(encryptor.engine().calls().reencrypts(), 1);
    }

    #[test]
    fn test_loaded_source_is_not_reloaded() {
        let encryptor = PdfEncryptor::new(MockEngine::new());
        let handle = encryptor.load(PDF).unwrap();
        assert_eq!(encryptor.engine().calls().loads(), 1);

        let request =
            EncryptionRequest::from_document(handle, "a.pdf").with_passwords("secret", "");
        encryptor.encrypt(request).unwrap();

        assert_eq!(encryptor.engine().calls().loads(), 1);
    }

    #[test]
    fn test_engine_fault_maps_to_engine_error() {
        let mut engine = MockEngine::new();
        engine.set_reencrypt_failure("fault");
        let encryptor = PdfEncryptor::new(engine);
        let request =
            EncryptionRequest::from_bytes(PDF.to_vec(), "a.pdf").with_passwords("secret", "");

        let err = encryptor.encrypt(request).unwrap_err();
        assert!(matches!(err, EncryptError::Engine(_)));
    }

    #[test]
    fn test_convenience_function() {
        let request =
            EncryptionRequest::from_bytes(PDF.to_vec(), "a.pdf").with_passwords("secret", "");
        let artifact = encrypt_pdf(MockEngine::new(), request).unwrap();
        assert_eq!(artifact.suggested_file_name(), "encrypted_a.pdf");
    }
}
