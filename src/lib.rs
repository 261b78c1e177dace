//! # pdf-seal
//!
//! Password-based protection workflows for PDF documents.
//!
//! The crate turns user-facing permission toggles and a user/owner password
//! pair into the policy object a cryptographic PDF engine consumes, enforces
//! the policy invariants around that translation, and orchestrates the
//! load → re-encrypt → serialize pipeline. The engine itself (parsing, key
//! derivation, AES-256 stream encryption, signature discovery) sits behind
//! the [`engine::PdfEngine`] trait; this crate never touches cryptography.
//!
//! ## Features
//!
//! - **Permission mapping**: named toggles to the standard access-permission
//!   bitmask, total and deterministic
//! - **Password policy**: empty owner password falls back to the user
//!   password; fully unprotected output needs explicit confirmation
//! - **Signature gate**: digitally signed documents are refused before any
//!   password handling
//! - **Single-load pipeline**: a document parsed at file-selection time is
//!   reused, never re-parsed
//!
//! ## Quick Start
//!
//! ```rust
//! use pdf_seal::{EncryptionRequest, MockEngine, PdfEncryptor, PermissionSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let encryptor = PdfEncryptor::new(MockEngine::new());
//!
//! let request = EncryptionRequest::from_bytes(b"%PDF-1.7\n...".to_vec(), "report.pdf")
//!     .with_passwords("secret", "")
//!     .with_permissions(PermissionSet::default());
//!
//! let artifact = encryptor.encrypt(request)?;
//! assert_eq!(artifact.suggested_file_name(), "encrypted_report.pdf");
//! assert_eq!(artifact.mime_type(), "application/pdf");
//! # Ok(())
//! # }
//! ```
//!
//! ### Inspecting signatures before submission
//!
//! ```rust
//! use pdf_seal::{EncryptionRequest, MockEngine, PdfEncryptor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let encryptor = PdfEncryptor::new(MockEngine::new());
//!
//! // Parse once at file-selection time...
//! let handle = encryptor.load(b"%PDF-1.7\n...")?;
//! if handle.has_signatures() {
//!     // ...surface the refusal in the UI without submitting anything
//! }
//!
//! // ...and reuse the handle at submission time; no second parse happens.
//! let request = EncryptionRequest::from_document(handle, "report.pdf")
//!     .with_passwords("secret", "owner-secret");
//! let artifact = encryptor.encrypt(request)?;
//! # let _ = artifact;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`permissions`] - Permission toggles and the engine bitmask
//! - [`policy`] - Password pair resolution
//! - [`document`] - Loaded-document handles and the signature gate
//! - [`engine`] - The crypto engine trait seam and a mock implementation
//! - [`workflow`] - The request/artifact types and the orchestrator
//! - [`error`] - Workflow error kinds

pub mod document;
pub mod engine;
pub mod error;
pub mod permissions;
pub mod policy;
pub mod workflow;

pub use document::{check_signature_gate, DocumentHandle, GateDecision};
pub use engine::{
    looks_like_pdf, EncryptionAlgorithm, EngineDocument, EngineError, EngineResult, MockEngine,
    PdfEngine, ReencryptOptions, SignatureInfo,
};
pub use error::{EncryptError, EncryptResult};
pub use permissions::{AccessPermissions, PermissionSet};
pub use policy::{resolve_policy, OwnerPassword, PasswordPolicy, ResolvedPolicy, UserPassword};
pub use workflow::{
    encrypt_pdf, DocumentSource, EncryptedArtifact, EncryptionRequest, PdfEncryptor,
    PDF_MIME_TYPE,
};
