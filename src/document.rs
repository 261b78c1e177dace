//! Loaded-document handles and the signature gate

use crate::engine::{EngineDocument, SignatureInfo};

/// Why a signed document is refused
pub const SIGNED_DOCUMENT_REASON: &str =
    "document contains a digital signature; password-based encryption is not permitted";

/// Opaque reference to a loaded PDF
///
/// Owned by one workflow invocation at a time. Signature presence is
/// computed exactly once, when the handle is created, and never re-checked
/// against the engine afterwards.
#[derive(Debug)]
pub struct DocumentHandle<D> {
    doc: D,
    has_signatures: bool,
}

impl<D: EngineDocument> DocumentHandle<D> {
    /// Wrap a freshly loaded engine document
    pub fn new(doc: D) -> Self {
        let has_signatures = !doc.signatures().is_empty();
        Self {
            doc,
            has_signatures,
        }
    }

    /// Whether the document carried digital signatures at load time
    pub fn has_signatures(&self) -> bool {
        self.has_signatures
    }

    /// Signatures as reported by the engine
    pub fn signatures(&self) -> Vec<SignatureInfo> {
        self.doc.signatures()
    }

    /// The underlying engine document
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Unwrap the engine document
    pub fn into_inner(self) -> D {
        self.doc
    }
}

/// Outcome of the signature gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Encryption may proceed
    Proceed,
    /// Encryption is refused
    Blocked {
        /// Human-readable refusal reason
        reason: &'static str,
    },
}

impl GateDecision {
    /// True when the gate refused the document
    pub fn is_blocked(&self) -> bool {
        matches!(self, GateDecision::Blocked { .. })
    }
}

/// Decide whether password-based encryption may be applied to a document
///
/// Signed documents are always refused: re-encrypting would invalidate
/// integrity guarantees the signature makes, and nothing downstream can
/// repair that. The decision is a pure read of the handle; it never loads
/// or re-inspects the underlying bytes.
pub fn check_signature_gate<D: EngineDocument>(handle: &DocumentHandle<D>) -> GateDecision {
    if handle.has_signatures() {
        GateDecision::Blocked {
            reason: SIGNED_DOCUMENT_REASON,
        }
    } else {
        GateDecision::Proceed
    }
}
