//! User access permissions and the bitmask handed to the crypto engine

use bitflags::bitflags;

bitflags! {
    /// Access permission bitmask consumed by the crypto engine
    ///
    /// Bit positions follow the engine's permission-flag table (ISO 32000
    /// Table 22 numbering, where the lowest bit is bit 1). Bits outside the
    /// table are never set here; the engine owns any reserved-bit handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessPermissions: u32 {
        /// Print the document, possibly at degraded fidelity (bit 3)
        const PRINT_DOCUMENT = 1 << 2;
        /// Modify document contents (bit 4)
        const MODIFY_CONTENT = 1 << 3;
        /// Copy text and graphics (bit 5)
        const COPY = 1 << 4;
        /// Add or modify annotations (bit 6)
        const ANNOTS = 1 << 5;
        /// Fill in existing form fields (bit 9)
        const FILL_FORMS = 1 << 8;
        /// Extract for accessibility; deprecated, carried for byte parity (bit 10)
        const ACCESSIBILITY_EXTRACT = 1 << 9;
        /// Insert, rotate or delete pages (bit 11)
        const ASSEMBLE_DOCUMENT = 1 << 10;
        /// Print at full fidelity (bit 12)
        const PRINT_REPRESENTATION = 1 << 11;
    }
}

/// Named permission toggles as presented to the user
///
/// Built once from form state at submission time and consumed by
/// [`AccessPermissions::from_set`]. Only printing is allowed by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermissionSet {
    /// Allow printing
    pub allow_print: bool,
    /// Allow copying text and images
    pub allow_copy: bool,
    /// Allow content modification
    pub allow_modify: bool,
    /// Allow adding or modifying annotations
    pub allow_annotate: bool,
    /// Allow filling existing form fields
    pub allow_fill_forms: bool,
    /// Allow page assembly (insert, rotate, delete)
    pub allow_assemble_document: bool,
    /// Allow high-fidelity printing
    pub allow_high_fidelity_print: bool,
    /// Deprecated accessibility-extract bit. Not a user-facing toggle; it
    /// exists so masks stay byte-compatible with documents that carry it.
    pub allow_accessibility_extract: bool,
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self {
            allow_print: true,
            allow_copy: false,
            allow_modify: false,
            allow_annotate: false,
            allow_fill_forms: false,
            allow_assemble_document: false,
            allow_high_fidelity_print: false,
            allow_accessibility_extract: false,
        }
    }
}

impl PermissionSet {
    /// All toggles off, including printing
    pub fn none() -> Self {
        Self {
            allow_print: false,
            ..Self::default()
        }
    }

    /// Every user-facing toggle on. The deprecated accessibility-extract
    /// bit stays off; nothing user-facing ever sets it.
    pub fn all() -> Self {
        Self {
            allow_print: true,
            allow_copy: true,
            allow_modify: true,
            allow_annotate: true,
            allow_fill_forms: true,
            allow_assemble_document: true,
            allow_high_fidelity_print: true,
            allow_accessibility_extract: false,
        }
    }
}

impl AccessPermissions {
    /// Map named toggles onto the engine's bitmask
    ///
    /// Total and deterministic: the same set always yields the same mask,
    /// and only bits from the table above can appear in the result.
    pub fn from_set(set: &PermissionSet) -> Self {
        let mut mask = AccessPermissions::empty();

        if set.allow_print {
            mask |= AccessPermissions::PRINT_DOCUMENT;
        }
        if set.allow_modify {
            mask |= AccessPermissions::MODIFY_CONTENT;
        }
        if set.allow_copy {
            mask |= AccessPermissions::COPY;
        }
        if set.allow_annotate {
            mask |= AccessPermissions::ANNOTS;
        }
        if set.allow_fill_forms {
            mask |= AccessPermissions::FILL_FORMS;
        }
        if set.allow_accessibility_extract {
            mask |= AccessPermissions::ACCESSIBILITY_EXTRACT;
        }
        if set.allow_assemble_document {
            mask |= AccessPermissions::ASSEMBLE_DOCUMENT;
        }
        if set.allow_high_fidelity_print {
            mask |= AccessPermissions::PRINT_REPRESENTATION;
        }

        mask
    }

    /// Decode a mask back into named toggles
    pub fn to_set(self) -> PermissionSet {
        PermissionSet {
            allow_print: self.contains(AccessPermissions::PRINT_DOCUMENT),
            allow_copy: self.contains(AccessPermissions::COPY),
            allow_modify: self.contains(AccessPermissions::MODIFY_CONTENT),
            allow_annotate: self.contains(AccessPermissions::ANNOTS),
            allow_fill_forms: self.contains(AccessPermissions::FILL_FORMS),
            allow_assemble_document: self.contains(AccessPermissions::ASSEMBLE_DOCUMENT),
            allow_high_fidelity_print: self.contains(AccessPermissions::PRINT_REPRESENTATION),
            allow_accessibility_extract: self.contains(AccessPermissions::ACCESSIBILITY_EXTRACT),
        }
    }
}

impl From<&PermissionSet> for AccessPermissions {
    fn from(set: &PermissionSet) -> Self {
        AccessPermissions::from_set(set)
    }
}
