//! Password policy resolution
//!
//! Raw form input becomes an effective user/owner password pair. An empty
//! owner password falls back to the user password, so the owner password is
//! never "more empty" than the user password. A pair that is empty on both
//! sides is still a valid policy, but the caller must explicitly confirm it
//! before a document is written without any protection.

/// Password required to open the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPassword(pub String);

/// Password governing permission changes and protection removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerPassword(pub String);

/// Effective password pair handed to the crypto engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Open password, possibly empty
    pub user: UserPassword,
    /// Permissions password; equals the user password when no separate
    /// owner password was given
    pub owner: OwnerPassword,
}

impl PasswordPolicy {
    /// True when neither password is set, i.e. the resulting document would
    /// open without any password at all
    pub fn is_unprotected(&self) -> bool {
        self.user.0.is_empty() && self.owner.0.is_empty()
    }
}

/// A resolved policy plus whether the caller must confirm it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPolicy {
    /// The effective password pair
    pub policy: PasswordPolicy,
    /// Set when both inputs were empty; the workflow refuses to proceed
    /// without explicit confirmation in that case
    pub requires_confirmation: bool,
}

/// Resolve raw form input into an effective password policy
///
/// Pure string logic with no failure modes. The caller is responsible for
/// obtaining user consent when `requires_confirmation` is set.
pub fn resolve_policy(user_input: &str, owner_input: &str) -> ResolvedPolicy {
    let owner = if owner_input.is_empty() {
        user_input
    } else {
        owner_input
    };

    let policy = PasswordPolicy {
        user: UserPassword(user_input.to_string()),
        owner: OwnerPassword(owner.to_string()),
    };
    let requires_confirmation = policy.is_unprotected();

    ResolvedPolicy {
        policy,
        requires_confirmation,
    }
}
