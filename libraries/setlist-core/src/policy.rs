//! Application-level policies decided once at start-up

use crate::error::{Result, SetlistError};
use crate::types::OwnerId;
use serde::{Deserialize, Serialize};

/// Whether playlists and playback records must name an owner
///
/// The data layer always treats the owner as optional; this policy is the
/// single place where "required" is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerPolicy {
    /// Reject creation without a non-blank owner
    pub require_owner: bool,
}

impl OwnerPolicy {
    /// Create a policy
    pub fn new(require_owner: bool) -> Self {
        Self { require_owner }
    }

    /// Check an owner reference supplied on creation
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the owner is blank, or missing while
    /// required.
    pub fn check(&self, owner_id: Option<&OwnerId>) -> Result<()> {
        match owner_id {
            Some(owner) if owner.is_blank() => {
                Err(SetlistError::invalid_input("ownerId must not be blank"))
            }
            Some(_) => Ok(()),
            None if self.require_owner => Err(SetlistError::invalid_input("ownerId is required")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_owner_by_default() {
        let policy = OwnerPolicy::default();
        assert!(policy.check(None).is_ok());
        assert!(policy.check(Some(&OwnerId::new("user-1"))).is_ok());
    }

    #[test]
    fn required_owner_rejects_missing() {
        let policy = OwnerPolicy::new(true);
        assert!(policy.check(None).is_err());
        assert!(policy.check(Some(&OwnerId::new("user-1"))).is_ok());
    }

    #[test]
    fn blank_owner_is_always_rejected() {
        assert!(OwnerPolicy::default()
            .check(Some(&OwnerId::new(" ")))
            .is_err());
    }
}
