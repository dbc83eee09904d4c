//! The acting identity for a request.
//!
//! The session layer (an external collaborator) resolves who is calling
//! and hands the operations layer one of these. The anonymous variant is
//! a null object: its capability check is false no matter which bits are
//! queried, so unauthenticated requests flow through the same code path
//! as authenticated ones.

use thiserror::Error;

use crate::{capabilities::Capabilities, models::User};

/// Who is performing the current operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A resolved account with its decoded capability set.
    User {
        /// Account id.
        id: String,
        /// Capabilities decoded from the stored permission mask.
        capabilities: Capabilities,
    },
    /// No authenticated account.
    Anonymous,
}

/// Why a capability requirement was not met.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityError {
    /// The acting identity is anonymous.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The account lacks every queried capability bit.
    #[error("insufficient capabilities: {0:?}")]
    Insufficient(Capabilities),
}

impl Identity {
    /// Build the identity for an authenticated user record.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self::User {
            id: user.id.clone(),
            capabilities: user.capabilities(),
        }
    }

    /// Whether this identity holds any of the queried capability bits.
    ///
    /// Always false for [`Identity::Anonymous`], regardless of the
    /// argument.
    #[must_use]
    pub const fn can(&self, wanted: Capabilities) -> bool {
        match self {
            Self::User { capabilities, .. } => capabilities.intersects(wanted),
            Self::Anonymous => false,
        }
    }

    /// Account id, if authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User { id, .. } => Some(id),
            Self::Anonymous => None,
        }
    }

    /// Fail unless this identity holds one of the queried bits.
    ///
    /// # Errors
    /// [`CapabilityError::NotAuthenticated`] for the anonymous identity,
    /// [`CapabilityError::Insufficient`] for an account without the bits.
    pub const fn require(&self, wanted: Capabilities) -> Result<(), CapabilityError> {
        match self {
            Self::User { capabilities, .. } => {
                if capabilities.intersects(wanted) {
                    Ok(())
                } else {
                    Err(CapabilityError::Insufficient(wanted))
                }
            }
            Self::Anonymous => Err(CapabilityError::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use bitflags::Flags;

    use super::*;

    fn author() -> Identity {
        Identity::User {
            id: "u1".into(),
            capabilities: Capabilities::author(),
        }
    }

    #[test]
    fn anonymous_can_is_always_false() {
        let anon = Identity::Anonymous;
        for flag in Capabilities::FLAGS {
            assert!(!anon.can(*flag.value()));
        }
        assert!(!anon.can(Capabilities::all()));
        assert!(!anon.can(Capabilities::empty()));
    }

    #[test]
    fn user_can_reflects_mask() {
        let id = author();
        assert!(id.can(Capabilities::POST_ARTICLE));
        assert!(!id.can(Capabilities::MANAGE_USER));
    }

    #[test]
    fn can_accepts_multi_bit_queries() {
        let id = author();
        // any overlapping bit suffices
        assert!(id.can(Capabilities::POST_ARTICLE | Capabilities::MANAGE_USER));
    }

    #[test]
    fn require_distinguishes_anonymous_from_insufficient() {
        assert_eq!(
            Identity::Anonymous.require(Capabilities::POST_ARTICLE),
            Err(CapabilityError::NotAuthenticated)
        );
        assert_eq!(
            author().require(Capabilities::MANAGE_USER),
            Err(CapabilityError::Insufficient(Capabilities::MANAGE_USER))
        );
        assert_eq!(author().require(Capabilities::POST_ARTICLE), Ok(()));
    }

    #[test]
    fn zero_mask_user_has_no_capabilities() {
        let id = Identity::User {
            id: "u0".into(),
            capabilities: Capabilities::empty(),
        };
        for flag in Capabilities::FLAGS {
            assert!(!id.can(*flag.value()));
        }
    }
}
