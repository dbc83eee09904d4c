//! Capability bits gating blog operations.
//!
//! A user's `permission` column is a bitmask over this catalog. Bit
//! positions are part of the stored-data and API contract: once a
//! capability ships its bit is frozen, and a new capability takes the
//! next unused bit. The catalog is closed; callers never mint bits.

use bitflags::{Flags, bitflags};
use serde::Serialize;

bitflags! {
    /// Named permission bits stored in the user permission mask.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u64 {
        /// Bit 0: create new articles.
        const POST_ARTICLE = 1 << 0;
        /// Bit 1: edit articles and read private ones.
        const EDIT_ARTICLE = 1 << 1;
        /// Bit 2: delete articles.
        const DELETE_ARTICLE = 1 << 2;
        /// Bit 3: create, rename, and delete categories.
        const MANAGE_CATEGORY = 1 << 3;
        /// Bit 4: approve comments and see unreviewed ones.
        const REVIEW_COMMENT = 1 << 4;
        /// Bit 5: delete comments.
        const DELETE_COMMENT = 1 << 5;
        /// Bit 6: create, modify, and delete user accounts.
        const MANAGE_USER = 1 << 6;
        /// Bit 7: read the audit event log.
        const VIEW_EVENT = 1 << 7;
    }
}

impl Capabilities {
    /// Capabilities for a regular authoring account.
    #[must_use]
    pub const fn author() -> Self {
        Self::from_bits_truncate(Self::POST_ARTICLE.bits() | Self::EDIT_ARTICLE.bits())
    }

    /// Capabilities for an account that also curates content.
    #[must_use]
    pub const fn moderator() -> Self {
        Self::from_bits_truncate(
            Self::author().bits()
                | Self::DELETE_ARTICLE.bits()
                | Self::MANAGE_CATEGORY.bits()
                | Self::REVIEW_COMMENT.bits()
                | Self::DELETE_COMMENT.bits(),
        )
    }

    /// Full administrative capabilities.
    #[must_use]
    pub const fn admin() -> Self {
        Self::all()
    }

    /// Decode a stored permission column.
    ///
    /// Bits outside the catalog are retained so that reading and writing
    /// a mask back never drops data written by a newer deployment.
    #[must_use]
    pub const fn from_stored(bits: i64) -> Self {
        Self::from_bits_retain(bits.cast_unsigned())
    }

    /// Encode for the signed 64-bit permission column.
    #[must_use]
    pub const fn to_stored(self) -> i64 {
        self.bits().cast_signed()
    }
}

/// One catalog entry's on/off state in a permission summary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CapabilityFlag {
    /// Catalog name of the capability.
    pub name: &'static str,
    /// Whether the summarised mask grants it.
    pub enabled: bool,
}

/// Summarise a mask against the whole catalog, in declaration order.
///
/// Every known capability appears exactly once; bits outside the catalog
/// are not reported.
#[must_use]
pub fn format_permission(mask: Capabilities) -> Vec<CapabilityFlag> {
    Capabilities::FLAGS
        .iter()
        .map(|flag| CapabilityFlag {
            name: flag.name(),
            enabled: mask.intersects(*flag.value()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[test]
    fn default_is_empty() {
        let caps = Capabilities::default();
        assert!(caps.is_empty());
    }

    #[test]
    fn empty_mask_grants_nothing() {
        let caps = Capabilities::empty();
        for flag in Capabilities::FLAGS {
            assert!(!caps.intersects(*flag.value()));
        }
    }

    #[test]
    fn author_can_post_and_edit() {
        let caps = Capabilities::author();
        assert!(caps.contains(Capabilities::POST_ARTICLE));
        assert!(caps.contains(Capabilities::EDIT_ARTICLE));
    }

    #[test]
    fn author_lacks_admin_capabilities() {
        let caps = Capabilities::author();
        assert!(!caps.contains(Capabilities::MANAGE_USER));
        assert!(!caps.contains(Capabilities::VIEW_EVENT));
        assert!(!caps.contains(Capabilities::DELETE_ARTICLE));
    }

    #[test]
    fn admin_has_all_capabilities() {
        let caps = Capabilities::admin();
        assert!(caps.contains(Capabilities::POST_ARTICLE));
        assert!(caps.contains(Capabilities::MANAGE_USER));
        assert!(caps.contains(Capabilities::VIEW_EVENT));
    }

    #[rstest]
    #[case(Capabilities::POST_ARTICLE, 0)]
    #[case(Capabilities::EDIT_ARTICLE, 1)]
    #[case(Capabilities::DELETE_ARTICLE, 2)]
    #[case(Capabilities::MANAGE_CATEGORY, 3)]
    #[case(Capabilities::REVIEW_COMMENT, 4)]
    #[case(Capabilities::DELETE_COMMENT, 5)]
    #[case(Capabilities::MANAGE_USER, 6)]
    #[case(Capabilities::VIEW_EVENT, 7)]
    fn capability_bit_position(#[case] cap: Capabilities, #[case] expected_bit: u32) {
        assert_eq!(
            cap.bits(),
            1u64 << expected_bit,
            "capability {cap:?} should be at bit {expected_bit}"
        );
    }

    #[test]
    fn capabilities_can_be_combined() {
        let combined = Capabilities::POST_ARTICLE | Capabilities::REVIEW_COMMENT;
        assert!(combined.contains(Capabilities::POST_ARTICLE));
        assert!(combined.contains(Capabilities::REVIEW_COMMENT));
        assert!(!combined.contains(Capabilities::DELETE_COMMENT));
    }

    #[test]
    fn stored_roundtrip_preserves_unknown_bits() {
        let stored = (1i64 << 0) | (1i64 << 40);
        let caps = Capabilities::from_stored(stored);
        assert!(caps.contains(Capabilities::POST_ARTICLE));
        assert_eq!(caps.to_stored(), stored);
    }

    #[test]
    fn stored_roundtrip_survives_sign_bit() {
        let stored = i64::MIN | 0b10;
        let caps = Capabilities::from_stored(stored);
        assert!(caps.contains(Capabilities::EDIT_ARTICLE));
        assert_eq!(caps.to_stored(), stored);
    }

    #[test]
    fn format_permission_lists_catalog_in_order() {
        let summary = format_permission(Capabilities::empty());
        let names: Vec<&str> = summary.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "POST_ARTICLE",
                "EDIT_ARTICLE",
                "DELETE_ARTICLE",
                "MANAGE_CATEGORY",
                "REVIEW_COMMENT",
                "DELETE_COMMENT",
                "MANAGE_USER",
                "VIEW_EVENT",
            ]
        );
        assert!(summary.iter().all(|f| !f.enabled));
    }

    #[test]
    fn format_permission_flags_two_lowest_bits() {
        let summary = format_permission(Capabilities::from_stored(0b011));
        let enabled: Vec<&str> = summary
            .iter()
            .filter(|f| f.enabled)
            .map(|f| f.name)
            .collect();
        assert_eq!(enabled, ["POST_ARTICLE", "EDIT_ARTICLE"]);
    }

    proptest! {
        #[test]
        fn can_matches_bitwise_and(mask in any::<u64>()) {
            let caps = Capabilities::from_bits_retain(mask);
            for flag in Capabilities::FLAGS {
                prop_assert_eq!(
                    caps.intersects(*flag.value()),
                    mask & flag.value().bits() != 0
                );
            }
        }
    }
}
