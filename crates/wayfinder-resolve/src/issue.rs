//! Non-fatal resolution diagnostics
//!
//! None of these stop resolution. They are logged where they occur and
//! returned with the [`Resolution`](crate::Resolution) so callers can surface
//! config drift to administrators.

use wayfinder_model::{EstablishmentId, NavItemId, Role};

/// Something the resolver had to work around
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionIssue {
    /// Config lists an id with no matching nav item; skipped
    #[error("config '{config_id}' references missing nav item '{item_id}'")]
    StaleConfigReference {
        config_id: String,
        item_id: NavItemId,
    },

    /// Config lists an id more than once; later occurrences dropped
    #[error("config '{config_id}' lists nav item '{item_id}' more than once")]
    DuplicateReference {
        config_id: String,
        item_id: NavItemId,
    },

    /// Several equally specific configs for one scope; first one used
    #[error("ambiguous config for role {role} ({establishment_id:?}): using '{chosen}', ignoring {ignored:?}")]
    AmbiguousRoleConfig {
        role: Role,
        establishment_id: Option<EstablishmentId>,
        chosen: String,
        ignored: Vec<String>,
    },

    /// Parent not in the resolved set; child shown at root level
    #[error("nav item '{item_id}' promoted to root: parent '{missing_parent}' not resolved")]
    OrphanPromoted {
        item_id: NavItemId,
        missing_parent: NavItemId,
    },

    /// Parent link dropped to break a cycle
    #[error("parent cycle broken at nav item '{item_id}'")]
    CycleBroken { item_id: NavItemId },

    /// Nothing resolvable for the role; default set shown
    #[error("no usable config for role {role} ({establishment_id:?}); showing default navigation")]
    FellBackToDefault {
        role: Role,
        establishment_id: Option<EstablishmentId>,
    },
}

impl ResolutionIssue {
    /// Issues caused by data an administrator should fix
    #[inline]
    #[must_use]
    pub fn is_config_drift(&self) -> bool {
        !matches!(self, Self::FellBackToDefault { .. } | Self::OrphanPromoted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_row() {
        let issue = ResolutionIssue::StaleConfigReference {
            config_id: "student-general".into(),
            item_id: NavItemId::new("grades"),
        };
        let text = issue.to_string();
        assert!(text.contains("student-general"));
        assert!(text.contains("grades"));
    }

    #[test]
    fn drift_classification() {
        assert!(ResolutionIssue::CycleBroken { item_id: "a".into() }.is_config_drift());
        assert!(!ResolutionIssue::FellBackToDefault {
            role: Role::Student,
            establishment_id: None
        }
        .is_config_drift());
    }
}
