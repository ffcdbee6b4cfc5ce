//! Role navigation configs
//!
//! A [`RoleNavConfig`] row lists which items a role sees, in which order.
//! Storage guarantees neither uniqueness of ids nor a single row per scope;
//! both are dealt with at resolve time.

use crate::ids::{EstablishmentId, NavItemId};
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// One entry of a config's ordered id list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub item_id: NavItemId,
    /// Explicit ordering override; list position is used when absent
    #[serde(default)]
    pub position: Option<i32>,
}

impl ConfigEntry {
    /// Entry ordered by list position
    #[inline]
    #[must_use]
    pub fn new(item_id: impl Into<NavItemId>) -> Self {
        Self {
            item_id: item_id.into(),
            position: None,
        }
    }

    /// Entry with explicit position
    #[inline]
    #[must_use]
    pub fn at(item_id: impl Into<NavItemId>, position: i32) -> Self {
        Self {
            item_id: item_id.into(),
            position: Some(position),
        }
    }
}

/// Visibility list for a role, optionally scoped to one establishment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleNavConfig {
    pub id: String,
    pub role: Role,
    /// `None` applies to every establishment of the role
    #[serde(default)]
    pub establishment_id: Option<EstablishmentId>,
    #[serde(default)]
    pub entries: Vec<ConfigEntry>,
}

impl RoleNavConfig {
    /// General (all-establishment) config with no entries
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            establishment_id: None,
            entries: Vec::new(),
        }
    }

    /// Scope to one establishment
    #[inline]
    #[must_use]
    pub fn for_establishment(mut self, establishment: impl Into<EstablishmentId>) -> Self {
        self.establishment_id = Some(establishment.into());
        self
    }

    /// Append entries ordered by list position
    #[must_use]
    pub fn with_items<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NavItemId>,
    {
        self.entries.extend(ids.into_iter().map(ConfigEntry::new));
        self
    }

    /// Append one entry
    #[inline]
    #[must_use]
    pub fn with_entry(mut self, entry: ConfigEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Row without establishment scope
    #[inline]
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.establishment_id.is_none()
    }

    /// Ids in effective order
    ///
    /// Entries sort by `position` when set, else by list index. The sort is
    /// stable so ties keep list order. Duplicates are preserved here.
    #[must_use]
    pub fn ordered_item_ids(&self) -> Vec<&NavItemId> {
        let mut keyed: Vec<(i64, &NavItemId)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let key = entry
                    .position
                    .map_or_else(|| i64::try_from(index).unwrap_or(i64::MAX), i64::from);
                (key, &entry.item_id)
            })
            .collect();
        keyed.sort_by_key(|(key, _)| *key);
        keyed.into_iter().map(|(_, id)| id).collect()
    }
}
