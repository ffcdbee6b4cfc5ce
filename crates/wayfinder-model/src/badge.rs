//! Unread counters

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Area of the application that carries an unread counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeArea {
    Messages,
    Assignments,
    Notifications,
    Notes,
    PendingApprovals,
}

impl BadgeArea {
    /// Every area, in declaration order
    pub const ALL: [BadgeArea; 5] = [
        BadgeArea::Messages,
        BadgeArea::Assignments,
        BadgeArea::Notifications,
        BadgeArea::Notes,
        BadgeArea::PendingApprovals,
    ];

    /// Wire representation
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeArea::Messages => "messages",
            BadgeArea::Assignments => "assignments",
            BadgeArea::Notifications => "notifications",
            BadgeArea::Notes => "notes",
            BadgeArea::PendingApprovals => "pending_approvals",
        }
    }

    /// Remote table whose change events affect this area
    #[inline]
    #[must_use]
    pub fn source_table(&self) -> &'static str {
        match self {
            BadgeArea::PendingApprovals => "approvals",
            other => other.as_str(),
        }
    }

    /// Inverse of [`BadgeArea::source_table`]
    #[must_use]
    pub fn from_source_table(table: &str) -> Option<Self> {
        BadgeArea::ALL.into_iter().find(|area| area.source_table() == table)
    }
}

impl fmt::Display for BadgeArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeArea {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BadgeArea::ALL
            .into_iter()
            .find(|area| area.as_str() == s)
            .ok_or_else(|| ModelError::UnknownBadgeArea(s.to_string()))
    }
}

/// Source-of-truth unread totals per area
///
/// Always fetched whole; never derived from individual change events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnreadTotals(BTreeMap<BadgeArea, u32>);

impl UnreadTotals {
    /// No unread items anywhere
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    #[inline]
    #[must_use]
    pub fn with(mut self, area: BadgeArea, count: u32) -> Self {
        self.set(area, count);
        self
    }

    /// Set the count for an area
    #[inline]
    pub fn set(&mut self, area: BadgeArea, count: u32) {
        self.0.insert(area, count);
    }

    /// Count for an area (zero when unknown)
    #[inline]
    #[must_use]
    pub fn get(&self, area: BadgeArea) -> u32 {
        self.0.get(&area).copied().unwrap_or(0)
    }

    /// Sum over all areas
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.values().fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    /// Iterate over `(area, count)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (BadgeArea, u32)> + '_ {
        self.0.iter().map(|(area, count)| (*area, *count))
    }
}

impl FromIterator<(BadgeArea, u32)> for UnreadTotals {
    fn from_iter<T: IntoIterator<Item = (BadgeArea, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_table_round_trip() {
        for area in BadgeArea::ALL {
            assert_eq!(BadgeArea::from_source_table(area.source_table()), Some(area));
        }
        assert_eq!(BadgeArea::PendingApprovals.source_table(), "approvals");
        assert_eq!(BadgeArea::from_source_table("courses"), None);
    }

    #[test]
    fn parse_area() {
        assert_eq!("notes".parse::<BadgeArea>().unwrap(), BadgeArea::Notes);
        assert!("courses".parse::<BadgeArea>().is_err());
    }

    #[test]
    fn totals_default_to_zero_and_saturate() {
        let totals = UnreadTotals::new()
            .with(BadgeArea::Messages, u32::MAX)
            .with(BadgeArea::Notes, 3);
        assert_eq!(totals.get(BadgeArea::Assignments), 0);
        assert_eq!(totals.get(BadgeArea::Notes), 3);
        assert_eq!(totals.total(), u32::MAX);
    }

    #[test]
    fn totals_serialize_as_map() {
        let totals: UnreadTotals = [(BadgeArea::Messages, 2)].into_iter().collect();
        assert_eq!(serde_json::to_string(&totals).unwrap(), r#"{"messages":2}"#);
    }
}
