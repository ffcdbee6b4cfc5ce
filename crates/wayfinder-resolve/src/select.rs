//! Config row selection
//!
//! Specific `(role, establishment)` rows override the role's general row.

use crate::issue::ResolutionIssue;
use serde::{Deserialize, Serialize};
use wayfinder_model::{EstablishmentId, Role, RoleNavConfig};

/// Which kind of row produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Row scoped to the session's establishment
    Specific,
    /// Row for the role across all establishments
    General,
    /// No usable row; built-in default set
    Default,
}

/// A config row eligible for resolution
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub source: ConfigSource,
    pub config: &'a RoleNavConfig,
}

/// Candidates in preference order plus ambiguity diagnostics
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub candidates: Vec<Candidate<'a>>,
    pub issues: Vec<ResolutionIssue>,
}

/// Pick the rows for a role and establishment
///
/// Returns at most one specific and one general candidate, specific first.
/// When storage holds several rows for the same scope, the first in input
/// order wins and the rest are reported as [`ResolutionIssue::AmbiguousRoleConfig`].
#[must_use]
pub fn select<'a>(
    configs: &'a [RoleNavConfig],
    role: Role,
    establishment: Option<&EstablishmentId>,
) -> Selection<'a> {
    let mut selection = Selection::default();

    let specific: Vec<&RoleNavConfig> = match establishment {
        Some(establishment) => configs
            .iter()
            .filter(|c| c.role == role && c.establishment_id.as_ref() == Some(establishment))
            .collect(),
        None => Vec::new(),
    };
    let general: Vec<&RoleNavConfig> = configs
        .iter()
        .filter(|c| c.role == role && c.is_general())
        .collect();

    for (source, rows, scope) in [
        (ConfigSource::Specific, specific, establishment.cloned()),
        (ConfigSource::General, general, None),
    ] {
        let Some((first, rest)) = rows.split_first() else {
            continue;
        };
        if !rest.is_empty() {
            tracing::warn!(
                "Ambiguous {:?} nav config for role {}: using {}, ignoring {}",
                source,
                role,
                first.id,
                rest.len()
            );
            selection.issues.push(ResolutionIssue::AmbiguousRoleConfig {
                role,
                establishment_id: scope,
                chosen: first.id.clone(),
                ignored: rest.iter().map(|c| c.id.clone()).collect(),
            });
        }
        selection.candidates.push(Candidate {
            source,
            config: first,
        });
    }

    selection
}
