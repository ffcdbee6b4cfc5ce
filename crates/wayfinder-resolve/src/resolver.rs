//! Role configuration resolution
//!
//! Turns flat storage rows into the forest shown to one session:
//!
//! 1. Pick config rows (specific, then general) via [`select`](crate::select::select)
//! 2. Order each row's references and drop stale ones and duplicates
//! 3. Link the survivors by `parent_id` with orphan promotion and cycle breaking
//! 4. Fall back to the default set when nothing survives
//!
//! Resolution is pure and total: the same rows always give the same forest
//! and nothing here can fail.

use crate::forest::NavForest;
use crate::issue::ResolutionIssue;
use crate::select::{select, Candidate, ConfigSource};
use std::collections::{HashMap, HashSet};
use wayfinder_model::{
    default_nav_items, EstablishmentId, NavItem, NavItemId, Profile, Role, RoleNavConfig,
};

/// Forest for one session plus what it took to build it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub forest: NavForest,
    pub source: ConfigSource,
    /// Row that produced the forest; `None` for the default set
    pub config_id: Option<String>,
    pub issues: Vec<ResolutionIssue>,
}

impl Resolution {
    /// Built from the default set
    #[inline]
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.source == ConfigSource::Default
    }

    /// Whether any issue points at data an administrator should fix
    #[must_use]
    pub fn has_config_drift(&self) -> bool {
        self.issues.iter().any(ResolutionIssue::is_config_drift)
    }
}

/// Resolves role configurations against the item catalogue
#[derive(Debug, Clone)]
pub struct Resolver {
    defaults: Vec<NavItem>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Resolver falling back to home and logout
    #[must_use]
    pub fn new() -> Self {
        Self {
            defaults: default_nav_items(),
        }
    }

    /// Use a custom default set
    #[inline]
    #[must_use]
    pub fn with_defaults(mut self, defaults: Vec<NavItem>) -> Self {
        self.defaults = defaults;
        self
    }

    /// The fallback items
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &[NavItem] {
        &self.defaults
    }

    /// Forest of the default set alone
    #[must_use]
    pub fn fallback(&self) -> Resolution {
        Resolution {
            forest: NavForest::from_items(self.defaults.iter().cloned().map(without_badge)),
            source: ConfigSource::Default,
            config_id: None,
            issues: Vec::new(),
        }
    }

    /// Resolve for a signed-in profile
    #[must_use]
    pub fn resolve_for(
        &self,
        profile: &Profile,
        items: &[NavItem],
        configs: &[RoleNavConfig],
    ) -> Resolution {
        self.resolve(profile.role, profile.establishment_id.as_ref(), items, configs)
    }

    /// Resolve the forest for a role and optional establishment
    ///
    /// Candidates are tried in preference order; the first that yields at
    /// least one item wins. Issues from rejected candidates are kept so
    /// administrators see every broken row touched.
    #[must_use]
    pub fn resolve(
        &self,
        role: Role,
        establishment: Option<&EstablishmentId>,
        items: &[NavItem],
        configs: &[RoleNavConfig],
    ) -> Resolution {
        let selection = select(configs, role, establishment);
        let mut issues = selection.issues;

        let mut catalogue: HashMap<&NavItemId, &NavItem> = HashMap::with_capacity(items.len());
        for item in items {
            catalogue.entry(&item.id).or_insert(item);
        }

        for candidate in selection.candidates {
            let picked = pick_items(candidate.config, &catalogue, &mut issues);
            if picked.is_empty() {
                tracing::debug!(
                    "Config {} resolved to no items for role {}",
                    candidate.config.id,
                    role
                );
                continue;
            }
            return link(candidate, picked, issues);
        }

        tracing::info!(
            "No usable nav config for role {} ({:?}); using default navigation",
            role,
            establishment
        );
        issues.push(ResolutionIssue::FellBackToDefault {
            role,
            establishment_id: establishment.cloned(),
        });
        let mut resolution = self.fallback();
        resolution.issues = issues;
        resolution
    }
}

/// Items a config references, in display order, without stale ids or repeats
fn pick_items(
    config: &RoleNavConfig,
    catalogue: &HashMap<&NavItemId, &NavItem>,
    issues: &mut Vec<ResolutionIssue>,
) -> Vec<NavItem> {
    let mut seen: HashSet<&NavItemId> = HashSet::new();
    let mut picked = Vec::new();

    for id in config.ordered_item_ids() {
        if !seen.insert(id) {
            tracing::debug!("Config {} repeats nav item {}", config.id, id);
            issues.push(ResolutionIssue::DuplicateReference {
                config_id: config.id.clone(),
                item_id: id.clone(),
            });
            continue;
        }
        match catalogue.get(id) {
            Some(item) => picked.push(without_badge((*item).clone())),
            None => {
                tracing::warn!("Config {} references missing nav item {}", config.id, id);
                issues.push(ResolutionIssue::StaleConfigReference {
                    config_id: config.id.clone(),
                    item_id: id.clone(),
                });
            }
        }
    }

    picked
}

fn link(
    candidate: Candidate<'_>,
    picked: Vec<NavItem>,
    mut issues: Vec<ResolutionIssue>,
) -> Resolution {
    let assembly = NavForest::assemble(picked);

    for (item_id, missing_parent) in assembly.orphans {
        tracing::debug!("Promoting {} to root: parent {} not resolved", item_id, missing_parent);
        issues.push(ResolutionIssue::OrphanPromoted {
            item_id,
            missing_parent,
        });
    }
    for item_id in assembly.broken_cycles {
        tracing::warn!("Breaking parent cycle at nav item {}", item_id);
        issues.push(ResolutionIssue::CycleBroken { item_id });
    }

    tracing::debug!(
        "Resolved {} nav items from {:?} config {}",
        assembly.forest.len(),
        candidate.source,
        candidate.config.id
    );

    Resolution {
        forest: assembly.forest,
        source: candidate.source,
        config_id: Some(candidate.config.id.clone()),
        issues,
    }
}

/// Stored badge values are never authoritative
fn without_badge(mut item: NavItem) -> NavItem {
    item.badge = None;
    item
}
