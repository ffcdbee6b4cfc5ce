//! Route prefix access rules
//!
//! Provides [`RouteAccessTable`], mapping route prefixes to the roles allowed
//! to enter them. Lookups use the longest segment-wise prefix.

use radix_trie::{Trie, TrieCommon};
use wayfinder_model::{Role, RoutePath};

/// Registered rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: RoutePath,
    pub roles: Vec<Role>,
}

/// Route prefix → allowed roles
///
/// Keys are [`RoutePath::trie_key`] strings, which end every segment with
/// `/`, so `/admin` never matches `/administration`.
#[derive(Debug)]
pub struct RouteAccessTable {
    trie: Trie<String, RouteRule>,
}

impl Default for RouteAccessTable {
    fn default() -> Self {
        Self { trie: Trie::new() }
    }
}

impl Clone for RouteAccessTable {
    fn clone(&self) -> Self {
        self.rules().cloned().collect()
    }
}

impl RouteAccessTable {
    /// Empty table; every route open to any authenticated role
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RouteAccessTable::insert`]
    #[must_use]
    pub fn with_rule(mut self, prefix: RoutePath, roles: impl IntoIterator<Item = Role>) -> Self {
        self.insert(prefix, roles);
        self
    }

    /// Register or replace a rule, returning the replaced roles
    pub fn insert(
        &mut self,
        prefix: RoutePath,
        roles: impl IntoIterator<Item = Role>,
    ) -> Option<Vec<Role>> {
        let mut roles: Vec<Role> = roles.into_iter().collect();
        roles.sort_unstable();
        roles.dedup();
        self.trie
            .insert(prefix.trie_key(), RouteRule { prefix, roles })
            .map(|old| old.roles)
    }

    /// Most specific rule covering `path`
    #[must_use]
    pub fn rule_for(&self, path: &RoutePath) -> Option<&RouteRule> {
        self.trie.get_ancestor_value(&path.trie_key())
    }

    /// Roles allowed on `path`; `None` when no rule covers it
    #[must_use]
    pub fn allowed_roles(&self, path: &RoutePath) -> Option<&[Role]> {
        self.rule_for(path).map(|rule| rule.roles.as_slice())
    }

    /// All rules in key order
    pub fn rules(&self) -> impl Iterator<Item = &RouteRule> {
        self.trie.values()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<RouteRule> for RouteAccessTable {
    fn from_iter<T: IntoIterator<Item = RouteRule>>(iter: T) -> Self {
        let mut table = Self::new();
        for rule in iter {
            table.insert(rule.prefix, rule.roles);
        }
        table
    }
}
