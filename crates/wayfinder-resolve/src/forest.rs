//! Arena-backed navigation forest
//!
//! Nodes live in one flat `Vec`; parent and child links are indices into it.
//! The forest is rebuilt from flat rows on every resolution and never
//! persisted nested.

use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wayfinder_model::{NavItem, NavItemId, RoutePath};

/// Index of a node inside its [`NavForest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(usize);

impl NodeIdx {
    /// Raw arena position
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One resolved item with its links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavNode {
    item: NavItem,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
}

impl NavNode {
    /// The item
    #[inline]
    #[must_use]
    pub fn item(&self) -> &NavItem {
        &self.item
    }

    /// Effective parent after orphan promotion and cycle breaking
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    /// Children in config order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }

    /// A category that actually opens a submenu
    #[inline]
    #[must_use]
    pub fn is_submenu(&self) -> bool {
        self.item.is_category() && !self.children.is_empty()
    }
}

/// Nested view of a forest for the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNode {
    #[serde(flatten)]
    pub item: NavItem,
    #[serde(default)]
    pub children: Vec<ResolvedNode>,
}

/// Outcome of linking a flat, de-duplicated item list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub forest: NavForest,
    /// `(child, missing parent)` pairs promoted to root
    pub orphans: Vec<(NavItemId, NavItemId)>,
    /// Items whose parent link was dropped to break a cycle
    pub broken_cycles: Vec<NavItemId>,
}

/// Ordered forest of navigation items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavForest {
    nodes: Vec<NavNode>,
    roots: Vec<NodeIdx>,
    by_id: HashMap<NavItemId, NodeIdx>,
}

impl NavForest {
    /// Empty forest
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link items, discarding the assembly diagnostics
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = NavItem>) -> Self {
        Self::assemble(items).forest
    }

    /// Link items into a forest
    ///
    /// Input order is the sibling order at every level. Duplicate ids keep
    /// their first occurrence. An item becomes a root when it has no parent,
    /// when its parent is not in the set (orphan promotion), when it names
    /// itself, or when it is the first member (in input order) of a parent
    /// cycle.
    #[must_use]
    pub fn assemble(items: impl IntoIterator<Item = NavItem>) -> Assembly {
        let mut unique: IndexMap<NavItemId, NavItem> = IndexMap::new();
        for item in items {
            unique.entry(item.id.clone()).or_insert(item);
        }
        let items: Vec<NavItem> = unique.into_values().collect();

        let mut orphans = Vec::new();
        let mut cut = Vec::new();
        let mut parents: Vec<Option<usize>> = {
            let position: HashMap<&NavItemId, usize> = items
                .iter()
                .enumerate()
                .map(|(index, item)| (&item.id, index))
                .collect();

            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let parent_id = item.parent_id.as_ref()?;
                    match position.get(parent_id) {
                        // Naming itself is not a cycle to report
                        Some(&parent) if parent == index => None,
                        Some(&parent) => Some(parent),
                        None => {
                            orphans.push((item.id.clone(), parent_id.clone()));
                            None
                        }
                    }
                })
                .collect()
        };

        // Every node has at most one outgoing edge, so each non-trivial
        // strongly connected component is exactly one cycle.
        let mut graph = DiGraph::<usize, ()>::with_capacity(items.len(), items.len());
        let handles: Vec<NodeIndex> = (0..items.len()).map(|i| graph.add_node(i)).collect();
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                graph.add_edge(handles[child], handles[*parent], ());
            }
        }
        for component in tarjan_scc(&graph) {
            if component.len() < 2 {
                continue;
            }
            if let Some(first) = component.iter().map(|handle| graph[*handle]).min() {
                parents[first] = None;
                cut.push(first);
            }
        }
        cut.sort_unstable();
        let broken_cycles = cut.iter().map(|&index| items[index].id.clone()).collect();

        let mut nodes: Vec<NavNode> = items
            .into_iter()
            .zip(&parents)
            .map(|(item, parent)| NavNode {
                item,
                parent: parent.map(NodeIdx),
                children: Vec::new(),
            })
            .collect();

        let mut roots = Vec::new();
        for (index, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => nodes[*parent].children.push(NodeIdx(index)),
                None => roots.push(NodeIdx(index)),
            }
        }

        let by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.item.id.clone(), NodeIdx(index)))
            .collect();

        Assembly {
            forest: NavForest { nodes, roots, by_id },
            orphans,
            broken_cycles,
        }
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// No nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in config order
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    /// Node at index
    #[inline]
    #[must_use]
    pub fn get(&self, idx: NodeIdx) -> Option<&NavNode> {
        self.nodes.get(idx.0)
    }

    /// Item at index
    #[inline]
    #[must_use]
    pub fn item(&self, idx: NodeIdx) -> Option<&NavItem> {
        self.get(idx).map(NavNode::item)
    }

    /// Children of a node (empty for unknown indices)
    #[inline]
    #[must_use]
    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.get(idx).map(NavNode::children).unwrap_or_default()
    }

    /// Parent of a node
    #[inline]
    #[must_use]
    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.get(idx).and_then(NavNode::parent)
    }

    /// Lookup by item id
    #[inline]
    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeIdx> {
        self.by_id.get(id).copied()
    }

    /// Whether an item id is present
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Items in arena (config) order
    pub fn iter(&self) -> impl Iterator<Item = &NavItem> {
        self.nodes.iter().map(NavNode::item)
    }

    /// Ancestors, closest first
    #[must_use]
    pub fn ancestors(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        let mut out = Vec::new();
        let mut current = self.parent(idx);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Root depth is zero
    #[inline]
    #[must_use]
    pub fn depth(&self, idx: NodeIdx) -> usize {
        self.ancestors(idx).len()
    }

    /// Pre-order traversal, siblings in config order
    #[must_use]
    pub fn walk(&self) -> Vec<NodeIdx> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeIdx> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.children(idx).iter().rev().copied());
        }
        out
    }

    /// Items from the root down to `idx` inclusive
    #[must_use]
    pub fn breadcrumb(&self, idx: NodeIdx) -> Vec<&NavItem> {
        let mut trail: Vec<&NavItem> = self
            .ancestors(idx)
            .into_iter()
            .rev()
            .filter_map(|ancestor| self.item(ancestor))
            .collect();
        trail.extend(self.item(idx));
        trail
    }

    /// First node whose route is `route`, else the first one under it
    ///
    /// Both searches run in pre-order. External links never match.
    #[must_use]
    pub fn find_by_route(&self, route: &RoutePath) -> Option<NodeIdx> {
        let candidates: Vec<(NodeIdx, RoutePath)> = self
            .walk()
            .into_iter()
            .filter_map(|idx| {
                let item = self.item(idx)?;
                if item.opens_externally() {
                    return None;
                }
                let parsed = item.route.as_deref()?.parse::<RoutePath>().ok()?;
                Some((idx, parsed))
            })
            .collect();

        candidates
            .iter()
            .find(|(_, candidate)| candidate == route)
            .or_else(|| candidates.iter().find(|(_, candidate)| route.is_prefix_of(candidate)))
            .map(|(idx, _)| *idx)
    }

    /// Set or clear the badge of an item; false when the id is absent
    pub fn set_badge(&mut self, id: &str, badge: Option<u32>) -> bool {
        match self.find(id) {
            Some(idx) => {
                self.nodes[idx.0].item.badge = badge;
                true
            }
            None => false,
        }
    }

    /// Clear every badge
    pub fn clear_badges(&mut self) {
        for node in &mut self.nodes {
            node.item.badge = None;
        }
    }

    /// Give each submenu the sum of its descendants' badges
    pub fn roll_up_badges(&mut self) {
        for idx in self.walk().into_iter().rev() {
            let node = &self.nodes[idx.0];
            if !node.is_submenu() {
                continue;
            }
            let sum = node
                .children
                .iter()
                .filter_map(|child| self.nodes[child.0].item.badge)
                .fold(0u32, u32::saturating_add);
            self.nodes[idx.0].item.badge = (sum > 0).then_some(sum);
        }
    }

    /// Nested copy for rendering or serialization
    #[must_use]
    pub fn to_tree(&self) -> Vec<ResolvedNode> {
        self.roots.iter().map(|idx| self.subtree(*idx)).collect()
    }

    fn subtree(&self, idx: NodeIdx) -> ResolvedNode {
        let node = &self.nodes[idx.0];
        ResolvedNode {
            item: node.item.clone(),
            children: node.children.iter().map(|child| self.subtree(*child)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(forest: &NavForest, ids: &[NodeIdx]) -> Vec<String> {
        ids.iter()
            .filter_map(|idx| forest.item(*idx))
            .map(|item| item.id.to_string())
            .collect()
    }

    fn sample() -> NavForest {
        NavForest::from_items(vec![
            NavItem::category("learning", "Learning"),
            NavItem::route("courses", "Courses", "/courses").with_parent("learning"),
            NavItem::route("notes", "Notes", "/notes").with_parent("learning"),
            NavItem::route("messages", "Messages", "/messages"),
            NavItem::route("inbox", "Inbox", "/messages/inbox").with_parent("messages"),
        ])
    }

    #[test]
    fn links_children_in_input_order() {
        let forest = sample();
        assert_eq!(labels(&forest, forest.roots()), vec!["learning", "messages"]);
        let learning = forest.find("learning").unwrap();
        assert_eq!(labels(&forest, forest.children(learning)), vec!["courses", "notes"]);
    }

    #[test]
    fn missing_parent_promotes_to_root() {
        let assembly = NavForest::assemble(vec![
            NavItem::route("m2", "Child", "/child").with_parent("m1"),
        ]);
        assert_eq!(labels(&assembly.forest, assembly.forest.roots()), vec!["m2"]);
        assert_eq!(
            assembly.orphans,
            vec![(NavItemId::new("m2"), NavItemId::new("m1"))]
        );
    }

    #[test]
    fn self_parent_is_root() {
        let assembly = NavForest::assemble(vec![NavItem::category("loop", "Loop").with_parent("loop")]);
        assert_eq!(assembly.forest.roots().len(), 1);
        assert!(assembly.broken_cycles.is_empty());
        assert!(assembly.orphans.is_empty());
    }

    #[test]
    fn cycle_is_broken_at_first_member() {
        let assembly = NavForest::assemble(vec![
            NavItem::category("a", "A").with_parent("c"),
            NavItem::category("b", "B").with_parent("a"),
            NavItem::category("c", "C").with_parent("b"),
            NavItem::route("d", "D", "/d").with_parent("c"),
        ]);
        let forest = &assembly.forest;
        assert_eq!(assembly.broken_cycles, vec![NavItemId::new("a")]);
        assert_eq!(labels(forest, forest.roots()), vec!["a"]);
        assert_eq!(labels(forest, &forest.walk()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let forest = NavForest::from_items(vec![
            NavItem::route("x", "First", "/x"),
            NavItem::route("x", "Second", "/y"),
        ]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.item(forest.find("x").unwrap()).unwrap().label, "First");
    }

    #[test]
    fn walk_is_pre_order() {
        let forest = sample();
        assert_eq!(
            labels(&forest, &forest.walk()),
            vec!["learning", "courses", "notes", "messages", "inbox"]
        );
    }

    #[test]
    fn ancestors_depth_and_breadcrumb() {
        let forest = NavForest::from_items(vec![
            NavItem::category("a", "A"),
            NavItem::category("b", "B").with_parent("a"),
            NavItem::route("c", "C", "/c").with_parent("b"),
        ]);
        let c = forest.find("c").unwrap();
        assert_eq!(forest.depth(c), 2);
        assert_eq!(labels(&forest, &forest.ancestors(c)), vec!["b", "a"]);
        let trail: Vec<_> = forest.breadcrumb(c).iter().map(|i| i.label.clone()).collect();
        assert_eq!(trail, vec!["A", "B", "C"]);
    }

    #[test]
    fn find_by_route_prefers_exact_match() {
        let forest = sample();
        let exact = forest.find_by_route(&"/messages".parse().unwrap()).unwrap();
        assert_eq!(forest.item(exact).unwrap().id.as_str(), "messages");

        let nested = forest.find_by_route(&"/messages/inbox".parse().unwrap()).unwrap();
        assert_eq!(forest.item(nested).unwrap().id.as_str(), "inbox");
    }

    #[test]
    fn find_by_route_falls_back_to_descendant_route() {
        let forest = NavForest::from_items(vec![NavItem::route("inbox", "Inbox", "/messages/inbox")]);
        let found = forest.find_by_route(&"/messages".parse().unwrap()).unwrap();
        assert_eq!(forest.item(found).unwrap().id.as_str(), "inbox");
        assert!(forest.find_by_route(&"/grades".parse().unwrap()).is_none());
    }

    #[test]
    fn external_links_never_match_routes() {
        let forest = NavForest::from_items(vec![NavItem::external("ext", "Ext", "https://x.org/messages")]);
        assert!(forest.find_by_route(&"/messages".parse().unwrap()).is_none());
    }

    #[test]
    fn badges_set_clear_and_roll_up() {
        let mut forest = sample();
        assert!(forest.set_badge("courses", Some(2)));
        assert!(forest.set_badge("notes", Some(3)));
        assert!(!forest.set_badge("missing", Some(1)));

        forest.roll_up_badges();
        let learning = forest.find("learning").unwrap();
        assert_eq!(forest.item(learning).unwrap().badge, Some(5));
        // Route parents are not submenus and keep their own badge.
        let messages = forest.find("messages").unwrap();
        assert_eq!(forest.item(messages).unwrap().badge, None);

        forest.clear_badges();
        assert!(forest.iter().all(|item| item.badge.is_none()));
    }

    #[test]
    fn nested_tree_serializes_flat_item_fields() {
        let tree = sample().to_tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 2);
        let json = serde_json::to_value(&tree[1]).unwrap();
        assert_eq!(json["id"], "messages");
        assert_eq!(json["children"][0]["id"], "inbox");
    }
}
