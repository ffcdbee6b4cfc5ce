//! Drill-down state machine for one display surface
//!
//! The stack holds category ids from the opened root down to the level
//! being shown. Leaves never enter the stack: selecting one emits a single
//! [`Effect::Navigate`] and closes the menu.

use crate::error::StackError;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use wayfinder_model::{Destination, NavItem, NavItemId};
use wayfinder_resolve::{NavForest, NavNode, NodeIdx};

/// Menu state of a surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StackState {
    #[default]
    Closed,
    /// Root-to-current category ids, never empty
    Showing(Vec<NavItemId>),
}

impl StackState {
    /// Discriminant without the stack
    #[inline]
    #[must_use]
    pub fn kind(&self) -> StateKind {
        match self {
            StackState::Closed => StateKind::Closed,
            StackState::Showing(_) => StateKind::Showing,
        }
    }
}

/// State discriminant used by the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Closed,
    Showing,
}

/// Operations that drive the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Open,
    /// Select a category that has children
    SelectSubmenu,
    /// Select anything else
    SelectLeaf,
    Back,
    Close,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Leave the menu and go somewhere
    Navigate {
        item: NavItemId,
        destination: Destination,
    },
}

/// Every legal `(operation, resulting state)` pair from a state
#[must_use]
pub fn allowed_transitions(from: StateKind) -> Vec<(Operation, StateKind)> {
    use Operation::*;
    use StateKind::*;
    match from {
        Closed => vec![(Open, Showing), (Back, Closed), (Close, Closed)],
        Showing => vec![
            (Open, Showing),
            (SelectSubmenu, Showing),
            (SelectLeaf, Closed),
            (Back, Showing),
            (Back, Closed),
            (Close, Closed),
        ],
    }
}

/// Whether a transition appears in the table
#[must_use]
pub fn is_allowed(from: StateKind, operation: Operation, to: StateKind) -> bool {
    allowed_transitions(from)
        .into_iter()
        .any(|(op, target)| op == operation && target == to)
}

/// Stack controller bound to one surface
#[derive(Debug, Clone)]
pub struct StackController {
    surface: Surface,
    state: StackState,
}

impl StackController {
    /// Closed controller
    #[inline]
    #[must_use]
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            state: StackState::Closed,
        }
    }

    #[inline]
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &StackState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, StackState::Showing(_))
    }

    /// Category ids from root to current; empty when closed
    #[must_use]
    pub fn stack(&self) -> &[NavItemId] {
        match &self.state {
            StackState::Closed => &[],
            StackState::Showing(stack) => stack,
        }
    }

    /// Category being shown
    #[must_use]
    pub fn top(&self) -> Option<&NavItemId> {
        self.stack().last()
    }

    /// Open the menu at a category, replacing any open stack
    ///
    /// # Errors
    ///
    /// [`StackError::UnknownItem`] or [`StackError::NotACategory`]
    pub fn open(&mut self, forest: &NavForest, root: &str) -> Result<(), StackError> {
        let idx = forest
            .find(root)
            .ok_or_else(|| StackError::UnknownItem(root.into()))?;
        let node = forest
            .get(idx)
            .ok_or_else(|| StackError::UnknownItem(root.into()))?;
        // A childless category is an action; there is no level to show
        if !node.is_submenu() {
            return Err(StackError::NotACategory(node.item().id.clone()));
        }

        let before = self.kind();
        self.state = StackState::Showing(vec![node.item().id.clone()]);
        self.record(before, Operation::Open);
        Ok(())
    }

    /// Select an item from the current level
    ///
    /// A category with children is pushed. Anything else yields exactly one
    /// navigate effect and closes the menu.
    ///
    /// # Errors
    ///
    /// [`StackError::Closed`], [`StackError::UnknownItem`] or
    /// [`StackError::NotInCurrentLevel`]
    pub fn select_child(
        &mut self,
        forest: &NavForest,
        item: &str,
    ) -> Result<Option<Effect>, StackError> {
        let top = self.top().ok_or(StackError::Closed)?;
        let idx = forest
            .find(item)
            .ok_or_else(|| StackError::UnknownItem(item.into()))?;
        let parent = forest.parent(idx).and_then(|parent| forest.item(parent));
        if parent.map(|parent| &parent.id) != Some(top) {
            return Err(StackError::NotInCurrentLevel { item: item.into() });
        }
        let node = forest
            .get(idx)
            .ok_or_else(|| StackError::UnknownItem(item.into()))?;

        let before = self.kind();
        if node.is_submenu() {
            if let StackState::Showing(stack) = &mut self.state {
                stack.push(node.item().id.clone());
            }
            self.record(before, Operation::SelectSubmenu);
            return Ok(None);
        }

        let effect = Effect::Navigate {
            item: node.item().id.clone(),
            destination: node.item().destination(),
        };
        self.state = StackState::Closed;
        self.record(before, Operation::SelectLeaf);
        Ok(Some(effect))
    }

    /// Pop one level; closes when the stack empties. No-op when closed.
    pub fn back(&mut self) {
        let before = self.kind();
        if let StackState::Showing(stack) = &mut self.state {
            stack.pop();
            if stack.is_empty() {
                self.state = StackState::Closed;
            }
        }
        self.record(before, Operation::Back);
    }

    /// Close unconditionally
    pub fn close(&mut self) {
        let before = self.kind();
        self.state = StackState::Closed;
        self.record(before, Operation::Close);
    }

    /// Items to render: the roots when closed, else the top's children
    #[must_use]
    pub fn current_level<'f>(&self, forest: &'f NavForest) -> Vec<&'f NavItem> {
        let level: &[NodeIdx] = match self.top() {
            None => forest.roots(),
            Some(top) => match forest.find(top.as_str()) {
                Some(idx) => forest.children(idx),
                None => &[],
            },
        };
        level.iter().filter_map(|idx| forest.item(*idx)).collect()
    }

    /// Labels of the stacked categories, root first
    #[must_use]
    pub fn breadcrumb(&self, forest: &NavForest) -> Vec<String> {
        self.stack()
            .iter()
            .filter_map(|id| forest.find(id.as_str()).and_then(|idx| forest.item(idx)))
            .map(|item| item.label.clone())
            .collect()
    }

    /// Keep the longest stack prefix still valid in a new forest
    ///
    /// Each kept id must exist as a category that still has children, and
    /// every id after the first must still be a child of the one before it.
    pub fn reconcile(&mut self, forest: &NavForest) {
        let StackState::Showing(stack) = &mut self.state else {
            return;
        };

        let mut keep = 0;
        let mut previous = None;
        for id in stack.iter() {
            let Some(idx) = forest.find(id.as_str()) else {
                break;
            };
            let is_submenu = forest.get(idx).is_some_and(NavNode::is_submenu);
            if !is_submenu || (previous.is_some() && forest.parent(idx) != previous) {
                break;
            }
            previous = Some(idx);
            keep += 1;
        }

        if keep < stack.len() {
            tracing::debug!(
                "Truncating {} stack from {} to {} levels after new resolution",
                self.surface,
                stack.len(),
                keep
            );
            stack.truncate(keep);
        }
        if stack.is_empty() {
            self.state = StackState::Closed;
        }
    }

    fn record(&self, before: StateKind, operation: Operation) {
        let after = self.kind();
        debug_assert!(
            is_allowed(before, operation, after),
            "illegal stack transition {before:?} -{operation:?}-> {after:?}"
        );
        tracing::trace!("{} stack: {:?} -{:?}-> {:?}", self.surface, before, operation, after);
    }
}
