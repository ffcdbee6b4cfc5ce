//! Display surfaces and the per-session pair of stacks

use crate::controller::{Effect, StackController};
use crate::displayed::{DisplayedNav, Sequence};
use crate::error::StackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use wayfinder_model::NavItem;
use wayfinder_resolve::NavForest;

/// Where a menu is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Desktop,
    Mobile,
}

impl Surface {
    pub const ALL: [Surface; 2] = [Surface::Desktop, Surface::Mobile];

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Desktop => "desktop",
            Surface::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displayed forest plus one independent controller per surface
///
/// Accepting a newer forest reconciles both controllers against it.
#[derive(Debug, Clone)]
pub struct NavigationStacks {
    displayed: DisplayedNav,
    desktop: StackController,
    mobile: StackController,
}

impl Default for NavigationStacks {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStacks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            displayed: DisplayedNav::new(),
            desktop: StackController::new(Surface::Desktop),
            mobile: StackController::new(Surface::Mobile),
        }
    }

    #[inline]
    #[must_use]
    pub fn displayed(&self) -> &DisplayedNav {
        &self.displayed
    }

    #[inline]
    #[must_use]
    pub fn forest(&self) -> &NavForest {
        self.displayed.forest()
    }

    #[must_use]
    pub fn controller(&self, surface: Surface) -> &StackController {
        match surface {
            Surface::Desktop => &self.desktop,
            Surface::Mobile => &self.mobile,
        }
    }

    /// Offer a resolution; reconciles both surfaces when applied
    pub fn accept(&mut self, seq: Sequence, forest: NavForest) -> bool {
        if !self.displayed.accept(seq, forest) {
            return false;
        }
        let forest = self.displayed.forest();
        self.desktop.reconcile(forest);
        self.mobile.reconcile(forest);
        true
    }

    /// Copy badge counts from a patched forest onto the displayed one
    pub fn update_badges(&mut self, patched: &NavForest) {
        self.displayed.update_badges(patched);
    }

    /// # Errors
    ///
    /// See [`StackController::open`]
    pub fn open(&mut self, surface: Surface, root: &str) -> Result<(), StackError> {
        let (controller, forest) = self.split(surface);
        controller.open(forest, root)
    }

    /// # Errors
    ///
    /// See [`StackController::select_child`]
    pub fn select_child(
        &mut self,
        surface: Surface,
        item: &str,
    ) -> Result<Option<Effect>, StackError> {
        let (controller, forest) = self.split(surface);
        controller.select_child(forest, item)
    }

    pub fn back(&mut self, surface: Surface) {
        self.split(surface).0.back();
    }

    pub fn close(&mut self, surface: Surface) {
        self.split(surface).0.close();
    }

    #[must_use]
    pub fn current_level(&self, surface: Surface) -> Vec<&NavItem> {
        self.controller(surface).current_level(self.displayed.forest())
    }

    #[must_use]
    pub fn breadcrumb(&self, surface: Surface) -> Vec<String> {
        self.controller(surface).breadcrumb(self.displayed.forest())
    }

    /// Sign-out: close both menus and drop the forest
    pub fn clear(&mut self) {
        self.displayed.clear();
        self.desktop.close();
        self.mobile.close();
    }

    fn split(&mut self, surface: Surface) -> (&mut StackController, &NavForest) {
        let controller = match surface {
            Surface::Desktop => &mut self.desktop,
            Surface::Mobile => &mut self.mobile,
        };
        (controller, self.displayed.forest())
    }
}
