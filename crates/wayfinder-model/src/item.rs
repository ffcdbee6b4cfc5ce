//! Navigation items
//!
//! A [`NavItem`] is one row of the `nav_items` table. Hierarchy is expressed
//! only through `parent_id`; children are never embedded.

use crate::ids::NavItemId;
use serde::{Deserialize, Serialize};

/// Identifier of the fallback home entry
pub const HOME_ITEM_ID: &str = "home";

/// Identifier of the fallback logout action
pub const LOGOUT_ITEM_ID: &str = "logout";

/// Variant of a navigation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NavItemKind {
    /// Internal application route
    #[default]
    Route,
    /// Submenu container, or an action when it has no children
    CategoryOrAction,
    /// Absolute URL opened in a new context
    ExternalLink,
}

/// Where activating an item leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Destination {
    /// In-app path handed to the router
    Internal(String),
    /// Absolute URL for a new browsing context
    External(String),
    /// Named action handled by the UI layer (e.g. logout)
    Action(NavItemId),
}

/// One navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: NavItemId,
    pub label: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NavItemKind,
    #[serde(default)]
    pub parent_id: Option<NavItemId>,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub description: Option<String>,
    /// Computed at resolution time, never authoritative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
}

impl NavItem {
    fn base(id: impl Into<NavItemId>, label: impl Into<String>, kind: NavItemKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            route: None,
            icon_name: None,
            kind,
            parent_id: None,
            is_external: false,
            description: None,
            badge: None,
        }
    }

    /// Internal route entry
    #[must_use]
    pub fn route(id: impl Into<NavItemId>, label: impl Into<String>, path: impl Into<String>) -> Self {
        let mut item = Self::base(id, label, NavItemKind::Route);
        item.route = Some(path.into());
        item
    }

    /// Pure category node (no route)
    #[must_use]
    pub fn category(id: impl Into<NavItemId>, label: impl Into<String>) -> Self {
        Self::base(id, label, NavItemKind::CategoryOrAction)
    }

    /// Action entry; structurally identical to a childless category
    #[must_use]
    pub fn action(id: impl Into<NavItemId>, label: impl Into<String>) -> Self {
        Self::base(id, label, NavItemKind::CategoryOrAction)
    }

    /// External link entry
    #[must_use]
    pub fn external(id: impl Into<NavItemId>, label: impl Into<String>, url: impl Into<String>) -> Self {
        let mut item = Self::base(id, label, NavItemKind::ExternalLink);
        item.route = Some(url.into());
        item.is_external = true;
        item
    }

    /// Set parent back-reference
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<NavItemId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Set icon reference
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon_name = Some(icon.into());
        self
    }

    /// Set subtitle
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when the row can hold children: no route and not external
    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        self.route.is_none() && !self.opens_externally()
    }

    /// External link or flagged external
    #[inline]
    #[must_use]
    pub fn opens_externally(&self) -> bool {
        self.is_external || self.kind == NavItemKind::ExternalLink
    }

    /// Where activating this item leads
    #[must_use]
    pub fn destination(&self) -> Destination {
        match (&self.route, self.opens_externally()) {
            (Some(url), true) => Destination::External(url.clone()),
            (Some(path), false) => Destination::Internal(path.clone()),
            (None, _) => Destination::Action(self.id.clone()),
        }
    }
}

/// Minimal set shown when nothing else can be resolved: home + logout
#[must_use]
pub fn default_nav_items() -> Vec<NavItem> {
    vec![
        NavItem::route(HOME_ITEM_ID, "Home", "/").with_icon("home"),
        NavItem::action(LOGOUT_ITEM_ID, "Log out").with_icon("logout"),
    ]
}
