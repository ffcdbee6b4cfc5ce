//! Wayfinder Model
//!
//! Plain data types shared by every Wayfinder crate.
//!
//! # Core Concepts
//!
//! - [`NavItem`]: One navigable menu entry (route, category/action or external link)
//! - [`RoleNavConfig`]: Per-role (optionally per-establishment) ordered visibility list
//! - [`Role`]: Closed set of application roles
//! - [`Profile`] / [`SessionContext`]: Authenticated user scope and its lifecycle
//! - [`RoutePath`]: Normalized hierarchical route used for matching
//! - [`BadgeArea`] / [`UnreadTotals`]: Source-of-truth unread counters
//!
//! Rows are stored flat with `parent_id` back-references; nothing in this
//! crate builds trees. See `wayfinder-resolve` for that.
//!
//! # Example
//!
//! ```rust
//! use wayfinder_model::{NavItem, Role, RoleNavConfig};
//!
//! let courses = NavItem::category("courses", "Courses");
//! let catalogue = NavItem::route("catalogue", "Catalogue", "/courses").with_parent("courses");
//!
//! let config = RoleNavConfig::new("student-default", Role::Student)
//!     .with_items(["courses", "catalogue"]);
//!
//! assert!(courses.is_category());
//! assert_eq!(config.ordered_item_ids().len(), 2);
//! assert_eq!(catalogue.parent_id.as_ref().map(|p| p.as_str()), Some("courses"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod badge;
mod config;
mod error;
mod ids;
mod item;
mod role;
mod route;
mod session;

pub use badge::{BadgeArea, UnreadTotals};
pub use config::{ConfigEntry, RoleNavConfig};
pub use error::ModelError;
pub use ids::{EstablishmentId, NavItemId, UserId};
pub use item::{default_nav_items, Destination, NavItem, NavItemKind, HOME_ITEM_ID, LOGOUT_ITEM_ID};
pub use role::Role;
pub use route::RoutePath;
pub use session::{Profile, SessionChange, SessionContext, SessionEvent};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with navigation data
    pub use crate::{
        BadgeArea, Destination, EstablishmentId, NavItem, NavItemId, NavItemKind, Profile, Role,
        RoleNavConfig, RoutePath, SessionContext, UnreadTotals, UserId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
