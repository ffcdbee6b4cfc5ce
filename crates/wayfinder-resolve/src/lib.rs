//! Wayfinder Resolve
//!
//! Builds the navigation forest a session sees from flat storage rows.
//!
//! # Core Concepts
//!
//! - [`Resolver`]: Picks the role config and links its items
//! - [`NavForest`]: Arena-backed ordered forest with route and breadcrumb queries
//! - [`ConfigSource`]: Whether the establishment row, the general row or the default set won
//! - [`ResolutionIssue`]: Stale references, duplicates, orphans and cycles worked around
//!
//! Resolution never fails. Broken configuration degrades to fewer items or
//! the default set, and every workaround is reported.
//!
//! # Example
//!
//! ```rust
//! use wayfinder_model::{NavItem, Role, RoleNavConfig};
//! use wayfinder_resolve::{ConfigSource, Resolver};
//!
//! let items = vec![
//!     NavItem::category("courses", "Courses"),
//!     NavItem::route("catalogue", "Catalogue", "/courses").with_parent("courses"),
//! ];
//! let configs = vec![RoleNavConfig::new("student", Role::Student).with_items(["courses", "catalogue"])];
//!
//! let resolution = Resolver::new().resolve(Role::Student, None, &items, &configs);
//!
//! assert_eq!(resolution.source, ConfigSource::General);
//! assert_eq!(resolution.forest.roots().len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod forest;
pub mod issue;
pub mod resolver;
pub mod select;

pub use forest::{Assembly, NavForest, NavNode, NodeIdx, ResolvedNode};
pub use issue::ResolutionIssue;
pub use resolver::{Resolution, Resolver};
pub use select::{select, Candidate, ConfigSource, Selection};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for resolving navigation
    pub use crate::{ConfigSource, NavForest, NodeIdx, Resolution, ResolutionIssue, Resolver};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
