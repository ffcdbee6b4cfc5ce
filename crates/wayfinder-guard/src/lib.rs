//! Wayfinder Guard
//!
//! Role-based access checks evaluated on every route entry, independent of
//! what the menu shows.
//!
//! # Core Concepts
//!
//! - [`can_enter`]: Role against an optional allow-list
//! - [`RouteAccessTable`]: Route prefix rules with longest segment-prefix lookup
//! - [`AccessGuard`]: Session-aware decision with loop-free redirects
//! - [`Router`]: Host router seam used by [`AccessGuard::enforce`]
//!
//! # Example
//!
//! ```rust
//! use wayfinder_guard::{AccessGuard, RouteAccessTable};
//! use wayfinder_model::{Profile, Role, RoutePath};
//!
//! let admin: RoutePath = "/admin".parse().unwrap();
//! let guard = AccessGuard::new(RouteAccessTable::new().with_rule(admin, [Role::Administrator]));
//!
//! let student = Profile::new("u1", Role::Student);
//! let decision = guard.check(Some(&student), &"/admin/users".parse().unwrap());
//!
//! assert_eq!(decision.redirect_target().map(ToString::to_string), Some("/dashboard".into()));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod policy;
pub mod router;
pub mod table;

pub use policy::{can_enter, AccessGuard, GuardDecision, RedirectReason};
pub use router::Router;
pub use table::{RouteAccessTable, RouteRule};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for guarding routes
    pub use crate::{can_enter, AccessGuard, GuardDecision, RouteAccessTable, Router};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
