//! Wayfinder Stack
//!
//! Drill-down menu state for the desktop and mobile surfaces.
//!
//! # Core Concepts
//!
//! - [`StackController`]: `Closed` / `Showing(stack)` state machine for one surface
//! - [`Effect`]: Navigation requested by selecting a leaf
//! - [`allowed_transitions`]: Explicit transition table
//! - [`DisplayedNav`]: Last-write-wins gating of resolutions by request sequence
//! - [`NavigationStacks`]: Displayed forest plus both surface controllers
//!
//! # Example
//!
//! ```rust
//! use wayfinder_model::NavItem;
//! use wayfinder_resolve::NavForest;
//! use wayfinder_stack::{Effect, NavigationStacks, Surface};
//!
//! let forest = NavForest::from_items([
//!     NavItem::category("courses", "Courses"),
//!     NavItem::route("catalogue", "Catalogue", "/courses").with_parent("courses"),
//! ]);
//!
//! let mut stacks = NavigationStacks::new();
//! stacks.accept(1, forest);
//! stacks.open(Surface::Mobile, "courses").unwrap();
//!
//! let effect = stacks.select_child(Surface::Mobile, "catalogue").unwrap();
//! assert!(matches!(effect, Some(Effect::Navigate { .. })));
//! assert!(!stacks.controller(Surface::Mobile).is_open());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod controller;
pub mod displayed;
pub mod error;
pub mod surface;

pub use controller::{
    allowed_transitions, is_allowed, Effect, Operation, StackController, StackState, StateKind,
};
pub use displayed::{DisplayedNav, Sequence};
pub use error::StackError;
pub use surface::{NavigationStacks, Surface};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving navigation menus
    pub use crate::{DisplayedNav, Effect, NavigationStacks, StackController, StackError, Surface};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
