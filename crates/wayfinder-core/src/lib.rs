//! Wayfinder Core
//!
//! Session-facing navigation service for the LMS web client.
//!
//! # Core Concepts
//!
//! - [`NavigationService`]: Session lifecycle, sequenced refresh, menu stacks and route checks
//! - [`NavStore`]: Typed access to the remote item and role-config tables
//! - [`BadgeAggregator`]: Keeps unread counts applied to the displayed forest
//! - [`RemoteDataService`]: Seam to the hosted data, auth and change-notification service
//! - [`NavConfig`]: TOML configuration for routes, badges and access rules
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wayfinder_core::prelude::*;
//! use wayfinder_model::{Profile, Role, SessionEvent};
//!
//! # async fn run(remote: Arc<dyn RemoteDataService>) -> Result<(), NavError> {
//! let service = NavigationService::new(remote, NavConfig::load("wayfinder.toml")?)?;
//!
//! let profile = Profile::new("u-42", Role::Student).in_establishment("lycee-1");
//! service.handle_session_event(SessionEvent::SignedIn(profile)).await;
//!
//! // Badges now follow whoever is signed in
//! service.start_badges();
//! for item in service.current_level(Surface::Desktop) {
//!     println!("{} {:?}", item.label, item.badge);
//! }
//! service.stop_badges().await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod badge;
pub mod config;
pub mod error;
pub mod remote;
pub mod service;
pub mod store;
pub mod telemetry;

pub use badge::{apply_totals, BadgeAggregator, BadgeHandle, BadgeSettings, BadgeSink};
pub use config::{BadgeRoute, NavConfig, RouteAccessRule};
pub use error::{ConfigError, NavError};
pub use remote::{
    ChangeEvent, ChangeFilter, ChangeKind, ChangeStream, RemoteDataService, RemoteError, Router,
};
pub use service::{NavigationService, RefreshOutcome};
pub use store::NavStore;
pub use telemetry::{init_tracing, LogFormat, LOG_ENV};

pub use wayfinder_stack::Surface;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting the navigation service
    pub use crate::{
        NavConfig, NavError, NavigationService, RefreshOutcome, RemoteDataService,
        RemoteError, Router, Surface,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
