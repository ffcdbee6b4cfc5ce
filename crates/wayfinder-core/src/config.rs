//! Navigation configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration.
//!
//! ```toml
//! landing_route = "/dashboard"
//! public_entry_route = "/login"
//! public_routes = ["/reset-password"]
//! recount_interval_secs = 30
//!
//! [[badge_routes]]
//! area = "messages"
//! route = "/messages"
//!
//! [[route_access]]
//! prefix = "/admin"
//! roles = ["administrator"]
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use wayfinder_guard::{AccessGuard, RouteAccessTable};
use wayfinder_model::{default_nav_items, BadgeArea, NavItem, Role, RoutePath};

/// Route carrying the counter of one badge area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRoute {
    pub area: BadgeArea,
    pub route: RoutePath,
}

/// Roles allowed under a route prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAccessRule {
    pub prefix: RoutePath,
    pub roles: Vec<Role>,
}

/// Navigation service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// Where denied sessions land
    pub landing_route: RoutePath,
    /// Where anonymous visitors are sent
    pub public_entry_route: RoutePath,
    /// Routes reachable without a session
    pub public_routes: Vec<RoutePath>,
    /// Full recount period while the change subscription is down
    pub recount_interval_secs: u64,
    /// Give categories the sum of their children's badges
    pub roll_up_category_badges: bool,
    /// Shown when no role config resolves
    pub default_items: Vec<NavItem>,
    pub badge_routes: Vec<BadgeRoute>,
    pub route_access: Vec<RouteAccessRule>,
}

impl Default for NavConfig {
    fn default() -> Self {
        let root = RoutePath::root();
        Self {
            landing_route: root.child("dashboard"),
            public_entry_route: root.child("login"),
            public_routes: Vec::new(),
            recount_interval_secs: 30,
            roll_up_category_badges: false,
            default_items: default_nav_items(),
            badge_routes: vec![
                BadgeRoute { area: BadgeArea::Messages, route: root.child("messages") },
                BadgeRoute { area: BadgeArea::Assignments, route: root.child("assignments") },
                BadgeRoute { area: BadgeArea::Notifications, route: root.child("notifications") },
                BadgeRoute { area: BadgeArea::Notes, route: root.child("notes") },
                BadgeRoute { area: BadgeArea::PendingApprovals, route: root.child("approvals") },
            ],
            route_access: Vec::new(),
        }
    }
}

impl NavConfig {
    /// Create config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_landing_route(mut self, route: RoutePath) -> Self {
        self.landing_route = route;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_public_entry_route(mut self, route: RoutePath) -> Self {
        self.public_entry_route = route;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_public_route(mut self, route: RoutePath) -> Self {
        self.public_routes.push(route);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_default_items(mut self, items: Vec<NavItem>) -> Self {
        self.default_items = items;
        self
    }

    /// Map an area to a route, replacing any existing mapping
    #[must_use]
    pub fn with_badge_route(mut self, area: BadgeArea, route: RoutePath) -> Self {
        self.badge_routes.retain(|entry| entry.area != area);
        self.badge_routes.push(BadgeRoute { area, route });
        self
    }

    /// Stored in whole seconds, rounding any fraction up
    #[inline]
    #[must_use]
    pub fn with_recount_interval(mut self, interval: Duration) -> Self {
        self.recount_interval_secs = interval.as_secs() + u64::from(interval.subsec_nanos() > 0);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_roll_up(mut self, enabled: bool) -> Self {
        self.roll_up_category_badges = enabled;
        self
    }

    #[must_use]
    pub fn with_route_access(mut self, prefix: RoutePath, roles: impl IntoIterator<Item = Role>) -> Self {
        self.route_access.push(RouteAccessRule {
            prefix,
            roles: roles.into_iter().collect(),
        });
        self
    }

    #[inline]
    #[must_use]
    pub fn recount_interval(&self) -> Duration {
        Duration::from_secs(self.recount_interval_secs)
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] or [`ConfigError::Invalid`]
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, else as
    /// [`NavConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!("Loaded navigation config from {}", path.display());
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] describing the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recount_interval_secs == 0 {
            return Err(ConfigError::Invalid("recount_interval_secs must be at least 1".into()));
        }
        if self.public_entry_route.is_root() {
            return Err(ConfigError::Invalid(
                "public_entry_route cannot be '/' (it would make every route public)".into(),
            ));
        }
        if let Some(route) = self.public_routes.iter().find(|route| route.is_root()) {
            return Err(ConfigError::Invalid(format!("public route '{route}' covers every route")));
        }
        if self.default_items.is_empty() {
            return Err(ConfigError::Invalid("default_items cannot be empty".into()));
        }
        for (index, entry) in self.badge_routes.iter().enumerate() {
            if self.badge_routes[..index].iter().any(|earlier| earlier.area == entry.area) {
                return Err(ConfigError::Invalid(format!(
                    "badge area '{}' mapped more than once",
                    entry.area.as_str()
                )));
            }
        }

        let guard = self.access_guard();
        for role in Role::ALL {
            if !guard.permits(role, &self.landing_route) {
                tracing::warn!(
                    "Landing route {} is closed to role {}; denied sessions will go to {}",
                    self.landing_route,
                    role,
                    self.public_entry_route
                );
            }
        }
        Ok(())
    }

    /// Route table built from `route_access`
    #[must_use]
    pub fn route_table(&self) -> RouteAccessTable {
        self.route_access
            .iter()
            .fold(RouteAccessTable::new(), |table, rule| {
                table.with_rule(rule.prefix.clone(), rule.roles.iter().copied())
            })
    }

    /// Guard configured with routes and rules from this config
    #[must_use]
    pub fn access_guard(&self) -> AccessGuard {
        self.public_routes.iter().cloned().fold(
            AccessGuard::new(self.route_table())
                .with_landing_route(self.landing_route.clone())
                .with_public_entry_route(self.public_entry_route.clone()),
            AccessGuard::with_public_route,
        )
    }
}
