//! Route entry policy
//!
//! Menu visibility is cosmetic; this is the check that actually keeps a
//! role out of a route. It runs on every route entry.

use crate::router::Router;
use crate::table::RouteAccessTable;
use serde::{Deserialize, Serialize};
use wayfinder_model::{Profile, Role, RoutePath};

/// `None` means open to any authenticated role
#[inline]
#[must_use]
pub fn can_enter(role: Role, allowed_roles: Option<&[Role]>) -> bool {
    allowed_roles.map_or(true, |roles| roles.contains(&role))
}

/// Why a redirect was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// No authenticated session
    NoSession,
    /// Role not allowed on the route
    RoleDenied,
}

/// Outcome of a route entry check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    Redirect { to: RoutePath, reason: RedirectReason },
}

impl GuardDecision {
    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Where to go instead, if anywhere
    #[inline]
    #[must_use]
    pub fn redirect_target(&self) -> Option<&RoutePath> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Redirect { to, .. } => Some(to),
        }
    }
}

/// Role-based route guard
#[derive(Debug, Clone)]
pub struct AccessGuard {
    table: RouteAccessTable,
    public: Vec<RoutePath>,
    landing: RoutePath,
    public_entry: RoutePath,
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self::new(RouteAccessTable::new())
    }
}

impl AccessGuard {
    /// Guard landing on `/dashboard` with `/login` as public entry
    #[must_use]
    pub fn new(table: RouteAccessTable) -> Self {
        Self {
            table,
            public: Vec::new(),
            landing: RoutePath::root().child("dashboard"),
            public_entry: RoutePath::root().child("login"),
        }
    }

    /// Where denied sessions are sent
    #[inline]
    #[must_use]
    pub fn with_landing_route(mut self, route: RoutePath) -> Self {
        self.landing = route;
        self
    }

    /// Where anonymous visitors are sent
    #[inline]
    #[must_use]
    pub fn with_public_entry_route(mut self, route: RoutePath) -> Self {
        self.public_entry = route;
        self
    }

    /// Declare a route (and everything under it) reachable without a session
    #[must_use]
    pub fn with_public_route(mut self, route: RoutePath) -> Self {
        if !self.public.contains(&route) {
            self.public.push(route);
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn table(&self) -> &RouteAccessTable {
        &self.table
    }

    #[inline]
    #[must_use]
    pub fn landing_route(&self) -> &RoutePath {
        &self.landing
    }

    #[inline]
    #[must_use]
    pub fn public_entry_route(&self) -> &RoutePath {
        &self.public_entry
    }

    /// Public routes and the public entry route, with their subtrees
    #[must_use]
    pub fn is_public(&self, path: &RoutePath) -> bool {
        self.public_entry.is_prefix_of(path) || self.public.iter().any(|p| p.is_prefix_of(path))
    }

    /// Whether a role may enter a route
    #[must_use]
    pub fn permits(&self, role: Role, path: &RoutePath) -> bool {
        can_enter(role, self.table.allowed_roles(path))
    }

    /// Decide a route entry
    ///
    /// A denied session is sent to the landing route, unless the landing
    /// route is the denied route or is itself closed to the role, in which
    /// case it goes to the public entry route. Redirect targets therefore
    /// never loop back to the denied route.
    #[must_use]
    pub fn check(&self, session: Option<&Profile>, path: &RoutePath) -> GuardDecision {
        if self.is_public(path) {
            return GuardDecision::Allow;
        }

        let Some(profile) = session else {
            tracing::debug!("No session on {}; redirecting to {}", path, self.public_entry);
            return GuardDecision::Redirect {
                to: self.public_entry.clone(),
                reason: RedirectReason::NoSession,
            };
        };

        if self.permits(profile.role, path) {
            return GuardDecision::Allow;
        }

        let to = if self.landing != *path && self.permits(profile.role, &self.landing) {
            self.landing.clone()
        } else {
            self.public_entry.clone()
        };
        tracing::debug!("Role {} denied on {}; redirecting to {}", profile.role, path, to);
        GuardDecision::Redirect {
            to,
            reason: RedirectReason::RoleDenied,
        }
    }

    /// Check the router's current route and redirect when needed
    pub fn enforce(&self, router: &dyn Router, session: Option<&Profile>) -> GuardDecision {
        let path = router.current_path();
        let decision = self.check(session, &path);
        if let Some(target) = decision.redirect_target() {
            router.navigate(target);
        }
        decision
    }
}
