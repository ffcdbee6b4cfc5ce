//! Session and role context
//!
//! The [`SessionContext`] holds the authenticated profile for one browser
//! session. It is owned by the caller and passed explicitly to the resolver
//! and guard; there is no ambient session.

use crate::ids::{EstablishmentId, UserId};
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Authenticated profile taken from the session token claims
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub role: Role,
    #[serde(default)]
    pub establishment_id: Option<EstablishmentId>,
}

impl Profile {
    /// Profile without establishment scope
    #[inline]
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            establishment_id: None,
        }
    }

    /// Scope to an establishment
    #[inline]
    #[must_use]
    pub fn in_establishment(mut self, establishment: impl Into<EstablishmentId>) -> Self {
        self.establishment_id = Some(establishment.into());
        self
    }

    /// Role and establishment both match
    #[inline]
    #[must_use]
    pub fn same_scope(&self, other: &Profile) -> bool {
        self.role == other.role && self.establishment_id == other.establishment_id
    }
}

/// Authentication events emitted by the remote auth service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Profile),
    TokenRefreshed(Profile),
    SignedOut,
}

/// What an event did to the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// A session now exists where none (or another user's) did
    Started,
    /// Same user, new token; `scope_changed` when role or establishment moved
    Refreshed { scope_changed: bool },
    /// Session destroyed
    Ended,
    /// Event had no effect (refresh or sign-out without a session)
    Ignored,
}

impl SessionChange {
    /// Whether navigation must be resolved again
    #[inline]
    #[must_use]
    pub fn requires_resolution(&self) -> bool {
        matches!(
            self,
            SessionChange::Started | SessionChange::Ended | SessionChange::Refreshed { scope_changed: true }
        )
    }
}

/// Session lifecycle for one active user
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Profile>,
}

impl SessionContext {
    /// Signed-out context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current profile
    #[inline]
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.current.as_ref()
    }

    /// Whether someone is signed in
    #[inline]
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Apply an auth event
    pub fn apply(&mut self, event: SessionEvent) -> SessionChange {
        match event {
            SessionEvent::SignedIn(profile) => {
                self.current = Some(profile);
                SessionChange::Started
            }
            SessionEvent::TokenRefreshed(profile) => {
                let change = match &self.current {
                    None => return SessionChange::Ignored,
                    Some(existing) if existing.user_id == profile.user_id => {
                        SessionChange::Refreshed {
                            scope_changed: !existing.same_scope(&profile),
                        }
                    }
                    // A refresh for a different user is a new sign-in.
                    Some(_) => SessionChange::Started,
                };
                self.current = Some(profile);
                change
            }
            SessionEvent::SignedOut => {
                if self.current.take().is_some() {
                    SessionChange::Ended
                } else {
                    SessionChange::Ignored
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Profile {
        Profile::new("u1", Role::Student).in_establishment("e1")
    }

    #[test]
    fn lifecycle_sign_in_refresh_sign_out() {
        let mut ctx = SessionContext::new();
        assert!(!ctx.is_signed_in());

        assert_eq!(ctx.apply(SessionEvent::SignedIn(student())), SessionChange::Started);
        assert_eq!(ctx.profile(), Some(&student()));

        assert_eq!(
            ctx.apply(SessionEvent::TokenRefreshed(student())),
            SessionChange::Refreshed { scope_changed: false }
        );

        assert_eq!(ctx.apply(SessionEvent::SignedOut), SessionChange::Ended);
        assert!(ctx.profile().is_none());
    }

    #[test]
    fn refresh_with_new_role_changes_scope() {
        let mut ctx = SessionContext::new();
        ctx.apply(SessionEvent::SignedIn(student()));

        let promoted = Profile::new("u1", Role::Tutor).in_establishment("e1");
        let change = ctx.apply(SessionEvent::TokenRefreshed(promoted.clone()));

        assert_eq!(change, SessionChange::Refreshed { scope_changed: true });
        assert!(change.requires_resolution());
        assert_eq!(ctx.profile(), Some(&promoted));
    }

    #[test]
    fn refresh_for_other_user_starts_new_session() {
        let mut ctx = SessionContext::new();
        ctx.apply(SessionEvent::SignedIn(student()));
        let other = Profile::new("u2", Role::Administrator);
        assert_eq!(ctx.apply(SessionEvent::TokenRefreshed(other)), SessionChange::Started);
    }

    #[test]
    fn events_without_session_are_ignored() {
        let mut ctx = SessionContext::new();
        assert_eq!(ctx.apply(SessionEvent::TokenRefreshed(student())), SessionChange::Ignored);
        assert_eq!(ctx.apply(SessionEvent::SignedOut), SessionChange::Ignored);
        assert!(!SessionChange::Ignored.requires_resolution());
    }
}
