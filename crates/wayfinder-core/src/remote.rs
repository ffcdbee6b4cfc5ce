//! Remote collaborator seams
//!
//! The hosted data service owns storage, authentication and change
//! notification. Everything here talks to it through [`RemoteDataService`];
//! the host application supplies the implementation.

use async_trait::async_trait;
use futures::stream::BoxStream;
use wayfinder_model::{BadgeArea, NavItem, NavItemId, Profile, RoleNavConfig, UnreadTotals, UserId};

pub use wayfinder_guard::Router;

/// Change notifications from one subscription
pub type ChangeStream = BoxStream<'static, ChangeEvent>;

/// Errors reported by the remote service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Transport or service failure
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// Caller lacks permission
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Row could not be interpreted
    #[error("decode error: {0}")]
    Decode(String),
}

/// Row change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Row-level change on a subscribed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
    pub record_id: Option<String>,
}

impl ChangeEvent {
    #[must_use]
    pub fn new(table: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            table: table.into(),
            kind,
            record_id: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_record(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Badge area fed by the changed table
    #[inline]
    #[must_use]
    pub fn area(&self) -> Option<BadgeArea> {
        BadgeArea::from_source_table(&self.table)
    }
}

/// Row filter for a subscription: only rows owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeFilter {
    pub user_id: UserId,
}

impl ChangeFilter {
    #[inline]
    #[must_use]
    pub fn for_user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Hosted data service
///
/// Reads are unordered. Mutations carry the caller's profile and are
/// authorized remotely; a refusal comes back as [`RemoteError::Forbidden`].
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    async fn list_nav_items(&self) -> Result<Vec<NavItem>, RemoteError>;

    async fn list_role_configs(&self) -> Result<Vec<RoleNavConfig>, RemoteError>;

    /// Authoritative unread counts for a user
    async fn unread_totals(&self, user: &UserId) -> Result<UnreadTotals, RemoteError>;

    /// Subscribe to row changes on `table` matching `filter`
    ///
    /// The stream ending means the subscription dropped.
    async fn subscribe(
        &self,
        table: &str,
        filter: &ChangeFilter,
    ) -> Result<ChangeStream, RemoteError>;

    /// Session restored from the auth service, if any
    async fn current_session(&self) -> Result<Option<Profile>, RemoteError>;

    async fn create_nav_item(&self, caller: &Profile, item: NavItem) -> Result<NavItem, RemoteError>;

    async fn update_nav_item(&self, caller: &Profile, item: NavItem) -> Result<NavItem, RemoteError>;

    async fn delete_nav_item(&self, caller: &Profile, id: &NavItemId) -> Result<(), RemoteError>;
}
