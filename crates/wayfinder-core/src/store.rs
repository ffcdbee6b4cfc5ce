//! Navigation item store
//!
//! Thin typed access to the remote tables. Reads come back unordered;
//! the resolver imposes order. Writes are authorized by the remote.

use crate::error::NavError;
use crate::remote::RemoteDataService;
use std::sync::Arc;
use wayfinder_model::{NavItem, NavItemId, Profile, RoleNavConfig};

/// Store over the remote `nav_items` and `role_nav_configs` tables
#[derive(Clone)]
pub struct NavStore {
    remote: Arc<dyn RemoteDataService>,
    defaults: Vec<NavItem>,
}

impl std::fmt::Debug for NavStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavStore")
            .field("defaults", &self.defaults.len())
            .finish_non_exhaustive()
    }
}

impl NavStore {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteDataService>, defaults: Vec<NavItem>) -> Self {
        Self { remote, defaults }
    }

    #[inline]
    #[must_use]
    pub fn remote(&self) -> &Arc<dyn RemoteDataService> {
        &self.remote
    }

    /// All items
    ///
    /// # Errors
    ///
    /// [`NavError::FetchFailure`] when the remote cannot be read
    pub async fn list(&self) -> Result<Vec<NavItem>, NavError> {
        self.remote
            .list_nav_items()
            .await
            .map_err(|e| NavError::from_remote("list nav items", e))
    }

    /// All role configs
    ///
    /// # Errors
    ///
    /// [`NavError::FetchFailure`] when the remote cannot be read
    pub async fn list_role_configs(&self) -> Result<Vec<RoleNavConfig>, NavError> {
        self.remote
            .list_role_configs()
            .await
            .map_err(|e| NavError::from_remote("list role configs", e))
    }

    /// All items, or the default set when the read fails
    pub async fn list_or_default(&self) -> Vec<NavItem> {
        match self.list().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Falling back to default nav items: {}", e);
                self.defaults.clone()
            }
        }
    }

    /// # Errors
    ///
    /// [`NavError::UnauthorizedAction`] when the remote refuses the caller
    pub async fn create(&self, caller: &Profile, item: NavItem) -> Result<NavItem, NavError> {
        self.note_caller(caller, "create", &item.id);
        let created = self
            .remote
            .create_nav_item(caller, item)
            .await
            .map_err(|e| NavError::from_remote("create nav item", e))?;
        tracing::info!("Nav item {} created by {}", created.id, caller.user_id);
        Ok(created)
    }

    /// # Errors
    ///
    /// [`NavError::UnauthorizedAction`] or [`NavError::NotFound`]
    pub async fn update(&self, caller: &Profile, item: NavItem) -> Result<NavItem, NavError> {
        self.note_caller(caller, "update", &item.id);
        let updated = self
            .remote
            .update_nav_item(caller, item)
            .await
            .map_err(|e| NavError::from_remote("update nav item", e))?;
        tracing::info!("Nav item {} updated by {}", updated.id, caller.user_id);
        Ok(updated)
    }

    /// # Errors
    ///
    /// [`NavError::UnauthorizedAction`] or [`NavError::NotFound`]
    pub async fn delete(&self, caller: &Profile, id: &NavItemId) -> Result<(), NavError> {
        self.note_caller(caller, "delete", id);
        self.remote
            .delete_nav_item(caller, id)
            .await
            .map_err(|e| NavError::from_remote("delete nav item", e))?;
        tracing::info!("Nav item {} deleted by {}", id, caller.user_id);
        Ok(())
    }

    // The remote decides; this only leaves a trace of the attempt.
    fn note_caller(&self, caller: &Profile, action: &str, id: &NavItemId) {
        if !caller.role.is_administrator() {
            tracing::debug!(
                "{} ({}) attempting to {} nav item {}",
                caller.user_id,
                caller.role,
                action,
                id
            );
        }
    }
}
