//! In-memory stand-in for the hosted data service

use async_trait::async_trait;
use dashmap::DashMap;
use futures::channel::mpsc;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use wayfinder_core::{ChangeEvent, ChangeFilter, ChangeKind, ChangeStream, RemoteDataService, RemoteError};
use wayfinder_model::{NavItem, NavItemId, Profile, RoleNavConfig, UnreadTotals, UserId};

struct Subscriber {
    table: String,
    user: UserId,
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

/// Remote backed by process memory
///
/// Mutations require an administrator caller, mirroring the row-level
/// policy of the hosted service. Config reads can be delayed one call at a
/// time to reorder concurrent refreshes under paused time.
#[derive(Default)]
pub struct InMemoryRemote {
    items: DashMap<NavItemId, NavItem>,
    configs: Mutex<Vec<RoleNavConfig>>,
    session: Mutex<Option<Profile>>,
    unread: Mutex<HashMap<UserId, UnreadTotals>>,
    config_delays: Mutex<VecDeque<Duration>>,
    subscribers: Mutex<Vec<Subscriber>>,
    offline: AtomicBool,
    refuse_subscriptions: AtomicBool,
    unread_calls: AtomicUsize,
}

impl std::fmt::Debug for InMemoryRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRemote")
            .field("items", &self.items.len())
            .field("configs", &self.configs.lock().len())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(self, items: impl IntoIterator<Item = NavItem>) -> Self {
        for item in items {
            self.items.insert(item.id.clone(), item);
        }
        self
    }

    pub fn with_configs(self, configs: impl IntoIterator<Item = RoleNavConfig>) -> Self {
        self.configs.lock().extend(configs);
        self
    }

    pub fn with_session(self, profile: Profile) -> Self {
        *self.session.lock() = Some(profile);
        self
    }

    pub fn set_configs(&self, configs: Vec<RoleNavConfig>) {
        *self.configs.lock() = configs;
    }

    pub fn set_unread(&self, user: impl Into<UserId>, totals: UnreadTotals) {
        self.unread.lock().insert(user.into(), totals);
    }

    /// Every read fails with [`RemoteError::Unavailable`] while offline
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make `subscribe` fail until reset
    pub fn refuse_subscriptions(&self, refuse: bool) {
        self.refuse_subscriptions.store(refuse, Ordering::SeqCst);
    }

    /// Delay the next `list_role_configs` call
    ///
    /// The config snapshot is taken when the call starts, before the delay.
    pub fn queue_config_delay(&self, delay: Duration) {
        self.config_delays.lock().push_back(delay);
    }

    /// Send a change to every live subscription on `table` for `user`
    pub fn emit(&self, table: &str, user: &UserId, kind: ChangeKind) -> usize {
        let event = ChangeEvent::new(table, kind);
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sub| !sub.tx.is_closed());
        subscribers
            .iter()
            .filter(|sub| sub.table == table && &sub.user == user)
            .filter(|sub| sub.tx.unbounded_send(event.clone()).is_ok())
            .count()
    }

    /// End every open change stream
    pub fn drop_subscriptions(&self) {
        self.subscribers.lock().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sub| !sub.tx.is_closed());
        subscribers.len()
    }

    /// Number of `unread_totals` calls served so far
    pub fn unread_calls(&self) -> usize {
        self.unread_calls.load(Ordering::SeqCst)
    }

    pub fn item(&self, id: &str) -> Option<NavItem> {
        self.items.get(id).map(|entry| entry.value().clone())
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn check_admin(caller: &Profile) -> Result<(), RemoteError> {
        if caller.role.is_administrator() {
            Ok(())
        } else {
            Err(RemoteError::Forbidden(format!(
                "{} may not modify nav_items",
                caller.role
            )))
        }
    }
}

#[async_trait]
impl RemoteDataService for InMemoryRemote {
    async fn list_nav_items(&self) -> Result<Vec<NavItem>, RemoteError> {
        self.check_online()?;
        Ok(self.items.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn list_role_configs(&self) -> Result<Vec<RoleNavConfig>, RemoteError> {
        self.check_online()?;
        let snapshot = self.configs.lock().clone();
        let delay = self.config_delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn unread_totals(&self, user: &UserId) -> Result<UnreadTotals, RemoteError> {
        self.unread_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.unread.lock().get(user).cloned().unwrap_or_default())
    }

    async fn subscribe(
        &self,
        table: &str,
        filter: &ChangeFilter,
    ) -> Result<ChangeStream, RemoteError> {
        self.check_online()?;
        if self.refuse_subscriptions.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("realtime channel closed".into()));
        }
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.lock().push(Subscriber {
            table: table.to_string(),
            user: filter.user_id.clone(),
            tx,
        });
        Ok(rx.boxed())
    }

    async fn current_session(&self) -> Result<Option<Profile>, RemoteError> {
        self.check_online()?;
        Ok(self.session.lock().clone())
    }

    async fn create_nav_item(&self, caller: &Profile, item: NavItem) -> Result<NavItem, RemoteError> {
        Self::check_admin(caller)?;
        self.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update_nav_item(&self, caller: &Profile, item: NavItem) -> Result<NavItem, RemoteError> {
        Self::check_admin(caller)?;
        match self.items.get_mut(item.id.as_str()) {
            Some(mut existing) => {
                *existing = item.clone();
                Ok(item)
            }
            None => Err(RemoteError::NotFound(format!("nav item {}", item.id))),
        }
    }

    async fn delete_nav_item(&self, caller: &Profile, id: &NavItemId) -> Result<(), RemoteError> {
        Self::check_admin(caller)?;
        self.items
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| RemoteError::NotFound(format!("nav item {id}")))
    }
}
