//! Navigation service
//!
//! Ties the pieces together for one browser session:
//!
//! - session lifecycle drives resolution
//! - every refresh takes a sequence ticket before fetching, and only a result
//!   newer than the displayed one is applied
//! - stack operations and route checks run against the displayed forest
//! - once enabled, badge aggregation follows the signed-in user and patches
//!   the displayed forest directly
//!
//! Shared state sits behind a `parking_lot` mutex that is never held across
//! an `.await`.

use crate::badge::{BadgeAggregator, BadgeHandle, BadgeSettings, BadgeSink};
use crate::config::NavConfig;
use crate::error::NavError;
use crate::remote::{RemoteDataService, Router};
use crate::store::NavStore;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use wayfinder_guard::{AccessGuard, GuardDecision};
use wayfinder_model::{
    NavItem, Profile, RoutePath, SessionChange, SessionContext, SessionEvent, UserId,
};
use wayfinder_resolve::{ConfigSource, NavForest, Resolution, ResolutionIssue, Resolver};
use wayfinder_stack::{Effect, NavigationStacks, Sequence, StackError, Surface};

/// What became of one refresh
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Result was newer than the displayed forest and is now shown
    Applied {
        seq: Sequence,
        source: ConfigSource,
        issues: Vec<ResolutionIssue>,
    },
    /// A newer result was already displayed; this one was dropped
    Superseded { seq: Sequence },
    /// Fetch failed; the previous forest (or the default set) stays shown
    Failed { seq: Sequence, error: NavError },
}

impl RefreshOutcome {
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }

    #[inline]
    #[must_use]
    pub fn seq(&self) -> Sequence {
        match self {
            RefreshOutcome::Applied { seq, .. }
            | RefreshOutcome::Superseded { seq }
            | RefreshOutcome::Failed { seq, .. } => *seq,
        }
    }
}

#[derive(Debug, Default)]
struct ServiceState {
    session: SessionContext,
    stacks: NavigationStacks,
    badges: Option<BadgeHandle>,
    badges_enabled: bool,
}

impl ServiceState {
    fn user(&self) -> Option<&UserId> {
        self.session.profile().map(|profile| &profile.user_id)
    }
}

/// Writes patched badges onto the display while `user` is still signed in
struct DisplaySink {
    state: Weak<Mutex<ServiceState>>,
    user: UserId,
}

impl BadgeSink for DisplaySink {
    fn apply(&self, patched: &NavForest) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock();
        // A task that outlived its session must not touch the next user's menu
        if state.user() == Some(&self.user) {
            state.stacks.update_badges(patched);
        }
    }
}

/// Navigation for one browser session
pub struct NavigationService {
    store: NavStore,
    resolver: Resolver,
    guard: AccessGuard,
    config: NavConfig,
    state: Arc<Mutex<ServiceState>>,
    next_seq: AtomicU64,
    resolved: watch::Sender<NavForest>,
}

impl std::fmt::Debug for NavigationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationService")
            .field("config", &self.config)
            .field("next_seq", &self.next_seq)
            .finish_non_exhaustive()
    }
}

impl NavigationService {
    /// Create a service over a remote
    ///
    /// # Errors
    ///
    /// [`NavError::Config`] when the configuration does not validate
    pub fn new(remote: Arc<dyn RemoteDataService>, config: NavConfig) -> Result<Self, NavError> {
        config.validate()?;
        let (resolved, _) = watch::channel(NavForest::new());
        Ok(Self {
            store: NavStore::new(remote, config.default_items.clone()),
            resolver: Resolver::new().with_defaults(config.default_items.clone()),
            guard: config.access_guard(),
            config,
            state: Arc::new(Mutex::new(ServiceState::default())),
            next_seq: AtomicU64::new(0),
            resolved,
        })
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &NavStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    /// Signed-in profile
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.state.lock().session.profile().cloned()
    }

    /// Displayed forest snapshot
    #[must_use]
    pub fn forest(&self) -> NavForest {
        self.state.lock().stacks.forest().clone()
    }

    /// Highest sequence applied to the display
    #[must_use]
    pub fn applied_seq(&self) -> Sequence {
        self.state.lock().stacks.displayed().applied_seq()
    }

    /// Forests as they are accepted, without badges
    #[must_use]
    pub fn subscribe_resolved(&self) -> watch::Receiver<NavForest> {
        self.resolved.subscribe()
    }

    fn ticket(&self) -> Sequence {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Fetch, resolve and offer a new forest for `profile`
    ///
    /// Items and configs are fetched concurrently. A failed fetch keeps the
    /// displayed forest; with nothing displayed yet the default set is shown.
    pub async fn refresh(&self, profile: &Profile) -> RefreshOutcome {
        let seq = self.ticket();
        tracing::debug!("Refresh #{} for {} ({})", seq, profile.user_id, profile.role);

        let (items, configs) =
            tokio::join!(self.store.list(), self.store.list_role_configs());

        let (items, configs) = match (items, configs) {
            (Ok(items), Ok(configs)) => (items, configs),
            (Err(error), _) | (_, Err(error)) => {
                tracing::debug!("Refresh #{} failed: {}", seq, error);
                let mut state = self.state.lock();
                if state.stacks.forest().is_empty() {
                    let fallback = self.resolver.fallback().forest;
                    if state.stacks.accept(seq, fallback.clone()) {
                        self.resolved.send_replace(fallback);
                    }
                }
                return RefreshOutcome::Failed { seq, error };
            }
        };

        let resolution = self.resolver.resolve_for(profile, &items, &configs);
        self.offer(seq, resolution)
    }

    fn offer(&self, seq: Sequence, resolution: Resolution) -> RefreshOutcome {
        let Resolution {
            forest,
            source,
            issues,
            ..
        } = resolution;

        let accepted = {
            let mut state = self.state.lock();
            let accepted = state.stacks.accept(seq, forest.clone());
            if accepted {
                self.resolved.send_replace(forest);
            }
            accepted
        };

        if !accepted {
            return RefreshOutcome::Superseded { seq };
        }
        if !issues.is_empty() {
            tracing::info!("Resolution #{} ({:?}) reported {} issue(s)", seq, source, issues.len());
        }
        RefreshOutcome::Applied { seq, source, issues }
    }

    /// Apply an auth event and resolve again when the scope changed
    pub async fn handle_session_event(&self, event: SessionEvent) -> SessionChange {
        let (change, profile) = {
            let mut state = self.state.lock();
            let change = state.session.apply(event);
            (change, state.session.profile().cloned())
        };

        match (change, profile) {
            (SessionChange::Ended, _) => self.sign_out().await,
            (change, Some(profile)) if change.requires_resolution() => {
                self.halt_stale_badges().await;
                let outcome = self.refresh(&profile).await;
                note_refresh(change, &outcome);
                self.resume_badges();
            }
            _ => {}
        }
        change
    }

    /// Pick up a session restored by the auth service
    ///
    /// # Errors
    ///
    /// [`NavError::FetchFailure`] when the auth service cannot be reached
    pub async fn restore_session(&self) -> Result<Option<Profile>, NavError> {
        let restored = self
            .store
            .remote()
            .current_session()
            .await
            .map_err(|e| NavError::from_remote("restore session", e))?;
        if let Some(profile) = &restored {
            tracing::info!("Restored session for {}", profile.user_id);
            self.handle_session_event(SessionEvent::SignedIn(profile.clone()))
                .await;
        }
        Ok(restored)
    }

    // Consumes a ticket so results still in flight for the old session lose.
    async fn sign_out(&self) {
        let seq = self.ticket();
        let badges = {
            let mut state = self.state.lock();
            state.stacks.accept(seq, NavForest::new());
            state.stacks.clear();
            self.resolved.send_replace(NavForest::new());
            state.badges.take()
        };
        tracing::info!("Signed out; navigation cleared at #{}", seq);
        if let Some(handle) = badges {
            handle.shutdown().await;
        }
    }

    /// # Errors
    ///
    /// See [`wayfinder_stack::StackController::open`]
    pub fn open(&self, surface: Surface, root: &str) -> Result<(), StackError> {
        self.state.lock().stacks.open(surface, root)
    }

    /// # Errors
    ///
    /// See [`wayfinder_stack::StackController::select_child`]
    pub fn select_child(&self, surface: Surface, item: &str) -> Result<Option<Effect>, StackError> {
        self.state.lock().stacks.select_child(surface, item)
    }

    pub fn back(&self, surface: Surface) {
        self.state.lock().stacks.back(surface);
    }

    pub fn close(&self, surface: Surface) {
        self.state.lock().stacks.close(surface);
    }

    /// Items the surface should render
    #[must_use]
    pub fn current_level(&self, surface: Surface) -> Vec<NavItem> {
        self.state
            .lock()
            .stacks
            .current_level(surface)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn breadcrumb(&self, surface: Surface) -> Vec<String> {
        self.state.lock().stacks.breadcrumb(surface)
    }

    /// Keep unread badges on the displayed forest
    ///
    /// Aggregation runs for whoever is signed in: it stops on sign-out and
    /// restarts for the next user. The returned channel carries the patched
    /// forest of the current user's task and closes when that task stops.
    /// `None` when nobody is signed in yet.
    pub fn start_badges(&self) -> Option<watch::Receiver<NavForest>> {
        self.state.lock().badges_enabled = true;
        self.resume_badges()
    }

    /// Stop badge aggregation and release its subscriptions
    pub async fn stop_badges(&self) {
        let badges = {
            let mut state = self.state.lock();
            state.badges_enabled = false;
            state.badges.take()
        };
        if let Some(handle) = badges {
            handle.shutdown().await;
        }
    }

    /// Whether an aggregation task is running
    #[must_use]
    pub fn badges_running(&self) -> bool {
        self.state.lock().badges.is_some()
    }

    fn resume_badges(&self) -> Option<watch::Receiver<NavForest>> {
        let mut state = self.state.lock();
        if !state.badges_enabled {
            return None;
        }
        let user = state.user()?.clone();
        if let Some(handle) = state.badges.as_ref().filter(|handle| handle.user() == &user) {
            return Some(handle.subscribe());
        }

        let sink = DisplaySink {
            state: Arc::downgrade(&self.state),
            user: user.clone(),
        };
        let handle = BadgeAggregator::new(
            Arc::clone(self.store.remote()),
            BadgeSettings::from_config(&self.config),
        )
        .with_sink(Arc::new(sink))
        .spawn(user, self.resolved.subscribe());
        let forest = handle.subscribe();
        // Replacing drops any previous handle, which aborts its task
        state.badges = Some(handle);
        Some(forest)
    }

    // Shut down a task left over from a different user before resolving.
    async fn halt_stale_badges(&self) {
        let stale = {
            let mut state = self.state.lock();
            let current = state.user().cloned();
            let stale = state
                .badges
                .as_ref()
                .is_some_and(|handle| Some(handle.user()) != current.as_ref());
            if stale {
                state.badges.take()
            } else {
                None
            }
        };
        if let Some(handle) = stale {
            tracing::debug!("Stopping badge aggregation for {}", handle.user());
            handle.shutdown().await;
        }
    }

    /// Decide entry to `path` for the current session
    #[must_use]
    pub fn check_route(&self, path: &RoutePath) -> GuardDecision {
        let profile = self.profile();
        self.guard.check(profile.as_ref(), path)
    }

    /// Redirect the router if its current route is not allowed
    pub fn enforce(&self, router: &dyn Router) -> GuardDecision {
        let profile = self.profile();
        self.guard.enforce(router, profile.as_ref())
    }
}

fn note_refresh(change: SessionChange, outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::Applied { seq, source, .. } => {
            tracing::debug!("Session {:?}: resolution #{} applied ({:?})", change, seq, source);
        }
        RefreshOutcome::Superseded { seq } => {
            tracing::debug!("Session {:?}: resolution #{} superseded", change, seq);
        }
        RefreshOutcome::Failed { seq, error } => {
            tracing::warn!(
                "Session {:?}: resolution #{} failed, keeping current menu: {}",
                change,
                seq,
                error
            );
        }
    }
}
