//! Badge/unread aggregation
//!
//! Change notifications only trigger work; counts always come from
//! [`RemoteDataService::unread_totals`]. Applying the same totals twice
//! yields the same forest.
//!
//! Each patched forest goes to the handle's watch channel and, when one is
//! attached, to a [`BadgeSink`] such as the displayed navigation.
//!
//! When the change subscription cannot be established or its stream ends,
//! the aggregator recounts on a fixed interval and tries to resubscribe on
//! every tick.

use crate::config::NavConfig;
use crate::remote::{ChangeEvent, ChangeFilter, ChangeStream, RemoteDataService};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use wayfinder_model::{BadgeArea, RoutePath, UnreadTotals, UserId};
use wayfinder_resolve::{NavForest, NodeIdx};

/// How totals map onto a forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeSettings {
    pub routes: Vec<(BadgeArea, RoutePath)>,
    pub recount_interval: Duration,
    pub roll_up: bool,
}

impl BadgeSettings {
    #[must_use]
    pub fn from_config(config: &NavConfig) -> Self {
        Self {
            routes: config
                .badge_routes
                .iter()
                .map(|entry| (entry.area, entry.route.clone()))
                .collect(),
            recount_interval: config.recount_interval(),
            roll_up: config.roll_up_category_badges,
        }
    }

    /// Source tables of the configured areas, without repeats
    #[must_use]
    pub fn tables(&self) -> Vec<&'static str> {
        let mut tables: Vec<&'static str> = Vec::new();
        for (area, _) in &self.routes {
            let table = area.source_table();
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }
}

/// Overwrite every badge in `forest` from `totals`
///
/// Each area lands on the item whose route equals the area route, else the
/// first item under it. Areas sharing an item are summed. Zero clears.
pub fn apply_totals(forest: &mut NavForest, totals: &UnreadTotals, settings: &BadgeSettings) {
    let mut counts: HashMap<NodeIdx, u32> = HashMap::new();
    for (area, route) in &settings.routes {
        if let Some(idx) = forest.find_by_route(route) {
            let count = counts.entry(idx).or_insert(0);
            *count = count.saturating_add(totals.get(*area));
        }
    }

    let updates: Vec<(String, u32)> = counts
        .into_iter()
        .filter_map(|(idx, count)| forest.item(idx).map(|item| (item.id.to_string(), count)))
        .collect();

    forest.clear_badges();
    for (id, count) in updates {
        forest.set_badge(&id, (count > 0).then_some(count));
    }
    if settings.roll_up {
        forest.roll_up_badges();
    }
}

/// Receives every patched forest as it is published
pub trait BadgeSink: Send + Sync {
    fn apply(&self, patched: &NavForest);
}

/// Running aggregator task
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct BadgeHandle {
    user: UserId,
    forest: watch::Receiver<NavForest>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl BadgeHandle {
    /// User whose counts the task applies
    #[inline]
    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Patched forest; updated after every recount
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NavForest> {
        self.forest.clone()
    }

    /// Latest patched forest
    #[must_use]
    pub fn current(&self) -> NavForest {
        self.forest.borrow().clone()
    }

    /// Stop the task and wait for it
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // Task already gone when the send fails
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Badge task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for BadgeHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Keeps a user's unread counts applied to the displayed forest
pub struct BadgeAggregator {
    remote: Arc<dyn RemoteDataService>,
    settings: BadgeSettings,
    sink: Option<Arc<dyn BadgeSink>>,
}

impl std::fmt::Debug for BadgeAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeAggregator")
            .field("settings", &self.settings)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl BadgeAggregator {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteDataService>, settings: BadgeSettings) -> Self {
        Self {
            remote,
            settings,
            sink: None,
        }
    }

    /// Also hand each patched forest to `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn BadgeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Spawn the aggregation task for `user`
    ///
    /// `base` carries the unbadged forest from resolution; every new value
    /// is republished with the latest totals applied.
    #[must_use]
    pub fn spawn(self, user: UserId, base: watch::Receiver<NavForest>) -> BadgeHandle {
        let initial = base.borrow().clone();
        let (tx, rx) = watch::channel(initial);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(self.run(user.clone(), base, tx, shutdown_rx));

        BadgeHandle {
            user,
            forest: rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run(
        self,
        user: UserId,
        mut base: watch::Receiver<NavForest>,
        out: watch::Sender<NavForest>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let filter = ChangeFilter::for_user(user.clone());
        let mut changes = self.subscribe(&filter).await;
        if changes.is_none() {
            tracing::warn!(
                "Change subscription unavailable for {}; recounting every {:?}",
                user,
                self.settings.recount_interval
            );
        }

        let mut totals = UnreadTotals::new();
        self.recount(&user, &mut totals).await;
        self.publish(&base, &totals, &out);

        // interval() panics on a zero period
        let period = self.settings.recount_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.reset();

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                changed = base.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.publish(&base, &totals, &out);
                }
                event = next_change(&mut changes) => match event {
                    Some(event) => {
                        tracing::debug!("Change on {} for {}; recounting", event.table, user);
                        self.recount(&user, &mut totals).await;
                        self.publish(&base, &totals, &out);
                    }
                    None => {
                        tracing::warn!(
                            "Change subscription dropped for {}; recounting every {:?}",
                            user,
                            self.settings.recount_interval
                        );
                        changes = None;
                        ticker.reset();
                    }
                },
                _ = ticker.tick(), if changes.is_none() => {
                    self.recount(&user, &mut totals).await;
                    self.publish(&base, &totals, &out);
                    changes = self.subscribe(&filter).await;
                    if changes.is_some() {
                        tracing::info!("Change subscription restored for {}", user);
                    }
                }
            }
        }
        tracing::debug!("Badge aggregation stopped for {}", user);
    }

    /// One merged stream over every configured table; `None` if any fails
    async fn subscribe(&self, filter: &ChangeFilter) -> Option<ChangeStream> {
        let mut streams = Vec::new();
        for table in self.settings.tables() {
            match self.remote.subscribe(table, filter).await {
                Ok(stream) => streams.push(stream),
                Err(e) => {
                    tracing::debug!("Subscribe to {} failed: {}", table, e);
                    return None;
                }
            }
        }
        if streams.is_empty() {
            return None;
        }
        Some(stream::select_all(streams).boxed())
    }

    async fn recount(&self, user: &UserId, totals: &mut UnreadTotals) {
        match self.remote.unread_totals(user).await {
            Ok(fresh) => *totals = fresh,
            Err(e) => tracing::warn!("Unread recount failed for {}: {}", user, e),
        }
    }

    fn publish(
        &self,
        base: &watch::Receiver<NavForest>,
        totals: &UnreadTotals,
        out: &watch::Sender<NavForest>,
    ) {
        let mut forest = base.borrow().clone();
        apply_totals(&mut forest, totals, &self.settings);
        if let Some(sink) = &self.sink {
            sink.apply(&forest);
        }
        out.send_replace(forest);
    }
}

/// Next event, `None` when the stream ended; pending forever without a stream
async fn next_change(changes: &mut Option<ChangeStream>) -> Option<ChangeEvent> {
    match changes {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_model::NavItem;

    fn route(s: &str) -> RoutePath {
        s.parse().unwrap()
    }

    fn settings(roll_up: bool) -> BadgeSettings {
        BadgeSettings {
            routes: vec![
                (BadgeArea::Messages, route("/messages")),
                (BadgeArea::Notifications, route("/messages")),
                (BadgeArea::Assignments, route("/courses")),
                (BadgeArea::Notes, route("/notes")),
            ],
            recount_interval: Duration::from_secs(30),
            roll_up,
        }
    }

    fn forest() -> NavForest {
        NavForest::from_items([
            NavItem::category("comms", "Communication"),
            NavItem::route("inbox", "Inbox", "/messages").with_parent("comms"),
            NavItem::category("teaching", "Teaching"),
            NavItem::route("homework", "Homework", "/courses/homework").with_parent("teaching"),
        ])
    }

    fn badge(forest: &NavForest, id: &str) -> Option<u32> {
        forest.find(id).and_then(|idx| forest.item(idx)).and_then(|item| item.badge)
    }

    #[test]
    fn totals_land_on_matching_routes() {
        let totals = UnreadTotals::new()
            .with(BadgeArea::Messages, 2)
            .with(BadgeArea::Notifications, 1)
            .with(BadgeArea::Assignments, 4);
        let mut forest = forest();

        apply_totals(&mut forest, &totals, &settings(false));

        assert_eq!(badge(&forest, "inbox"), Some(3));
        assert_eq!(badge(&forest, "homework"), Some(4));
        assert_eq!(badge(&forest, "comms"), None);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let totals = UnreadTotals::new().with(BadgeArea::Messages, 5);
        let mut once = forest();
        apply_totals(&mut once, &totals, &settings(true));
        let mut twice = once.clone();
        apply_totals(&mut twice, &totals, &settings(true));
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_totals_clear_badges() {
        let mut forest = forest();
        apply_totals(&mut forest, &UnreadTotals::new().with(BadgeArea::Messages, 3), &settings(false));
        apply_totals(&mut forest, &UnreadTotals::new(), &settings(false));
        assert_eq!(badge(&forest, "inbox"), None);
    }

    #[test]
    fn roll_up_sums_into_categories() {
        let totals = UnreadTotals::new()
            .with(BadgeArea::Messages, 2)
            .with(BadgeArea::Assignments, 1);
        let mut forest = forest();

        apply_totals(&mut forest, &totals, &settings(true));

        assert_eq!(badge(&forest, "comms"), Some(2));
        assert_eq!(badge(&forest, "teaching"), Some(1));
    }

    #[test]
    fn tables_follow_configured_areas() {
        let settings = settings(false);
        assert_eq!(settings.tables(), vec!["messages", "notifications", "assignments", "notes"]);
        let from_config = BadgeSettings::from_config(&NavConfig::default());
        assert!(from_config.tables().contains(&"approvals"));
    }
}
