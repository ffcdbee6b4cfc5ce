//! Testing utilities for the Wayfinder workspace
//!
//! In-memory remote, a recording router and a small campus fixture.

#![allow(missing_docs)]

mod fixtures;
mod remote;
mod router;

pub use fixtures::{
    administrator, campus_configs, campus_items, campus_remote, director, student, student_at,
    LYCEE,
};
pub use remote::InMemoryRemote;
pub use router::RecordingRouter;

/// Parse a route, panicking on malformed input
pub fn route(path: &str) -> wayfinder_model::RoutePath {
    path.parse().unwrap()
}

/// Ids of the top level of a forest, in display order
pub fn root_ids(forest: &wayfinder_resolve::NavForest) -> Vec<String> {
    forest
        .roots()
        .iter()
        .filter_map(|idx| forest.item(*idx))
        .map(|item| item.id.to_string())
        .collect()
}
