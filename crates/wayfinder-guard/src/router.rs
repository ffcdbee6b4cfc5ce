//! Host router seam

use wayfinder_model::RoutePath;

/// Client-side router owned by the host application
///
/// Methods take `&self`; implementations hold their own interior state.
#[cfg_attr(test, mockall::automock)]
pub trait Router: Send + Sync {
    /// Route currently entered
    fn current_path(&self) -> RoutePath;

    /// Replace the current route
    fn navigate(&self, path: &RoutePath);
}
