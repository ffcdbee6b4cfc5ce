//! Error types for stack transitions

use wayfinder_model::NavItemId;

/// Rejected stack operation; the state is left untouched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// Operation needs an open menu
    #[error("navigation surface is closed")]
    Closed,

    /// Id not present in the displayed forest
    #[error("unknown nav item: {0}")]
    UnknownItem(NavItemId),

    /// Only categories can open a menu
    #[error("nav item '{0}' is not a category")]
    NotACategory(NavItemId),

    /// Item is not a child of the category on top of the stack
    #[error("nav item '{item}' is not in the current level")]
    NotInCurrentLevel { item: NavItemId },
}
