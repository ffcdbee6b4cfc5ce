//! Error types for the data model

/// Errors raised while interpreting raw rows and claims
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Role claim outside the closed role set
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Route is not an in-app absolute path
    #[error("invalid route: '{0}' (must start with a single '/')")]
    InvalidRoute(String),

    /// Badge area name not recognised
    #[error("unknown badge area: {0}")]
    UnknownBadgeArea(String),
}
