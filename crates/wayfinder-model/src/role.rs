//! Application roles

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles carried in the session's role claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Professeur,
    Tutor,
    Director,
    DeputyDirector,
    Administrator,
}

impl Role {
    /// Every role, in declaration order
    pub const ALL: [Role; 6] = [
        Role::Student,
        Role::Professeur,
        Role::Tutor,
        Role::Director,
        Role::DeputyDirector,
        Role::Administrator,
    ];

    /// Wire representation
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professeur => "professeur",
            Role::Tutor => "tutor",
            Role::Director => "director",
            Role::DeputyDirector => "deputy_director",
            Role::Administrator => "administrator",
        }
    }

    /// Only administrators may mutate navigation rows
    #[inline]
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Administrator)
    }

    /// Establishment staff (anyone who is not a learner)
    #[inline]
    #[must_use]
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Student)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ModelError::UnknownRole(s.to_string()))
    }
}
