//! Identifier newtypes
//!
//! All identifiers are server-assigned strings. The newtypes only exist so a
//! user id can never be passed where a nav item id is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            #[inline]
            #[must_use]
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Stable, server-assigned navigation item identifier
    NavItemId
);

string_id!(
    /// Authenticated user identifier (session `sub` claim)
    UserId
);

string_id!(
    /// Establishment (school/campus) identifier
    EstablishmentId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(NavItemId::new("messages").to_string(), "messages");
        assert_eq!(UserId::from("u-1").as_str(), "u-1");
    }

    #[test]
    fn ids_borrow_as_str_for_lookup() {
        let set: HashSet<NavItemId> = ["a", "b"].into_iter().map(NavItemId::from).collect();
        assert!(set.contains("a"));
        assert!(!set.contains("c"));
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&EstablishmentId::new("lycee-42")).unwrap();
        assert_eq!(json, "\"lycee-42\"");
    }
}
