//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Rounds are the only long-lived identity in the simulation: every reset
//! (capture or operator restart) starts a new round with a fresh id. IDs use
//! UUID v7 so they sort by creation time in logs and on the dashboard.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for one round of the chase (spawn until capture).
    RoundId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_ids_are_unique() {
        let first = RoundId::new();
        let second = RoundId::new();
        assert_ne!(first, second);
    }

    #[test]
    fn round_id_round_trips_through_uuid() {
        let id = RoundId::new();
        let raw: Uuid = id.into();
        assert_eq!(RoundId::from(raw), id);
        assert_eq!(id.to_string(), raw.to_string());
    }
}
