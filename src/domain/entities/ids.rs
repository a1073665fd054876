//! Snowflake identifiers used across the domain.

use serde::{Deserialize, Serialize};

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(#[serde(with = "crate::domain::serde_utils::snowflake")] pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

snowflake_id!(
    /// Discord guild identifier.
    GuildId
);
snowflake_id!(
    /// Discord user identifier.
    UserId
);
snowflake_id!(
    /// Discord role identifier.
    RoleId
);
snowflake_id!(
    /// Identifier of a custom emoji created inside a guild.
    EmojiId
);
