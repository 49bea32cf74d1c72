#![cfg(feature = "std")]
//! Opaque identifiers for players and rooms.

use std::fmt;
use std::string::String;

use rand::Rng;

/// Random 128-bit identifier rendered in the familiar 8-4-4-4-12 form.
fn random_id() -> String {
    let v: u128 = rand::rng().random();
    let hex = format!("{:032x}", v);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn random() -> Self {
                Self(random_id())
            }

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
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

id_type!(
    /// Identity assigned to a connection when it registers.
    PlayerId
);
id_type!(
    /// Identity of a match room.
    RoomId
);
