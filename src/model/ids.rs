//! Arena identities for program symbols.
//!
//! Every symbol in a [`Program`](super::Program) lives in a flat arena and is
//! referred to by a small copyable id. Ids compare by identity only; two
//! functions with the same name are still different functions.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of this symbol in its arena
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).unwrap_or(u32::MAX))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Identity of a function, constructor, accessor, lambda or local function
    FunctionId,
    "fn"
);
arena_id!(
    /// Identity of a declared type
    TypeId,
    "type"
);
arena_id!(FieldId, "field");
arena_id!(PropertyId, "property");
arena_id!(ParameterId, "param");
arena_id!(LocalId, "local");
