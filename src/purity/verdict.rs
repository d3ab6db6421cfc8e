//! Purity verdicts

use super::context::Cancelled;
use crate::model::Location;
use serde::Serialize;
use std::fmt;

/// Outcome of checking one operation or one function.
///
/// Impure verdicts remember the first offending location found. Verdicts are
/// plain values: they are copied around, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Verdict {
    is_pure: bool,
    offending_location: Option<Location>,
}

/// Result of a check that may be interrupted by cancellation
pub type Check = Result<Verdict, Cancelled>;

impl Verdict {
    pub const PURE: Verdict = Verdict {
        is_pure: true,
        offending_location: None,
    };

    /// Impure without a known location, e.g. an unresolvable symbol
    pub const IMPURE: Verdict = Verdict {
        is_pure: false,
        offending_location: None,
    };

    pub const fn impure_at(location: Location) -> Self {
        Self {
            is_pure: false,
            offending_location: Some(location),
        }
    }

    pub fn impure_at_opt(location: Option<Location>) -> Self {
        Self {
            is_pure: false,
            offending_location: location,
        }
    }

    pub const fn is_pure(&self) -> bool {
        self.is_pure
    }

    pub const fn is_impure(&self) -> bool {
        !self.is_pure
    }

    pub const fn offending_location(&self) -> Option<Location> {
        self.offending_location
    }

    /// Continue with `next` only while pure; an impure verdict is sticky.
    pub fn and_then(self, next: impl FnOnce() -> Check) -> Check {
        if self.is_pure {
            next()
        } else {
            Ok(self)
        }
    }

    /// Report impurity at `location` instead of wherever it was found.
    ///
    /// Used when the offending node lives in another function: the call site
    /// is what the caller's diagnostics should point at.
    pub fn reported_at(self, location: Location) -> Self {
        if self.is_pure {
            self
        } else {
            Self::impure_at(location)
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_pure, self.offending_location) {
            (true, _) => write!(f, "pure"),
            (false, Some(loc)) => write!(f, "impure at {}", loc),
            (false, None) => write!(f, "impure"),
        }
    }
}
