//! Aircraft weight categories and the lookup seam used by the selection resolver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::{self, Future};

/// Coarse weight class code reported by the metadata endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AircraftCategory(u8);

impl AircraftCategory {
    pub const LIGHT: Self = Self(2);
    pub const SMALL: Self = Self(3);
    /// Fallback whenever a lookup fails or returns nothing.
    pub const MEDIUM: Self = Self(4);
    pub const HEAVY: Self = Self(5);
    pub const SUPER_HEAVY: Self = Self(6);

    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Map an upstream integer to a category; values outside `u8` fall back to medium.
    pub fn from_code(code: i64) -> Self {
        u8::try_from(code).map(Self).unwrap_or(Self::MEDIUM)
    }

    pub const fn code(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            2 => "light",
            3 => "small",
            4 => "medium",
            5 => "heavy",
            6 => "super heavy",
            _ => "unclassified",
        }
    }
}

impl Default for AircraftCategory {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Best-effort per-aircraft category lookup. Implementations never fail;
/// they answer [`AircraftCategory::MEDIUM`] instead.
pub trait CategoryLookup {
    fn resolve_category(&self, icao24: &str) -> impl Future<Output = AircraftCategory> + Send;
}

/// Lookup that answers the same category for every aircraft.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCategory(pub AircraftCategory);

impl CategoryLookup for FixedCategory {
    fn resolve_category(&self, _icao24: &str) -> impl Future<Output = AircraftCategory> + Send {
        future::ready(self.0)
    }
}
