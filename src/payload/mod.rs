//! Static payload catalogs
//!
//! Catalogs are compile-time data. Nothing mutates them at runtime; the
//! probers only ever pick subsets.

pub mod selection;
pub mod sql;
pub mod xss;

use serde::Serialize;

pub use selection::select;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub category: &'static str,
    pub text: &'static str,
}

/// A named category and its payload strings.
pub type Group = (&'static str, &'static [&'static str]);

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub name: &'static str,
    groups: &'static [Group],
}

impl Catalog {
    pub const fn new(name: &'static str, groups: &'static [Group]) -> Self {
        Self { name, groups }
    }

    pub fn categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.groups.iter().map(|(name, _)| *name)
    }

    pub fn group(&self, category: &str) -> Option<Group> {
        self.groups.iter().find(|(name, _)| *name == category).copied()
    }

    /// Number of payloads across every category.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, p)| p.len()).sum()
    }
}
