//! Previous/Next navigation through the preset example cases.
//!
//! A cycler is per-session state. The web surface carries the index in the
//! page itself, so no two sessions ever share one.

use crate::cases::{case_at, ExampleCase, CASE_COUNT};
use crate::error::WineError;
use std::str::FromStr;

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl FromStr for Direction {
    type Err = WineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "forward" => Ok(Self::Forward),
            "prev" | "previous" | "backward" => Ok(Self::Backward),
            other => Err(WineError::UnknownDirection(other.to_string())),
        }
    }
}

/// Index into the example cases, always in `0..CASE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExampleCycler {
    index: usize,
}

impl ExampleCycler {
    /// Start at the first case.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `index`, wrapped into range.
    #[must_use]
    pub fn with_index(index: usize) -> Self {
        Self {
            index: index % CASE_COUNT,
        }
    }

    /// Move one case forward or backward, wrapping, and return the new case.
    pub fn advance(&mut self, direction: Direction) -> &'static ExampleCase {
        self.index = match direction {
            Direction::Forward => (self.index + 1) % CASE_COUNT,
            Direction::Backward => (self.index + CASE_COUNT - 1) % CASE_COUNT,
        };
        self.current()
    }

    /// The currently selected case.
    #[must_use]
    pub fn current(&self) -> &'static ExampleCase {
        case_at(self.index)
    }

    /// Current index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}
