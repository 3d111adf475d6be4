//! Rotating display order for the workout list
//!
//! Each sort action applies the current mode to a copy of the canonical
//! order and then advances to the next mode, wrapping after `Default`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::models::WorkoutRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
  DistanceAsc,
  DistanceDesc,
  DurationAsc,
  DurationDesc,
  /// Canonical (insertion) order
  Default,
}

impl SortMode {
  /// Rotation order, starting point first
  pub const CYCLE: [SortMode; 5] = [
    SortMode::DistanceAsc,
    SortMode::DistanceDesc,
    SortMode::DurationAsc,
    SortMode::DurationDesc,
    SortMode::Default,
  ];

  fn compare(&self, a: &WorkoutRecord, b: &WorkoutRecord) -> Ordering {
    match self {
      Self::DistanceAsc => a.distance_km().total_cmp(&b.distance_km()),
      Self::DistanceDesc => b.distance_km().total_cmp(&a.distance_km()),
      Self::DurationAsc => a.duration_min().total_cmp(&b.duration_min()),
      Self::DurationDesc => b.duration_min().total_cmp(&a.duration_min()),
      Self::Default => Ordering::Equal,
    }
  }
}

impl fmt::Display for SortMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::DistanceAsc => write!(f, "distance_asc"),
      Self::DistanceDesc => write!(f, "distance_desc"),
      Self::DurationAsc => write!(f, "duration_asc"),
      Self::DurationDesc => write!(f, "duration_desc"),
      Self::Default => write!(f, "default"),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct SortCycler {
  position: usize,
}

impl SortCycler {
  pub fn new() -> Self {
    Self::default()
  }

  /// Mode the next call to [`SortCycler::next`] will apply
  pub fn current_mode(&self) -> SortMode {
    SortMode::CYCLE[self.position]
  }

  /// Return `canonical` reordered by the current mode, then advance.
  /// Sorting is stable: ties keep their canonical relative order.
  pub fn next(&mut self, canonical: &[WorkoutRecord]) -> Vec<WorkoutRecord> {
    let mode = self.current_mode();
    let mut ordered = canonical.to_vec();

    if mode != SortMode::Default {
      ordered.sort_by(|a, b| mode.compare(a, b));
    }

    self.position = (self.position + 1) % SortMode::CYCLE.len();
    ordered
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
