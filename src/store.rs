//! Canonical, insertion-ordered workout collection
//!
//! The store is the single source of truth for which workouts exist and in
//! what order they were logged. Display sorting never touches it; see
//! [`crate::sorting`].

use serde::Serialize;

use crate::db::PersistenceError;
use crate::models::WorkoutRecord;

/// Outcome of rebuilding a store from persisted state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HydrationStatus {
  /// Nothing was stored yet
  NoPriorData,
  Restored { count: usize },
  /// Stored data existed but could not be read; the store starts empty
  Discarded { reason: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
  workouts: Vec<WorkoutRecord>,
}

impl WorkoutStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a record at the end of the canonical order
  pub fn append(&mut self, record: WorkoutRecord) {
    self.workouts.push(record);
  }

  /// Remove the first record with `id`. Returns whether anything was removed.
  pub fn remove_by_id(&mut self, id: &str) -> bool {
    match self.workouts.iter().position(|w| w.id() == id) {
      Some(index) => {
        self.workouts.remove(index);
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.workouts.clear();
  }

  pub fn get(&self, id: &str) -> Option<&WorkoutRecord> {
    self.workouts.iter().find(|w| w.id() == id)
  }

  pub fn records(&self) -> &[WorkoutRecord] {
    &self.workouts
  }

  pub fn len(&self) -> usize {
    self.workouts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.workouts.is_empty()
  }

  /// JSON array of plain records, derived metrics included
  pub fn serialize(&self) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&self.workouts)?)
  }

  /// Rebuild a store from persisted state. Absent or malformed input yields
  /// an empty store.
  pub fn hydrate(persisted: Option<&str>) -> Self {
    Self::hydrate_with_status(persisted).0
  }

  /// Like [`WorkoutStore::hydrate`], but also reports whether data was
  /// restored, absent, or discarded.
  ///
  /// Records are taken as stored: validation is not re-run. One malformed
  /// record discards the whole payload.
  pub fn hydrate_with_status(persisted: Option<&str>) -> (Self, HydrationStatus) {
    let Some(payload) = persisted else {
      tracing::info!("No stored workouts found");
      return (Self::new(), HydrationStatus::NoPriorData);
    };

    match serde_json::from_str::<Option<Vec<WorkoutRecord>>>(payload) {
      Ok(Some(workouts)) => {
        let count = workouts.len();
        tracing::info!(count, "Restored stored workouts");
        (Self { workouts }, HydrationStatus::Restored { count })
      }
      Ok(None) => {
        tracing::info!("Stored workouts slot is null");
        (Self::new(), HydrationStatus::NoPriorData)
      }
      Err(e) => {
        tracing::warn!(error = %e, "Discarding malformed stored workouts");
        (
          Self::new(),
          HydrationStatus::Discarded {
            reason: e.to_string(),
          },
        )
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
