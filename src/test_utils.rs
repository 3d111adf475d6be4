//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock workout factories
//! - Signal draining
//! - Helper assertions

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::models::{Coords, WorkoutRecord};
use crate::signals::{SignalReceiver, WorkoutSignal};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Running workout at [40, -8] with a 180 spm cadence
pub fn mock_running(distance_km: f64, duration_min: f64) -> WorkoutRecord {
  WorkoutRecord::create_running(Coords::new(40.0, -8.0), distance_km, duration_min, 180, None)
    .expect("Failed to build mock running workout")
}

/// Cycling workout at [40, -8] with 400 m of climbing
pub fn mock_cycling(distance_km: f64, duration_min: f64) -> WorkoutRecord {
  WorkoutRecord::create_cycling(Coords::new(40.0, -8.0), distance_km, duration_min, 400.0, None)
    .expect("Failed to build mock cycling workout")
}

/// ---------------------------------------------------------------------------
/// Signal Helpers
/// ---------------------------------------------------------------------------

/// Collect every signal emitted so far without waiting
pub fn drain_signals(rx: &mut SignalReceiver) -> Vec<WorkoutSignal> {
  let mut signals = Vec::new();
  while let Ok(signal) = rx.try_recv() {
    signals.push(signal);
  }
  signals
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// 08:00 UTC on the given date
pub fn datetime_on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(year, month, day, 8, 0, 0)
    .single()
    .expect("Invalid test date")
}

/// Create a DateTime representing now
pub fn datetime_now() -> DateTime<Utc> {
  Utc::now()
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::signals::signal_channel;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'storage_slots'",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1, "Expected storage_slots table");

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let run = mock_running(5.0, 25.0);
    assert_eq!(run.pace_min_per_km(), Some(5.0));
    assert_eq!(run.cadence_spm(), Some(180));

    let ride = mock_cycling(20.0, 60.0);
    assert_eq!(ride.speed_kmh(), Some(20.0));
    assert_eq!(ride.elevation_gain_m(), Some(400.0));
  }

  #[test]
  fn test_drain_signals_collects_pending() {
    let (tx, mut rx) = signal_channel();
    tx.send(WorkoutSignal::ListCleared).unwrap();
    tx.send(WorkoutSignal::FormClosed).unwrap();

    assert_eq!(
      drain_signals(&mut rx),
      vec![WorkoutSignal::ListCleared, WorkoutSignal::FormClosed]
    );
    assert!(drain_signals(&mut rx).is_empty());
  }

  #[test]
  fn test_datetime_on_is_utc_morning() {
    let date = datetime_on(2024, 10, 19);
    assert_eq!(date.to_rfc3339(), "2024-10-19T08:00:00+00:00");
  }
}
