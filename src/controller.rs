//! Workout list orchestration
//!
//! The controller owns the canonical store, the sort cycler and the entry
//! form. Every mutation follows the same order: change the store, persist
//! the `workouts` slot, then signal the rendering collaborators.
//!
//! Place names: creation never waits for geocoding. When
//! `include_place_in_description` is set, the place name held at commit time
//! is used; a name that arrives later only affects later workouts.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::db::{self, DbPool, PersistenceError};
use crate::form::{FormSession, FormState, RawWorkoutForm, WorkoutInput};
use crate::models::{Coords, InvalidInputError, WorkoutRecord};
use crate::signals::{SignalSender, WorkoutSignal};
use crate::sorting::{SortCycler, SortMode};
use crate::store::{HydrationStatus, WorkoutStore};

/// Storage slot holding the serialized workout list
pub const WORKOUTS_SLOT: &str = "workouts";

const POSITION_UNAVAILABLE_MESSAGE: &str = "Could not get your position";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WorkoutError {
  #[error(transparent)]
  InvalidInput(#[from] InvalidInputError),

  #[error("Position unavailable: {0}")]
  PositionUnavailable(String),

  #[error("No workout form is open")]
  FormNotOpen,
}

/// ---------------------------------------------------------------------------
/// Controller
/// ---------------------------------------------------------------------------

pub struct WorkoutController {
  db: DbPool,
  config: TrackerConfig,
  store: WorkoutStore,
  sorter: SortCycler,
  form: FormSession,
  position: Option<Coords>,
  place_name: Option<String>,
  signals: SignalSender,
}

impl WorkoutController {
  /// Hydrate from the `workouts` slot and announce the restored list.
  /// An unreadable slot starts an empty list; it is never fatal.
  pub async fn start(db: DbPool, config: TrackerConfig, signals: SignalSender) -> Self {
    let (store, status) = match db::load_slot(&db, WORKOUTS_SLOT).await {
      Ok(persisted) => WorkoutStore::hydrate_with_status(persisted.as_deref()),
      Err(e) => {
        tracing::warn!(error = %e, "Could not read stored workouts, starting empty");
        (
          WorkoutStore::new(),
          HydrationStatus::Discarded {
            reason: e.to_string(),
          },
        )
      }
    };

    let controller = Self {
      db,
      config,
      store,
      sorter: SortCycler::new(),
      form: FormSession::default(),
      position: None,
      place_name: None,
      signals,
    };

    controller.emit(WorkoutSignal::WorkoutsRestored {
      workouts: controller.store.records().to_vec(),
      status,
    });

    controller
  }

  // ---------------------------------------------------------------------------
  // Collaborator Inputs
  // ---------------------------------------------------------------------------

  /// Geolocation resolved
  pub fn set_current_position(&mut self, coords: Coords) {
    tracing::info!(lat = coords.lat, lng = coords.lng, "Current position set");
    self.position = Some(coords);
    self.emit(WorkoutSignal::PositionChanged { coords });
  }

  /// Geolocation denied or unsupported
  pub fn position_unavailable(&mut self, reason: &str) {
    tracing::warn!(reason, "Position unavailable");
    self.position = None;
    self.form.cancel();
    self.emit(WorkoutSignal::PositionUnavailable {
      message: POSITION_UNAVAILABLE_MESSAGE.to_string(),
    });
  }

  /// Reverse-geocoding result. Blank names clear the current one.
  pub fn set_place_name(&mut self, name: &str) {
    let name = name.trim();
    self.place_name = if name.is_empty() {
      None
    } else {
      Some(name.to_string())
    };
  }

  fn description_place(&self) -> Option<&str> {
    if self.config.include_place_in_description {
      self.place_name.as_deref()
    } else {
      None
    }
  }

  // ---------------------------------------------------------------------------
  // Form Lifecycle
  // ---------------------------------------------------------------------------

  /// Map click: open the entry form at `coords`
  pub fn open_form(&mut self, coords: Coords) -> Result<(), WorkoutError> {
    if self.position.is_none() {
      return Err(WorkoutError::PositionUnavailable(
        POSITION_UNAVAILABLE_MESSAGE.to_string(),
      ));
    }
    self.form.open(coords);
    Ok(())
  }

  pub fn cancel_form(&mut self) {
    self.form.cancel();
  }

  /// Parse, validate and commit the open form.
  ///
  /// On rejection the form stays open and `InputRejected` is emitted with
  /// the configured presentation.
  pub async fn submit_form(&mut self, raw: &RawWorkoutForm) -> Result<WorkoutRecord, WorkoutError> {
    let coords = self.form.begin_validation().ok_or(WorkoutError::FormNotOpen)?;

    let outcome = match raw.parse() {
      Ok(input) => self.add_workout(coords, input).await,
      Err(e) => Err(e.into()),
    };

    match outcome {
      Ok(record) => {
        self.form.commit();
        self.emit(WorkoutSignal::FormClosed);
        Ok(record)
      }
      Err(e) => {
        self.form.reject();
        if let WorkoutError::InvalidInput(invalid) = &e {
          tracing::info!(field = %invalid.field, reason = %invalid.reason, "Workout input rejected");
          self.emit(WorkoutSignal::InputRejected {
            message: invalid.to_string(),
            presentation: self.config.error_presentation,
          });
        }
        Err(e)
      }
    }
  }

  // ---------------------------------------------------------------------------
  // List Mutations
  // ---------------------------------------------------------------------------

  /// Validate, append, persist and signal exactly one `WorkoutAdded`.
  /// Invalid input leaves the store untouched and emits nothing.
  pub async fn add_workout(
    &mut self,
    coords: Coords,
    input: WorkoutInput,
  ) -> Result<WorkoutRecord, WorkoutError> {
    let record = input.build(coords, Utc::now(), self.description_place())?;

    self.store.append(record.clone());
    tracing::info!(
      id = %record.id(),
      kind = %record.kind(),
      distance_km = record.distance_km(),
      duration_min = record.duration_min(),
      "Workout added"
    );

    self.persist().await;
    self.emit(WorkoutSignal::WorkoutAdded(record.clone()));

    Ok(record)
  }

  /// Remove a workout by id. Unknown ids are a silent no-op.
  pub async fn delete_workout(&mut self, id: &str) -> bool {
    if !self.store.remove_by_id(id) {
      tracing::debug!(id, "Delete ignored, no such workout");
      return false;
    }

    tracing::info!(id, "Workout deleted");
    self.persist().await;
    self.emit(WorkoutSignal::WorkoutRemoved { id: id.to_string() });
    true
  }

  /// Clear-all button: ask for confirmation only when there is something to
  /// clear. Returns whether a confirmation was requested.
  pub fn request_clear(&self) -> bool {
    if self.store.is_empty() {
      return false;
    }
    self.emit(WorkoutSignal::ClearConfirmationRequested {
      count: self.store.len(),
    });
    true
  }

  /// Confirmed clear: empty the list and erase the stored slot.
  /// An empty list is left alone and nothing is emitted.
  pub async fn clear_all(&mut self) -> bool {
    if self.store.is_empty() {
      return false;
    }

    let count = self.store.len();
    self.store.clear();
    tracing::info!(count, "Workout list cleared");

    if let Err(e) = db::erase_slot(&self.db, WORKOUTS_SLOT).await {
      self.report_persistence_failure(&e);
    }
    self.emit(WorkoutSignal::ListCleared);
    true
  }

  /// Sort button: emit the next display order. Returns the mode applied.
  pub fn apply_sort(&mut self) -> SortMode {
    let mode = self.sorter.current_mode();
    let workouts = self.sorter.next(self.store.records());
    tracing::debug!(%mode, count = workouts.len(), "Applying sort");
    self.emit(WorkoutSignal::RenderOrder { mode, workouts });
    mode
  }

  /// List item click: pan the map to the workout
  pub fn locate(&self, id: &str) -> Option<Coords> {
    let coords = self.store.get(id)?.coords();
    self.emit(WorkoutSignal::FocusWorkout {
      id: id.to_string(),
      coords,
      zoom: self.config.map_zoom_level,
    });
    Some(coords)
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  /// Canonical (insertion) order
  pub fn workouts(&self) -> &[WorkoutRecord] {
    self.store.records()
  }

  pub fn form_state(&self) -> FormState {
    self.form.state()
  }

  pub fn current_position(&self) -> Option<Coords> {
    self.position
  }

  pub fn next_sort_mode(&self) -> SortMode {
    self.sorter.current_mode()
  }

  // ---------------------------------------------------------------------------
  // Internal Helpers
  // ---------------------------------------------------------------------------

  async fn persist(&self) {
    let result = match self.store.serialize() {
      Ok(payload) => db::save_slot(&self.db, WORKOUTS_SLOT, &payload).await,
      Err(e) => Err(e),
    };

    if let Err(e) = result {
      self.report_persistence_failure(&e);
    }
  }

  fn report_persistence_failure(&self, e: &PersistenceError) {
    tracing::warn!(error = %e, "Failed to persist workouts");
    self.emit(WorkoutSignal::PersistenceFailed {
      message: e.to_string(),
    });
  }

  fn emit(&self, signal: WorkoutSignal) {
    if let Err(e) = self.signals.send(signal) {
      tracing::debug!(signal = e.0.name(), "No collaborator listening, signal dropped");
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
