//! Events emitted to rendering collaborators (list view, map markers, dialogs)

use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::ErrorPresentation;
use crate::models::{Coords, WorkoutRecord};
use crate::sorting::SortMode;
use crate::store::HydrationStatus;

pub type SignalSender = mpsc::UnboundedSender<WorkoutSignal>;
pub type SignalReceiver = mpsc::UnboundedReceiver<WorkoutSignal>;

pub fn signal_channel() -> (SignalSender, SignalReceiver) {
  mpsc::unbounded_channel()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WorkoutSignal {
  /// Startup: render every persisted workout (list items and markers)
  WorkoutsRestored {
    workouts: Vec<WorkoutRecord>,
    status: HydrationStatus,
  },
  WorkoutAdded(WorkoutRecord),
  WorkoutRemoved { id: String },
  ListCleared,
  /// Re-render the list in this order; canonical order is unchanged
  RenderOrder {
    mode: SortMode,
    workouts: Vec<WorkoutRecord>,
  },
  FocusWorkout { id: String, coords: Coords, zoom: u8 },
  PositionChanged { coords: Coords },
  /// Blocking notice: the map can't be used until a position is known
  PositionUnavailable { message: String },
  ClearConfirmationRequested { count: usize },
  InputRejected {
    message: String,
    presentation: ErrorPresentation,
  },
  /// Workout committed; hide the form and reset its fields
  FormClosed,
  PersistenceFailed { message: String },
}

impl WorkoutSignal {
  pub fn name(&self) -> &'static str {
    match self {
      Self::WorkoutsRestored { .. } => "workouts_restored",
      Self::WorkoutAdded(_) => "workout_added",
      Self::WorkoutRemoved { .. } => "workout_removed",
      Self::ListCleared => "list_cleared",
      Self::RenderOrder { .. } => "render_order",
      Self::FocusWorkout { .. } => "focus_workout",
      Self::PositionChanged { .. } => "position_changed",
      Self::PositionUnavailable { .. } => "position_unavailable",
      Self::ClearConfirmationRequested { .. } => "clear_confirmation_requested",
      Self::InputRejected { .. } => "input_rejected",
      Self::FormClosed => "form_closed",
      Self::PersistenceFailed { .. } => "persistence_failed",
    }
  }
}
