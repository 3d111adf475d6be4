//! Workout entry form: raw field parsing and the per-attempt lifecycle
//!
//! Lifecycle of one creation attempt:
//!
//! ```text
//! Idle --open--> AwaitingInput --submit--> Validating --commit--> Idle
//!                      ^                        |
//!                      +--------reject----------+
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Coords, InvalidInputError, WorkoutKind, WorkoutRecord};

/// ---------------------------------------------------------------------------
/// Parsed Input
/// ---------------------------------------------------------------------------

/// Numeric form values for one workout, not yet validated for range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutInput {
  Running {
    distance_km: f64,
    duration_min: f64,
    cadence_spm: u32,
  },
  Cycling {
    distance_km: f64,
    duration_min: f64,
    elevation_gain_m: f64,
  },
}

impl WorkoutInput {
  /// Validate and construct the record
  pub fn build(
    self,
    coords: Coords,
    created_at: DateTime<Utc>,
    place: Option<&str>,
  ) -> Result<WorkoutRecord, InvalidInputError> {
    match self {
      Self::Running {
        distance_km,
        duration_min,
        cadence_spm,
      } => WorkoutRecord::create_running_at(
        created_at,
        coords,
        distance_km,
        duration_min,
        cadence_spm,
        place,
      ),
      Self::Cycling {
        distance_km,
        duration_min,
        elevation_gain_m,
      } => WorkoutRecord::create_cycling_at(
        created_at,
        coords,
        distance_km,
        duration_min,
        elevation_gain_m,
        place,
      ),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Raw Form Fields
/// ---------------------------------------------------------------------------

/// Text exactly as typed into the form. Only the field matching `kind`
/// (cadence or elevation) is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWorkoutForm {
  pub kind: String,
  pub distance: String,
  pub duration: String,
  #[serde(default)]
  pub cadence: String,
  #[serde(default)]
  pub elevation: String,
}

impl RawWorkoutForm {
  pub fn parse(&self) -> Result<WorkoutInput, InvalidInputError> {
    let kind: WorkoutKind = self.kind.parse()?;
    let distance_km = parse_number("distance", &self.distance)?;
    let duration_min = parse_number("duration", &self.duration)?;

    Ok(match kind {
      WorkoutKind::Running => WorkoutInput::Running {
        distance_km,
        duration_min,
        cadence_spm: parse_cadence(&self.cadence)?,
      },
      WorkoutKind::Cycling => WorkoutInput::Cycling {
        distance_km,
        duration_min,
        elevation_gain_m: parse_number("elevation", &self.elevation)?,
      },
    })
  }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, InvalidInputError> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Err(InvalidInputError::new(field, "is required"));
  }
  raw
    .parse::<f64>()
    .map_err(|_| InvalidInputError::new(field, format!("'{}' is not a number", raw)))
}

fn parse_cadence(raw: &str) -> Result<u32, InvalidInputError> {
  let value = parse_number("cadence", raw)?;
  if !value.is_finite() {
    return Err(InvalidInputError::new("cadence", "must be a finite number"));
  }
  if value <= 0.0 {
    return Err(InvalidInputError::new("cadence", "must be positive"));
  }
  if value.fract() != 0.0 || value > u32::MAX as f64 {
    return Err(InvalidInputError::new("cadence", "must be a whole number of steps per minute"));
  }
  Ok(value as u32)
}

/// ---------------------------------------------------------------------------
/// Form Session
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FormState {
  #[default]
  Idle,
  /// Open at the clicked map position, waiting for a submit
  AwaitingInput { coords: Coords },
  Validating { coords: Coords },
}

#[derive(Debug, Clone, Default)]
pub struct FormSession {
  state: FormState,
}

impl FormSession {
  pub fn state(&self) -> FormState {
    self.state
  }

  /// Open (or re-target) the form at `coords`
  pub fn open(&mut self, coords: Coords) {
    self.state = FormState::AwaitingInput { coords };
  }

  /// Move to `Validating`. Returns the target coordinates, or None when the
  /// form is not awaiting input.
  pub fn begin_validation(&mut self) -> Option<Coords> {
    match self.state {
      FormState::AwaitingInput { coords } => {
        self.state = FormState::Validating { coords };
        Some(coords)
      }
      _ => None,
    }
  }

  /// Workout committed: close the form and drop the transient input
  pub fn commit(&mut self) {
    self.state = FormState::Idle;
  }

  /// Validation failed: keep the form open at the same position
  pub fn reject(&mut self) {
    if let FormState::Validating { coords } = self.state {
      self.state = FormState::AwaitingInput { coords };
    }
  }

  pub fn cancel(&mut self) {
    self.state = FormState::Idle;
  }
}
