use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// ---------------------------------------------------------------------------
/// Coordinates & Kind
/// ---------------------------------------------------------------------------

/// Position of a workout in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
  pub lat: f64,
  pub lng: f64,
}

impl Coords {
  pub fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }

  fn validate(&self) -> Result<(), InvalidInputError> {
    if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
      return Err(InvalidInputError::new("latitude", "must be between -90 and 90"));
    }
    if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
      return Err(InvalidInputError::new("longitude", "must be between -180 and 180"));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
  Running,
  Cycling,
}

impl WorkoutKind {
  /// Capitalized name used at the start of descriptions
  pub fn label(&self) -> &'static str {
    match self {
      Self::Running => "Running",
      Self::Cycling => "Cycling",
    }
  }

  /// Marker/list icon shown next to the description
  pub fn icon(&self) -> &'static str {
    match self {
      Self::Running => "🏃‍♂️",
      Self::Cycling => "🚴‍♀️",
    }
  }
}

impl fmt::Display for WorkoutKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Running => write!(f, "running"),
      Self::Cycling => write!(f, "cycling"),
    }
  }
}

impl FromStr for WorkoutKind {
  type Err = InvalidInputError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "running" => Ok(Self::Running),
      "cycling" => Ok(Self::Cycling),
      other => Err(InvalidInputError::new(
        "type",
        format!("unknown workout type '{}'", other),
      )),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// A required numeric field was missing, non-finite or out of range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("Invalid {field}: {reason}")]
pub struct InvalidInputError {
  pub field: String,
  pub reason: String,
}

impl InvalidInputError {
  pub fn new(field: &str, reason: impl Into<String>) -> Self {
    Self {
      field: field.to_string(),
      reason: reason.into(),
    }
  }
}

fn require_finite(field: &str, value: f64) -> Result<f64, InvalidInputError> {
  if value.is_finite() {
    Ok(value)
  } else {
    Err(InvalidInputError::new(field, "must be a finite number"))
  }
}

fn require_positive(field: &str, value: f64) -> Result<f64, InvalidInputError> {
  let value = require_finite(field, value)?;
  if value > 0.0 {
    Ok(value)
  } else {
    Err(InvalidInputError::new(field, "must be positive"))
  }
}

/// ---------------------------------------------------------------------------
/// Workout Record
/// ---------------------------------------------------------------------------

/// Kind-specific fields. The derived metric is stored, never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutDetails {
  Running {
    cadence_spm: u32,
    pace_min_per_km: f64,
  },
  Cycling {
    elevation_gain_m: f64,
    speed_kmh: f64,
  },
}

impl WorkoutDetails {
  pub fn kind(&self) -> WorkoutKind {
    match self {
      Self::Running { .. } => WorkoutKind::Running,
      Self::Cycling { .. } => WorkoutKind::Cycling,
    }
  }
}

/// One logged exercise session.
///
/// Records are only built through [`WorkoutRecord::create_running`],
/// [`WorkoutRecord::create_cycling`] (and their `_at` variants) or by
/// deserializing previously persisted data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
  id: String,
  created_at: DateTime<Utc>,
  coords: Coords,
  distance_km: f64,
  duration_min: f64,
  description: String,
  #[serde(flatten)]
  details: WorkoutDetails,
}

impl WorkoutRecord {
  pub fn create_running(
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    cadence_spm: u32,
    place: Option<&str>,
  ) -> Result<Self, InvalidInputError> {
    Self::create_running_at(Utc::now(), coords, distance_km, duration_min, cadence_spm, place)
  }

  pub fn create_running_at(
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    cadence_spm: u32,
    place: Option<&str>,
  ) -> Result<Self, InvalidInputError> {
    coords.validate()?;
    let distance_km = require_positive("distance", distance_km)?;
    let duration_min = require_positive("duration", duration_min)?;
    if cadence_spm == 0 {
      return Err(InvalidInputError::new("cadence", "must be positive"));
    }

    let details = WorkoutDetails::Running {
      cadence_spm,
      // min/km
      pace_min_per_km: duration_min / distance_km,
    };

    Ok(Self::assemble(created_at, coords, distance_km, duration_min, details, place))
  }

  pub fn create_cycling(
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    elevation_gain_m: f64,
    place: Option<&str>,
  ) -> Result<Self, InvalidInputError> {
    Self::create_cycling_at(Utc::now(), coords, distance_km, duration_min, elevation_gain_m, place)
  }

  /// Elevation gain may be negative (net descent) but must be finite
  pub fn create_cycling_at(
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    elevation_gain_m: f64,
    place: Option<&str>,
  ) -> Result<Self, InvalidInputError> {
    coords.validate()?;
    let distance_km = require_positive("distance", distance_km)?;
    let duration_min = require_positive("duration", duration_min)?;
    let elevation_gain_m = require_finite("elevation", elevation_gain_m)?;

    let details = WorkoutDetails::Cycling {
      elevation_gain_m,
      // km/h
      speed_kmh: distance_km / (duration_min / 60.0),
    };

    Ok(Self::assemble(created_at, coords, distance_km, duration_min, details, place))
  }

  fn assemble(
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    details: WorkoutDetails,
    place: Option<&str>,
  ) -> Self {
    let kind = details.kind();

    Self {
      id: Uuid::new_v4().to_string(),
      created_at,
      coords,
      distance_km,
      duration_min,
      description: describe(kind, created_at, place),
      details,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn coords(&self) -> Coords {
    self.coords
  }

  pub fn distance_km(&self) -> f64 {
    self.distance_km
  }

  pub fn duration_min(&self) -> f64 {
    self.duration_min
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn details(&self) -> &WorkoutDetails {
    &self.details
  }

  pub fn kind(&self) -> WorkoutKind {
    self.details.kind()
  }

  pub fn cadence_spm(&self) -> Option<u32> {
    match self.details {
      WorkoutDetails::Running { cadence_spm, .. } => Some(cadence_spm),
      WorkoutDetails::Cycling { .. } => None,
    }
  }

  pub fn pace_min_per_km(&self) -> Option<f64> {
    match self.details {
      WorkoutDetails::Running { pace_min_per_km, .. } => Some(pace_min_per_km),
      WorkoutDetails::Cycling { .. } => None,
    }
  }

  pub fn elevation_gain_m(&self) -> Option<f64> {
    match self.details {
      WorkoutDetails::Cycling { elevation_gain_m, .. } => Some(elevation_gain_m),
      WorkoutDetails::Running { .. } => None,
    }
  }

  pub fn speed_kmh(&self) -> Option<f64> {
    match self.details {
      WorkoutDetails::Cycling { speed_kmh, .. } => Some(speed_kmh),
      WorkoutDetails::Running { .. } => None,
    }
  }

  /// Derived metric rounded to one decimal, with its unit
  pub fn headline_metric(&self) -> (f64, &'static str) {
    let (value, unit) = match self.details {
      WorkoutDetails::Running { pace_min_per_km, .. } => (pace_min_per_km, "min/km"),
      WorkoutDetails::Cycling { speed_kmh, .. } => (speed_kmh, "km/h"),
    };
    ((value * 10.0).round() / 10.0, unit)
  }

  /// Text for the map marker popup
  pub fn popup_text(&self) -> String {
    format!("{} {}", self.kind().icon(), self.description)
  }
}

/// ---------------------------------------------------------------------------
/// Description Formatting
/// ---------------------------------------------------------------------------

/// "Running on October 19th" or "Cycling in Porto on March 2nd"
fn describe(kind: WorkoutKind, created_at: DateTime<Utc>, place: Option<&str>) -> String {
  let day = created_at.day();
  let date = format!("{} {}{}", created_at.format("%B"), day, ordinal_suffix(day));

  match place.map(str::trim).filter(|p| !p.is_empty()) {
    Some(place) => format!("{} in {} on {}", kind.label(), place, date),
    None => format!("{} on {}", kind.label(), date),
  }
}

fn ordinal_suffix(day: u32) -> &'static str {
  match (day % 10, day % 100) {
    (_, 11..=13) => "th",
    (1, _) => "st",
    (2, _) => "nd",
    (3, _) => "rd",
    _ => "th",
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
