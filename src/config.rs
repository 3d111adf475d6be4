//! Tracker configuration loaded from environment variables
//!
//! A `.env` file in the working directory is honored for local setups.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

pub const DATABASE_URL_VAR: &str = "WORKOUT_LOG_DATABASE_URL";
pub const PLACE_IN_DESCRIPTION_VAR: &str = "WORKOUT_LOG_PLACE_IN_DESCRIPTION";
pub const ERROR_PRESENTATION_VAR: &str = "WORKOUT_LOG_ERROR_PRESENTATION";
pub const MAP_ZOOM_VAR: &str = "WORKOUT_LOG_MAP_ZOOM";

const DEFAULT_DATABASE_URL: &str = "sqlite://workout-log.db?mode=rwc";
const DEFAULT_MAP_ZOOM: u8 = 13;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value}")]
  Invalid { var: &'static str, value: String },
}

/// How rejected form input is shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPresentation {
  /// Blocking browser-style alert
  #[default]
  Alert,
  /// In-page modal message
  Modal,
}

impl fmt::Display for ErrorPresentation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Alert => write!(f, "alert"),
      Self::Modal => write!(f, "modal"),
    }
  }
}

impl FromStr for ErrorPresentation {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "alert" => Ok(Self::Alert),
      "modal" => Ok(Self::Modal),
      other => Err(format!("Unknown error presentation: {}", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
  /// sqlx SQLite connection URL
  pub database_url: String,
  /// Append the resolved place name to new workout descriptions
  pub include_place_in_description: bool,
  pub error_presentation: ErrorPresentation,
  /// Zoom level used when focusing the map on a workout
  pub map_zoom_level: u8,
}

impl Default for TrackerConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      include_place_in_description: false,
      error_presentation: ErrorPresentation::Alert,
      map_zoom_level: DEFAULT_MAP_ZOOM,
    }
  }
}

impl TrackerConfig {
  /// Load configuration from the environment, falling back to defaults for
  /// unset variables. Set-but-malformed values are an error.
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok(); // Load .env file if present

    let defaults = Self::default();

    Ok(Self {
      database_url: env::var(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
      include_place_in_description: match env::var(PLACE_IN_DESCRIPTION_VAR) {
        Ok(value) => parse_flag(PLACE_IN_DESCRIPTION_VAR, &value)?,
        Err(_) => defaults.include_place_in_description,
      },
      error_presentation: match env::var(ERROR_PRESENTATION_VAR) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
          var: ERROR_PRESENTATION_VAR,
          value,
        })?,
        Err(_) => defaults.error_presentation,
      },
      map_zoom_level: match env::var(MAP_ZOOM_VAR) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
          var: MAP_ZOOM_VAR,
          value,
        })?,
        Err(_) => defaults.map_zoom_level,
      },
    })
  }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(ConfigError::Invalid {
      var,
      value: value.to_string(),
    }),
  }
}
