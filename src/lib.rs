//! Geo-tagged workout log
//!
//! Records running and cycling sessions, persists them in a SQLite storage
//! slot and drives list/map collaborators through [`signals::WorkoutSignal`].

pub mod config;
pub mod controller;
pub mod db;
pub mod form;
pub mod logging;
pub mod models;
pub mod signals;
pub mod sorting;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use config::TrackerConfig;
pub use controller::{WorkoutController, WorkoutError};
pub use models::{Coords, InvalidInputError, WorkoutKind, WorkoutRecord};
pub use signals::{SignalReceiver, WorkoutSignal};

/// Install logging, open the database, hydrate the stored workouts and hand
/// back the controller with the receiving end of its signal channel.
///
/// The `WorkoutsRestored` signal is already queued on the receiver.
pub async fn launch(
  config: TrackerConfig,
) -> Result<(WorkoutController, SignalReceiver), db::PersistenceError> {
  logging::init_logging();

  let pool = db::initialize_db(&config.database_url).await?;
  let (tx, rx) = signals::signal_channel();
  let controller = WorkoutController::start(pool, config, tx).await;

  tracing::info!(
    workouts = controller.workouts().len(),
    "Workout log ready"
  );

  Ok((controller, rx))
}
