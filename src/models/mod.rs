pub mod workout;

pub use workout::{Coords, InvalidInputError, WorkoutDetails, WorkoutKind, WorkoutRecord};
