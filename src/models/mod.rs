pub mod exercise;
pub mod routine;

pub use exercise::{Difficulty, Exercise, MuscleGroup};
pub use routine::{
    FitnessLevel, GenerateRoutineRequest, GeneratedDay, GeneratedExercise, GeneratedRoutine,
    GeneratedWeek, ProgressionStrategy, RoutineDetail, RoutineStatus, StoredDay, StoredRoutine,
    StoredRoutineExercise, StoredWeek,
};
