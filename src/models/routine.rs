use crate::constants::{
    MAX_DAYS_PER_WEEK, MAX_SESSION_DURATION_MIN, MIN_DAYS_PER_WEEK, MIN_SESSION_DURATION_MIN,
};
use crate::models::MuscleGroup;
use crate::services::routine_generator::overload::is_deload_week;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessLevel::Beginner => write!(f, "beginner"),
            FitnessLevel::Intermediate => write!(f, "intermediate"),
            FitnessLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for FitnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(FitnessLevel::Beginner),
            "intermediate" => Ok(FitnessLevel::Intermediate),
            "advanced" => Ok(FitnessLevel::Advanced),
            _ => Err(format!("Invalid fitness level: '{}'", s)),
        }
    }
}

/// Informational label describing how weights progress for a fitness level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressionStrategy {
    Linear,
    Undulating,
    WaveLoading,
}

impl fmt::Display for ProgressionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionStrategy::Linear => write!(f, "linear"),
            ProgressionStrategy::Undulating => write!(f, "undulating"),
            ProgressionStrategy::WaveLoading => write!(f, "wave-loading"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutineStatus {
    #[default]
    Generated,
    Active,
    Completed,
}

impl fmt::Display for RoutineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutineStatus::Generated => write!(f, "generated"),
            RoutineStatus::Active => write!(f, "active"),
            RoutineStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for RoutineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generated" => Ok(RoutineStatus::Generated),
            "active" => Ok(RoutineStatus::Active),
            "completed" => Ok(RoutineStatus::Completed),
            _ => Err(format!("Invalid routine status: '{}'", s)),
        }
    }
}

// Request types

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRoutineRequest {
    pub goal: String,
    pub days_per_week: u32,
    pub session_duration_min: u32,
    pub fitness_level: String,
    #[serde(default)]
    pub available_equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weeks: Option<u32>,
}

impl GenerateRoutineRequest {
    /// Rejects requests the generator must never see. Out-of-range
    /// `daysPerWeek` is clamped by the generator, so only zero is refused.
    pub fn validate(&self, max_total_weeks: u32) -> Result<(), String> {
        if self.goal.trim().is_empty() {
            return Err("goal is required".to_string());
        }
        if self.fitness_level.trim().is_empty() {
            return Err("fitnessLevel is required".to_string());
        }
        if self.days_per_week == 0 {
            return Err("daysPerWeek must be at least 1".to_string());
        }
        if !(MIN_SESSION_DURATION_MIN..=MAX_SESSION_DURATION_MIN)
            .contains(&self.session_duration_min)
        {
            return Err(format!(
                "sessionDurationMin must be between {} and {}",
                MIN_SESSION_DURATION_MIN, MAX_SESSION_DURATION_MIN
            ));
        }
        if let Some(weeks) = self.total_weeks {
            if weeks == 0 || weeks > max_total_weeks {
                return Err(format!(
                    "totalWeeks must be between 1 and {}",
                    max_total_weeks
                ));
            }
        }
        Ok(())
    }
}

// Generated plan (preview). No database identity until persisted.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExercise {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: String,
    pub image_urls: Vec<String>,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: u32,
    /// Cumulative weight increase (lb) over the starting load; null in week 1 and deload weeks
    pub target_weight: Option<f64>,
    pub order: u32,
    pub alternate_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDay {
    pub day_number: u32,
    pub focus: String,
    pub is_rest_day: bool,
    pub exercises: Vec<GeneratedExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWeek {
    pub week_number: u32,
    pub is_deload: bool,
    pub days: Vec<GeneratedDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRoutine {
    pub name: String,
    pub goal: String,
    pub days_per_week: u32,
    pub session_duration_min: u32,
    pub fitness_level: String,
    pub available_equipment: Vec<String>,
    pub total_weeks: u32,
    pub progression_strategy: ProgressionStrategy,
    pub weeks: Vec<GeneratedWeek>,
}

impl GeneratedRoutine {
    pub fn exercise_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| &w.days)
            .map(|d| d.exercises.len())
            .sum()
    }

    /// Catalog ids referenced anywhere in the plan.
    pub fn exercise_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.weeks
            .iter()
            .flat_map(|w| &w.days)
            .flat_map(|d| &d.exercises)
            .map(|e| e.exercise_id)
    }

    /// Structural checks for a preview coming back from a client.
    ///
    /// Weeks and days must be numbered from 1 without gaps, deload flags must
    /// follow the fixed schedule, and weights only appear on non-deload weeks
    /// after the first.
    pub fn validate(&self, max_total_weeks: u32) -> Result<(), String> {
        if self.weeks.is_empty() {
            return Err("preview must contain at least one week".to_string());
        }
        if self.total_weeks == 0 || self.total_weeks > max_total_weeks {
            return Err(format!(
                "totalWeeks must be between 1 and {}",
                max_total_weeks
            ));
        }
        if self.weeks.len() != self.total_weeks as usize {
            return Err(format!(
                "totalWeeks is {} but the preview has {} weeks",
                self.total_weeks,
                self.weeks.len()
            ));
        }
        if !(MIN_DAYS_PER_WEEK..=MAX_DAYS_PER_WEEK).contains(&self.days_per_week) {
            return Err(format!(
                "daysPerWeek must be between {} and {}",
                MIN_DAYS_PER_WEEK, MAX_DAYS_PER_WEEK
            ));
        }

        for (idx, week) in self.weeks.iter().enumerate() {
            let expected_week = idx as u32 + 1;
            if week.week_number != expected_week {
                return Err(format!(
                    "week {} is out of sequence (expected {})",
                    week.week_number, expected_week
                ));
            }
            if week.is_deload != is_deload_week(week.week_number) {
                return Err(format!(
                    "week {} has the wrong deload flag",
                    week.week_number
                ));
            }
            if week.days.len() != self.days_per_week as usize {
                return Err(format!(
                    "week {} has {} days, expected {}",
                    week.week_number,
                    week.days.len(),
                    self.days_per_week
                ));
            }

            let weighted_week = week.week_number > 1 && !week.is_deload;
            for (day_idx, day) in week.days.iter().enumerate() {
                if day.day_number != day_idx as u32 + 1 {
                    return Err(format!(
                        "week {} day {} is out of sequence",
                        week.week_number, day.day_number
                    ));
                }
                for exercise in &day.exercises {
                    if exercise.sets == 0 || exercise.reps == 0 {
                        return Err(format!(
                            "week {} day {}: sets and reps must be at least 1",
                            week.week_number, day.day_number
                        ));
                    }
                    match exercise.target_weight {
                        Some(_) if !weighted_week => {
                            return Err(format!(
                                "week {} must not carry a target weight",
                                week.week_number
                            ));
                        }
                        Some(weight) if !weight.is_finite() || weight < 0.0 => {
                            return Err(format!(
                                "week {} day {}: invalid target weight",
                                week.week_number, day.day_number
                            ));
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }
}

// Persisted routine tree

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredRoutine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub goal: String,
    pub status: RoutineStatus,
    pub days_per_week: u32,
    pub session_duration_min: u32,
    pub fitness_level: String,
    pub available_equipment: Vec<String>,
    pub total_weeks: u32,
    pub current_week: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredRoutineExercise {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub order: u32,
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: u32,
    pub target_weight: Option<f64>,
    pub alternate_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredDay {
    pub id: Uuid,
    pub day_number: u32,
    pub focus: String,
    pub is_rest_day: bool,
    pub completed: bool,
    pub exercises: Vec<StoredRoutineExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredWeek {
    pub id: Uuid,
    pub week_number: u32,
    pub is_deload: bool,
    pub days: Vec<StoredDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutineDetail {
    #[serde(flatten)]
    pub routine: StoredRoutine,
    pub weeks: Vec<StoredWeek>,
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAndSaveRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub request: GenerateRoutineRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePreviewRequest {
    pub user_id: Uuid,
    pub preview: GeneratedRoutine,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAndSaveResponse {
    pub routine: StoredRoutine,
    pub preview: GeneratedRoutine,
}
