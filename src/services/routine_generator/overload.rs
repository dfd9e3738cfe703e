//! Week-over-week progression: deload scheduling, volume scaling and weight bumps.

use crate::constants::{DELOAD_INTERVAL_WEEKS, DELOAD_REP_FACTOR, DELOAD_SET_FACTOR};
use crate::models::{FitnessLevel, MuscleGroup, ProgressionStrategy};
use rand::Rng;

use super::goal_policy::GoalConfig;

/// Per-level weight increments in pounds.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadConfig {
    pub upper_body_increment_lb: f64,
    pub lower_body_increment_lb: f64,
    pub strategy: ProgressionStrategy,
}

static BEGINNER: OverloadConfig = OverloadConfig {
    upper_body_increment_lb: 2.5,
    lower_body_increment_lb: 5.0,
    strategy: ProgressionStrategy::Linear,
};

static INTERMEDIATE: OverloadConfig = OverloadConfig {
    upper_body_increment_lb: 2.5,
    lower_body_increment_lb: 2.5,
    strategy: ProgressionStrategy::Undulating,
};

static ADVANCED: OverloadConfig = OverloadConfig {
    upper_body_increment_lb: 1.25,
    lower_body_increment_lb: 2.5,
    strategy: ProgressionStrategy::WaveLoading,
};

impl OverloadConfig {
    pub fn for_level(level: FitnessLevel) -> &'static OverloadConfig {
        match level {
            FitnessLevel::Beginner => &BEGINNER,
            FitnessLevel::Intermediate => &INTERMEDIATE,
            FitnessLevel::Advanced => &ADVANCED,
        }
    }

    pub fn increment_for(&self, muscle_group: MuscleGroup) -> f64 {
        if muscle_group.is_upper_body() {
            self.upper_body_increment_lb
        } else {
            self.lower_body_increment_lb
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekParams {
    pub is_deload: bool,
    /// Set multiplier for the week (1.0 outside deloads)
    pub deload_factor: f64,
    /// Number of weight increments accumulated by this week
    pub weight_bump_weeks: u32,
}

pub fn is_deload_week(week_number: u32) -> bool {
    week_number > 1 && week_number % DELOAD_INTERVAL_WEEKS == 0
}

pub fn compute_week_params(week_number: u32) -> WeekParams {
    let is_deload = is_deload_week(week_number);
    WeekParams {
        is_deload,
        deload_factor: if is_deload { DELOAD_SET_FACTOR } else { 1.0 },
        weight_bump_weeks: if is_deload {
            0
        } else {
            week_number.saturating_sub(1)
        },
    }
}

impl WeekParams {
    pub fn scale_sets(&self, sets: u32) -> u32 {
        scale_at_least_one(sets, self.deload_factor)
    }

    pub fn scale_reps(&self, reps: u32) -> u32 {
        let factor = if self.is_deload { DELOAD_REP_FACTOR } else { 1.0 };
        scale_at_least_one(reps, factor)
    }

    /// `None` until the first bump and during deloads.
    pub fn target_weight(&self, muscle_group: MuscleGroup, overload: &OverloadConfig) -> Option<f64> {
        if self.weight_bump_weeks > 0 {
            Some(self.weight_bump_weeks as f64 * overload.increment_for(muscle_group))
        } else {
            None
        }
    }
}

fn scale_at_least_one(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).round() as u32).max(1)
}

/// Numbers prescribed for one exercise in one week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prescription {
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: u32,
    pub target_weight: Option<f64>,
}

/// Draw sets, reps and rest from the goal ranges and apply the week's
/// progression. Called independently per exercise per week.
pub fn prescribe(
    goal: &GoalConfig,
    week: &WeekParams,
    overload: &OverloadConfig,
    muscle_group: MuscleGroup,
    rng: &mut impl Rng,
) -> Prescription {
    let sets = week.scale_sets(random_in_range(goal.sets_range, rng));
    let reps = week.scale_reps(random_in_range(goal.reps_range, rng));
    let rest_seconds = random_in_range(goal.rest_range, rng);

    Prescription {
        sets,
        reps,
        rest_seconds,
        target_weight: week.target_weight(muscle_group, overload),
    }
}

fn random_in_range((min, max): (u32, u32), rng: &mut impl Rng) -> u32 {
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}
