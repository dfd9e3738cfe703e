use crate::constants::{
    AVG_EXERCISE_MINUTES, COMPOUND_SHARE, MAX_EXERCISES_PER_DAY, MIN_EXERCISES_PER_DAY,
};
use crate::models::{Difficulty, Exercise, FitnessLevel, MuscleGroup};
use rand::seq::SliceRandom;
use rand::Rng;

use super::goal_policy::GoalConfig;
use super::templates::resolve_muscle_groups;

/// Why an exercise made it into a day's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolRole {
    /// Drawn from the compound share of a compound-priority day
    Compound,
    /// Drawn from the isolation remainder of a compound-priority day
    Isolation,
    /// Drawn uniformly from the filtered pool
    Sampled,
    /// Added by the catalog-wide top-up for sparse focuses
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct ExercisePoolEntry<'a> {
    pub exercise: &'a Exercise,
    pub role: PoolRole,
}

/// Exercises that fit into the strength share of a session, within 3..=8.
pub fn exercises_per_day(session_duration_min: u32, strength_ratio: f64) -> usize {
    let strength_minutes = (session_duration_min as f64 * strength_ratio).round() as u32;
    ((strength_minutes / AVG_EXERCISE_MINUTES) as usize)
        .clamp(MIN_EXERCISES_PER_DAY, MAX_EXERCISES_PER_DAY)
}

/// Builds the fixed exercise list for each day focus of one generation run.
pub struct ExercisePoolBuilder<'a> {
    catalog: &'a [Exercise],
    goal: &'a GoalConfig,
    available_equipment: &'a [String],
    fitness_level: Option<FitnessLevel>,
    exercises_per_day: usize,
}

impl<'a> ExercisePoolBuilder<'a> {
    pub fn new(
        catalog: &'a [Exercise],
        goal: &'a GoalConfig,
        available_equipment: &'a [String],
        fitness_level: Option<FitnessLevel>,
        session_duration_min: u32,
    ) -> Self {
        Self {
            catalog,
            goal,
            available_equipment,
            fitness_level,
            exercises_per_day: exercises_per_day(session_duration_min, goal.strength_ratio),
        }
    }

    pub fn exercises_per_day(&self) -> usize {
        self.exercises_per_day
    }

    /// Catalog entries eligible for `targets` after equipment and difficulty filters.
    fn candidates(&self, targets: &[MuscleGroup]) -> Vec<&'a Exercise> {
        self.catalog
            .iter()
            .filter(|e| e.targets_any(targets))
            .filter(|e| e.usable_with(self.available_equipment))
            .filter(|e| {
                self.fitness_level != Some(FitnessLevel::Beginner)
                    || e.difficulty != Difficulty::Advanced
            })
            .collect()
    }

    pub fn build(&self, focus: &str, rng: &mut impl Rng) -> Vec<ExercisePoolEntry<'a>> {
        let targets = resolve_muscle_groups(focus);
        let candidates = self.candidates(&targets);
        let per_day = self.exercises_per_day;

        let mut pool: Vec<ExercisePoolEntry<'a>> =
            if self.goal.compound_priority && candidates.len() >= per_day {
                let (compounds, isolations): (Vec<&Exercise>, Vec<&Exercise>) =
                    candidates.into_iter().partition(|e| e.is_compound());
                let compound_count = (per_day as f64 * COMPOUND_SHARE).ceil() as usize;
                let isolation_count = per_day - compound_count;

                pick_random(compounds, compound_count, rng)
                    .into_iter()
                    .map(|exercise| ExercisePoolEntry {
                        exercise,
                        role: PoolRole::Compound,
                    })
                    .chain(
                        pick_random(isolations, isolation_count, rng)
                            .into_iter()
                            .map(|exercise| ExercisePoolEntry {
                                exercise,
                                role: PoolRole::Isolation,
                            }),
                    )
                    .collect()
            } else {
                pick_random(candidates, per_day, rng)
                    .into_iter()
                    .map(|exercise| ExercisePoolEntry {
                        exercise,
                        role: PoolRole::Sampled,
                    })
                    .collect()
            };

        if pool.len() < MIN_EXERCISES_PER_DAY {
            let missing = MIN_EXERCISES_PER_DAY - pool.len();
            let fallback: Vec<&Exercise> = self
                .catalog
                .iter()
                .filter(|e| e.muscle_group == MuscleGroup::FullBody || e.is_compound())
                .filter(|e| !pool.iter().any(|p| p.exercise.id == e.id))
                .collect();

            tracing::warn!(
                focus = focus,
                pool_size = pool.len(),
                fallback_candidates = fallback.len(),
                "Sparse pool for '{}', topping up from {} full-body/compound exercises",
                focus,
                fallback.len()
            );

            pool.extend(
                pick_random(fallback, missing, rng)
                    .into_iter()
                    .map(|exercise| ExercisePoolEntry {
                        exercise,
                        role: PoolRole::Fallback,
                    }),
            );
        }

        pool.truncate(per_day);

        tracing::debug!(
            focus = focus,
            targets = ?targets,
            size = pool.len(),
            "Built exercise pool"
        );

        pool
    }
}

/// Uniform sample without replacement, in random order.
fn pick_random<'a>(mut items: Vec<&'a Exercise>, count: usize, rng: &mut impl Rng) -> Vec<&'a Exercise> {
    items.shuffle(rng);
    items.truncate(count);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::routine_generator::goal_policy::resolve_goal_config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn make_exercise(
        name: &str,
        muscle: MuscleGroup,
        equipment: &str,
        difficulty: Difficulty,
        compound: bool,
    ) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: name.to_string(),
            muscle_group: muscle,
            secondary_muscles: vec![],
            equipment: equipment.to_string(),
            difficulty,
            tags: if compound {
                vec!["compound".to_string()]
            } else {
                vec![]
            },
            alternate_exercise_ids: vec![],
            instructions: vec![],
            tips: vec![],
            image_urls: vec![],
        }
    }

    fn chest_heavy_catalog() -> Vec<Exercise> {
        let mut catalog = Vec::new();
        for i in 0..6 {
            catalog.push(make_exercise(
                &format!("Press {i}"),
                MuscleGroup::Chest,
                "barbell",
                Difficulty::Intermediate,
                true,
            ));
        }
        for i in 0..6 {
            catalog.push(make_exercise(
                &format!("Fly {i}"),
                MuscleGroup::Chest,
                "cable",
                Difficulty::Beginner,
                false,
            ));
        }
        catalog.push(make_exercise(
            "Burpee",
            MuscleGroup::FullBody,
            "bodyweight",
            Difficulty::Beginner,
            false,
        ));
        catalog.push(make_exercise(
            "Clean and Jerk",
            MuscleGroup::FullBody,
            "barbell",
            Difficulty::Advanced,
            true,
        ));
        catalog
    }

    #[test]
    fn exercises_per_day_scales_with_strength_minutes() {
        // 60 * 0.9 = 54 -> 10, capped at 8
        assert_eq!(exercises_per_day(60, 0.9), 8);
        // 45 * 0.5 = 22.5 -> 23 -> 4
        assert_eq!(exercises_per_day(45, 0.5), 4);
        // 15 * 0.3 = 4.5 -> 5 -> 1, raised to 3
        assert_eq!(exercises_per_day(15, 0.3), 3);
        // 30 * 0.85 = 25.5 -> 26 -> 5
        assert_eq!(exercises_per_day(30, 0.85), 5);
    }

    #[test]
    fn compound_priority_reserves_sixty_percent() {
        let catalog = chest_heavy_catalog();
        let goal = resolve_goal_config("general-fitness");
        let builder = ExercisePoolBuilder::new(&catalog, goal, &[], None, 50);
        assert_eq!(builder.exercises_per_day(), 5);

        let pool = builder.build("Chest", &mut StdRng::seed_from_u64(3));
        assert_eq!(pool.len(), 5);

        let compounds = pool.iter().filter(|p| p.role == PoolRole::Compound).count();
        assert_eq!(compounds, 3);
        assert!(pool[..3].iter().all(|p| p.exercise.is_compound()));
        assert!(pool[3..].iter().all(|p| !p.exercise.is_compound()));
    }

    #[test]
    fn pool_has_no_duplicates() {
        let catalog = chest_heavy_catalog();
        let goal = resolve_goal_config("endurance");
        let builder = ExercisePoolBuilder::new(&catalog, goal, &[], None, 120);

        let pool = builder.build("Push Day", &mut StdRng::seed_from_u64(11));
        let ids: HashSet<Uuid> = pool.iter().map(|p| p.exercise.id).collect();
        assert_eq!(ids.len(), pool.len());
        assert!(pool.iter().all(|p| p.role == PoolRole::Sampled));
    }

    #[test]
    fn equipment_filter_keeps_bodyweight() {
        let catalog = chest_heavy_catalog();
        let goal = resolve_goal_config("endurance");
        let equipment = vec!["barbell".to_string()];
        let builder = ExercisePoolBuilder::new(&catalog, goal, &equipment, None, 60);

        let pool = builder.build("Chest", &mut StdRng::seed_from_u64(5));
        assert!(pool
            .iter()
            .all(|p| p.exercise.equipment == "barbell" || p.exercise.equipment == "bodyweight"));
    }

    #[test]
    fn beginners_never_get_advanced_exercises_from_the_filtered_pool() {
        let catalog = chest_heavy_catalog();
        let goal = resolve_goal_config("endurance");
        let builder =
            ExercisePoolBuilder::new(&catalog, goal, &[], Some(FitnessLevel::Beginner), 60);

        for seed in 0..20 {
            let pool = builder.build("Full Body", &mut StdRng::seed_from_u64(seed));
            assert!(pool
                .iter()
                .filter(|p| p.role != PoolRole::Fallback)
                .all(|p| p.exercise.difficulty != Difficulty::Advanced));
        }
    }

    #[test]
    fn sparse_focus_is_topped_up_to_three() {
        let catalog = chest_heavy_catalog();
        let goal = resolve_goal_config("strength");
        // Nothing in the catalog trains legs.
        let builder = ExercisePoolBuilder::new(&catalog, goal, &[], None, 60);

        let pool = builder.build("Legs", &mut StdRng::seed_from_u64(8));
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|p| p.role == PoolRole::Fallback));
        assert!(pool
            .iter()
            .all(|p| p.exercise.is_compound() || p.exercise.muscle_group == MuscleGroup::FullBody));
    }

    #[test]
    fn top_up_does_not_repeat_selected_exercises() {
        let catalog = vec![
            make_exercise("Squat", MuscleGroup::Legs, "barbell", Difficulty::Intermediate, true),
            make_exercise("Plank", MuscleGroup::Core, "bodyweight", Difficulty::Beginner, false),
            make_exercise("Thruster", MuscleGroup::FullBody, "barbell", Difficulty::Intermediate, true),
            make_exercise("Row", MuscleGroup::Back, "barbell", Difficulty::Intermediate, true),
        ];
        let goal = resolve_goal_config("endurance");
        let builder = ExercisePoolBuilder::new(&catalog, goal, &[], None, 60);

        for seed in 0..20 {
            let pool = builder.build("Legs", &mut StdRng::seed_from_u64(seed));
            let ids: HashSet<Uuid> = pool.iter().map(|p| p.exercise.id).collect();
            assert_eq!(ids.len(), pool.len());
            assert_eq!(pool.len(), 3);
            assert_eq!(pool[0].exercise.name, "Squat");
        }
    }

    #[test]
    fn empty_catalog_yields_empty_pool() {
        let goal = resolve_goal_config("strength");
        let builder = ExercisePoolBuilder::new(&[], goal, &[], None, 60);
        assert!(builder.build("Legs", &mut StdRng::seed_from_u64(1)).is_empty());
    }

    #[test]
    fn same_seed_same_pool() {
        let catalog = chest_heavy_catalog();
        let goal = resolve_goal_config("muscle-building");
        let builder = ExercisePoolBuilder::new(&catalog, goal, &[], None, 45);

        let a: Vec<Uuid> = builder
            .build("Chest", &mut StdRng::seed_from_u64(21))
            .iter()
            .map(|p| p.exercise.id)
            .collect();
        let b: Vec<Uuid> = builder
            .build("Chest", &mut StdRng::seed_from_u64(21))
            .iter()
            .map(|p| p.exercise.id)
            .collect();
        assert_eq!(a, b);
    }
}
