use crate::models::{GeneratedDay, GeneratedExercise, GeneratedWeek};
use rand::Rng;

use super::exercise_pool::ExercisePoolEntry;
use super::goal_policy::GoalConfig;
use super::overload::{compute_week_params, prescribe, OverloadConfig, Prescription};

/// "muscle-building" -> "Muscle Building"
pub fn title_case_goal(goal: &str) -> String {
    goal.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_routine_name(goal: &str, days_per_week: u32) -> String {
    format!("{} – {} Day Plan", title_case_goal(goal), days_per_week)
}

/// Emit one week: one day per focus, one exercise per pool entry, with fresh
/// prescriptions drawn for this week.
pub fn assemble_week(
    week_number: u32,
    focuses: &[&str],
    pools: &[Vec<ExercisePoolEntry<'_>>],
    goal: &GoalConfig,
    overload: &OverloadConfig,
    rng: &mut impl Rng,
) -> GeneratedWeek {
    let params = compute_week_params(week_number);

    let days = focuses
        .iter()
        .zip(pools)
        .enumerate()
        .map(|(idx, (focus, pool))| {
            let exercises = pool
                .iter()
                .enumerate()
                .map(|(order, entry)| {
                    let prescription =
                        prescribe(goal, &params, overload, entry.exercise.muscle_group, &mut *rng);
                    to_generated_exercise(entry, order as u32 + 1, prescription)
                })
                .collect();

            GeneratedDay {
                day_number: idx as u32 + 1,
                focus: focus.to_string(),
                is_rest_day: false,
                exercises,
            }
        })
        .collect();

    GeneratedWeek {
        week_number,
        is_deload: params.is_deload,
        days,
    }
}

fn to_generated_exercise(
    entry: &ExercisePoolEntry<'_>,
    order: u32,
    prescription: Prescription,
) -> GeneratedExercise {
    let exercise = entry.exercise;
    GeneratedExercise {
        exercise_id: exercise.id,
        exercise_name: exercise.name.clone(),
        muscle_group: exercise.muscle_group,
        equipment: exercise.equipment.clone(),
        image_urls: exercise.image_urls.clone(),
        instructions: exercise.instructions.clone(),
        tips: exercise.tips.clone(),
        sets: prescription.sets,
        reps: prescription.reps,
        rest_seconds: prescription.rest_seconds,
        target_weight: prescription.target_weight,
        order,
        alternate_ids: exercise.alternate_exercise_ids.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Exercise, FitnessLevel, MuscleGroup};
    use crate::services::routine_generator::exercise_pool::PoolRole;
    use crate::services::routine_generator::goal_policy::resolve_goal_config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn make_exercise(name: &str, muscle: MuscleGroup) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: name.to_string(),
            muscle_group: muscle,
            secondary_muscles: vec![],
            equipment: "dumbbell".to_string(),
            difficulty: Difficulty::Beginner,
            tags: vec![],
            alternate_exercise_ids: vec![Uuid::new_v4()],
            instructions: vec!["Lift".to_string()],
            tips: vec![],
            image_urls: vec![],
        }
    }

    #[test]
    fn test_title_case_goal() {
        assert_eq!(title_case_goal("strength"), "Strength");
        assert_eq!(title_case_goal("muscle-building"), "Muscle Building");
        assert_eq!(title_case_goal("unknown-goal-xyz"), "Unknown Goal Xyz");
        assert_eq!(title_case_goal(""), "");
    }

    #[test]
    fn test_format_routine_name() {
        assert_eq!(
            format_routine_name("weight-loss", 3),
            "Weight Loss – 3 Day Plan"
        );
    }

    #[test]
    fn test_assemble_week_orders_days_and_exercises() {
        let press = make_exercise("Press", MuscleGroup::Chest);
        let squat = make_exercise("Squat", MuscleGroup::Legs);
        let lunge = make_exercise("Lunge", MuscleGroup::Legs);

        let pools = vec![
            vec![ExercisePoolEntry {
                exercise: &press,
                role: PoolRole::Sampled,
            }],
            vec![
                ExercisePoolEntry {
                    exercise: &squat,
                    role: PoolRole::Sampled,
                },
                ExercisePoolEntry {
                    exercise: &lunge,
                    role: PoolRole::Sampled,
                },
            ],
        ];
        let focuses = ["Upper Body", "Lower Body & Core"];
        let goal = resolve_goal_config("general-fitness");
        let overload = OverloadConfig::for_level(FitnessLevel::Beginner);

        let week = assemble_week(2, &focuses, &pools, goal, overload, &mut StdRng::seed_from_u64(4));

        assert_eq!(week.week_number, 2);
        assert!(!week.is_deload);
        assert_eq!(week.days.len(), 2);
        assert_eq!(week.days[0].day_number, 1);
        assert_eq!(week.days[1].focus, "Lower Body & Core");
        assert!(week.days.iter().all(|d| !d.is_rest_day));

        let lower = &week.days[1].exercises;
        assert_eq!(lower[0].exercise_name, "Squat");
        assert_eq!(lower[0].order, 1);
        assert_eq!(lower[1].order, 2);
        assert_eq!(lower[1].target_weight, Some(5.0));
        assert_eq!(week.days[0].exercises[0].target_weight, Some(2.5));
        assert_eq!(week.days[0].exercises[0].alternate_ids, press.alternate_exercise_ids);
    }

    #[test]
    fn test_assemble_deload_week() {
        let squat = make_exercise("Squat", MuscleGroup::Legs);
        let pools = vec![vec![ExercisePoolEntry {
            exercise: &squat,
            role: PoolRole::Sampled,
        }]];
        let goal = resolve_goal_config("strength");
        let overload = OverloadConfig::for_level(FitnessLevel::Advanced);

        let week = assemble_week(8, &["Legs"], &pools, goal, overload, &mut StdRng::seed_from_u64(2));

        assert!(week.is_deload);
        let exercise = &week.days[0].exercises[0];
        assert!(exercise.target_weight.is_none());
        assert!((2..=3).contains(&exercise.sets));
        assert!(exercise.reps >= 2 && exercise.reps <= 5);
    }
}
