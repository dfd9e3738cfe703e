mod assembler;
pub mod exercise_pool;
pub mod goal_policy;
pub mod overload;
pub mod templates;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::models::{Exercise, FitnessLevel, GenerateRoutineRequest, GeneratedRoutine};
use crate::services::catalog_service::CatalogService;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use assembler::{assemble_week, format_routine_name};
use exercise_pool::{ExercisePoolBuilder, ExercisePoolEntry};
use goal_policy::resolve_goal_config;
use overload::OverloadConfig;
use templates::{clamp_days_per_week, select_template};

pub use assembler::title_case_goal;

/// Synthesizes multi-week routines from the exercise catalog.
///
/// Generation itself is synchronous and pure given a random source; the only
/// I/O is the catalog snapshot fetched once per call.
pub struct RoutineGenerator {
    catalog: CatalogService,
    config: GeneratorConfig,
}

impl RoutineGenerator {
    pub fn new(catalog: CatalogService, config: GeneratorConfig) -> Self {
        RoutineGenerator { catalog, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Build a preview for a validated request using OS-seeded randomness.
    pub async fn generate_preview(
        &self,
        request: &GenerateRoutineRequest,
    ) -> Result<GeneratedRoutine> {
        let catalog = self.catalog.snapshot().await?;

        if catalog.is_empty() {
            tracing::warn!("Exercise catalog is empty, generated days will have no exercises");
        }

        let mut rng = StdRng::from_os_rng();
        Ok(self.generate_with_rng(request, &catalog, &mut rng))
    }

    /// Deterministic core: same request, catalog and seed give the same plan.
    pub fn generate_with_rng(
        &self,
        request: &GenerateRoutineRequest,
        catalog: &[Exercise],
        rng: &mut impl Rng,
    ) -> GeneratedRoutine {
        let goal = resolve_goal_config(&request.goal);
        let days_per_week = clamp_days_per_week(request.days_per_week);
        let total_weeks = request
            .total_weeks
            .unwrap_or(self.config.default_total_weeks)
            .max(1);

        let fitness_level = request.fitness_level.parse::<FitnessLevel>().ok();
        let overload = OverloadConfig::for_level(fitness_level.unwrap_or_else(|| {
            tracing::warn!(
                fitness_level = %request.fitness_level,
                "Unknown fitness level, using beginner progression"
            );
            FitnessLevel::Beginner
        }));

        let focuses = select_template(days_per_week, rng);

        let pool_builder = ExercisePoolBuilder::new(
            catalog,
            goal,
            &request.available_equipment,
            fitness_level,
            request.session_duration_min,
        );

        // Pools are drawn once and shared by every week.
        let pools: Vec<Vec<ExercisePoolEntry<'_>>> = focuses
            .iter()
            .map(|focus| pool_builder.build(focus, &mut *rng))
            .collect();

        let weeks = (1..=total_weeks)
            .map(|week_number| {
                assemble_week(week_number, focuses, &pools, goal, overload, &mut *rng)
            })
            .collect();

        let routine = GeneratedRoutine {
            name: format_routine_name(&request.goal, days_per_week),
            goal: request.goal.clone(),
            days_per_week,
            session_duration_min: request.session_duration_min,
            fitness_level: request.fitness_level.clone(),
            available_equipment: request.available_equipment.clone(),
            total_weeks,
            progression_strategy: overload.strategy,
            weeks,
        };

        tracing::info!(
            goal = %routine.goal,
            resolved_goal = goal.id,
            days_per_week = days_per_week,
            total_weeks = total_weeks,
            exercises_per_day = pool_builder.exercises_per_day(),
            "Generated routine '{}' ({} exercise slots)",
            routine.name,
            routine.exercise_count()
        );

        routine
    }
}
