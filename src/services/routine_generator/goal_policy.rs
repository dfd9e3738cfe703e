//! Static training parameters per fitness goal.

/// Goal every unknown id resolves to.
pub const FALLBACK_GOAL: &str = "general-fitness";

#[derive(Debug, Clone, PartialEq)]
pub struct GoalConfig {
    pub id: &'static str,
    /// Share of session time spent on resistance work
    pub strength_ratio: f64,
    pub cardio_ratio: f64,
    pub preferred_intensity: &'static [&'static str],
    pub prefer_fun_cardio: bool,
    /// Reserve most of each day for compound movements
    pub compound_priority: bool,
    pub sets_range: (u32, u32),
    pub reps_range: (u32, u32),
    pub rest_range: (u32, u32),
}

static GOAL_CONFIGS: [GoalConfig; 7] = [
    GoalConfig {
        id: "weight-loss",
        strength_ratio: 0.4,
        cardio_ratio: 0.6,
        preferred_intensity: &["hiit", "high"],
        prefer_fun_cardio: true,
        compound_priority: true,
        sets_range: (3, 4),
        reps_range: (12, 15),
        rest_range: (30, 60),
    },
    GoalConfig {
        id: "muscle-building",
        strength_ratio: 0.85,
        cardio_ratio: 0.15,
        preferred_intensity: &["low", "moderate"],
        prefer_fun_cardio: false,
        compound_priority: true,
        sets_range: (3, 5),
        reps_range: (6, 12),
        rest_range: (60, 120),
    },
    GoalConfig {
        id: "strength",
        strength_ratio: 0.9,
        cardio_ratio: 0.1,
        preferred_intensity: &["low"],
        prefer_fun_cardio: false,
        compound_priority: true,
        sets_range: (4, 5),
        reps_range: (3, 6),
        rest_range: (120, 180),
    },
    GoalConfig {
        id: "endurance",
        strength_ratio: 0.35,
        cardio_ratio: 0.65,
        preferred_intensity: &["moderate", "high"],
        prefer_fun_cardio: true,
        compound_priority: false,
        sets_range: (2, 3),
        reps_range: (15, 20),
        rest_range: (30, 45),
    },
    GoalConfig {
        id: "flexibility",
        strength_ratio: 0.3,
        cardio_ratio: 0.7,
        preferred_intensity: &["low", "moderate"],
        prefer_fun_cardio: true,
        compound_priority: false,
        sets_range: (2, 3),
        reps_range: (10, 15),
        rest_range: (30, 60),
    },
    GoalConfig {
        id: FALLBACK_GOAL,
        strength_ratio: 0.5,
        cardio_ratio: 0.5,
        preferred_intensity: &["moderate", "high"],
        prefer_fun_cardio: true,
        compound_priority: true,
        sets_range: (3, 4),
        reps_range: (10, 12),
        rest_range: (45, 90),
    },
    GoalConfig {
        id: "athletic-performance",
        strength_ratio: 0.6,
        cardio_ratio: 0.4,
        preferred_intensity: &["high", "hiit"],
        prefer_fun_cardio: false,
        compound_priority: true,
        sets_range: (3, 5),
        reps_range: (5, 10),
        rest_range: (60, 120),
    },
];

/// Look up the parameters for `goal`. Unknown ids silently fall back to
/// general fitness.
// TODO: decide with product whether an unknown goal should be a 400 instead of a fallback.
pub fn resolve_goal_config(goal: &str) -> &'static GoalConfig {
    if let Some(config) = GOAL_CONFIGS.iter().find(|c| c.id == goal) {
        return config;
    }

    tracing::warn!(goal = goal, "Unknown goal '{}', using {}", goal, FALLBACK_GOAL);
    GOAL_CONFIGS
        .iter()
        .find(|c| c.id == FALLBACK_GOAL)
        .unwrap_or(&GOAL_CONFIGS[0])
}

pub fn known_goals() -> impl Iterator<Item = &'static str> {
    GOAL_CONFIGS.iter().map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_goal_resolves_to_itself() {
        let config = resolve_goal_config("strength");
        assert_eq!(config.id, "strength");
        assert_eq!(config.sets_range, (4, 5));
        assert_eq!(config.reps_range, (3, 6));
        assert_eq!(config.rest_range, (120, 180));
        assert!(config.compound_priority);
    }

    #[test]
    fn unknown_goal_falls_back_to_general_fitness() {
        assert_eq!(resolve_goal_config("unknown-goal-xyz").id, "general-fitness");
        assert_eq!(resolve_goal_config("").id, "general-fitness");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(resolve_goal_config("Strength").id, "general-fitness");
    }

    #[test]
    fn ranges_are_well_formed() {
        for goal in known_goals() {
            let config = resolve_goal_config(goal);
            assert!(config.sets_range.0 >= 1 && config.sets_range.0 <= config.sets_range.1);
            assert!(config.reps_range.0 >= 1 && config.reps_range.0 <= config.reps_range.1);
            assert!(config.rest_range.0 <= config.rest_range.1);
            assert!((config.strength_ratio + config.cardio_ratio - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn table_lists_every_goal_once() {
        let goals: Vec<_> = known_goals().collect();
        assert_eq!(goals.len(), 7);
        let mut deduped = goals.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), goals.len());
    }
}
