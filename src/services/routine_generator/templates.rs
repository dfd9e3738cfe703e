use crate::constants::{MAX_DAYS_PER_WEEK, MIN_DAYS_PER_WEEK};
use crate::models::MuscleGroup;
use rand::Rng;

type Template = &'static [&'static str];

/// Weekly splits keyed by training days per week. Days with several variants
/// get one picked at random per generation.
static DAY_FOCUS_TEMPLATES: [(u32, &[Template]); 5] = [
    (2, &[&["Upper Body", "Lower Body & Core"]]),
    (
        3,
        &[
            &[
                "Push Day (Chest & Shoulders)",
                "Pull Day (Back & Arms)",
                "Legs & Core",
            ],
            &["Upper Body", "Lower Body & Core", "Full Body + Cardio"],
        ],
    ),
    (
        4,
        &[&[
            "Push Day (Chest & Shoulders)",
            "Pull Day (Back & Arms)",
            "Legs & Glutes",
            "Core & Cardio Fun Day",
        ]],
    ),
    (
        5,
        &[&[
            "Chest & Triceps",
            "Back & Biceps",
            "Legs & Glutes",
            "Shoulders & Core",
            "Cardio Fun Day",
        ]],
    ),
    (
        6,
        &[&[
            "Push (Chest & Shoulders)",
            "Pull (Back & Biceps)",
            "Legs",
            "Push (Shoulders & Triceps)",
            "Pull (Back & Core)",
            "Legs & Cardio Fun",
        ]],
    ),
];

pub fn clamp_days_per_week(days_per_week: u32) -> u32 {
    days_per_week.clamp(MIN_DAYS_PER_WEEK, MAX_DAYS_PER_WEEK)
}

/// All template variants for a (clamped) day count.
pub fn template_variants(days_per_week: u32) -> &'static [Template] {
    let days = clamp_days_per_week(days_per_week);
    DAY_FOCUS_TEMPLATES
        .iter()
        .find(|(d, _)| *d == days)
        .or_else(|| DAY_FOCUS_TEMPLATES.iter().find(|(d, _)| *d == 3))
        .map(|(_, variants)| *variants)
        .unwrap_or(&[])
}

/// Pick the day-focus labels for a week. The result always has
/// `clamp_days_per_week(days_per_week)` entries.
pub fn select_template(days_per_week: u32, rng: &mut impl Rng) -> Template {
    let variants = template_variants(days_per_week);
    match variants.len() {
        0 => &[],
        1 => variants[0],
        n => variants[rng.random_range(0..n)],
    }
}

/// Map a focus label to the muscle groups it trains, by keyword. Never empty:
/// labels that match nothing train the full body.
pub fn resolve_muscle_groups(focus: &str) -> Vec<MuscleGroup> {
    let lower = focus.to_lowercase();
    let mut groups: Vec<MuscleGroup> = Vec::new();
    let mut add = |group: MuscleGroup| {
        if !groups.contains(&group) {
            groups.push(group);
        }
    };

    if lower.contains("chest") {
        add(MuscleGroup::Chest);
    }
    if lower.contains("back") {
        add(MuscleGroup::Back);
    }
    if lower.contains("shoulder") {
        add(MuscleGroup::Shoulders);
    }
    if lower.contains("leg") {
        add(MuscleGroup::Legs);
    }
    if lower.contains("arm") || lower.contains("bicep") || lower.contains("tricep") {
        add(MuscleGroup::Arms);
    }
    if lower.contains("core") {
        add(MuscleGroup::Core);
    }
    if lower.contains("glute") {
        add(MuscleGroup::Glutes);
    }
    if lower.contains("full body") || lower.contains("upper body") {
        add(MuscleGroup::Chest);
        add(MuscleGroup::Back);
        add(MuscleGroup::Shoulders);
        add(MuscleGroup::Arms);
    }
    if lower.contains("lower body") {
        add(MuscleGroup::Legs);
        add(MuscleGroup::Glutes);
    }
    if lower.contains("push") {
        add(MuscleGroup::Chest);
        add(MuscleGroup::Shoulders);
    }
    if lower.contains("pull") {
        add(MuscleGroup::Back);
        add(MuscleGroup::Arms);
    }

    if groups.is_empty() {
        vec![MuscleGroup::FullBody]
    } else {
        groups
    }
}
