use crate::constants::{ALWAYS_AVAILABLE_EQUIPMENT, COMPOUND_TAG};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Legs,
    Arms,
    Core,
    Glutes,
    FullBody,
}

impl MuscleGroup {
    /// Upper-body groups progress with the smaller weight increment.
    pub fn is_upper_body(&self) -> bool {
        matches!(
            self,
            MuscleGroup::Chest | MuscleGroup::Back | MuscleGroup::Shoulders | MuscleGroup::Arms
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Legs => "legs",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Core => "core",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::FullBody => "full-body",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chest" => Ok(MuscleGroup::Chest),
            "back" => Ok(MuscleGroup::Back),
            "shoulders" => Ok(MuscleGroup::Shoulders),
            "legs" => Ok(MuscleGroup::Legs),
            "arms" => Ok(MuscleGroup::Arms),
            "core" => Ok(MuscleGroup::Core),
            "glutes" => Ok(MuscleGroup::Glutes),
            "full-body" | "full_body" => Ok(MuscleGroup::FullBody),
            _ => Err(format!("Invalid muscle group: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!("Invalid difficulty: '{}'", s)),
        }
    }
}

/// A catalog exercise as read from the exercise store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: MuscleGroup,
    #[serde(default)]
    pub secondary_muscles: Vec<MuscleGroup>,
    pub equipment: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub alternate_exercise_ids: Vec<Uuid>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Exercise {
    pub fn is_compound(&self) -> bool {
        self.tags.iter().any(|t| t == COMPOUND_TAG)
    }

    /// Primary or any secondary muscle is in `targets`.
    pub fn targets_any(&self, targets: &[MuscleGroup]) -> bool {
        targets.contains(&self.muscle_group)
            || self.secondary_muscles.iter().any(|m| targets.contains(m))
    }

    /// Usable with the given equipment list. Bodyweight work is always usable,
    /// and an empty list means the user did not restrict equipment.
    pub fn usable_with(&self, available_equipment: &[String]) -> bool {
        available_equipment.is_empty()
            || ALWAYS_AVAILABLE_EQUIPMENT.contains(&self.equipment.as_str())
            || available_equipment.iter().any(|e| *e == self.equipment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_exercise(muscle: MuscleGroup, secondary: Vec<MuscleGroup>, equipment: &str) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            muscle_group: muscle,
            secondary_muscles: secondary,
            equipment: equipment.to_string(),
            difficulty: Difficulty::Beginner,
            tags: vec![],
            alternate_exercise_ids: vec![],
            instructions: vec![],
            tips: vec![],
            image_urls: vec![],
        }
    }

    #[test]
    fn muscle_group_round_trips_through_strings() {
        for group in [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Legs,
            MuscleGroup::Arms,
            MuscleGroup::Core,
            MuscleGroup::Glutes,
            MuscleGroup::FullBody,
        ] {
            assert_eq!(group.to_string().parse::<MuscleGroup>().unwrap(), group);
        }
        assert!("neck".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn upper_body_classification() {
        assert!(MuscleGroup::Chest.is_upper_body());
        assert!(MuscleGroup::Arms.is_upper_body());
        assert!(!MuscleGroup::Legs.is_upper_body());
        assert!(!MuscleGroup::Core.is_upper_body());
        assert!(!MuscleGroup::FullBody.is_upper_body());
    }

    #[test]
    fn targets_any_checks_secondary_muscles() {
        let row = make_exercise(MuscleGroup::Back, vec![MuscleGroup::Arms], "cable");
        assert!(row.targets_any(&[MuscleGroup::Arms]));
        assert!(row.targets_any(&[MuscleGroup::Back, MuscleGroup::Legs]));
        assert!(!row.targets_any(&[MuscleGroup::Legs]));
    }

    #[test]
    fn equipment_filter_allows_bodyweight() {
        let owned = vec!["barbell".to_string()];
        assert!(make_exercise(MuscleGroup::Chest, vec![], "barbell").usable_with(&owned));
        assert!(make_exercise(MuscleGroup::Chest, vec![], "bodyweight").usable_with(&owned));
        assert!(make_exercise(MuscleGroup::Chest, vec![], "none").usable_with(&owned));
        assert!(!make_exercise(MuscleGroup::Chest, vec![], "cable").usable_with(&owned));
        assert!(make_exercise(MuscleGroup::Chest, vec![], "cable").usable_with(&[]));
    }

    #[test]
    fn exercise_deserializes_from_catalog_json() {
        let json = r#"{
            "id": "00000000-0000-4000-8000-000000000001",
            "name": "Barbell Squat",
            "muscleGroup": "legs",
            "secondaryMuscles": ["glutes", "core"],
            "equipment": "barbell",
            "difficulty": "intermediate",
            "tags": ["compound"]
        }"#;

        let exercise: Exercise = serde_json::from_str(json).unwrap();
        assert_eq!(exercise.muscle_group, MuscleGroup::Legs);
        assert_eq!(exercise.secondary_muscles.len(), 2);
        assert!(exercise.is_compound());
        assert!(exercise.alternate_exercise_ids.is_empty());
    }
}
