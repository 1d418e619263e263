//! Exercise definitions - the fixed 5x5 catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Exercise identifier. Serialized names match the stored snapshot keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ExerciseKey {
    Squat,
    BenchPress,
    OverheadPress,
    BarbellRow,
    Deadlift,
    Pullups,
}

impl ExerciseKey {
    /// Snapshot key (`squat`, `benchPress`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKey::Squat => "squat",
            ExerciseKey::BenchPress => "benchPress",
            ExerciseKey::OverheadPress => "overheadPress",
            ExerciseKey::BarbellRow => "barbellRow",
            ExerciseKey::Deadlift => "deadlift",
            ExerciseKey::Pullups => "pullups",
        }
    }

    /// Lookup by snapshot key or a short CLI alias. Case-insensitive.
    pub fn parse(name: &str) -> Option<Self> {
        let key = match name.trim().to_lowercase().as_str() {
            "squat" => ExerciseKey::Squat,
            "benchpress" | "bench-press" | "bench" => ExerciseKey::BenchPress,
            "overheadpress" | "overhead-press" | "ohp" | "press" => ExerciseKey::OverheadPress,
            "barbellrow" | "barbell-row" | "row" => ExerciseKey::BarbellRow,
            "deadlift" => ExerciseKey::Deadlift,
            "pullups" | "pull-ups" | "pullup" => ExerciseKey::Pullups,
            _ => return None,
        };
        Some(key)
    }

    pub fn definition(&self) -> &'static ExerciseDefinition {
        definition(*self)
    }

    pub fn display_name(&self) -> &'static str {
        self.definition().display_name
    }

    pub fn is_bodyweight(&self) -> bool {
        matches!(self.definition().kind, ExerciseKind::Bodyweight)
    }
}

impl fmt::Display for ExerciseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExerciseKey::parse(s).ok_or_else(|| format!("unknown exercise: {}", s))
    }
}

/// How an exercise progresses between sessions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExerciseKind {
    /// Barbell lift: add `increment` on success, never deload below `floor`
    Weighted { increment: f64, floor: f64 },
    /// Reps to failure, no load
    Bodyweight,
}

#[derive(Debug, Clone)]
pub struct ExerciseDefinition {
    pub key: ExerciseKey,
    pub display_name: &'static str,
    pub sets: usize,
    /// Minimum reps per set for a successful session (0 = to failure)
    pub target_reps: u32,
    pub kind: ExerciseKind,
}

impl ExerciseDefinition {
    pub fn weight_increment(&self) -> f64 {
        match self.kind {
            ExerciseKind::Weighted { increment, .. } => increment,
            ExerciseKind::Bodyweight => 0.0,
        }
    }
}

pub const EXERCISES: &[ExerciseDefinition] = &[
    ExerciseDefinition {
        key: ExerciseKey::Squat,
        display_name: "Squat",
        sets: 5,
        target_reps: 5,
        kind: ExerciseKind::Weighted { increment: 5.0, floor: 45.0 },
    },
    ExerciseDefinition {
        key: ExerciseKey::BenchPress,
        display_name: "Bench Press",
        sets: 5,
        target_reps: 5,
        kind: ExerciseKind::Weighted { increment: 5.0, floor: 45.0 },
    },
    ExerciseDefinition {
        key: ExerciseKey::OverheadPress,
        display_name: "Overhead Press",
        sets: 5,
        target_reps: 5,
        kind: ExerciseKind::Weighted { increment: 5.0, floor: 45.0 },
    },
    ExerciseDefinition {
        key: ExerciseKey::BarbellRow,
        display_name: "Barbell Row",
        sets: 5,
        target_reps: 5,
        kind: ExerciseKind::Weighted { increment: 5.0, floor: 45.0 },
    },
    ExerciseDefinition {
        key: ExerciseKey::Deadlift,
        display_name: "Deadlift",
        sets: 1,
        target_reps: 5,
        kind: ExerciseKind::Weighted { increment: 10.0, floor: 95.0 },
    },
    ExerciseDefinition {
        key: ExerciseKey::Pullups,
        display_name: "Pull-ups",
        sets: 3,
        target_reps: 0,
        kind: ExerciseKind::Bodyweight,
    },
];

/// Barbell lifts tracked in the weight table
pub const WEIGHTED_LIFTS: &[ExerciseKey] = &[
    ExerciseKey::Squat,
    ExerciseKey::BenchPress,
    ExerciseKey::OverheadPress,
    ExerciseKey::BarbellRow,
    ExerciseKey::Deadlift,
];

pub fn all_exercises() -> &'static [ExerciseDefinition] {
    EXERCISES
}

pub fn weighted_lifts() -> &'static [ExerciseKey] {
    WEIGHTED_LIFTS
}

pub fn definition(key: ExerciseKey) -> &'static ExerciseDefinition {
    match key {
        ExerciseKey::Squat => &EXERCISES[0],
        ExerciseKey::BenchPress => &EXERCISES[1],
        ExerciseKey::OverheadPress => &EXERCISES[2],
        ExerciseKey::BarbellRow => &EXERCISES[3],
        ExerciseKey::Deadlift => &EXERCISES[4],
        ExerciseKey::Pullups => &EXERCISES[5],
    }
}

/// Find exercise by snapshot key or alias (for CLI input)
pub fn find_exercise(name: &str) -> Option<&'static ExerciseDefinition> {
    ExerciseKey::parse(name).map(definition)
}
