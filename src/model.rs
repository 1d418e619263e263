//! Data model - workout sessions, weight table and the persisted state snapshot

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::evaluate_completion;
use crate::exercises::{ExerciseKey, definition};

/// Unit of measure for every weight in the snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Lbs,
    Kg,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Lbs => "lbs",
            Unit::Kg => "kg",
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lbs" | "lb" => Ok(Unit::Lbs),
            "kg" | "kgs" => Ok(Unit::Kg),
            _ => Err(format!("unknown unit: {} (expected lbs or kg)", s)),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Mirrors the latest body-weight entry
    pub body_weight: f64,
    pub start_date: DateTime<Utc>,
    pub unit: Unit,
}

/// One exercise as logged in a session.
///
/// `completed` is derived from `sets` and the catalog definition; there is no
/// way to set it directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseResult {
    weight: f64,
    sets: Vec<u32>,
    completed: bool,
}

impl ExerciseResult {
    /// Build a result from completed sets. Sets past the definition's count
    /// are dropped.
    pub fn new(key: ExerciseKey, weight: f64, mut sets: Vec<u32>) -> Self {
        let max_sets = definition(key).sets;
        if sets.len() > max_sets {
            tracing::warn!(
                "{} logged {} sets, keeping the first {}",
                key, sets.len(), max_sets
            );
            sets.truncate(max_sets);
        }
        let weight = if key.is_bodyweight() { 0.0 } else { weight };
        let completed = evaluate_completion(&sets, key);
        Self { weight, sets, completed }
    }

    /// Build from per-slot input where `None` means the set was not attempted
    pub fn from_slots(key: ExerciseKey, weight: f64, slots: &[Option<u32>]) -> Self {
        Self::new(key, weight, slots.iter().flatten().copied().collect())
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn sets(&self) -> &[u32] {
        &self.sets
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn total_reps(&self) -> u32 {
        self.sets.iter().sum()
    }
}

/// Workout variant (the program alternates A, B, A, ...)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    A,
    B,
}

impl Variant {
    pub fn next(&self) -> Self {
        match self {
            Variant::A => Variant::B,
            Variant::B => Variant::A,
        }
    }

    /// Exercises performed in this variant, in workout order
    pub fn exercises(&self) -> [ExerciseKey; 4] {
        match self {
            Variant::A => [
                ExerciseKey::Squat,
                ExerciseKey::BenchPress,
                ExerciseKey::BarbellRow,
                ExerciseKey::Pullups,
            ],
            Variant::B => [
                ExerciseKey::Squat,
                ExerciseKey::OverheadPress,
                ExerciseKey::Deadlift,
                ExerciseKey::Pullups,
            ],
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::A => f.write_str("A"),
            Variant::B => f.write_str("B"),
        }
    }
}

/// Exercises of a session, shaped by its variant
#[derive(Debug, Clone, PartialEq)]
pub enum SessionExercises {
    A {
        squat: ExerciseResult,
        bench_press: ExerciseResult,
        barbell_row: ExerciseResult,
        pullups: ExerciseResult,
    },
    B {
        squat: ExerciseResult,
        overhead_press: ExerciseResult,
        deadlift: ExerciseResult,
        pullups: ExerciseResult,
    },
}

impl SessionExercises {
    pub fn variant(&self) -> Variant {
        match self {
            SessionExercises::A { .. } => Variant::A,
            SessionExercises::B { .. } => Variant::B,
        }
    }

    /// All exercises in workout order
    pub fn entries(&self) -> [(ExerciseKey, &ExerciseResult); 4] {
        match self {
            SessionExercises::A { squat, bench_press, barbell_row, pullups } => [
                (ExerciseKey::Squat, squat),
                (ExerciseKey::BenchPress, bench_press),
                (ExerciseKey::BarbellRow, barbell_row),
                (ExerciseKey::Pullups, pullups),
            ],
            SessionExercises::B { squat, overhead_press, deadlift, pullups } => [
                (ExerciseKey::Squat, squat),
                (ExerciseKey::OverheadPress, overhead_press),
                (ExerciseKey::Deadlift, deadlift),
                (ExerciseKey::Pullups, pullups),
            ],
        }
    }

    pub fn get(&self, key: ExerciseKey) -> Option<&ExerciseResult> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, result)| result)
    }

    pub fn get_mut(&mut self, key: ExerciseKey) -> Option<&mut ExerciseResult> {
        match (self, key) {
            (SessionExercises::A { squat, .. } | SessionExercises::B { squat, .. }, ExerciseKey::Squat) => {
                Some(squat)
            }
            (SessionExercises::A { pullups, .. } | SessionExercises::B { pullups, .. }, ExerciseKey::Pullups) => {
                Some(pullups)
            }
            (SessionExercises::A { bench_press, .. }, ExerciseKey::BenchPress) => Some(bench_press),
            (SessionExercises::A { barbell_row, .. }, ExerciseKey::BarbellRow) => Some(barbell_row),
            (SessionExercises::B { overhead_press, .. }, ExerciseKey::OverheadPress) => Some(overhead_press),
            (SessionExercises::B { deadlift, .. }, ExerciseKey::Deadlift) => Some(deadlift),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession", into = "StoredSession")]
pub struct WorkoutSession {
    pub id: String,
    pub date: DateTime<Utc>,
    pub exercises: SessionExercises,
}

impl WorkoutSession {
    pub fn variant(&self) -> Variant {
        self.exercises.variant()
    }
}

/// On-disk session layout: `{id, date, type, exercises: {squat, benchPress?, ...}}`
#[derive(Clone, Serialize, Deserialize)]
struct StoredSession {
    id: String,
    date: DateTime<Utc>,
    #[serde(rename = "type")]
    variant: Variant,
    exercises: StoredExercises,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredExercises {
    squat: Option<StoredResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bench_press: Option<StoredResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overhead_press: Option<StoredResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    barbell_row: Option<StoredResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadlift: Option<StoredResult>,
    pullups: Option<StoredResult>,
}

#[derive(Clone, Serialize, Deserialize)]
struct StoredResult {
    weight: f64,
    sets: Vec<u32>,
    // Recomputed on load
    #[serde(default)]
    completed: bool,
}

impl StoredResult {
    fn into_result(self, key: ExerciseKey) -> ExerciseResult {
        ExerciseResult::new(key, self.weight, self.sets)
    }
}

impl From<&ExerciseResult> for StoredResult {
    fn from(result: &ExerciseResult) -> Self {
        Self {
            weight: result.weight,
            sets: result.sets.clone(),
            completed: result.completed,
        }
    }
}

fn require(
    slot: Option<StoredResult>,
    key: ExerciseKey,
    variant: Variant,
) -> Result<ExerciseResult, String> {
    slot.map(|r| r.into_result(key))
        .ok_or_else(|| format!("workout {} is missing {}", variant, key))
}

impl TryFrom<StoredSession> for WorkoutSession {
    type Error = String;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        let StoredSession { id, date, variant, exercises: ex } = stored;
        let exercises = match variant {
            Variant::A => {
                if ex.overhead_press.is_some() || ex.deadlift.is_some() {
                    return Err(format!("workout A {} contains workout B lifts", id));
                }
                SessionExercises::A {
                    squat: require(ex.squat, ExerciseKey::Squat, variant)?,
                    bench_press: require(ex.bench_press, ExerciseKey::BenchPress, variant)?,
                    barbell_row: require(ex.barbell_row, ExerciseKey::BarbellRow, variant)?,
                    pullups: require(ex.pullups, ExerciseKey::Pullups, variant)?,
                }
            }
            Variant::B => {
                if ex.bench_press.is_some() || ex.barbell_row.is_some() {
                    return Err(format!("workout B {} contains workout A lifts", id));
                }
                SessionExercises::B {
                    squat: require(ex.squat, ExerciseKey::Squat, variant)?,
                    overhead_press: require(ex.overhead_press, ExerciseKey::OverheadPress, variant)?,
                    deadlift: require(ex.deadlift, ExerciseKey::Deadlift, variant)?,
                    pullups: require(ex.pullups, ExerciseKey::Pullups, variant)?,
                }
            }
        };
        Ok(Self { id, date, exercises })
    }
}

impl From<WorkoutSession> for StoredSession {
    fn from(session: WorkoutSession) -> Self {
        let mut stored = StoredExercises::default();
        for (key, result) in session.exercises.entries() {
            let slot = Some(StoredResult::from(result));
            match key {
                ExerciseKey::Squat => stored.squat = slot,
                ExerciseKey::BenchPress => stored.bench_press = slot,
                ExerciseKey::OverheadPress => stored.overhead_press = slot,
                ExerciseKey::BarbellRow => stored.barbell_row = slot,
                ExerciseKey::Deadlift => stored.deadlift = slot,
                ExerciseKey::Pullups => stored.pullups = slot,
            }
        }
        Self {
            variant: session.variant(),
            id: session.id,
            date: session.date,
            exercises: stored,
        }
    }
}

/// Current working weight per barbell lift
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightTable {
    pub squat: f64,
    pub bench_press: f64,
    pub overhead_press: f64,
    pub barbell_row: f64,
    pub deadlift: f64,
}

impl Default for WeightTable {
    /// Empty-bar starting weights
    fn default() -> Self {
        Self {
            squat: 45.0,
            bench_press: 45.0,
            overhead_press: 45.0,
            barbell_row: 65.0,
            deadlift: 95.0,
        }
    }
}

impl WeightTable {
    /// Working weight for a lift; `None` for pull-ups
    pub fn get(&self, key: ExerciseKey) -> Option<f64> {
        match key {
            ExerciseKey::Squat => Some(self.squat),
            ExerciseKey::BenchPress => Some(self.bench_press),
            ExerciseKey::OverheadPress => Some(self.overhead_press),
            ExerciseKey::BarbellRow => Some(self.barbell_row),
            ExerciseKey::Deadlift => Some(self.deadlift),
            ExerciseKey::Pullups => None,
        }
    }

    /// Set a lift's working weight. Pull-ups have no slot and are ignored.
    pub fn set(&mut self, key: ExerciseKey, weight: f64) {
        match key {
            ExerciseKey::Squat => self.squat = weight,
            ExerciseKey::BenchPress => self.bench_press = weight,
            ExerciseKey::OverheadPress => self.overhead_press = weight,
            ExerciseKey::BarbellRow => self.barbell_row = weight,
            ExerciseKey::Deadlift => self.deadlift = weight,
            ExerciseKey::Pullups => {}
        }
    }

    /// Copy with the given lifts overridden
    pub fn with_overrides(&self, overrides: &BTreeMap<ExerciseKey, f64>) -> Self {
        let mut table = *self;
        for (key, weight) in overrides {
            table.set(*key, *weight);
        }
        table
    }
}

/// Consecutive failed sessions per lift
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FailureTally(BTreeMap<ExerciseKey, u32>);

impl FailureTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for a lift, 0 if never failed
    pub fn get(&self, key: ExerciseKey) -> u32 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    pub fn reset(&mut self, key: ExerciseKey) {
        self.0.insert(key, 0);
    }

    pub fn increment(&mut self, key: ExerciseKey) {
        let count = self.0.entry(key).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExerciseKey, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyWeightEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub weight: f64,
}

/// The single persisted snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub profile: UserProfile,
    pub current_weights: WeightTable,
    pub workout_history: Vec<WorkoutSession>,
    #[serde(default)]
    pub body_weight_history: Vec<BodyWeightEntry>,
    pub next_workout_type: Variant,
    #[serde(default)]
    pub failure_counts: FailureTally,
}
