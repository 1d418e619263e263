//! Tracker - session-level bookkeeping over the state snapshot
//!
//! Every operation takes the current snapshot by reference and returns a new
//! one; persisting it is up to the caller.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

use crate::engine::apply_session_progression;
use crate::exercises::{ExerciseKey, definition};
use crate::model::{
    ApplicationState, BodyWeightEntry, ExerciseResult, FailureTally, SessionExercises, Unit,
    UserProfile, Variant, WeightTable, WorkoutSession,
};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

pub fn generate_workout_id(now: DateTime<Utc>) -> String {
    format!("workout-{}-{}", now.timestamp_millis(), random_suffix())
}

pub fn generate_body_weight_id(now: DateTime<Utc>) -> String {
    format!("bw-{}-{}", now.timestamp_millis(), random_suffix())
}

pub fn format_weight(weight: f64, unit: Unit) -> String {
    format!("{} {}", weight, unit)
}

fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        bail!("invalid weight: {}", weight);
    }
    Ok(())
}

fn validate_overrides(weights: &BTreeMap<ExerciseKey, f64>) -> Result<()> {
    for (key, weight) in weights {
        if key.is_bodyweight() {
            bail!("{} has no working weight", key.display_name());
        }
        validate_weight(*weight)?;
    }
    Ok(())
}

/// Result of finishing a workout
#[derive(Debug, Clone)]
pub struct WorkoutOutcome {
    pub state: ApplicationState,
    /// Display names of deloaded lifts
    pub deloaded: Vec<&'static str>,
}

impl ApplicationState {
    /// Onboarding: default starting weights, overridden per lift
    pub fn new(profile: UserProfile, starting_weights: &BTreeMap<ExerciseKey, f64>) -> Result<Self> {
        validate_weight(profile.body_weight)?;
        validate_overrides(starting_weights)?;
        Ok(Self {
            profile,
            current_weights: WeightTable::default().with_overrides(starting_weights),
            workout_history: Vec::new(),
            body_weight_history: Vec::new(),
            next_workout_type: Variant::A,
            failure_counts: FailureTally::new(),
        })
    }

    /// Run progression on the pre-session weights, append the session and
    /// flip the next variant
    pub fn complete_workout(&self, session: WorkoutSession) -> WorkoutOutcome {
        let outcome = apply_session_progression(
            &self.current_weights,
            &self.failure_counts,
            &session.exercises,
        );

        info!(
            "Workout {} completed ({}), deloads: {}",
            session.variant(),
            session.id,
            outcome.deloaded.len()
        );

        let mut state = self.clone();
        state.next_workout_type = session.variant().next();
        state.current_weights = outcome.weights;
        state.failure_counts = outcome.failures;
        state.workout_history.push(session);

        WorkoutOutcome {
            state,
            deloaded: outcome.deloaded,
        }
    }

    /// Append a body-weight entry; the profile mirrors the newest one
    pub fn log_body_weight(&self, weight: f64, date: DateTime<Utc>) -> Result<Self> {
        validate_weight(weight)?;
        let mut state = self.clone();
        state.body_weight_history.push(BodyWeightEntry {
            id: generate_body_weight_id(date),
            date,
            weight,
        });
        state.profile.body_weight = weight;
        Ok(state)
    }

    /// Manually override working weights
    pub fn update_weights(&self, weights: &BTreeMap<ExerciseKey, f64>) -> Result<Self> {
        validate_overrides(weights)?;
        let mut state = self.clone();
        state.current_weights = self.current_weights.with_overrides(weights);
        Ok(state)
    }

    /// Replace a logged workout in place. Weights already derived from it
    /// are not recomputed.
    pub fn update_workout(&self, workout_id: &str, updated: WorkoutSession) -> Result<Self> {
        let mut state = self.clone();
        let slot = state
            .workout_history
            .iter_mut()
            .find(|w| w.id == workout_id)
            .ok_or_else(|| anyhow!("workout not found: {}", workout_id))?;
        *slot = updated;
        Ok(state)
    }

    pub fn find_workout(&self, workout_id: &str) -> Option<&WorkoutSession> {
        self.workout_history.iter().find(|w| w.id == workout_id)
    }

    /// Correct one exercise of a logged workout. Without a new weight the
    /// logged one is kept.
    pub fn edit_exercise(
        &self,
        workout_id: &str,
        key: ExerciseKey,
        reps: Vec<u32>,
        weight: Option<f64>,
    ) -> Result<Self> {
        let mut session = self
            .find_workout(workout_id)
            .cloned()
            .ok_or_else(|| anyhow!("workout not found: {}", workout_id))?;
        let variant = session.variant();
        let slot = session
            .exercises
            .get_mut(key)
            .ok_or_else(|| anyhow!("{} is not part of workout {}", key.display_name(), variant))?;

        let weight = match weight {
            Some(_) if key.is_bodyweight() => bail!("{} has no working weight", key.display_name()),
            Some(w) => {
                validate_weight(w)?;
                w
            }
            None => slot.weight(),
        };
        *slot = ExerciseResult::new(key, weight, reps);

        info!("Workout {} edited: {}", workout_id, key.display_name());
        self.update_workout(workout_id, session)
    }
}

/// One exercise of a workout in progress
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedExercise {
    pub key: ExerciseKey,
    pub weight: f64,
    /// `None` until the set is done
    pub slots: Vec<Option<u32>>,
}

impl PlannedExercise {
    pub fn result(&self) -> ExerciseResult {
        ExerciseResult::from_slots(self.key, self.weight, &self.slots)
    }
}

/// Workout in progress, seeded from the snapshot's next variant
#[derive(Debug, Clone)]
pub struct WorkoutPlan {
    variant: Variant,
    exercises: Vec<PlannedExercise>,
}

impl WorkoutPlan {
    pub fn start(state: &ApplicationState) -> Self {
        let variant = state.next_workout_type;
        let exercises = variant
            .exercises()
            .into_iter()
            .map(|key| PlannedExercise {
                key,
                weight: state.current_weights.get(key).unwrap_or(0.0),
                slots: vec![None; definition(key).sets],
            })
            .collect();
        Self { variant, exercises }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn exercises(&self) -> &[PlannedExercise] {
        &self.exercises
    }

    fn exercise_mut(&mut self, key: ExerciseKey) -> Result<&mut PlannedExercise> {
        let variant = self.variant;
        self.exercises
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| anyhow!("{} is not part of workout {}", key.display_name(), variant))
    }

    /// Change the weight used today (does not touch the weight table)
    pub fn set_weight(&mut self, key: ExerciseKey, weight: f64) -> Result<()> {
        validate_weight(weight)?;
        if key.is_bodyweight() {
            bail!("{} has no working weight", key.display_name());
        }
        self.exercise_mut(key)?.weight = weight;
        Ok(())
    }

    pub fn record_set(&mut self, key: ExerciseKey, index: usize, reps: u32) -> Result<()> {
        let exercise = self.exercise_mut(key)?;
        let sets = exercise.slots.len();
        let slot = exercise
            .slots
            .get_mut(index)
            .ok_or_else(|| anyhow!("{} has {} sets, got set {}", key.display_name(), sets, index + 1))?;
        *slot = Some(reps);
        Ok(())
    }

    /// Fill sets in order from a reps list
    pub fn record_sets(&mut self, key: ExerciseKey, reps: &[u32]) -> Result<()> {
        for (index, &r) in reps.iter().enumerate() {
            self.record_set(key, index, r)?;
        }
        Ok(())
    }

    /// Every set of every exercise has been attempted
    pub fn is_complete(&self) -> bool {
        self.exercises
            .iter()
            .all(|e| e.slots.iter().all(Option::is_some))
    }

    fn result(&self, key: ExerciseKey) -> ExerciseResult {
        self.exercises
            .iter()
            .find(|e| e.key == key)
            .map(PlannedExercise::result)
            .unwrap_or_else(|| ExerciseResult::new(key, 0.0, Vec::new()))
    }

    /// Close the workout; unattempted sets are dropped
    pub fn finish(self, id: String, date: DateTime<Utc>) -> WorkoutSession {
        let exercises = match self.variant {
            Variant::A => SessionExercises::A {
                squat: self.result(ExerciseKey::Squat),
                bench_press: self.result(ExerciseKey::BenchPress),
                barbell_row: self.result(ExerciseKey::BarbellRow),
                pullups: self.result(ExerciseKey::Pullups),
            },
            Variant::B => SessionExercises::B {
                squat: self.result(ExerciseKey::Squat),
                overhead_press: self.result(ExerciseKey::OverheadPress),
                deadlift: self.result(ExerciseKey::Deadlift),
                pullups: self.result(ExerciseKey::Pullups),
            },
        };
        WorkoutSession { id, date, exercises }
    }
}
