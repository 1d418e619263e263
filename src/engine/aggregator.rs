//! Apply the progression rules to every lift of a finished workout

use tracing::{debug, info};

use crate::engine::calculator::compute_next_weight;
use crate::model::{FailureTally, SessionExercises, WeightTable};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionOutcome {
    pub weights: WeightTable,
    pub failures: FailureTally,
    /// Display names of lifts that were deloaded, in workout order
    pub deloaded: Vec<&'static str>,
}

/// Compute the weight table and failure tally that follow `session`.
///
/// Each lift is evaluated against its pre-session weight and failure count,
/// independently of the others. Pull-ups take no part. Inputs are left
/// untouched; lifts not in the session keep their weight and count.
pub fn apply_session_progression(
    weights: &WeightTable,
    failures: &FailureTally,
    session: &SessionExercises,
) -> ProgressionOutcome {
    let mut next_weights = *weights;
    let mut next_failures = failures.clone();
    let mut deloaded = Vec::new();

    for (key, result) in session.entries() {
        let Some(current) = weights.get(key) else {
            continue;
        };

        let success = result.completed();
        let prior = failures.get(key);
        let next = compute_next_weight(current, key, success, prior);

        debug!(
            "{}: {} -> {} (success: {}, prior failures: {})",
            key, current, next.weight, success, prior
        );

        next_weights.set(key, next.weight);
        if success {
            next_failures.reset(key);
        } else {
            next_failures.increment(key);
        }
        if next.deloaded {
            info!("Deload applied to {}: {} -> {}", key, current, next.weight);
            deloaded.push(key.display_name());
        }
    }

    ProgressionOutcome {
        weights: next_weights,
        failures: next_failures,
        deloaded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::ExerciseKey;
    use crate::model::ExerciseResult;

    fn workout_a(squat: Vec<u32>, bench: Vec<u32>, row: Vec<u32>, weights: &WeightTable) -> SessionExercises {
        SessionExercises::A {
            squat: ExerciseResult::new(ExerciseKey::Squat, weights.squat, squat),
            bench_press: ExerciseResult::new(ExerciseKey::BenchPress, weights.bench_press, bench),
            barbell_row: ExerciseResult::new(ExerciseKey::BarbellRow, weights.barbell_row, row),
            pullups: ExerciseResult::new(ExerciseKey::Pullups, 0.0, vec![5, 4, 3]),
        }
    }

    fn workout_b(squat: Vec<u32>, press: Vec<u32>, deadlift: Vec<u32>, weights: &WeightTable) -> SessionExercises {
        SessionExercises::B {
            squat: ExerciseResult::new(ExerciseKey::Squat, weights.squat, squat),
            overhead_press: ExerciseResult::new(ExerciseKey::OverheadPress, weights.overhead_press, press),
            deadlift: ExerciseResult::new(ExerciseKey::Deadlift, weights.deadlift, deadlift),
            pullups: ExerciseResult::new(ExerciseKey::Pullups, 0.0, vec![2, 2, 1]),
        }
    }

    fn full() -> Vec<u32> {
        vec![5, 5, 5, 5, 5]
    }

    fn one_short() -> Vec<u32> {
        vec![5, 5, 5, 5, 4]
    }

    #[test]
    fn test_all_success_increments() {
        let weights = WeightTable::default();
        let session = workout_a(full(), full(), full(), &weights);
        let outcome = apply_session_progression(&weights, &FailureTally::new(), &session);

        assert_eq!(outcome.weights.squat, 50.0);
        assert_eq!(outcome.weights.bench_press, 50.0);
        assert_eq!(outcome.weights.barbell_row, 70.0);
        // Not in workout A
        assert_eq!(outcome.weights.overhead_press, 45.0);
        assert_eq!(outcome.weights.deadlift, 95.0);
        assert!(outcome.deloaded.is_empty());
        assert_eq!(outcome.failures.get(ExerciseKey::Squat), 0);
    }

    #[test]
    fn test_failure_increments_tally_and_holds_weight() {
        let weights = WeightTable { squat: 100.0, ..WeightTable::default() };
        let session = workout_a(one_short(), full(), full(), &weights);
        let outcome = apply_session_progression(&weights, &FailureTally::new(), &session);

        assert_eq!(outcome.weights.squat, 100.0);
        assert_eq!(outcome.failures.get(ExerciseKey::Squat), 1);
        assert_eq!(outcome.failures.get(ExerciseKey::BenchPress), 0);
    }

    #[test]
    fn test_success_resets_tally() {
        let weights = WeightTable { squat: 100.0, ..WeightTable::default() };
        let mut failures = FailureTally::new();
        failures.increment(ExerciseKey::Squat);
        failures.increment(ExerciseKey::Squat);

        let session = workout_a(full(), full(), full(), &weights);
        let outcome = apply_session_progression(&weights, &failures, &session);

        assert_eq!(outcome.weights.squat, 105.0);
        assert_eq!(outcome.failures.get(ExerciseKey::Squat), 0);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let weights = WeightTable::default();
        let failures = FailureTally::new();
        let session = workout_a(one_short(), full(), full(), &weights);
        let _ = apply_session_progression(&weights, &failures, &session);

        assert_eq!(weights, WeightTable::default());
        assert_eq!(failures, FailureTally::new());
    }

    #[test]
    fn test_other_variant_counts_preserved() {
        let weights = WeightTable::default();
        let mut failures = FailureTally::new();
        failures.increment(ExerciseKey::Deadlift);

        let session = workout_a(full(), full(), full(), &weights);
        let outcome = apply_session_progression(&weights, &failures, &session);
        assert_eq!(outcome.failures.get(ExerciseKey::Deadlift), 1);
    }

    #[test]
    fn test_three_failures_deload_with_display_names() {
        let mut weights = WeightTable {
            squat: 200.0,
            overhead_press: 100.0,
            deadlift: 300.0,
            ..WeightTable::default()
        };
        let mut failures = FailureTally::new();

        for round in 1..=3 {
            let session = workout_b(one_short(), vec![5, 5, 3, 2, 1], vec![4], &weights);
            let outcome = apply_session_progression(&weights, &failures, &session);
            weights = outcome.weights;
            failures = outcome.failures;

            if round < 3 {
                assert!(outcome.deloaded.is_empty(), "round {}", round);
                assert_eq!(weights.squat, 200.0);
            } else {
                assert_eq!(outcome.deloaded, vec!["Squat", "Overhead Press", "Deadlift"]);
            }
        }

        assert_eq!(weights.squat, 180.0);
        assert_eq!(weights.overhead_press, 90.0);
        assert_eq!(weights.deadlift, 270.0);
        assert_eq!(failures.get(ExerciseKey::Squat), 3);
    }

    #[test]
    fn test_squat_at_floor_reports_deload() {
        let mut weights = WeightTable::default();
        let mut failures = FailureTally::new();
        let mut history = Vec::new();

        for _ in 0..3 {
            let session = workout_a(one_short(), full(), full(), &weights);
            let outcome = apply_session_progression(&weights, &failures, &session);
            history.push((outcome.weights.squat, outcome.deloaded.contains(&"Squat")));
            weights = outcome.weights;
            failures = outcome.failures;
        }

        assert_eq!(history, vec![(45.0, false), (45.0, false), (45.0, true)]);
    }

    #[test]
    fn test_pullups_ignored() {
        let weights = WeightTable::default();
        let session = workout_a(full(), full(), full(), &weights);
        let outcome = apply_session_progression(&weights, &FailureTally::new(), &session);
        assert_eq!(outcome.failures.get(ExerciseKey::Pullups), 0);
        assert!(outcome.failures.iter().all(|(key, _)| key != ExerciseKey::Pullups));
    }
}
