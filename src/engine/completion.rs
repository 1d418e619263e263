//! Pass/fail for a single exercise

use crate::exercises::{ExerciseKey, ExerciseKind, definition, find_exercise};

/// True when every set was recorded and, for barbell lifts, every set hit
/// the target reps. One short set fails the whole exercise.
pub fn evaluate_completion(sets: &[u32], key: ExerciseKey) -> bool {
    let def = definition(key);
    if sets.len() != def.sets {
        return false;
    }
    match def.kind {
        ExerciseKind::Bodyweight => true,
        ExerciseKind::Weighted { .. } => sets.iter().all(|&reps| reps >= def.target_reps),
    }
}

/// Same as [`evaluate_completion`] for free-form names; unknown names fail
pub fn evaluate_completion_by_name(sets: &[u32], name: &str) -> bool {
    find_exercise(name)
        .map(|def| evaluate_completion(sets, def.key))
        .unwrap_or(false)
}
