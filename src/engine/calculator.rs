//! Next working weight for a lift

use crate::exercises::{ExerciseKey, ExerciseKind, definition};

/// Fraction removed from the working weight on deload
pub const DELOAD_PERCENTAGE: f64 = 0.10;

/// Consecutive failed sessions that trigger a deload
pub const MAX_FAILURES_BEFORE_DELOAD: u32 = 3;

/// Deloaded weights are rounded down to a multiple of this
pub const PLATE_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextWeight {
    pub weight: f64,
    pub deloaded: bool,
}

impl NextWeight {
    fn unchanged(weight: f64) -> Self {
        Self { weight, deloaded: false }
    }
}

/// Decide the working weight for the next session.
///
/// `prior_failures` is the consecutive-failure count *before* this session.
/// A failed session that makes it the third in a row deloads the lift.
pub fn compute_next_weight(
    current_weight: f64,
    key: ExerciseKey,
    success: bool,
    prior_failures: u32,
) -> NextWeight {
    let def = definition(key);
    let (increment, floor) = match def.kind {
        ExerciseKind::Bodyweight => return NextWeight::unchanged(current_weight),
        ExerciseKind::Weighted { increment, floor } => (increment, floor),
    };

    if success {
        return NextWeight {
            weight: current_weight + increment,
            deloaded: false,
        };
    }

    if prior_failures.saturating_add(1) >= MAX_FAILURES_BEFORE_DELOAD {
        let reduced = current_weight * (1.0 - DELOAD_PERCENTAGE);
        let rounded = (reduced / PLATE_STEP).floor() * PLATE_STEP;
        return NextWeight {
            weight: rounded.max(floor),
            deloaded: true,
        };
    }

    NextWeight::unchanged(current_weight)
}
