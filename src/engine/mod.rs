//! Progression engine - pure rules for the 5x5 program
//!
//! - Completion evaluation per exercise
//! - Next-weight calculation with deloads after repeated failure
//! - Session aggregation across all lifts of a workout

pub mod aggregator;
pub mod calculator;
pub mod completion;

pub use aggregator::{ProgressionOutcome, apply_session_progression};
pub use calculator::{NextWeight, compute_next_weight};
pub use completion::{evaluate_completion, evaluate_completion_by_name};
