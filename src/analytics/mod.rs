//! Analytics module - read-only views over workout history
//!
//! Everything here is recomputed from the stored history on demand:
//! - Workout streak (rest days allowed)
//! - Total lifted volume
//! - Per-exercise weight and rep series for progress charts
//! - Body-weight trend summary

pub mod body_weight;

pub use body_weight::BodyWeightSummary;

use chrono::{DateTime, Utc};

use crate::exercises::ExerciseKey;
use crate::model::WorkoutSession;

/// Longest gap, in whole days, that keeps a streak alive
pub const MAX_STREAK_GAP_DAYS: i64 = 3;

/// Point on a progress chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint<T> {
    pub date: DateTime<Utc>,
    pub value: T,
}

/// Workout history analytics
pub struct Analytics<'a> {
    sessions: &'a [WorkoutSession],
}

impl<'a> Analytics<'a> {
    pub fn new(sessions: &'a [WorkoutSession]) -> Self {
        Self { sessions }
    }

    pub fn total_workouts(&self) -> usize {
        self.sessions.len()
    }

    /// Number of consecutive recent sessions, each no more than
    /// [`MAX_STREAK_GAP_DAYS`] after the one before it
    pub fn streak(&self) -> u32 {
        let mut dates: Vec<DateTime<Utc>> = self.sessions.iter().map(|s| s.date).collect();
        dates.sort_by(|a, b| b.cmp(a));

        let Some(&most_recent) = dates.first() else {
            return 0;
        };

        let mut streak = 1;
        let mut last = most_recent;
        for &date in &dates[1..] {
            if (last - date).num_days() > MAX_STREAK_GAP_DAYS {
                break;
            }
            streak += 1;
            last = date;
        }
        streak
    }

    /// Sum of weight x reps over every barbell lift ever logged
    pub fn total_volume(&self) -> f64 {
        self.sessions
            .iter()
            .flat_map(|s| s.exercises.entries())
            .filter(|(key, _)| !key.is_bodyweight())
            .map(|(_, result)| result.weight() * result.total_reps() as f64)
            .sum()
    }

    /// Weight used for `key` in every session that contains it, oldest first
    pub fn weight_series(&self, key: ExerciseKey) -> Vec<SeriesPoint<f64>> {
        self.series(key, |result| result.weight())
    }

    /// Total reps for `key` per session, oldest first (pull-up progress)
    pub fn reps_series(&self, key: ExerciseKey) -> Vec<SeriesPoint<u32>> {
        self.series(key, |result| result.total_reps())
    }

    fn series<T>(
        &self,
        key: ExerciseKey,
        value: impl Fn(&crate::model::ExerciseResult) -> T,
    ) -> Vec<SeriesPoint<T>> {
        let mut points: Vec<_> = self
            .sessions
            .iter()
            .filter_map(|s| {
                s.exercises.get(key).map(|result| SeriesPoint {
                    date: s.date,
                    value: value(result),
                })
            })
            .collect();
        points.sort_by_key(|p| p.date);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExerciseResult, SessionExercises};
    use chrono::Duration;

    fn session_a_days_ago(squat_weight: f64, days_ago: i64) -> WorkoutSession {
        WorkoutSession {
            id: format!("workout-a-{}", days_ago),
            date: Utc::now() - Duration::days(days_ago),
            exercises: SessionExercises::A {
                squat: ExerciseResult::new(ExerciseKey::Squat, squat_weight, vec![5, 5, 5, 5, 5]),
                bench_press: ExerciseResult::new(ExerciseKey::BenchPress, 0.0, vec![]),
                barbell_row: ExerciseResult::new(ExerciseKey::BarbellRow, 0.0, vec![]),
                pullups: ExerciseResult::new(ExerciseKey::Pullups, 0.0, vec![8, 6, 4]),
            },
        }
    }

    fn session_b_days_ago(deadlift_weight: f64, days_ago: i64) -> WorkoutSession {
        WorkoutSession {
            id: format!("workout-b-{}", days_ago),
            date: Utc::now() - Duration::days(days_ago),
            exercises: SessionExercises::B {
                squat: ExerciseResult::new(ExerciseKey::Squat, 100.0, vec![5, 5, 5, 5, 5]),
                overhead_press: ExerciseResult::new(ExerciseKey::OverheadPress, 60.0, vec![5, 5, 5, 5, 3]),
                deadlift: ExerciseResult::new(ExerciseKey::Deadlift, deadlift_weight, vec![5]),
                pullups: ExerciseResult::new(ExerciseKey::Pullups, 0.0, vec![3, 2, 1]),
            },
        }
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(Analytics::new(&[]).streak(), 0);
    }

    #[test]
    fn test_streak_single_session() {
        let sessions = vec![session_a_days_ago(100.0, 30)];
        assert_eq!(Analytics::new(&sessions).streak(), 1);
    }

    #[test]
    fn test_streak_two_days_apart() {
        let sessions = vec![session_a_days_ago(100.0, 2), session_b_days_ago(95.0, 0)];
        assert_eq!(Analytics::new(&sessions).streak(), 2);
    }

    #[test]
    fn test_streak_four_days_apart() {
        let sessions = vec![session_a_days_ago(100.0, 4), session_b_days_ago(95.0, 0)];
        assert_eq!(Analytics::new(&sessions).streak(), 1);
    }

    #[test]
    fn test_streak_exactly_three_days_counts() {
        let sessions = vec![session_a_days_ago(100.0, 3), session_b_days_ago(95.0, 0)];
        assert_eq!(Analytics::new(&sessions).streak(), 2);
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        // Stored out of order on purpose
        let sessions = vec![
            session_a_days_ago(100.0, 2),
            session_a_days_ago(100.0, 20),
            session_b_days_ago(95.0, 0),
            session_b_days_ago(95.0, 4),
            session_a_days_ago(100.0, 22),
        ];
        assert_eq!(Analytics::new(&sessions).streak(), 3);
    }

    #[test]
    fn test_total_volume_excludes_pullups() {
        let sessions = vec![session_a_days_ago(100.0, 0)];
        assert_eq!(Analytics::new(&sessions).total_volume(), 2500.0);
    }

    #[test]
    fn test_total_volume_multiple_sessions() {
        let sessions = vec![session_a_days_ago(100.0, 2), session_b_days_ago(200.0, 0)];
        // 2500 + (100*25 + 60*23 + 200*5)
        assert_eq!(Analytics::new(&sessions).total_volume(), 2500.0 + 2500.0 + 1380.0 + 1000.0);
    }

    #[test]
    fn test_total_volume_empty() {
        assert_eq!(Analytics::new(&[]).total_volume(), 0.0);
    }

    #[test]
    fn test_weight_series_sorted_and_filtered() {
        let sessions = vec![
            session_b_days_ago(135.0, 0),
            session_a_days_ago(105.0, 2),
            session_b_days_ago(125.0, 4),
            session_a_days_ago(95.0, 6),
        ];
        let analytics = Analytics::new(&sessions);

        let deadlift: Vec<f64> = analytics
            .weight_series(ExerciseKey::Deadlift)
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(deadlift, vec![125.0, 135.0]);

        let squat = analytics.weight_series(ExerciseKey::Squat);
        assert_eq!(squat.len(), 4);
        assert!(squat.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(squat[0].value, 95.0);

        assert!(analytics.weight_series(ExerciseKey::BenchPress).len() == 2);
    }

    #[test]
    fn test_reps_series_pullups() {
        let sessions = vec![session_b_days_ago(135.0, 0), session_a_days_ago(100.0, 2)];
        let reps: Vec<u32> = Analytics::new(&sessions)
            .reps_series(ExerciseKey::Pullups)
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(reps, vec![18, 6]);
    }
}
