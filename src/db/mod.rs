//! Database module - SQLite storage for the application state snapshot

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{info, warn};

use crate::model::ApplicationState;

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        // Single row: the whole snapshot as JSON
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS app_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Load the snapshot. Missing or unreadable data counts as no state.
    pub fn load_state(&self) -> Result<Option<ApplicationState>> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM app_state WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        let Some(data) = data else {
            return Ok(None);
        };

        match serde_json::from_str(&data) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!("Stored state is unreadable, ignoring it: {}", e);
                Ok(None)
            }
        }
    }

    /// Replace the stored snapshot
    pub fn save_state(&self, state: &ApplicationState) -> Result<()> {
        let data = serde_json::to_string(state).context("Failed to serialize state")?;
        self.conn.execute(
            "INSERT INTO app_state (id, data, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
            params![data, Utc::now().to_rfc3339()],
        )?;
        info!(
            "State saved ({} workouts, {} body-weight entries)",
            state.workout_history.len(),
            state.body_weight_history.len()
        );
        Ok(())
    }

    /// Full reset
    pub fn clear_state(&self) -> Result<()> {
        self.conn.execute("DELETE FROM app_state", [])?;
        info!("State cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::ExerciseKey;
    use crate::model::{ExerciseResult, SessionExercises, Unit, UserProfile, WorkoutSession};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn sample_state() -> ApplicationState {
        let profile = UserProfile {
            body_weight: 82.5,
            start_date: Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap(),
            unit: Unit::Kg,
        };
        let state = ApplicationState::new(profile, &BTreeMap::from([(ExerciseKey::Squat, 60.0)]))
            .unwrap();
        let session = WorkoutSession {
            id: "workout-1714548600000-abc123xyz".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            exercises: SessionExercises::A {
                squat: ExerciseResult::new(ExerciseKey::Squat, 60.0, vec![5, 5, 5, 5, 5]),
                bench_press: ExerciseResult::new(ExerciseKey::BenchPress, 45.0, vec![5, 5, 4, 4, 3]),
                barbell_row: ExerciseResult::new(ExerciseKey::BarbellRow, 65.0, vec![5, 5, 5, 5, 5]),
                pullups: ExerciseResult::new(ExerciseKey::Pullups, 0.0, vec![6, 4, 0]),
            },
        };
        state
            .complete_workout(session)
            .state
            .log_body_weight(82.0, Utc.with_ymd_and_hms(2024, 5, 2, 7, 0, 0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_empty_database_has_no_state() {
        let db = Database::open(":memory:").unwrap();
        assert!(db.load_state().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let db = Database::open(":memory:").unwrap();
        let state = sample_state();
        db.save_state(&state).unwrap();

        let loaded = db.load_state().unwrap().unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.failure_counts.get(ExerciseKey::BenchPress), 1);
    }

    #[test]
    fn test_save_overwrites() {
        let db = Database::open(":memory:").unwrap();
        let state = sample_state();
        db.save_state(&state).unwrap();

        let updated = state.log_body_weight(81.0, Utc::now()).unwrap();
        db.save_state(&updated).unwrap();

        let loaded = db.load_state().unwrap().unwrap();
        assert_eq!(loaded.body_weight_history.len(), 2);
        assert_eq!(loaded.profile.body_weight, 81.0);
    }

    #[test]
    fn test_clear_state() {
        let db = Database::open(":memory:").unwrap();
        db.save_state(&sample_state()).unwrap();
        db.clear_state().unwrap();
        assert!(db.load_state().unwrap().is_none());
    }

    #[test]
    fn test_unreadable_state_is_ignored() {
        let db = Database::open(":memory:").unwrap();
        db.conn
            .execute(
                "INSERT INTO app_state (id, data, updated_at) VALUES (1, '{not json', '')",
                [],
            )
            .unwrap();
        assert!(db.load_state().unwrap().is_none());
    }
}
