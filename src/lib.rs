//! fivebyfive - Personal 5x5 strength training tracker
//!
//! Alternating A/B barbell workouts with automatic weight progression

pub mod analytics;
pub mod db;
pub mod engine;
pub mod exercises;
pub mod model;
pub mod tracker;

pub use db::Database;
pub use model::ApplicationState;
