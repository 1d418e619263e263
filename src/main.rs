//! fivebyfive - Personal 5x5 strength training tracker

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};

use fivebyfive::analytics::{Analytics, BodyWeightSummary};
use fivebyfive::db::Database;
use fivebyfive::exercises::{ExerciseKey, definition, weighted_lifts};
use fivebyfive::model::{ApplicationState, Unit, UserProfile};
use fivebyfive::tracker::{WorkoutPlan, format_weight, generate_workout_id};

#[derive(Parser)]
#[command(name = "fivebyfive")]
#[command(author, version, about = "Personal 5x5 strength training tracker")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "FIVEBYFIVE_DB", default_value = "fivebyfive.db")]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a training profile
    Init {
        /// Current body weight
        body_weight: f64,

        /// Unit of measure (lbs or kg)
        #[arg(short, long, default_value = "lbs")]
        unit: Unit,

        /// Starting weights, e.g. `-w squat=95 -w deadlift=135`
        #[arg(short, long = "weight", value_parser = parse_weight_override)]
        weights: Vec<(ExerciseKey, f64)>,

        /// Replace an existing profile
        #[arg(long)]
        force: bool,
    },

    /// Show the next workout and its target weights
    Next,

    /// Log the next workout
    Log {
        /// Squat reps per set, e.g. `5,5,5,5,4`
        #[arg(long, value_delimiter = ',')]
        squat: Vec<u32>,

        #[arg(long, value_delimiter = ',')]
        bench: Vec<u32>,

        #[arg(long, value_delimiter = ',')]
        row: Vec<u32>,

        #[arg(long, value_delimiter = ',')]
        ohp: Vec<u32>,

        #[arg(long, value_delimiter = ',')]
        deadlift: Vec<u32>,

        #[arg(long, value_delimiter = ',')]
        pullups: Vec<u32>,

        /// Weight actually used today, e.g. `-w squat=100`
        #[arg(short, long = "weight", value_parser = parse_weight_override)]
        weights: Vec<(ExerciseKey, f64)>,

        /// Save even if some sets were not attempted
        #[arg(long)]
        partial: bool,
    },

    /// Log body weight
    Weigh {
        weight: f64,
    },

    /// List workout history
    History {
        /// Number of workouts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show training statistics
    Stats {
        /// Show the progress series for one exercise
        exercise: Option<ExerciseKey>,
    },

    /// Correct one exercise of a logged workout (working weights are not recomputed)
    Edit {
        /// Workout id, as shown by `history`
        id: String,

        exercise: ExerciseKey,

        /// Reps per set, e.g. `5,5,5,4,4`
        #[arg(value_delimiter = ',', required = true)]
        reps: Vec<u32>,

        /// Weight used, if different from the logged one
        #[arg(short, long)]
        weight: Option<f64>,
    },

    /// Manually set a working weight
    SetWeight {
        exercise: ExerciseKey,
        weight: f64,
    },

    /// Delete all data
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

fn parse_weight_override(s: &str) -> Result<(ExerciseKey, f64), String> {
    let (name, weight) = s
        .split_once('=')
        .ok_or_else(|| format!("expected EXERCISE=WEIGHT, got {}", s))?;
    let key: ExerciseKey = name.parse()?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight: {}", weight))?;
    Ok((key, weight))
}

fn load_state(db: &Database) -> Result<ApplicationState> {
    db.load_state()?
        .context("No training profile yet. Run `fivebyfive init <body weight>` first")
}

fn print_next(state: &ApplicationState) {
    let variant = state.next_workout_type;
    let unit = state.profile.unit;
    println!("Next: Workout {}", variant);
    println!("{:-<48}", "");
    for key in variant.exercises() {
        let def = definition(key);
        let target = if key.is_bodyweight() {
            format!("{} sets to failure", def.sets)
        } else {
            format!("{}x{}", def.sets, def.target_reps)
        };
        let weight = state
            .current_weights
            .get(key)
            .map(|w| format_weight(w, unit))
            .unwrap_or_else(|| "bodyweight".to_string());
        let failures = state.failure_counts.get(key);
        let note = if failures > 0 {
            format!(" (failed {}x)", failures)
        } else {
            String::new()
        };
        println!("{:16} | {:18} | {}{}", def.display_name, target, weight, note);
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let db = Database::open(&cli.db)?;

    match cli.command {
        Some(Commands::Init { body_weight, unit, weights, force }) => {
            if !force && db.load_state()?.is_some() {
                bail!("A profile already exists. Use --force to start over");
            }
            let profile = UserProfile {
                body_weight,
                start_date: Utc::now(),
                unit,
            };
            let starting: BTreeMap<_, _> = weights.into_iter().collect();
            let state = ApplicationState::new(profile, &starting)?;
            db.save_state(&state)?;
            println!("Profile created. Let's lift!");
            print_next(&state);
        }

        Some(Commands::Next) | None => {
            let state = load_state(&db)?;
            print_next(&state);
        }

        Some(Commands::Log { squat, bench, row, ohp, deadlift, pullups, weights, partial }) => {
            let state = load_state(&db)?;
            let mut plan = WorkoutPlan::start(&state);

            let logged = [
                (ExerciseKey::Squat, squat),
                (ExerciseKey::BenchPress, bench),
                (ExerciseKey::BarbellRow, row),
                (ExerciseKey::OverheadPress, ohp),
                (ExerciseKey::Deadlift, deadlift),
                (ExerciseKey::Pullups, pullups),
            ];
            for (key, reps) in logged.iter().filter(|(_, reps)| !reps.is_empty()) {
                plan.record_sets(*key, reps)?;
            }
            for (key, weight) in weights {
                plan.set_weight(key, weight)?;
            }

            if !plan.is_complete() && !partial {
                bail!(
                    "Workout {} is not finished. Log every set or pass --partial",
                    plan.variant()
                );
            }

            let now = Utc::now();
            let session = plan.finish(generate_workout_id(now), now);
            for (key, result) in session.exercises.entries() {
                let mark = if result.completed() { "done" } else { "missed" };
                println!("{:16} | {:?} | {}", key.display_name(), result.sets(), mark);
            }

            let outcome = state.complete_workout(session);
            db.save_state(&outcome.state)?;

            if !outcome.deloaded.is_empty() {
                println!("Deload applied for: {}", outcome.deloaded.join(", "));
            }
            println!();
            print_next(&outcome.state);
        }

        Some(Commands::Weigh { weight }) => {
            let state = load_state(&db)?.log_body_weight(weight, Utc::now())?;
            db.save_state(&state)?;
            println!("Logged: {}", format_weight(weight, state.profile.unit));
            if let Some(summary) = BodyWeightSummary::from_entries(&state.body_weight_history) {
                println!("Trend: {}", summary.format(state.profile.unit.as_str()));
            }
        }

        Some(Commands::History { limit }) => {
            let state = load_state(&db)?;
            let unit = state.profile.unit;
            let mut sessions: Vec<_> = state.workout_history.iter().collect();
            sessions.sort_by(|a, b| b.date.cmp(&a.date));

            println!("Recent workouts:");
            println!("{:-<60}", "");
            for session in sessions.into_iter().take(limit) {
                println!(
                    "{} | Workout {} | {}",
                    session.date.format("%Y-%m-%d %H:%M"),
                    session.variant(),
                    session.id
                );
                for (key, result) in session.exercises.entries() {
                    let weight = if key.is_bodyweight() {
                        "bodyweight".to_string()
                    } else {
                        format_weight(result.weight(), unit)
                    };
                    let reps: Vec<String> = result.sets().iter().map(u32::to_string).collect();
                    let mark = if result.completed() { "+" } else { "-" };
                    println!("  {} {:16} {:12} {}", mark, key.display_name(), weight, reps.join("/"));
                }
            }
        }

        Some(Commands::Stats { exercise }) => {
            let state = load_state(&db)?;
            let unit = state.profile.unit;
            let analytics = Analytics::new(&state.workout_history);

            println!("Training Statistics");
            println!("{:-<40}", "");

            if let Some(key) = exercise {
                println!("Exercise: {}", key.display_name());
                if key.is_bodyweight() {
                    for point in analytics.reps_series(key) {
                        println!("{} | {} reps", point.date.format("%Y-%m-%d"), point.value);
                    }
                } else {
                    for point in analytics.weight_series(key) {
                        println!("{} | {}", point.date.format("%Y-%m-%d"), format_weight(point.value, unit));
                    }
                }
            } else {
                println!("Workouts: {}", analytics.total_workouts());
                println!("Streak: {}", analytics.streak());
                println!("Total volume: {}", format_weight(analytics.total_volume(), unit));
                for &key in weighted_lifts() {
                    if let Some(weight) = state.current_weights.get(key) {
                        println!("{:16} {}", key.display_name(), format_weight(weight, unit));
                    }
                }
                match BodyWeightSummary::from_entries(&state.body_weight_history) {
                    Some(summary) => println!("Body weight: {}", summary.format(unit.as_str())),
                    None => println!("Body weight: {}", format_weight(state.profile.body_weight, unit)),
                }
            }
        }

        Some(Commands::Edit { id, exercise, reps, weight }) => {
            let state = load_state(&db)?.edit_exercise(&id, exercise, reps, weight)?;
            db.save_state(&state)?;
            if let Some(result) = state.find_workout(&id).and_then(|w| w.exercises.get(exercise)) {
                let mark = if result.completed() { "done" } else { "missed" };
                println!("{:16} | {:?} | {}", exercise.display_name(), result.sets(), mark);
            }
        }

        Some(Commands::SetWeight { exercise, weight }) => {
            let state = load_state(&db)?
                .update_weights(&BTreeMap::from([(exercise, weight)]))?;
            db.save_state(&state)?;
            println!("{} set to {}", exercise.display_name(), format_weight(weight, state.profile.unit));
        }

        Some(Commands::Reset { yes }) => {
            if !yes {
                bail!("This deletes every workout and body-weight entry. Pass --yes to confirm");
            }
            db.clear_state()?;
            println!("All data deleted.");
        }
    }

    Ok(())
}
