use crate::config::{DEFAULT_RESTORE_DELAY_MS, DEFAULT_STORAGE_KEY, DEFAULT_ZOOM};
use crate::types::WorkoutKind;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_STORE_PATH: &str = "trailmark.json";

#[derive(Parser, Debug)]
#[command(
    name = "trailmark",
    about = "Log running and cycling workouts on a map from the terminal"
)]
pub struct Cli {
    /// JSON file holding saved workouts.
    #[arg(long, env = "TRAILMARK_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Key the workouts are saved under inside the store file.
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub key: String,

    /// Current latitude. Without --lat/--lng no map is loaded until `locate`.
    #[arg(long, env = "TRAILMARK_LAT", requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Current longitude.
    #[arg(long, env = "TRAILMARK_LNG", requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Map zoom level.
    #[arg(long, env = "TRAILMARK_ZOOM", default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Delay before a hidden form gets its layout back, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_RESTORE_DELAY_MS)]
    pub restore_delay_ms: u64,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub cmd: ReplCmd,
}

#[derive(Subcommand, Debug)]
pub enum ReplCmd {
    /// Click the map at LAT LNG
    Click {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },
    /// Pick the workout type in the form
    Type { kind: WorkoutKind },
    /// Type VALUE into a form input (distance, duration, cadence, elevation)
    Set { field: String, value: String },
    /// Submit the form
    Submit,
    /// Click the list entry with this id
    Select { id: String },
    /// Provide a position and retry loading the map
    Locate {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },
    /// Print every logged workout
    List,
    /// Leave
    #[command(alias = "exit")]
    Quit,
}
