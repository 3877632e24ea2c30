use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(pub u64);

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkoutId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    #[default]
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            other => Err(format!("unknown workout type: {other:?}")),
        }
    }
}

/// Variant payload. The derived metric is computed once, when the workout is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detail {
    Running { cadence: f64, pace: f64 },
    Cycling { elevation_gain: f64, speed: f64 },
}

impl Detail {
    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// A logged exercise session. Fields are only reachable through accessors so
/// nothing outside `workout` can change them once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub(crate) id: WorkoutId,
    pub(crate) created_on: NaiveDate,
    pub(crate) coords: Coords,
    pub(crate) distance: f64,
    pub(crate) duration: f64,
    pub(crate) detail: Detail,
}

impl Workout {
    pub const fn id(&self) -> WorkoutId {
        self.id
    }

    pub const fn created_on(&self) -> NaiveDate {
        self.created_on
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    /// Kilometers.
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Minutes.
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn detail(&self) -> &Detail {
        &self.detail
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.detail.kind()
    }

    /// Pace (min/km) for running, speed (km/h) for cycling.
    pub const fn metric(&self) -> f64 {
        match self.detail {
            Detail::Running { pace, .. } => pace,
            Detail::Cycling { speed, .. } => speed,
        }
    }

    /// Cadence (spm) for running, elevation gain (m) for cycling.
    pub const fn secondary(&self) -> f64 {
        match self.detail {
            Detail::Running { cadence, .. } => cadence,
            Detail::Cycling { elevation_gain, .. } => elevation_gain,
        }
    }

    /// `"October 19"`.
    pub fn date_label(&self) -> String {
        self.created_on.format("%B %-d").to_string()
    }
}
