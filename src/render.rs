//! Turn a workout into what the map and the list need to draw it.

use crate::surface::PopupOptions;
use crate::types::{Coords, Detail, Workout, WorkoutId, WorkoutKind};
use crate::utils::format_value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub coords: Coords,
    pub popup: PopupOptions,
    pub content: String,
}

/// A value with its glyph and unit, e.g. `⏱ 25 min`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub glyph: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.glyph, format_value(self.value), self.unit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEntrySpec {
    /// Stable `data-id` used to resolve list clicks.
    pub data_id: String,
    pub kind: WorkoutKind,
    pub title: String,
    pub distance: Stat,
    pub duration: Stat,
    pub metric: Stat,
    pub secondary: Stat,
}

impl ListEntrySpec {
    pub fn id(&self) -> Option<WorkoutId> {
        self.data_id.parse().ok()
    }
}

impl fmt::Display for ListEntrySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}  {}  {}  {}  {}",
            self.data_id, self.title, self.distance, self.duration, self.metric, self.secondary
        )
    }
}

fn title(workout: &Workout) -> String {
    format!("{} on {}", workout.kind().title(), workout.date_label())
}

pub fn marker_spec(workout: &Workout) -> MarkerSpec {
    let kind = workout.kind();
    MarkerSpec {
        coords: workout.coords(),
        popup: PopupOptions {
            max_width: 250,
            min_width: 100,
            close_button: false,
            auto_close: false,
            close_on_escape_key: false,
            close_on_click: false,
            class_name: format!("{kind}-popup"),
        },
        content: format!("{} {}", kind.glyph(), title(workout)),
    }
}

pub fn list_entry_spec(workout: &Workout) -> ListEntrySpec {
    let (metric, secondary) = match *workout.detail() {
        Detail::Running { cadence, pace } => (
            Stat {
                glyph: "⚡️",
                value: pace,
                unit: "min/km",
            },
            Stat {
                glyph: "🦶🏼",
                value: cadence,
                unit: "spm",
            },
        ),
        Detail::Cycling {
            elevation_gain,
            speed,
        } => (
            Stat {
                glyph: "⚡️",
                value: speed,
                unit: "km/h",
            },
            Stat {
                glyph: "⛰",
                value: elevation_gain,
                unit: "m",
            },
        ),
    };

    ListEntrySpec {
        data_id: workout.id().to_string(),
        kind: workout.kind(),
        title: title(workout),
        distance: Stat {
            glyph: workout.kind().glyph(),
            value: workout.distance(),
            unit: "km",
        },
        duration: Stat {
            glyph: "⏱",
            value: workout.duration(),
            unit: "min",
        },
        metric,
        secondary,
    }
}
