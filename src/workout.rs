//! Workout construction: validation, derived metrics and id assignment.

use crate::error::{Field, ValidationError};
use crate::surface::FormValues;
use crate::types::{Coords, Detail, Workout, WorkoutId, WorkoutKind};
use crate::utils::parse_form_number;
use chrono::{DateTime, Local, NaiveDate};

/// Source of "now" for creation dates and ids.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Hands out millisecond-timestamp ids, bumped past the previous id when two
/// creations land on the same (or an earlier) millisecond.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: Option<u64>,
}

impl IdGenerator {
    pub fn next_id(&mut self, now_ms: i64) -> WorkoutId {
        let candidate = u64::try_from(now_ms).unwrap_or(0);
        let id = match self.last {
            Some(last) if candidate <= last => last.saturating_add(1),
            _ => candidate,
        };
        self.last = Some(id);
        WorkoutId(id)
    }

    /// Never hand out an id at or below `id` again.
    pub fn observe(&mut self, id: WorkoutId) {
        if self.last.is_none_or(|last| id.0 > last) {
            self.last = Some(id.0);
        }
    }
}

fn require_finite(field: Field, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

fn require_positive(field: Field, value: f64) -> Result<f64, ValidationError> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

impl Workout {
    /// Build a running workout; `pace = duration / distance`.
    pub fn running(
        id: WorkoutId,
        created_on: NaiveDate,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Self, ValidationError> {
        let distance = require_positive(Field::Distance, distance)?;
        let duration = require_positive(Field::Duration, duration)?;
        let cadence = require_positive(Field::Cadence, cadence)?;

        Ok(Self {
            id,
            created_on,
            coords,
            distance,
            duration,
            detail: Detail::Running {
                cadence,
                pace: duration / distance,
            },
        })
    }

    /// Build a cycling workout; `speed = distance / (duration / 60)`.
    ///
    /// Elevation only has to be finite: a flat or downhill ride is accepted.
    pub fn cycling(
        id: WorkoutId,
        created_on: NaiveDate,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Self, ValidationError> {
        let distance = require_positive(Field::Distance, distance)?;
        let duration = require_positive(Field::Duration, duration)?;
        let elevation_gain = require_finite(Field::Elevation, elevation_gain)?;

        Ok(Self {
            id,
            created_on,
            coords,
            distance,
            duration,
            detail: Detail::Cycling {
                elevation_gain,
                speed: distance / (duration / 60.0),
            },
        })
    }
}

/// Creates workouts stamped with the clock's date and a fresh id.
pub struct WorkoutFactory {
    clock: Box<dyn Clock>,
    ids: IdGenerator,
}

impl Default for WorkoutFactory {
    fn default() -> Self {
        Self::new(Box::new(SystemClock))
    }
}

impl WorkoutFactory {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            ids: IdGenerator::default(),
        }
    }

    pub fn observe_id(&mut self, id: WorkoutId) {
        self.ids.observe(id);
    }

    pub fn create_running(
        &mut self,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Result<Workout, ValidationError> {
        let now = self.clock.now();
        let mut workout =
            Workout::running(WorkoutId(0), now.date_naive(), coords, distance, duration, cadence)?;
        workout.id = self.ids.next_id(now.timestamp_millis());
        Ok(workout)
    }

    pub fn create_cycling(
        &mut self,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Result<Workout, ValidationError> {
        let now = self.clock.now();
        let mut workout = Workout::cycling(
            WorkoutId(0),
            now.date_naive(),
            coords,
            distance,
            duration,
            elevation_gain,
        )?;
        workout.id = self.ids.next_id(now.timestamp_millis());
        Ok(workout)
    }

    /// Parse the raw form text for the selected type and build the workout.
    pub fn create_from_form(
        &mut self,
        coords: Coords,
        form: &FormValues,
    ) -> Result<Workout, ValidationError> {
        let distance = parse_form_number(&form.distance);
        let duration = parse_form_number(&form.duration);

        match form.kind {
            WorkoutKind::Running => {
                let cadence = parse_form_number(&form.cadence);
                self.create_running(coords, distance, duration, cadence)
            }
            WorkoutKind::Cycling => {
                let elevation = parse_form_number(&form.elevation);
                self.create_cycling(coords, distance, duration, elevation)
            }
        }
    }
}
