//! The session's ordered, append-only workout log and its persisted form.

use crate::dlog;
use crate::error::{Error, Result};
use crate::surface::Storage;
use crate::types::{Coords, Detail, Workout, WorkoutId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// On-disk shape of one workout: the discriminator plus raw inputs. The
/// derived metric is written for readability and ignored when reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoredWorkout {
    Running {
        id: WorkoutId,
        created_on: NaiveDate,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
        #[serde(default)]
        pace: Option<f64>,
    },
    Cycling {
        id: WorkoutId,
        created_on: NaiveDate,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
        #[serde(default)]
        speed: Option<f64>,
    },
}

impl From<&Workout> for StoredWorkout {
    fn from(w: &Workout) -> Self {
        match *w.detail() {
            Detail::Running { cadence, pace } => Self::Running {
                id: w.id(),
                created_on: w.created_on(),
                coords: w.coords(),
                distance: w.distance(),
                duration: w.duration(),
                cadence,
                pace: Some(pace),
            },
            Detail::Cycling {
                elevation_gain,
                speed,
            } => Self::Cycling {
                id: w.id(),
                created_on: w.created_on(),
                coords: w.coords(),
                distance: w.distance(),
                duration: w.duration(),
                elevation_gain,
                speed: Some(speed),
            },
        }
    }
}

impl StoredWorkout {
    fn into_workout(self) -> Result<Workout> {
        let (workout, cached) = match self {
            Self::Running {
                id,
                created_on,
                coords,
                distance,
                duration,
                cadence,
                pace,
            } => (
                Workout::running(id, created_on, coords, distance, duration, cadence)?,
                pace,
            ),
            Self::Cycling {
                id,
                created_on,
                coords,
                distance,
                duration,
                elevation_gain,
                speed,
            } => (
                Workout::cycling(id, created_on, coords, distance, duration, elevation_gain)?,
                speed,
            ),
        };

        if let Some(cached) = cached
            && (cached - workout.metric()).abs() > f64::EPSILON * workout.metric().abs().max(1.0)
        {
            dlog!(
                "stale cached metric id={} cached={} recomputed={}",
                workout.id(),
                cached,
                workout.metric()
            );
        }

        Ok(workout)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the end. No reordering, no deduplication.
    pub fn append(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter()
    }

    pub fn find_by_id(&self, id: WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn max_id(&self) -> Option<WorkoutId> {
        self.workouts.iter().map(Workout::id).max()
    }

    /// Overwrite `key` with the whole log.
    pub fn save(&self, storage: &mut dyn Storage, key: &str) -> Result<()> {
        let records: Vec<StoredWorkout> = self.workouts.iter().map(StoredWorkout::from).collect();
        let blob = serde_json::to_string(&records)?;
        storage.set(key, &blob)?;
        dlog!("saved workouts key={key} count={}", records.len());
        Ok(())
    }

    /// Replace the log with what `key` holds. A missing or unreadable blob
    /// leaves the log empty; the failure is only logged.
    pub fn load(&mut self, storage: &dyn Storage, key: &str) -> usize {
        self.workouts.clear();

        let Some(blob) = storage.get(key) else {
            dlog!("no saved workouts key={key}");
            return 0;
        };

        let records = match parse_blob(&blob) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(key, err = %e, "ignoring saved workouts");
                return 0;
            }
        };

        let total = records.len();
        for record in records {
            match record.into_workout() {
                Ok(w) => self.workouts.push(w),
                Err(e) => tracing::warn!(key, err = %e, "skipping saved workout"),
            }
        }

        tracing::info!(loaded = self.workouts.len(), skipped = total - self.workouts.len(), "workouts restored");
        self.workouts.len()
    }
}

fn parse_blob(blob: &str) -> Result<Vec<StoredWorkout>> {
    serde_json::from_str::<Option<Vec<StoredWorkout>>>(blob)
        .map(Option::unwrap_or_default)
        .map_err(Error::PersistenceParse)
}
