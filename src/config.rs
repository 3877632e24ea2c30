use std::time::Duration;

pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const DEFAULT_STORAGE_KEY: &str = "workouts";
pub const DEFAULT_RESTORE_DELAY_MS: u64 = 1000;
pub const DEFAULT_RESTORE_DELAY: Duration = Duration::from_millis(DEFAULT_RESTORE_DELAY_MS);
pub const DEFAULT_PAN_DURATION: Duration = Duration::from_secs(1);

/// Tunables for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Zoom used for the initial view and when focusing a workout.
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    /// Key the serialized workout log lives under.
    pub storage_key: String,
    /// How long the hidden form keeps its layout collapsed.
    pub restore_delay: Duration,
    pub pan_duration: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            restore_delay: DEFAULT_RESTORE_DELAY,
            pan_duration: DEFAULT_PAN_DURATION,
        }
    }
}
