//! Contracts for everything the controller talks to but does not own:
//! geolocation, the map widget, key-value storage, the form, the list and
//! user-facing alerts.

use crate::error::Result;
use crate::event::EventQueue;
use crate::render::ListEntrySpec;
use crate::types::{Coords, WorkoutKind};
use std::time::Duration;

/// Asynchronous source of the user's position.
pub trait PositionProvider {
    /// Start a position query. The outcome is pushed into `events` later as
    /// `PositionAcquired` or `PositionFailed`. An `Err` means geolocation is not
    /// available at all and nothing will be pushed.
    fn request_current_position(&mut self, events: &EventQueue) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Popup behaviour for workout markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub close_button: bool,
    pub auto_close: bool,
    pub close_on_escape_key: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration: Duration,
}

/// The interactive map. Clicks on it come back as `Event::MapClicked`.
pub trait MapView {
    fn create(&mut self, center: Coords, zoom: u8);
    fn add_tile_layer(&mut self, url: &str, attribution: &str);
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions);
    fn place_marker(&mut self, at: Coords, popup: &PopupOptions) -> MarkerId;
    fn set_popup_content(&mut self, marker: MarkerId, content: &str);
    fn open_popup(&mut self, marker: MarkerId);
}

/// Durable key-value storage.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Raw text currently held by the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// The workout entry form. Submits and type changes come back as events.
pub trait FormSurface {
    fn values(&self) -> FormValues;
    fn show(&mut self);
    fn focus_distance(&mut self);
    /// Hide immediately, collapsing the layout.
    fn hide(&mut self);
    /// Empty every text input.
    fn clear(&mut self);
    /// Show the cadence input for running, the elevation input for cycling.
    fn show_secondary_field(&mut self, kind: WorkoutKind);
    /// Undo the layout collapse done by `hide`.
    fn restore_layout(&mut self);
}

/// The workout list. Clicks come back as `Event::ListEntryClicked` with the
/// entry's `data-id`.
pub trait ListSurface {
    fn append(&mut self, entry: &ListEntrySpec);
}

pub trait Notifier {
    fn alert(&mut self, message: &str);
}
