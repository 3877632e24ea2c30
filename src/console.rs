//! Terminal stand-ins for the map, form, list and position source, used by
//! the `trailmark` binary.

use crate::error::{Error, Result};
use crate::event::{Event, EventQueue};
use crate::render::ListEntrySpec;
use crate::surface::{
    FormSurface, FormValues, ListSurface, MapView, MarkerId, Notifier, PanOptions, PopupOptions,
    PositionProvider,
};
use crate::types::{Coords, WorkoutKind};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Position fixed up front (or later through `set`). Without one, geolocation
/// counts as unsupported.
#[derive(Debug, Clone, Default)]
pub struct FixedPosition {
    at: Rc<Cell<Option<Coords>>>,
}

impl FixedPosition {
    pub fn new(at: Option<Coords>) -> Self {
        Self {
            at: Rc::new(Cell::new(at)),
        }
    }

    pub fn set(&self, at: Coords) {
        self.at.set(Some(at));
    }
}

impl PositionProvider for FixedPosition {
    fn request_current_position(&mut self, events: &EventQueue) -> Result<()> {
        match self.at.get() {
            Some(at) => {
                events.push(Event::PositionAcquired(at));
                Ok(())
            }
            None => Err(Error::LocationUnavailable {
                reason: "no position configured; pass --lat/--lng or use `locate LAT LNG`"
                    .to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConsoleMap {
    next_marker: u64,
}

impl MapView for ConsoleMap {
    fn create(&mut self, center: Coords, zoom: u8) {
        println!("map: centered on {center} (zoom {zoom})");
    }

    fn add_tile_layer(&mut self, url: &str, _attribution: &str) {
        tracing::debug!(url, "tile layer added");
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        println!(
            "map: panning to {center} (zoom {zoom}, {:.1}s)",
            pan.duration.as_secs_f64()
        );
    }

    fn place_marker(&mut self, at: Coords, popup: &PopupOptions) -> MarkerId {
        self.next_marker += 1;
        tracing::debug!(marker = self.next_marker, %at, class = %popup.class_name, "marker placed");
        MarkerId(self.next_marker)
    }

    fn set_popup_content(&mut self, marker: MarkerId, content: &str) {
        println!("map: marker #{} \"{content}\"", marker.0);
    }

    fn open_popup(&mut self, _marker: MarkerId) {}
}

#[derive(Debug, Default)]
pub struct FormFields {
    pub values: FormValues,
    pub visible: bool,
    pub collapsed: bool,
}

/// Form whose inputs are typed in through the REPL.
#[derive(Debug, Clone, Default)]
pub struct ConsoleForm {
    fields: Rc<RefCell<FormFields>>,
}

impl ConsoleForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.fields.borrow().visible
    }

    pub fn set_kind(&self, kind: WorkoutKind) {
        self.fields.borrow_mut().values.kind = kind;
    }

    /// Returns `false` for an unknown field name.
    pub fn set_field(&self, name: &str, value: &str) -> bool {
        let mut fields = self.fields.borrow_mut();
        let slot = match name {
            "distance" => &mut fields.values.distance,
            "duration" => &mut fields.values.duration,
            "cadence" => &mut fields.values.cadence,
            "elevation" => &mut fields.values.elevation,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

impl FormSurface for ConsoleForm {
    fn values(&self) -> FormValues {
        self.fields.borrow().values.clone()
    }

    fn show(&mut self) {
        self.fields.borrow_mut().visible = true;
        println!("form: open (set distance/duration/cadence/elevation, then submit)");
    }

    fn focus_distance(&mut self) {}

    fn hide(&mut self) {
        let mut fields = self.fields.borrow_mut();
        fields.visible = false;
        fields.collapsed = true;
    }

    fn clear(&mut self) {
        let mut fields = self.fields.borrow_mut();
        let kind = fields.values.kind;
        fields.values = FormValues {
            kind,
            ..FormValues::default()
        };
    }

    fn show_secondary_field(&mut self, kind: WorkoutKind) {
        let field = match kind {
            WorkoutKind::Running => "cadence",
            WorkoutKind::Cycling => "elevation",
        };
        println!("form: {kind} selected, {field} input shown");
    }

    fn restore_layout(&mut self) {
        self.fields.borrow_mut().collapsed = false;
    }
}

#[derive(Debug, Default)]
pub struct ConsoleList;

impl ListSurface for ConsoleList {
    fn append(&mut self, entry: &ListEntrySpec) {
        println!("{entry}");
    }
}

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("! {message}");
    }
}
