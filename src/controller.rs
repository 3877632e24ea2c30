//! The interaction controller: owns the workout log and the map, and reacts
//! to position, map, form, list and timer events one at a time.

use crate::config::ControllerConfig;
use crate::dlog;
use crate::event::{Event, EventQueue};
use crate::render::{list_entry_spec, marker_spec};
use crate::scheduler::{Scheduler, TaskId};
use crate::store::WorkoutStore;
use crate::surface::{
    FormSurface, ListSurface, MapView, Notifier, PanOptions, PositionProvider, Storage,
};
use crate::types::{Coords, Workout, WorkoutId, WorkoutKind};
use crate::workout::WorkoutFactory;

/// Everything outside the controller it needs to talk to.
pub struct Surfaces {
    pub position: Box<dyn PositionProvider>,
    pub map: Box<dyn MapView>,
    pub form: Box<dyn FormSurface>,
    pub list: Box<dyn ListSurface>,
    pub notifier: Box<dyn Notifier>,
    pub storage: Box<dyn Storage>,
    pub scheduler: Box<dyn Scheduler>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Idle,
    Open { coords: Coords },
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    AwaitingLocation,
    LocationUnavailable { reason: String },
    MapReady(FormState),
}

pub struct Controller {
    config: ControllerConfig,
    surfaces: Surfaces,
    events: EventQueue,
    store: WorkoutStore,
    factory: WorkoutFactory,
    state: State,
    pending_restore: Option<TaskId>,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        surfaces: Surfaces,
        events: EventQueue,
        factory: WorkoutFactory,
    ) -> Self {
        Self {
            config,
            surfaces,
            events,
            store: WorkoutStore::new(),
            factory,
            state: State::AwaitingLocation,
            pending_restore: None,
        }
    }

    pub const fn state(&self) -> &State {
        &self.state
    }

    pub const fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub const fn has_map(&self) -> bool {
        matches!(self.state, State::MapReady(_))
    }

    /// Coordinates captured by the last map click while the form is open.
    pub fn pending_coords(&self) -> Option<Coords> {
        match self.state {
            State::MapReady(FormState::Open { coords }) => Some(coords),
            _ => None,
        }
    }

    /// Ask for the position, then restore and list saved workouts.
    pub fn start(&mut self) {
        self.request_location();

        let key = self.config.storage_key.as_str();
        self.store.load(self.surfaces.storage.as_ref(), key);
        if let Some(max) = self.store.max_id() {
            self.factory.observe_id(max);
        }
        for workout in self.store.iter() {
            self.surfaces.list.append(&list_entry_spec(workout));
        }
    }

    /// Issue a position query unless a map already exists.
    pub fn request_location(&mut self) {
        if self.has_map() {
            dlog!("position request ignored: map already loaded");
            return;
        }

        self.state = State::AwaitingLocation;
        tracing::info!("requesting current position");
        if let Err(e) = self.surfaces.position.request_current_position(&self.events) {
            self.on_position_failed(e.to_string());
        }
    }

    /// Handle every queued event, in order.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0usize;
        while let Some(event) = self.events.pop() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    pub fn handle(&mut self, event: Event) {
        tracing::trace!(?event, state = ?self.state, "event");
        match event {
            Event::PositionAcquired(at) => self.on_position(at),
            Event::PositionFailed(reason) => self.on_position_failed(reason),
            Event::MapClicked(at) => self.on_map_click(at),
            Event::TypeChanged(kind) => self.on_type_change(kind),
            Event::Submitted => self.on_submit(),
            Event::ListEntryClicked(data_id) => self.on_list_click(data_id.as_deref()),
            Event::TimerFired(task) => self.on_timer(task),
        }
    }

    fn on_position(&mut self, at: Coords) {
        if self.has_map() {
            dlog!("late position ignored at={at}");
            return;
        }

        let zoom = self.config.zoom;
        let map = self.surfaces.map.as_mut();
        map.create(at, zoom);
        map.add_tile_layer(&self.config.tile_url, &self.config.attribution);
        self.state = State::MapReady(FormState::Idle);
        tracing::info!(%at, zoom, "map ready");

        for workout in self.store.iter() {
            render_marker(map, workout);
        }
    }

    fn on_position_failed(&mut self, reason: String) {
        if self.has_map() {
            dlog!("position failure ignored: map already loaded");
            return;
        }

        tracing::warn!(%reason, "location unavailable");
        self.surfaces.notifier.alert(&reason);
        self.state = State::LocationUnavailable { reason };
    }

    fn on_map_click(&mut self, at: Coords) {
        match self.state {
            State::MapReady(FormState::Idle) => {
                self.cancel_pending_restore();
                self.state = State::MapReady(FormState::Open { coords: at });
                self.surfaces.form.show();
                self.surfaces.form.focus_distance();
                dlog!("form opened at={at}");
            }
            State::MapReady(FormState::Open { coords: previous }) => {
                self.state = State::MapReady(FormState::Open { coords: at });
                self.surfaces.form.focus_distance();
                dlog!("pending coords replaced previous={previous} at={at}");
            }
            _ => {
                dlog!("map click ignored: no map");
            }
        }
    }

    fn on_type_change(&mut self, kind: WorkoutKind) {
        if self.has_map() {
            self.surfaces.form.show_secondary_field(kind);
        }
    }

    fn on_submit(&mut self) {
        let State::MapReady(FormState::Open { coords }) = self.state else {
            dlog!("submit ignored: form not open");
            return;
        };

        let values = self.surfaces.form.values();
        let workout = match self.factory.create_from_form(coords, &values) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(err = %e, kind = %values.kind, "workout rejected");
                self.surfaces.notifier.alert(e.user_message());
                return;
            }
        };

        render_marker(self.surfaces.map.as_mut(), &workout);
        self.surfaces.list.append(&list_entry_spec(&workout));
        tracing::info!(
            id = %workout.id(),
            kind = %workout.kind(),
            distance = workout.distance(),
            duration = workout.duration(),
            metric = workout.metric(),
            "workout logged"
        );
        self.store.append(workout);

        if let Err(e) = self
            .store
            .save(self.surfaces.storage.as_mut(), &self.config.storage_key)
        {
            tracing::warn!(err = %e, "workouts not saved");
            self.surfaces
                .notifier
                .alert(&format!("Your workout could not be saved: {e}"));
        }

        self.close_form();
    }

    fn close_form(&mut self) {
        self.surfaces.form.clear();
        self.surfaces.form.hide();
        self.cancel_pending_restore();
        self.pending_restore = Some(self.surfaces.scheduler.schedule(self.config.restore_delay));
        self.state = State::MapReady(FormState::Idle);
    }

    /// Drop a scheduled layout restore and apply it now instead.
    fn cancel_pending_restore(&mut self) {
        if let Some(task) = self.pending_restore.take() {
            self.surfaces.scheduler.cancel(task);
            self.surfaces.form.restore_layout();
            dlog!("pending form restore superseded task={}", task.0);
        }
    }

    fn on_timer(&mut self, task: TaskId) {
        if self.pending_restore == Some(task) {
            self.pending_restore = None;
            self.surfaces.form.restore_layout();
        } else {
            dlog!("stale timer ignored task={}", task.0);
        }
    }

    fn on_list_click(&mut self, data_id: Option<&str>) {
        if !self.has_map() {
            dlog!("list click ignored: no map");
            return;
        }
        let Some(raw) = data_id else {
            return;
        };
        let Ok(id) = raw.parse::<WorkoutId>() else {
            dlog!("list click with bad id raw={raw:?}");
            return;
        };
        let Some(workout) = self.store.find_by_id(id) else {
            dlog!("list click for unknown workout id={id}");
            return;
        };

        let pan = PanOptions {
            animate: true,
            duration: self.config.pan_duration,
        };
        self.surfaces
            .map
            .set_view(workout.coords(), self.config.zoom, pan);
    }
}

fn render_marker(map: &mut dyn MapView, workout: &Workout) {
    let spec = marker_spec(workout);
    let marker = map.place_marker(spec.coords, &spec.popup);
    map.set_popup_content(marker, &spec.content);
    map.open_popup(marker);
}
