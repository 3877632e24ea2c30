//! End-to-end controller behaviour against recording surfaces.

use chrono::{Local, TimeZone};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use trailmark::config::ControllerConfig;
use trailmark::controller::{Controller, FormState, State, Surfaces};
use trailmark::error::{Error, Result};
use trailmark::event::{Event, EventQueue};
use trailmark::render::ListEntrySpec;
use trailmark::scheduler::{TaskId, TimerQueue};
use trailmark::storage::MemoryStorage;
use trailmark::surface::{
    FormSurface, FormValues, ListSurface, MapView, MarkerId, Notifier, PanOptions, PopupOptions,
    PositionProvider, Storage,
};
use trailmark::types::{Coords, WorkoutId, WorkoutKind};
use trailmark::workout::{FixedClock, WorkoutFactory};

const HOME: Coords = Coords::new(48.8566, 2.3522);

#[derive(Debug, Clone)]
enum Position {
    Grant(Coords),
    Deny(String),
    Unsupported,
}

#[derive(Debug, Default)]
struct Recorded {
    map: Option<(Coords, u8)>,
    tile_urls: Vec<String>,
    markers: Vec<(Coords, String, String)>,
    opened_popups: usize,
    views: Vec<(Coords, u8, PanOptions)>,
    list: Vec<ListEntrySpec>,
    alerts: Vec<String>,
    form: FormValues,
    form_visible: bool,
    form_collapsed: bool,
    shows: usize,
    focuses: usize,
    restores: usize,
    secondary: Option<WorkoutKind>,
    position_requests: usize,
}

type Shared = Rc<RefCell<Recorded>>;

struct FakePosition {
    rec: Shared,
    behaviour: Rc<RefCell<Position>>,
}

impl PositionProvider for FakePosition {
    fn request_current_position(&mut self, events: &EventQueue) -> Result<()> {
        self.rec.borrow_mut().position_requests += 1;
        match self.behaviour.borrow().clone() {
            Position::Grant(at) => events.push(Event::PositionAcquired(at)),
            Position::Deny(reason) => events.push(Event::PositionFailed(reason)),
            Position::Unsupported => {
                return Err(Error::LocationUnavailable {
                    reason: "geolocation is not supported".into(),
                });
            }
        }
        Ok(())
    }
}

struct FakeMap(Shared);

impl MapView for FakeMap {
    fn create(&mut self, center: Coords, zoom: u8) {
        self.0.borrow_mut().map = Some((center, zoom));
    }

    fn add_tile_layer(&mut self, url: &str, _attribution: &str) {
        self.0.borrow_mut().tile_urls.push(url.to_string());
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) {
        self.0.borrow_mut().views.push((center, zoom, pan));
    }

    fn place_marker(&mut self, at: Coords, popup: &PopupOptions) -> MarkerId {
        let mut rec = self.0.borrow_mut();
        rec.markers
            .push((at, popup.class_name.clone(), String::new()));
        MarkerId(rec.markers.len() as u64 - 1)
    }

    fn set_popup_content(&mut self, marker: MarkerId, content: &str) {
        self.0.borrow_mut().markers[marker.0 as usize].2 = content.to_string();
    }

    fn open_popup(&mut self, _marker: MarkerId) {
        self.0.borrow_mut().opened_popups += 1;
    }
}

struct FakeForm(Shared);

impl FormSurface for FakeForm {
    fn values(&self) -> FormValues {
        self.0.borrow().form.clone()
    }

    fn show(&mut self) {
        let mut rec = self.0.borrow_mut();
        rec.form_visible = true;
        rec.shows += 1;
    }

    fn focus_distance(&mut self) {
        self.0.borrow_mut().focuses += 1;
    }

    fn hide(&mut self) {
        let mut rec = self.0.borrow_mut();
        rec.form_visible = false;
        rec.form_collapsed = true;
    }

    fn clear(&mut self) {
        let mut rec = self.0.borrow_mut();
        let kind = rec.form.kind;
        rec.form = FormValues {
            kind,
            ..FormValues::default()
        };
    }

    fn show_secondary_field(&mut self, kind: WorkoutKind) {
        self.0.borrow_mut().secondary = Some(kind);
    }

    fn restore_layout(&mut self) {
        let mut rec = self.0.borrow_mut();
        rec.form_collapsed = false;
        rec.restores += 1;
    }
}

struct FakeList(Shared);

impl ListSurface for FakeList {
    fn append(&mut self, entry: &ListEntrySpec) {
        self.0.borrow_mut().list.push(entry.clone());
    }
}

struct FakeNotifier(Shared);

impl Notifier for FakeNotifier {
    fn alert(&mut self, message: &str) {
        self.0.borrow_mut().alerts.push(message.to_string());
    }
}

struct SharedStorage {
    inner: Rc<RefCell<MemoryStorage>>,
    fail_writes: bool,
}

impl Storage for SharedStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::StorageWrite {
                key: key.to_string(),
                reason: "disk full".into(),
            });
        }
        self.inner.borrow_mut().set(key, value)
    }
}

struct Harness {
    app: Controller,
    rec: Shared,
    events: EventQueue,
    timers: Rc<RefCell<TimerQueue>>,
    position: Rc<RefCell<Position>>,
}

impl Harness {
    fn new(position: Position, storage: Rc<RefCell<MemoryStorage>>) -> Self {
        Self::build(position, storage, false)
    }

    fn build(position: Position, storage: Rc<RefCell<MemoryStorage>>, fail_writes: bool) -> Self {
        let rec = Shared::default();
        let events = EventQueue::new();
        let timers = Rc::new(RefCell::new(TimerQueue::new(events.clone())));
        let position = Rc::new(RefCell::new(position));

        let surfaces = Surfaces {
            position: Box::new(FakePosition {
                rec: rec.clone(),
                behaviour: position.clone(),
            }),
            map: Box::new(FakeMap(rec.clone())),
            form: Box::new(FakeForm(rec.clone())),
            list: Box::new(FakeList(rec.clone())),
            notifier: Box::new(FakeNotifier(rec.clone())),
            storage: Box::new(SharedStorage {
                inner: storage,
                fail_writes,
            }),
            scheduler: Box::new(timers.clone()),
        };
        let now = Local.with_ymd_and_hms(2024, 10, 19, 8, 0, 0).unwrap();
        let factory = WorkoutFactory::new(Box::new(FixedClock(now)));
        let mut app = Controller::new(ControllerConfig::default(), surfaces, events.clone(), factory);
        app.start();
        app.pump();

        Self {
            app,
            rec,
            events,
            timers,
            position,
        }
    }

    fn send(&mut self, event: Event) {
        self.events.push(event);
        self.app.pump();
    }

    fn fill(&self, kind: WorkoutKind, distance: &str, duration: &str, extra: &str) {
        let mut rec = self.rec.borrow_mut();
        rec.form.kind = kind;
        rec.form.distance = distance.to_string();
        rec.form.duration = duration.to_string();
        match kind {
            WorkoutKind::Running => rec.form.cadence = extra.to_string(),
            WorkoutKind::Cycling => rec.form.elevation = extra.to_string(),
        }
    }

    fn log(&mut self, at: Coords, kind: WorkoutKind, distance: &str, duration: &str, extra: &str) {
        self.send(Event::MapClicked(at));
        self.fill(kind, distance, duration, extra);
        self.send(Event::Submitted);
    }

    fn fire_all_timers(&mut self) {
        self.timers
            .borrow_mut()
            .fire_due(Instant::now() + Duration::from_secs(3600));
        self.app.pump();
    }
}

fn empty_storage() -> Rc<RefCell<MemoryStorage>> {
    Rc::new(RefCell::new(MemoryStorage::default()))
}

#[test]
fn granted_position_loads_the_map() {
    let h = Harness::new(Position::Grant(HOME), empty_storage());
    let rec = h.rec.borrow();

    assert_eq!(rec.map, Some((HOME, 13)));
    assert_eq!(
        rec.tile_urls,
        vec!["https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()]
    );
    assert_eq!(rec.position_requests, 1);
    assert_eq!(h.app.state(), &State::MapReady(FormState::Idle));
}

#[test]
fn denied_position_is_reported_and_can_be_retried() {
    let mut h = Harness::new(Position::Deny("User denied Geolocation".into()), empty_storage());

    assert_eq!(h.rec.borrow().alerts, vec!["User denied Geolocation".to_string()]);
    assert!(h.rec.borrow().map.is_none());
    assert!(matches!(h.app.state(), State::LocationUnavailable { .. }));

    h.send(Event::MapClicked(HOME));
    h.send(Event::Submitted);
    assert_eq!(h.rec.borrow().shows, 0);
    assert!(h.app.store().is_empty());

    *h.position.borrow_mut() = Position::Grant(HOME);
    h.app.request_location();
    h.app.pump();
    assert_eq!(h.rec.borrow().position_requests, 2);
    assert!(h.app.has_map());
}

#[test]
fn unsupported_geolocation_fails_without_an_event() {
    let h = Harness::new(Position::Unsupported, empty_storage());

    assert_eq!(h.rec.borrow().alerts.len(), 1);
    assert!(h.rec.borrow().alerts[0].contains("not supported"));
    assert!(!h.app.has_map());
}

#[test]
fn map_click_opens_the_form_and_focuses_distance() {
    let mut h = Harness::new(Position::Grant(HOME), empty_storage());
    let at = Coords::new(48.86, 2.34);
    h.send(Event::MapClicked(at));

    assert!(h.rec.borrow().form_visible);
    assert_eq!(h.rec.borrow().focuses, 1);
    assert_eq!(h.app.pending_coords(), Some(at));
}

#[test]
fn running_submit_stores_pace_renders_and_closes_the_form() {
    let storage = empty_storage();
    let mut h = Harness::new(Position::Grant(HOME), storage.clone());
    let at = Coords::new(48.87, 2.33);
    h.log(at, WorkoutKind::Running, "5", "25", "180");

    let workouts = h.app.store().all();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].metric(), 5.0);
    assert_eq!(workouts[0].coords(), at);

    let rec = h.rec.borrow();
    assert_eq!(rec.markers.len(), 1);
    assert_eq!(rec.markers[0].1, "running-popup");
    assert_eq!(rec.markers[0].2, "🏃‍♂️ Running on October 19");
    assert_eq!(rec.opened_popups, 1);
    assert_eq!(rec.list.len(), 1);
    assert_eq!(rec.list[0].metric.unit, "min/km");
    assert!(!rec.form_visible);
    assert!(rec.form_collapsed);
    assert!(rec.form.distance.is_empty() && rec.form.cadence.is_empty());
    drop(rec);

    assert_eq!(h.app.state(), &State::MapReady(FormState::Idle));
    assert!(storage.borrow().get("workouts").unwrap().contains("\"running\""));

    h.fire_all_timers();
    assert!(!h.rec.borrow().form_collapsed);
    assert_eq!(h.rec.borrow().restores, 1);
}

#[test]
fn cycling_submit_stores_speed() {
    let mut h = Harness::new(Position::Grant(HOME), empty_storage());
    h.log(HOME, WorkoutKind::Cycling, "20", "60", "300");

    let w = &h.app.store().all()[0];
    assert_eq!(w.kind(), WorkoutKind::Cycling);
    assert_eq!(w.metric(), 20.0);
    assert_eq!(w.secondary(), 300.0);
    assert_eq!(h.rec.borrow().list[0].secondary.unit, "m");
}

#[test]
fn negative_distance_is_rejected_and_the_form_stays_open() {
    let storage = empty_storage();
    let mut h = Harness::new(Position::Grant(HOME), storage.clone());
    h.log(HOME, WorkoutKind::Running, "-5", "25", "180");

    assert!(h.app.store().is_empty());
    assert!(storage.borrow().get("workouts").is_none());
    let rec = h.rec.borrow();
    assert_eq!(rec.alerts, vec!["Inputs have to be positive numbers!".to_string()]);
    assert!(rec.form_visible);
    assert_eq!(rec.form.distance, "-5");
    assert!(rec.markers.is_empty() && rec.list.is_empty());
    drop(rec);
    assert_eq!(h.app.pending_coords(), Some(HOME));

    h.fill(WorkoutKind::Running, "5", "25", "180");
    h.send(Event::Submitted);
    assert_eq!(h.app.store().len(), 1);
}

#[test]
fn second_click_replaces_the_pending_coordinates() {
    let mut h = Harness::new(Position::Grant(HOME), empty_storage());
    let first = Coords::new(1.0, 1.0);
    let second = Coords::new(2.0, 2.0);

    h.send(Event::MapClicked(first));
    h.send(Event::MapClicked(second));
    assert_eq!(h.rec.borrow().shows, 1);

    h.fill(WorkoutKind::Cycling, "10", "30", "50");
    h.send(Event::Submitted);
    assert_eq!(h.app.store().all()[0].coords(), second);
    assert_eq!(h.rec.borrow().markers[0].0, second);
}

#[test]
fn submit_without_an_open_form_does_nothing() {
    let mut h = Harness::new(Position::Grant(HOME), empty_storage());
    h.fill(WorkoutKind::Running, "5", "25", "180");
    h.send(Event::Submitted);

    assert!(h.app.store().is_empty());
    assert!(h.rec.borrow().alerts.is_empty());
}

#[test]
fn saved_workouts_come_back_in_order_after_reload() {
    let storage = empty_storage();
    {
        let mut h = Harness::new(Position::Grant(HOME), storage.clone());
        h.log(Coords::new(1.0, 1.0), WorkoutKind::Running, "5", "25", "180");
        h.log(Coords::new(2.0, 2.0), WorkoutKind::Cycling, "20", "60", "300");
        h.log(Coords::new(3.0, 3.0), WorkoutKind::Running, "10", "55", "170");
    }

    let mut h = Harness::new(Position::Deny("later".into()), storage);
    let lats: Vec<f64> = h.app.store().iter().map(|w| w.coords().lat).collect();
    assert_eq!(lats, vec![1.0, 2.0, 3.0]);
    assert_eq!(h.rec.borrow().list.len(), 3);
    assert_eq!(h.rec.borrow().list[1].kind, WorkoutKind::Cycling);
    assert!(h.rec.borrow().markers.is_empty());

    *h.position.borrow_mut() = Position::Grant(HOME);
    h.app.request_location();
    h.app.pump();
    let marker_lats: Vec<f64> = h.rec.borrow().markers.iter().map(|m| m.0.lat).collect();
    assert_eq!(marker_lats, vec![1.0, 2.0, 3.0]);

    let max_loaded = h.app.store().max_id().unwrap();
    h.log(HOME, WorkoutKind::Running, "1", "6", "160");
    let newest = h.app.store().all().last().unwrap().id();
    assert!(newest > max_loaded);
}

#[test]
fn list_click_pans_to_the_workout() {
    let mut h = Harness::new(Position::Grant(HOME), empty_storage());
    let at = Coords::new(45.0, 7.0);
    h.log(at, WorkoutKind::Running, "5", "25", "180");
    let id = h.rec.borrow().list[0].data_id.clone();

    h.send(Event::ListEntryClicked(Some(id)));
    h.send(Event::ListEntryClicked(Some("12345".into())));
    h.send(Event::ListEntryClicked(Some("not-an-id".into())));
    h.send(Event::ListEntryClicked(None));

    let rec = h.rec.borrow();
    assert_eq!(rec.views.len(), 1);
    let (center, zoom, pan) = rec.views[0];
    assert_eq!(center, at);
    assert_eq!(zoom, 13);
    assert!(pan.animate);
    assert_eq!(pan.duration, Duration::from_secs(1));
}

#[test]
fn list_click_without_a_map_is_ignored() {
    let storage = empty_storage();
    {
        let mut h = Harness::new(Position::Grant(HOME), storage.clone());
        h.log(HOME, WorkoutKind::Running, "5", "25", "180");
    }
    let mut h = Harness::new(Position::Deny("no".into()), storage);
    let id = h.app.store().all()[0].id();

    h.send(Event::ListEntryClicked(Some(id.to_string())));
    assert!(h.rec.borrow().views.is_empty());
    assert_eq!(id.to_string().parse::<WorkoutId>().unwrap(), id);
}

#[test]
fn reopening_the_form_supersedes_the_pending_restore() {
    let mut h = Harness::new(Position::Grant(HOME), empty_storage());
    h.log(HOME, WorkoutKind::Running, "5", "25", "180");
    assert_eq!(h.timers.borrow().pending(), 1);
    assert!(h.rec.borrow().form_collapsed);

    h.send(Event::MapClicked(HOME));
    assert_eq!(h.timers.borrow().pending(), 0);
    assert_eq!(h.rec.borrow().restores, 1);
    assert!(!h.rec.borrow().form_collapsed);
    assert!(h.rec.borrow().form_visible);

    h.fire_all_timers();
    assert_eq!(h.rec.borrow().restores, 1);

    h.send(Event::TimerFired(TaskId(999)));
    assert_eq!(h.rec.borrow().restores, 1);
}

#[test]
fn type_change_swaps_the_secondary_input_once_the_map_exists() {
    let mut h = Harness::new(Position::Deny("no".into()), empty_storage());
    h.send(Event::TypeChanged(WorkoutKind::Cycling));
    assert_eq!(h.rec.borrow().secondary, None);

    *h.position.borrow_mut() = Position::Grant(HOME);
    h.app.request_location();
    h.app.pump();
    h.send(Event::TypeChanged(WorkoutKind::Cycling));
    assert_eq!(h.rec.borrow().secondary, Some(WorkoutKind::Cycling));
    assert_eq!(h.app.state(), &State::MapReady(FormState::Idle));
}

#[test]
fn failed_save_keeps_the_workout_and_tells_the_user() {
    let mut h = Harness::build(Position::Grant(HOME), empty_storage(), true);
    h.log(HOME, WorkoutKind::Running, "5", "25", "180");

    assert_eq!(h.app.store().len(), 1);
    let rec = h.rec.borrow();
    assert_eq!(rec.alerts.len(), 1);
    assert!(rec.alerts[0].contains("could not be saved"));
    assert!(!rec.form_visible);
}

#[test]
fn ids_are_distinct_across_a_session() {
    let mut h = Harness::new(Position::Grant(HOME), empty_storage());
    for _ in 0..5 {
        h.log(HOME, WorkoutKind::Running, "5", "25", "180");
    }
    let mut ids: Vec<WorkoutId> = h.app.store().iter().map(|w| w.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}
