#![deny(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};
use trailmark::cli::{self, ReplCmd};
use trailmark::config::ControllerConfig;
use trailmark::console::{ConsoleForm, ConsoleList, ConsoleMap, ConsoleNotifier, FixedPosition};
use trailmark::controller::{Controller, Surfaces};
use trailmark::event::{Event, EventQueue};
use trailmark::render::list_entry_spec;
use trailmark::scheduler::TimerQueue;
use trailmark::storage::FileStorage;
use trailmark::types::Coords;
use trailmark::utils;
use trailmark::workout::WorkoutFactory;

#[macro_use]
extern crate trailmark;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let config = ControllerConfig {
        zoom: cli.zoom,
        storage_key: cli.key.clone(),
        restore_delay: Duration::from_millis(cli.restore_delay_ms),
        ..ControllerConfig::default()
    };
    let here = cli.lat.zip(cli.lng).map(|(lat, lng)| Coords::new(lat, lng));
    dlog!(
        "mode=repl store={} key={} position={:?}",
        cli.store.display(),
        cli.key,
        here
    );

    let events = EventQueue::new();
    let timers = Rc::new(RefCell::new(TimerQueue::new(events.clone())));
    let position = FixedPosition::new(here);
    let form = ConsoleForm::new();

    let surfaces = Surfaces {
        position: Box::new(position.clone()),
        map: Box::new(ConsoleMap::default()),
        form: Box::new(form.clone()),
        list: Box::new(ConsoleList),
        notifier: Box::new(ConsoleNotifier),
        storage: Box::new(FileStorage::new(&cli.store)),
        scheduler: Box::new(Rc::clone(&timers)),
    };
    let mut app = Controller::new(config, surfaces, events.clone(), WorkoutFactory::default());
    app.start();
    app.pump();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush().context("flushing prompt")?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("reading command")?;

        timers.borrow_mut().fire_due(Instant::now());
        app.pump();

        if read == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let parsed = match cli::ReplLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) => {
                e.print().context("printing usage")?;
                continue;
            }
        };

        match parsed.cmd {
            ReplCmd::Click { lat, lng } => events.push(Event::MapClicked(Coords::new(lat, lng))),
            ReplCmd::Type { kind } => {
                form.set_kind(kind);
                events.push(Event::TypeChanged(kind));
            }
            ReplCmd::Set { field, value } => {
                if !form.is_visible() {
                    eprintln!("no form open; click the map first");
                    continue;
                }
                if !form.set_field(&field, &value) {
                    eprintln!("unknown field {field:?}; expected distance, duration, cadence or elevation");
                }
            }
            ReplCmd::Submit => events.push(Event::Submitted),
            ReplCmd::Select { id } => events.push(Event::ListEntryClicked(Some(id))),
            ReplCmd::Locate { lat, lng } => {
                position.set(Coords::new(lat, lng));
                app.request_location();
            }
            ReplCmd::List => {
                if app.store().is_empty() {
                    println!("no workouts yet");
                }
                for workout in app.store().iter() {
                    println!("{}", list_entry_spec(workout));
                }
            }
            ReplCmd::Quit => break,
        }

        app.pump();
    }

    tracing::info!(workouts = app.store().len(), store = %cli.store.display(), "session closed");
    Ok(())
}
