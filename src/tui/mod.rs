//! Terminal runtime for the interactive session.
//!
//! Owns the terminal and one [`Session`]. Effects become worker threads whose
//! results come back over an mpsc channel; the loop draws, drains that
//! channel, then polls for a key with a short tick.

pub mod session;
pub mod theme;
pub mod view;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::engine::InventoryEngine;
use session::{Effect, Event, Session};
use theme::Theme;

const TICK: Duration = Duration::from_millis(100);

pub fn run(engine: Arc<InventoryEngine>, theme: Theme) -> anyhow::Result<()> {
    let terminal = ratatui::init();
    let result = event_loop(terminal, engine, &theme);
    ratatui::restore();
    result
}

fn event_loop(
    mut terminal: DefaultTerminal,
    engine: Arc<InventoryEngine>,
    theme: &Theme,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut session = Session::new();

    let effects = session.start();
    if perform(effects, &engine, &tx) {
        return Ok(());
    }

    loop {
        terminal
            .draw(|frame| view::render(frame, &session, theme))
            .context("failed to draw the terminal")?;

        if drain(&mut session, &rx, &engine, &tx) {
            return Ok(());
        }

        if !event::poll(TICK).context("failed to poll terminal events")? {
            continue;
        }
        if let TermEvent::Key(key) = event::read().context("failed to read terminal event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let effects = session.handle(Event::Key(key));
            if perform(effects, &engine, &tx) {
                return Ok(());
            }
        }
    }
}

/// Feed finished background work into the session. True means quit.
fn drain(
    session: &mut Session,
    rx: &Receiver<Event>,
    engine: &Arc<InventoryEngine>,
    tx: &Sender<Event>,
) -> bool {
    while let Ok(event) = rx.try_recv() {
        let effects = session.handle(event);
        if perform(effects, engine, tx) {
            return true;
        }
    }
    false
}

/// Start the work each effect asks for. True means quit.
fn perform(effects: Vec<Effect>, engine: &Arc<InventoryEngine>, tx: &Sender<Event>) -> bool {
    for effect in effects {
        match effect {
            Effect::Quit => return true,
            Effect::Load => {
                let engine = Arc::clone(engine);
                let tx = tx.clone();
                thread::spawn(move || {
                    let packages = engine.load_all();
                    debug!(count = packages.len(), "inventory loaded");
                    // The receiver is gone only after the loop exited
                    let _ = tx.send(Event::Loaded(packages));
                });
            }
            Effect::Uninstall(package) => {
                let engine = Arc::clone(engine);
                let tx = tx.clone();
                thread::spawn(move || {
                    let result = engine.uninstall(&package);
                    let _ = tx.send(Event::Uninstalled { package, result });
                });
            }
            Effect::ScheduleReturn { ticket, after } => {
                let tx = tx.clone();
                thread::spawn(move || {
                    thread::sleep(after);
                    let _ = tx.send(Event::ReturnDue(ticket));
                });
            }
        }
    }
    false
}
