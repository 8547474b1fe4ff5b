//! Interactive session as a pure state machine.
//!
//! [`Session::handle`] consumes one [`Event`] and returns the [`Effect`]s the
//! runtime must perform. Nothing here touches the terminal, threads or
//! processes, so every transition is testable in isolation.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine;
use crate::error::AppError;
use crate::package::Package;

pub const SUCCESS_RETURN_AFTER: Duration = Duration::from_secs(2);
pub const FAILURE_RETURN_AFTER: Duration = Duration::from_secs(3);
const PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Confirm,
    Uninstalling,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Loaded(Vec<Package>),
    Uninstalled {
        package: Package,
        result: Result<(), AppError>,
    },
    /// A scheduled return to the list fired.
    ReturnDue(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load,
    Uninstall(Package),
    ScheduleReturn { ticket: u64, after: Duration },
    Quit,
}

#[derive(Debug)]
pub struct Session {
    mode: Mode,
    packages: Vec<Package>,
    /// Indices into `packages` that pass the filter, in display order.
    visible: Vec<usize>,
    cursor: usize,
    filter: String,
    filtering: bool,
    selected: Option<Package>,
    outcome: Option<Outcome>,
    loading: bool,
    ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: Mode::List,
            packages: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            filter: String::new(),
            filtering: false,
            selected: None,
            outcome: None,
            loading: true,
            ticket: 0,
        }
    }

    /// Effects to run before the first event: the initial load.
    pub fn start(&mut self) -> Vec<Effect> {
        self.loading = true;
        vec![Effect::Load]
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn visible(&self) -> impl Iterator<Item = &Package> {
        self.visible.iter().map(|&i| &self.packages[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn highlighted(&self) -> Option<&Package> {
        self.visible.get(self.cursor).map(|&i| &self.packages[i])
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn selected(&self) -> Option<&Package> {
        self.selected.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Loaded(packages) => {
                self.on_loaded(packages);
                Vec::new()
            }
            Event::Uninstalled { package, result } => self.on_uninstalled(package, result),
            Event::ReturnDue(ticket) => {
                if self.mode == Mode::Done && ticket == self.ticket {
                    self.return_to_list();
                }
                Vec::new()
            }
        }
    }

    fn on_loaded(&mut self, mut packages: Vec<Package>) {
        packages.sort();
        self.packages = packages;
        self.loading = false;
        self.refilter();
    }

    fn on_uninstalled(&mut self, package: Package, result: Result<(), AppError>) -> Vec<Effect> {
        if self.mode != Mode::Uninstalling {
            return Vec::new();
        }
        self.ticket += 1;
        self.mode = Mode::Done;

        match result {
            Ok(()) => {
                tracing::info!(name = %package.name, manager = %package.manager, "uninstalled");
                self.outcome = Some(Outcome::Success(
                    "Package uninstalled successfully!".to_string(),
                ));
                self.loading = true;
                vec![
                    Effect::Load,
                    Effect::ScheduleReturn {
                        ticket: self.ticket,
                        after: SUCCESS_RETURN_AFTER,
                    },
                ]
            }
            Err(e) => {
                tracing::warn!(error = %e, "uninstall failed");
                self.outcome = Some(Outcome::Failure(e.to_string()));
                vec![Effect::ScheduleReturn {
                    ticket: self.ticket,
                    after: FAILURE_RETURN_AFTER,
                }]
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));
        if ctrl_c {
            return match self.mode {
                Mode::Uninstalling => Vec::new(),
                _ => vec![Effect::Quit],
            };
        }

        match self.mode {
            Mode::List => self.on_list_key(key),
            Mode::Confirm => self.on_confirm_key(key),
            Mode::Uninstalling => Vec::new(),
            Mode::Done => {
                self.return_to_list();
                Vec::new()
            }
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.loading {
            if !self.filtering && key.code == KeyCode::Char('q') {
                return vec![Effect::Quit];
            }
            return Vec::new();
        }

        if self.filtering {
            match key.code {
                KeyCode::Char(c) => {
                    self.filter.push(c);
                    self.refilter();
                }
                KeyCode::Backspace => {
                    self.filter.pop();
                    self.refilter();
                }
                KeyCode::Enter => self.filtering = false,
                KeyCode::Esc => {
                    self.filtering = false;
                    self.clear_filter();
                }
                KeyCode::Up => self.move_up(1),
                KeyCode::Down => self.move_down(1),
                _ => {}
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('q') => return vec![Effect::Quit],
            KeyCode::Char('/') => self.filtering = true,
            KeyCode::Esc => self.clear_filter(),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1),
            KeyCode::PageUp => self.move_up(PAGE),
            KeyCode::PageDown => self.move_down(PAGE),
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.visible.len().saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(pkg) = self.highlighted().cloned() {
                    self.selected = Some(pkg);
                    self.mode = Mode::Confirm;
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_confirm_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match self.selected.clone() {
                Some(pkg) => {
                    self.mode = Mode::Uninstalling;
                    vec![Effect::Uninstall(pkg)]
                }
                None => {
                    self.ticket += 1;
                    self.mode = Mode::Done;
                    self.outcome = Some(Outcome::Failure(AppError::NoSelection.to_string()));
                    vec![Effect::ScheduleReturn {
                        ticket: self.ticket,
                        after: FAILURE_RETURN_AFTER,
                    }]
                }
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.return_to_list();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn return_to_list(&mut self) {
        self.mode = Mode::List;
        self.selected = None;
        self.outcome = None;
    }

    fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        self.visible = engine::search(&self.filter, &self.packages);
        if self.filtering {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
        }
    }

    fn move_up(&mut self, by: usize) {
        self.cursor = self.cursor.saturating_sub(by);
    }

    fn move_down(&mut self, by: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = (self.cursor + by).min(last);
    }
}
