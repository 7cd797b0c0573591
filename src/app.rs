//! Application state and logic.
//!
//! This module ties the counter board, the UI controller and the event
//! stream together and runs the main loop.

use std::time::Duration;

use color_eyre::Result;
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use thiserror::Error;

use crate::counter::MOUNT_DELAY;
use crate::event::{Event, EventHandler, DEFAULT_TICK_RATE};
use crate::state::BoardState;
use crate::ui::{Ui, UpdateKind};

/// Default number of overlapping updates per burst.
pub const DEFAULT_BURST: usize = 3;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("burst size must be at least 1")]
    EmptyBurst,
    #[error("tick rate must be at least 1 ms")]
    ZeroTickRate,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Delay before each deferred update fires.
    pub delay: Duration,
    /// Overlapping updates scheduled per counter by a burst.
    pub burst: usize,
    /// Redraw interval.
    pub tick_rate: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delay: MOUNT_DELAY,
            burst: DEFAULT_BURST,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_burst(mut self, burst: usize) -> Self {
        self.burst = burst;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.burst == 0 {
            return Err(ConfigError::EmptyBurst);
        }
        if self.tick_rate.is_zero() {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(self)
    }
}

/// Main application.
pub struct App {
    /// Counter board
    board: BoardState,
    /// Application configuration
    config: AppConfig,
    /// UI controller
    ui: Ui,
    /// Should the application exit?
    should_quit: bool,
}

impl App {
    /// Mounts the counters. Must be called inside a `LocalSet`.
    pub fn new(config: AppConfig) -> Self {
        let board = BoardState::mount(config.delay);
        let ui = Ui::new(config.burst);

        Self {
            board,
            config,
            ui,
            should_quit: false,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Runs the application main loop.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        let mut events = EventHandler::new(self.config.tick_rate);

        while !self.should_quit {
            terminal.draw(|frame| self.ui.render(frame, &self.board))?;

            match events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        self.board.unmount_all();
        Ok(())
    }

    /// Runs the application main loop with Crossterm backend.
    pub async fn run_with_crossterm(&mut self) -> Result<()> {
        use ratatui::backend::CrosstermBackend;

        let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;
        terminal.clear()?;
        self.run(&mut terminal).await
    }

    /// Handles input and other events.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                let update = self.ui.handle_key_event(key);
                self.apply(update);
            }
            // The next draw picks up the new size and any landed updates.
            Event::Tick | Event::Resize(..) => {}
        }
    }

    fn apply(&mut self, update: UpdateKind) {
        match update {
            UpdateKind::Quit => self.should_quit = true,
            UpdateKind::ToggleHelp => self.ui.toggle_help(),
            UpdateKind::ScheduleAll => self.board.schedule_all(),
            UpdateKind::ScheduleSelected => self.board.schedule_selected(),
            UpdateKind::Burst => self.board.burst_all(self.config.burst),
            UpdateKind::SelectNext => self.board.select_next(),
            UpdateKind::SelectPrev => self.board.select_prev(),
            UpdateKind::Remount => self.board.remount(),
            UpdateKind::Unmount => self.board.unmount_all(),
            UpdateKind::ClearLog => self.board.activity().clear(),
            UpdateKind::Other => {}
        }
    }
}
