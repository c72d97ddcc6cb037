//! Main TUI application state and logic

use crate::interpreter::engine::Vm;
use crate::interpreter::errors::RuntimeError;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Output,
    Memory,
    Params,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: program -> output -> memory -> params)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Memory,
            FocusedPane::Memory => FocusedPane::Params,
            FocusedPane::Params => FocusedPane::Program,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Params,
            FocusedPane::Output => FocusedPane::Program,
            FocusedPane::Memory => FocusedPane::Output,
            FocusedPane::Params => FocusedPane::Memory,
        }
    }
}

/// The main application state
pub struct App {
    /// VM holding the recorded execution history
    pub vm: Vm,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub program_scroll: usize,
    pub memory_scroll: usize,
    pub params_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app over a VM whose history is already recorded
    pub fn new(vm: Vm) -> Self {
        let status_message = if vm.total_snapshots() == 0 {
            String::from("No history recorded")
        } else {
            String::from("Ready!")
        };
        App {
            vm,
            focused_pane: FocusedPane::Program,
            program_scroll: 0,
            memory_scroll: 0,
            params_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.vm.step_forward().is_ok() {
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Memory (top) | Params (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[1]);

        super::panes::render_program_pane(
            frame,
            left_rows[0],
            self.vm.program(),
            self.vm.pc(),
            self.focused_pane == FocusedPane::Program,
            &mut self.program_scroll,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.vm.output(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_memory_pane(
            frame,
            right_rows[0],
            self.vm.memory(),
            self.focused_pane == FocusedPane::Memory,
            &mut self.memory_scroll,
        );

        super::panes::render_params_pane(
            frame,
            right_rows[1],
            self.vm.params(),
            self.focused_pane == FocusedPane::Params,
            &mut self.params_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.vm.history_position(),
            self.vm.total_snapshots(),
            self.vm.last_error(),
            self.is_playing,
        );
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Program => &mut self.program_scroll,
            FocusedPane::Output => &mut self.output_scroll,
            FocusedPane::Memory => &mut self.memory_scroll,
            FocusedPane::Params => &mut self.params_scroll,
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                let result = self.vm.jump_to_end().map(|_| "Jumped to end");
                self.report(result, "jump");
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                let result = self.vm.rewind_to_start().map(|_| "Jumped to start");
                self.report(result, "rewind");
            }
            _ => {}
        }
    }

    fn step_forward(&mut self) {
        let result = self.vm.step_forward().map(|_| "Stepped forward");
        self.report(result, "step forward");
    }

    fn step_backward(&mut self) {
        let result = self.vm.step_backward().map(|_| "Stepped backward");
        self.report(result, "step backward");
    }

    fn report(&mut self, result: Result<&str, RuntimeError>, action: &str) {
        match result {
            Ok(message) => {
                self.status_message = message.to_string();
                self.output_scroll = usize::MAX;
            }
            Err(RuntimeError::HistoryOperationFailed { message }) => {
                self.status_message = format!("Cannot {}: {}", action, message);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
            }
        }
    }
}
