//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`program`]: Decoded quadruple listing with the program counter highlighted
//! - [`memory`]: Initialized cells grouped by sector and data type
//! - [`params`]: Parameter stack, top first
//! - [`terminal`]: Output produced by the print intrinsics
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane exports a single `render_*` function taking the frame, its area,
//! the state to draw, whether it has focus and its scroll offset.

mod utils;

pub mod memory;
pub mod params;
pub mod program;
pub mod status;
pub mod terminal;

pub use memory::render_memory_pane;
pub use params::render_params_pane;
pub use program::render_program_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;
