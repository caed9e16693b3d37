//! Terminal output.
//!
//! The split mirrors the frame pipeline:
//! - [`diff`]: pure comparison of two frames into an [`Instruction`] stream
//! - [`renderer`]: crossterm encoding and the [`TerminalRenderer`] that owns
//!   terminal modes (raw mode, alternate screen, mouse capture, paste)
//! - [`render_throttle`]: per-tick decision whether a frame is needed

pub mod diff;
pub mod render_throttle;
pub mod renderer;

pub use tui_stage_core as core;
pub use tui_stage_types as types;

pub use diff::{diff_into, full_into, CellStyle, Frame, Instruction};
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_into, TerminalRenderer};
