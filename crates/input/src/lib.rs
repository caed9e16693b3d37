//! Terminal input module.
//!
//! Maps `crossterm` events into [`crate::types::InputEvent`]s. Dispatch to
//! widgets happens in the core crate; this crate only translates.

pub mod map;

pub use tui_stage_types as types;

pub use map::{map_event, map_key, map_mouse, should_quit};
