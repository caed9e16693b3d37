//! Stock widgets built on [`crate::Behavior`].

mod text;
mod text_panel;
mod toggle_button;

pub use text::{text_size, Text};
pub use text_panel::TextPanel;
pub use toggle_button::{ToggleButton, ToggleCallback, CHECK_OFF, CHECK_ON, RADIO_OFF, RADIO_ON};
