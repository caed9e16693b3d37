//! Application layer: configuration, logging and the cooperative event loop.
//!
//! Everything runs on one thread. The loop (see [`App::run`]) repeats:
//!
//! 1. drain pending terminal events and dispatch them to widgets;
//! 2. advance the frame clock, waking tasks parked in [`TaskCtx::next_tick`];
//! 3. composite and flush a frame when the tree changed (or the static
//!    refresh interval elapsed).
//!
//! Widget tasks run on the same [`tokio::task::LocalSet`] and only touch the
//! tree between those steps, so a render pass never observes a half-applied
//! mutation.

pub mod app;
pub mod config;
pub mod logging;
pub mod tasks;

pub use tui_stage_types as types;

pub use app::{App, StopHandle};
pub use config::{AppConfig, ConfigError};
pub use tasks::{CancelToken, Cancelled, TaskCtx, TaskFailure, TaskId, TaskRegistry};
