//! tui-stage (workspace facade crate).
//!
//! Re-exports the member crates as `tui_stage::{core,term,input,app,types}`.
//! The implementation lives in dedicated crates under `crates/`.

pub use tui_stage_app as app;
pub use tui_stage_core as core;
pub use tui_stage_input as input;
pub use tui_stage_term as term;
pub use tui_stage_types as types;
