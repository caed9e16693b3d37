//! Compositing core: widget tree, region algebra and the per-frame render pass
//!
//! Everything here is pure and synchronous. It has **no dependencies** on the
//! terminal, the event loop or I/O, so every part of a frame can be driven and
//! inspected from tests.
//!
//! # Module Structure
//!
//! - [`region`]: sets of screen cells (union, intersection, difference)
//! - [`grid`]: character and color grids used as paint surfaces
//! - [`tree`]: arena of widget nodes with generational ids
//! - [`layout`]: size/position hint resolution
//! - [`compositor`]: [`Root`], the owner of the frame buffers and the render pass
//! - [`dispatch`]: key, mouse and paste routing, topmost widget first
//! - [`behavior`], [`behaviors`], [`widgets`]: what concrete widgets do
//!
//! # Frame
//!
//! | Step | Order | Effect |
//! |------|-------|--------|
//! | candidate regions | pre-order | `child = parent ∩ child rect` |
//! | occlusion | reverse pre-order | opaque visible widgets hide what is below |
//! | swap + clear | | last frame kept for diffing |
//! | paint | pre-order | each widget writes only its own region |
//!
//! # Example
//!
//! ```
//! use tui_stage_core::{Root, WidgetBuilder};
//! use tui_stage_core::types::{ColorPair, Size};
//!
//! let mut root = Root::new(Size::new(10, 20), ' ', ColorPair::WHITE_ON_BLACK);
//! let top = root.id();
//! let child = root
//!     .tree_mut()
//!     .add_widget(top, WidgetBuilder::new().size((5, 20)).default_char('#'))
//!     .unwrap();
//!
//! root.render();
//! assert_eq!(root.tree().node(child).unwrap().region().area(), 100);
//! assert_eq!(root.background_region().area(), 100);
//! assert_eq!(root.canvas().row_text(0), "#".repeat(20));
//! ```

pub mod behavior;
pub mod behaviors;
pub mod compositor;
pub mod dispatch;
pub mod error;
pub mod grid;
pub mod layout;
pub mod paint;
pub mod region;
pub mod theme;
pub mod tree;
pub mod widgets;

pub use tui_stage_types as types;

pub use behavior::{Behavior, WidgetCtx};
pub use behaviors::{ButtonBehavior, ButtonState, ToggleBehavior, ToggleGroup, ToggleState};
pub use compositor::{RenderStats, Root};
pub use error::GeometryError;
pub use grid::{Canvas, ColorGrid, Grid};
pub use paint::PaintTarget;
pub use region::{Rect, Region};
pub use theme::Theme;
pub use tree::{Node, WidgetBuilder, WidgetId, WidgetTree};
