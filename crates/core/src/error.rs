//! Validation errors for tree and widget configuration.

use thiserror::Error;

use crate::tree::WidgetId;

/// Rejected geometry or widget configuration.
///
/// Returned synchronously by setters; the tree is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A hint fraction that is negative, NaN or infinite.
    #[error("invalid {axis} hint {value}: expected a finite, non-negative fraction")]
    InvalidHint { axis: &'static str, value: f64 },

    /// Clamp bounds where the minimum exceeds the maximum.
    #[error("invalid {axis} bounds: min {min} exceeds max {max}")]
    InvalidBounds {
        axis: &'static str,
        min: u16,
        max: u16,
    },

    #[error("padding must be non-negative, got {0}")]
    NegativePadding(i32),

    /// The id does not name a live widget (never existed or already removed).
    #[error("unknown widget {0:?}")]
    UnknownWidget(WidgetId),

    #[error("cannot attach {child:?} under its own descendant {parent:?}")]
    Cycle { child: WidgetId, parent: WidgetId },

    #[error("the root widget cannot be removed or re-parented")]
    RootImmutable,
}
