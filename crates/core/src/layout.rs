//! Hint resolution: turns proportional size/position hints into cell geometry.
//!
//! These functions are pure. [`crate::tree::WidgetTree`] calls them parent
//! first, then children, whenever a size changes.

use crate::error::GeometryError;
use crate::types::{Anchor, Point, PosHint, Size, SizeHint};

fn check_fraction(axis: &'static str, value: Option<f64>) -> Result<(), GeometryError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(GeometryError::InvalidHint { axis, value: v }),
        _ => Ok(()),
    }
}

pub fn validate_size_hint(hint: &SizeHint) -> Result<(), GeometryError> {
    check_fraction("height", hint.height)?;
    check_fraction("width", hint.width)?;
    if let Some(max) = hint.max_height {
        if hint.min_height > max {
            return Err(GeometryError::InvalidBounds {
                axis: "height",
                min: hint.min_height,
                max,
            });
        }
    }
    if let Some(max) = hint.max_width {
        if hint.min_width > max {
            return Err(GeometryError::InvalidBounds {
                axis: "width",
                min: hint.min_width,
                max,
            });
        }
    }
    Ok(())
}

pub fn validate_pos_hint(hint: &PosHint) -> Result<(), GeometryError> {
    check_fraction("y", hint.y)?;
    check_fraction("x", hint.x)
}

fn scale(fraction: f64, extent: u16) -> f64 {
    (fraction * extent as f64).round()
}

fn resolve_axis(fraction: Option<f64>, explicit: u16, parent: u16, min: u16, max: Option<u16>) -> u16 {
    match fraction {
        None => explicit,
        Some(f) => {
            let hinted = scale(f, parent).clamp(0.0, u16::MAX as f64) as u16;
            let upper = max.unwrap_or(u16::MAX);
            hinted.clamp(min, upper.max(min))
        }
    }
}

/// Size of a widget inside a parent of size `parent`.
pub fn resolve_size(hint: &SizeHint, explicit: Size, parent: Size) -> Size {
    Size::new(
        resolve_axis(
            hint.height,
            explicit.height,
            parent.height,
            hint.min_height,
            hint.max_height,
        ),
        resolve_axis(
            hint.width,
            explicit.width,
            parent.width,
            hint.min_width,
            hint.max_width,
        ),
    )
}

/// Position (parent-local) of a widget of `size` inside a parent of size `parent`.
///
/// The hinted point is `fraction * parent`; the widget's `anchor` point is
/// placed on it. Unhinted axes keep `explicit`.
pub fn resolve_pos(hint: &PosHint, anchor: Anchor, explicit: Point, size: Size, parent: Size) -> Point {
    let offset = anchor.offset(size);
    let row = match hint.y {
        Some(f) => scale(f, parent.height) as i32 - offset.row,
        None => explicit.row,
    };
    let col = match hint.x {
        Some(f) => scale(f, parent.width) as i32 - offset.col,
        None => explicit.col,
    };
    Point::new(row, col)
}
