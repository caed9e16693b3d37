//! Paint contract: a widget's write access to the shared frame.

use crate::grid::{Canvas, ColorGrid};
use crate::region::{Rect, Region};
use crate::tree::Node;
use crate::types::{ColorPair, Point, StyledChar};

/// View of the shared screen buffers restricted to one widget's granted region.
///
/// Every write goes through the region's rectangles, so a widget cannot touch
/// cells it was not granted this frame.
pub struct PaintTarget<'a> {
    canvas: &'a mut Canvas,
    colors: &'a mut ColorGrid,
    region: &'a Region,
    origin: Point,
}

impl<'a> PaintTarget<'a> {
    pub fn new(
        canvas: &'a mut Canvas,
        colors: &'a mut ColorGrid,
        region: &'a Region,
        origin: Point,
    ) -> Self {
        Self {
            canvas,
            colors,
            region,
            origin,
        }
    }

    /// Granted cells in absolute coordinates.
    pub fn region(&self) -> &Region {
        self.region
    }

    /// Absolute position of the widget's top-left cell.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.region.rects()
    }

    /// Visit every granted cell.
    ///
    /// The callback receives the cell position in the widget's local coordinates.
    pub fn for_each_cell(&mut self, mut f: impl FnMut(Point, &mut StyledChar, &mut ColorPair)) {
        for rect in self.region.rects() {
            for row in rect.rows() {
                for col in rect.cols() {
                    let (Some(ch), Some(color)) =
                        (self.canvas.get_mut(row, col), self.colors.get_mut(row, col))
                    else {
                        continue;
                    };
                    f(Point::new(row, col) - self.origin, ch, color);
                }
            }
        }
    }

    pub fn fill(&mut self, ch: StyledChar, color: ColorPair) {
        self.for_each_cell(|_, c, p| {
            *c = ch;
            *p = color;
        });
    }

    /// Copy the node's local canvas and colors into the granted cells.
    ///
    /// Transparent nodes only write non-blank characters, and keep the
    /// background color already underneath them.
    pub fn blit(&mut self, node: &Node) {
        let transparent = node.is_transparent();
        let (src_canvas, src_colors) = (node.canvas(), node.colors());
        self.for_each_cell(|local, ch, color| {
            let (Some(src_ch), Some(src_color)) = (
                src_canvas.get(local.row, local.col),
                src_colors.get(local.row, local.col),
            ) else {
                return;
            };
            if transparent {
                if src_ch.is_blank() {
                    return;
                }
                *ch = src_ch;
                color.fg = src_color.fg;
            } else {
                *ch = src_ch;
                *color = src_color;
            }
        });
    }
}
