//! Cell grids for characters and colors.

use crate::region::Rect;
use crate::types::{ColorPair, Point, Size, StyledChar, TextStyle};

/// Row-major 2D grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    size: Size,
    cells: Vec<T>,
}

/// A widget's (or the screen's) characters.
pub type Canvas = Grid<StyledChar>;

/// A widget's (or the screen's) color pairs.
pub type ColorGrid = Grid<ColorPair>;

impl<T: Copy> Grid<T> {
    pub fn new(size: Size, fill: T) -> Self {
        Self {
            size,
            cells: vec![fill; size.area()],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn height(&self) -> u16 {
        self.size.height
    }

    pub fn width(&self) -> u16 {
        self.size.width
    }

    /// Reallocate to `size`, filling every cell with `fill`.
    ///
    /// Old contents are not preserved. The allocation is reused when possible.
    pub fn reset(&mut self, size: Size, fill: T) {
        self.size = size;
        self.cells.clear();
        self.cells.resize(size.area(), fill);
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn row(&self, row: u16) -> &[T] {
        let w = self.size.width as usize;
        let start = (row as usize) * w;
        &self.cells[start..start + w]
    }

    #[inline(always)]
    fn idx(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.size.height as i32 || col >= self.size.width as i32 {
            return None;
        }
        Some((row as usize) * (self.size.width as usize) + (col as usize))
    }

    pub fn get(&self, row: i32, col: i32) -> Option<T> {
        self.idx(row, col).map(|i| self.cells[i])
    }

    pub fn get_mut(&mut self, row: i32, col: i32) -> Option<&mut T> {
        self.idx(row, col).map(move |i| &mut self.cells[i])
    }

    pub fn set(&mut self, row: i32, col: i32, value: T) {
        if let Some(i) = self.idx(row, col) {
            self.cells[i] = value;
        }
    }

    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Fill the part of `rect` that lies inside the grid.
    pub fn fill_rect(&mut self, rect: Rect, value: T) {
        let top = rect.top.max(0);
        let left = rect.left.max(0);
        let bottom = rect.bottom.min(self.size.height as i32);
        let right = rect.right.min(self.size.width as i32);
        for row in top..bottom {
            for col in left..right {
                self.set(row, col, value);
            }
        }
    }

    pub fn swap(&mut self, other: &mut Grid<T>) {
        std::mem::swap(self, other);
    }
}

impl Canvas {
    /// Write `text` starting at `pos`, clipped to the grid.
    ///
    /// Newlines start a new row at the original column.
    pub fn put_str(&mut self, pos: Point, text: &str, style: TextStyle) {
        let mut row = pos.row;
        let mut col = pos.col;
        for ch in text.chars() {
            if ch == '\n' {
                row += 1;
                col = pos.col;
                continue;
            }
            if row >= self.size.height as i32 {
                break;
            }
            self.set(row, col, StyledChar::plain(ch).with_style(style));
            col += 1;
        }
    }

    /// Row contents as a `String` (attributes dropped).
    pub fn row_text(&self, row: u16) -> String {
        self.row(row).iter().map(|c| c.ch).collect()
    }
}
