//! Frame diff: the minimal instruction stream turning one frame into another.
//!
//! This is pure: it never touches a terminal. [`crate::renderer`] encodes the
//! instructions with crossterm.

use tui_stage_core::{Canvas, ColorGrid};
use unicode_width::UnicodeWidthChar;

use crate::types::{ColorPair, Size, StyledChar};

/// Everything that decides how a cell is drawn apart from its character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub colors: ColorPair,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl CellStyle {
    pub fn of(ch: StyledChar, colors: ColorPair) -> Self {
        Self {
            colors,
            bold: ch.bold,
            italic: ch.italic,
            underline: ch.underline,
            strikethrough: ch.strikethrough,
        }
    }
}

/// One terminal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Clear the whole screen. Only emitted by full repaints.
    Clear,
    MoveTo { row: u16, col: u16 },
    SetStyle(CellStyle),
    /// Write one character and advance the cursor by one column.
    Print(char),
}

/// A painted frame: characters plus colors of the same size.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub canvas: &'a Canvas,
    pub colors: &'a ColorGrid,
}

impl<'a> Frame<'a> {
    pub fn new(canvas: &'a Canvas, colors: &'a ColorGrid) -> Self {
        Self { canvas, colors }
    }

    pub fn size(&self) -> Size {
        self.canvas.size()
    }
}

/// Logical terminal state while emitting instructions.
struct Pen {
    cursor: Option<(u16, u16)>,
    style: Option<CellStyle>,
    width: u16,
}

impl Pen {
    fn new(width: u16) -> Self {
        Self {
            cursor: None,
            style: None,
            width,
        }
    }

    fn cell(&mut self, out: &mut Vec<Instruction>, row: u16, col: u16, ch: StyledChar, colors: ColorPair) {
        if self.cursor != Some((row, col)) {
            out.push(Instruction::MoveTo { row, col });
        }
        let style = CellStyle::of(ch, colors);
        if self.style != Some(style) {
            out.push(Instruction::SetStyle(style));
            self.style = Some(style);
        }
        out.push(Instruction::Print(ch.ch));
        // Past the last column, or after a glyph that is not one column wide
        // everywhere, the terminal's cursor position is not reliable.
        self.cursor = (single_column(ch.ch) && col + 1 < self.width).then_some((row, col + 1));
    }
}

/// Whether `ch` advances the cursor by exactly one column, including on
/// terminals that draw East Asian ambiguous-width glyphs double.
fn single_column(ch: char) -> bool {
    UnicodeWidthChar::width(ch) == Some(1) && UnicodeWidthChar::width_cjk(ch) == Some(1)
}

/// Replace `out` with the instructions that redraw `next` from scratch.
pub fn full_into(next: Frame<'_>, out: &mut Vec<Instruction>) {
    out.clear();
    out.push(Instruction::Clear);
    let size = next.size();
    let mut pen = Pen::new(size.width);
    for row in 0..size.height {
        let (chars, colors) = (next.canvas.row(row), next.colors.row(row));
        for (col, (&ch, &color)) in chars.iter().zip(colors).enumerate() {
            pen.cell(out, row, col as u16, ch, color);
        }
    }
}

/// Replace `out` with the instructions that turn a terminal showing `prev`
/// into one showing `next`.
///
/// Unchanged cells are skipped. The cursor is moved only when it is not
/// already at the next changed cell, and the style is set only when it
/// differs from the active one. Frames of different sizes fall back to
/// [`full_into`].
pub fn diff_into(prev: Frame<'_>, next: Frame<'_>, out: &mut Vec<Instruction>) {
    if prev.size() != next.size() {
        full_into(next, out);
        return;
    }
    out.clear();
    let size = next.size();
    let mut pen = Pen::new(size.width);
    for row in 0..size.height {
        let before = prev.canvas.row(row).iter().zip(prev.colors.row(row));
        let after = next.canvas.row(row).iter().zip(next.colors.row(row));
        for (col, (old, (&ch, &color))) in before.zip(after).enumerate() {
            if old == (&ch, &color) {
                continue;
            }
            pen.cell(out, row, col as u16, ch, color);
        }
    }
}
