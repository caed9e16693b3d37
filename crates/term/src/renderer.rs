//! TerminalRenderer: flushes composited frames to a real terminal.
//!
//! Each draw diffs the root's current buffers against the previous frame and
//! writes only the changed cells. Resizes force a full repaint.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};
use tracing::debug;

use tui_stage_core::Root;

use crate::diff::{diff_into, full_into, CellStyle, Frame, Instruction};
use crate::types::Rgb;

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    buf: Vec<u8>,
    instructions: Vec<Instruction>,
    force_full: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render into any writer. Terminal modes are still switched by
    /// [`Self::enter`] and [`Self::exit`].
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(64 * 1024),
            instructions: Vec::with_capacity(4 * 1024),
            force_full: true,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(EnableMouseCapture)?;
        self.buf.queue(EnableBracketedPaste)?;
        self.flush_buf()?;
        self.force_full = true;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(DisableBracketedPaste)?;
        self.buf.queue(DisableMouseCapture)?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    pub fn invalidate(&mut self) {
        self.force_full = true;
    }

    /// Instructions produced by the last draw.
    pub fn last_instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Flush the frame produced by the last [`Root::render`].
    ///
    /// Must be called once after every render: the diff assumes the terminal
    /// shows the root's previous buffers. Returns the number of instructions.
    pub fn draw(&mut self, root: &mut Root) -> Result<usize> {
        let full = std::mem::take(&mut self.force_full) | root.take_resized();
        let next = Frame::new(root.canvas(), root.colors());
        if full {
            debug!(size = ?next.size(), "full repaint");
            full_into(next, &mut self.instructions);
        } else {
            let prev = Frame::new(root.last_canvas(), root.last_colors());
            diff_into(prev, next, &mut self.instructions);
        }

        if self.instructions.is_empty() {
            return Ok(0);
        }
        self.buf.clear();
        encode_into(&self.instructions, &mut self.buf)?;
        self.flush_buf()?;
        Ok(self.instructions.len())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode instructions as crossterm commands into `out`.
///
/// Colors and attributes are reset at the end so the terminal is left in a
/// known state between frames.
pub fn encode_into(instructions: &[Instruction], out: &mut Vec<u8>) -> Result<()> {
    for instruction in instructions {
        match *instruction {
            Instruction::Clear => {
                out.queue(terminal::Clear(terminal::ClearType::All))?;
            }
            Instruction::MoveTo { row, col } => {
                out.queue(cursor::MoveTo(col, row))?;
            }
            Instruction::SetStyle(style) => apply_style_into(out, style)?,
            Instruction::Print(ch) => {
                out.queue(Print(ch))?;
            }
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    // SGR reset clears colors too, so it goes first.
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.colors.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.colors.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        out.queue(SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        out.queue(SetAttribute(Attribute::Underlined))?;
    }
    if style.strikethrough {
        out.queue(SetAttribute(Attribute::CrossedOut))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
