//! Core types module - shared value types and constants
//!
//! This module defines the fundamental types used throughout the toolkit.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (tree, compositor, terminal output, input mapping).
//!
//! # Coordinates
//!
//! The toolkit works on terminal cells, never pixels:
//!
//! - **Point**: `(row, col)`, signed so that offset math may go negative transiently
//! - **Size**: `(height, width)`, always non-negative
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FPS` | 60 | Frame rate of the compositor timer |
//! | `MAX_FPS` | 240 | Largest accepted frame rate |
//! | `DEFAULT_STATIC_REFRESH_MS` | 250 | Re-render interval for an unchanged tree |
//!
//! # Examples
//!
//! ```
//! use tui_stage_types::{Anchor, Point, Size, SizeHint};
//!
//! let pos = Point::new(2, 3);
//! let size = Size::new(5, 10);
//! assert_eq!(pos + Point::new(1, 1), Point::new(3, 4));
//! assert_eq!(size.area(), 50);
//!
//! let hint = SizeHint::new(None, Some(0.5));
//! assert!(hint.height.is_none());
//! assert_eq!(Anchor::default(), Anchor::TopLeft);
//! ```

use std::ops::{Add, Sub};

/// Default compositor frame rate.
pub const DEFAULT_FPS: u32 = 60;

/// Largest accepted frame rate.
pub const MAX_FPS: u32 = 240;

/// How often an unchanged tree is re-rendered anyway (milliseconds).
pub const DEFAULT_STATIC_REFRESH_MS: u64 = 250;

/// Blank used for cleared cells.
pub const BLANK: char = ' ';

/// A cell position, `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl From<(i32, i32)> for Point {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// A widget or screen size, `(height, width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub height: u16,
    pub width: u16,
}

impl Size {
    pub const fn new(height: u16, width: u16) -> Self {
        Self { height, width }
    }

    pub fn area(&self) -> usize {
        (self.height as usize) * (self.width as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Center in local coordinates (rounded down).
    pub fn center(&self) -> Point {
        Point::new((self.height / 2) as i32, (self.width / 2) as i32)
    }
}

impl From<(u16, u16)> for Size {
    fn from((height, width): (u16, u16)) -> Self {
        Self::new(height, width)
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Foreground and background color of a cell (6 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorPair {
    pub fg: Rgb,
    pub bg: Rgb,
}

impl ColorPair {
    pub const WHITE_ON_BLACK: ColorPair = ColorPair::new(Rgb::WHITE, Rgb::BLACK);

    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self { fg, bg }
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self::WHITE_ON_BLACK
    }
}

/// A character plus its text attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyledChar {
    pub ch: char,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl StyledChar {
    pub const fn plain(ch: char) -> Self {
        Self {
            ch,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == BLANK
    }

    /// Copy of `self` with the attributes of `style` and the character of `self`.
    pub fn with_style(self, style: TextStyle) -> Self {
        Self {
            ch: self.ch,
            bold: style.bold,
            italic: style.italic,
            underline: style.underline,
            strikethrough: style.strikethrough,
        }
    }
}

impl Default for StyledChar {
    fn default() -> Self {
        Self::plain(BLANK)
    }
}

impl From<char> for StyledChar {
    fn from(ch: char) -> Self {
        Self::plain(ch)
    }
}

/// Text attributes without a character; used when writing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl TextStyle {
    pub const BOLD: TextStyle = TextStyle {
        bold: true,
        italic: false,
        underline: false,
        strikethrough: false,
    };
}

/// The point of a widget that is attached to its position hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    /// Offset of the anchor point inside a widget of `size`, in local coordinates.
    pub fn offset(&self, size: Size) -> Point {
        let h = size.height as i32;
        let w = size.width as i32;
        let c = size.center();
        match self {
            Anchor::TopLeft => Point::new(0, 0),
            Anchor::Top => Point::new(0, c.col),
            Anchor::TopRight => Point::new(0, w),
            Anchor::Left => Point::new(c.row, 0),
            Anchor::Center => c,
            Anchor::Right => Point::new(c.row, w),
            Anchor::BottomLeft => Point::new(h, 0),
            Anchor::Bottom => Point::new(h, c.col),
            Anchor::BottomRight => Point::new(h, w),
        }
    }
}

/// Size as a proportion of the parent's size.
///
/// `None` on an axis means the explicit size is used for that axis.
/// Min/max bounds only apply to hinted axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeHint {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub min_height: u16,
    pub max_height: Option<u16>,
    pub min_width: u16,
    pub max_width: Option<u16>,
}

impl SizeHint {
    pub const NONE: SizeHint = SizeHint {
        height: None,
        width: None,
        min_height: 0,
        max_height: None,
        min_width: 0,
        max_width: None,
    };

    pub fn new(height: Option<f64>, width: Option<f64>) -> Self {
        Self {
            height,
            width,
            ..Self::NONE
        }
    }

    pub fn with_height_bounds(mut self, min: u16, max: Option<u16>) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    pub fn with_width_bounds(mut self, min: u16, max: Option<u16>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    pub fn is_none(&self) -> bool {
        self.height.is_none() && self.width.is_none()
    }
}

/// Position as a proportion of the parent's size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PosHint {
    pub y: Option<f64>,
    pub x: Option<f64>,
}

impl PosHint {
    pub const NONE: PosHint = PosHint { y: None, x: None };

    pub fn new(y: Option<f64>, x: Option<f64>) -> Self {
        Self { y, x }
    }

    pub fn is_none(&self) -> bool {
        self.y.is_none() && self.x.is_none()
    }
}

/// Mouse event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Press,
    Release,
    Move,
    ScrollUp,
    ScrollDown,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    None,
}

/// A mouse event in absolute (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub pos: Point,
    pub kind: MouseEventKind,
    pub button: MouseButton,
}

impl MouseEvent {
    pub const fn new(pos: Point, kind: MouseEventKind, button: MouseButton) -> Self {
        Self { pos, kind, button }
    }
}

/// Key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mods {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: Mods,
}

impl KeyEvent {
    pub const fn new(key: Key, mods: Mods) -> Self {
        Self { key, mods }
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key, Mods::default())
    }
}

/// Everything the event loop can deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    Resize(Size),
}
