//! Plain text widget and text measurement.

use unicode_width::UnicodeWidthStr;

use crate::behavior::{Behavior, WidgetCtx};
use crate::tree::Node;
use crate::types::{Point, Size, TextStyle};

/// Rows and display columns needed to show `text`.
pub fn text_size(text: &str) -> Size {
    let mut rows = 0u16;
    let mut cols = 0u16;
    for line in text.lines() {
        rows = rows.saturating_add(1);
        cols = cols.max(u16::try_from(UnicodeWidthStr::width(line)).unwrap_or(u16::MAX));
    }
    Size::new(rows, cols)
}

/// Static text. Content is redrawn from the stored string after every resize.
#[derive(Debug, Clone, Default)]
pub struct Text {
    content: String,
    style: TextStyle,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: TextStyle::default(),
        }
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, node: &mut Node, content: impl Into<String>) {
        self.content = content.into();
        self.render(node);
    }

    fn render(&self, node: &mut Node) {
        node.clear();
        node.add_str(Point::ORIGIN, &self.content, self.style);
    }
}

impl Behavior for Text {
    fn on_size(&mut self, ctx: &mut WidgetCtx<'_>) {
        if let Some(node) = ctx.node_mut() {
            self.render(node);
        }
    }
}
