//! Padded text panel.

use crate::behavior::{Behavior, WidgetCtx};
use crate::error::GeometryError;
use crate::theme::Theme;
use crate::tree::Node;
use crate::types::{ColorPair, Point, Size, TextStyle};

use super::text_size;

/// Multi-line text inside a padded, themed panel.
///
/// Text outside the padded interior is clipped. Size the widget with
/// [`TextPanel::min_size`] to show all of it.
#[derive(Debug, Clone)]
pub struct TextPanel {
    text: String,
    padding_y: u16,
    padding_x: u16,
    color: ColorPair,
}

fn check_padding(p: i32) -> Result<u16, GeometryError> {
    if p < 0 {
        return Err(GeometryError::NegativePadding(p));
    }
    Ok(u16::try_from(p).unwrap_or(u16::MAX))
}

impl TextPanel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            padding_y: 1,
            padding_x: 1,
            color: Theme::default().panel,
        }
    }

    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.color = theme.panel;
        self
    }

    pub fn with_padding(mut self, padding_y: i32, padding_x: i32) -> Result<Self, GeometryError> {
        self.padding_y = check_padding(padding_y)?;
        self.padding_x = check_padding(padding_x)?;
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `(padding_y, padding_x)`
    pub fn padding(&self) -> (u16, u16) {
        (self.padding_y, self.padding_x)
    }

    /// Change padding. Negative values are rejected and nothing changes.
    pub fn set_padding(&mut self, node: &mut Node, padding_y: i32, padding_x: i32) -> Result<(), GeometryError> {
        let y = check_padding(padding_y)?;
        let x = check_padding(padding_x)?;
        self.padding_y = y;
        self.padding_x = x;
        self.render(node);
        Ok(())
    }

    pub fn set_text(&mut self, node: &mut Node, text: impl Into<String>) {
        self.text = text.into();
        self.render(node);
    }

    pub fn set_theme(&mut self, node: &mut Node, theme: &Theme) {
        self.color = theme.panel;
        self.render(node);
    }

    /// Smallest size that shows all text with the current padding.
    pub fn min_size(&self) -> Size {
        let text = text_size(&self.text);
        Size::new(
            text.height.saturating_add(self.padding_y.saturating_mul(2)),
            text.width.saturating_add(self.padding_x.saturating_mul(2)),
        )
    }

    fn render(&self, node: &mut Node) {
        node.set_default_color_pair(self.color);
        node.clear();

        let size = node.size();
        let inner_rows = size.height.saturating_sub(self.padding_y.saturating_mul(2)) as usize;
        let inner_cols = size.width.saturating_sub(self.padding_x.saturating_mul(2)) as usize;
        for (i, line) in self.text.lines().take(inner_rows).enumerate() {
            let clipped: String = line.chars().take(inner_cols).collect();
            node.add_str(
                Point::new(self.padding_y as i32 + i as i32, self.padding_x as i32),
                &clipped,
                TextStyle::default(),
            );
        }
    }
}

impl Behavior for TextPanel {
    fn on_size(&mut self, ctx: &mut WidgetCtx<'_>) {
        if let Some(node) = ctx.node_mut() {
            self.render(node);
        }
    }
}
