//! Checkbox and radio button widget.

use crate::behavior::{Behavior, WidgetCtx};
use crate::behaviors::{
    ButtonBehavior, ButtonOutcome, ButtonState, ToggleBehavior, ToggleChange, ToggleGroup, ToggleState,
};
use crate::theme::Theme;
use crate::tree::{Node, WidgetId};
use crate::types::{MouseEvent, Point, TextStyle};

pub const CHECK_OFF: &str = "□ ";
pub const CHECK_ON: &str = "▣ ";
pub const RADIO_OFF: &str = "◯ ";
pub const RADIO_ON: &str = "◉ ";

/// Called with the button's id and new state whenever its toggle state changes.
pub type ToggleCallback = Box<dyn FnMut(WidgetId, ToggleState)>;

/// A labelled checkbox, or a radio button when created with a group.
pub struct ToggleButton {
    label: String,
    button: ButtonBehavior,
    toggle: ToggleBehavior,
    theme: Theme,
    callback: Option<ToggleCallback>,
}

impl ToggleButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            button: ButtonBehavior::new(),
            toggle: ToggleBehavior::new(ToggleState::Off),
            theme: Theme::default(),
            callback: None,
        }
    }

    pub fn grouped(label: impl Into<String>, group: ToggleGroup) -> Self {
        Self {
            toggle: ToggleBehavior::grouped(ToggleState::Off, group),
            ..Self::new(label)
        }
    }

    /// Initial state. In a group that requires a selection, the first member
    /// is switched on regardless.
    pub fn with_state(mut self, state: ToggleState) -> Self {
        self.toggle.set_state(state);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn on_toggle(mut self, callback: impl FnMut(WidgetId, ToggleState) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle.state()
    }

    pub fn button_state(&self) -> ButtonState {
        self.button.state()
    }

    pub fn set_label(&mut self, node: &mut Node, label: impl Into<String>) {
        self.label = label.into();
        self.repaint(node);
    }

    fn prefix(&self) -> &'static str {
        match (self.toggle.group().is_some(), self.toggle.state()) {
            (false, ToggleState::Off) => CHECK_OFF,
            (false, ToggleState::On) => CHECK_ON,
            (true, ToggleState::Off) => RADIO_OFF,
            (true, ToggleState::On) => RADIO_ON,
        }
    }

    fn repaint(&self, node: &mut Node) {
        let color = match self.button.state() {
            ButtonState::Normal => self.theme.button_normal,
            ButtonState::Hover => self.theme.button_hover,
            ButtonState::Down => self.theme.button_press,
        };
        node.set_default_color_pair(color);
        node.clear();
        let row = node.size().center().row;
        let text = format!("{}{}", self.prefix(), self.label);
        node.add_str(Point::new(row, 0), &text, TextStyle::default());
    }

    fn notify(&mut self, id: WidgetId) {
        let state = self.toggle.state();
        if let Some(cb) = self.callback.as_mut() {
            cb(id, state);
        }
    }

    fn repaint_self(&self, ctx: &mut WidgetCtx<'_>) {
        if let Some(node) = ctx.node_mut() {
            self.repaint(node);
        }
    }

    /// Apply `changes` made by this button's toggle: notify self, and push
    /// the new state into the other group members.
    fn apply(&mut self, ctx: &mut WidgetCtx<'_>, changes: &[ToggleChange]) {
        let me = ctx.id();
        for &(id, state) in changes {
            if id == me {
                self.notify(me);
                continue;
            }
            ctx.tree_mut().with_widget::<ToggleButton, _>(id, |other, node| {
                other.toggle.set_state(state);
                other.repaint(node);
                other.notify(id);
            });
        }
    }
}

impl Behavior for ToggleButton {
    fn on_add(&mut self, ctx: &mut WidgetCtx<'_>) {
        let changes = self.toggle.join(ctx.id());
        self.apply(ctx, &changes);
        self.repaint_self(ctx);
    }

    fn on_remove(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.toggle.leave(ctx.id());
    }

    fn on_size(&mut self, ctx: &mut WidgetCtx<'_>) {
        self.repaint_self(ctx);
    }

    fn on_mouse(&mut self, ctx: &mut WidgetCtx<'_>, event: MouseEvent) -> bool {
        match self.button.on_mouse(event) {
            ButtonOutcome::Ignored => false,
            ButtonOutcome::Consumed { changed } => {
                if changed {
                    self.repaint_self(ctx);
                }
                true
            }
            ButtonOutcome::Released => {
                let changes = self.toggle.toggle(ctx.id());
                self.apply(ctx, &changes);
                self.repaint_self(ctx);
                true
            }
        }
    }

    fn on_pointer_leave(&mut self, ctx: &mut WidgetCtx<'_>) {
        if self.button.pointer_left() {
            self.repaint_self(ctx);
        }
    }
}
