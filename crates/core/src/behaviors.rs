//! Reusable input components that widgets hold as fields.
//!
//! These are plain state machines. A widget owns one (or several), forwards
//! the relevant events to it from its [`crate::Behavior`] hooks and repaints
//! according to what comes back.

use std::cell::RefCell;
use std::rc::Rc;

use arrayvec::ArrayVec;

use crate::tree::WidgetId;
use crate::types::{MouseButton, MouseEvent, MouseEventKind};

/// Visual state of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Hover,
    Down,
}

/// What a mouse event did to a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonOutcome {
    /// The event did not concern this button.
    Ignored,
    /// Consumed; the state may have changed.
    Consumed { changed: bool },
    /// The button was pressed and released over the widget.
    Released,
}

impl ButtonOutcome {
    pub fn consumed(self) -> bool {
        !matches!(self, ButtonOutcome::Ignored)
    }
}

/// Normal / hover / down state machine driven by mouse events.
///
/// Only events over the widget reach it; leaving is reported through
/// [`ButtonBehavior::pointer_left`].
#[derive(Debug, Clone, Default)]
pub struct ButtonBehavior {
    state: ButtonState,
}

impl ButtonBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn on_mouse(&mut self, event: MouseEvent) -> ButtonOutcome {
        let before = self.state;
        match (event.kind, event.button) {
            (MouseEventKind::Press, MouseButton::Left) => {
                self.state = ButtonState::Down;
            }
            (MouseEventKind::Release, _) if before == ButtonState::Down => {
                self.state = ButtonState::Hover;
                return ButtonOutcome::Released;
            }
            (MouseEventKind::Move, _) | (MouseEventKind::Release, _) => {
                if before == ButtonState::Normal {
                    self.state = ButtonState::Hover;
                }
            }
            _ => return ButtonOutcome::Ignored,
        }
        ButtonOutcome::Consumed {
            changed: self.state != before,
        }
    }

    /// The pointer moved off the widget. Returns whether the state changed.
    pub fn pointer_left(&mut self) -> bool {
        let changed = self.state != ButtonState::Normal;
        self.state = ButtonState::Normal;
        changed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    On,
    #[default]
    Off,
}

impl ToggleState {
    pub fn flipped(self) -> Self {
        match self {
            ToggleState::On => ToggleState::Off,
            ToggleState::Off => ToggleState::On,
        }
    }
}

#[derive(Debug)]
struct GroupInner {
    allow_no_selection: bool,
    selected: Option<WidgetId>,
    members: Vec<WidgetId>,
}

/// Radio-button group: at most one member is on.
///
/// Unless `allow_no_selection` is set, once a member is on the group always
/// keeps one member on. Cloning shares the group.
#[derive(Debug, Clone)]
pub struct ToggleGroup {
    inner: Rc<RefCell<GroupInner>>,
}

impl ToggleGroup {
    pub fn new(allow_no_selection: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(GroupInner {
                allow_no_selection,
                selected: None,
                members: Vec::new(),
            })),
        }
    }

    pub fn allow_no_selection(&self) -> bool {
        self.inner.borrow().allow_no_selection
    }

    pub fn selected(&self) -> Option<WidgetId> {
        self.inner.borrow().selected
    }

    pub fn members(&self) -> Vec<WidgetId> {
        self.inner.borrow().members.clone()
    }
}

/// A state change produced by toggling: `(widget, new state)`.
pub type ToggleChange = (WidgetId, ToggleState);

/// On/off state, optionally shared with a [`ToggleGroup`].
///
/// Without a group this is a checkbox; with one it is a radio button.
#[derive(Debug, Clone, Default)]
pub struct ToggleBehavior {
    state: ToggleState,
    group: Option<ToggleGroup>,
}

impl ToggleBehavior {
    pub fn new(state: ToggleState) -> Self {
        Self { state, group: None }
    }

    pub fn grouped(state: ToggleState, group: ToggleGroup) -> Self {
        Self {
            state,
            group: Some(group),
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub fn group(&self) -> Option<&ToggleGroup> {
        self.group.as_ref()
    }

    /// Set the state without consulting the group. Used to apply changes
    /// reported by another member's [`ToggleBehavior::toggle`].
    pub fn set_state(&mut self, state: ToggleState) {
        self.state = state;
    }

    /// Register `id` with the group. Returns changes to apply to other members.
    ///
    /// A member joining in the on state switches the current selection off. The
    /// first member of a group that requires a selection is switched on.
    pub fn join(&mut self, id: WidgetId) -> ArrayVec<ToggleChange, 2> {
        let mut changes = ArrayVec::new();
        let Some(group) = &self.group else {
            return changes;
        };
        let mut g = group.inner.borrow_mut();
        if !g.members.contains(&id) {
            g.members.push(id);
        }
        if self.state == ToggleState::Off && g.selected.is_none() && !g.allow_no_selection {
            self.state = ToggleState::On;
        }
        if self.state == ToggleState::On {
            if let Some(prev) = g.selected.replace(id).filter(|&p| p != id) {
                changes.push((prev, ToggleState::Off));
            }
        }
        changes
    }

    /// Unregister `id`. Clears the selection if `id` held it.
    pub fn leave(&mut self, id: WidgetId) {
        if let Some(group) = &self.group {
            let mut g = group.inner.borrow_mut();
            g.members.retain(|&m| m != id);
            if g.selected == Some(id) {
                g.selected = None;
            }
        }
    }

    /// Toggle `id` as if it was clicked.
    ///
    /// Own state is updated in place. The returned list holds every change,
    /// own first, so the caller can repaint and switch off the previous
    /// selection. Empty when nothing changed.
    pub fn toggle(&mut self, id: WidgetId) -> ArrayVec<ToggleChange, 2> {
        let mut changes = ArrayVec::new();
        let Some(group) = &self.group else {
            self.state = self.state.flipped();
            changes.push((id, self.state));
            return changes;
        };

        let mut g = group.inner.borrow_mut();
        match self.state {
            ToggleState::On => {
                if g.allow_no_selection {
                    self.state = ToggleState::Off;
                    g.selected = None;
                    changes.push((id, ToggleState::Off));
                }
            }
            ToggleState::Off => {
                self.state = ToggleState::On;
                changes.push((id, ToggleState::On));
                if let Some(prev) = g.selected.replace(id).filter(|&p| p != id) {
                    changes.push((prev, ToggleState::Off));
                }
            }
        }
        changes
    }
}
