//! Widget behavior: the capability interface a concrete widget implements.
//!
//! A node in the tree owns geometry and buffers. Everything widget-specific
//! (custom painting, input handling, reacting to resizes) lives in an optional
//! boxed [`Behavior`]. Widgets compose smaller components such as
//! [`crate::behaviors::ButtonBehavior`] rather than inheriting them.

use std::any::Any;

use crate::paint::PaintTarget;
use crate::tree::{Node, WidgetId, WidgetTree};
use crate::types::{KeyEvent, MouseEvent};

/// Downcasting support for boxed behaviors.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Access to the tree while one widget's behavior is running.
///
/// The running behavior is detached from its node for the duration of the
/// call, so the node itself may be freely borrowed through this context.
pub struct WidgetCtx<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
}

impl<'a> WidgetCtx<'a> {
    pub(crate) fn new(tree: &'a mut WidgetTree, id: WidgetId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The widget's node. `None` only if the behavior removed its own widget.
    pub fn node(&self) -> Option<&Node> {
        self.tree.node(self.id)
    }

    pub fn node_mut(&mut self) -> Option<&mut Node> {
        self.tree.node_mut(self.id)
    }

    pub fn tree(&self) -> &WidgetTree {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        self.tree
    }
}

/// Hooks invoked by the tree, the compositor and input dispatch.
///
/// Every method has a default, so a behavior only implements what it needs.
pub trait Behavior: AsAny {
    /// Paint into the granted region. The default blits the node's buffers.
    fn paint(&mut self, node: &Node, target: &mut PaintTarget<'_>) {
        target.blit(node);
    }

    /// Called after the node's size changed and its buffers were reallocated.
    fn on_size(&mut self, _ctx: &mut WidgetCtx<'_>) {}

    /// Called after the widget was attached to the tree.
    fn on_add(&mut self, _ctx: &mut WidgetCtx<'_>) {}

    /// Called before the widget is detached from the tree.
    fn on_remove(&mut self, _ctx: &mut WidgetCtx<'_>) {}

    /// Return `true` to consume the key.
    fn on_key(&mut self, _ctx: &mut WidgetCtx<'_>, _event: KeyEvent) -> bool {
        false
    }

    /// Return `true` to consume the mouse event.
    fn on_mouse(&mut self, _ctx: &mut WidgetCtx<'_>, _event: MouseEvent) -> bool {
        false
    }

    fn on_paste(&mut self, _ctx: &mut WidgetCtx<'_>, _text: &str) -> bool {
        false
    }

    /// The pointer moved off this widget onto another one.
    fn on_pointer_leave(&mut self, _ctx: &mut WidgetCtx<'_>) {}
}
