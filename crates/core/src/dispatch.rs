//! Input dispatch: topmost widget first, stopping at the first consumer.

use crate::region::Rect;
use crate::tree::{WidgetId, WidgetTree};
use crate::types::{InputEvent, KeyEvent, MouseEvent, Point};

impl WidgetTree {
    /// Enabled widgets with their absolute rectangles, topmost first.
    ///
    /// Disabled widgets and their subtrees are skipped. Invisible widgets
    /// are still listed.
    pub fn dispatch_order(&self) -> Vec<(WidgetId, Rect)> {
        let mut pre = Vec::new();
        let root = self.root();
        let mut stack = vec![(root, Point::ORIGIN)];
        while let Some((id, abs)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if id != root {
                if !node.is_enabled() {
                    continue;
                }
                pre.push((id, Rect::new(abs, node.size())));
            }
            for &child in node.children().iter().rev() {
                if let Some(c) = self.node(child) {
                    stack.push((child, abs + c.pos()));
                }
            }
        }
        pre.reverse();
        pre
    }

    /// Route any input event. Resize events are not handled here (see `Root::resize`).
    pub fn dispatch(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.dispatch_key(*key),
            InputEvent::Mouse(mouse) => self.dispatch_mouse(*mouse),
            InputEvent::Paste(text) => self.dispatch_paste(text),
            InputEvent::Resize(_) => false,
        }
    }

    /// Offer a key to every enabled widget, topmost first.
    pub fn dispatch_key(&mut self, key: KeyEvent) -> bool {
        for (id, _) in self.dispatch_order() {
            if self.with_behavior(id, |b, ctx| b.on_key(ctx, key)) == Some(true) {
                return true;
            }
        }
        false
    }

    pub fn dispatch_paste(&mut self, text: &str) -> bool {
        for (id, _) in self.dispatch_order() {
            if self.with_behavior(id, |b, ctx| b.on_paste(ctx, text)) == Some(true) {
                return true;
            }
        }
        false
    }

    /// Offer a mouse event to enabled widgets under the pointer, topmost first.
    ///
    /// When the topmost widget under the pointer changes, the previous one gets
    /// `on_pointer_leave` before the event is dispatched.
    pub fn dispatch_mouse(&mut self, event: MouseEvent) -> bool {
        let hits: Vec<WidgetId> = self
            .dispatch_order()
            .into_iter()
            .filter(|(_, rect)| rect.contains(event.pos))
            .map(|(id, _)| id)
            .collect();

        let top = hits.first().copied();
        if self.hovered != top {
            if let Some(prev) = self.hovered.take() {
                self.with_behavior(prev, |b, ctx| b.on_pointer_leave(ctx));
            }
            self.hovered = top;
        }

        for id in hits {
            if self.with_behavior(id, |b, ctx| b.on_mouse(ctx, event)) == Some(true) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::behavior::{Behavior, WidgetCtx};
    use crate::tree::WidgetBuilder;
    use crate::types::{Key, MouseButton, MouseEventKind, Size};

    type Log = Rc<RefCell<Vec<(&'static str, &'static str)>>>;

    struct Recorder {
        name: &'static str,
        consume: bool,
        log: Log,
    }

    impl Behavior for Recorder {
        fn on_key(&mut self, _ctx: &mut WidgetCtx<'_>, _event: KeyEvent) -> bool {
            self.log.borrow_mut().push((self.name, "key"));
            self.consume
        }

        fn on_mouse(&mut self, _ctx: &mut WidgetCtx<'_>, _event: MouseEvent) -> bool {
            self.log.borrow_mut().push((self.name, "mouse"));
            self.consume
        }

        fn on_pointer_leave(&mut self, _ctx: &mut WidgetCtx<'_>) {
            self.log.borrow_mut().push((self.name, "leave"));
        }
    }

    fn recorder(name: &'static str, consume: bool, log: &Log) -> Recorder {
        Recorder {
            name,
            consume,
            log: log.clone(),
        }
    }

    fn click(row: i32, col: i32) -> MouseEvent {
        MouseEvent::new(Point::new(row, col), MouseEventKind::Press, MouseButton::Left)
    }

    #[test]
    fn topmost_consumer_stops_propagation() {
        let log: Log = Default::default();
        let mut t = WidgetTree::new(Size::new(10, 10));
        let root = t.root();
        t.add_widget(root, WidgetBuilder::new().size((5, 5)).behavior(recorder("below", true, &log)))
            .unwrap();
        t.add_widget(root, WidgetBuilder::new().size((5, 5)).behavior(recorder("above", true, &log)))
            .unwrap();

        assert!(t.dispatch_mouse(click(1, 1)));
        assert_eq!(log.borrow().as_slice(), &[("above", "mouse")]);
    }

    #[test]
    fn unconsumed_event_falls_through_and_misses_are_skipped() {
        let log: Log = Default::default();
        let mut t = WidgetTree::new(Size::new(10, 10));
        let root = t.root();
        t.add_widget(root, WidgetBuilder::new().size((5, 5)).behavior(recorder("below", false, &log)))
            .unwrap();
        t.add_widget(root, WidgetBuilder::new().size((5, 5)).behavior(recorder("above", false, &log)))
            .unwrap();
        t.add_widget(
            root,
            WidgetBuilder::new().pos((6, 6)).size((2, 2)).behavior(recorder("far", true, &log)),
        )
        .unwrap();

        assert!(!t.dispatch_mouse(click(1, 1)));
        assert_eq!(log.borrow().as_slice(), &[("above", "mouse"), ("below", "mouse")]);
    }

    #[test]
    fn disabled_subtree_is_not_dispatched_but_invisible_is() {
        let log: Log = Default::default();
        let mut t = WidgetTree::new(Size::new(10, 10));
        let root = t.root();
        let off = t
            .add_widget(root, WidgetBuilder::new().size((5, 5)).enabled(false))
            .unwrap();
        t.add_widget(off, WidgetBuilder::new().size((5, 5)).behavior(recorder("child", true, &log)))
            .unwrap();
        t.add_widget(
            root,
            WidgetBuilder::new().visible(false).behavior(recorder("hidden", false, &log)),
        )
        .unwrap();

        assert!(!t.dispatch_key(KeyEvent::from(Key::Enter)));
        assert_eq!(log.borrow().as_slice(), &[("hidden", "key")]);
    }

    #[test]
    fn pointer_leave_fires_when_topmost_changes() {
        let log: Log = Default::default();
        let mut t = WidgetTree::new(Size::new(10, 10));
        let root = t.root();
        t.add_widget(root, WidgetBuilder::new().size((2, 2)).behavior(recorder("a", true, &log)))
            .unwrap();
        t.add_widget(
            root,
            WidgetBuilder::new().pos((5, 5)).size((2, 2)).behavior(recorder("b", true, &log)),
        )
        .unwrap();

        let mv = |row, col| MouseEvent::new(Point::new(row, col), MouseEventKind::Move, MouseButton::None);
        t.dispatch_mouse(mv(0, 0));
        t.dispatch_mouse(mv(1, 1));
        t.dispatch_mouse(mv(5, 5));
        assert_eq!(
            log.borrow().as_slice(),
            &[("a", "mouse"), ("a", "mouse"), ("a", "leave"), ("b", "mouse")]
        );
    }
}
