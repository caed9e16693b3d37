//! WidgetTree: an arena of widget nodes with generational ids.
//!
//! Parents own their children: removing a widget frees its whole subtree, and
//! every id into that subtree stops resolving. Geometry setters re-run hint
//! resolution parent-first (see [`crate::layout`]) and reallocate the buffers
//! of every node whose size changed.

use tracing::debug;

use crate::behavior::{Behavior, WidgetCtx};
use crate::error::GeometryError;
use crate::grid::{Canvas, ColorGrid};
use crate::layout;
use crate::region::{Rect, Region};
use crate::types::{Anchor, ColorPair, Point, PosHint, Size, SizeHint, StyledChar, TextStyle};

/// Handle to a widget in a [`WidgetTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId {
    index: u32,
    generation: u32,
}

/// A widget node: geometry, flags, local buffers, tree links.
pub struct Node {
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    pos: Point,
    size: Size,
    size_hint: SizeHint,
    pos_hint: PosHint,
    anchor: Anchor,
    is_enabled: bool,
    is_visible: bool,
    is_transparent: bool,
    default_char: StyledChar,
    default_color_pair: ColorPair,
    canvas: Canvas,
    colors: ColorGrid,
    pub(crate) region: Region,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl Node {
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn pos(&self) -> Point {
        self.pos
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

    pub fn size_hint(&self) -> SizeHint {
        self.size_hint
    }

    pub fn pos_hint(&self) -> PosHint {
        self.pos_hint
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn is_transparent(&self) -> bool {
        self.is_transparent
    }

    pub fn default_char(&self) -> StyledChar {
        self.default_char
    }

    pub fn default_color_pair(&self) -> ColorPair {
        self.default_color_pair
    }

    /// Cells this widget was granted in the last render pass (absolute coordinates).
    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn colors(&self) -> &ColorGrid {
        &self.colors
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn colors_mut(&mut self) -> &mut ColorGrid {
        &mut self.colors
    }

    /// Canvas and colors at once, for widgets that paint both.
    pub fn buffers_mut(&mut self) -> (&mut Canvas, &mut ColorGrid) {
        (&mut self.canvas, &mut self.colors)
    }

    /// Write `text` into the local canvas at `pos` (local coordinates).
    pub fn add_str(&mut self, pos: Point, text: &str, style: TextStyle) {
        self.canvas.put_str(pos, text, style);
    }

    /// Reset both buffers to the default fill.
    pub fn clear(&mut self) {
        self.canvas.fill(self.default_char);
        self.colors.fill(self.default_color_pair);
    }

    pub fn set_default_color_pair(&mut self, color: ColorPair) {
        self.default_color_pair = color;
    }

    pub fn set_default_char(&mut self, ch: StyledChar) {
        self.default_char = ch;
    }

    pub fn local_rect(&self) -> Rect {
        Rect::new(Point::ORIGIN, self.size)
    }

    fn realloc(&mut self) {
        self.canvas.reset(self.size, self.default_char);
        self.colors.reset(self.size, self.default_color_pair);
    }
}

/// Everything needed to create a widget.
pub struct WidgetBuilder {
    pos: Point,
    size: Size,
    size_hint: SizeHint,
    pos_hint: PosHint,
    anchor: Anchor,
    is_enabled: bool,
    is_visible: bool,
    is_transparent: bool,
    default_char: StyledChar,
    default_color_pair: ColorPair,
    behavior: Option<Box<dyn Behavior>>,
}

impl Default for WidgetBuilder {
    fn default() -> Self {
        Self {
            pos: Point::ORIGIN,
            size: Size::new(10, 10),
            size_hint: SizeHint::NONE,
            pos_hint: PosHint::NONE,
            anchor: Anchor::TopLeft,
            is_enabled: true,
            is_visible: true,
            is_transparent: false,
            default_char: StyledChar::default(),
            default_color_pair: ColorPair::default(),
            behavior: None,
        }
    }
}

impl WidgetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pos(mut self, pos: impl Into<Point>) -> Self {
        self.pos = pos.into();
        self
    }

    pub fn size(mut self, size: impl Into<Size>) -> Self {
        self.size = size.into();
        self
    }

    pub fn size_hint(mut self, hint: SizeHint) -> Self {
        self.size_hint = hint;
        self
    }

    pub fn pos_hint(mut self, hint: PosHint) -> Self {
        self.pos_hint = hint;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    pub fn transparent(mut self, transparent: bool) -> Self {
        self.is_transparent = transparent;
        self
    }

    pub fn default_char(mut self, ch: impl Into<StyledChar>) -> Self {
        self.default_char = ch.into();
        self
    }

    pub fn default_color_pair(mut self, color: ColorPair) -> Self {
        self.default_color_pair = color;
        self
    }

    pub fn behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed widget tree with a single root.
pub struct WidgetTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: WidgetId,
    generation: u64,
    pub(crate) hovered: Option<WidgetId>,
    removed: Vec<WidgetId>,
}

impl WidgetTree {
    /// Create a tree whose root node has `size`.
    pub fn new(size: Size) -> Self {
        let root_node = Node {
            parent: None,
            children: Vec::new(),
            pos: Point::ORIGIN,
            size,
            size_hint: SizeHint::NONE,
            pos_hint: PosHint::NONE,
            anchor: Anchor::TopLeft,
            is_enabled: true,
            is_visible: true,
            is_transparent: false,
            default_char: StyledChar::default(),
            default_color_pair: ColorPair::default(),
            canvas: Canvas::new(Size::default(), StyledChar::default()),
            colors: ColorGrid::new(Size::default(), ColorPair::default()),
            region: Region::new(),
            behavior: None,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root_node),
            }],
            free: Vec::new(),
            root: WidgetId {
                index: 0,
                generation: 0,
            },
            generation: 0,
            hovered: None,
            removed: Vec::new(),
        }
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Bumped by every mutation; used to decide whether a frame is needed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark the tree as changed.
    pub fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Number of live widgets, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: WidgetId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    /// Mutable node access. Marks the tree as changed.
    pub fn node_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        self.touch();
        self.node_mut_untracked(id)
    }

    pub(crate) fn node_mut_untracked(&mut self, id: WidgetId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    fn expect_node(&self, id: WidgetId) -> Result<&Node, GeometryError> {
        self.node(id).ok_or(GeometryError::UnknownWidget(id))
    }

    fn expect_node_mut(&mut self, id: WidgetId) -> Result<&mut Node, GeometryError> {
        self.touch();
        self.node_mut_untracked(id)
            .ok_or(GeometryError::UnknownWidget(id))
    }

    // ---- creation / removal ----

    /// Create a widget from `builder` as the last (topmost) child of `parent`.
    pub fn add_widget(&mut self, parent: WidgetId, builder: WidgetBuilder) -> Result<WidgetId, GeometryError> {
        self.expect_node(parent)?;
        layout::validate_size_hint(&builder.size_hint)?;
        layout::validate_pos_hint(&builder.pos_hint)?;

        let node = Node {
            parent: Some(parent),
            children: Vec::new(),
            pos: builder.pos,
            size: builder.size,
            size_hint: builder.size_hint,
            pos_hint: builder.pos_hint,
            anchor: builder.anchor,
            is_enabled: builder.is_enabled,
            is_visible: builder.is_visible,
            is_transparent: builder.is_transparent,
            default_char: builder.default_char,
            default_color_pair: builder.default_color_pair,
            canvas: Canvas::new(Size::default(), builder.default_char),
            colors: ColorGrid::new(Size::default(), builder.default_color_pair),
            region: Region::new(),
            behavior: builder.behavior,
        };
        let id = self.alloc(node);
        if let Some(p) = self.node_mut_untracked(parent) {
            p.children.push(id);
        }
        self.touch();
        debug!(?id, ?parent, "widget added");

        self.place_new(id);
        self.with_behavior(id, |b, ctx| b.on_add(ctx));
        Ok(id)
    }

    /// Resolve geometry of a freshly attached node and give it its first `on_size`.
    fn place_new(&mut self, id: WidgetId) {
        self.resolve_geometry(id);
        if let Some(node) = self.node_mut_untracked(id) {
            node.realloc();
        }
        self.notify_resized(id);
    }

    fn alloc(&mut self, node: Node) -> WidgetId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            WidgetId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            WidgetId {
                index,
                generation: 0,
            }
        }
    }

    /// Remove a widget and its whole subtree.
    ///
    /// `on_remove` runs for every removed node, children first. Returns every
    /// removed id (the widget first) so owners can release per-widget state.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<Vec<WidgetId>, GeometryError> {
        if id == self.root {
            return Err(GeometryError::RootImmutable);
        }
        let parent = self.expect_node(id)?.parent;

        let mut subtree = vec![id];
        subtree.extend(self.walk(id));
        for &w in subtree.iter().rev() {
            self.with_behavior(w, |b, ctx| b.on_remove(ctx));
        }

        if let Some(p) = parent.and_then(|p| self.node_mut_untracked(p)) {
            p.children.retain(|&c| c != id);
        }
        for &w in &subtree {
            let slot = &mut self.slots[w.index as usize];
            if slot.generation == w.generation && slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(w.index);
            }
            if self.hovered == Some(w) {
                self.hovered = None;
            }
        }
        self.removed.extend_from_slice(&subtree);
        self.touch();
        debug!(?id, count = subtree.len(), "widget removed");
        Ok(subtree)
    }

    /// Remove every child subtree of `id`.
    pub fn remove_children(&mut self, id: WidgetId) -> Result<Vec<WidgetId>, GeometryError> {
        let children = self.expect_node(id)?.children.clone();
        let mut removed = Vec::new();
        for child in children {
            removed.extend(self.remove_widget(child)?);
        }
        Ok(removed)
    }

    /// Ids removed since the last call, including removals made by behaviors.
    pub fn drain_removed(&mut self) -> Vec<WidgetId> {
        std::mem::take(&mut self.removed)
    }

    /// Detach `id` from its parent and attach it as the topmost child of `new_parent`.
    pub fn reparent(&mut self, id: WidgetId, new_parent: WidgetId) -> Result<(), GeometryError> {
        if id == self.root {
            return Err(GeometryError::RootImmutable);
        }
        self.expect_node(new_parent)?;
        let old_parent = self.expect_node(id)?.parent;
        if new_parent == id || self.ancestors(new_parent).contains(&id) {
            return Err(GeometryError::Cycle {
                child: id,
                parent: new_parent,
            });
        }

        if let Some(p) = old_parent.and_then(|p| self.node_mut_untracked(p)) {
            p.children.retain(|&c| c != id);
        }
        if let Some(p) = self.node_mut_untracked(new_parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_mut_untracked(id) {
            n.parent = Some(new_parent);
        }
        self.touch();
        self.apply_hints(id);
        Ok(())
    }

    /// Move `id` to the end of its parent's children: drawn last, dispatched first.
    pub fn pull_to_front(&mut self, id: WidgetId) -> Result<(), GeometryError> {
        let parent = self.expect_node(id)?.parent;
        if let Some(p) = parent.and_then(|p| self.node_mut_untracked(p)) {
            p.children.retain(|&c| c != id);
            p.children.push(id);
        }
        self.touch();
        Ok(())
    }

    // ---- traversal ----

    /// Descendants of `id` in pre-order (parent before children, children in z-order).
    pub fn walk(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack: Vec<WidgetId> = match self.node(id) {
            Some(n) => n.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(w) = stack.pop() {
            out.push(w);
            if let Some(n) = self.node(w) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// [`Self::walk`] reversed: topmost widget first, children before their parent.
    pub fn walk_reverse(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = self.walk(id);
        out.reverse();
        out
    }

    /// Parent, grandparent, ... up to and including the root.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut cur = self.node(id).and_then(|n| n.parent);
        while let Some(p) = cur {
            out.push(p);
            cur = self.node(p).and_then(|n| n.parent);
        }
        out
    }

    // ---- coordinates ----

    /// Sum of local positions from the root down to `id`.
    pub fn absolute_pos(&self, id: WidgetId) -> Option<Point> {
        let node = self.node(id)?;
        if id == self.root {
            return Some(Point::ORIGIN);
        }
        let mut pos = node.pos;
        for a in self.ancestors(id) {
            if a == self.root {
                break;
            }
            pos = pos + self.node(a)?.pos;
        }
        Some(pos)
    }

    /// Absolute bounding rectangle.
    pub fn absolute_rect(&self, id: WidgetId) -> Option<Rect> {
        Some(Rect::new(self.absolute_pos(id)?, self.node(id)?.size))
    }

    /// Convert an absolute point into `id`'s local coordinates.
    pub fn to_local(&self, id: WidgetId, point: Point) -> Option<Point> {
        Some(point - self.absolute_pos(id)?)
    }

    pub fn collides_point(&self, id: WidgetId, point: Point) -> bool {
        self.absolute_rect(id)
            .map(|r| r.contains(point))
            .unwrap_or(false)
    }

    /// Whether the bounding boxes of `a` and `b` overlap.
    pub fn collides_widget(&self, a: WidgetId, b: WidgetId) -> bool {
        match (self.absolute_rect(a), self.absolute_rect(b)) {
            (Some(ra), Some(rb)) => ra.intersects(&rb),
            _ => false,
        }
    }

    // ---- geometry setters ----

    /// Set the explicit size. Hinted axes are re-resolved against the parent.
    pub fn set_size(&mut self, id: WidgetId, size: Size) -> Result<(), GeometryError> {
        self.expect_node_mut(id)?.size = size;
        self.resolve_geometry(id);
        // Buffers are reallocated even if hints snap the size back. The root's
        // frame buffers live in `Root`, not in its node.
        if id != self.root {
            if let Some(node) = self.node_mut_untracked(id) {
                node.realloc();
            }
        }
        self.notify_resized(id);
        Ok(())
    }

    /// Resize the root node and re-resolve everything below it.
    pub(crate) fn resize_root(&mut self, size: Size) {
        let root = self.root;
        if let Some(node) = self.node_mut(root) {
            node.size = size;
        }
        self.notify_resized(root);
    }

    pub fn set_pos(&mut self, id: WidgetId, pos: Point) -> Result<(), GeometryError> {
        if id == self.root {
            return Err(GeometryError::RootImmutable);
        }
        self.expect_node_mut(id)?.pos = pos;
        self.apply_hints(id);
        Ok(())
    }

    pub fn set_size_hint(&mut self, id: WidgetId, hint: SizeHint) -> Result<(), GeometryError> {
        layout::validate_size_hint(&hint)?;
        self.expect_node_mut(id)?.size_hint = hint;
        self.apply_hints(id);
        Ok(())
    }

    pub fn set_pos_hint(&mut self, id: WidgetId, hint: PosHint) -> Result<(), GeometryError> {
        layout::validate_pos_hint(&hint)?;
        self.expect_node_mut(id)?.pos_hint = hint;
        self.apply_hints(id);
        Ok(())
    }

    pub fn set_anchor(&mut self, id: WidgetId, anchor: Anchor) -> Result<(), GeometryError> {
        self.expect_node_mut(id)?.anchor = anchor;
        self.apply_hints(id);
        Ok(())
    }

    /// Disabling a widget removes its subtree from paint and dispatch. Geometry is kept.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> Result<(), GeometryError> {
        self.expect_node_mut(id)?.is_enabled = enabled;
        Ok(())
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<(), GeometryError> {
        self.expect_node_mut(id)?.is_visible = visible;
        Ok(())
    }

    pub fn set_transparent(&mut self, id: WidgetId, transparent: bool) -> Result<(), GeometryError> {
        self.expect_node_mut(id)?.is_transparent = transparent;
        Ok(())
    }

    /// Write `text` into `id`'s canvas at local `pos`.
    pub fn add_str(&mut self, id: WidgetId, pos: Point, text: &str, style: TextStyle) -> Result<(), GeometryError> {
        self.expect_node_mut(id)?.add_str(pos, text, style);
        Ok(())
    }

    /// Re-resolve `id`'s hints against its parent, cascading into children on resize.
    pub(crate) fn apply_hints(&mut self, id: WidgetId) {
        if self.resolve_geometry(id) {
            if let Some(node) = self.node_mut_untracked(id) {
                node.realloc();
            }
            self.notify_resized(id);
        }
    }

    /// Resolve `id`'s position and size from its hints. Returns whether the size changed.
    fn resolve_geometry(&mut self, id: WidgetId) -> bool {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return false;
        };
        let Some(parent_size) = self.node(parent).map(|p| p.size) else {
            return false;
        };
        let Some(node) = self.node_mut_untracked(id) else {
            return false;
        };

        let size = layout::resolve_size(&node.size_hint, node.size, parent_size);
        node.pos = layout::resolve_pos(&node.pos_hint, node.anchor, node.pos, size, parent_size);
        let changed = size != node.size;
        node.size = size;
        changed
    }

    /// `on_size` for `id`, then re-resolve every child against the new size.
    fn notify_resized(&mut self, id: WidgetId) {
        self.with_behavior(id, |b, ctx| b.on_size(ctx));
        let children = self
            .node(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.apply_hints(child);
        }
    }

    // ---- behaviors ----

    /// Run `f` with `id`'s behavior detached from its node.
    ///
    /// Returns `None` if the widget is gone or has no behavior.
    pub fn with_behavior<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Behavior, &mut WidgetCtx<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.node_mut_untracked(id)?.behavior.take()?;
        let out = {
            let mut ctx = WidgetCtx::new(self, id);
            f(behavior.as_mut(), &mut ctx)
        };
        if let Some(node) = self.node_mut_untracked(id) {
            if node.behavior.is_none() {
                node.behavior = Some(behavior);
            }
        }
        Some(out)
    }

    /// Run `f` with `id`'s behavior downcast to `T` plus mutable access to its node.
    pub fn with_widget<T: Behavior + 'static, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut T, &mut Node) -> R,
    ) -> Option<R> {
        self.touch();
        self.with_behavior(id, |b, ctx| {
            let widget = b.as_any_mut().downcast_mut::<T>()?;
            let node = ctx.node_mut()?;
            Some(f(widget, node))
        })
        .flatten()
    }

    /// Shared access to `id`'s behavior as `T`.
    pub fn behavior<T: Behavior + 'static>(&self, id: WidgetId) -> Option<&T> {
        self.node(id)?.behavior.as_deref()?.as_any().downcast_ref::<T>()
    }

    pub(crate) fn take_behavior(&mut self, id: WidgetId) -> Option<Box<dyn Behavior>> {
        self.node_mut_untracked(id)?.behavior.take()
    }

    pub(crate) fn restore_behavior(&mut self, id: WidgetId, behavior: Option<Box<dyn Behavior>>) {
        if let (Some(node), Some(b)) = (self.node_mut_untracked(id), behavior) {
            node.behavior = Some(b);
        }
    }
}
