//! Root: owns the widget tree and the double-buffered screen.
//!
//! [`Root::render`] runs one compositor pass:
//!
//! 1. the root's region is the whole screen;
//! 2. top-down: each enabled widget's candidate region is its parent's region
//!    intersected with its own absolute rectangle;
//! 3. bottom-up (topmost widget first): each region is clipped to what is
//!    still uncovered, and opaque visible widgets then cover their cells;
//! 4. the current and previous buffers are swapped;
//! 5. the new current buffer is cleared to the background;
//! 6. pre-order, every enabled visible widget paints its final region.
//!
//! Whatever is left uncovered after step 3 stays in the root's region and
//! shows the background.

use tracing::trace;

use crate::grid::{Canvas, ColorGrid};
use crate::paint::PaintTarget;
use crate::region::Region;
use crate::tree::{WidgetId, WidgetTree};
use crate::types::{ColorPair, Point, Size, StyledChar};

/// Per-frame counters, useful for logging and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Widgets whose paint routine ran.
    pub painted: usize,
    /// Enabled visible widgets skipped because nothing of them was visible.
    pub culled: usize,
    /// Rectangles across all painted regions.
    pub rects: usize,
}

#[derive(Debug, Clone, Copy)]
struct Visit {
    id: WidgetId,
    abs: Point,
    active: bool,
}

/// The unique top-level node and the screen buffers it composites into.
pub struct Root {
    tree: WidgetTree,
    canvas: Canvas,
    colors: ColorGrid,
    last_canvas: Canvas,
    last_colors: ColorGrid,
    background_char: StyledChar,
    background_color_pair: ColorPair,
    resized: bool,
    order: Vec<Visit>,
}

impl Root {
    pub fn new(size: Size, background_char: impl Into<StyledChar>, background_color_pair: ColorPair) -> Self {
        let background_char = background_char.into();
        Self {
            tree: WidgetTree::new(size),
            canvas: Canvas::new(size, background_char),
            colors: ColorGrid::new(size, background_color_pair),
            last_canvas: Canvas::new(size, background_char),
            last_colors: ColorGrid::new(size, background_color_pair),
            background_char,
            background_color_pair,
            resized: true,
            order: Vec::new(),
        }
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// Id of the root node in [`Self::tree`].
    pub fn id(&self) -> WidgetId {
        self.tree.root()
    }

    pub fn size(&self) -> Size {
        self.canvas.size()
    }

    /// Frame painted by the last [`Self::render`].
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn colors(&self) -> &ColorGrid {
        &self.colors
    }

    /// Frame painted by the render before the last one.
    pub fn last_canvas(&self) -> &Canvas {
        &self.last_canvas
    }

    pub fn last_colors(&self) -> &ColorGrid {
        &self.last_colors
    }

    pub fn background_char(&self) -> StyledChar {
        self.background_char
    }

    pub fn background_color_pair(&self) -> ColorPair {
        self.background_color_pair
    }

    pub fn set_background(&mut self, ch: impl Into<StyledChar>, color: ColorPair) {
        self.background_char = ch.into();
        self.background_color_pair = color;
        self.tree.touch();
    }

    /// Cells left to the background after the last render.
    pub fn background_region(&self) -> &Region {
        self.tree
            .node(self.tree.root())
            .map(|n| n.region())
            .unwrap_or(&EMPTY)
    }

    /// Resize the screen: reallocate both buffers and re-resolve the tree.
    ///
    /// The next flush must repaint everything; see [`Self::take_resized`].
    pub fn resize(&mut self, size: Size) {
        self.canvas.reset(size, self.background_char);
        self.colors.reset(size, self.background_color_pair);
        self.last_canvas.reset(size, self.background_char);
        self.last_colors.reset(size, self.background_color_pair);
        self.tree.resize_root(size);
        self.resized = true;
    }

    /// Whether the screen changed size since the last call (the first call is always `true`).
    pub fn take_resized(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    /// Run one compositor pass. See the module docs for the steps.
    pub fn render(&mut self) -> RenderStats {
        let Root {
            tree,
            canvas,
            colors,
            last_canvas,
            last_colors,
            background_char,
            background_color_pair,
            order,
            ..
        } = self;
        let root = tree.root();
        let full = Region::from_rect(Point::ORIGIN, canvas.size());

        // Top-down: candidate regions.
        order.clear();
        if let Some(node) = tree.node_mut_untracked(root) {
            node.region = full.clone();
        }
        let mut stack = vec![Visit {
            id: root,
            abs: Point::ORIGIN,
            active: true,
        }];
        while let Some(visit) = stack.pop() {
            order.push(visit);
            let Some(node) = tree.node(visit.id) else {
                continue;
            };
            let parent_region = node.region.clone();
            let children = node.children().to_vec();
            for &child in children.iter().rev() {
                let Some(child_node) = tree.node_mut_untracked(child) else {
                    continue;
                };
                let abs = visit.abs + child_node.pos();
                let active = visit.active && child_node.is_enabled();
                child_node.region = if active {
                    &parent_region & &Region::from_rect(abs, child_node.size())
                } else {
                    Region::new()
                };
                stack.push(Visit {
                    id: child,
                    abs,
                    active,
                });
            }
        }

        // Bottom-up: occlusion by opaque widgets drawn later.
        let mut uncovered = full;
        for visit in order.iter().rev() {
            if visit.id == root || !visit.active {
                continue;
            }
            let Some(node) = tree.node_mut_untracked(visit.id) else {
                continue;
            };
            node.region &= &uncovered;
            if node.is_visible() && !node.is_transparent() {
                uncovered -= &node.region;
            }
        }
        if let Some(node) = tree.node_mut_untracked(root) {
            node.region = uncovered;
        }

        canvas.swap(last_canvas);
        colors.swap(last_colors);
        canvas.fill(*background_char);
        colors.fill(*background_color_pair);

        // Paint, parents before children.
        let mut stats = RenderStats::default();
        for visit in order.iter() {
            if visit.id == root || !visit.active {
                continue;
            }
            let visible = tree.node(visit.id).map(|n| n.is_visible()).unwrap_or(false);
            if !visible {
                continue;
            }
            let mut behavior = tree.take_behavior(visit.id);
            if let Some(node) = tree.node(visit.id) {
                if node.region().is_empty() {
                    stats.culled += 1;
                } else {
                    stats.painted += 1;
                    stats.rects += node.region().len();
                    let mut target = PaintTarget::new(canvas, colors, node.region(), visit.abs);
                    match behavior.as_mut() {
                        Some(b) => b.paint(node, &mut target),
                        None => target.blit(node),
                    }
                }
            }
            tree.restore_behavior(visit.id, behavior);
        }

        trace!(
            painted = stats.painted,
            culled = stats.culled,
            rects = stats.rects,
            "frame composited"
        );
        stats
    }
}

static EMPTY: Region = Region::EMPTY;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Rect;
    use crate::tree::WidgetBuilder;
    use crate::types::Rgb;

    fn root(h: u16, w: u16) -> Root {
        Root::new(Size::new(h, w), ' ', ColorPair::WHITE_ON_BLACK)
    }

    fn opaque(pos: (i32, i32), size: (u16, u16), ch: char) -> WidgetBuilder {
        WidgetBuilder::new().pos(pos).size(size).default_char(ch)
    }

    #[test]
    fn single_child_covers_top_half() {
        let mut r = root(10, 20);
        let id = r.id();
        let child = r.tree_mut().add_widget(id, opaque((0, 0), (5, 20), '#')).unwrap();
        r.render();

        let expected = Region::from_rect(Point::new(0, 0), Size::new(5, 20));
        assert_eq!(r.tree().node(child).unwrap().region(), &expected);
        assert_eq!(
            r.background_region(),
            &Region::from_rect(Point::new(5, 0), Size::new(5, 20))
        );
        assert_eq!(r.canvas().row_text(4), "#".repeat(20));
        assert_eq!(r.canvas().row_text(5), " ".repeat(20));
    }

    #[test]
    fn later_sibling_occludes_overlap() {
        let mut r = root(10, 10);
        let id = r.id();
        let a = r.tree_mut().add_widget(id, opaque((0, 0), (5, 5), 'a')).unwrap();
        let b = r.tree_mut().add_widget(id, opaque((2, 2), (5, 5), 'b')).unwrap();
        r.render();

        let overlap = Region::from_rect(Point::new(2, 2), Size::new(3, 3));
        let a_region = r.tree().node(a).unwrap().region().clone();
        assert!((&a_region & &overlap).is_empty());
        assert_eq!(a_region.area(), 25 - 9);
        assert_eq!(r.tree().node(b).unwrap().region().area(), 25);
        assert_eq!(r.canvas().get(3, 3).unwrap().ch, 'b');
        assert_eq!(r.canvas().get(1, 1).unwrap().ch, 'a');
    }

    #[test]
    fn transparent_and_invisible_widgets_do_not_occlude() {
        let mut r = root(4, 4);
        let id = r.id();
        let under = r.tree_mut().add_widget(id, opaque((0, 0), (4, 4), 'u')).unwrap();
        let glass = opaque((0, 0), (2, 2), ' ').transparent(true);
        r.tree_mut().add_widget(id, glass).unwrap();
        let ghost = opaque((2, 2), (2, 2), 'g').visible(false);
        r.tree_mut().add_widget(id, ghost).unwrap();
        r.render();

        assert_eq!(r.tree().node(under).unwrap().region().area(), 16);
        assert_eq!(r.canvas().get(0, 0).unwrap().ch, 'u');
        assert_eq!(r.canvas().get(3, 3).unwrap().ch, 'u');
    }

    #[test]
    fn transparent_blit_keeps_background_color() {
        let mut r = root(1, 3);
        let id = r.id();
        let red = ColorPair::new(Rgb::WHITE, Rgb::new(200, 0, 0));
        r.tree_mut()
            .add_widget(id, opaque((0, 0), (1, 3), ' ').default_color_pair(red))
            .unwrap();
        let text = r
            .tree_mut()
            .add_widget(id, WidgetBuilder::new().size((1, 3)).transparent(true))
            .unwrap();
        r.tree_mut()
            .add_str(text, Point::new(0, 1), "x", Default::default())
            .unwrap();
        r.render();

        assert_eq!(r.canvas().row_text(0), " x ");
        assert_eq!(r.colors().get(0, 1).unwrap().bg, Rgb::new(200, 0, 0));
    }

    #[test]
    fn disabled_subtree_gets_empty_regions_and_keeps_geometry() {
        let mut r = root(6, 6);
        let id = r.id();
        let parent = r.tree_mut().add_widget(id, opaque((0, 0), (6, 6), 'p')).unwrap();
        let child = r.tree_mut().add_widget(parent, opaque((1, 1), (2, 2), 'c')).unwrap();
        r.render();
        assert!(!r.tree().node(child).unwrap().region().is_empty());

        r.tree_mut().set_enabled(parent, false).unwrap();
        r.render();
        assert!(r.tree().node(parent).unwrap().region().is_empty());
        assert!(r.tree().node(child).unwrap().region().is_empty());
        assert_eq!(r.tree().node(child).unwrap().pos(), Point::new(1, 1));
        assert_eq!(r.background_region().area(), 36);
        assert!(r.canvas().cells().iter().all(|c| c.ch == ' '));
    }

    #[test]
    fn child_clipped_to_parent_and_screen() {
        let mut r = root(5, 5);
        let id = r.id();
        let parent = r.tree_mut().add_widget(id, opaque((1, 1), (3, 3), 'p')).unwrap();
        let child = r.tree_mut().add_widget(parent, opaque((1, 1), (10, 10), 'c')).unwrap();
        let off = r.tree_mut().add_widget(id, opaque((-3, -3), (2, 2), 'o')).unwrap();
        r.render();

        let child_region = r.tree().node(child).unwrap().region();
        assert_eq!(
            child_region.rects().collect::<Vec<_>>(),
            vec![Rect {
                top: 2,
                left: 2,
                bottom: 4,
                right: 4
            }]
        );
        assert!(r.tree().node(off).unwrap().region().is_empty());
    }

    #[test]
    fn regions_partition_the_screen() {
        let mut r = root(8, 12);
        let id = r.id();
        let a = r.tree_mut().add_widget(id, opaque((0, 0), (6, 6), 'a')).unwrap();
        r.tree_mut().add_widget(a, opaque((2, 2), (6, 6), 'x')).unwrap();
        r.tree_mut().add_widget(id, opaque((3, 4), (4, 6), 'b')).unwrap();
        r.tree_mut().add_widget(id, opaque((5, 8), (9, 9), 'c')).unwrap();
        r.render();

        let mut union = r.background_region().clone();
        let mut total = union.area();
        for w in r.tree().walk(id) {
            let region = r.tree().node(w).unwrap().region();
            assert!((&union & region).is_empty(), "opaque regions overlap");
            union |= region;
            total += region.area();
        }
        assert_eq!(union, Region::from_rect(Point::ORIGIN, Size::new(8, 12)));
        assert_eq!(total, 8 * 12);
    }

    #[test]
    fn render_swaps_buffers() {
        let mut r = root(2, 2);
        let id = r.id();
        let w = r.tree_mut().add_widget(id, opaque((0, 0), (1, 1), 'a')).unwrap();
        r.render();
        r.tree_mut().node_mut(w).unwrap().canvas_mut().set(0, 0, 'b'.into());
        r.render();
        assert_eq!(r.canvas().get(0, 0).unwrap().ch, 'b');
        assert_eq!(r.last_canvas().get(0, 0).unwrap().ch, 'a');
    }

    #[test]
    fn root_resize_re_resolves_hints() {
        use crate::types::SizeHint;

        let mut r = root(10, 20);
        let id = r.id();
        let w = r
            .tree_mut()
            .add_widget(id, WidgetBuilder::new().size((3, 3)).size_hint(SizeHint::new(None, Some(0.5))))
            .unwrap();
        assert_eq!(r.tree().node(w).unwrap().width(), 10);
        assert!(r.take_resized());
        r.resize(Size::new(10, 10));
        assert!(r.take_resized());
        assert!(!r.take_resized());
        assert_eq!(r.tree().node(w).unwrap().width(), 5);
        assert_eq!(r.canvas().size(), Size::new(10, 10));
    }
}
