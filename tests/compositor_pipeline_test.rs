//! Compositing and flushing through the public crates, end to end.

use tui_stage::core::widgets::{Text, TextPanel};
use tui_stage::core::{Region, Root, WidgetBuilder};
use tui_stage::term::{Instruction, TerminalRenderer};
use tui_stage::types::{ColorPair, Point, Rgb, Size, SizeHint};

/// Applies an instruction stream to an in-memory screen.
struct ShadowScreen {
    width: u16,
    cells: Vec<(char, ColorPair)>,
    cursor: (u16, u16),
    colors: ColorPair,
}

impl ShadowScreen {
    fn new(size: Size) -> Self {
        Self {
            width: size.width,
            cells: vec![('?', ColorPair::default()); size.area()],
            cursor: (0, 0),
            colors: ColorPair::default(),
        }
    }

    fn apply(&mut self, instructions: &[Instruction]) {
        for instruction in instructions {
            match *instruction {
                Instruction::Clear => self.cells.fill((' ', ColorPair::default())),
                Instruction::MoveTo { row, col } => self.cursor = (row, col),
                Instruction::SetStyle(style) => self.colors = style.colors,
                Instruction::Print(ch) => {
                    let (row, col) = self.cursor;
                    let i = row as usize * self.width as usize + col as usize;
                    self.cells[i] = (ch, self.colors);
                    self.cursor = (row, col + 1);
                }
            }
        }
    }

    fn matches(&self, root: &Root) -> bool {
        let size = root.size();
        (0..size.height).all(|row| {
            let chars = root.canvas().row(row);
            let colors = root.colors().row(row);
            (0..size.width as usize).all(|col| {
                let i = row as usize * self.width as usize + col;
                self.cells[i] == (chars[col].ch, colors[col])
            })
        })
    }
}

fn opaque(pos: (i32, i32), size: (u16, u16), ch: char) -> WidgetBuilder {
    WidgetBuilder::new().pos(pos).size(size).default_char(ch)
}

#[test]
fn top_half_child_leaves_background_below() {
    let mut root = Root::new(Size::new(10, 20), ' ', ColorPair::WHITE_ON_BLACK);
    let id = root.id();
    let child = root.tree_mut().add_widget(id, opaque((0, 0), (5, 20), '=')).unwrap();
    root.render();

    let top = Region::from_rect(Point::ORIGIN, Size::new(5, 20));
    let bottom = Region::from_rect(Point::new(5, 0), Size::new(5, 20));
    assert_eq!(root.tree().node(child).unwrap().region(), &top);
    assert_eq!(root.background_region(), &bottom);
    for row in 5..10 {
        assert_eq!(root.canvas().row_text(row), " ".repeat(20));
    }
}

#[test]
fn later_sibling_takes_the_overlap() {
    let mut root = Root::new(Size::new(10, 10), ' ', ColorPair::WHITE_ON_BLACK);
    let id = root.id();
    let a = root.tree_mut().add_widget(id, opaque((0, 0), (5, 5), 'a')).unwrap();
    root.tree_mut().add_widget(id, opaque((2, 2), (5, 5), 'b')).unwrap();
    root.render();

    let region = root.tree().node(a).unwrap().region();
    for row in 0..5 {
        for col in 0..5 {
            let inside_overlap = row >= 2 && col >= 2;
            assert_eq!(region.contains(Point::new(row, col)), !inside_overlap, "({row}, {col})");
        }
    }
    assert_eq!(root.canvas().row_text(2), "aabbbbb   ");
}

#[test]
fn proportional_width_follows_screen_resize() {
    let mut root = Root::new(Size::new(10, 20), ' ', ColorPair::WHITE_ON_BLACK);
    let id = root.id();
    let w = root
        .tree_mut()
        .add_widget(
            id,
            WidgetBuilder::new()
                .size((2, 10))
                .size_hint(SizeHint::new(None, Some(0.5)))
                .default_char('h'),
        )
        .unwrap();
    assert_eq!(root.tree().node(w).unwrap().width(), 10);

    root.resize(Size::new(10, 10));
    root.render();
    assert_eq!(root.tree().node(w).unwrap().width(), 5);
    assert_eq!(root.canvas().row_text(0), "hhhhh     ");
}

#[test]
fn disabling_a_widget_keeps_its_geometry_and_reveals_what_is_below() {
    let mut root = Root::new(Size::new(4, 8), '.', ColorPair::WHITE_ON_BLACK);
    let id = root.id();
    let w = root.tree_mut().add_widget(id, opaque((1, 1), (2, 3), '#')).unwrap();
    root.render();
    assert_eq!(root.canvas().row_text(1), ".###....");

    root.tree_mut().set_enabled(w, false).unwrap();
    root.render();
    let node = root.tree().node(w).unwrap();
    assert_eq!((node.pos(), node.size()), (Point::new(1, 1), Size::new(2, 3)));
    assert!(node.region().is_empty());
    assert_eq!(root.canvas().row_text(1), "........");
}

#[test]
fn flushed_frames_reproduce_the_composited_screen() {
    let size = Size::new(6, 16);
    let mut root = Root::new(size, ' ', ColorPair::WHITE_ON_BLACK);
    let mut term = TerminalRenderer::with_writer(Vec::new());
    let mut screen = ShadowScreen::new(size);
    let id = root.id();

    let panel = root
        .tree_mut()
        .add_widget(
            id,
            WidgetBuilder::new()
                .pos((1, 2))
                .size((4, 10))
                .behavior(TextPanel::new("hello")),
        )
        .unwrap();
    let label = root
        .tree_mut()
        .add_widget(
            id,
            WidgetBuilder::new()
                .pos((0, 8))
                .size((1, 6))
                .default_color_pair(ColorPair::new(Rgb::new(10, 200, 10), Rgb::BLACK))
                .behavior(Text::new("ready")),
        )
        .unwrap();

    let mut step = |root: &mut Root, screen: &mut ShadowScreen| {
        root.render();
        term.draw(root).unwrap();
        screen.apply(term.last_instructions());
        assert!(screen.matches(root));
    };

    step(&mut root, &mut screen);
    root.tree_mut().with_widget::<Text, _>(label, |t, n| t.set_content(n, "go")).unwrap();
    step(&mut root, &mut screen);
    root.tree_mut().set_pos(panel, Point::new(2, 6)).unwrap();
    step(&mut root, &mut screen);
    root.tree_mut().pull_to_front(panel).unwrap();
    step(&mut root, &mut screen);
    root.tree_mut().remove_widget(label).unwrap();
    step(&mut root, &mut screen);
}
