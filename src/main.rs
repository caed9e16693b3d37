//! Demo runner (default binary).
//!
//! Overlapping draggable windows, checkboxes, a radio group, a text panel and
//! two animations driven by widget tasks. Ctrl+C quits.

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use tui_stage::app::{logging, App, AppConfig, TaskCtx};
use tui_stage::core::widgets::{Text, TextPanel, ToggleButton};
use tui_stage::core::{Behavior, ToggleGroup, WidgetBuilder, WidgetCtx, WidgetId};
use tui_stage::types::{
    Anchor, ColorPair, MouseButton, MouseEvent, MouseEventKind, Point, PosHint, Rgb, Size, TextStyle,
};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Drag with the left button; clicking raises the window.
#[derive(Default)]
struct DragWindow {
    grab: Option<Point>,
}

impl Behavior for DragWindow {
    fn on_mouse(&mut self, ctx: &mut WidgetCtx<'_>, event: MouseEvent) -> bool {
        let id = ctx.id();
        match (event.kind, event.button) {
            (MouseEventKind::Press, MouseButton::Left) => {
                self.grab = ctx.tree().to_local(id, event.pos);
                let _ = ctx.tree_mut().pull_to_front(id);
                true
            }
            (MouseEventKind::Move, MouseButton::Left) => {
                let Some(grab) = self.grab else {
                    return false;
                };
                let tree = ctx.tree_mut();
                let parent_abs = tree
                    .node(id)
                    .and_then(|n| n.parent())
                    .and_then(|p| tree.absolute_pos(p))
                    .unwrap_or(Point::ORIGIN);
                let _ = tree.set_pos(id, event.pos - grab - parent_abs);
                true
            }
            (MouseEventKind::Release, _) => self.grab.take().is_some(),
            _ => false,
        }
    }

    fn on_pointer_leave(&mut self, _ctx: &mut WidgetCtx<'_>) {
        self.grab = None;
    }
}

/// Cycle the spinner glyph until the widget goes away.
async fn spin(mut ctx: TaskCtx) -> Result<()> {
    let mut frame = 0usize;
    loop {
        ctx.sleep(Duration::from_millis(120)).await?;
        frame = (frame + 1) % SPINNER.len();
        let content = format!("working {}", SPINNER[frame]);
        if ctx
            .with_behavior::<Text, _>(|text, node| text.set_content(node, content))
            .is_none()
        {
            return Ok(());
        }
        ctx.next_tick().await?;
    }
}

/// Move the widget back and forth along `row`, bouncing off the screen edges.
async fn bounce(mut ctx: TaskCtx, row: i32) -> Result<()> {
    let (mut col, mut dir) = (0i32, 1i32);
    loop {
        ctx.next_tick().await?;
        let width = ctx
            .with_tree(|tree| tree.node(tree.root()).map(|n| n.width()).unwrap_or(0))
            .unwrap_or(0) as i32;
        if width < 2 {
            continue;
        }
        col += dir;
        if col <= 0 || col >= width - 2 {
            dir = -dir;
            col = col.clamp(0, width - 2);
        }
        let id = ctx.widget();
        let _ = ctx.with_tree(|tree| tree.set_pos(id, Point::new(row, col)));
        ctx.sleep(Duration::from_millis(30)).await?;
    }
}

fn window(app: &App, pos: (i32, i32), title: &str, color: ColorPair) -> Result<WidgetId> {
    let root = app.root_id();
    let id = app.add_widget(
        root,
        WidgetBuilder::new()
            .pos(pos)
            .size((8, 26))
            .default_color_pair(color)
            .behavior(DragWindow::default()),
    )?;
    app.root()
        .borrow_mut()
        .tree_mut()
        .add_str(id, Point::new(0, 1), title, TextStyle::BOLD)?;
    Ok(id)
}

fn build(app: &mut App) -> Result<()> {
    let theme = *app.theme();
    let root = app.root_id();

    let intro = TextPanel::new("Drag the windows. Click the toggles.\nCtrl+C quits.").with_theme(&theme);
    let intro_size = intro.min_size();
    app.add_widget(
        root,
        WidgetBuilder::new()
            .size(intro_size)
            .pos_hint(PosHint::new(Some(0.0), Some(0.5)))
            .anchor(Anchor::Top)
            .behavior(intro),
    )?;

    let warm = ColorPair::new(Rgb::WHITE, Rgb::new(0x6a, 0x2c, 0x2c));
    let cool = ColorPair::new(Rgb::WHITE, Rgb::new(0x2c, 0x3e, 0x6a));
    let options = window(app, (5, 2), "Options", warm)?;
    let status = window(app, (9, 20), "Status", cool)?;

    for (row, label) in [(2, "Sound"), (3, "Music")] {
        app.add_widget(
            options,
            WidgetBuilder::new()
                .pos((row, 1))
                .size((1, 12))
                .behavior(ToggleButton::new(label).with_theme(theme)),
        )?;
    }
    let group = ToggleGroup::new(false);
    for (row, label) in [(5, "Easy"), (6, "Hard")] {
        app.add_widget(
            options,
            WidgetBuilder::new()
                .pos((row, 1))
                .size((1, 12))
                .behavior(ToggleButton::grouped(label, group.clone()).with_theme(theme)),
        )?;
    }

    let spinner = app.add_widget(
        status,
        WidgetBuilder::new()
            .pos((2, 1))
            .size((1, 20))
            .default_color_pair(cool)
            .behavior(Text::new("working |")),
    )?;
    app.spawn_task(spinner, spin)?;

    let ball = app.add_widget(
        root,
        WidgetBuilder::new()
            .size((1, 2))
            .default_char('o')
            .transparent(true),
    )?;
    let row = intro_size.height as i32;
    app.spawn_task(ball, move |ctx| bounce(ctx, row))?;

    Ok(())
}

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    logging::init(config.log_path.as_deref())?;
    info!(?config, "starting demo");

    let mut app = App::new(config, Size::new(24, 80))?;
    build(&mut app)?;
    app.run()
}
