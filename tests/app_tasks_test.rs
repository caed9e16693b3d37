//! Widget-owned tasks driven by the app's frame clock.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::anyhow;
use tokio::task::yield_now;

use tui_stage::app::{App, AppConfig, TaskCtx};
use tui_stage::core::widgets::Text;
use tui_stage::core::WidgetBuilder;
use tui_stage::types::Size;

struct SetOnDrop(Rc<Cell<bool>>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

async fn count_ticks(mut ctx: TaskCtx, seen: Rc<Cell<u64>>, dropped: Rc<Cell<bool>>) -> anyhow::Result<()> {
    let _guard = SetOnDrop(dropped);
    loop {
        ctx.next_tick().await?;
        seen.set(seen.get() + 1);
    }
}

async fn write_status(mut ctx: TaskCtx) -> anyhow::Result<()> {
    ctx.next_tick().await?;
    ctx.with_behavior::<Text, _>(|text, node| text.set_content(node, "done"))
        .ok_or_else(|| anyhow!("status widget is gone"))?;
    Ok(())
}

async fn fail_on_first_tick(mut ctx: TaskCtx) -> anyhow::Result<()> {
    ctx.next_tick().await?;
    Err(anyhow!("sensor offline"))
}

async fn panic_on_first_tick(mut ctx: TaskCtx) -> anyhow::Result<()> {
    ctx.next_tick().await?;
    let readings: Vec<u8> = Vec::new();
    Err(anyhow!("reading {}", readings[3]))
}

fn app() -> App {
    App::new(AppConfig::default(), Size::new(4, 12)).unwrap()
}

#[tokio::test]
async fn tasks_advance_once_per_tick() {
    let mut app = app();
    let root = app.root_id();
    let w = app.add_widget(root, WidgetBuilder::new().size((1, 1))).unwrap();
    let seen = Rc::new(Cell::new(0));
    let dropped = Rc::new(Cell::new(false));
    let (s, d) = (seen.clone(), dropped.clone());
    app.spawn_task(w, move |ctx| count_ticks(ctx, s, d)).unwrap();

    let local = app.local_set();
    local
        .run_until(async {
            yield_now().await;
            for expected in 1..=3 {
                app.tick();
                yield_now().await;
                assert_eq!(seen.get(), expected);
            }
            assert_eq!(app.running_tasks(w), 1);
        })
        .await;
    assert!(!dropped.get());
}

#[tokio::test]
async fn removing_the_widget_cancels_and_drops_its_tasks() {
    let mut app = app();
    let root = app.root_id();
    let parent = app.add_widget(root, WidgetBuilder::new().size((2, 2))).unwrap();
    let child = app.add_widget(parent, WidgetBuilder::new().size((1, 1))).unwrap();
    let seen = Rc::new(Cell::new(0));
    let dropped = Rc::new(Cell::new(false));
    let (s, d) = (seen.clone(), dropped.clone());
    app.spawn_task(child, move |ctx| count_ticks(ctx, s, d)).unwrap();

    let local = app.local_set();
    local
        .run_until(async {
            app.tick();
            yield_now().await;
            assert_eq!(seen.get(), 1);

            app.remove_widget(parent).unwrap();
            assert_eq!(app.running_tasks(child), 0);
            yield_now().await;
            assert!(dropped.get());

            app.tick();
            yield_now().await;
            assert_eq!(seen.get(), 1);
        })
        .await;
    // Cancellation is not a failure.
    assert!(app.task_failures().is_empty());
}

#[tokio::test]
async fn task_updates_reach_the_next_frame() {
    let mut app = app();
    let root = app.root_id();
    let status = app
        .add_widget(root, WidgetBuilder::new().size((1, 6)).behavior(Text::new("wait")))
        .unwrap();
    app.spawn_task(status, write_status).unwrap();

    let local = app.local_set();
    local
        .run_until(async {
            app.render_if_needed(0).unwrap();
            assert_eq!(app.root().borrow().canvas().row_text(0), "wait        ");

            app.tick();
            yield_now().await;
            assert!(app.render_if_needed(1).is_some());
            assert_eq!(app.root().borrow().canvas().row_text(0), "done        ");
        })
        .await;
    assert!(app.task_failures().is_empty());
}

#[tokio::test]
async fn failing_task_is_recorded_without_stopping_others() {
    let mut app = app();
    let root = app.root_id();
    let a = app.add_widget(root, WidgetBuilder::new().size((1, 1))).unwrap();
    let b = app.add_widget(root, WidgetBuilder::new().size((1, 1))).unwrap();
    let seen = Rc::new(Cell::new(0));
    let dropped = Rc::new(Cell::new(false));
    let (s, d) = (seen.clone(), dropped.clone());
    app.spawn_task(a, fail_on_first_tick).unwrap();
    app.spawn_task(b, move |ctx| count_ticks(ctx, s, d)).unwrap();

    let local = app.local_set();
    local
        .run_until(async {
            for _ in 0..2 {
                app.tick();
                yield_now().await;
            }
        })
        .await;

    let failures = app.task_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].widget, a);
    assert!(failures[0].message.contains("sensor offline"));
    assert_eq!(seen.get(), 2);
    assert_eq!(app.running_tasks(a), 0);
}

#[tokio::test]
async fn panicking_task_is_recorded_without_stopping_others() {
    let mut app = app();
    let root = app.root_id();
    let a = app.add_widget(root, WidgetBuilder::new().size((1, 1))).unwrap();
    let b = app.add_widget(root, WidgetBuilder::new().size((1, 1))).unwrap();
    let seen = Rc::new(Cell::new(0));
    let dropped = Rc::new(Cell::new(false));
    let (s, d) = (seen.clone(), dropped.clone());
    app.spawn_task(a, panic_on_first_tick).unwrap();
    app.spawn_task(b, move |ctx| count_ticks(ctx, s, d)).unwrap();

    let local = app.local_set();
    local
        .run_until(async {
            for _ in 0..3 {
                app.tick();
                yield_now().await;
            }
        })
        .await;

    let failures = app.task_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].widget, a);
    assert!(failures[0].message.contains("panicked"));
    assert!(failures[0].message.contains("index out of bounds"));
    assert_eq!(app.running_tasks(a), 0);
    assert_eq!(seen.get(), 3);
    assert!(!dropped.get());

    // The loop keeps rendering afterwards.
    assert!(app.render_if_needed(0).is_some());
}
