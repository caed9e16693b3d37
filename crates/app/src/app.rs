//! The application: one cooperative loop driving input, tasks and frames.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use tui_stage_core::{GeometryError, RenderStats, Root, Theme, WidgetBuilder, WidgetId};
use tui_stage_input::{map_event, should_quit};
use tui_stage_term::{RenderThrottle, TerminalRenderer};

use crate::config::{AppConfig, ConfigError};
use crate::tasks::{CancelToken, TaskCtx, TaskFailure, TaskRegistry};
use crate::types::{InputEvent, Size};

/// Stops the loop at the end of the current tick. Cheap to clone into widgets.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

pub struct App {
    config: AppConfig,
    theme: Theme,
    root: Rc<RefCell<Root>>,
    tasks: TaskRegistry,
    ticks: watch::Sender<u64>,
    throttle: RenderThrottle,
    stop: StopHandle,
    pending_resize: bool,
    started: Instant,
}

impl App {
    /// Build an app with a root of `size`. The terminal size replaces it once
    /// [`App::run`] starts.
    pub fn new(config: AppConfig, size: Size) -> Result<Self, ConfigError> {
        let theme = config.load_theme()?;
        let root = Root::new(size, config.background_char, theme.primary);
        let (ticks, _) = watch::channel(0);
        Ok(Self {
            throttle: RenderThrottle::new(config.static_refresh_ms),
            config,
            theme,
            root: Rc::new(RefCell::new(root)),
            tasks: TaskRegistry::new(),
            ticks,
            stop: StopHandle::default(),
            pending_resize: true,
            started: Instant::now(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Shared handle on the root. Do not hold a borrow across an `.await`.
    pub fn root(&self) -> Rc<RefCell<Root>> {
        self.root.clone()
    }

    pub fn root_id(&self) -> WidgetId {
        self.root.borrow().id()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn add_widget(&self, parent: WidgetId, builder: WidgetBuilder) -> Result<WidgetId, GeometryError> {
        self.root.borrow_mut().tree_mut().add_widget(parent, builder)
    }

    /// Remove a widget subtree and cancel every task it owned.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<Vec<WidgetId>, GeometryError> {
        let removed = self.root.borrow_mut().tree_mut().remove_widget(id)?;
        self.reap();
        Ok(removed)
    }

    /// Start a background task owned by `widget`.
    ///
    /// `task` receives a [`TaskCtx`]; returning `Err` records a failure (see
    /// [`App::task_failures`]) without affecting other tasks or the loop.
    pub fn spawn_task<F, Fut>(&mut self, widget: WidgetId, task: F) -> Result<(), GeometryError>
    where
        F: FnOnce(TaskCtx) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        if !self.root.borrow().tree().contains(widget) {
            return Err(GeometryError::UnknownWidget(widget));
        }
        let token = CancelToken::new();
        let ctx = TaskCtx::new(self.root.clone(), widget, token.clone(), self.ticks.subscribe());
        let id = self.tasks.spawn(widget, token, task(ctx));
        debug!(?widget, ?id, "task spawned");
        Ok(())
    }

    pub fn running_tasks(&self, widget: WidgetId) -> usize {
        self.tasks.running(widget)
    }

    pub fn task_failures(&self) -> Vec<TaskFailure> {
        self.tasks.failures()
    }

    /// The set tasks run on. The loop drives it; tests can drive it directly.
    pub fn local_set(&self) -> Rc<tokio::task::LocalSet> {
        self.tasks.local()
    }

    /// Route one input event. Returns whether a widget consumed it.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        let consumed = match event {
            InputEvent::Resize(size) => {
                info!(?size, "terminal resized");
                self.root.borrow_mut().resize(size);
                self.pending_resize = true;
                false
            }
            other => self.root.borrow_mut().tree_mut().dispatch(&other),
        };
        self.reap();
        consumed
    }

    /// Advance the frame clock: wakes tasks waiting in `next_tick`.
    pub fn tick(&mut self) -> u64 {
        self.ticks.send_modify(|t| *t = t.wrapping_add(1));
        self.reap();
        *self.ticks.borrow()
    }

    /// Composite a frame if the throttle allows it.
    pub fn render_if_needed(&mut self, now_ms: u64) -> Option<RenderStats> {
        let mut root = self.root.borrow_mut();
        let generation = root.tree().generation();
        let force = std::mem::take(&mut self.pending_resize);
        if !self.throttle.should_render(now_ms, generation, force) {
            return None;
        }
        Some(root.render())
    }

    /// Cancel tasks of widgets removed since the last call (including removals
    /// made by behaviors and tasks) and forget finished tasks.
    fn reap(&mut self) {
        let removed = self.root.borrow_mut().tree_mut().drain_removed();
        for id in removed {
            self.tasks.cancel_widget(id);
        }
        self.tasks.prune();
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Take over the terminal and run until Ctrl+C or [`StopHandle::stop`].
    ///
    /// The terminal is restored even when the loop fails.
    pub fn run(mut self) -> Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut term = TerminalRenderer::new();
        term.enter()?;

        let local = self.local_set();
        let result = local.block_on(&rt, self.event_loop(&mut term));
        self.tasks.cancel_all();

        // Always try to restore terminal state.
        let _ = term.exit();
        if let Err(e) = &result {
            error!(error = %e, "event loop failed");
        }
        result
    }

    async fn event_loop(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.handle_event(InputEvent::Resize(Size::new(h, w)));
        info!(fps = self.config.fps, "event loop started");

        let mut interval = tokio::time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !self.stop.is_stopped() {
            interval.tick().await;

            while event::poll(Duration::ZERO)? {
                let raw = event::read()?;
                if let Event::Key(key) = &raw {
                    if should_quit(*key) {
                        self.stop.stop();
                        break;
                    }
                }
                if let Some(ev) = map_event(raw) {
                    self.handle_event(ev);
                }
            }

            self.tick();
            // Let tasks woken by the tick run before the frame.
            tokio::task::yield_now().await;

            let now = self.now_ms();
            if self.render_if_needed(now).is_some() {
                term.draw(&mut self.root.borrow_mut())?;
            }
        }

        info!("event loop stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Key, KeyEvent};

    fn app() -> App {
        App::new(AppConfig::default(), Size::new(10, 20)).unwrap()
    }

    #[test]
    fn frames_are_throttled_until_the_tree_changes() {
        let mut app = app();
        assert!(app.render_if_needed(0).is_some());
        assert!(app.render_if_needed(1).is_none());

        let root = app.root_id();
        app.add_widget(root, WidgetBuilder::new()).unwrap();
        assert!(app.render_if_needed(2).is_some());
        assert!(app.render_if_needed(2 + app.config().static_refresh_ms).is_some());
    }

    #[test]
    fn resize_forces_a_frame_and_relayouts() {
        let mut app = app();
        app.render_if_needed(0);
        assert!(!app.handle_event(InputEvent::Resize(Size::new(5, 5))));
        assert!(app.render_if_needed(1).is_some());
        assert_eq!(app.root().borrow().size(), Size::new(5, 5));
    }

    #[test]
    fn unknown_widget_cannot_own_tasks() {
        let mut app = app();
        let root = app.root_id();
        let w = app.add_widget(root, WidgetBuilder::new()).unwrap();
        app.remove_widget(w).unwrap();
        let err = app.spawn_task(w, |_ctx| async { Ok::<(), anyhow::Error>(()) });
        assert_eq!(err, Err(GeometryError::UnknownWidget(w)));
    }

    #[test]
    fn unhandled_keys_are_not_consumed() {
        let mut app = app();
        assert!(!app.handle_event(InputEvent::Key(KeyEvent::from(Key::Enter))));
    }

    #[test]
    fn stop_handle_is_shared() {
        let app = app();
        let handle = app.stop_handle();
        handle.stop();
        assert!(app.stop.is_stopped());
    }
}
