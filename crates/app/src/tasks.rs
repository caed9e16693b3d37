//! Widget-owned background tasks with cooperative cancellation.
//!
//! Tasks run on the app's single-threaded [`LocalSet`] alongside the event
//! loop. Each belongs to a widget; removing the widget cancels its tasks. A
//! task notices cancellation at its next suspension point on [`TaskCtx`],
//! which then returns [`Cancelled`] so `?` unwinds it and drops whatever it
//! holds.

use std::cell::RefCell;
use std::collections::HashMap;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{JoinHandle, LocalSet};
use tracing::{debug, error, warn};

use tui_stage_core::{Behavior, Node, Root, WidgetId, WidgetTree};

/// Returned from a suspension point once the task has been cancelled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("task cancelled")]
pub struct Cancelled;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`Self::cancel`] has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // The sender lives in `self`, so this only errors if it is dropped.
        let _ = rx.wait_for(|c| *c).await;
    }
}

/// A task's handle on the app: suspension points and scoped widget access.
pub struct TaskCtx {
    root: Rc<RefCell<Root>>,
    widget: WidgetId,
    token: CancelToken,
    ticks: watch::Receiver<u64>,
}

impl TaskCtx {
    pub(crate) fn new(
        root: Rc<RefCell<Root>>,
        widget: WidgetId,
        token: CancelToken,
        ticks: watch::Receiver<u64>,
    ) -> Self {
        Self {
            root,
            widget,
            token,
            ticks,
        }
    }

    pub fn widget(&self) -> WidgetId {
        self.widget
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the next frame tick.
    pub async fn next_tick(&mut self) -> Result<u64, Cancelled> {
        if self.token.is_cancelled() {
            return Err(Cancelled);
        }
        let changed = tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(Cancelled),
            changed = self.ticks.changed() => changed,
        };
        changed.map_err(|_| Cancelled)?;
        Ok(*self.ticks.borrow_and_update())
    }

    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        self.until(tokio::time::sleep(duration)).await
    }

    /// Await `fut`, giving up as soon as the task is cancelled.
    pub async fn until<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        if self.token.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }

    /// Mutate the owning widget's node. `None` once the widget is gone or the
    /// task is cancelled.
    pub fn with_widget<R>(&self, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        if self.token.is_cancelled() {
            return None;
        }
        let mut root = self.root.try_borrow_mut().ok()?;
        root.tree_mut().node_mut(self.widget).map(f)
    }

    /// Mutate the owning widget's behavior (downcast to `T`) and node.
    pub fn with_behavior<T: Behavior + 'static, R>(&self, f: impl FnOnce(&mut T, &mut Node) -> R) -> Option<R> {
        if self.token.is_cancelled() {
            return None;
        }
        let mut root = self.root.try_borrow_mut().ok()?;
        root.tree_mut().with_widget::<T, R>(self.widget, f)
    }

    /// Access the whole tree, e.g. to add or remove widgets.
    pub fn with_tree<R>(&self, f: impl FnOnce(&mut WidgetTree) -> R) -> Option<R> {
        if self.token.is_cancelled() {
            return None;
        }
        let mut root = self.root.try_borrow_mut().ok()?;
        Some(f(root.tree_mut()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task that ended with an error other than [`Cancelled`], or panicked.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    pub widget: WidgetId,
    pub task: TaskId,
    pub message: String,
}

struct TaskEntry {
    id: TaskId,
    token: CancelToken,
    handle: JoinHandle<()>,
}

/// Per-widget registry of running tasks.
pub struct TaskRegistry {
    local: Rc<LocalSet>,
    tasks: HashMap<WidgetId, Vec<TaskEntry>>,
    failures: Rc<RefCell<Vec<TaskFailure>>>,
    next_id: u64,
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            local: Rc::new(LocalSet::new()),
            tasks: HashMap::new(),
            failures: Rc::new(RefCell::new(Vec::new())),
            next_id: 0,
        }
    }

    /// The set the tasks run on. Drive it with `run_until` or `block_on`.
    pub fn local(&self) -> Rc<LocalSet> {
        self.local.clone()
    }

    /// Spawn `fut` for `widget`. `token` must be the one handed to the task's [`TaskCtx`].
    pub fn spawn<F>(&mut self, widget: WidgetId, token: CancelToken, fut: F) -> TaskId
    where
        F: Future<Output = anyhow::Result<()>> + 'static,
    {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let failures = self.failures.clone();
        let handle = self.local.spawn_local(async move {
            let message = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(())) => {
                    debug!(?widget, ?id, "task finished");
                    return;
                }
                Ok(Err(e)) if e.is::<Cancelled>() => {
                    debug!(?widget, ?id, "task cancelled");
                    return;
                }
                Ok(Err(e)) => {
                    let message = format!("{e:#}");
                    warn!(?widget, ?id, error = %message, "task failed");
                    message
                }
                Err(payload) => {
                    let message = format!("panicked: {}", panic_message(payload.as_ref()));
                    error!(?widget, ?id, error = %message, "task panicked");
                    message
                }
            };
            failures.borrow_mut().push(TaskFailure {
                widget,
                task: id,
                message,
            });
        });
        self.tasks.entry(widget).or_default().push(TaskEntry { id, token, handle });
        id
    }

    /// Cancel every task of `widget`. Returns how many were still running.
    pub fn cancel_widget(&mut self, widget: WidgetId) -> usize {
        let Some(entries) = self.tasks.remove(&widget) else {
            return 0;
        };
        let mut running = 0;
        for entry in entries {
            if !entry.handle.is_finished() {
                running += 1;
            }
            entry.token.cancel();
            debug!(?widget, task = ?entry.id, "cancelling task");
        }
        running
    }

    pub fn cancel_all(&mut self) {
        let widgets: Vec<WidgetId> = self.tasks.keys().copied().collect();
        for widget in widgets {
            self.cancel_widget(widget);
        }
    }

    /// Forget tasks that have completed.
    pub fn prune(&mut self) {
        self.tasks.retain(|_, entries| {
            entries.retain(|e| !e.handle.is_finished());
            !entries.is_empty()
        });
    }

    /// Tasks of `widget` that have not completed yet.
    pub fn running(&self, widget: WidgetId) -> usize {
        self.tasks
            .get(&widget)
            .map(|v| v.iter().filter(|e| !e.handle.is_finished()).count())
            .unwrap_or(0)
    }

    pub fn failures(&self) -> Vec<TaskFailure> {
        self.failures.borrow().clone()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
