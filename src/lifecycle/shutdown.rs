//! Shutdown coordination for background tasks.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

struct Task {
    name: &'static str,
    handle: JoinHandle<()>,
}

/// Owns the pool's background tasks and the signal that stops them.
///
/// Every task gets its own receiver at spawn time. Dropping the coordinator
/// closes the channel, which wakes every receiver as well.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    tasks: Mutex<Vec<Task>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn a task that is handed a shutdown receiver and joined by [`Shutdown::stop`].
    pub fn spawn<F, Fut>(&self, runtime: &Handle, name: &'static str, task: F)
    where
        F: FnOnce(broadcast::Receiver<()>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = runtime.spawn(task(self.tx.subscribe()));
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Task { name, handle });
    }

    /// Signal every task without waiting for it.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Signal every task and wait for all of them to exit.
    ///
    /// Returns how many tasks were joined. A second call joins nothing.
    pub async fn stop(&self) -> usize {
        self.trigger();
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));

        let joined = tasks.len();
        for task in tasks {
            if let Err(e) = task.handle.await {
                tracing::error!(task = task.name, error = %e, "Background task ended abnormally");
            }
        }
        joined
    }

    /// Tasks spawned and not yet finished.
    pub fn running(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|task| !task.handle.is_finished())
            .count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shutdown")
            .field("running", &self.running())
            .finish()
    }
}
