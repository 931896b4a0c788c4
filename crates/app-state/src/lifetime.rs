//! Lifetime tracking for async work owned by a mounted component
//!
//! A component spawns its one-shot async effects (persisted reads, location
//! requests) through a [`ComponentLifetime`]. When the component is torn
//! down the tasks are aborted, and any task that already got past its await
//! point sees a dead [`LifetimeGuard`] and discards its result instead of
//! touching disposed state.
//!
//! Applying a result holds the liveness flag's read lock, and teardown takes
//! the write lock. Once `teardown()` returns no result is being applied and
//! none will be, on any runtime flavor.

use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Cheap, cloneable handle telling a task whether its owner is still alive
#[derive(Debug, Clone)]
pub struct LifetimeGuard {
    alive: Arc<RwLock<bool>>,
}

impl LifetimeGuard {
    /// Whether the owning component is still mounted
    pub fn is_alive(&self) -> bool {
        *self.alive.read()
    }

    /// Run `apply` only if the owner is still mounted
    ///
    /// Teardown blocks until a running `apply` returns. `apply` must not
    /// tear down its own component.
    ///
    /// Returns `true` if `apply` ran.
    pub fn run_if_alive(&self, apply: impl FnOnce()) -> bool {
        let alive = self.alive.read();
        if *alive {
            apply();
        }
        *alive
    }
}

/// Owner of the tasks spawned on behalf of one component
#[derive(Debug)]
pub struct ComponentLifetime {
    name: &'static str,
    alive: Arc<RwLock<bool>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ComponentLifetime {
    /// Create a live lifetime for the named component
    pub fn new(name: &'static str) -> Self {
        Self { name, alive: Arc::new(RwLock::new(true)), tasks: Mutex::new(Vec::new()) }
    }

    /// A guard tracking this lifetime
    pub fn guard(&self) -> LifetimeGuard {
        LifetimeGuard { alive: Arc::clone(&self.alive) }
    }

    /// Whether the component is still mounted
    pub fn is_alive(&self) -> bool {
        *self.alive.read()
    }

    /// Spawn a task bound to this lifetime
    ///
    /// The closure receives a guard to check before applying results.
    /// Nothing is spawned after teardown.
    pub fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(LifetimeGuard) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if !self.is_alive() {
            tracing::debug!(component = self.name, "spawn after teardown ignored");
            return;
        }

        let handle = tokio::spawn(task(self.guard()));
        let mut tasks = self.tasks.lock();
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Number of spawned tasks not yet finished
    pub fn pending_tasks(&self) -> usize {
        self.tasks.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every task spawned so far to finish
    pub async fn join(&self) {
        let handles = std::mem::take(&mut *self.tasks.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::warn!(component = self.name, error = %e, "component task failed");
                }
            }
        }
    }

    /// Mark the component as torn down and abort its tasks
    pub fn teardown(&self) {
        let was_alive = std::mem::replace(&mut *self.alive.write(), false);
        if was_alive {
            let tasks = std::mem::take(&mut *self.tasks.lock());
            tracing::debug!(component = self.name, aborted = tasks.len(), "component torn down");
            for handle in tasks {
                handle.abort();
            }
        }
    }
}

impl Drop for ComponentLifetime {
    fn drop(&mut self) {
        self.teardown();
    }
}
