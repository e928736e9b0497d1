//! One-shot delayed actions owned by a view.
//!
//! Every action is tied to the registry's [`CancellationToken`]. Cancelling the
//! registry (view close) cancels every outstanding action, and each action can
//! also be cancelled on its own through the returned [`Deferred`].

use std::{
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::log_debug;

const ENABLE_LOGS: bool = true;

#[derive(Clone)]
pub struct DeferredRegistry {
    token: CancellationToken,
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

/// Handle to a single scheduled action.
#[derive(Debug, Clone)]
pub struct Deferred {
    token: CancellationToken,
}

impl Deferred {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for DeferredRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredRegistry {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            handles: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A registry cancelled together with this one, with its own action list.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            handles: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `action` after `delay` unless cancelled first.
    ///
    /// Returns `None` once the registry has been cancelled.
    pub fn schedule<F>(&self, delay: Duration, action: F) -> Option<Deferred>
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_async(delay, async move { action() })
    }

    /// Like [`schedule`](Self::schedule) for actions that need to await.
    pub fn schedule_async<Fut>(&self, delay: Duration, action: Fut) -> Option<Deferred>
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.token.is_cancelled() {
            log_debug!("registry cancelled; dropping deferred action");
            return None;
        }

        let token = self.token.child_token();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !task_token.is_cancelled() {
                        action.await;
                    }
                }
            }
        });

        let mut handles = self.lock_handles();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);

        Some(Deferred { token })
    }

    /// Number of actions still waiting or running.
    pub fn pending(&self) -> usize {
        let mut handles = self.lock_handles();
        handles.retain(|h| !h.is_finished());
        handles.len()
    }

    /// Cancels every outstanding action. Later `schedule` calls are ignored.
    pub fn cancel_all(&self) {
        self.token.cancel();
        let handles: Vec<_> = self.lock_handles().drain(..).collect();
        let count = handles.len();
        for handle in handles {
            handle.abort();
        }
        log_debug!("cancelled {count} deferred action(s)");
    }

    fn lock_handles(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        match self.handles.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
