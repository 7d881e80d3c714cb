// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The host side of `attach`: where background work gets scheduled.

use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Scheduler the bridge runs its background work on.
///
/// Staging and the optional load timeout run here so `attach` returns
/// immediately. Their results come back through the controller's own queue,
/// never through shared state.
#[derive(Debug, Clone)]
pub struct HostContext {
    runtime: Handle,
}

impl HostContext {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Context for the tokio runtime the caller is running in, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    pub(crate) fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_context_outside_runtime() {
        assert!(HostContext::try_current().is_none());
    }

    #[tokio::test]
    async fn spawned_task_runs() {
        let host = HostContext::try_current().expect("inside runtime");
        let (tx, rx) = tokio::sync::oneshot::channel();
        host.spawn(async move {
            let _ = tx.send(7);
        });
        assert_eq!(rx.await.expect("task result"), 7);
    }
}
