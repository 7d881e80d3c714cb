// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handle table routing native callbacks back to the owning view's sink.
//
// Native glue only knows an integer handle (a `jlong` on Android, an
// `int64_t` on iOS). Entry points exported to that glue look the handle up
// here. Unknown handles belong to destroyed views and are dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::traits::{ViewEvent, ViewEventSink};

pub(crate) type Handle = i64;

static NEXT_HANDLE: AtomicI64 = AtomicI64::new(1);

fn table() -> MutexGuard<'static, HashMap<Handle, ViewEventSink>> {
    static TABLE: OnceLock<Mutex<HashMap<Handle, ViewEventSink>>> = OnceLock::new();
    // Never panic here: callers sit behind an FFI boundary.
    TABLE
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// A table entry that is removed again on drop unless [`keep`](Self::keep)
/// is called. Native `init` code holds one while it creates the platform
/// view, so every early return releases the handle.
#[must_use = "dropping a registration unregisters its handle"]
pub(crate) struct Registration {
    handle: Handle,
    kept: bool,
}

impl Registration {
    pub(crate) fn handle(&self) -> Handle {
        self.handle
    }

    /// Leave the entry in the table. The caller now owns the handle and must
    /// `unregister` it on destroy.
    pub(crate) fn keep(mut self) -> Handle {
        self.kept = true;
        self.handle
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if !self.kept {
            unregister(self.handle);
        }
    }
}

/// Store `sink` under a fresh handle native glue should report back with.
pub(crate) fn register(sink: ViewEventSink) -> Registration {
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    table().insert(handle, sink);
    Registration {
        handle,
        kept: false,
    }
}

pub(crate) fn unregister(handle: Handle) -> bool {
    table().remove(&handle).is_some()
}

/// Deliver `event` to the sink behind `handle`. Returns false if the handle
/// is unknown.
pub(crate) fn dispatch(handle: Handle, event: ViewEvent) -> bool {
    // Clone out so the sink runs without the table lock held.
    let sink = table().get(&handle).cloned();
    match sink {
        Some(sink) => {
            sink.emit(event);
            true
        }
        None => {
            tracing::debug!(handle, "dropping callback for destroyed view");
            false
        }
    }
}
