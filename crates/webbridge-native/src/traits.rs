// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic capability set every native web view variant provides.
//
// The bridge session only ever talks to a `dyn NativeView`; which concrete
// variant sits behind it is decided once, by the registry, when the session
// attaches.

use std::fmt;
use std::sync::Arc;

use webbridge_core::error::Result;
use webbridge_core::types::{Margins, ViewOptions};

/// Callbacks a native view raises towards the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A page finished loading. Carries the body the view reports.
    Loaded(String),
    /// The page called `Unity.call(msg)`.
    Message(String),
}

/// Handle a native view uses to fire its `loaded` / `message` callbacks.
///
/// Cheap to clone and callable from any thread: native toolkits deliver
/// their callbacks on the UI thread, the JVM thread, or a WebKit queue. The
/// receiving side decides on which task the event is actually handled.
#[derive(Clone)]
pub struct ViewEventSink {
    deliver: Arc<dyn Fn(ViewEvent) + Send + Sync>,
}

impl ViewEventSink {
    pub fn new(deliver: impl Fn(ViewEvent) + Send + Sync + 'static) -> Self {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    /// A sink that drops everything.
    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    pub fn emit(&self, event: ViewEvent) {
        (self.deliver)(event);
    }

    pub fn loaded(&self, body: impl Into<String>) {
        self.emit(ViewEvent::Loaded(body.into()));
    }

    pub fn message(&self, text: impl Into<String>) {
        self.emit(ViewEvent::Message(text.into()));
    }
}

impl fmt::Debug for ViewEventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewEventSink").finish_non_exhaustive()
    }
}

/// A platform web view that can be embedded in the host surface.
///
/// Implementations must tolerate any call order after `init`, and `destroy`
/// must be safe to call more than once.
pub trait NativeView: Send {
    /// Human-readable platform name (e.g. "Android", "iOS").
    fn platform_name(&self) -> &str;

    /// Create the underlying view. `events` receives every later
    /// `loaded` / `message` callback.
    fn init(&mut self, options: &ViewOptions, events: ViewEventSink) -> Result<()>;

    /// Navigate to `url`.
    fn load_url(&mut self, url: &str) -> Result<()>;

    /// Run JavaScript in the current page.
    fn evaluate_script(&mut self, js: &str) -> Result<()>;

    /// Inset the view's viewport from the edges of the host surface.
    fn set_margins(&mut self, margins: Margins) -> Result<()>;

    fn set_visible(&mut self, visible: bool) -> Result<()>;

    fn is_visible(&self) -> bool;

    /// Tear the view down and stop delivering callbacks.
    ///
    /// Callbacks stop even when the platform view itself cannot be released.
    /// On iOS the view can only be released on the main thread; called from
    /// any other thread, `destroy` logs an error and leaks the view, which
    /// stays on screen but no longer reaches the sink. Owners that may be
    /// dropped off the main thread should call `destroy` (or the session's
    /// `detach`) from the main thread first.
    fn destroy(&mut self);
}

/// Constructor for one native view variant.
pub type ViewFactory = Box<dyn Fn() -> Box<dyn NativeView> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn sink_forwards_both_callbacks_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            ViewEventSink::new(move |event| seen.lock().expect("lock").push(event))
        };

        sink.loaded("<html></html>");
        sink.clone().message("hello");

        assert_eq!(
            *seen.lock().expect("lock"),
            vec![
                ViewEvent::Loaded("<html></html>".into()),
                ViewEvent::Message("hello".into()),
            ]
        );
    }

    #[test]
    fn sink_is_callable_from_other_threads() {
        let seen = Arc::new(Mutex::new(0usize));
        let sink = {
            let seen = Arc::clone(&seen);
            ViewEventSink::new(move |_| *seen.lock().expect("lock") += 1)
        };

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = sink.clone();
                std::thread::spawn(move || sink.message(format!("msg {i}")))
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }

        assert_eq!(*seen.lock().expect("lock"), 4);
    }
}
