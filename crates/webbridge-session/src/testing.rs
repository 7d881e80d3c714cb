// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test support: a native view that records every call and lets tests fire
// its callbacks by hand.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::types::{Margins, Platform, ViewOptions};
use webbridge_core::BridgeConfig;
use webbridge_native::{NativeView, ProviderRegistry, ViewEventSink};

use crate::controller::BridgeController;
use crate::events::BridgeEvent;

/// Everything the recording views saw, shared across all views a registry
/// created.
#[derive(Debug, Default)]
pub(crate) struct Recorded {
    pub created: usize,
    pub urls: Vec<String>,
    pub scripts: Vec<String>,
    pub margins: Option<Margins>,
    pub visible: bool,
    pub destroyed: usize,
    pub fail_init: bool,
    pub fail_load: bool,
    // One per initialised view, kept after destroy so tests can simulate
    // late native callbacks.
    sinks: Vec<ViewEventSink>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(Arc<Mutex<Recorded>>);

impl Recorder {
    pub fn state(&self) -> MutexGuard<'_, Recorded> {
        self.0.lock().expect("recorder lock poisoned")
    }

    /// Registry whose current-platform variant is a recording view.
    pub fn registry(&self) -> ProviderRegistry {
        let shared = self.clone();
        ProviderRegistry::new().register(Platform::current(), move || {
            shared.state().created += 1;
            Box::new(RecordingView {
                recorder: shared.clone(),
                visible: false,
            })
        })
    }

    /// Sink of the `index`-th initialised view.
    fn sink(&self, index: usize) -> ViewEventSink {
        self.state()
            .sinks
            .get(index)
            .cloned()
            .expect("no view initialised at that index")
    }

    fn latest_sink(&self) -> ViewEventSink {
        self.state()
            .sinks
            .last()
            .cloned()
            .expect("view was never initialised")
    }

    pub fn fire_loaded(&self, body: &str) {
        self.latest_sink().loaded(body);
    }

    pub fn fire_message(&self, text: &str) {
        self.latest_sink().message(text);
    }

    /// Fire a page message from an earlier view, e.g. one already replaced
    /// by a re-attach.
    pub fn fire_message_from(&self, index: usize, text: &str) {
        self.sink(index).message(text);
    }
}

struct RecordingView {
    recorder: Recorder,
    visible: bool,
}

impl NativeView for RecordingView {
    fn platform_name(&self) -> &str {
        "Recording"
    }

    fn init(&mut self, _options: &ViewOptions, events: ViewEventSink) -> Result<()> {
        let mut state = self.recorder.state();
        if state.fail_init {
            return Err(BridgeError::Native("init refused".into()));
        }
        state.sinks.push(events);
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        let mut state = self.recorder.state();
        if state.fail_load {
            return Err(BridgeError::Native("load refused".into()));
        }
        state.urls.push(url.to_owned());
        Ok(())
    }

    fn evaluate_script(&mut self, js: &str) -> Result<()> {
        self.recorder.state().scripts.push(js.to_owned());
        Ok(())
    }

    fn set_margins(&mut self, margins: Margins) -> Result<()> {
        self.recorder.state().margins = Some(margins);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        self.recorder.state().visible = visible;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn destroy(&mut self) {
        self.recorder.state().destroyed += 1;
    }
}

/// A bundle dir holding `webview.html` with `page`, and a config pointing at
/// it. Keep the `TempDir` alive for the duration of the test.
pub(crate) fn bundle_fixture(page: &str) -> (tempfile::TempDir, BridgeConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = BridgeConfig {
        bundle_dir: dir.path().join("bundle"),
        writable_dir: dir.path().join("persistent"),
        ..Default::default()
    };
    std::fs::create_dir_all(&config.bundle_dir).expect("mkdir bundle");
    std::fs::write(config.source_path(), page).expect("write page");
    (dir, config)
}

/// `next_event`, bounded so a broken handshake fails instead of hanging.
pub(crate) async fn next(controller: &mut BridgeController) -> Option<BridgeEvent> {
    tokio::time::timeout(Duration::from_secs(5), controller.next_event())
        .await
        .expect("timed out waiting for bridge event")
}

/// Poll until `done` holds, returning every event raised on the way.
pub(crate) async fn drive_until(
    controller: &mut BridgeController,
    mut done: impl FnMut(&BridgeController) -> bool,
) -> Vec<BridgeEvent> {
    let mut events = Vec::new();
    for _ in 0..1000 {
        events.extend(controller.poll_events());
        if done(controller) {
            return events;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "condition never reached; phase = {:?}, events = {events:?}",
        controller.phase()
    );
}
