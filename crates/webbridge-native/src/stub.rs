// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inert view for targets without a native web view (desktop, CI).
//
// Every call succeeds and nothing is ever rendered or loaded, so a session
// running on top of it stays attached but never becomes ready.

use webbridge_core::error::Result;
use webbridge_core::types::{Margins, ViewOptions};

use crate::traits::{NativeView, ViewEventSink};

/// No-op view returned for unsupported platforms.
#[derive(Debug, Default)]
pub struct UnsupportedView {
    margins: Margins,
    visible: bool,
    last_url: Option<String>,
    // Held so the sink lives as long as the view, like a real provider's.
    events: Option<ViewEventSink>,
}

impl UnsupportedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// The last URL passed to `load_url`, kept for diagnostics.
    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }
}

impl NativeView for UnsupportedView {
    fn platform_name(&self) -> &str {
        "Unsupported (stub)"
    }

    fn init(&mut self, _options: &ViewOptions, events: ViewEventSink) -> Result<()> {
        tracing::warn!("native web view is not available on this platform; view is inert");
        self.events = Some(events);
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        tracing::debug!(url, "stub view ignoring load_url");
        self.last_url = Some(url.to_owned());
        Ok(())
    }

    fn evaluate_script(&mut self, _js: &str) -> Result<()> {
        Ok(())
    }

    fn set_margins(&mut self, margins: Margins) -> Result<()> {
        self.margins = margins;
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn destroy(&mut self) {
        self.events = None;
    }
}
