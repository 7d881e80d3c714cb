// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge controller. Owns the native view for one embedding and runs the
// attach → stage → load → inject → message handshake.
//
// Everything that happens asynchronously (the copy finishing, the view
// reporting a load or a page message, the load timeout) is pushed onto a
// single queue and applied by whoever drives the controller through
// `next_event` or `poll_events`. Session state is therefore only ever
// mutated from one place and needs no locking. Each queued input carries the
// attach generation it belongs to; inputs from an earlier attach, or arriving
// after the session ended, are dropped.

use std::collections::VecDeque;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::types::{MessageKind, Platform, SessionId, classify_message};
use webbridge_core::{BridgeConfig, Margins};
use webbridge_native::{NativeView, ProviderRegistry, ViewEvent, ViewEventSink};

use crate::adapter::ADAPTER_SCRIPT;
use crate::events::{AttachFailure, BridgeEvent, SessionInput};
use crate::host::HostContext;
use crate::stager::{AssetSource, AssetStager, StagedAsset};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Never attached, or explicitly detached.
    Detached,
    /// View created, page being copied.
    Staging,
    /// Copy done, `load_url` issued, waiting for the first load.
    Loading,
    /// Adapter script issued; page messages are classified.
    Ready,
    /// Terminal artifact received.
    Finished,
    /// Attach failed.
    Failed,
}

impl Phase {
    /// Whether a view is owned and inputs are being accepted.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Staging | Self::Loading | Self::Ready)
    }
}

/// One embedded page and its message bridge.
pub struct BridgeController {
    id: SessionId,
    config: BridgeConfig,
    registry: ProviderRegistry,
    platform: Platform,
    source: Option<AssetSource>,
    margins: Margins,
    visible: bool,
    view: Option<Box<dyn NativeView>>,
    phase: Phase,
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
    inbox_tx: UnboundedSender<SessionInput>,
    inbox_rx: UnboundedReceiver<SessionInput>,
    pending: VecDeque<BridgeEvent>,
}

impl BridgeController {
    /// Controller for the current platform. Initial margins and visibility
    /// come from `config`.
    pub fn new(config: BridgeConfig, registry: ProviderRegistry) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            id: SessionId::new(),
            margins: config.margins,
            visible: config.visible,
            config,
            registry,
            platform: Platform::current(),
            source: None,
            view: None,
            phase: Phase::Detached,
            generation: 0,
            tasks: Vec::new(),
            inbox_tx,
            inbox_rx,
            pending: VecDeque::new(),
        }
    }

    /// Read the page from `source` instead of the configured bundle dir.
    pub fn with_asset_source(mut self, source: AssetSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a native view is currently owned.
    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    /// Create the native view and start staging the page.
    ///
    /// Returns immediately; progress is reported through events. Rejected
    /// with `AlreadyAttached` while a previous attach is still in flight.
    /// After a terminal artifact, a failure, or `detach`, attaching again
    /// starts a fresh session with a new view.
    #[instrument(skip_all, fields(session = %self.id))]
    pub fn attach(&mut self, host: &HostContext) -> Result<()> {
        if self.phase.is_active() {
            warn!(phase = ?self.phase, "attach rejected: session already attached");
            return Err(BridgeError::AlreadyAttached);
        }
        self.config.validate()?;

        self.generation += 1;
        let generation = self.generation;

        let mut view = self.registry.create(self.platform);
        info!(platform = view.platform_name(), generation, "attaching web view");
        if let Err(e) = view.init(&self.config.view, self.view_sink(generation)) {
            warn!(error = %e, "native view init failed");
            view.destroy();
            self.phase = Phase::Failed;
            return Err(e);
        }
        if let Err(e) = view.set_visible(self.visible) {
            warn!(error = %e, "native view refused visibility change");
        }
        self.view = Some(view);
        self.phase = Phase::Staging;

        let stager = match &self.source {
            Some(source) => AssetStager::new(source.clone(), self.config.destination_path()),
            None => AssetStager::from_config(&self.config),
        };
        let tx = self.inbox_tx.clone();
        self.tasks.push(host.spawn(async move {
            let result = stager.stage().await;
            if tx.send(SessionInput::Staged { generation, result }).is_err() {
                debug!("session dropped before staging finished");
            }
        }));

        if let Some(after) = self.config.load_timeout() {
            let tx = self.inbox_tx.clone();
            self.tasks.push(host.spawn(async move {
                tokio::time::sleep(after).await;
                let _ = tx.send(SessionInput::LoadTimedOut { generation, after });
            }));
        }

        self.apply_margins();
        Ok(())
    }

    /// Set the viewport inset. Applied right away if a view exists,
    /// otherwise on the next attach.
    pub fn set_margins(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        self.margins = Margins::new(left, top, right, bottom);
        self.apply_margins();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if let Some(view) = self.view.as_mut() {
            if let Err(e) = view.set_visible(visible) {
                warn!(session = %self.id, error = %e, "native view refused visibility change");
            }
        }
    }

    /// Release the view and abandon any in-flight copy. No event is raised.
    pub fn detach(&mut self) {
        if self.view.is_none() && !self.phase.is_active() {
            return;
        }
        info!(session = %self.id, phase = ?self.phase, "detaching web view");
        self.teardown();
        self.phase = Phase::Detached;
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the session is no longer active and every raised
    /// event has been handed out.
    pub async fn next_event(&mut self) -> Option<BridgeEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if !self.phase.is_active() {
                return None;
            }
            let input = self.inbox_rx.recv().await?;
            self.handle(input);
        }
    }

    /// Apply everything queued so far and return the events it raised,
    /// without waiting. Meant to be called once per frame by game loops.
    pub fn poll_events(&mut self) -> Vec<BridgeEvent> {
        while let Ok(input) = self.inbox_rx.try_recv() {
            self.handle(input);
        }
        self.pending.drain(..).collect()
    }

    // -- Queue handling -------------------------------------------------------

    fn view_sink(&self, generation: u64) -> ViewEventSink {
        let tx = self.inbox_tx.clone();
        ViewEventSink::new(move |event| {
            let _ = tx.send(SessionInput::View { generation, event });
        })
    }

    fn handle(&mut self, input: SessionInput) {
        let generation = input.generation();
        if generation != self.generation || !self.phase.is_active() {
            debug!(
                session = %self.id,
                generation,
                current = self.generation,
                phase = ?self.phase,
                "dropping input for inactive session"
            );
            return;
        }

        match input {
            SessionInput::Staged { result: Ok(staged), .. } => self.on_staged(staged),
            SessionInput::Staged { result: Err(e), .. } => {
                warn!(session = %self.id, error = %e, "asset staging failed");
                self.fail(AttachFailure::staging(&e));
            }
            SessionInput::View { event: ViewEvent::Loaded(body), .. } => self.on_loaded(body),
            SessionInput::View { event: ViewEvent::Message(text), .. } => self.on_message(text),
            SessionInput::LoadTimedOut { after, .. } => {
                if matches!(self.phase, Phase::Staging | Phase::Loading) {
                    warn!(session = %self.id, ?after, "page load timed out");
                    self.fail(AttachFailure::Timeout(after));
                }
            }
        }
    }

    fn on_staged(&mut self, staged: StagedAsset) {
        if self.phase != Phase::Staging {
            return;
        }
        let url = staged.file_url();
        let Some(view) = self.view.as_mut() else {
            return;
        };
        match view.load_url(url) {
            Ok(()) => {
                info!(session = %self.id, %url, "loading staged page");
                self.phase = Phase::Loading;
            }
            Err(e) => self.fail(AttachFailure::native("load_url", &e)),
        }
    }

    fn on_loaded(&mut self, body: String) {
        if self.phase == Phase::Staging {
            // Nothing was navigated yet; this is the view's initial blank page.
            debug!(session = %self.id, "ignoring load reported before the page was requested");
            return;
        }
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let injected = view.evaluate_script(ADAPTER_SCRIPT);

        match (self.phase, injected) {
            (Phase::Loading, Ok(())) => {
                info!(session = %self.id, "page loaded; bridge ready");
                self.phase = Phase::Ready;
                self.pending.push_back(BridgeEvent::Ready { page_body: body });
            }
            (Phase::Loading, Err(e)) => self.fail(AttachFailure::native("evaluate_script", &e)),
            // Navigation inside the page: the adapter was re-issued.
            (_, Ok(())) => debug!(session = %self.id, "page reloaded; adapter re-injected"),
            (_, Err(e)) => warn!(session = %self.id, error = %e, "adapter re-injection failed"),
        }
    }

    fn on_message(&mut self, text: String) {
        if self.phase != Phase::Ready {
            debug!(session = %self.id, "dropping page message received before the adapter was injected");
            return;
        }
        debug!(session = %self.id, message = %text, "page message");

        match classify_message(&text, &self.config.artifact_marker) {
            MessageKind::Terminal => {
                info!(session = %self.id, artifact = %text, "artifact received; closing web view");
                self.teardown();
                self.phase = Phase::Finished;
                self.pending.push_back(BridgeEvent::TerminalArtifact(text));
            }
            MessageKind::NonTerminal => self.pending.push_back(BridgeEvent::Message(text)),
        }
    }

    fn fail(&mut self, failure: AttachFailure) {
        warn!(session = %self.id, %failure, "attach failed");
        self.teardown();
        self.phase = Phase::Failed;
        self.pending.push_back(BridgeEvent::AttachFailed(failure));
    }

    fn apply_margins(&mut self) {
        if let Some(view) = self.view.as_mut() {
            if let Err(e) = view.set_margins(self.margins) {
                warn!(session = %self.id, error = %e, "native view refused margins");
            }
        }
    }

    fn teardown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(mut view) = self.view.take() {
            view.destroy();
        }
    }
}

/// Releases the view like `detach`. See [`NativeView::destroy`] for what
/// happens when this runs off the main thread on iOS.
impl Drop for BridgeController {
    fn drop(&mut self) {
        self.teardown();
    }
}
