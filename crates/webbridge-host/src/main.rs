// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Webbridge — headless host.
//
// Entry point. Initialises logging, loads the bridge config, attaches one
// session with the platform's native view, and logs every bridge event until
// the session ends or Ctrl-C detaches it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use webbridge_core::{BridgeConfig, Margins};
use webbridge_native::ProviderRegistry;
use webbridge_session::{BridgeController, BridgeEvent, HostContext};

/// Attach a web view bridge session and log what the page reports.
#[derive(Parser, Debug)]
#[command(name = "webbridge", version, about)]
struct Args {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the bundled page.
    #[arg(long)]
    bundle_dir: Option<PathBuf>,

    /// Directory the page is staged into.
    #[arg(long)]
    writable_dir: Option<PathBuf>,

    /// Fail the attach if the page has not loaded after this many ms.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Viewport inset as left,top,right,bottom.
    #[arg(long, allow_hyphen_values = true)]
    margins: Option<Margins>,
}

impl Args {
    fn into_config(self) -> webbridge_core::error::Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::load(path)?,
            None => BridgeConfig::default(),
        };
        if let Some(dir) = self.bundle_dir {
            config.bundle_dir = dir;
        }
        if let Some(dir) = self.writable_dir {
            config.writable_dir = dir;
        }
        if let Some(ms) = self.timeout_ms {
            config.load_timeout_ms = Some(ms);
        }
        if let Some(margins) = self.margins {
            config.margins = margins;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        source = %config.source_path().display(),
        destination = %config.destination_path().display(),
        "Webbridge starting"
    );

    let mut controller = BridgeController::new(config, ProviderRegistry::with_platform_defaults());
    let host = HostContext::new(tokio::runtime::Handle::current());
    if let Err(e) = controller.attach(&host) {
        tracing::error!(error = %e, "attach failed");
        return ExitCode::FAILURE;
    }

    let mut status = ExitCode::SUCCESS;
    loop {
        tokio::select! {
            event = controller.next_event() => match event {
                Some(BridgeEvent::Ready { page_body }) => {
                    tracing::info!(body_len = page_body.len(), "bridge ready");
                }
                Some(BridgeEvent::Message(text)) => {
                    tracing::info!(message = %text, "page message");
                }
                Some(BridgeEvent::TerminalArtifact(reference)) => {
                    tracing::info!(artifact = %reference, "artifact produced");
                }
                Some(BridgeEvent::AttachFailed(failure)) => {
                    tracing::error!(%failure, retriable = failure.is_retriable(), "attach failed");
                    status = ExitCode::FAILURE;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted; detaching");
                controller.detach();
                break;
            }
        }
    }

    tracing::info!(session = %controller.id(), phase = ?controller.phase(), "Webbridge stopped");
    status
}
