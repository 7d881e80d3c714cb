// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Events raised to the host, and the inputs feeding the session queue.

use std::time::Duration;

use thiserror::Error;

use webbridge_core::error::{BridgeError, Result};
use webbridge_native::ViewEvent;

use crate::stager::StagedAsset;

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The page loaded and `Unity.call` is installed. Raised once per attach.
    /// The body is whatever the native view reported; diagnostics only.
    Ready { page_body: String },
    /// A page message that is not an artifact reference, unchanged.
    Message(String),
    /// The page produced its artifact. The view has already been released
    /// and nothing else is raised for this attach.
    TerminalArtifact(String),
    /// The attach could not complete. The view has already been released.
    AttachFailed(AttachFailure),
}

/// Why an attach never became ready.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachFailure {
    #[error("staging the page failed: {reason}")]
    Staging { reason: String, retriable: bool },

    #[error("native view rejected {operation}: {reason}")]
    Native {
        operation: &'static str,
        reason: String,
    },

    #[error("page did not load within {0:?}")]
    Timeout(Duration),
}

impl AttachFailure {
    pub(crate) fn staging(err: &BridgeError) -> Self {
        Self::Staging {
            reason: err.to_string(),
            retriable: err.is_retriable(),
        }
    }

    pub(crate) fn native(operation: &'static str, err: &BridgeError) -> Self {
        Self::Native {
            operation,
            reason: err.to_string(),
        }
    }

    /// Whether attaching again is worth a try.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Staging { retriable, .. } => *retriable,
            Self::Native { .. } | Self::Timeout(_) => true,
        }
    }
}

/// Work item on the session queue. Tagged with the attach generation that
/// produced it so results from an earlier attach can be told apart.
#[derive(Debug)]
pub(crate) enum SessionInput {
    Staged {
        generation: u64,
        result: Result<StagedAsset>,
    },
    View {
        generation: u64,
        event: ViewEvent,
    },
    LoadTimedOut {
        generation: u64,
        after: Duration,
    },
}

impl SessionInput {
    pub(crate) fn generation(&self) -> u64 {
        match self {
            Self::Staged { generation, .. }
            | Self::View { generation, .. }
            | Self::LoadTimedOut { generation, .. } => *generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_asset_failure_is_final() {
        let failure = AttachFailure::staging(&BridgeError::AssetMissing {
            path: PathBuf::from("/bundle/webview.html"),
        });
        assert!(!failure.is_retriable());
        assert_eq!(
            failure.to_string(),
            "staging the page failed: bundled asset not found: /bundle/webview.html"
        );
    }

    #[test]
    fn native_and_timeout_failures_are_retriable() {
        let native = AttachFailure::native("load_url", &BridgeError::Native("gone".into()));
        assert!(native.is_retriable());
        assert_eq!(
            native.to_string(),
            "native view rejected load_url: native view error: gone"
        );
        assert!(AttachFailure::Timeout(Duration::from_secs(1)).is_retriable());
    }
}
