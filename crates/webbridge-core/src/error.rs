// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Webbridge.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Webbridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Asset staging --
    #[error("bundled asset not found: {}", path.display())]
    AssetMissing { path: PathBuf },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Native view --
    #[error("native view error: {0}")]
    Native(String),

    // -- Session lifecycle --
    #[error("bridge session is already attached")]
    AlreadyAttached,
}

impl BridgeError {
    /// Whether calling `attach` again has a reasonable chance of succeeding.
    ///
    /// The bridge never retries by itself; hosts use this to decide whether to
    /// offer a retry.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Native(_) => true,
            Self::Io(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
            Self::AssetMissing { .. }
            | Self::Config(_)
            | Self::Serialization(_)
            | Self::AlreadyAttached => false,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;
