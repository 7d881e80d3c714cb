// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware directory resolution for the bundle and staging locations.

use std::path::PathBuf;

/// Name of the per-application directory under the platform data root.
const APP_DIR: &str = "webbridge";

/// Writable directory the bundled page is staged into.
///
/// On desktop this uses a conventional location. On mobile the host should
/// pass its persistent data path through `BridgeConfig::writable_dir`.
pub fn default_writable_dir() -> PathBuf {
    data_root().join(APP_DIR)
}

/// Read-only directory holding the bundled assets.
///
/// Defaults to an `assets` directory next to the running executable.
pub fn default_bundle_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
        .unwrap_or_else(|| PathBuf::from("assets"))
}

fn data_root() -> PathBuf {
    // Try XDG data dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg);
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}
