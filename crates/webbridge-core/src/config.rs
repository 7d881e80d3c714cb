// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::paths;
use crate::types::{Margins, ViewOptions};

/// File name of the bundled page.
pub const DEFAULT_ASSET_NAME: &str = "webview.html";

/// Substring that marks a page message as the finished artifact reference.
pub const DEFAULT_ARTIFACT_MARKER: &str = ".glb";

/// Settings for one bridge session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// File name of the page, looked up in `bundle_dir` and staged into
    /// `writable_dir` under the same name.
    pub asset_name: String,
    /// Read-only location of the bundled page.
    pub bundle_dir: PathBuf,
    /// Writable location the page is copied to before loading.
    pub writable_dir: PathBuf,
    /// Messages containing this substring end the session.
    pub artifact_marker: String,
    /// Give up on the page if it has not loaded within this many
    /// milliseconds of `attach`. Disabled when absent.
    pub load_timeout_ms: Option<u64>,
    /// Initial viewport inset.
    pub margins: Margins,
    /// Whether the view is shown once created.
    pub visible: bool,
    /// Options passed to the native view on init.
    pub view: ViewOptions,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            asset_name: DEFAULT_ASSET_NAME.into(),
            bundle_dir: paths::default_bundle_dir(),
            writable_dir: paths::default_writable_dir(),
            artifact_marker: DEFAULT_ARTIFACT_MARKER.into(),
            load_timeout_ms: None,
            margins: Margins::ZERO,
            visible: true,
            view: ViewOptions::default(),
        }
    }
}

impl BridgeConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings the bridge cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.asset_name.is_empty() {
            return Err(BridgeError::Config("asset_name must not be empty".into()));
        }
        if Path::new(&self.asset_name).components().count() != 1 {
            return Err(BridgeError::Config(format!(
                "asset_name must be a plain file name, got {:?}",
                self.asset_name
            )));
        }
        if self.artifact_marker.is_empty() {
            return Err(BridgeError::Config("artifact_marker must not be empty".into()));
        }
        if self.load_timeout_ms == Some(0) {
            return Err(BridgeError::Config("load_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Path of the bundled (read-only) page.
    pub fn source_path(&self) -> PathBuf {
        self.bundle_dir.join(&self.asset_name)
    }

    /// Path the page is staged to.
    pub fn destination_path(&self) -> PathBuf {
        self.writable_dir.join(&self.asset_name)
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bundled_page() {
        let config = BridgeConfig::default();
        assert_eq!(config.asset_name, "webview.html");
        assert_eq!(config.artifact_marker, ".glb");
        assert_eq!(config.margins, Margins::ZERO);
        assert!(config.visible);
        assert!(config.load_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn paths_join_asset_name() {
        let config = BridgeConfig {
            bundle_dir: PathBuf::from("/app/assets"),
            writable_dir: PathBuf::from("/data/app"),
            ..Default::default()
        };
        assert_eq!(config.source_path(), PathBuf::from("/app/assets/webview.html"));
        assert_eq!(config.destination_path(), PathBuf::from("/data/app/webview.html"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bridge.json");
        std::fs::write(
            &path,
            r#"{ "load_timeout_ms": 1500, "margins": { "left": 1, "top": 2, "right": 3, "bottom": 4 } }"#,
        )
        .expect("write");

        let config = BridgeConfig::load(&path).expect("load");
        assert_eq!(config.load_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.margins, Margins::new(1, 2, 3, 4));
        assert_eq!(config.asset_name, DEFAULT_ASSET_NAME);
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bridge.json");
        let config = BridgeConfig {
            artifact_marker: ".vrm".into(),
            visible: false,
            view: ViewOptions {
                transparent: true,
                user_agent: Some("Webbridge/0.3".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        config.save(&path).expect("save");
        assert_eq!(BridgeConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn rejects_nested_asset_name() {
        let config = BridgeConfig {
            asset_name: "../escape.html".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = BridgeConfig {
            load_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bridge.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            BridgeConfig::load(&path),
            Err(BridgeError::Serialization(_))
        ));
    }
}
