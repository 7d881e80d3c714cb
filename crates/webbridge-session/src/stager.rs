// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Asset staging: copies the bundled page somewhere a `file://` URL can reach.
//
// Bundle locations are read-only and, on Android, not even plain files (they
// live inside the APK). The page is therefore copied into the writable data
// directory on every attach and loaded from there. No caching: the copy is
// always rewritten in full.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use url::Url;

use webbridge_core::BridgeConfig;
use webbridge_core::error::{BridgeError, Result};

/// Where the bundled page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// A plain file in the bundle directory.
    File(PathBuf),
    /// Bytes the host already read out of its own bundle (e.g. an APK's
    /// streaming assets).
    Memory(Vec<u8>),
}

/// A completed copy of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAsset {
    /// Absolute path the copy was written to.
    pub path: PathBuf,
    /// `file://` URL of `path`, percent-encoded.
    pub url: Url,
    /// Number of bytes written.
    pub len: u64,
    /// SHA-256 of the written bytes, lowercase hex.
    pub sha256: String,
}

impl StagedAsset {
    /// URL the native view should load.
    pub fn file_url(&self) -> &str {
        self.url.as_str()
    }
}

/// `file://` URL for `path`. Relative paths are resolved against the current
/// directory first.
pub fn file_url(path: &Path) -> Result<Url> {
    let absolute = std::path::absolute(path)?;
    Url::from_file_path(&absolute).map_err(|()| {
        BridgeError::Config(format!(
            "{} cannot be expressed as a file URL",
            absolute.display()
        ))
    })
}

/// One-shot copier from a read-only source to a writable destination.
#[derive(Debug, Clone)]
pub struct AssetStager {
    source: AssetSource,
    destination: PathBuf,
}

impl AssetStager {
    pub fn new(source: AssetSource, destination: impl Into<PathBuf>) -> Self {
        Self {
            source,
            destination: destination.into(),
        }
    }

    /// Stager for the page named in `config`, read from its bundle dir.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            AssetSource::File(config.source_path()),
            config.destination_path(),
        )
    }

    /// Copy the source to the destination, overwriting whatever is there.
    ///
    /// Fails with `AssetMissing` when the source file does not exist and with
    /// `Io` for any other read or write problem. On failure nothing should
    /// be loaded from the destination.
    #[instrument(skip(self), fields(destination = %self.destination.display()))]
    pub async fn stage(&self) -> Result<StagedAsset> {
        let bytes = match &self.source {
            AssetSource::File(path) => read_source(path).await?,
            AssetSource::Memory(bytes) => bytes.clone(),
        };

        let destination = std::path::absolute(&self.destination)?;
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&destination, &bytes).await?;

        let staged = StagedAsset {
            url: file_url(&destination)?,
            path: destination,
            len: bytes.len() as u64,
            sha256: hash_bytes(&bytes),
        };
        info!(bytes = staged.len, sha256 = %staged.sha256, url = %staged.url, "asset staged");
        Ok(staged)
    }
}

async fn read_source(path: &Path) -> Result<Vec<u8>> {
    debug!(source = %path.display(), "reading bundled asset");
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BridgeError::AssetMissing {
                path: path.to_path_buf(),
            }
        } else {
            BridgeError::Io(e)
        }
    })
}

fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
