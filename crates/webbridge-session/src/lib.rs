// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Webbridge Session — the bridge controller and the asset stager it drives.
// This crate sits between the host (which attaches, sets margins and listens
// for events) and the native view selected from `webbridge-native`.

pub mod adapter;
pub mod controller;
pub mod events;
pub mod host;
pub mod stager;

#[cfg(test)]
mod testing;

pub use controller::{BridgeController, Phase};
pub use events::{AttachFailure, BridgeEvent};
pub use host::HostContext;
pub use stager::{AssetSource, AssetStager, StagedAsset};
