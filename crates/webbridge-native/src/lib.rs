// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Webbridge — native web view providers.
//!
//! This crate defines the capability set a platform web view must offer
//! (`NativeView`) and the variants that implement it: Android (JNI),
//! iOS (C ABI into Objective-C glue) and an inert stub for everything else.
//! The session layer picks one through [`ProviderRegistry`] and never looks
//! at the platform again.

pub mod registry;
pub mod stub;
pub mod traits;

#[cfg(any(target_os = "android", target_os = "ios", test))]
mod callbacks;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

pub use registry::ProviderRegistry;
pub use stub::UnsupportedView;
pub use traits::{NativeView, ViewEvent, ViewEventSink, ViewFactory};
