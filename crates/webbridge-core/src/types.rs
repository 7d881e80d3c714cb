// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Webbridge message bridge.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one bridge session (one embedding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Viewport inset of the native view, in pixels.
///
/// Values are handed to the native view as-is. Negative insets are legal;
/// what they mean is up to the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl std::fmt::Display for Margins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

impl std::str::FromStr for Margins {
    type Err = String;

    /// Parse `left,top,right,bottom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!("expected 4 comma-separated values, got {}", parts.len()));
        }
        let mut values = [0i32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|e| format!("invalid margin {part:?}: {e}"))?;
        }
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

/// Options handed to the native view when it is initialised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Render the page over a transparent background.
    pub transparent: bool,
    /// Allow pinch-zoom inside the page.
    pub zoom: bool,
    /// Override the platform user agent.
    pub user_agent: Option<String>,
    /// Android only: host the view in its own native layer instead of the
    /// engine's surface.
    pub separated: bool,
}

/// Target platform family, used to pick a native view variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Android,
    Ios,
    /// Anything without a native web view integration (desktop, CI).
    Unsupported,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Unsupported
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Outcome of classifying a message sent by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// The message references the finished artifact; the session ends.
    Terminal,
    /// Any other page-to-host call.
    NonTerminal,
}

/// Classify an inbound page message.
///
/// A message is terminal when `marker` occurs anywhere in it. The test is a
/// plain case-sensitive substring search so that query strings or wrapping
/// text around the artifact reference still match. An empty marker matches
/// nothing.
pub fn classify_message(text: &str, marker: &str) -> MessageKind {
    if !marker.is_empty() && text.contains(marker) {
        MessageKind::Terminal
    } else {
        MessageKind::NonTerminal
    }
}
