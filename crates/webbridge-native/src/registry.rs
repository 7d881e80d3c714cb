// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Registry of native view variants, keyed by platform.

use std::collections::HashMap;
use std::fmt;

use webbridge_core::types::Platform;

use crate::stub::UnsupportedView;
use crate::traits::{NativeView, ViewFactory};

/// Picks the native view variant for a platform.
///
/// Lookups that find nothing fall back to [`UnsupportedView`], so callers
/// always get a working (if inert) view and never need to branch again.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<Platform, ViewFactory>,
}

impl ProviderRegistry {
    /// Empty registry: every platform resolves to the stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the variants compiled into this target.
    pub fn with_platform_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(target_os = "android")]
        {
            registry = registry.register(Platform::Android, || {
                Box::new(crate::android::AndroidView::new())
            });
        }
        #[cfg(target_os = "ios")]
        {
            registry = registry.register(Platform::Ios, || Box::new(crate::ios::IosView::new()));
        }
        registry
    }

    /// Add or replace the variant for `platform`.
    pub fn register<F>(mut self, platform: Platform, factory: F) -> Self
    where
        F: Fn() -> Box<dyn NativeView> + Send + Sync + 'static,
    {
        self.factories.insert(platform, Box::new(factory));
        self
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.factories.contains_key(&platform)
    }

    /// Build a fresh view for `platform`.
    pub fn create(&self, platform: Platform) -> Box<dyn NativeView> {
        match self.factories.get(&platform) {
            Some(factory) => factory(),
            None => {
                tracing::info!(
                    platform = platform.name(),
                    "no native web view registered; using stub"
                );
                Box::new(UnsupportedView::new())
            }
        }
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("platforms", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webbridge_core::error::Result;
    use webbridge_core::types::{Margins, ViewOptions};

    use crate::traits::ViewEventSink;

    struct NamedView(&'static str);

    impl NativeView for NamedView {
        fn platform_name(&self) -> &str {
            self.0
        }
        fn init(&mut self, _: &ViewOptions, _: ViewEventSink) -> Result<()> {
            Ok(())
        }
        fn load_url(&mut self, _: &str) -> Result<()> {
            Ok(())
        }
        fn evaluate_script(&mut self, _: &str) -> Result<()> {
            Ok(())
        }
        fn set_margins(&mut self, _: Margins) -> Result<()> {
            Ok(())
        }
        fn set_visible(&mut self, _: bool) -> Result<()> {
            Ok(())
        }
        fn is_visible(&self) -> bool {
            true
        }
        fn destroy(&mut self) {}
    }

    #[test]
    fn unknown_platform_falls_back_to_stub() {
        let registry = ProviderRegistry::new();
        assert!(!registry.supports(Platform::Android));
        assert_eq!(
            registry.create(Platform::Android).platform_name(),
            "Unsupported (stub)"
        );
    }

    #[test]
    fn registered_variant_is_selected() {
        let registry = ProviderRegistry::new()
            .register(Platform::Ios, || Box::new(NamedView("fake iOS")));
        assert!(registry.supports(Platform::Ios));
        assert_eq!(registry.create(Platform::Ios).platform_name(), "fake iOS");
        assert_eq!(
            registry.create(Platform::Unsupported).platform_name(),
            "Unsupported (stub)"
        );
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = ProviderRegistry::new()
            .register(Platform::Android, || Box::new(NamedView("first")))
            .register(Platform::Android, || Box::new(NamedView("second")));
        assert_eq!(registry.create(Platform::Android).platform_name(), "second");
    }

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    #[test]
    fn desktop_defaults_register_nothing() {
        let registry = ProviderRegistry::with_platform_defaults();
        assert!(!registry.supports(Platform::Android));
        assert!(!registry.supports(Platform::Ios));
    }
}
