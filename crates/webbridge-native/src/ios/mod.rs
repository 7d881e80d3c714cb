// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// iOS web view via a C ABI into the host's Objective-C glue.
//
// The glue owns a `WKWebView` added to the engine's root view controller and
// exports the `webbridge_view_*` functions declared below. It registers a
// `WKScriptMessageHandler` named `unityControl`; each posted message and each
// `didFinishNavigation` is reported back through `webbridge_on_message` /
// `webbridge_on_loaded`, which this module exports.
//
// All UIKit work must happen on the main thread. Every method checks for it
// with `MainThreadMarker` and returns `BridgeError::Native` when called
// off-main.

#![cfg(target_os = "ios")]

use std::ffi::{CStr, CString, c_char, c_void};
use std::ptr::NonNull;

use objc2::MainThreadMarker;

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::types::{Margins, ViewOptions};

use crate::callbacks::{self, Handle};
use crate::traits::{NativeView, ViewEvent, ViewEventSink};

// ---------------------------------------------------------------------------
// Host glue
// ---------------------------------------------------------------------------

unsafe extern "C" {
    fn webbridge_view_create(
        handle: i64,
        transparent: bool,
        zoom: bool,
        user_agent: *const c_char,
    ) -> *mut c_void;
    fn webbridge_view_load_url(view: *mut c_void, url: *const c_char);
    fn webbridge_view_evaluate_js(view: *mut c_void, js: *const c_char);
    fn webbridge_view_set_margins(view: *mut c_void, left: i32, top: i32, right: i32, bottom: i32);
    fn webbridge_view_set_visible(view: *mut c_void, visible: bool);
    fn webbridge_view_destroy(view: *mut c_void);
}

/// Opaque pointer to the glue's view object.
struct ViewPtr(NonNull<c_void>);

// SAFETY: the pointer is only dereferenced by the glue, and every call that
// passes it is gated on `MainThreadMarker`.
unsafe impl Send for ViewPtr {}

fn main_thread(op: &str) -> Result<MainThreadMarker> {
    MainThreadMarker::new()
        .ok_or_else(|| BridgeError::Native(format!("{op} must be called on the main thread")))
}

fn c_string(what: &str, value: &str) -> Result<CString> {
    CString::new(value)
        .map_err(|_| BridgeError::Native(format!("{what} contains an interior NUL byte")))
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// iOS web view backed by the host's `WKWebView` glue.
pub struct IosView {
    view: Option<ViewPtr>,
    handle: Option<Handle>,
    visible: bool,
}

impl IosView {
    pub fn new() -> Self {
        Self {
            view: None,
            handle: None,
            visible: false,
        }
    }

    fn raw(&self) -> Result<*mut c_void> {
        self.view
            .as_ref()
            .map(|v| v.0.as_ptr())
            .ok_or_else(|| BridgeError::Native("iOS view used before init".into()))
    }
}

impl Default for IosView {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeView for IosView {
    fn platform_name(&self) -> &str {
        "iOS"
    }

    fn init(&mut self, options: &ViewOptions, events: ViewEventSink) -> Result<()> {
        main_thread("init")?;
        let user_agent = options
            .user_agent
            .as_deref()
            .map(|ua| c_string("user agent", ua))
            .transpose()?;
        let ua_ptr = user_agent.as_ref().map_or(std::ptr::null(), |ua| ua.as_ptr());

        let registration = callbacks::register(events);
        // SAFETY: `ua_ptr` is null or a valid NUL-terminated string that
        // outlives the call; we are on the main thread.
        let raw = unsafe {
            webbridge_view_create(
                registration.handle(),
                options.transparent,
                options.zoom,
                ua_ptr,
            )
        };
        let ptr = NonNull::new(raw)
            .ok_or_else(|| BridgeError::Native("webbridge_view_create returned null".into()))?;

        let handle = registration.keep();
        tracing::info!(handle, "iOS: web view created");
        self.view = Some(ViewPtr(ptr));
        self.handle = Some(handle);
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        main_thread("load_url")?;
        let view = self.raw()?;
        let url_c = c_string("url", url)?;
        tracing::debug!(url, "iOS: loadURL");
        // SAFETY: `view` came from `webbridge_view_create` and has not been
        // destroyed; `url_c` outlives the call.
        unsafe { webbridge_view_load_url(view, url_c.as_ptr()) };
        Ok(())
    }

    fn evaluate_script(&mut self, js: &str) -> Result<()> {
        main_thread("evaluate_script")?;
        let view = self.raw()?;
        let js_c = c_string("script", js)?;
        // SAFETY: as in `load_url`.
        unsafe { webbridge_view_evaluate_js(view, js_c.as_ptr()) };
        Ok(())
    }

    fn set_margins(&mut self, margins: Margins) -> Result<()> {
        main_thread("set_margins")?;
        let view = self.raw()?;
        // SAFETY: live view pointer, main thread.
        unsafe {
            webbridge_view_set_margins(
                view,
                margins.left,
                margins.top,
                margins.right,
                margins.bottom,
            )
        };
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        main_thread("set_visible")?;
        let view = self.raw()?;
        // SAFETY: live view pointer, main thread.
        unsafe { webbridge_view_set_visible(view, visible) };
        self.visible = visible;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn destroy(&mut self) {
        if let Some(handle) = self.handle.take() {
            callbacks::unregister(handle);
        }
        let Some(view) = self.view.take() else {
            return;
        };
        if MainThreadMarker::new().is_none() {
            // UIKit objects may only be released on the main thread. The
            // handle is already gone, so the leaked view stays silent.
            tracing::error!("iOS: destroy called off the main thread; view leaked");
            return;
        }
        // SAFETY: pointer from `webbridge_view_create`, taken out of `self`
        // so it is destroyed exactly once.
        unsafe { webbridge_view_destroy(view.0.as_ptr()) };
        self.visible = false;
    }
}

impl Drop for IosView {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ---------------------------------------------------------------------------
// Callbacks from the glue
// ---------------------------------------------------------------------------

/// # Safety
/// `text` must be null or a valid NUL-terminated string for the duration of
/// the call.
unsafe fn forward(handle: i64, text: *const c_char, wrap: fn(String) -> ViewEvent) {
    if text.is_null() {
        callbacks::dispatch(handle, wrap(String::new()));
        return;
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    let s = unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned();
    callbacks::dispatch(handle, wrap(s));
}

/// Called by the glue when a navigation finished.
///
/// # Safety
/// `body` must be null or a valid NUL-terminated UTF-8 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn webbridge_on_loaded(handle: i64, body: *const c_char) {
    // SAFETY: forwarded caller contract.
    unsafe { forward(handle, body, ViewEvent::Loaded) };
}

/// Called by the glue for every `unityControl` script message.
///
/// # Safety
/// `text` must be null or a valid NUL-terminated UTF-8 string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn webbridge_on_message(handle: i64, text: *const c_char) {
    // SAFETY: forwarded caller contract.
    unsafe { forward(handle, text, ViewEvent::Message) };
}
