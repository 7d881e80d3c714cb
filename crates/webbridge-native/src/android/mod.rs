// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android web view via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The view itself is a small Java class shipped
// with the host app, `org.hyperpolymath.webbridge.WebBridgeView`, wrapping
// `android.webkit.WebView`. Its contract:
//
// ```java
// WebBridgeView(Activity activity, long handle, boolean transparent,
//               boolean zoom, String userAgent /* nullable */, boolean separated)
// void loadURL(String url)
// void evaluateJS(String js)
// void setMargins(int left, int top, int right, int bottom)
// void setVisibility(boolean visible)
// void destroy()
// static native void nativeOnLoaded(long handle, String body)
// static native void nativeOnMessage(long handle, String text)
// ```
//
// The Java side marshals every call onto the UI thread, reports
// `onPageFinished` through `nativeOnLoaded`, and turns intercepted
// `unity:<msg>` navigations into `nativeOnMessage(handle, msg)`.

#![cfg(target_os = "android")]

use std::sync::OnceLock;

use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::jlong;
use jni::{JNIEnv, JavaVM};

use webbridge_core::error::{BridgeError, Result};
use webbridge_core::types::{Margins, ViewOptions};

use crate::callbacks::{self, Handle};
use crate::traits::{NativeView, ViewEvent, ViewEventSink};

/// Binary name of the host-side view class.
const VIEW_CLASS: &str = "org.hyperpolymath.webbridge.WebBridgeView";

const CTOR_SIG: &str = "(Landroid/app/Activity;JZZLjava/lang/String;Z)V";

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

static JAVA_VM: OnceLock<JavaVM> = OnceLock::new();

fn java_vm() -> Result<&'static JavaVM> {
    if let Some(vm) = JAVA_VM.get() {
        return Ok(vm);
    }
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is guaranteed valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| BridgeError::Native(format!("failed to obtain JavaVM: {e}")))?;
    Ok(JAVA_VM.get_or_init(|| vm))
}

/// Obtain a [`JNIEnv`] for the current thread, attaching it if needed.
fn jni_env() -> Result<JNIEnv<'static>> {
    java_vm()?
        .attach_current_thread_permanently()
        .map_err(|e| BridgeError::Native(format!("failed to attach JNI thread: {e}")))
}

/// The `Activity` hosting the native code.
fn activity() -> Result<JObject<'static>> {
    let ptr = ndk_context::android_context().context();
    if ptr.is_null() {
        return Err(BridgeError::Native(
            "Android context is null; native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    Ok(unsafe { JObject::from_raw(ptr.cast()) })
}

fn jni_err(context: &str, e: jni::errors::Error) -> BridgeError {
    BridgeError::Native(format!("{context}: {e}"))
}

/// Load the view class through the activity's class loader. `FindClass`
/// from a native thread only sees system classes.
fn load_view_class<'local>(
    env: &mut JNIEnv<'local>,
    activity: &JObject<'_>,
) -> Result<JClass<'local>> {
    let loader = env
        .call_method(activity, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .map_err(|e| jni_err("getClassLoader", e))?
        .l()
        .map_err(|e| jni_err("getClassLoader->l", e))?;
    let name: JString = env
        .new_string(VIEW_CLASS)
        .map_err(|e| jni_err("new_string(class)", e))?;
    let class = env
        .call_method(
            &loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&name)],
        )
        .map_err(|e| jni_err("loadClass", e))?
        .l()
        .map_err(|e| jni_err("loadClass->l", e))?;
    Ok(JClass::from(class))
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Android web view backed by `WebBridgeView`.
pub struct AndroidView {
    view: Option<GlobalRef>,
    handle: Option<Handle>,
    visible: bool,
}

impl AndroidView {
    /// Does **not** touch JNI; the Java object is created in `init`.
    pub fn new() -> Self {
        Self {
            view: None,
            handle: None,
            visible: false,
        }
    }

    fn view(&self) -> Result<&GlobalRef> {
        self.view
            .as_ref()
            .ok_or_else(|| BridgeError::Native("Android view used before init".into()))
    }

    fn call_with_string(&self, method: &str, arg: &str) -> Result<()> {
        let view = self.view()?;
        let mut env = jni_env()?;
        let j_arg: JString = env
            .new_string(arg)
            .map_err(|e| jni_err("new_string", e))?;
        env.call_method(
            view.as_obj(),
            method,
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_arg)],
        )
        .map_err(|e| jni_err(method, e))?;
        Ok(())
    }
}

impl Default for AndroidView {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeView for AndroidView {
    fn platform_name(&self) -> &str {
        "Android"
    }

    fn init(&mut self, options: &ViewOptions, events: ViewEventSink) -> Result<()> {
        let mut env = jni_env()?;
        let activity = activity()?;
        let class = load_view_class(&mut env, &activity)?;

        let user_agent: JObject = match &options.user_agent {
            Some(ua) => env
                .new_string(ua)
                .map_err(|e| jni_err("new_string(user_agent)", e))?
                .into(),
            None => JObject::null(),
        };

        let registration = callbacks::register(events);
        let obj = env
            .new_object(
                &class,
                CTOR_SIG,
                &[
                    JValue::Object(&activity),
                    JValue::Long(registration.handle() as jlong),
                    JValue::Bool(options.transparent.into()),
                    JValue::Bool(options.zoom.into()),
                    JValue::Object(&user_agent),
                    JValue::Bool(options.separated.into()),
                ],
            )
            .map_err(|e| jni_err("new WebBridgeView", e))?;
        let global = env
            .new_global_ref(obj)
            .map_err(|e| jni_err("new_global_ref", e))?;

        let handle = registration.keep();
        tracing::info!(handle, "Android: web view created");
        self.view = Some(global);
        self.handle = Some(handle);
        Ok(())
    }

    fn load_url(&mut self, url: &str) -> Result<()> {
        tracing::debug!(url, "Android: loadURL");
        self.call_with_string("loadURL", url)
    }

    fn evaluate_script(&mut self, js: &str) -> Result<()> {
        self.call_with_string("evaluateJS", js)
    }

    fn set_margins(&mut self, margins: Margins) -> Result<()> {
        let view = self.view()?;
        let mut env = jni_env()?;
        env.call_method(
            view.as_obj(),
            "setMargins",
            "(IIII)V",
            &[
                JValue::Int(margins.left),
                JValue::Int(margins.top),
                JValue::Int(margins.right),
                JValue::Int(margins.bottom),
            ],
        )
        .map_err(|e| jni_err("setMargins", e))?;
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        let view = self.view()?;
        let mut env = jni_env()?;
        env.call_method(
            view.as_obj(),
            "setVisibility",
            "(Z)V",
            &[JValue::Bool(visible.into())],
        )
        .map_err(|e| jni_err("setVisibility", e))?;
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
        match jni_env() {
            Ok(mut env) => {
                if let Err(e) = env.call_method(view.as_obj(), "destroy", "()V", &[]) {
                    tracing::warn!(error = %e, "Android: WebBridgeView.destroy failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Android: cannot destroy view"),
        }
        self.visible = false;
    }
}

impl Drop for AndroidView {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ---------------------------------------------------------------------------
// Callbacks from Java
// ---------------------------------------------------------------------------

fn forward(env: &mut JNIEnv<'_>, handle: jlong, text: &JString<'_>, wrap: fn(String) -> ViewEvent) {
    match env.get_string(text) {
        Ok(s) => {
            callbacks::dispatch(handle, wrap(s.into()));
        }
        Err(e) => tracing::warn!(handle, error = %e, "Android: unreadable callback string"),
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_webbridge_WebBridgeView_nativeOnLoaded<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    body: JString<'local>,
) {
    forward(&mut env, handle, &body, ViewEvent::Loaded);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_hyperpolymath_webbridge_WebBridgeView_nativeOnMessage<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    text: JString<'local>,
) {
    forward(&mut env, handle, &text, ViewEvent::Message);
}
