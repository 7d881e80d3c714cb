// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-side adapter injected after every page load.
//
// The page talks to the host through `window.Unity.call(msg)`. On WebKit the
// host registers a script message handler named `unityControl`; everywhere
// else the view intercepts navigations to the `unity:` scheme.

/// Script defining `window.Unity.call`.
pub const ADAPTER_SCRIPT: &str = r#"
if (window && window.webkit && window.webkit.messageHandlers && window.webkit.messageHandlers.unityControl) {
    window.Unity = {
        call: function(msg) {
            window.webkit.messageHandlers.unityControl.postMessage(msg);
        }
    }
}
else {
    window.Unity = {
        call: function(msg) {
            window.location = 'unity:' + msg;
        }
    }
}
"#;
