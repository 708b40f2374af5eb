// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher configuration.
//!
//! ```
//! use understory_swipe::config::{DispatchMode, SwipeConfig};
//!
//! let config = SwipeConfig::default()
//!     .with_dispatch_mode(DispatchMode::Sync)
//!     .with_continue_after_release(false);
//! assert_eq!(config.dispatch_mode, DispatchMode::Sync);
//! assert!(config.warn_on_reentrant_begin);
//! ```

/// Environment variable selecting [`DispatchMode::Sync`] when truthy.
pub const SYNC_MODE_VAR: &str = "UNDERSTORY_SWIPE_SYNC_MODE";

/// Environment variable for [`SwipeConfig::continue_after_release`].
pub const CONTINUE_AFTER_RELEASE_VAR: &str = "UNDERSTORY_SWIPE_CONTINUE_AFTER_RELEASE";

/// How a pending gesture is handed to the UI thread.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// The native thread posts the request and returns at once; the UI thread
    /// answers with an accept or veto command.
    #[default]
    Async,
    /// The native thread blocks until the UI thread decided, and acts on the
    /// returned decision itself.
    Sync,
}

/// Configuration of a [`SwipeDispatcher`](crate::dispatcher::SwipeDispatcher).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwipeConfig {
    /// Hand-off used for pending gestures. Passed to the gesture source when
    /// monitoring starts.
    pub dispatch_mode: DispatchMode,
    /// Initial value of the post-release continuation setting.
    pub continue_after_release: bool,
    /// Log a warning when a gesture is requested while another one is active.
    pub warn_on_reentrant_begin: bool,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::Async,
            continue_after_release: true,
            warn_on_reentrant_begin: true,
        }
    }
}

impl SwipeConfig {
    /// Set [`dispatch_mode`](Self::dispatch_mode).
    #[must_use]
    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    /// Set [`continue_after_release`](Self::continue_after_release).
    #[must_use]
    pub fn with_continue_after_release(mut self, continue_after_release: bool) -> Self {
        self.continue_after_release = continue_after_release;
        self
    }

    /// Set [`warn_on_reentrant_begin`](Self::warn_on_reentrant_begin).
    #[must_use]
    pub fn with_warn_on_reentrant_begin(mut self, warn: bool) -> Self {
        self.warn_on_reentrant_begin = warn;
        self
    }

    /// Defaults overridden by [`SYNC_MODE_VAR`] and
    /// [`CONTINUE_AFTER_RELEASE_VAR`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// Values are `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`, in any
    /// case. Anything else keeps the default and logs a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(sync) = flag(&lookup, SYNC_MODE_VAR) {
            config.dispatch_mode = if sync {
                DispatchMode::Sync
            } else {
                DispatchMode::Async
            };
        }
        if let Some(cont) = flag(&lookup, CONTINUE_AFTER_RELEASE_VAR) {
            config.continue_after_release = cont;
        }
        config
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let value = lookup(key)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(key, value = %value, "ignoring unrecognized boolean setting");
            None
        }
    }
}
