// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The native gesture source seam.
//!
//! A [`GestureSource`] wraps the platform driver that tracks the physical
//! gesture. The dispatcher issues commands through it; notifications travel
//! the other way through the dispatcher's `notify_*` entry points.
//!
//! [`NopSource`] is the fallback for environments without fluid swipe
//! support: every command returns immediately without side effects.

use std::fmt::Debug;

use crate::config::DispatchMode;

/// Commands the dispatcher issues to the native gesture driver.
///
/// Implementations are called from the UI thread and must not block on it.
pub trait GestureSource: Debug + Send + Sync {
    /// Start monitoring gesture input. Repeated calls have no effect.
    ///
    /// `mode` tells the driver which entry point to report a pending gesture
    /// through: [`notify_may_begin`] for [`DispatchMode::Async`],
    /// [`notify_may_begin_sync`] for [`DispatchMode::Sync`].
    ///
    /// [`notify_may_begin`]: crate::dispatcher::SwipeDispatcher::notify_may_begin
    /// [`notify_may_begin_sync`]: crate::dispatcher::SwipeDispatcher::notify_may_begin_sync
    fn start_monitoring(&self, mode: DispatchMode);

    /// Stop monitoring gesture input. Repeated calls have no effect.
    fn stop_monitoring(&self);

    /// Let the pending gesture logically start.
    ///
    /// Returns `false` if the driver failed to start tracking it.
    fn accept_pending(&self) -> bool;

    /// Discard the pending gesture; it is handled as ordinary input instead.
    fn veto_pending(&self);

    /// Choose whether a gesture keeps progressing after the fingers lift.
    ///
    /// Returns the effective value. A source that does not support the
    /// feature returns `continue_after_release` unchanged and does nothing.
    fn set_post_release_continuation(&self, continue_after_release: bool) -> bool {
        continue_after_release
    }
}

/// Gesture source for unsupported environments.
#[derive(Copy, Clone, Debug, Default)]
pub struct NopSource;

impl GestureSource for NopSource {
    fn start_monitoring(&self, _mode: DispatchMode) {}

    fn stop_monitoring(&self) {}

    fn accept_pending(&self) -> bool {
        // Nothing can be tracked, so nothing can start.
        false
    }

    fn veto_pending(&self) {}
}
