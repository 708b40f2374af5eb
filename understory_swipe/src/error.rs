// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use thiserror::Error;

use crate::types::Phase;

/// Error raised by application listener code.
pub type ListenerFault = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the dispatcher.
///
/// Resolution failures and protocol violations are not errors: they are
/// expected control flow and only produce a log entry.
#[derive(Error, Debug)]
pub enum SwipeError {
    /// A registered listener failed while handling an event. The rest of the
    /// fan-out round was skipped and the session was torn down.
    #[error("swipe listener failed during {phase:?}")]
    Listener {
        /// Phase of the event being delivered.
        phase: Phase,
        /// The listener's error.
        #[source]
        source: ListenerFault,
    },

    /// The UI-thread executor no longer accepts tasks.
    #[error("UI-thread executor is closed")]
    ExecutorClosed,

    /// A task handed to the UI thread failed there. The task's own error was
    /// raised on the UI thread; the waiting caller only receives this marker.
    #[error("task failed on the UI thread")]
    FailedOnUiThread,

    /// A native stage code could not be decoded.
    #[error("unknown native swipe phase code: {0:#x}")]
    UnknownPhaseCode(i32),
}

/// Result type for swipe dispatch operations.
pub type Result<T> = std::result::Result<T, SwipeError>;
