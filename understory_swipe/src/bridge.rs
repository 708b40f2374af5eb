// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native wire codes for stage notifications.
//!
//! Native drivers report stage changes as an integer made of [`StageCode`]
//! flags plus the current gesture amount. [`decode`] turns such a pair into
//! typed [`Notification`]s, in the order the dispatcher must handle them:
//!
//! | code                                    | notifications                     |
//! |-----------------------------------------|-----------------------------------|
//! | `LOGICALLY_BEGAN` / `PROGRESSED`        | stage, touching                   |
//! | `PROGRESSED_NO_MORE_TOUCHING`           | stage, not touching               |
//! | `UPDATE_STATE \| COMPLETED`             | outcome latch, success            |
//! | `UPDATE_STATE \| CANCELED`              | outcome latch, canceled           |
//! | `COMPLETED` / `CANCELED`                | end of gesture                    |
//! | [`UNHANDLED`]                           | nothing                           |
//!
//! Stage flags may be combined with the others; the stage update is then
//! emitted first.
//!
//! ```
//! use understory_swipe::bridge::{Notification, StageCode, decode};
//!
//! let code = (StageCode::UPDATE_STATE | StageCode::COMPLETED).bits();
//! let out = decode(code, 0.6).unwrap();
//! assert_eq!(out.as_slice(), &[Notification::Latch { success: true }]);
//! ```

use smallvec::SmallVec;

use crate::error::{Result, SwipeError};

bitflags::bitflags! {
    /// Flags making up a native stage code.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct StageCode: i32 {
        /// The gesture logically started; the device is touched.
        const LOGICALLY_BEGAN = 1;
        /// The gesture progressed while the device is touched.
        const PROGRESSED = 1 << 1;
        /// The gesture progressed after the fingers lifted.
        const PROGRESSED_NO_MORE_TOUCHING = 1 << 2;
        /// The gesture completed.
        const COMPLETED = 1 << 3;
        /// The gesture was canceled.
        const CANCELED = 1 << 4;
        /// Latch the outcome given by `COMPLETED` / `CANCELED` instead of ending.
        const UPDATE_STATE = 1 << 5;
        /// Either terminal flag.
        const ENDED_MASK = Self::COMPLETED.bits() | Self::CANCELED.bits();
    }
}

/// Code sent by drivers for events they did not handle.
pub const UNHANDLED: i32 = -1;

/// A decoded native notification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Notification {
    /// Gesture amount changed.
    Stage {
        /// Current amount.
        amount: f64,
        /// Whether the device is still touched.
        touching: bool,
    },
    /// The fingers lifted and the outcome is now known.
    Latch {
        /// Whether the gesture completes.
        success: bool,
    },
    /// The gesture logically ended.
    Ended {
        /// Final amount.
        amount: f64,
        /// Whether the gesture completed.
        success: bool,
    },
}

/// Decode a native stage code into notifications.
///
/// Fails with [`SwipeError::UnknownPhaseCode`] for unknown bits, for codes
/// carrying no recognized notification, and for codes that are both
/// completed and canceled.
pub fn decode(code: i32, amount: f64) -> Result<SmallVec<[Notification; 2]>> {
    let mut out = SmallVec::new();
    if code == UNHANDLED {
        return Ok(out);
    }
    let flags = StageCode::from_bits(code).ok_or(SwipeError::UnknownPhaseCode(code))?;
    let terminal = flags & StageCode::ENDED_MASK;
    if terminal == StageCode::ENDED_MASK {
        return Err(SwipeError::UnknownPhaseCode(code));
    }
    let success = terminal == StageCode::COMPLETED;

    if flags.intersects(StageCode::LOGICALLY_BEGAN | StageCode::PROGRESSED) {
        out.push(Notification::Stage {
            amount,
            touching: true,
        });
    } else if flags.contains(StageCode::PROGRESSED_NO_MORE_TOUCHING) {
        out.push(Notification::Stage {
            amount,
            touching: false,
        });
    }

    if flags.contains(StageCode::UPDATE_STATE) {
        if terminal.is_empty() {
            return Err(SwipeError::UnknownPhaseCode(code));
        }
        out.push(Notification::Latch { success });
    } else if !terminal.is_empty() {
        out.push(Notification::Ended { amount, success });
    }

    if out.is_empty() {
        return Err(SwipeError::UnknownPhaseCode(code));
    }
    Ok(out)
}
