// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event model: direction, phase, outcome, and the immutable [`SwipeEvent`].
//!
//! ## Phases
//!
//! A fluid swipe goes through [`Phase::MayBegin`] → [`Phase::Began`] →
//! [`Phase::Progress`] (zero or more) → [`Phase::Ended`]. `MayBegin` is only
//! ever shown to [vetoers](crate::listener::SwipeVetoer) during resolution;
//! listeners observe the remaining three.
//!
//! A typical successful swipe, with the finger released at full amount:
//!
//! ```text
//! | phase     | outcome      | amount          |
//! |-----------|--------------|-----------------|
//! | MayBegin  | Undetermined | 0.0             |
//! | Began     | Undetermined | 0.0 < v < 1.0   |
//! | Progress  | Undetermined | 0.0 <= v <= 1.0 |
//! | Progress  | Success      | 0.0 < v < 1.0   |
//! | Ended     | Success      | 1.0             |
//! ```
//!
//! ## Directions
//!
//! The *logical* direction is where content is expected to move. The
//! *physical* direction is where the fingers moved. They agree when natural
//! polarity ("natural scrolling") is enabled, and are opposite otherwise.
//!
//! ```
//! use understory_swipe::types::{Direction, Outcome, Phase, SwipeEvent};
//!
//! let e = SwipeEvent::new(
//!     Direction::LeftToRight,
//!     false,
//!     true,
//!     0.25,
//!     Phase::Began,
//!     Outcome::Undetermined,
//!     0,
//! );
//! assert_eq!(e.physical_direction(), Direction::RightToLeft);
//! assert_eq!(Direction::LeftToRight.opposite().opposite(), Direction::LeftToRight);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

/// Logical direction of a swipe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Content moves from left to right.
    LeftToRight,
    /// Content moves from right to left.
    RightToLeft,
}

impl Direction {
    /// Returns the other direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::LeftToRight => Self::RightToLeft,
            Self::RightToLeft => Self::LeftToRight,
        }
    }

    /// Map a native signed direction signal (for example a horizontal scrolling
    /// delta) to a direction. Non-negative values are left to right.
    pub fn from_signal(signal: f64) -> Self {
        // NaN compares false and lands on RightToLeft; sources never send it.
        if signal >= 0.0 {
            Self::LeftToRight
        } else {
            Self::RightToLeft
        }
    }
}

/// Lifecycle phase of a swipe event, in temporal order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// The physical gesture is still ambiguous; used for veto resolution only.
    MayBegin,
    /// The gesture logically starts. Delivered exactly once per session.
    Began,
    /// The gesture progresses. Delivered zero or more times.
    Progress,
    /// The gesture logically ends. Delivered exactly once per session.
    Ended,
}

/// Completion state of a swipe.
///
/// It stays [`Outcome::Undetermined`] until the input device stops being
/// touched, and is fixed from then on for the rest of the session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// It is not yet known whether the gesture completes or cancels.
    #[default]
    Undetermined,
    /// The gesture completed.
    Success,
    /// The gesture was canceled, typically by swiping back before release.
    Canceled,
}

impl Outcome {
    /// Map a determined native result to an outcome.
    pub fn from_success(success: bool) -> Self {
        if success { Self::Success } else { Self::Canceled }
    }

    /// Whether this outcome is fixed.
    pub fn is_determined(self) -> bool {
        self != Self::Undetermined
    }
}

/// A single fluid swipe notification.
///
/// Events are immutable values; one is created for each delivered
/// notification. The physical direction is derived at construction time
/// from the logical direction and the natural polarity flag.
#[derive(Clone, Debug, PartialEq)]
pub struct SwipeEvent {
    logical_direction: Direction,
    physical_direction: Direction,
    touching: bool,
    amount: f64,
    natural: bool,
    phase: Phase,
    outcome: Outcome,
    when: u64,
}

impl SwipeEvent {
    /// Create an event.
    ///
    /// `amount` is clamped into `[0.0, 1.0]`; `when` is a timestamp in
    /// milliseconds since the Unix epoch.
    pub fn new(
        logical_direction: Direction,
        natural: bool,
        touching: bool,
        amount: f64,
        phase: Phase,
        outcome: Outcome,
        when: u64,
    ) -> Self {
        let physical_direction = if natural {
            logical_direction
        } else {
            logical_direction.opposite()
        };
        Self {
            logical_direction,
            physical_direction,
            touching,
            amount: clamp_amount(amount),
            natural,
            phase,
            outcome,
            when,
        }
    }

    /// The tentative event shown to vetoers before a session exists.
    ///
    /// Amount is `0.0`, the device is being touched and the outcome is
    /// undetermined.
    pub fn may_begin(direction: Direction, natural: bool, when: u64) -> Self {
        Self::new(
            direction,
            natural,
            true,
            0.0,
            Phase::MayBegin,
            Outcome::Undetermined,
            when,
        )
    }

    /// Direction the content is expected to move in.
    pub fn logical_direction(&self) -> Direction {
        self.logical_direction
    }

    /// Direction the fingers moved in.
    pub fn physical_direction(&self) -> Direction {
        self.physical_direction
    }

    /// Whether the input device surface is being touched.
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Fraction of the gesture performed, in `[0.0, 1.0]`.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether natural polarity was enabled when the gesture started.
    pub fn is_natural(&self) -> bool {
        self.natural
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completion state.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn when(&self) -> u64 {
        self.when
    }
}

/// Clamp an amount into `[0.0, 1.0]`, mapping NaN to `0.0`.
pub(crate) fn clamp_amount(amount: f64) -> f64 {
    if amount.is_nan() {
        0.0
    } else {
        amount.clamp(0.0, 1.0)
    }
}

/// Milliseconds since the Unix epoch, saturating to zero on clock skew.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
