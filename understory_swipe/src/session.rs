// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State of the in-flight swipe.
//!
//! A [`Session`] exists from a successful resolution until the gesture ends.
//! It turns raw stage notifications into [`SwipeEvent`]s and enforces the
//! per-session rules:
//!
//! - The first stage notification becomes [`Phase::Began`], later ones
//!   [`Phase::Progress`].
//! - Amounts are clamped into `[0.0, 1.0]` and never decrease.
//! - Direction and natural polarity are fixed when the session starts.
//! - The outcome is latched at most once.
//! - Ending a session that never delivered `Began` delivers it first, so
//!   listeners always see a complete lifecycle.

use std::fmt::Debug;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::listener::SharedListener;
use crate::resolve::Resolution;
use crate::types::{Direction, Outcome, Phase, SwipeEvent, clamp_amount};

#[derive(Clone, Debug)]
pub(crate) struct Session<K> {
    id: u64,
    target: K,
    listeners: Arc<[SharedListener]>,
    direction: Direction,
    natural: bool,
    outcome: Outcome,
    began: bool,
    last_amount: f64,
}

impl<K: Copy + Debug> Session<K> {
    pub(crate) fn start(id: u64, resolution: Resolution<K>, direction: Direction, natural: bool) -> Self {
        Self {
            id,
            target: resolution.target,
            listeners: resolution.listeners,
            direction,
            natural,
            outcome: Outcome::Undetermined,
            began: false,
            last_amount: 0.0,
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn target(&self) -> K {
        self.target
    }

    /// The listener snapshot taken at resolution time.
    pub(crate) fn listeners(&self) -> Arc<[SharedListener]> {
        self.listeners.clone()
    }

    /// Build the event for a stage notification.
    pub(crate) fn stage(&mut self, amount: f64, touching: bool, natural: bool, when: u64) -> SwipeEvent {
        self.note_polarity(natural);
        let amount = self.advance(amount);
        let phase = if self.began {
            Phase::Progress
        } else {
            Phase::Began
        };
        self.began = true;
        self.event(touching, amount, phase, when)
    }

    /// Fix the outcome. Returns `false` if it was already fixed.
    pub(crate) fn latch(&mut self, success: bool) -> bool {
        if self.outcome.is_determined() {
            return false;
        }
        self.outcome = Outcome::from_success(success);
        true
    }

    /// Build the closing events: `Began` if it was never delivered, then `Ended`.
    ///
    /// A latched outcome takes precedence over `success`.
    pub(crate) fn finish(
        &mut self,
        amount: f64,
        success: bool,
        natural: bool,
        when: u64,
    ) -> SmallVec<[SwipeEvent; 2]> {
        self.note_polarity(natural);
        if !self.outcome.is_determined() {
            self.outcome = Outcome::from_success(success);
        }
        let amount = self.advance(amount);
        let mut out = SmallVec::new();
        if !self.began {
            self.began = true;
            tracing::debug!(target_node = ?self.target, "swipe ended before any stage update");
            out.push(self.event(false, amount, Phase::Began, when));
        }
        out.push(self.event(false, amount, Phase::Ended, when));
        out
    }

    fn advance(&mut self, amount: f64) -> f64 {
        self.last_amount = clamp_amount(amount).max(self.last_amount);
        self.last_amount
    }

    fn note_polarity(&self, natural: bool) {
        if natural != self.natural {
            tracing::trace!(
                session = self.id,
                natural,
                "polarity changed mid-swipe; keeping the value from the start"
            );
        }
    }

    fn event(&self, touching: bool, amount: f64, phase: Phase, when: u64) -> SwipeEvent {
        SwipeEvent::new(
            self.direction,
            self.natural,
            touching,
            amount,
            phase,
            self.outcome,
            when,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Recorder;

    fn session(natural: bool) -> Session<u32> {
        let resolution = Resolution {
            target: 9,
            listeners: Arc::from(vec![Recorder::shared("l")]),
        };
        Session::start(1, resolution, Direction::RightToLeft, natural)
    }

    #[test]
    fn first_stage_begins_then_progresses() {
        let mut s = session(true);
        assert_eq!(s.stage(0.2, true, true, 0).phase(), Phase::Began);
        assert_eq!(s.stage(0.4, true, true, 0).phase(), Phase::Progress);
        assert_eq!(s.stage(0.6, false, true, 0).phase(), Phase::Progress);
        assert_eq!(s.target(), 9);
        assert_eq!(s.listeners().len(), 1);
    }

    #[test]
    fn amounts_never_decrease() {
        let mut s = session(true);
        let amounts: Vec<f64> = [0.3, 0.1, f64::NAN, 0.5, 7.0, 0.9]
            .into_iter()
            .map(|a| s.stage(a, true, true, 0).amount())
            .collect();
        assert_eq!(amounts, vec![0.3, 0.3, 0.3, 0.5, 1.0, 1.0]);
        let end = s.finish(0.0, false, true, 0);
        assert_eq!(end[0].amount(), 1.0);
    }

    #[test]
    fn polarity_is_fixed_at_start() {
        let mut s = session(false);
        let e = s.stage(0.5, true, true, 0);
        assert!(!e.is_natural());
        assert_eq!(e.logical_direction(), Direction::RightToLeft);
        assert_eq!(e.physical_direction(), Direction::LeftToRight);
    }

    #[test]
    fn outcome_latches_once() {
        let mut s = session(true);
        assert_eq!(s.stage(0.5, true, true, 0).outcome(), Outcome::Undetermined);
        assert!(s.latch(false));
        assert!(!s.latch(true));
        assert_eq!(s.stage(0.6, false, true, 0).outcome(), Outcome::Canceled);
        // The latched outcome wins over the terminal result.
        let end = s.finish(0.6, true, true, 0);
        assert_eq!(end.len(), 1);
        assert_eq!(end[0].phase(), Phase::Ended);
        assert_eq!(end[0].outcome(), Outcome::Canceled);
        assert!(!end[0].is_touching());
    }

    #[test]
    fn finish_uses_result_without_latch() {
        let mut s = session(true);
        s.stage(0.5, true, true, 0);
        let end = s.finish(1.0, true, true, 0);
        assert_eq!(end[0].outcome(), Outcome::Success);
        assert_eq!(end[0].amount(), 1.0);
    }

    #[test]
    fn finish_without_stage_delivers_began_first() {
        let mut s = session(true);
        let end = s.finish(1.0, true, true, 0);
        let phases: Vec<Phase> = end.iter().map(SwipeEvent::phase).collect();
        assert_eq!(phases, vec![Phase::Began, Phase::Ended]);
    }
}
