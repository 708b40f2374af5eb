// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made [`SwipeVetoer`]s.

use crate::listener::SwipeVetoer;
use crate::types::{Direction, SwipeEvent};

/// Horizontal scroll position of a scrollable view.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollRange {
    /// Smallest scroll value.
    pub min: f64,
    /// Largest scroll value reachable by the far edge of the viewport.
    pub max: f64,
    /// Current scroll value (near edge of the viewport).
    pub value: f64,
    /// Visible extent of the viewport.
    pub extent: f64,
}

impl ScrollRange {
    /// Whether the viewport touches the far (right) edge.
    pub fn at_end(&self) -> bool {
        self.value + self.extent >= self.max
    }

    /// Whether the viewport touches the near (left) edge.
    pub fn at_start(&self) -> bool {
        self.value <= self.min
    }
}

/// Vetoer for horizontally scrollable content.
///
/// Scrolling takes priority over swiping: a swipe is only permitted once the
/// content is already at the edge the swipe would reveal. Without horizontal
/// scrolling every swipe is permitted.
///
/// ```
/// use understory_swipe::listener::SwipeVetoer;
/// use understory_swipe::types::{Direction, SwipeEvent};
/// use understory_swipe::vetoers::{ScrollEdgeVetoer, ScrollRange};
///
/// let mut v = ScrollEdgeVetoer::default();
/// v.set_horizontal(Some(ScrollRange { min: 0.0, max: 500.0, value: 0.0, extent: 200.0 }));
/// let ltr = SwipeEvent::may_begin(Direction::LeftToRight, true, 0);
/// let rtl = SwipeEvent::may_begin(Direction::RightToLeft, true, 0);
/// assert!(v.permits(&ltr));
/// assert!(!v.permits(&rtl));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollEdgeVetoer {
    horizontal: Option<ScrollRange>,
}

impl ScrollEdgeVetoer {
    /// A vetoer for content with the given horizontal range.
    pub fn new(horizontal: Option<ScrollRange>) -> Self {
        Self { horizontal }
    }

    /// Update the horizontal range; `None` when horizontal scrolling is off.
    pub fn set_horizontal(&mut self, horizontal: Option<ScrollRange>) {
        self.horizontal = horizontal;
    }

    /// Current horizontal range.
    pub fn horizontal(&self) -> Option<ScrollRange> {
        self.horizontal
    }
}

impl SwipeVetoer for ScrollEdgeVetoer {
    fn permits(&self, event: &SwipeEvent) -> bool {
        let Some(range) = self.horizontal else {
            return true;
        };
        match event.logical_direction() {
            Direction::RightToLeft => range.at_end(),
            Direction::LeftToRight => range.at_start(),
        }
    }
}
