// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application-facing capabilities: listeners, vetoers and animation support.
//!
//! ## Listeners
//!
//! Implement [`SwipeListener`] and register it on a node with
//! [`SwipeDispatcher::add_listener`](crate::dispatcher::SwipeDispatcher::add_listener).
//! All three callbacks have no-op defaults, so a listener only overrides what
//! it needs:
//!
//! ```
//! use understory_swipe::listener::SwipeListener;
//! use understory_swipe::error::ListenerFault;
//! use understory_swipe::types::{Outcome, SwipeEvent};
//!
//! #[derive(Debug)]
//! struct GoBack;
//!
//! impl SwipeListener for GoBack {
//!     fn ended(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
//!         if event.outcome() == Outcome::Success {
//!             // navigate back
//!         }
//!         Ok(())
//!     }
//! }
//! ```
//!
//! Returning an error aborts the remaining fan-out for that event and tears
//! the session down; the error is surfaced to the embedding application.
//!
//! ## Vetoers
//!
//! A [`SwipeVetoer`] can refuse a pending swipe. Vetoers are consulted on the
//! path from the hit node to the root (see [`resolve`](crate::resolve)).
//! Nodes without a vetoer never block.

use std::fmt::Debug;
use std::sync::Arc;

use kurbo::Rect;

use crate::error::ListenerFault;
use crate::types::SwipeEvent;

/// Receives the lifecycle events of a fluid swipe.
///
/// For each started session a listener sees exactly one [`began`](Self::began),
/// zero or more [`progressed`](Self::progressed) and exactly one
/// [`ended`](Self::ended), in that order. Callbacks run on the UI thread.
pub trait SwipeListener: Debug + Send + Sync {
    /// The gesture logically started.
    fn began(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
        let _ = event;
        Ok(())
    }

    /// The gesture progressed.
    fn progressed(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
        let _ = event;
        Ok(())
    }

    /// The gesture logically ended.
    fn ended(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
        let _ = event;
        Ok(())
    }
}

/// Shared listener handle as stored in the registry.
///
/// Handles are compared by identity ([`Arc::ptr_eq`]) on removal.
pub type SharedListener = Arc<dyn SwipeListener>;

/// Decides whether a pending gesture may be interpreted as a fluid swipe.
pub trait SwipeVetoer {
    /// Return `false` to refuse the gesture. The event has phase
    /// [`MayBegin`](crate::types::Phase::MayBegin).
    fn permits(&self, event: &SwipeEvent) -> bool;
}

impl<F: Fn(&SwipeEvent) -> bool> SwipeVetoer for F {
    fn permits(&self, event: &SwipeEvent) -> bool {
        self(event)
    }
}

/// Paints animated feedback for a swipe on behalf of a navigable view.
///
/// This crate performs no rendering; the trait exists so application code can
/// ask a view whether its delegate is ready.
pub trait AnimDelegate: SwipeListener {
    /// Whether the delegate is active and ready to paint.
    fn is_active(&self) -> bool;
}

/// Navigation-style swipe feedback support for a node.
///
/// Views that animate page transitions expose their page geometry and an
/// optional [`AnimDelegate`] through this trait.
pub trait NavigationAnimSupport {
    /// Bounds of a page. All pages share the same bounds.
    fn page_bounds(&self) -> Rect;

    /// The delegate painting the swipe animation, if any.
    fn anim_delegate(&self) -> Option<&dyn AnimDelegate>;

    /// Whether a delegate exists and is ready to paint.
    fn anim_delegate_can_paint(&self) -> bool {
        self.anim_delegate().is_some_and(|d| d.is_active())
    }
}
