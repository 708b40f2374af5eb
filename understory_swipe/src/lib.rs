// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_swipe --heading-base-level=0

//! Understory Swipe: fluid swipe dispatch for UI trees.
//!
//! ## Overview
//!
//! A *fluid swipe* is a one-dimensional, directional trackpad gesture whose
//! progress is reported continuously as an amount in `[0.0, 1.0]`, and whose
//! outcome (completed or canceled) becomes known when the fingers lift.
//! This crate takes raw notifications about such a gesture from a native
//! driver and delivers them as a well-formed `Began → Progress* → Ended`
//! sequence to listeners registered on nodes of a component tree.
//!
//! It does not recognize gestures and it does not render anything.
//!
//! ## Pieces
//!
//! - [`types`]: [`Direction`](types::Direction), [`Phase`](types::Phase),
//!   [`Outcome`](types::Outcome) and the immutable [`SwipeEvent`](types::SwipeEvent).
//! - [`listener`]: the [`SwipeListener`](listener::SwipeListener) and
//!   [`SwipeVetoer`](listener::SwipeVetoer) capabilities.
//! - [`registry`]: per-node listener lists.
//! - [`resolve`]: picks the node receiving a pending swipe and applies vetoes.
//!   The tree is consumed through [`SwipeTree`](resolve::SwipeTree).
//! - [`dispatcher`]: [`SwipeDispatcher`](dispatcher::SwipeDispatcher), the
//!   session state machine and the native entry points.
//! - [`executor`]: hand-off onto the UI thread, with the channel-backed
//!   [`UiLoop`](executor::UiLoop).
//! - [`source`]: the [`GestureSource`](source::GestureSource) command seam.
//! - [`bridge`]: decoding of native integer stage codes.
//! - [`config`]: the [`SwipeConfig`](config::SwipeConfig) and environment overrides.
//! - [`vetoers`]: ready-made vetoers such as
//!   [`ScrollEdgeVetoer`](vetoers::ScrollEdgeVetoer).
//!
//! ## Threading
//!
//! Native notifications arrive on foreign threads. All tree access and all
//! listener callbacks happen on the one UI thread behind the
//! [`UiExecutor`](executor::UiExecutor). Only
//! [`notify_may_begin_sync`](dispatcher::SwipeDispatcher::notify_may_begin_sync)
//! blocks its caller.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use kurbo::Point;
//! use understory_swipe::dispatcher::SwipeDispatcher;
//! use understory_swipe::error::ListenerFault;
//! use understory_swipe::executor::UiLoop;
//! use understory_swipe::listener::SwipeListener;
//! use understory_swipe::resolve::SwipeTree;
//! use understory_swipe::source::NopSource;
//! use understory_swipe::types::SwipeEvent;
//!
//! // A single-node tree.
//! #[derive(Debug)]
//! struct Window;
//! impl SwipeTree<u32> for Window {
//!     fn deepest_at(&self, root: u32, _pt: Point) -> Option<u32> {
//!         Some(root)
//!     }
//!     fn parent_of(&self, _node: &u32) -> Option<u32> {
//!         None
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Log;
//! impl SwipeListener for Log {
//!     fn progressed(&self, e: &SwipeEvent) -> Result<(), ListenerFault> {
//!         println!("{:.0}%", e.amount() * 100.0);
//!         Ok(())
//!     }
//! }
//!
//! let ui = UiLoop::new();
//! let swipe = SwipeDispatcher::new(Window, Arc::new(NopSource), ui.handle());
//! swipe.add_listener(0, Arc::new(Log));
//!
//! // Called on the UI thread: no hand-off needed.
//! assert!(swipe.notify_may_begin_sync(0, 1.0, Point::new(5.0, 5.0), true));
//! swipe.notify_stage(0.5, true, true).unwrap();
//! swipe.notify_completed(1.0, true).unwrap();
//! assert!(!swipe.is_session_active());
//! ```
//!
//! This crate uses `std`.

pub mod bridge;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod listener;
pub mod registry;
pub mod resolve;
mod session;
pub mod source;
pub mod types;
pub mod vetoers;

#[cfg(test)]
mod test_support;

pub use config::{DispatchMode, SwipeConfig};
pub use dispatcher::SwipeDispatcher;
pub use error::{Result, SwipeError};
pub use types::{Direction, Outcome, Phase, SwipeEvent};
