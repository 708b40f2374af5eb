// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The swipe dispatcher.
//!
//! ## Overview
//!
//! [`SwipeDispatcher`] connects a native [`GestureSource`] to listeners
//! registered on nodes of a [`SwipeTree`]. It owns the listener registry and
//! the single session slot, and moves every notification onto the UI thread
//! through a [`UiExecutor`].
//!
//! ## Lifecycle
//!
//! ```text
//!            may begin, resolved          stage / latch
//!  Idle ──▶ Resolving ──────────▶ Active ◀──────────────┐
//!   ▲           │                   │  └────────────────┘
//!   │  refused  │                   │ ended, listener fault,
//!   └───────────┘◀──────────────────┘ source refusal, reset
//! ```
//!
//! - A pending gesture is resolved once, on the UI thread. A pending gesture
//!   arriving while the slot is not idle is refused without touching the tree.
//! - The first stage notification is delivered as `Began`, later ones as
//!   `Progress`. Stage notifications without an active session are ignored.
//! - The outcome latches once; the terminal notification delivers `Ended` and
//!   clears the slot before fan-out.
//!
//! ## Entry points
//!
//! Native drivers call the `notify_*` methods from any thread. Each one runs
//! its UI-thread counterpart (`on_*`) inline when already on the UI thread,
//! and posts it otherwise. [`notify_may_begin_sync`] is the only blocking
//! entry point: it waits for the UI thread's decision and returns it.
//!
//! ## Faults
//!
//! A failing listener aborts the rest of its fan-out round and tears the
//! session down. The fault is returned from the `on_*` method, which for a
//! posted notification means it comes out of [`UiLoop::pump`] on the UI thread.
//! A panicking tree or vetoer leaves the slot idle and, through
//! [`on_may_begin`](SwipeDispatcher::on_may_begin), vetoes the pending gesture
//! before the panic continues.
//!
//! ## Locking
//!
//! State sits behind one mutex that is never held while listener or vetoer
//! code runs, so callbacks may call back into the dispatcher.
//!
//! [`notify_may_begin_sync`]: SwipeDispatcher::notify_may_begin_sync
//! [`UiLoop::pump`]: crate::executor::UiLoop::pump

use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use kurbo::Point;
use parking_lot::Mutex;

use crate::bridge::{self, Notification};
use crate::config::SwipeConfig;
use crate::error::{Result, SwipeError};
use crate::executor::{UiExecutor, perform_on_ui, perform_on_ui_and_wait};
use crate::listener::SharedListener;
use crate::registry::ListenerRegistry;
use crate::resolve::{Rejection, SwipeTree, resolve};
use crate::session::Session;
use crate::source::GestureSource;
use crate::types::{Direction, Phase, SwipeEvent, now_millis};

/// Dispatches fluid swipes from a native gesture source to node listeners.
///
/// The dispatcher is a cheap, cloneable handle; clones share state.
///
/// ## Usage
///
/// - Construct with [`SwipeDispatcher::new`] or
///   [`SwipeDispatcher::with_config`], passing the tree, the native source and
///   the UI-thread executor.
/// - Register listeners with [`add_listener`](Self::add_listener).
/// - Call [`start_event_monitoring`](Self::start_event_monitoring).
/// - Wire the native driver to the `notify_*` methods.
pub struct SwipeDispatcher<K, T> {
    inner: Arc<Inner<K, T>>,
}

struct Inner<K, T> {
    tree: T,
    source: Arc<dyn GestureSource>,
    executor: Arc<dyn UiExecutor>,
    config: SwipeConfig,
    state: Mutex<DispatchState<K>>,
}

#[derive(Debug)]
struct DispatchState<K> {
    registry: ListenerRegistry<K>,
    slot: Slot<K>,
    next_session: u64,
    continue_after_release: bool,
    monitoring: bool,
}

#[derive(Debug)]
enum Slot<K> {
    Idle,
    Resolving,
    Active(Session<K>),
}

impl<K, T> Clone for SwipeDispatcher<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Debug, T> Debug for SwipeDispatcher<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeDispatcher")
            .field("config", &self.inner.config)
            .field("source", &self.inner.source)
            .finish_non_exhaustive()
    }
}

impl<K, T> SwipeDispatcher<K, T>
where
    K: Copy + Eq + Hash + Debug + Send + 'static,
    T: SwipeTree<K> + Send + Sync + 'static,
{
    /// Create a dispatcher with the default [`SwipeConfig`].
    pub fn new(
        tree: T,
        source: Arc<dyn GestureSource>,
        executor: impl UiExecutor + 'static,
    ) -> Self {
        Self::with_config(tree, source, executor, SwipeConfig::default())
    }

    /// Create a dispatcher with an explicit configuration.
    pub fn with_config(
        tree: T,
        source: Arc<dyn GestureSource>,
        executor: impl UiExecutor + 'static,
        config: SwipeConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                tree,
                source,
                executor: Arc::new(executor),
                config,
                state: Mutex::new(DispatchState {
                    registry: ListenerRegistry::new(),
                    slot: Slot::Idle,
                    next_session: 1,
                    continue_after_release: config.continue_after_release,
                    monitoring: false,
                }),
            }),
        }
    }

    /// The configuration this dispatcher was built with.
    pub fn config(&self) -> &SwipeConfig {
        &self.inner.config
    }

    /// The component tree.
    pub fn tree(&self) -> &T {
        &self.inner.tree
    }

    // --- control surface -------------------------------------------------

    /// Start monitoring native gestures. Repeated calls have no effect.
    ///
    /// The source is told the configured dispatch mode and the current
    /// post-release continuation setting.
    pub fn start_event_monitoring(&self) {
        let cont = {
            let mut state = self.inner.state.lock();
            if state.monitoring {
                return;
            }
            state.monitoring = true;
            state.continue_after_release
        };
        let mode = self.inner.config.dispatch_mode;
        tracing::debug!(?mode, "starting swipe monitoring");
        self.inner.source.start_monitoring(mode);
        let effective = self.inner.source.set_post_release_continuation(cont);
        self.inner.state.lock().continue_after_release = effective;
    }

    /// Stop monitoring native gestures. Repeated calls have no effect.
    ///
    /// An in-flight session is left alone; see
    /// [`reset_session`](Self::reset_session).
    pub fn stop_event_monitoring(&self) {
        {
            let mut state = self.inner.state.lock();
            if !state.monitoring {
                return;
            }
            state.monitoring = false;
        }
        tracing::debug!("stopping swipe monitoring");
        self.inner.source.stop_monitoring();
    }

    /// Register `listener` on `node`. Duplicates are permitted.
    ///
    /// A session already in flight keeps the listeners it was resolved with.
    pub fn add_listener(&self, node: K, listener: SharedListener) {
        tracing::trace!(?node, "adding swipe listener");
        self.inner
            .state
            .lock()
            .registry
            .install_if_absent(node)
            .add(listener);
    }

    /// Remove the first registration of `listener` on `node`.
    ///
    /// Returns `false` if it was not registered there.
    pub fn remove_listener(&self, node: K, listener: &SharedListener) -> bool {
        self.inner
            .state
            .lock()
            .registry
            .lookup_mut(&node)
            .is_some_and(|list| list.remove(listener))
    }

    /// Remove every listener registered on `node`.
    pub fn remove_all_listeners(&self, node: K) {
        if let Some(list) = self.inner.state.lock().registry.lookup_mut(&node) {
            list.clear();
        }
    }

    /// Drop everything registered on `node`, for when the node is destroyed.
    ///
    /// Returns `true` if the node had a listener list.
    pub fn forget_node(&self, node: K) -> bool {
        self.inner
            .state
            .lock()
            .registry
            .forget_node(&node)
            .is_some()
    }

    /// Number of listeners registered on `node`.
    pub fn listener_count(&self, node: K) -> usize {
        self.inner
            .state
            .lock()
            .registry
            .lookup(&node)
            .map_or(0, |list| list.len())
    }

    /// Choose whether gestures keep progressing after the fingers lift.
    ///
    /// Returns the value the source actually applied.
    pub fn set_continue_gesture_after_release(&self, continue_after_release: bool) -> bool {
        let effective = self
            .inner
            .source
            .set_post_release_continuation(continue_after_release);
        self.inner.state.lock().continue_after_release = effective;
        effective
    }

    /// Whether gestures keep progressing after the fingers lift.
    pub fn continues_gesture_after_release(&self) -> bool {
        self.inner.state.lock().continue_after_release
    }

    /// Whether a swipe session is in flight.
    pub fn is_session_active(&self) -> bool {
        matches!(self.inner.state.lock().slot, Slot::Active(_))
    }

    /// Target node of the session in flight.
    pub fn active_target(&self) -> Option<K> {
        match &self.inner.state.lock().slot {
            Slot::Active(session) => Some(session.target()),
            Slot::Idle | Slot::Resolving => None,
        }
    }

    /// Drop the session in flight without delivering anything.
    ///
    /// For recovering when the source will never end the gesture, for example
    /// after monitoring stopped mid-swipe. Returns `true` if the slot was not
    /// idle.
    pub fn reset_session(&self) -> bool {
        let mut state = self.inner.state.lock();
        if matches!(state.slot, Slot::Idle) {
            return false;
        }
        tracing::debug!("resetting swipe session");
        state.slot = Slot::Idle;
        true
    }

    // --- native entry points ---------------------------------------------

    /// A gesture may begin in `window` at `point`, answered through
    /// [`GestureSource::accept_pending`] or [`GestureSource::veto_pending`].
    ///
    /// `signal` is the native direction signal (see [`Direction::from_signal`]).
    pub fn notify_may_begin(&self, window: K, signal: f64, point: Point, natural: bool) -> Result<()> {
        self.post("may_begin", move |this| {
            this.on_may_begin(window, signal, point, natural);
            Ok(())
        })
    }

    /// A gesture may begin; block until the UI thread decided.
    ///
    /// Returns whether the gesture was accepted. No accept or veto command is
    /// issued. If the UI thread cannot be reached the gesture is refused.
    pub fn notify_may_begin_sync(&self, window: K, signal: f64, point: Point, natural: bool) -> bool {
        let this = self.clone();
        let decided = perform_on_ui_and_wait(&*self.inner.executor, move || {
            Ok(this.begin(window, signal, point, natural).is_some())
        });
        match decided {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "could not hand pending swipe to the UI thread");
                false
            }
        }
    }

    /// The gesture amount changed.
    pub fn notify_stage(&self, amount: f64, touching: bool, natural: bool) -> Result<()> {
        self.post("stage", move |this| {
            this.on_stage_update(amount, touching, natural)
        })
    }

    /// The fingers lifted and the outcome is known.
    pub fn notify_outcome(&self, success: bool) -> Result<()> {
        self.post("outcome", move |this| {
            this.on_outcome_latch(success);
            Ok(())
        })
    }

    /// The gesture completed.
    pub fn notify_completed(&self, amount: f64, natural: bool) -> Result<()> {
        self.post("completed", move |this| this.on_ended(amount, true, natural))
    }

    /// The gesture was canceled.
    pub fn notify_canceled(&self, amount: f64, natural: bool) -> Result<()> {
        self.post("canceled", move |this| this.on_ended(amount, false, natural))
    }

    /// A stage change encoded as a native [`StageCode`](crate::bridge::StageCode).
    pub fn notify_raw(&self, amount: f64, code: i32, natural: bool) -> Result<()> {
        self.post("raw", move |this| this.handle_raw(amount, code, natural))
    }

    fn post(
        &self,
        kind: &'static str,
        task: impl FnOnce(&Self) -> Result<()> + Send + 'static,
    ) -> Result<()> {
        let this = self.clone();
        let res = perform_on_ui(&*self.inner.executor, Box::new(move || task(&this)));
        if let Err(SwipeError::ExecutorClosed) = &res {
            tracing::error!(kind, "UI-thread executor closed; swipe notification dropped");
        }
        res
    }

    // --- UI-thread handlers ----------------------------------------------

    /// Handle a pending gesture on the UI thread and answer the source.
    ///
    /// Returns whether a session is now active.
    ///
    /// If resolution panics, the source is told to veto before the panic
    /// continues, and the slot is idle again.
    pub fn on_may_begin(&self, window: K, signal: f64, point: Point, natural: bool) -> bool {
        let begun = panic::catch_unwind(AssertUnwindSafe(|| {
            self.begin(window, signal, point, natural)
        }));
        let begun = match begun {
            Ok(begun) => begun,
            Err(payload) => {
                self.inner.source.veto_pending();
                panic::resume_unwind(payload);
            }
        };
        let Some(id) = begun else {
            self.inner.source.veto_pending();
            return false;
        };
        if self.inner.source.accept_pending() {
            return true;
        }
        tracing::debug!(session = id, "gesture source failed to start the swipe");
        self.teardown(id);
        false
    }

    /// Handle a stage notification on the UI thread.
    pub fn on_stage_update(&self, amount: f64, touching: bool, natural: bool) -> Result<()> {
        let (id, listeners, event) = {
            let mut state = self.inner.state.lock();
            let Slot::Active(session) = &mut state.slot else {
                tracing::trace!(amount, "stage update without an active swipe");
                return Ok(());
            };
            let event = session.stage(amount, touching, natural, now_millis());
            (session.id(), session.listeners(), event)
        };
        self.fan_out(id, &listeners, &event)
    }

    /// Fix the outcome of the session in flight.
    pub fn on_outcome_latch(&self, success: bool) {
        let mut state = self.inner.state.lock();
        match &mut state.slot {
            Slot::Active(session) => {
                if !session.latch(success) {
                    tracing::debug!(session = session.id(), success, "swipe outcome already latched");
                }
            }
            Slot::Idle | Slot::Resolving => {
                tracing::trace!(success, "outcome latch without an active swipe");
            }
        }
    }

    /// Handle the terminal notification on the UI thread.
    ///
    /// The session is cleared before any listener runs.
    pub fn on_ended(&self, amount: f64, success: bool, natural: bool) -> Result<()> {
        let (id, listeners, events) = {
            let mut state = self.inner.state.lock();
            let Slot::Active(session) = &mut state.slot else {
                tracing::trace!(success, "end notification without an active swipe");
                return Ok(());
            };
            let events = session.finish(amount, success, natural, now_millis());
            let id = session.id();
            let listeners = session.listeners();
            state.slot = Slot::Idle;
            (id, listeners, events)
        };
        tracing::debug!(session = id, outcome = ?events.last().map(SwipeEvent::outcome), "swipe ended");
        for event in &events {
            self.fan_out(id, &listeners, event)?;
        }
        Ok(())
    }

    /// Decode and handle a native stage code on the UI thread.
    pub fn handle_raw(&self, amount: f64, code: i32, natural: bool) -> Result<()> {
        for notification in bridge::decode(code, amount)? {
            match notification {
                Notification::Stage { amount, touching } => {
                    self.on_stage_update(amount, touching, natural)?;
                }
                Notification::Latch { success } => self.on_outcome_latch(success),
                Notification::Ended { amount, success } => {
                    self.on_ended(amount, success, natural)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve a pending gesture and install its session. Returns the session id.
    fn begin(&self, window: K, signal: f64, point: Point, natural: bool) -> Option<u64> {
        {
            let mut state = self.inner.state.lock();
            if !matches!(state.slot, Slot::Idle) {
                if self.inner.config.warn_on_reentrant_begin {
                    tracing::warn!(
                        ?window,
                        "swipe requested while another swipe has not ended; refusing"
                    );
                } else {
                    tracing::debug!(?window, "refusing re-entrant swipe request");
                }
                return None;
            }
            state.slot = Slot::Resolving;
        }

        let direction = Direction::from_signal(signal);
        let event = SwipeEvent::may_begin(direction, natural, now_millis());
        let tree = &self.inner.tree;
        let resolved = panic::catch_unwind(AssertUnwindSafe(|| {
            match tree.deepest_at(window, point) {
                Some(leaf) => resolve(tree, leaf, &event, |node| {
                    self.inner.state.lock().registry.interested(node)
                }),
                None => Err(Rejection::NoTarget),
            }
        }));
        let resolved = match resolved {
            Ok(resolved) => resolved,
            Err(payload) => {
                let mut state = self.inner.state.lock();
                if matches!(state.slot, Slot::Resolving) {
                    state.slot = Slot::Idle;
                }
                drop(state);
                tracing::error!(?window, "swipe resolution panicked");
                panic::resume_unwind(payload);
            }
        };

        let mut state = self.inner.state.lock();
        if !matches!(state.slot, Slot::Resolving) {
            // Reset from inside a vetoer.
            tracing::debug!(?window, "swipe slot changed during resolution");
            return None;
        }
        match resolved {
            Ok(resolution) => {
                let id = state.next_session;
                state.next_session += 1;
                tracing::debug!(
                    session = id,
                    target = ?resolution.target,
                    ?direction,
                    listeners = resolution.listeners.len(),
                    "swipe may begin"
                );
                state.slot = Slot::Active(Session::start(id, resolution, direction, natural));
                Some(id)
            }
            Err(reason) => {
                tracing::debug!(?window, ?point, ?reason, "swipe refused");
                state.slot = Slot::Idle;
                None
            }
        }
    }

    fn fan_out(&self, id: u64, listeners: &[SharedListener], event: &SwipeEvent) -> Result<()> {
        for listener in listeners {
            let res = match event.phase() {
                Phase::Began => listener.began(event),
                Phase::Progress => listener.progressed(event),
                Phase::Ended => listener.ended(event),
                Phase::MayBegin => unreachable!("sessions never emit MayBegin to listeners"),
            };
            if let Err(source) = res {
                tracing::debug!(session = id, phase = ?event.phase(), "swipe listener failed");
                self.teardown(id);
                return Err(SwipeError::Listener {
                    phase: event.phase(),
                    source,
                });
            }
        }
        Ok(())
    }

    /// Clear the slot if it still holds session `id`.
    fn teardown(&self, id: u64) {
        let mut state = self.inner.state.lock();
        if matches!(&state.slot, Slot::Active(session) if session.id() == id) {
            state.slot = Slot::Idle;
        }
    }
}
