// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-off of work onto the logical UI thread.
//!
//! Native gesture notifications arrive on threads the toolkit does not own.
//! Everything that touches the component tree, the listener registry or the
//! active session must run on the UI thread instead. [`UiExecutor`] is the seam
//! a toolkit implements to accept such work; [`UiLoop`] is a channel-backed
//! implementation for toolkits that can pump a queue from their own loop.
//!
//! Two hand-off flavors exist:
//!
//! - [`perform_on_ui`]: fire and forget.
//! - [`perform_on_ui_and_wait`]: block the calling thread until the task ran
//!   and hand its value back.
//!
//! Both skip the hand-off and run inline when the caller already is the UI
//! thread, so a UI-thread caller can never deadlock waiting for itself.
//!
//! ## Faults
//!
//! Tasks return [`Result`]. A failed task's error is surfaced where the task
//! ran, which for a posted task is the UI thread (see [`UiLoop::pump`]). A
//! thread blocked in [`perform_on_ui_and_wait`] only learns that the task
//! failed, through [`SwipeError::FailedOnUiThread`].
//!
//! ```
//! use std::thread;
//! use understory_swipe::executor::{UiLoop, perform_on_ui_and_wait};
//!
//! let ui = UiLoop::new();
//! let handle = ui.handle();
//! let native = thread::spawn(move || perform_on_ui_and_wait(&handle, || Ok(40 + 2)));
//!
//! // The UI thread keeps pumping until the native thread got its answer.
//! while !native.is_finished() {
//!     ui.pump_timeout(std::time::Duration::from_millis(10)).unwrap();
//! }
//! assert_eq!(native.join().unwrap().unwrap(), 42);
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::error::{Result, SwipeError};

/// A unit of work to run on the UI thread.
pub type UiTask = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Accepts work for the logical UI thread.
pub trait UiExecutor: Debug + Send + Sync {
    /// Whether the calling thread is the UI thread.
    fn is_ui_thread(&self) -> bool;

    /// Queue `task` to run on the UI thread. Never runs it inline.
    fn post(&self, task: UiTask) -> Result<()>;
}

/// Run `task` on the UI thread without waiting for it.
///
/// Runs inline when called on the UI thread; the task's own result is then
/// returned directly.
pub fn perform_on_ui(executor: &dyn UiExecutor, task: UiTask) -> Result<()> {
    if executor.is_ui_thread() {
        task()
    } else {
        executor.post(task)
    }
}

/// Run `f` on the UI thread and block until it returns.
///
/// Runs inline when called on the UI thread. Otherwise the calling thread
/// waits for the UI thread to run the task. If the task fails, its error is
/// raised on the UI thread and this call returns
/// [`SwipeError::FailedOnUiThread`]. If the executor drops the task without
/// running it, this returns [`SwipeError::ExecutorClosed`].
pub fn perform_on_ui_and_wait<R, F>(executor: &dyn UiExecutor, f: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R> + Send + 'static,
{
    if executor.is_ui_thread() {
        return f();
    }
    let (tx, rx) = mpsc::sync_channel(1);
    executor.post(Box::new(move || match f() {
        Ok(v) => {
            // The waiter may have given up already.
            let _ = tx.send(Some(v));
            Ok(())
        }
        Err(e) => {
            let _ = tx.send(None);
            Err(e)
        }
    }))?;
    match rx.recv() {
        Ok(Some(v)) => Ok(v),
        Ok(None) => Err(SwipeError::FailedOnUiThread),
        Err(_) => Err(SwipeError::ExecutorClosed),
    }
}

/// A task queue drained by the thread that created it.
///
/// The creating thread becomes the UI thread. Hand [`UiLoop::handle`] to the
/// dispatcher and call [`UiLoop::pump`] (or [`UiLoop::pump_timeout`]) from the
/// toolkit's event loop. Dropping the loop closes it: pending tasks are
/// dropped and later posts fail with [`SwipeError::ExecutorClosed`].
#[derive(Debug)]
pub struct UiLoop {
    rx: Receiver<UiTask>,
    handle: UiLoopHandle,
    // Tasks must run on the owning thread.
    _not_send: PhantomData<Rc<()>>,
}

impl Default for UiLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl UiLoop {
    /// Create a loop owned by the current thread.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            handle: UiLoopHandle {
                tx,
                owner: thread::current().id(),
            },
            _not_send: PhantomData,
        }
    }

    /// A cloneable, thread-safe executor handle for this loop.
    pub fn handle(&self) -> UiLoopHandle {
        self.handle.clone()
    }

    /// Run every queued task, in order.
    ///
    /// Stops at the first failing task and returns its error; tasks queued
    /// after it stay queued for the next pump. Returns the number of tasks run
    /// otherwise.
    pub fn pump(&self) -> Result<usize> {
        let mut ran = 0;
        loop {
            match self.rx.try_recv() {
                Ok(task) => {
                    ran += 1;
                    task()?;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(ran),
            }
        }
    }

    /// Wait up to `timeout` for a task, then run everything queued.
    pub fn pump_timeout(&self, timeout: Duration) -> Result<usize> {
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                task()?;
                Ok(1 + self.pump()?)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(0),
        }
    }
}

/// Executor handle onto a [`UiLoop`].
#[derive(Clone, Debug)]
pub struct UiLoopHandle {
    tx: Sender<UiTask>,
    owner: ThreadId,
}

impl UiExecutor for UiLoopHandle {
    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    fn post(&self, task: UiTask) -> Result<()> {
        self.tx.send(task).map_err(|_| SwipeError::ExecutorClosed)
    }
}
