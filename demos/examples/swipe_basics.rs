// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated trackpad driving back/forward navigation.
//!
//! The scene is a browser-like window: a page with a horizontally scrollable
//! strip. The strip sits at its left edge, so a left-to-right swipe ("back")
//! reaches the page, while a right-to-left swipe ("forward") is vetoed by the
//! strip because it still has content to scroll to.
//!
//! A native thread plays the driver: it reports pending gestures, waits for
//! the accept/veto command and then streams encoded stage codes. The main
//! thread is the UI thread and pumps the [`UiLoop`].
//!
//! Run:
//! - `RUST_LOG=understory_swipe=debug cargo run -p understory_swipe_demos --example swipe_basics`

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use kurbo::{Point, Rect};
use understory_swipe::bridge::StageCode;
use understory_swipe::error::ListenerFault;
use understory_swipe::executor::UiLoop;
use understory_swipe::listener::{SwipeListener, SwipeVetoer};
use understory_swipe::resolve::SwipeTree;
use understory_swipe::source::GestureSource;
use understory_swipe::vetoers::{ScrollEdgeVetoer, ScrollRange};
use understory_swipe::{Direction, DispatchMode, Outcome, SwipeConfig, SwipeDispatcher, SwipeEvent};

const WINDOW: usize = 0;
const PAGE: usize = 1;
const STRIP: usize = 2;

/// Flat scene: parent links, absolute bounds and one scrollable strip.
#[derive(Debug)]
struct Scene {
    parents: Vec<Option<usize>>,
    bounds: Vec<Rect>,
    strip: ScrollEdgeVetoer,
}

impl Scene {
    fn new() -> Self {
        Self {
            parents: vec![None, Some(WINDOW), Some(PAGE)],
            bounds: vec![
                Rect::new(0.0, 0.0, 800.0, 600.0),
                Rect::new(0.0, 40.0, 800.0, 600.0),
                Rect::new(0.0, 200.0, 800.0, 320.0),
            ],
            strip: ScrollEdgeVetoer::new(Some(ScrollRange {
                min: 0.0,
                max: 2400.0,
                value: 0.0,
                extent: 800.0,
            })),
        }
    }
}

impl SwipeTree<usize> for Scene {
    fn deepest_at(&self, root: usize, pt: Point) -> Option<usize> {
        // Nodes are stored parent-first, so the last hit is the deepest.
        (root..self.bounds.len())
            .rev()
            .find(|&n| self.bounds[n].contains(pt))
    }

    fn parent_of(&self, node: &usize) -> Option<usize> {
        self.parents.get(*node).copied().flatten()
    }

    fn vetoer(&self, node: &usize) -> Option<&dyn SwipeVetoer> {
        (*node == STRIP).then_some(&self.strip as &dyn SwipeVetoer)
    }
}

/// Pretends to be the platform driver and forwards decisions to the native thread.
#[derive(Debug)]
struct SimulatedDriver {
    decisions: Sender<bool>,
}

impl GestureSource for SimulatedDriver {
    fn start_monitoring(&self, mode: DispatchMode) {
        tracing::info!(?mode, "driver: monitoring");
    }

    fn stop_monitoring(&self) {
        tracing::info!("driver: stopped");
    }

    fn accept_pending(&self) -> bool {
        self.decisions.send(true).is_ok()
    }

    fn veto_pending(&self) {
        let _ = self.decisions.send(false);
    }
}

#[derive(Debug)]
struct Navigator;

impl SwipeListener for Navigator {
    fn began(&self, e: &SwipeEvent) -> Result<(), ListenerFault> {
        let label = match e.logical_direction() {
            Direction::LeftToRight => "back",
            Direction::RightToLeft => "forward",
        };
        println!("page: {label} swipe started at {:.2}", e.amount());
        Ok(())
    }

    fn progressed(&self, e: &SwipeEvent) -> Result<(), ListenerFault> {
        println!(
            "page: {:>3.0}% touching={} outcome={:?}",
            e.amount() * 100.0,
            e.is_touching(),
            e.outcome()
        );
        Ok(())
    }

    fn ended(&self, e: &SwipeEvent) -> Result<(), ListenerFault> {
        match e.outcome() {
            Outcome::Success => println!("page: navigating"),
            _ => println!("page: staying"),
        }
        Ok(())
    }
}

type Swipe = SwipeDispatcher<usize, Scene>;

/// One physical gesture as the driver would report it.
fn play_gesture(swipe: &Swipe, decisions: &Receiver<bool>, signal: f64, complete: bool) {
    let at = Point::new(400.0, 260.0);
    if swipe.notify_may_begin(WINDOW, signal, at, true).is_err() {
        return;
    }
    match decisions.recv_timeout(Duration::from_secs(1)) {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            println!("driver: gesture handled as plain scrolling");
            return;
        }
    }

    let mut codes = vec![(0.1, StageCode::LOGICALLY_BEGAN)];
    codes.extend([0.3, 0.55].map(|a| (a, StageCode::PROGRESSED)));
    let result = if complete {
        StageCode::COMPLETED
    } else {
        StageCode::CANCELED
    };
    codes.push((
        0.7,
        StageCode::PROGRESSED_NO_MORE_TOUCHING | StageCode::UPDATE_STATE | result,
    ));
    codes.push((1.0, result));
    for (amount, code) in codes {
        if swipe.notify_raw(amount, code.bits(), true).is_err() {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let ui = UiLoop::new();
    let (tx, rx) = mpsc::channel();
    let config = SwipeConfig::from_env().with_dispatch_mode(DispatchMode::Async);
    let swipe = SwipeDispatcher::with_config(
        Scene::new(),
        Arc::new(SimulatedDriver { decisions: tx }),
        ui.handle(),
        config,
    );
    swipe.add_listener(PAGE, Arc::new(Navigator));
    swipe.start_event_monitoring();

    let native = {
        let swipe = swipe.clone();
        thread::spawn(move || {
            println!("-- forward swipe over the strip");
            play_gesture(&swipe, &rx, -1.0, true);
            println!("-- back swipe over the strip");
            play_gesture(&swipe, &rx, 1.0, true);
            println!("-- back swipe, changed mind");
            play_gesture(&swipe, &rx, 1.0, false);
        })
    };

    while !native.is_finished() {
        if let Err(e) = ui.pump_timeout(Duration::from_millis(10)) {
            tracing::error!(error = %e, "swipe handling failed");
        }
    }
    if let Err(e) = ui.pump() {
        tracing::error!(error = %e, "swipe handling failed");
    }
    if native.join().is_err() {
        tracing::error!("driver thread panicked");
    }
    swipe.stop_event_monitoring();
}
