// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixtures shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use parking_lot::Mutex;

use crate::config::DispatchMode;
use crate::error::ListenerFault;
use crate::listener::{SharedListener, SwipeListener, SwipeVetoer};
use crate::resolve::SwipeTree;
use crate::source::GestureSource;
use crate::types::{Phase, SwipeEvent};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Node(pub(crate) u32);

type BoxedVetoer = Box<dyn SwipeVetoer + Send + Sync>;

struct Entry {
    parent: Option<Node>,
    bounds: Rect,
    vetoer: Option<BoxedVetoer>,
}

/// A tree with absolute bounds. Later siblings are on top.
#[derive(Default)]
pub(crate) struct MapTree {
    nodes: HashMap<Node, Entry>,
    order: Vec<Node>,
}

impl std::fmt::Debug for MapTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapTree")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl MapTree {
    pub(crate) fn add(&mut self, node: Node, parent: Option<Node>, bounds: Rect) {
        self.nodes.insert(
            node,
            Entry {
                parent,
                bounds,
                vetoer: None,
            },
        );
        self.order.push(node);
    }

    pub(crate) fn set_vetoer(&mut self, node: Node, vetoer: impl SwipeVetoer + Send + Sync + 'static) {
        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.vetoer = Some(Box::new(vetoer));
        }
    }

    /// Depth of `node` below `root`, or `None` if it is not in that subtree.
    fn depth_below(&self, root: Node, node: Node) -> Option<usize> {
        let mut depth = 0;
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == root {
                return Some(depth);
            }
            depth += 1;
            cur = self.nodes.get(&n).and_then(|e| e.parent);
        }
        None
    }
}

impl SwipeTree<Node> for MapTree {
    fn deepest_at(&self, root: Node, pt: Point) -> Option<Node> {
        let mut best: Option<(usize, Node)> = None;
        for node in &self.order {
            let Some(entry) = self.nodes.get(node) else {
                continue;
            };
            if !entry.bounds.contains(pt) {
                continue;
            }
            let Some(depth) = self.depth_below(root, *node) else {
                continue;
            };
            if best.is_none_or(|(d, _)| depth >= d) {
                best = Some((depth, *node));
            }
        }
        best.map(|(_, n)| n)
    }

    fn parent_of(&self, node: &Node) -> Option<Node> {
        self.nodes.get(node).and_then(|e| e.parent)
    }

    fn vetoer(&self, node: &Node) -> Option<&dyn SwipeVetoer> {
        self.nodes
            .get(node)
            .and_then(|e| e.vetoer.as_deref())
            .map(|v| v as &dyn SwipeVetoer)
    }
}

/// Delivery order across several recorders.
pub(crate) type Journal = Arc<Mutex<Vec<(&'static str, Phase)>>>;

/// A listener that records what it receives.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    name: &'static str,
    fail_on: Option<Phase>,
    journal: Option<Journal>,
    events: Mutex<Vec<SwipeEvent>>,
}

impl Recorder {
    pub(crate) fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            ..Self::default()
        })
    }

    pub(crate) fn shared(name: &'static str) -> SharedListener {
        Self::new(name)
    }

    /// Records every event, then fails on `phase`.
    pub(crate) fn failing_on(name: &'static str, phase: Phase) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail_on: Some(phase),
            ..Self::default()
        })
    }

    pub(crate) fn journaled(name: &'static str, journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            name,
            journal: Some(journal.clone()),
            ..Self::default()
        })
    }

    pub(crate) fn events(&self) -> Vec<SwipeEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn phases(&self) -> Vec<Phase> {
        self.events.lock().iter().map(SwipeEvent::phase).collect()
    }

    pub(crate) fn amounts(&self) -> Vec<f64> {
        self.events.lock().iter().map(SwipeEvent::amount).collect()
    }

    fn record(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
        self.events.lock().push(event.clone());
        if let Some(journal) = &self.journal {
            journal.lock().push((self.name, event.phase()));
        }
        if self.fail_on == Some(event.phase()) {
            return Err(format!("{} refused {:?}", self.name, event.phase()).into());
        }
        Ok(())
    }
}

impl SwipeListener for Recorder {
    fn began(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
        self.record(event)
    }

    fn progressed(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
        self.record(event)
    }

    fn ended(&self, event: &SwipeEvent) -> Result<(), ListenerFault> {
        self.record(event)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Start(DispatchMode),
    Stop,
    Accept,
    Veto,
    Continuation(bool),
}

/// A gesture source that records the commands it receives.
#[derive(Debug)]
pub(crate) struct RecordingSource {
    accept: AtomicBool,
    commands: Mutex<Vec<Command>>,
}

impl Default for RecordingSource {
    fn default() -> Self {
        Self {
            accept: AtomicBool::new(true),
            commands: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingSource {
    /// Make `accept_pending` report a failure to start.
    pub(crate) fn refuse_accepts(&self) {
        self.accept.store(false, Ordering::SeqCst);
    }

    pub(crate) fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    pub(crate) fn take(&self) -> Vec<Command> {
        std::mem::take(&mut *self.commands.lock())
    }
}

impl GestureSource for RecordingSource {
    fn start_monitoring(&self, mode: DispatchMode) {
        self.commands.lock().push(Command::Start(mode));
    }

    fn stop_monitoring(&self) {
        self.commands.lock().push(Command::Stop);
    }

    fn accept_pending(&self) -> bool {
        self.commands.lock().push(Command::Accept);
        self.accept.load(Ordering::SeqCst)
    }

    fn veto_pending(&self) {
        self.commands.lock().push(Command::Veto);
    }

    fn set_post_release_continuation(&self, continue_after_release: bool) -> bool {
        self.commands
            .lock()
            .push(Command::Continuation(continue_after_release));
        continue_after_release
    }
}
