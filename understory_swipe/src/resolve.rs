// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veto resolution: pick the node that receives a pending swipe.
//!
//! ## Algorithm
//!
//! Starting at the deepest node under the pointer:
//!
//! 1. Walk toward the root. Each visited node is first checked for a veto; a
//!    refusal ends resolution with [`Rejection::VetoedByDescendant`]. A
//!    refusing node is therefore never a target, even if it has listeners.
//! 2. The walk stops at the first node with a non-empty listener list. That
//!    node is the candidate target. Running past the root yields
//!    [`Rejection::NoTarget`].
//! 3. A second walk checks every ancestor of the candidate. A refusal yields
//!    [`Rejection::VetoedByAncestor`].
//!
//! Nodes without a [`SwipeVetoer`] are permissive.
//!
//! The listener snapshot is taken once, when the target is found; later
//! registration changes do not affect the resulting [`Resolution`].

use std::sync::Arc;

use kurbo::Point;

use crate::listener::{SharedListener, SwipeVetoer};
use crate::types::SwipeEvent;

/// Read-only view of the component tree consumed by the dispatcher.
///
/// `K` is a small, copyable node identity (for example a generational id).
/// Implementations are expected to be cheap handles onto the toolkit's tree;
/// every method is only called on the UI thread.
pub trait SwipeTree<K> {
    /// Deepest node under `pt` within the window rooted at `root`, if any.
    ///
    /// `pt` is expressed in the root's coordinate space.
    fn deepest_at(&self, root: K, pt: Point) -> Option<K>;

    /// Parent of `node`, or `None` for a root.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// The veto capability of `node`, if it declares one.
    fn vetoer(&self, node: &K) -> Option<&dyn SwipeVetoer> {
        let _ = node;
        None
    }
}

impl<K, T: SwipeTree<K> + ?Sized> SwipeTree<K> for Arc<T> {
    fn deepest_at(&self, root: K, pt: Point) -> Option<K> {
        (**self).deepest_at(root, pt)
    }

    fn parent_of(&self, node: &K) -> Option<K> {
        (**self).parent_of(node)
    }

    fn vetoer(&self, node: &K) -> Option<&dyn SwipeVetoer> {
        (**self).vetoer(node)
    }
}

/// A successful resolution.
#[derive(Clone, Debug)]
pub struct Resolution<K> {
    /// The node whose listeners receive the swipe.
    pub target: K,
    /// Snapshot of the target's listeners, in registration order.
    pub listeners: Arc<[SharedListener]>,
}

/// Why a pending swipe found no target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection<K> {
    /// The pointer is over no node, or no node up to the root has listeners.
    NoTarget,
    /// The given node, on the path from the hit node to the target, refused.
    VetoedByDescendant(K),
    /// The given ancestor of the target refused.
    VetoedByAncestor(K),
}

/// Whether `node` declares a veto capability that refuses `event`.
pub fn vetoed_by<K, T: SwipeTree<K> + ?Sized>(tree: &T, node: &K, event: &SwipeEvent) -> bool {
    tree.vetoer(node).is_some_and(|v| !v.permits(event))
}

/// Resolve the target for a pending swipe starting at `leaf`.
///
/// `interested` returns the listener snapshot for a node that carries a
/// non-empty listener list, and `None` otherwise.
pub fn resolve<K, T, F>(
    tree: &T,
    leaf: K,
    event: &SwipeEvent,
    mut interested: F,
) -> Result<Resolution<K>, Rejection<K>>
where
    K: Copy + std::fmt::Debug,
    T: SwipeTree<K> + ?Sized,
    F: FnMut(&K) -> Option<Arc<[SharedListener]>>,
{
    let mut cur = Some(leaf);
    let mut found = None;
    // Caller ensures acyclic ancestry.
    while let Some(node) = cur {
        if vetoed_by(tree, &node, event) {
            tracing::trace!(?node, "swipe vetoed on the way to the target");
            return Err(Rejection::VetoedByDescendant(node));
        }
        if let Some(listeners) = interested(&node) {
            found = Some(Resolution {
                target: node,
                listeners,
            });
            break;
        }
        cur = tree.parent_of(&node);
    }
    let Some(resolution) = found else {
        return Err(Rejection::NoTarget);
    };
    if let Some(node) = vetoing_ancestor(tree, &resolution.target, event) {
        tracing::trace!(?node, "swipe vetoed by an ancestor of the target");
        return Err(Rejection::VetoedByAncestor(node));
    }
    Ok(resolution)
}

/// First ancestor of `node` (excluding `node`) that refuses `event`.
pub fn vetoing_ancestor<K, T>(tree: &T, node: &K, event: &SwipeEvent) -> Option<K>
where
    K: Copy,
    T: SwipeTree<K> + ?Sized,
{
    let mut cur = tree.parent_of(node);
    while let Some(n) = cur {
        if vetoed_by(tree, &n, event) {
            return Some(n);
        }
        cur = tree.parent_of(&n);
    }
    None
}
