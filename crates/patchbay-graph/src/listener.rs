//! Graph change notification.
//!
//! Visual components subscribe to the graph through [`GraphListener`] and
//! resynchronize from the model when events arrive. The graph holds
//! listeners as weak references in registration order and iterates a
//! snapshot, so a listener dropping itself — or another listener — from
//! inside a callback is safe.

use std::sync::{Arc, Weak};

use crate::connection::Connection;
use crate::node::NodeId;

/// Receives callbacks when the graph's structure changes.
///
/// All methods default to no-ops so a listener only implements the events it
/// cares about. Callbacks arrive synchronously on the mutating thread, in
/// listener-registration order; listeners must not re-enter graph mutation
/// from inside a callback.
pub trait GraphListener {
    /// A node entered the graph.
    fn node_added(&self, _id: NodeId) {}

    /// A node left the graph. Every connection touching it was already
    /// reported removed.
    fn node_removed(&self, _id: NodeId) {}

    /// A connection entered the graph.
    fn connection_added(&self, _connection: &Connection) {}

    /// A connection left the graph.
    fn connection_removed(&self, _connection: &Connection) {}

    /// The graph is about to remove every node and connection. Fired before
    /// anything is removed so listeners can release per-node resources.
    fn graph_about_to_be_cleared(&self) {}
}

/// Ordered list of weakly-held graph listeners.
pub(crate) struct ListenerList {
    listeners: Vec<Weak<dyn GraphListener>>,
}

impl ListenerList {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener. Adding an already registered listener keeps a
    /// single entry, so events never double-fire.
    pub(crate) fn add(&mut self, listener: &Arc<dyn GraphListener>) {
        let already = self
            .listeners
            .iter()
            .any(|existing| existing.ptr_eq(&Arc::downgrade(listener)));
        if !already {
            self.listeners.push(Arc::downgrade(listener));
        }
    }

    /// Removes a listener; unknown listeners are a no-op.
    pub(crate) fn remove(&mut self, listener: &Arc<dyn GraphListener>) {
        let target = Arc::downgrade(listener);
        self.listeners.retain(|existing| !existing.ptr_eq(&target));
    }

    /// Calls `f` for each live listener, in registration order.
    ///
    /// Iterates a snapshot of upgraded references and drops entries whose
    /// listener has been destroyed.
    pub(crate) fn call(&mut self, f: impl Fn(&dyn GraphListener)) {
        self.listeners.retain(|weak| weak.upgrade().is_some());
        let snapshot: Vec<Arc<dyn GraphListener>> =
            self.listeners.iter().filter_map(Weak::upgrade).collect();
        for listener in snapshot {
            f(listener.as_ref());
        }
    }
}
