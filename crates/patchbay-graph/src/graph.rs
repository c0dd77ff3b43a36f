//! The processor graph - mutation API and change notification.
//!
//! [`ProcessorGraph`] owns the node and connection sets and is the single
//! mutation point for both direct API calls and document restoration. Every
//! structural change fans out to registered [`GraphListener`]s so visual
//! components stay in sync with the model.
//!
//! All mutation happens on one logical owner thread (the UI/event thread);
//! callbacks fire synchronously in that thread, in registration order. The
//! one exception is document restoration, whose node/connection events are
//! queued and delivered by [`dispatch_pending_events`]
//! (ProcessorGraph::dispatch_pending_events) on the host's next UI turn, so
//! a restore triggered from inside another callback never re-enters its
//! caller.

use std::collections::HashMap;
use std::sync::Arc;

use patchbay_registry::ModuleFactory;
use tracing::debug;

use crate::connection::Connection;
use crate::listener::{GraphListener, ListenerList};
use crate::node::{Node, NodeId};
use crate::property::{PropertyValue, keys};
use crate::window::WindowKind;

/// Callback slot invoked when document restoration finds a node whose
/// metadata says an auxiliary window should reopen.
///
/// Returns whether a window was produced. The window host keeps the actual
/// window handle on its side of the seam.
pub type WindowRequestCallback = Box<dyn FnMut(NodeId, WindowKind) -> bool>;

/// A structural change, recorded so restoration can defer its delivery.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GraphEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    ConnectionAdded(Connection),
    ConnectionRemoved(Connection),
}

/// An owned directed graph of processing nodes.
///
/// # Example
///
/// ```rust
/// use patchbay_core::{BusesLayout, Processor};
/// use patchbay_graph::{Connection, ProcessorGraph};
/// use patchbay_registry::ModuleFactory;
///
/// struct Stereo {
///     layout: BusesLayout,
/// }
///
/// impl Processor for Stereo {
///     fn name(&self) -> &str {
///         "Stereo"
///     }
///     fn bus_layout(&self) -> &BusesLayout {
///         &self.layout
///     }
///     fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
///         self.layout = layout;
///         true
///     }
/// }
///
/// let factory = ModuleFactory::from_list(vec![Box::new(|| {
///     Box::new(Stereo { layout: BusesLayout::stereo_io() }) as _
/// })]);
///
/// let mut graph = ProcessorGraph::new(factory);
/// let a = graph.create_module(0, 0.25, 0.5).unwrap();
/// let b = graph.create_module(0, 0.75, 0.5).unwrap();
/// assert!(graph.add_connection(Connection::new(a, 0, b, 0)));
/// ```
pub struct ProcessorGraph {
    factory: ModuleFactory,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    listeners: ListenerList,
    pending_events: Vec<GraphEvent>,
    deferring: bool,
    next_node_id: u32,
    next_instance_ids: HashMap<usize, i64>,
    on_window_requested: Option<WindowRequestCallback>,
}

impl ProcessorGraph {
    /// Creates an empty graph backed by the given factory.
    pub fn new(factory: ModuleFactory) -> Self {
        Self {
            factory,
            nodes: Vec::new(),
            connections: Vec::new(),
            listeners: ListenerList::new(),
            pending_events: Vec::new(),
            deferring: false,
            next_node_id: 1,
            next_instance_ids: HashMap::new(),
            on_window_requested: None,
        }
    }

    /// The factory this graph creates modules from.
    pub fn factory(&self) -> &ModuleFactory {
        &self.factory
    }

    // ------------------------------------------------------------------
    // Node mutation

    /// Creates a node from a factory index at a normalized position.
    ///
    /// Position components are clamped to `[0, 1]`. The new node records the
    /// factory index and a per-factory instance counter (0 for the first
    /// node from that index, 1 for the second, and so on) in its properties.
    ///
    /// Returns `None` — adding nothing and firing no event — when the
    /// factory has no constructor at `factory_index`.
    pub fn create_module(&mut self, factory_index: usize, x: f64, y: f64) -> Option<NodeId> {
        let mut processor = self.factory.create(factory_index)?;
        processor.enable_all_buses();

        let id = self.allocate_node_id();
        let instance = self.next_instance_id(factory_index);

        let mut node = Node::new(id, processor);
        node.properties.set(keys::X, x.clamp(0.0, 1.0));
        node.properties.set(keys::Y, y.clamp(0.0, 1.0));
        node.properties.set(keys::FACTORY_ID, factory_index as i64);
        node.properties.set(keys::INSTANCE_ID, instance);
        self.nodes.push(node);

        debug!(node = %id, factory_index, instance, "module created");
        self.emit(GraphEvent::NodeAdded(id));
        Some(id)
    }

    /// Removes a node and every connection touching it.
    ///
    /// Fires one `connection_removed` per touching connection, then
    /// `node_removed`. Returns `false` (no events) when the node is absent.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if self.get_node(id).is_none() {
            return false;
        }
        self.disconnect_node(id);
        self.nodes.retain(|n| n.id != id);
        debug!(node = %id, "node removed");
        self.emit(GraphEvent::NodeRemoved(id));
        true
    }

    /// Removes every connection touching a node, leaving the node in place.
    ///
    /// Fires one `connection_removed` per removed connection. The removal
    /// set is snapshotted up front, so listener callbacks observe a
    /// consistent sequence regardless of connection ordering.
    pub fn disconnect_node(&mut self, id: NodeId) {
        if self.get_node(id).is_none() {
            return;
        }
        let removed: Vec<Connection> = self
            .connections
            .iter()
            .copied()
            .filter(|c| c.touches(id))
            .collect();
        self.connections.retain(|c| !c.touches(id));
        for connection in removed {
            self.emit(GraphEvent::ConnectionRemoved(connection));
        }
    }

    // ------------------------------------------------------------------
    // Connection mutation

    /// Adds a connection and fires `connection_added`.
    ///
    /// The pair must not already exist (returns `false` without an event if
    /// it does), but no channel or node validation is performed here:
    /// legality checking is the caller's job — see
    /// [`can_connect`](Self::can_connect).
    pub fn add_connection(&mut self, connection: Connection) -> bool {
        if self.connections.contains(&connection) {
            return false;
        }
        self.connections.push(connection);
        self.emit(GraphEvent::ConnectionAdded(connection));
        true
    }

    /// Removes a connection and fires `connection_removed`.
    ///
    /// Returns `false` (no event) when the connection is absent.
    pub fn remove_connection(&mut self, connection: &Connection) -> bool {
        let Some(index) = self.connections.iter().position(|c| c == connection) else {
            return false;
        };
        let removed = self.connections.remove(index);
        self.emit(GraphEvent::ConnectionRemoved(removed));
        true
    }

    /// Whether a connection satisfies the graph's structural invariants:
    /// both nodes exist, the endpoints are distinct nodes, and the channels
    /// are within the respective nodes' enabled channel counts — or, for a
    /// MIDI pair, the source produces MIDI and the destination accepts it.
    pub fn is_connection_legal(&self, connection: &Connection) -> bool {
        let Some(source) = self.get_node(connection.source.node) else {
            return false;
        };
        let Some(destination) = self.get_node(connection.destination.node) else {
            return false;
        };
        if connection.source.node == connection.destination.node {
            return false;
        }
        if connection.is_midi() {
            return source.processor().produces_midi()
                && destination.processor().accepts_midi();
        }
        connection.source.channel < source.processor().bus_layout().total_output_channels()
            && connection.destination.channel
                < destination.processor().bus_layout().total_input_channels()
    }

    /// Whether [`add_connection`](Self::add_connection) would produce a
    /// legal, new connection. Drag-and-drop code checks this before calling.
    pub fn can_connect(&self, connection: &Connection) -> bool {
        self.is_connection_legal(connection) && !self.connections.contains(connection)
    }

    // ------------------------------------------------------------------
    // Position and property access

    /// Stores a node's normalized position, clamping each component to
    /// `[0, 1]`. Absent nodes are a no-op.
    pub fn set_node_position(&mut self, id: NodeId, x: f64, y: f64) {
        if let Some(node) = self.get_node_mut(id) {
            node.properties.set(keys::X, x.clamp(0.0, 1.0));
            node.properties.set(keys::Y, y.clamp(0.0, 1.0));
        }
    }

    /// Reads a node's normalized position. Absent nodes read as `(0, 0)`.
    pub fn node_position(&self, id: NodeId) -> (f64, f64) {
        self.get_node(id).map_or((0.0, 0.0), |node| {
            let read = |key| {
                node.properties
                    .get(key)
                    .and_then(PropertyValue::as_float)
                    .unwrap_or(0.0)
            };
            (read(keys::X), read(keys::Y))
        })
    }

    /// Looks up a node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Looks up a node by ID, mutably.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// All nodes, in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All node IDs, in creation order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All connections.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    // ------------------------------------------------------------------
    // Clearing

    /// Removes every node and connection and resets ID-assignment
    /// bookkeeping (node IDs and per-factory instance counters).
    ///
    /// `graph_about_to_be_cleared` fires synchronously *before* anything is
    /// removed — even during a restore — so listeners can release resources
    /// tied to live nodes, e.g. open auxiliary windows. The individual
    /// removals fire no per-node or per-connection events.
    pub fn clear(&mut self) {
        self.listeners
            .call(|listener| listener.graph_about_to_be_cleared());
        self.nodes.clear();
        self.connections.clear();
        self.next_node_id = 1;
        self.next_instance_ids.clear();
        debug!("graph cleared");
    }

    // ------------------------------------------------------------------
    // Listeners and deferred events

    /// Registers a listener. Adding an already registered listener keeps a
    /// single registration, so events never double-fire.
    pub fn add_listener(&mut self, listener: &Arc<dyn GraphListener>) {
        self.listeners.add(listener);
    }

    /// Removes a previously registered listener; unknown listeners are a
    /// no-op.
    pub fn remove_listener(&mut self, listener: &Arc<dyn GraphListener>) {
        self.listeners.remove(listener);
    }

    /// Installs the window-request callback invoked during document
    /// restoration. A single slot: setting replaces any previous callback.
    pub fn set_on_window_requested(&mut self, callback: WindowRequestCallback) {
        self.on_window_requested = Some(callback);
    }

    /// Delivers events queued by document restoration, in occurrence order.
    ///
    /// Hosts call this from their next UI turn after
    /// [`restore_from_document`](Self::restore_from_document). A no-op when
    /// nothing is queued.
    pub fn dispatch_pending_events(&mut self) {
        let pending = std::mem::take(&mut self.pending_events);
        for event in pending {
            self.notify(&event);
        }
    }

    /// Whether restoration left events waiting for dispatch.
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ------------------------------------------------------------------
    // Internals

    fn allocate_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Per-factory instance counter: 0 for the first unit created from an
    /// index, incrementing independently of other indices. Reset by
    /// [`clear`](Self::clear).
    fn next_instance_id(&mut self, factory_index: usize) -> i64 {
        let counter = self.next_instance_ids.entry(factory_index).or_insert(0);
        let value = *counter;
        *counter += 1;
        value
    }

    /// Keeps a restored node's instance counter from being handed out
    /// again: the next fresh unit from this factory index counts from past
    /// the restored value.
    pub(crate) fn note_restored_instance(&mut self, factory_index: usize, instance: i64) {
        let counter = self.next_instance_ids.entry(factory_index).or_insert(0);
        *counter = (*counter).max(instance.saturating_add(1));
    }

    /// Inserts a node restored from a document under its recorded ID,
    /// keeping fresh-ID allocation above it. Refuses duplicate IDs.
    pub(crate) fn insert_restored_node(
        &mut self,
        id: NodeId,
        processor: Box<dyn patchbay_core::Processor + Send>,
    ) -> Option<&mut Node> {
        if self.get_node(id).is_some() {
            return None;
        }
        self.next_node_id = self.next_node_id.max(id.0.saturating_add(1));
        self.nodes.push(Node::new(id, processor));
        self.nodes.last_mut()
    }

    pub(crate) fn set_deferring(&mut self, deferring: bool) {
        self.deferring = deferring;
    }

    pub(crate) fn take_window_callback(&mut self) -> Option<WindowRequestCallback> {
        self.on_window_requested.take()
    }

    pub(crate) fn put_window_callback(&mut self, callback: Option<WindowRequestCallback>) {
        if self.on_window_requested.is_none() {
            self.on_window_requested = callback;
        }
    }

    pub(crate) fn drop_pending_connection_events_not_in_graph(&mut self) {
        let mut pending = std::mem::take(&mut self.pending_events);
        pending.retain(|event| match event {
            GraphEvent::ConnectionAdded(c) => self.connections.contains(c),
            _ => true,
        });
        self.pending_events = pending;
    }

    pub(crate) fn prune_illegal_connections(&mut self) -> usize {
        let before = self.connections.len();
        let legal: Vec<Connection> = self
            .connections
            .iter()
            .copied()
            .filter(|c| self.is_connection_legal(c))
            .collect();
        self.connections = legal;
        before - self.connections.len()
    }

    pub(crate) fn emit(&mut self, event: GraphEvent) {
        if self.deferring {
            self.pending_events.push(event);
        } else {
            self.notify(&event);
        }
    }

    fn notify(&mut self, event: &GraphEvent) {
        self.listeners.call(|listener| match event {
            GraphEvent::NodeAdded(id) => listener.node_added(*id),
            GraphEvent::NodeRemoved(id) => listener.node_removed(*id),
            GraphEvent::ConnectionAdded(c) => listener.connection_added(c),
            GraphEvent::ConnectionRemoved(c) => listener.connection_removed(c),
        });
    }
}
