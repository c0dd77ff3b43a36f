//! Graph nodes and node identity.

use core::fmt;

use patchbay_core::Processor;

use crate::property::Properties;

/// Unique identifier for a node in the processor graph.
///
/// IDs are assigned sequentially starting at 1, never reused while the node
/// set is live, and remain stable across mutations. Only [`clear`]
/// (crate::ProcessorGraph::clear) resets the assignment bookkeeping.
/// Document restoration preserves the IDs recorded in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Wraps a raw identifier, e.g. one read back from a document.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identifier.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A graph-resident wrapper around one processing unit.
///
/// The graph owns every node exclusively; a node is destroyed when it is
/// removed from the graph or when the graph is cleared. Alongside the unit
/// itself, a node carries a typed property bag holding its normalized
/// position, the factory index it was built from, its per-factory instance
/// id, and per-window UI state (see [`crate::property::keys`]).
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) processor: Box<dyn Processor + Send>,
    pub(crate) properties: Properties,
}

impl Node {
    pub(crate) fn new(id: NodeId, processor: Box<dyn Processor + Send>) -> Self {
        Self {
            id,
            processor,
            properties: Properties::new(),
        }
    }

    /// This node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The hosted processing unit.
    pub fn processor(&self) -> &dyn Processor {
        self.processor.as_ref()
    }

    /// Mutable access to the hosted processing unit.
    pub fn processor_mut(&mut self) -> &mut (dyn Processor + Send) {
        self.processor.as_mut()
    }

    /// The node's metadata bag.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Mutable access to the node's metadata bag.
    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.processor.name())
            .field("properties", &self.properties)
            .finish()
    }
}
