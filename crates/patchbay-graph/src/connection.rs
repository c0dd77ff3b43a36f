//! Directed multi-channel connections.

use patchbay_core::MIDI_CHANNEL_INDEX;

use crate::node::NodeId;

/// One end of a connection: a node plus a channel index on it.
///
/// Channel indices count through the node's enabled bus channels — output
/// channels on the source side, input channels on the destination side — or
/// equal [`MIDI_CHANNEL_INDEX`] for a MIDI endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// The node this endpoint belongs to.
    pub node: NodeId,
    /// Channel index on that node.
    pub channel: u32,
}

/// A directed edge from a source endpoint to a destination endpoint.
///
/// Connections have no identity of their own: the (source, destination) pair
/// *is* the identity, and the graph never holds two equal pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Where the signal comes from.
    pub source: Endpoint,
    /// Where the signal goes.
    pub destination: Endpoint,
}

impl Connection {
    /// Builds a connection from raw parts.
    pub fn new(
        source_node: NodeId,
        source_channel: u32,
        destination_node: NodeId,
        destination_channel: u32,
    ) -> Self {
        Self {
            source: Endpoint {
                node: source_node,
                channel: source_channel,
            },
            destination: Endpoint {
                node: destination_node,
                channel: destination_channel,
            },
        }
    }

    /// Whether this connection carries MIDI rather than audio.
    ///
    /// True only when both endpoints use the MIDI channel sentinel; a mixed
    /// audio/MIDI pair is never legal.
    pub fn is_midi(&self) -> bool {
        self.source.channel == MIDI_CHANNEL_INDEX && self.destination.channel == MIDI_CHANNEL_INDEX
    }

    /// Whether either endpoint references the given node.
    pub fn touches(&self, node: NodeId) -> bool {
        self.source.node == node || self.destination.node == node
    }
}
