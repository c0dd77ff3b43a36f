//! Graph persistence - the document format and file I/O.
//!
//! A [`GraphDocument`] is the serialized form of a whole graph: one element
//! per node (typed property list, base64 state blob, indexed bus layout)
//! plus one four-integer element per connection, all under a `kind` tag that
//! identifies the format. Documents serialize to pretty-printed JSON and are
//! host-agnostic: every unit-specific detail travels as an opaque string.
//!
//! Restoration replaces the graph's contents wholesale. The clear
//! announcement fires synchronously, but the node/connection additions are
//! queued and delivered later by
//! [`dispatch_pending_events`](crate::ProcessorGraph::dispatch_pending_events),
//! so a restore triggered from inside a listener callback never re-enters
//! its caller.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use patchbay_core::{BusesLayout, ChannelLayout};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::graph::{GraphEvent, ProcessorGraph};
use crate::node::NodeId;
use crate::property::{PropertyValue, keys};
use crate::window::WindowKind;

/// The `kind` tag marking a document as this format.
pub const DOCUMENT_KIND: &str = "patchbay-graph";

/// Errors from document serialization and file I/O.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading the document file failed.
    #[error("failed to read document '{path}': {source}")]
    ReadFile {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the document file failed.
    #[error("failed to write document '{path}': {source}")]
    WriteFile {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document text is not well-formed JSON of the expected shape.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One typed property entry. The value travels string-encoded regardless of
/// its type; the tag restores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyElement {
    /// Property key.
    pub name: String,
    /// Type tag: `"int"`, `"float"`, `"string"`, or `"bool"`.
    #[serde(rename = "type")]
    pub value_type: String,
    /// String-encoded value.
    pub value: String,
}

/// One bus with its position in the unit's bus list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusElement {
    /// Bus index within its side.
    pub index: usize,
    /// Abbreviated channel layout, `"disabled"` for a disabled bus.
    pub layout: String,
}

/// A unit's full bus configuration, both sides indexed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Input buses.
    pub inputs: Vec<BusElement>,
    /// Output buses.
    pub outputs: Vec<BusElement>,
}

/// One serialized node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    /// Property list. The first entry is the node's identity under the
    /// `"uid"` key; the rest is the node's metadata bag.
    pub properties: Vec<PropertyElement>,
    /// Base64-encoded opaque unit state.
    pub state: String,
    /// Bus configuration at save time.
    pub layout: LayoutElement,
}

/// One serialized connection: two node/channel pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionElement {
    /// Source node identity.
    pub src_node: u32,
    /// Source channel index.
    pub src_channel: u32,
    /// Destination node identity.
    pub dst_node: u32,
    /// Destination channel index.
    pub dst_channel: u32,
}

/// Serialized form of a whole graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Format tag; restoration ignores documents whose tag is not
    /// [`DOCUMENT_KIND`].
    pub kind: String,
    /// Node elements, in the graph's creation order.
    pub nodes: Vec<NodeElement>,
    /// Connection elements.
    pub connections: Vec<ConnectionElement>,
}

impl GraphDocument {
    /// Serializes to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes the document to a file as JSON.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let text = self.to_json_string()?;
        fs::write(path, text).map_err(|source| DocumentError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

impl From<&Connection> for ConnectionElement {
    fn from(c: &Connection) -> Self {
        Self {
            src_node: c.source.node.index(),
            src_channel: c.source.channel,
            dst_node: c.destination.node.index(),
            dst_channel: c.destination.channel,
        }
    }
}

impl From<&ConnectionElement> for Connection {
    fn from(e: &ConnectionElement) -> Self {
        Connection::new(
            NodeId::new(e.src_node),
            e.src_channel,
            NodeId::new(e.dst_node),
            e.dst_channel,
        )
    }
}

fn layout_element(layout: &BusesLayout) -> LayoutElement {
    let side = |buses: &[ChannelLayout]| {
        buses
            .iter()
            .enumerate()
            .map(|(index, bus)| BusElement {
                index,
                layout: bus.abbreviation(),
            })
            .collect()
    };
    LayoutElement {
        inputs: side(&layout.input_buses),
        outputs: side(&layout.output_buses),
    }
}

/// Largest bus index a document element may claim. Real units have a
/// handful of buses; anything past this is a corrupt or hostile document
/// and the element is skipped rather than allocated for.
const MAX_DOCUMENT_BUSES: usize = 64;

fn buses_layout(element: &LayoutElement) -> BusesLayout {
    let side = |buses: &[BusElement]| {
        let len = buses
            .iter()
            .filter(|b| b.index < MAX_DOCUMENT_BUSES)
            .map(|b| b.index + 1)
            .max()
            .unwrap_or(0);
        let mut side = vec![ChannelLayout::disabled(); len];
        for bus in buses {
            if bus.index >= MAX_DOCUMENT_BUSES {
                warn!(index = bus.index, "bus index out of range, skipping bus");
                continue;
            }
            match ChannelLayout::from_abbreviation(&bus.layout) {
                Some(layout) => side[bus.index] = layout,
                None => warn!(layout = %bus.layout, "unrecognized bus layout, disabling bus"),
            }
        }
        side
    };
    BusesLayout::new(side(&element.inputs), side(&element.outputs))
}

impl ProcessorGraph {
    /// Captures the whole graph as a [`GraphDocument`].
    pub fn to_document(&self) -> GraphDocument {
        let nodes = self
            .nodes()
            .iter()
            .map(|node| {
                // Identity first, then the bag in key order.
                let mut properties = vec![PropertyElement {
                    name: keys::NODE_ID.to_string(),
                    value_type: "int".to_string(),
                    value: node.id().index().to_string(),
                }];
                properties.extend(node.properties().iter().map(|(name, value)| {
                    PropertyElement {
                        name: name.to_string(),
                        value_type: value.type_tag().to_string(),
                        value: value.encode(),
                    }
                }));
                NodeElement {
                    properties,
                    state: BASE64.encode(node.processor().save_state()),
                    layout: layout_element(node.processor().bus_layout()),
                }
            })
            .collect();

        let connections = self.connections().iter().map(Into::into).collect();

        GraphDocument {
            kind: DOCUMENT_KIND.to_string(),
            nodes,
            connections,
        }
    }

    /// Replaces the graph's contents with a document's.
    ///
    /// Ignores documents with the wrong `kind` tag. The clear announcement
    /// fires synchronously; node and connection additions are queued until
    /// [`dispatch_pending_events`](Self::dispatch_pending_events). Nodes the
    /// document records but the factory cannot rebuild are skipped with a
    /// warning, as are connections left illegal by skipped or reshaped
    /// nodes.
    pub fn restore_from_document(&mut self, document: &GraphDocument) {
        if document.kind != DOCUMENT_KIND {
            warn!(kind = %document.kind, "ignoring document with unrecognized kind");
            return;
        }

        let connections: Vec<Connection> =
            document.connections.iter().map(Into::into).collect();

        self.clear();
        self.set_deferring(true);
        let mut on_window_requested = self.take_window_callback();

        for element in &document.nodes {
            let Some(id) = restored_node_id(element) else {
                warn!("skipping node element without a usable identity");
                continue;
            };
            let Some(factory_index) = restored_property(element, keys::FACTORY_ID)
                .and_then(|v| v.as_int())
                .and_then(|v| usize::try_from(v).ok())
            else {
                warn!(node = %id, "skipping node element without a factory index");
                continue;
            };
            let Some(mut processor) = self.factory().create(factory_index) else {
                warn!(node = %id, factory_index, "factory cannot rebuild node, skipping");
                continue;
            };

            processor.enable_all_buses();
            let layout = buses_layout(&element.layout);
            if !processor.set_bus_layout(layout) {
                warn!(node = %id, "unit rejected its recorded bus layout");
            }
            match BASE64.decode(&element.state) {
                Ok(state) => processor.load_state(&state),
                Err(_) => warn!(node = %id, "discarding undecodable state blob"),
            }

            let Some(node) = self.insert_restored_node(id, processor) else {
                warn!(node = %id, "duplicate node identity in document, skipping");
                continue;
            };
            for property in &element.properties {
                if property.name == keys::NODE_ID {
                    continue;
                }
                match PropertyValue::decode(&property.value_type, &property.value) {
                    Some(value) => node.properties_mut().set(property.name.as_str(), value),
                    None => warn!(
                        name = %property.name,
                        value_type = %property.value_type,
                        "discarding undecodable property"
                    ),
                }
            }

            if let Some(instance) = node
                .properties()
                .get(keys::INSTANCE_ID)
                .and_then(PropertyValue::as_int)
            {
                self.note_restored_instance(factory_index, instance);
            }

            if let Some(callback) = on_window_requested.as_mut() {
                for kind in WindowKind::ALL {
                    let open = self
                        .get_node(id)
                        .and_then(|n| n.properties().get(&kind.open_prop()))
                        .and_then(PropertyValue::as_bool)
                        .unwrap_or(false);
                    if open && !callback(id, kind) {
                        debug!(node = %id, ?kind, "window request declined");
                    }
                }
            }

            self.emit(GraphEvent::NodeAdded(id));
        }

        for connection in connections {
            self.add_connection(connection);
        }
        let pruned = self.prune_illegal_connections();
        if pruned > 0 {
            warn!(pruned, "dropped illegal connections during restore");
            self.drop_pending_connection_events_not_in_graph();
        }

        self.put_window_callback(on_window_requested);
        self.set_deferring(false);
        debug!(
            nodes = self.node_count(),
            connections = self.connection_count(),
            "graph restored"
        );
    }

    /// Serializes the graph and writes it to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), DocumentError> {
        self.to_document().save(path)
    }

    /// Loads a document file and restores the graph from it.
    pub fn restore_from_file(&mut self, path: &Path) -> Result<(), DocumentError> {
        let document = GraphDocument::load(path)?;
        self.restore_from_document(&document);
        Ok(())
    }
}

fn restored_property(element: &NodeElement, name: &str) -> Option<PropertyValue> {
    element
        .properties
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| PropertyValue::decode(&p.value_type, &p.value))
}

fn restored_node_id(element: &NodeElement) -> Option<NodeId> {
    restored_property(element, keys::NODE_ID)
        .and_then(|v| v.as_int())
        .and_then(|v| u32::try_from(v).ok())
        .map(NodeId::new)
}
