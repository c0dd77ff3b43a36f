//! Processor graph model - topology, change notification, and persistence.
//!
//! This crate is the model layer of a patch editor: it owns a directed graph
//! of processing units ([`ProcessorGraph`]), notifies [`GraphListener`]s of
//! every structural change, and round-trips the whole graph through a JSON
//! document format ([`GraphDocument`]). Units are created by index through a
//! [`ModuleFactory`](patchbay_registry::ModuleFactory), and each node
//! carries a typed [`Properties`] bag for position and UI metadata.
//!
//! Rendering and signal processing live elsewhere; this crate only manages
//! structure and state.
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::{BusesLayout, Processor};
//! use patchbay_graph::{Connection, ProcessorGraph};
//! use patchbay_registry::ModuleFactory;
//!
//! struct Passthrough {
//!     layout: BusesLayout,
//! }
//!
//! impl Processor for Passthrough {
//!     fn name(&self) -> &str {
//!         "Passthrough"
//!     }
//!     fn bus_layout(&self) -> &BusesLayout {
//!         &self.layout
//!     }
//!     fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
//!         self.layout = layout;
//!         true
//!     }
//! }
//!
//! let factory = ModuleFactory::from_list(vec![Box::new(|| {
//!     Box::new(Passthrough { layout: BusesLayout::stereo_io() }) as _
//! })]);
//!
//! let mut graph = ProcessorGraph::new(factory);
//! let a = graph.create_module(0, 0.2, 0.4).unwrap();
//! let b = graph.create_module(0, 0.8, 0.4).unwrap();
//! graph.add_connection(Connection::new(a, 0, b, 0));
//!
//! let document = graph.to_document();
//! let mut reloaded = graph;
//! reloaded.restore_from_document(&document);
//! reloaded.dispatch_pending_events();
//! assert_eq!(reloaded.connection_count(), 1);
//! ```

pub mod connection;
pub mod document;
pub mod graph;
pub mod listener;
pub mod node;
pub mod property;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use connection::{Connection, Endpoint};
pub use document::{
    BusElement, ConnectionElement, DOCUMENT_KIND, DocumentError, GraphDocument, LayoutElement,
    NodeElement, PropertyElement,
};
pub use graph::{ProcessorGraph, WindowRequestCallback};
pub use listener::GraphListener;
pub use node::{Node, NodeId};
pub use property::{Properties, PropertyValue, keys};
pub use window::WindowKind;
