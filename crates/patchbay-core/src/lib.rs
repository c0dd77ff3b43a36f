//! Patchbay Core - the processing-unit abstraction for the patchbay graph
//!
//! This crate defines what a processing unit *is* from the graph's point of
//! view. It carries no signal-processing code: the graph layer only needs to
//! know a unit's identity, bus configuration, opaque state, and UI
//! capabilities in order to own it, wire it, and persist it.
//!
//! # Core Abstractions
//!
//! - [`Processor`] - Object-safe trait every hosted unit implements
//! - [`BusesLayout`] / [`ChannelLayout`] - Channel configuration of a unit's
//!   input and output buses, with the abbreviated string encoding used by the
//!   document format
//! - [`ParamDescriptor`] - Metadata for one automatable parameter
//! - [`ParamListener`] / [`ParamNotifier`] - Ordered parameter change
//!   notification, the seam consumed by debug-log views
//! - [`NativeEditor`] - A unit's own editor UI, produced on demand
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::{BusesLayout, Processor};
//!
//! struct Passthrough {
//!     layout: BusesLayout,
//! }
//!
//! impl Processor for Passthrough {
//!     fn name(&self) -> &str {
//!         "Passthrough"
//!     }
//!
//!     fn bus_layout(&self) -> &BusesLayout {
//!         &self.layout
//!     }
//!
//!     fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
//!         self.layout = layout;
//!         true
//!     }
//! }
//! ```

pub mod bus;
pub mod param;
pub mod processor;

pub use bus::{BusesLayout, ChannelLayout, MIDI_CHANNEL_INDEX};
pub use param::{ParamDescriptor, ParamListener, ParamNotifier};
pub use processor::{NativeEditor, Processor};
