//! Shared stubs for the crate's unit tests.

use std::sync::{Arc, Mutex};

use patchbay_core::{BusesLayout, ChannelLayout, Processor};
use patchbay_registry::ModuleFactory;

use crate::connection::Connection;
use crate::graph::ProcessorGraph;
use crate::listener::GraphListener;
use crate::node::NodeId;

/// Factory index of the two-output, zero-input stub.
pub(crate) const SOURCE: usize = 0;
/// Factory index of the zero-output, two-input stub.
pub(crate) const SINK: usize = 1;
/// Factory index of the stereo-in, stereo-out stub.
pub(crate) const DUO: usize = 2;
/// Factory index of the stereo stub without MIDI capability.
pub(crate) const PLAIN: usize = 3;

pub(crate) struct TestUnit {
    name: &'static str,
    layout: BusesLayout,
    midi: bool,
    pub(crate) state: Vec<u8>,
}

impl TestUnit {
    fn new(name: &'static str, inputs: u32, outputs: u32) -> Self {
        let bus = |channels: u32| {
            if channels == 0 {
                Vec::new()
            } else {
                vec![ChannelLayout::with_channels(channels)]
            }
        };
        Self {
            name,
            layout: BusesLayout::new(bus(inputs), bus(outputs)),
            midi: true,
            state: Vec::new(),
        }
    }

    fn without_midi(mut self) -> Self {
        self.midi = false;
        self
    }
}

impl Processor for TestUnit {
    fn name(&self) -> &str {
        self.name
    }

    fn bus_layout(&self) -> &BusesLayout {
        &self.layout
    }

    fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
        self.layout = layout;
        true
    }

    fn accepts_midi(&self) -> bool {
        self.midi
    }

    fn produces_midi(&self) -> bool {
        self.midi
    }

    fn save_state(&self) -> Vec<u8> {
        self.state.clone()
    }

    fn load_state(&mut self, state: &[u8]) {
        self.state = state.to_vec();
    }
}

/// Four stubs: a source (outputs only), a sink (inputs only), a stereo
/// pass-through, and a stereo pass-through without MIDI capability.
pub(crate) fn test_factory() -> ModuleFactory {
    ModuleFactory::from_list(vec![
        Box::new(|| Box::new(TestUnit::new("Source", 0, 2)) as _),
        Box::new(|| Box::new(TestUnit::new("Sink", 2, 0)) as _),
        Box::new(|| Box::new(TestUnit::new("Duo", 2, 2)) as _),
        Box::new(|| Box::new(TestUnit::new("Plain", 2, 2).without_midi()) as _),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RecordedEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    ConnectionAdded(Connection),
    ConnectionRemoved(Connection),
    AboutToClear,
}

/// Listener that records every callback in order.
#[derive(Default)]
pub(crate) struct Recorder {
    events: Mutex<Vec<RecordedEvent>>,
}

impl Recorder {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a recorder and registers it with the graph. The returned
    /// `Arc` keeps the registration alive.
    pub(crate) fn install(graph: &mut ProcessorGraph) -> Arc<Self> {
        let recorder = Self::new();
        let as_listener: Arc<dyn GraphListener> = recorder.clone();
        graph.add_listener(&as_listener);
        recorder
    }

    pub(crate) fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: RecordedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl GraphListener for Recorder {
    fn node_added(&self, id: NodeId) {
        self.push(RecordedEvent::NodeAdded(id));
    }

    fn node_removed(&self, id: NodeId) {
        self.push(RecordedEvent::NodeRemoved(id));
    }

    fn connection_added(&self, connection: &Connection) {
        self.push(RecordedEvent::ConnectionAdded(*connection));
    }

    fn connection_removed(&self, connection: &Connection) {
        self.push(RecordedEvent::ConnectionRemoved(*connection));
    }

    fn graph_about_to_be_cleared(&self) {
        self.push(RecordedEvent::AboutToClear);
    }
}
