//! Integration tests for the patchbay-graph public API.
//!
//! Exercises whole-lifecycle flows through the exported surface only:
//! building a patch, persisting it to disk, reloading it into a fresh graph
//! with listeners attached, and editing across save generations.

use std::sync::{Arc, Mutex};

use patchbay_core::{BusesLayout, ChannelLayout, MIDI_CHANNEL_INDEX, Processor};
use patchbay_graph::{
    Connection, GraphDocument, GraphListener, NodeId, ProcessorGraph, PropertyValue, WindowKind,
    keys,
};
use patchbay_registry::ModuleFactory;

// ============================================================================
// Stub units
// ============================================================================

struct Unit {
    name: &'static str,
    layout: BusesLayout,
    state: Vec<u8>,
}

impl Unit {
    fn new(name: &'static str, inputs: u32, outputs: u32) -> Self {
        let side = |n: u32| {
            if n == 0 {
                Vec::new()
            } else {
                vec![ChannelLayout::with_channels(n)]
            }
        };
        Self {
            name,
            layout: BusesLayout::new(side(inputs), side(outputs)),
            state: Vec::new(),
        }
    }
}

impl Processor for Unit {
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
        true
    }

    fn produces_midi(&self) -> bool {
        true
    }

    fn save_state(&self) -> Vec<u8> {
        self.state.clone()
    }

    fn load_state(&mut self, state: &[u8]) {
        self.state = state.to_vec();
    }
}

const GENERATOR: usize = 0;
const FILTER: usize = 1;
const OUTPUT: usize = 2;

fn factory() -> ModuleFactory {
    ModuleFactory::from_list(vec![
        Box::new(|| Box::new(Unit::new("Generator", 0, 2)) as _),
        Box::new(|| Box::new(Unit::new("Filter", 2, 2)) as _),
        Box::new(|| Box::new(Unit::new("Output", 2, 0)) as _),
    ])
}

/// Counts callbacks without caring about their payloads.
#[derive(Default)]
struct Tally {
    nodes_added: Mutex<usize>,
    connections_added: Mutex<usize>,
    clears: Mutex<usize>,
}

impl GraphListener for Tally {
    fn node_added(&self, _id: NodeId) {
        *self.nodes_added.lock().unwrap() += 1;
    }

    fn connection_added(&self, _connection: &Connection) {
        *self.connections_added.lock().unwrap() += 1;
    }

    fn graph_about_to_be_cleared(&self) {
        *self.clears.lock().unwrap() += 1;
    }
}

/// Builds a generator -> filter -> output chain with a MIDI tap into the
/// filter and some unit state on the generator.
fn build_chain(graph: &mut ProcessorGraph) -> (NodeId, NodeId, NodeId) {
    let generator = graph.create_module(GENERATOR, 0.1, 0.5).unwrap();
    let filter = graph.create_module(FILTER, 0.5, 0.5).unwrap();
    let output = graph.create_module(OUTPUT, 0.9, 0.5).unwrap();

    for channel in 0..2 {
        assert!(graph.add_connection(Connection::new(generator, channel, filter, channel)));
        assert!(graph.add_connection(Connection::new(filter, channel, output, channel)));
    }
    assert!(graph.add_connection(Connection::new(
        generator,
        MIDI_CHANNEL_INDEX,
        filter,
        MIDI_CHANNEL_INDEX,
    )));

    graph
        .get_node_mut(generator)
        .unwrap()
        .processor_mut()
        .load_state(b"sawtooth @ 220Hz");

    (generator, filter, output)
}

// ============================================================================
// 1. Disk round trip with live listeners
// ============================================================================

#[test]
fn patch_survives_a_disk_round_trip() {
    let mut graph = ProcessorGraph::new(factory());
    let (generator, filter, output) = build_chain(&mut graph);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    graph.save_to_file(&path).unwrap();

    let mut reloaded = ProcessorGraph::new(factory());
    let tally = Arc::new(Tally::default());
    let listener: Arc<dyn GraphListener> = tally.clone();
    reloaded.add_listener(&listener);

    reloaded.restore_from_file(&path).unwrap();

    // Restoration announced the clear but held back the additions.
    assert_eq!(*tally.clears.lock().unwrap(), 1);
    assert_eq!(*tally.nodes_added.lock().unwrap(), 0);

    reloaded.dispatch_pending_events();
    assert_eq!(*tally.nodes_added.lock().unwrap(), 3);
    assert_eq!(*tally.connections_added.lock().unwrap(), 5);

    assert_eq!(reloaded.node_ids(), vec![generator, filter, output]);
    assert_eq!(reloaded.connection_count(), 5);
    assert_eq!(
        reloaded.get_node(generator).unwrap().processor().save_state(),
        b"sawtooth @ 220Hz"
    );
    assert_eq!(reloaded.node_position(output), (0.9, 0.5));
}

// ============================================================================
// 2. Editing across save generations
// ============================================================================

#[test]
fn editing_after_restore_behaves_like_a_fresh_graph() {
    let mut graph = ProcessorGraph::new(factory());
    let (generator, filter, output) = build_chain(&mut graph);
    let first_save = graph.to_document();

    let mut session = ProcessorGraph::new(factory());
    session.restore_from_document(&first_save);
    session.dispatch_pending_events();

    // Swap the filter for a second generator feeding the output directly.
    assert!(session.remove_node(filter));
    let second_generator = session.create_module(GENERATOR, 0.5, 0.2).unwrap();
    assert!(second_generator.index() > output.index());
    assert!(session.add_connection(Connection::new(second_generator, 0, output, 0)));

    let second_save = session.to_document();
    let mut final_graph = ProcessorGraph::new(factory());
    final_graph.restore_from_document(&second_save);

    assert_eq!(
        final_graph.node_ids(),
        vec![generator, output, second_generator]
    );
    assert_eq!(final_graph.connection_count(), 1);

    // The second generator carries instance id 1: the counter survived the
    // intermediate restore.
    assert_eq!(
        final_graph
            .get_node(second_generator)
            .unwrap()
            .properties()
            .get(keys::INSTANCE_ID)
            .and_then(PropertyValue::as_int),
        Some(1)
    );
}

// ============================================================================
// 3. Window metadata round trip
// ============================================================================

#[test]
fn window_metadata_round_trips_and_requests_reopen() {
    let mut graph = ProcessorGraph::new(factory());
    let (generator, ..) = build_chain(&mut graph);

    let props = graph.get_node_mut(generator).unwrap().properties_mut();
    props.set(WindowKind::Generic.open_prop(), true);
    props.set(WindowKind::Generic.last_x_prop(), 120_i64);
    props.set(WindowKind::Generic.last_y_prop(), 80_i64);
    let doc = graph.to_document();

    let reopened = Arc::new(Mutex::new(Vec::new()));
    let seen = reopened.clone();
    let mut reloaded = ProcessorGraph::new(factory());
    reloaded.set_on_window_requested(Box::new(move |id, kind| {
        seen.lock().unwrap().push((id, kind));
        true
    }));
    reloaded.restore_from_document(&doc);

    assert_eq!(
        reopened.lock().unwrap().clone(),
        vec![(generator, WindowKind::Generic)]
    );
    let props = reloaded.get_node(generator).unwrap().properties();
    assert_eq!(
        props
            .get(&WindowKind::Generic.last_x_prop())
            .and_then(PropertyValue::as_int),
        Some(120)
    );
}

// ============================================================================
// 4. Malformed input
// ============================================================================

#[test]
fn malformed_json_is_an_error_not_a_panic() {
    assert!(GraphDocument::from_json_str("{ not json").is_err());
    assert!(GraphDocument::from_json_str(r#"{"kind": 3}"#).is_err());
}

#[test]
fn missing_file_reports_the_path() {
    let mut graph = ProcessorGraph::new(factory());
    let err = graph
        .restore_from_file(std::path::Path::new("/definitely/not/here.json"))
        .unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"));
    assert_eq!(graph.node_count(), 0);
}
