//! The window host - one window per (node, kind), placement, persistence.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use patchbay_graph::{
    GraphListener, NodeId, ProcessorGraph, PropertyValue, WindowKind,
};
use rand::Rng as _;
use tracing::debug;

use crate::surface::EditorSurface;
use crate::window::ModuleWindow;

/// Upper bound (exclusive) for each axis of a fresh window's random default
/// placement.
pub const DEFAULT_PLACEMENT_RANGE: i64 = 500;

/// Owns every open [`ModuleWindow`].
///
/// At most one window exists per `(node, kind)` pair; opening an existing
/// pair is a no-op that reports success. Opening marks the kind's open flag
/// in the node's properties and closing clears it, so which windows were up
/// rides along with the graph document.
///
/// # Example
///
/// ```rust,no_run
/// # use std::{cell::RefCell, rc::Rc};
/// # use patchbay_graph::{ProcessorGraph, WindowKind};
/// # use patchbay_registry::ModuleFactory;
/// # use patchbay_windows::WindowHost;
/// # let mut graph = ProcessorGraph::new(ModuleFactory::from_list(vec![]));
/// let host = Rc::new(RefCell::new(WindowHost::new()));
/// WindowHost::install(&host, &mut graph);
///
/// // ... restore a document into the graph ...
///
/// host.borrow_mut().open_requested(&mut graph);
/// ```
#[derive(Default)]
pub struct WindowHost {
    windows: Vec<ModuleWindow>,
    requested: Vec<(NodeId, WindowKind)>,
    cleanup: Option<Arc<HostCleanup>>,
}

/// Graph listener that drops windows whose nodes leave the graph.
struct HostCleanup {
    host: Weak<RefCell<WindowHost>>,
}

impl GraphListener for HostCleanup {
    fn node_removed(&self, id: NodeId) {
        if let Some(host) = self.host.upgrade() {
            host.borrow_mut().discard_windows_for(id);
        }
    }

    fn graph_about_to_be_cleared(&self) {
        if let Some(host) = self.host.upgrade() {
            host.borrow_mut().discard_all();
        }
    }
}

impl WindowHost {
    /// Creates a host with no open windows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires a shared host into a graph: restore-time window requests queue
    /// up for [`open_requested`](Self::open_requested), and node removal or
    /// a graph clear drops the affected windows.
    pub fn install(host: &Rc<RefCell<Self>>, graph: &mut ProcessorGraph) {
        let for_requests = Rc::downgrade(host);
        graph.set_on_window_requested(Box::new(move |node, kind| {
            for_requests.upgrade().is_some_and(|host| {
                host.borrow_mut().requested.push((node, kind));
                true
            })
        }));

        let cleanup = Arc::new(HostCleanup {
            host: Rc::downgrade(host),
        });
        let as_listener: Arc<dyn GraphListener> = cleanup.clone();
        graph.add_listener(&as_listener);
        host.borrow_mut().cleanup = Some(cleanup);
    }

    /// Opens (or finds) the window for a `(node, kind)` pair.
    ///
    /// Fresh windows appear at the position persisted in the node's
    /// properties, or at a random spot within
    /// [`DEFAULT_PLACEMENT_RANGE`] on both axes when none is stored.
    /// Returns `false` when the node is absent or its unit forbids UI.
    pub fn open(&mut self, graph: &mut ProcessorGraph, node: NodeId, kind: WindowKind) -> bool {
        if self.is_open(node, kind) {
            return true;
        }
        let Some(node_ref) = graph.get_node_mut(node) else {
            return false;
        };

        let name = node_ref.processor().name().to_string();
        let title = match kind {
            WindowKind::Normal => name,
            other => format!("{name} ({})", other.type_name()),
        };

        let Some(surface) = EditorSurface::build(node_ref.processor_mut(), kind) else {
            debug!(%node, ?kind, "unit forbids ui, not opening");
            return false;
        };

        let stored = |key: String| {
            node_ref
                .properties()
                .get(&key)
                .and_then(PropertyValue::as_int)
        };
        let mut rng = rand::rng();
        let x = stored(kind.last_x_prop())
            .unwrap_or_else(|| rng.random_range(0..DEFAULT_PLACEMENT_RANGE));
        let y = stored(kind.last_y_prop())
            .unwrap_or_else(|| rng.random_range(0..DEFAULT_PLACEMENT_RANGE));

        node_ref.properties_mut().set(kind.open_prop(), true);
        self.windows
            .push(ModuleWindow::new(node, kind, title, x, y, surface));
        debug!(%node, ?kind, x, y, "window opened");
        true
    }

    /// Closes a window, clearing its open flag and detaching any debug-log
    /// listener from the unit. Returns `false` when no such window is open.
    pub fn close(&mut self, graph: &mut ProcessorGraph, node: NodeId, kind: WindowKind) -> bool {
        let Some(index) = self.position(node, kind) else {
            return false;
        };
        let window = self.windows.remove(index);
        if let Some(node_ref) = graph.get_node_mut(node) {
            if let EditorSurface::DebugLog(log) = window.surface() {
                log.detach(node_ref.processor_mut());
            }
            node_ref.properties_mut().set(kind.open_prop(), false);
        }
        debug!(%node, ?kind, "window closed");
        true
    }

    /// Closes every window belonging to a node.
    pub fn close_windows_for(&mut self, graph: &mut ProcessorGraph, node: NodeId) {
        for kind in WindowKind::ALL {
            self.close(graph, node, kind);
        }
    }

    /// Closes every open window. Returns whether any window was closed.
    pub fn close_all(&mut self, graph: &mut ProcessorGraph) -> bool {
        let open: Vec<(NodeId, WindowKind)> =
            self.windows.iter().map(|w| (w.node(), w.kind())).collect();
        let any = !open.is_empty();
        for (node, kind) in open {
            self.close(graph, node, kind);
        }
        any
    }

    /// Opens every window queued by restore-time requests, in request order.
    pub fn open_requested(&mut self, graph: &mut ProcessorGraph) {
        let requested = std::mem::take(&mut self.requested);
        for (node, kind) in requested {
            self.open(graph, node, kind);
        }
    }

    /// Whether a window is open for the pair.
    pub fn is_open(&self, node: NodeId, kind: WindowKind) -> bool {
        self.position(node, kind).is_some()
    }

    /// The open window for a pair, if any.
    pub fn window(&self, node: NodeId, kind: WindowKind) -> Option<&ModuleWindow> {
        self.position(node, kind).map(|i| &self.windows[i])
    }

    /// Mutable access to the open window for a pair.
    pub fn window_mut(&mut self, node: NodeId, kind: WindowKind) -> Option<&mut ModuleWindow> {
        self.position(node, kind).map(|i| &mut self.windows[i])
    }

    /// Every open window.
    pub fn windows(&self) -> &[ModuleWindow] {
        &self.windows
    }

    /// Number of open windows.
    pub fn open_count(&self) -> usize {
        self.windows.len()
    }

    /// Drops a node's windows without touching the graph; used when the
    /// node is already gone.
    fn discard_windows_for(&mut self, node: NodeId) {
        self.windows.retain(|w| w.node() != node);
    }

    /// Drops every window without touching the graph.
    fn discard_all(&mut self) {
        self.windows.clear();
    }

    fn position(&self, node: NodeId, kind: WindowKind) -> Option<usize> {
        self.windows
            .iter()
            .position(|w| w.node() == node && w.kind() == kind)
    }
}
