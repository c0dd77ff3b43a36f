//! One open module window.

use patchbay_graph::{NodeId, ProcessorGraph, WindowKind};

use crate::debug_log::DebugLogView;
use crate::surface::EditorSurface;

/// An open window over one node: the surface plus screen placement.
///
/// Placement is persisted into the node's property bag on every move, under
/// keys scoped to the window kind, so each of a node's windows remembers its
/// own spot across sessions.
pub struct ModuleWindow {
    node: NodeId,
    kind: WindowKind,
    title: String,
    x: i64,
    y: i64,
    surface: EditorSurface,
}

impl ModuleWindow {
    pub(crate) fn new(
        node: NodeId,
        kind: WindowKind,
        title: String,
        x: i64,
        y: i64,
        surface: EditorSurface,
    ) -> Self {
        Self {
            node,
            kind,
            title,
            x,
            y,
            surface,
        }
    }

    /// The node this window belongs to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The window's kind.
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current screen position.
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// The window's content.
    pub fn surface(&self) -> &EditorSurface {
        &self.surface
    }

    /// Mutable access to the window's content.
    pub fn surface_mut(&mut self) -> &mut EditorSurface {
        &mut self.surface
    }

    /// The debug log, when this is a debug window.
    pub fn debug_log(&self) -> Option<&DebugLogView> {
        match &self.surface {
            EditorSurface::DebugLog(log) => Some(log),
            _ => None,
        }
    }

    /// Mutable debug log access, e.g. to drain pending notifications.
    pub fn debug_log_mut(&mut self) -> Option<&mut DebugLogView> {
        match &mut self.surface {
            EditorSurface::DebugLog(log) => Some(log),
            _ => None,
        }
    }

    /// Records a move, persisting the new position into the node's
    /// properties so it survives a save/restore cycle.
    pub fn moved_to(&mut self, graph: &mut ProcessorGraph, x: i64, y: i64) {
        self.x = x;
        self.y = y;
        if let Some(node) = graph.get_node_mut(self.node) {
            node.properties_mut().set(self.kind.last_x_prop(), x);
            node.properties_mut().set(self.kind.last_y_prop(), y);
        }
    }
}
