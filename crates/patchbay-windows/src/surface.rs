//! Editor surface construction.

use patchbay_core::{NativeEditor, Processor};
use patchbay_graph::WindowKind;
use tracing::debug;

use crate::debug_log::DebugLogView;
use crate::generic::GenericParamsView;
use crate::programs::ProgramListView;

/// The content of one module window.
///
/// A window's kind stays fixed even when its content falls back: a `Normal`
/// window over a unit without a native editor holds a generic parameter
/// list, but persists under the `Normal` keys.
pub enum EditorSurface {
    /// The unit's own editor.
    Native(Box<dyn NativeEditor>),
    /// Auto-generated parameter list.
    Generic(GenericParamsView),
    /// Program list.
    Programs(ProgramListView),
    /// Parameter change log. Holds a listener registration on the unit;
    /// the host detaches it when the window closes.
    DebugLog(DebugLogView),
}

impl EditorSurface {
    /// Builds the surface for a window kind over a unit.
    ///
    /// Returns `None` when the unit forbids UI entirely. A `Normal` request
    /// falls back to the generic parameter list when the unit has no native
    /// editor or fails to create one.
    pub fn build(processor: &mut (dyn Processor + Send), kind: WindowKind) -> Option<Self> {
        if !processor.allows_ui() {
            return None;
        }
        let surface = match kind {
            WindowKind::Normal => match processor.create_editor() {
                Some(editor) => EditorSurface::Native(editor),
                None => {
                    debug!(unit = processor.name(), "no native editor, using generic");
                    EditorSurface::Generic(GenericParamsView::from_processor(processor))
                }
            },
            WindowKind::Generic => {
                EditorSurface::Generic(GenericParamsView::from_processor(processor))
            }
            WindowKind::Programs => {
                EditorSurface::Programs(ProgramListView::from_processor(processor))
            }
            WindowKind::Debug => {
                let log = DebugLogView::new();
                log.attach(processor);
                EditorSurface::DebugLog(log)
            }
        };
        Some(surface)
    }
}
