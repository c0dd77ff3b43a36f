//! Per-node editor windows for the patchbay graph.
//!
//! A node can have up to four auxiliary windows open at once, one per
//! [`WindowKind`](patchbay_graph::WindowKind): the unit's native editor, a
//! generic parameter list, a program list, and a parameter-change debug log.
//! [`WindowHost`] owns the windows, keys them by `(node, kind)`, and
//! persists open flags and screen positions into node properties so a saved
//! graph document brings its windows back.
//!
//! This crate is still a model layer: a window is a surface plus placement,
//! and the actual pixels belong to whichever view toolkit the application
//! uses.
//!
//! # Modules
//!
//! - [`host`] — [`WindowHost`]: open/close lifecycle, placement, graph wiring
//! - [`window`] — [`ModuleWindow`]: one open window
//! - [`surface`] — [`EditorSurface`]: window content with Normal→Generic fallback
//! - [`generic`] — auto-generated parameter list view
//! - [`programs`] — program list view
//! - [`debug_log`] — bounded parameter-change log

pub mod debug_log;
pub mod generic;
pub mod host;
pub mod programs;
pub mod surface;
pub mod window;

pub use debug_log::{DebugLogView, MAX_LOG_SIZE, TRIM_THRESHOLD};
pub use generic::{GenericParamsView, ParamRow};
pub use host::{DEFAULT_PLACEMENT_RANGE, WindowHost};
pub use programs::ProgramListView;
pub use surface::EditorSurface;
pub use window::ModuleWindow;
