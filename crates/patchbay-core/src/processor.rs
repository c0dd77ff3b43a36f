//! Core Processor trait.
//!
//! [`Processor`] is what the graph model hosts: an opaque processing unit
//! with a name, a bus configuration, an optional serializable state blob, and
//! optional UI capabilities. The trait is object-safe — the graph owns units
//! as `Box<dyn Processor + Send>` — and almost everything is defaulted so a
//! minimal unit only has to provide its name and bus layout.
//!
//! ## Design Decisions
//!
//! - **No audio path**: the graph layer manages topology and persistence
//!   only. Signal rendering lives with the host, outside this workspace.
//!
//! - **Defaulted capabilities**: MIDI flags, state, bypass, programs,
//!   parameters, and editors all default to "none", matching units that are
//!   pure pass-throughs in every dimension but their name.

use std::sync::Arc;

use crate::bus::BusesLayout;
use crate::param::{ParamDescriptor, ParamListener};

/// A unit's own editor UI, created on demand by [`Processor::create_editor`].
///
/// This is a view object handed back to the window host; the host tracks it,
/// the view layer renders it. Units without a native editor never produce
/// one and fall back to the generic parameter list.
pub trait NativeEditor {
    /// Window title for the editor.
    fn title(&self) -> &str;

    /// Preferred content size in pixels.
    fn size(&self) -> (u32, u32) {
        (400, 300)
    }

    /// Whether the editor supports live resizing.
    fn resizable(&self) -> bool {
        false
    }
}

/// A processing unit hosted by the graph.
///
/// # Example
///
/// ```rust
/// use patchbay_core::{BusesLayout, Processor};
///
/// struct Tone {
///     layout: BusesLayout,
///     freq: f32,
/// }
///
/// impl Processor for Tone {
///     fn name(&self) -> &str {
///         "Tone"
///     }
///
///     fn bus_layout(&self) -> &BusesLayout {
///         &self.layout
///     }
///
///     fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
///         self.layout = layout;
///         true
///     }
///
///     fn save_state(&self) -> Vec<u8> {
///         self.freq.to_le_bytes().to_vec()
///     }
///
///     fn load_state(&mut self, state: &[u8]) {
///         if let Ok(bytes) = <[u8; 4]>::try_from(state) {
///             self.freq = f32::from_le_bytes(bytes);
///         }
///     }
/// }
/// ```
pub trait Processor: Send {
    /// Display name of the unit.
    fn name(&self) -> &str;

    /// Current bus configuration.
    fn bus_layout(&self) -> &BusesLayout;

    /// Applies a bus configuration. Returns `false` if the unit rejects it,
    /// in which case the previous layout stays in effect.
    fn set_bus_layout(&mut self, layout: BusesLayout) -> bool;

    /// Enables every bus the unit can offer. Called once when a unit enters
    /// the graph; the default accepts the current layout as-is.
    fn enable_all_buses(&mut self) {}

    /// Whether the unit consumes MIDI events.
    fn accepts_midi(&self) -> bool {
        false
    }

    /// Whether the unit produces MIDI events.
    fn produces_midi(&self) -> bool {
        false
    }

    /// Serializes the unit's internal state into an opaque blob.
    fn save_state(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Restores internal state from a blob previously produced by
    /// [`save_state`](Self::save_state). Unrecognized blobs are ignored.
    fn load_state(&mut self, _state: &[u8]) {}

    /// Whether the unit is currently bypassed.
    fn bypassed(&self) -> bool {
        false
    }

    /// Sets the bypass flag, if the unit supports one.
    fn set_bypassed(&mut self, _bypassed: bool) {}

    /// Whether the unit permits any editor UI at all. When `false`, the
    /// window host will not open any window for this unit.
    fn allows_ui(&self) -> bool {
        true
    }

    /// Whether the unit provides its own editor UI.
    fn has_editor(&self) -> bool {
        false
    }

    /// Creates the unit's native editor. Returns `None` when
    /// [`has_editor`](Self::has_editor) is `false` or creation fails.
    fn create_editor(&mut self) -> Option<Box<dyn NativeEditor>> {
        None
    }

    /// Number of stored programs (presets).
    fn program_count(&self) -> usize {
        0
    }

    /// Display name of a program, `None` when out of range.
    fn program_name(&self, _index: usize) -> Option<String> {
        None
    }

    /// Index of the active program.
    fn current_program(&self) -> usize {
        0
    }

    /// Switches the active program. Out-of-range indices are ignored.
    fn set_current_program(&mut self, _index: usize) {}

    /// Number of automatable parameters.
    fn param_count(&self) -> usize {
        0
    }

    /// Descriptor for a parameter, `None` when out of range.
    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }

    /// Current plain value of a parameter.
    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }

    /// Sets a parameter's plain value.
    fn set_param(&mut self, _index: usize, _value: f32) {}

    /// Registers a parameter listener. Units without parameters may keep the
    /// default no-op.
    fn add_param_listener(&mut self, _listener: Arc<dyn ParamListener>) {}

    /// Removes a previously registered parameter listener.
    fn remove_param_listener(&mut self, _listener: &Arc<dyn ParamListener>) {}
}
