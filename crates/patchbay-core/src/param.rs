//! Parameter descriptors and change notification.
//!
//! Parameters are addressed by index, following the same convention as the
//! rest of the workspace: a unit reports `param_count()` parameters, each
//! described by a [`ParamDescriptor`], read and written through the index.
//!
//! Change notification is push-based: interested views register a
//! [`ParamListener`] with the unit, and the unit's [`ParamNotifier`] delivers
//! value and gesture changes to every listener in registration order.
//! Notifications may originate on an audio thread, so listeners are `Send +
//! Sync` and are expected to marshal onto the UI thread themselves (see the
//! debug-log view in patchbay-windows).

use std::sync::Arc;

/// Metadata for one automatable parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name.
    pub name: String,
    /// Abbreviated name for narrow UI contexts.
    pub short_name: String,
    /// Minimum plain value.
    pub min: f32,
    /// Maximum plain value.
    pub max: f32,
    /// Default plain value.
    pub default: f32,
    /// Display unit suffix, empty when unitless.
    pub unit: String,
}

impl ParamDescriptor {
    /// Creates a descriptor with an empty unit.
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            min,
            max,
            default,
            unit: String::new(),
        }
    }

    /// Sets the display unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Receives parameter change notifications from a processing unit.
///
/// Delivery order matches the order the unit raised the changes. Callbacks
/// may arrive on an audio thread; implementations must enqueue rather than
/// touch UI state directly.
pub trait ParamListener: Send + Sync {
    /// A parameter's value changed.
    fn parameter_value_changed(&self, index: usize, value: f32);

    /// A parameter gesture (e.g. a knob grab) started or ended.
    fn parameter_gesture_changed(&self, index: usize, gesture_is_starting: bool);
}

/// Ordered list of parameter listeners.
///
/// Units that expose parameters embed one of these and forward their change
/// events through it. Registration is idempotent (adding the same listener
/// twice keeps one entry) and removal of an unregistered listener is a no-op,
/// so listener lifetime management around a unit's construction and teardown
/// stays symmetric.
#[derive(Default)]
pub struct ParamNotifier {
    listeners: Vec<Arc<dyn ParamListener>>,
}

impl ParamNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Re-adding an already registered listener does
    /// not duplicate it.
    pub fn add(&mut self, listener: Arc<dyn ParamListener>) {
        if !self.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    /// Removes a previously registered listener, if present.
    pub fn remove(&mut self, listener: &Arc<dyn ParamListener>) {
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notifies every listener of a value change, in registration order.
    pub fn notify_value_changed(&self, index: usize, value: f32) {
        for listener in &self.listeners {
            listener.parameter_value_changed(index, value);
        }
    }

    /// Notifies every listener of a gesture change, in registration order.
    pub fn notify_gesture_changed(&self, index: usize, gesture_is_starting: bool) {
        for listener in &self.listeners {
            listener.parameter_gesture_changed(index, gesture_is_starting);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(usize, f32)>>,
    }

    impl ParamListener for Recorder {
        fn parameter_value_changed(&self, index: usize, value: f32) {
            self.events.lock().unwrap().push((index, value));
        }

        fn parameter_gesture_changed(&self, _index: usize, _gesture_is_starting: bool) {}
    }

    #[test]
    fn notifies_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));

        struct Tagged(u8, Arc<Mutex<Vec<u8>>>);
        impl ParamListener for Tagged {
            fn parameter_value_changed(&self, _: usize, _: f32) {
                self.1.lock().unwrap().push(self.0);
            }
            fn parameter_gesture_changed(&self, _: usize, _: bool) {}
        }

        let mut notifier = ParamNotifier::new();
        notifier.add(Arc::new(Tagged(1, Arc::clone(&order))));
        notifier.add(Arc::new(Tagged(2, Arc::clone(&order))));
        notifier.notify_value_changed(0, 0.5);

        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn add_is_idempotent() {
        let listener: Arc<dyn ParamListener> = Arc::new(Recorder::default());
        let mut notifier = ParamNotifier::new();
        notifier.add(Arc::clone(&listener));
        notifier.add(Arc::clone(&listener));
        assert_eq!(notifier.len(), 1);

        notifier.notify_value_changed(3, 1.0);
        notifier.remove(&listener);
        assert!(notifier.is_empty());
    }

    #[test]
    fn remove_unregistered_is_noop() {
        let listener: Arc<dyn ParamListener> = Arc::new(Recorder::default());
        let mut notifier = ParamNotifier::new();
        notifier.remove(&listener);
        assert!(notifier.is_empty());
    }
}
