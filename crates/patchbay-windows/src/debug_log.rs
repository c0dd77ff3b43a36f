//! Parameter change debug log view.
//!
//! Parameter notifications can arrive on an audio thread, so the view splits
//! in two: a [`ParamListener`] sink that only appends formatted lines to a
//! mutex-guarded pending queue, and the view proper that drains the queue
//! into its bounded log on the UI thread. Attach and detach are symmetric,
//! so closing the window leaves no listener behind on the unit.

use std::sync::{Arc, Mutex};

use patchbay_core::{ParamListener, Processor};

/// Entries kept after a trim.
pub const MAX_LOG_SIZE: usize = 300;

/// Log length that triggers a trim back down to [`MAX_LOG_SIZE`].
pub const TRIM_THRESHOLD: usize = 400;

/// The audio-thread half: formats notifications and queues them.
struct DebugLogSink {
    pending: Mutex<Vec<String>>,
}

impl ParamListener for DebugLogSink {
    fn parameter_value_changed(&self, index: usize, value: f32) {
        self.pending
            .lock()
            .unwrap()
            .push(format!("param #{index} value {value:.4}"));
    }

    fn parameter_gesture_changed(&self, index: usize, gesture_is_starting: bool) {
        let phase = if gesture_is_starting { "began" } else { "ended" };
        self.pending
            .lock()
            .unwrap()
            .push(format!("param #{index} gesture {phase}"));
    }
}

/// Bounded log of a unit's parameter activity.
pub struct DebugLogView {
    sink: Arc<DebugLogSink>,
    entries: Vec<String>,
}

impl Default for DebugLogView {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugLogView {
    /// Creates an empty, unattached log.
    pub fn new() -> Self {
        Self {
            sink: Arc::new(DebugLogSink {
                pending: Mutex::new(Vec::new()),
            }),
            entries: Vec::new(),
        }
    }

    /// Registers the log's sink as a parameter listener on the unit.
    pub fn attach(&self, processor: &mut (dyn Processor + Send)) {
        processor.add_param_listener(self.sink.clone());
    }

    /// Removes the log's sink from the unit.
    pub fn detach(&self, processor: &mut (dyn Processor + Send)) {
        let listener: Arc<dyn ParamListener> = self.sink.clone();
        processor.remove_param_listener(&listener);
    }

    /// Whether notifications are queued and waiting for a drain.
    pub fn has_pending(&self) -> bool {
        !self.sink.pending.lock().unwrap().is_empty()
    }

    /// Moves queued notifications into the log, trimming when the log grows
    /// past [`TRIM_THRESHOLD`].
    pub fn drain_pending(&mut self) {
        let drained = std::mem::take(&mut *self.sink.pending.lock().unwrap());
        self.entries.extend(drained);
        if self.entries.len() > TRIM_THRESHOLD {
            let excess = self.entries.len() - MAX_LOG_SIZE;
            self.entries.drain(..excess);
        }
    }

    /// Appends a line directly, e.g. a host-side status message. Subject to
    /// the same trim bound as drained notifications.
    pub fn push_entry(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
        if self.entries.len() > TRIM_THRESHOLD {
            let excess = self.entries.len() - MAX_LOG_SIZE;
            self.entries.drain(..excess);
        }
    }

    /// The log, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::{BusesLayout, ParamNotifier};

    struct Noisy {
        layout: BusesLayout,
        notifier: ParamNotifier,
    }

    impl Noisy {
        fn new() -> Self {
            Self {
                layout: BusesLayout::stereo_io(),
                notifier: ParamNotifier::new(),
            }
        }
    }

    impl Processor for Noisy {
        fn name(&self) -> &str {
            "Noisy"
        }
        fn bus_layout(&self) -> &BusesLayout {
            &self.layout
        }
        fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
            self.layout = layout;
            true
        }
        fn add_param_listener(&mut self, listener: Arc<dyn ParamListener>) {
            self.notifier.add(listener);
        }
        fn remove_param_listener(&mut self, listener: &Arc<dyn ParamListener>) {
            self.notifier.remove(listener);
        }
    }

    #[test]
    fn notifications_queue_until_drained() {
        let mut unit = Noisy::new();
        let mut log = DebugLogView::new();
        log.attach(&mut unit);

        unit.notifier.notify_value_changed(0, 0.25);
        unit.notifier.notify_gesture_changed(1, true);
        assert!(log.has_pending());
        assert!(log.entries().is_empty());

        log.drain_pending();
        assert_eq!(
            log.entries(),
            ["param #0 value 0.2500", "param #1 gesture began"]
        );
        assert!(!log.has_pending());
    }

    #[test]
    fn detach_stops_the_flow() {
        let mut unit = Noisy::new();
        let mut log = DebugLogView::new();
        log.attach(&mut unit);
        log.detach(&mut unit);

        unit.notifier.notify_value_changed(0, 1.0);
        log.drain_pending();
        assert!(log.entries().is_empty());
        assert!(unit.notifier.is_empty());
    }

    #[test]
    fn log_trims_past_the_threshold() {
        let mut unit = Noisy::new();
        let mut log = DebugLogView::new();
        log.attach(&mut unit);

        for i in 0..TRIM_THRESHOLD {
            unit.notifier.notify_value_changed(i, 0.0);
        }
        log.drain_pending();
        assert_eq!(log.entries().len(), TRIM_THRESHOLD);

        // One more pushes past the threshold and trims back down.
        unit.notifier.notify_value_changed(0, 1.0);
        log.drain_pending();
        assert_eq!(log.entries().len(), MAX_LOG_SIZE);

        // Oldest entries went first; the newest line survived.
        assert_eq!(log.entries().last().unwrap(), "param #0 value 1.0000");
    }

    #[test]
    fn direct_entries_share_the_bound() {
        let mut log = DebugLogView::new();
        for i in 0..=TRIM_THRESHOLD {
            log.push_entry(format!("line {i}"));
        }
        assert_eq!(log.entries().len(), MAX_LOG_SIZE);
        assert_eq!(log.entries().last().unwrap(), &format!("line {TRIM_THRESHOLD}"));
    }
}
