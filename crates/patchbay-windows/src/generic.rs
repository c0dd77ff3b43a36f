//! Auto-generated parameter list view.

use patchbay_core::{ParamDescriptor, Processor};

/// One row of the generic editor: a parameter and its last-read value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRow {
    /// Parameter metadata.
    pub descriptor: ParamDescriptor,
    /// Plain value at the last refresh.
    pub value: f32,
}

/// Fallback editor model for units without a native editor: every parameter
/// as a labelled row, readable and writable by index.
///
/// The view holds a snapshot; [`refresh`](Self::refresh) re-reads the unit,
/// [`set_value`](Self::set_value) writes through and updates the row in one
/// step.
#[derive(Debug, Default)]
pub struct GenericParamsView {
    rows: Vec<ParamRow>,
}

impl GenericParamsView {
    /// Builds a view over every parameter the unit reports.
    pub fn from_processor(processor: &dyn Processor) -> Self {
        let rows = (0..processor.param_count())
            .filter_map(|index| {
                processor.param_info(index).map(|descriptor| ParamRow {
                    descriptor,
                    value: processor.get_param(index),
                })
            })
            .collect();
        Self { rows }
    }

    /// The rows, in parameter-index order.
    pub fn rows(&self) -> &[ParamRow] {
        &self.rows
    }

    /// Re-reads every row's value from the unit.
    pub fn refresh(&mut self, processor: &dyn Processor) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.value = processor.get_param(index);
        }
    }

    /// Writes a parameter, clamped to its descriptor range, and updates the
    /// row. Out-of-range indices are ignored.
    pub fn set_value(&mut self, processor: &mut (dyn Processor + Send), index: usize, value: f32) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        let clamped = value.clamp(row.descriptor.min, row.descriptor.max);
        processor.set_param(index, clamped);
        row.value = clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::BusesLayout;

    struct TwoKnobs {
        layout: BusesLayout,
        values: [f32; 2],
    }

    impl TwoKnobs {
        fn new() -> Self {
            Self {
                layout: BusesLayout::stereo_io(),
                values: [0.5, 440.0],
            }
        }
    }

    impl Processor for TwoKnobs {
        fn name(&self) -> &str {
            "TwoKnobs"
        }
        fn bus_layout(&self) -> &BusesLayout {
            &self.layout
        }
        fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
            self.layout = layout;
            true
        }
        fn param_count(&self) -> usize {
            2
        }
        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(ParamDescriptor::new("Mix", "Mix", 0.0, 1.0, 0.5)),
                1 => Some(ParamDescriptor::new("Freq", "Frq", 20.0, 20_000.0, 440.0).with_unit("Hz")),
                _ => None,
            }
        }
        fn get_param(&self, index: usize) -> f32 {
            self.values.get(index).copied().unwrap_or(0.0)
        }
        fn set_param(&mut self, index: usize, value: f32) {
            if let Some(slot) = self.values.get_mut(index) {
                *slot = value;
            }
        }
    }

    #[test]
    fn snapshot_covers_every_param() {
        let unit = TwoKnobs::new();
        let view = GenericParamsView::from_processor(&unit);
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.rows()[1].descriptor.unit, "Hz");
        assert_eq!(view.rows()[1].value, 440.0);
    }

    #[test]
    fn set_value_writes_through_and_clamps() {
        let mut unit = TwoKnobs::new();
        let mut view = GenericParamsView::from_processor(&unit);

        view.set_value(&mut unit, 0, 2.5);
        assert_eq!(unit.get_param(0), 1.0);
        assert_eq!(view.rows()[0].value, 1.0);

        // Out of range index is ignored.
        view.set_value(&mut unit, 9, 0.1);
    }

    #[test]
    fn refresh_picks_up_external_changes() {
        let mut unit = TwoKnobs::new();
        let mut view = GenericParamsView::from_processor(&unit);
        unit.set_param(0, 0.9);
        view.refresh(&unit);
        assert_eq!(view.rows()[0].value, 0.9);
    }
}
