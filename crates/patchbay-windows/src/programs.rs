//! Program (preset) list view.

use patchbay_core::Processor;

/// Editor model listing a unit's programs with the active one marked.
#[derive(Debug, Default)]
pub struct ProgramListView {
    names: Vec<String>,
    current: usize,
}

impl ProgramListView {
    /// Builds a view over the unit's program list.
    pub fn from_processor(processor: &dyn Processor) -> Self {
        let names = (0..processor.program_count())
            .map(|index| {
                processor
                    .program_name(index)
                    .unwrap_or_else(|| format!("Program {index}"))
            })
            .collect();
        Self {
            names,
            current: processor.current_program(),
        }
    }

    /// Program names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of the active program.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Switches the unit to a program. Returns `false` (changing nothing)
    /// for out-of-range indices.
    pub fn select(&mut self, processor: &mut (dyn Processor + Send), index: usize) -> bool {
        if index >= self.names.len() {
            return false;
        }
        processor.set_current_program(index);
        self.current = index;
        true
    }
}
