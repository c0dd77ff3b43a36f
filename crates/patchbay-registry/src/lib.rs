//! Module factory for patchbay processing units.
//!
//! The factory maps a stable integer index to a constructor for a processing
//! unit. The graph model records the index each node was built from, so the
//! same factory can re-create every node during document restoration.
//!
//! # Features
//!
//! - **Ordered registration**: constructors registered as a list get indices
//!   `0..n`; an explicit index map allows sparse or host-defined indices
//! - **Name enumeration**: one display name per registered constructor, in
//!   index order, for populating creation menus
//! - **Fallible creation**: an out-of-range index yields `None`, never an
//!   error — callers treat it as "no unit created"
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::{BusesLayout, Processor};
//! use patchbay_registry::ModuleFactory;
//!
//! struct Gain {
//!     layout: BusesLayout,
//! }
//!
//! impl Processor for Gain {
//!     fn name(&self) -> &str {
//!         "Gain"
//!     }
//!     fn bus_layout(&self) -> &BusesLayout {
//!         &self.layout
//!     }
//!     fn set_bus_layout(&mut self, layout: BusesLayout) -> bool {
//!         self.layout = layout;
//!         true
//!     }
//! }
//!
//! let factory = ModuleFactory::from_list(vec![Box::new(|| {
//!     Box::new(Gain { layout: BusesLayout::stereo_io() }) as Box<dyn Processor + Send>
//! })]);
//!
//! assert_eq!(factory.names(), vec!["Gain"]);
//! assert!(factory.create(0).is_some());
//! assert!(factory.create(7).is_none());
//! ```

use std::collections::{BTreeMap, HashMap};

use patchbay_core::Processor;

/// Constructor function for a processing unit.
pub type ModuleConstructor = Box<dyn Fn() -> Box<dyn Processor + Send> + Send + Sync>;

/// Registry of processing-unit constructors, addressed by index.
///
/// Indices are stable for the factory's lifetime; the graph model persists
/// them in each node's metadata and replays them on restore.
pub struct ModuleFactory {
    constructors: BTreeMap<usize, ModuleConstructor>,
}

impl ModuleFactory {
    /// Builds a factory from an ordered constructor list.
    ///
    /// The constructor at position `i` gets index `i`.
    pub fn from_list(constructors: Vec<ModuleConstructor>) -> Self {
        Self {
            constructors: constructors.into_iter().enumerate().collect(),
        }
    }

    /// Builds a factory from an explicit index → constructor map.
    ///
    /// Indices may be sparse; enumeration order is ascending index order.
    pub fn from_map(constructors: HashMap<usize, ModuleConstructor>) -> Self {
        Self {
            constructors: constructors.into_iter().collect(),
        }
    }

    /// Display names of all registered modules, in index order.
    ///
    /// Constructs one throwaway instance per entry to ask for its name, the
    /// same way the creation menu will construct the real one later.
    pub fn names(&self) -> Vec<String> {
        self.constructors
            .values()
            .map(|ctor| ctor().name().to_string())
            .collect()
    }

    /// Registered indices, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.constructors.keys().copied().collect()
    }

    /// Constructs a new unit for the given index.
    ///
    /// Returns `None` when no constructor is registered at `index`.
    pub fn create(&self, index: usize) -> Option<Box<dyn Processor + Send>> {
        self.constructors.get(&index).map(|ctor| ctor())
    }

    /// Number of registered constructors.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether no constructors are registered.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::BusesLayout;

    struct Named {
        name: &'static str,
        layout: BusesLayout,
    }

    impl Processor for Named {
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
    }

    fn ctor(name: &'static str) -> ModuleConstructor {
        Box::new(move || {
            Box::new(Named {
                name,
                layout: BusesLayout::stereo_io(),
            })
        })
    }

    #[test]
    fn list_registration_assigns_sequential_indices() {
        let factory = ModuleFactory::from_list(vec![ctor("Osc"), ctor("Filter"), ctor("Out")]);

        assert_eq!(factory.len(), 3);
        assert_eq!(factory.indices(), vec![0, 1, 2]);
        assert_eq!(factory.names(), vec!["Osc", "Filter", "Out"]);
    }

    #[test]
    fn map_registration_keeps_sparse_indices() {
        let mut map = HashMap::new();
        map.insert(10, ctor("Reverb"));
        map.insert(2, ctor("Delay"));
        let factory = ModuleFactory::from_map(map);

        assert_eq!(factory.indices(), vec![2, 10]);
        // Names come back in ascending index order, not insertion order.
        assert_eq!(factory.names(), vec!["Delay", "Reverb"]);
        assert!(factory.create(2).is_some());
        assert!(factory.create(3).is_none());
    }

    #[test]
    fn create_out_of_range_is_none() {
        let factory = ModuleFactory::from_list(vec![ctor("Only")]);
        assert!(factory.create(1).is_none());
        assert!(factory.create(usize::MAX).is_none());
    }

    #[test]
    fn each_create_is_a_fresh_instance() {
        let factory = ModuleFactory::from_list(vec![ctor("Osc")]);
        let a = factory.create(0).unwrap();
        let b = factory.create(0).unwrap();
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn empty_factory() {
        let factory = ModuleFactory::from_list(Vec::new());
        assert!(factory.is_empty());
        assert!(factory.names().is_empty());
        assert!(factory.create(0).is_none());
    }
}
