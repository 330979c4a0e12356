//! core::entry
//!
//! Ordered entries: the unit from which fieldsets, columns and tabs are
//! declared.
//!
//! # Sequencing
//!
//! Every declared entry receives a [`Sequence`] from a [`Sequencer`]. The
//! sequence is the default ordering key when no explicit order list is
//! declared, so entries come out in the order they were written rather
//! than sorted by name.
//!
//! The counter is an explicit value owned by whoever builds declarations
//! (a [`LayerBuilder`](crate::core::layer::LayerBuilder), a TOML loader),
//! not process-wide state. Sharing one sequencer across every layer of a
//! hierarchy keeps sequence numbers globally unique within it.
//!
//! # Example
//!
//! ```
//! use tabset::core::entry::{Attributes, Sequencer};
//! use tabset::core::types::EntryName;
//!
//! let mut seq = Sequencer::new();
//! let first = seq.declare(EntryName::new("tab42").unwrap(), Attributes::new());
//! let second = seq.declare(EntryName::new("tab18").unwrap(), Attributes::new());
//! assert!(first.sequence < second.sequence);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{EntryName, Sequence};

/// Attribute mapping of a declared entry.
///
/// Keys are attribute names (`name`, `fields`, `cols`, ...), values are
/// arbitrary JSON-shaped data. Typed interpretation happens at assembly.
pub type Attributes = serde_json::Map<String, Value>;

/// A named configuration item with its declaration sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedEntry {
    /// Entry name (the key other entries reference it by)
    pub name: EntryName,
    /// Declared attributes
    pub attributes: Attributes,
    /// Declaration sequence number
    pub sequence: Sequence,
}

impl OrderedEntry {
    /// Get an attribute by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Monotonic source of declaration sequence numbers.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    next: u64,
}

impl Sequencer {
    /// Create a sequencer starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequencer that continues after `last`.
    pub fn after(last: Sequence) -> Self {
        Self {
            next: last.value() + 1,
        }
    }

    /// Take the next sequence number.
    pub fn next_sequence(&mut self) -> Sequence {
        let sequence = Sequence::new(self.next);
        self.next += 1;
        sequence
    }

    /// Declare an entry, assigning it the next sequence number.
    pub fn declare(&mut self, name: EntryName, attributes: Attributes) -> OrderedEntry {
        OrderedEntry {
            name,
            attributes,
            sequence: self.next_sequence(),
        }
    }
}

/// Shallow-merge `overlay` into `base`.
///
/// Keys present in `overlay` overwrite those in `base`; keys only in
/// `base` are kept. Nested values are replaced whole, never merged.
pub fn merge_attributes(base: &mut Attributes, overlay: &Attributes) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}
