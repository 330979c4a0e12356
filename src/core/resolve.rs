//! core::resolve
//!
//! Layered configuration resolver.
//!
//! # Algorithm
//!
//! Layers are walked root ancestor first. For each declaration of the
//! concern being resolved:
//!
//! - A tombstone removes the name from the accumulator (no-op if absent).
//! - A present declaration of a name already accumulated is shallow-merged
//!   over it: new keys overwrite, untouched keys are inherited. The entry
//!   keeps the sequence number of its first insertion.
//! - Any other present declaration is inserted with its own sequence.
//! - An explicit order list replaces any earlier one (most derived wins).
//!
//! The final order is the last explicit order list if any layer declared
//! one, otherwise ascending sequence. Either way it is filtered down to
//! names still present in the accumulator.
//!
//! # Invariants
//!
//! - Resolution is pure: the same hierarchy always yields the same result.
//! - Resolution never fails. Dangling references (an order list naming a
//!   removed entry, a column naming an unknown fieldset) are reported at
//!   assembly time.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tabset::core::entry::Sequencer;
//! use tabset::core::layer::LayerBuilder;
//! use tabset::core::resolve::resolve;
//! use tabset::core::types::Concern;
//!
//! let mut seq = Sequencer::new();
//! let a = LayerBuilder::new("A", &mut seq)
//!     .tab("tab", json!({"name": "myname", "cols": ["a", "b", "c"]}))
//!     .build()
//!     .unwrap();
//! let ab = LayerBuilder::new("AB", &mut seq)
//!     .tab("tab", json!({"cols": ["b", "c", "a"]}))
//!     .build()
//!     .unwrap();
//!
//! let resolved = resolve(Concern::Tabs, &[&a, &ab]);
//! let tab = resolved.get("tab").unwrap();
//! assert_eq!(tab.get("name"), Some(&json!("myname")));
//! assert_eq!(tab.get("cols"), Some(&json!(["b", "c", "a"])));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use super::entry::{merge_attributes, OrderedEntry};
use super::layer::{Declaration, Layer};
use super::types::{Concern, EntryName};

/// The merged, tombstone-applied declarations of one concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDeclarations {
    /// Which concern these declarations belong to
    pub concern: Concern,
    /// Surviving entries, fully merged
    entries: BTreeMap<EntryName, OrderedEntry>,
    /// Iteration order (only names present in `entries`)
    order: Vec<EntryName>,
    /// The winning explicit order list, verbatim
    explicit_order: Option<Vec<EntryName>>,
}

impl ResolvedDeclarations {
    /// Look up a resolved entry by name.
    pub fn get(&self, name: &str) -> Option<&OrderedEntry> {
        self.entries.get(name)
    }

    /// Whether an entry survived resolution.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of surviving entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in resolution order.
    pub fn order(&self) -> &[EntryName] {
        &self.order
    }

    /// The explicit order list that won, if any layer declared one.
    ///
    /// Unlike [`order`](Self::order) this is not filtered, so it may name
    /// entries that no longer exist.
    pub fn explicit_order(&self) -> Option<&[EntryName]> {
        self.explicit_order.as_deref()
    }

    /// Iterate entries in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &OrderedEntry> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    /// Every surviving entry by name, including entries an explicit order
    /// list leaves out.
    pub fn entries(&self) -> impl Iterator<Item = &OrderedEntry> {
        self.entries.values()
    }
}

/// Resolve one concern over a root-to-leaf hierarchy of layers.
pub fn resolve(concern: Concern, hierarchy: &[&Layer]) -> ResolvedDeclarations {
    let mut entries: BTreeMap<EntryName, OrderedEntry> = BTreeMap::new();
    let mut explicit_order: Option<Vec<EntryName>> = None;

    for layer in hierarchy {
        let declarations = layer.concern(concern);

        for (name, declaration) in declarations.iter() {
            match declaration {
                Declaration::Removed => {
                    if entries.remove(name).is_some() {
                        trace!(%concern, entry = %name, layer = %layer.name, "removed inherited entry");
                    }
                }
                Declaration::Present(entry) => match entries.get_mut(name) {
                    Some(existing) => merge_attributes(&mut existing.attributes, &entry.attributes),
                    None => {
                        entries.insert(name.clone(), entry.clone());
                    }
                },
            }
        }

        if let Some(order) = &declarations.order {
            explicit_order = Some(order.clone());
        }
    }

    let order: Vec<EntryName> = match &explicit_order {
        Some(explicit) => explicit
            .iter()
            .filter(|name| entries.contains_key(*name))
            .cloned()
            .collect(),
        None => {
            let mut by_sequence: Vec<&OrderedEntry> = entries.values().collect();
            by_sequence.sort_by_key(|entry| entry.sequence);
            by_sequence.into_iter().map(|e| e.name.clone()).collect()
        }
    };

    debug!(
        %concern,
        layers = hierarchy.len(),
        entries = entries.len(),
        explicit_order = explicit_order.is_some(),
        "resolved declarations"
    );

    ResolvedDeclarations {
        concern,
        entries,
        order,
        explicit_order,
    }
}

/// Resolved declarations for all three concerns of a configuration type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPageConfig {
    pub fieldsets: ResolvedDeclarations,
    pub cols: ResolvedDeclarations,
    pub tabs: ResolvedDeclarations,
}

impl ResolvedPageConfig {
    /// Resolve every concern over the same hierarchy.
    pub fn resolve(hierarchy: &[&Layer]) -> Self {
        Self {
            fieldsets: resolve(Concern::Fieldsets, hierarchy),
            cols: resolve(Concern::Cols, hierarchy),
            tabs: resolve(Concern::Tabs, hierarchy),
        }
    }

    /// Resolved declarations for a concern.
    pub fn concern(&self, concern: Concern) -> &ResolvedDeclarations {
        match concern {
            Concern::Fieldsets => &self.fieldsets,
            Concern::Cols => &self.cols,
            Concern::Tabs => &self.tabs,
        }
    }
}
