//! core::layer
//!
//! Layer declaration sets.
//!
//! # Overview
//!
//! A [`Layer`] is one level of a configuration-type hierarchy. For each
//! [`Concern`] it holds a mapping from entry name to a [`Declaration`]:
//! either the entry's attributes, or an explicit tombstone removing an
//! inherited entry. A layer may also carry an explicit order list per
//! concern.
//!
//! Layers are data. Inheritance is expressed by handing the resolver an
//! ordered list of layers, root ancestor first.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tabset::core::entry::Sequencer;
//! use tabset::core::layer::LayerBuilder;
//!
//! let mut seq = Sequencer::new();
//! let base = LayerBuilder::new("Base", &mut seq)
//!     .tab("main", json!({"name": "Main", "cols": ["left"]}))
//!     .tab("extra", json!({"name": "Extra"}))
//!     .build()
//!     .unwrap();
//!
//! let derived = LayerBuilder::new("Derived", &mut seq)
//!     .remove_tab("extra")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(base.tabs.len(), 2);
//! assert!(derived.tabs.get("extra").unwrap().is_removed());
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use super::entry::{OrderedEntry, Sequencer};
use super::types::{Concern, EntryName, TypeError};

/// A single declaration at one layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// The entry is declared (or overridden) with these attributes.
    Present(OrderedEntry),
    /// The entry is removed from whatever was inherited.
    Removed,
}

impl Declaration {
    /// Whether this declaration is a tombstone.
    pub fn is_removed(&self) -> bool {
        matches!(self, Declaration::Removed)
    }

    /// The declared entry, if present.
    pub fn entry(&self) -> Option<&OrderedEntry> {
        match self {
            Declaration::Present(entry) => Some(entry),
            Declaration::Removed => None,
        }
    }
}

/// Declarations for one concern at one layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConcernDeclarations {
    /// Declarations in the order they were written
    pub entries: IndexMap<EntryName, Declaration>,
    /// Explicit order list, if this layer declares one
    pub order: Option<Vec<EntryName>>,
}

impl ConcernDeclarations {
    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.entries.get(name)
    }

    /// Number of declarations (tombstones included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the layer says nothing about this concern.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.order.is_none()
    }

    /// Iterate declarations in written order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntryName, &Declaration)> {
        self.entries.iter()
    }
}

/// One level of a configuration-type hierarchy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    /// Name of the configuration type that declared this layer
    pub name: String,
    pub fieldsets: ConcernDeclarations,
    pub cols: ConcernDeclarations,
    pub tabs: ConcernDeclarations,
}

impl Layer {
    /// Create an empty layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declarations for a concern.
    pub fn concern(&self, concern: Concern) -> &ConcernDeclarations {
        match concern {
            Concern::Fieldsets => &self.fieldsets,
            Concern::Cols => &self.cols,
            Concern::Tabs => &self.tabs,
        }
    }

    /// Mutable declarations for a concern.
    pub fn concern_mut(&mut self, concern: Concern) -> &mut ConcernDeclarations {
        match concern {
            Concern::Fieldsets => &mut self.fieldsets,
            Concern::Cols => &mut self.cols,
            Concern::Tabs => &mut self.tabs,
        }
    }

    /// Record a present declaration. Redeclaring a name within the same
    /// layer replaces the earlier declaration.
    pub fn declare(&mut self, concern: Concern, entry: OrderedEntry) {
        self.concern_mut(concern)
            .entries
            .insert(entry.name.clone(), Declaration::Present(entry));
    }

    /// Record a tombstone.
    pub fn remove(&mut self, concern: Concern, name: EntryName) {
        self.concern_mut(concern)
            .entries
            .insert(name, Declaration::Removed);
    }

    /// Record an explicit order list, replacing any earlier one at this layer.
    pub fn set_order(&mut self, concern: Concern, order: Vec<EntryName>) {
        self.concern_mut(concern).order = Some(order);
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

/// Fluent builder for a [`Layer`].
///
/// Names and attributes are validated as they are added; the first
/// problem is reported by [`build`](Self::build).
pub struct LayerBuilder<'a> {
    layer: Layer,
    sequencer: &'a mut Sequencer,
    error: Option<TypeError>,
}

impl<'a> LayerBuilder<'a> {
    /// Start a layer for the configuration type `name`.
    pub fn new(name: impl Into<String>, sequencer: &'a mut Sequencer) -> Self {
        Self {
            layer: Layer::new(name),
            sequencer,
            error: None,
        }
    }

    fn name(&mut self, name: &str) -> Option<EntryName> {
        match EntryName::new(name) {
            Ok(name) => Some(name),
            Err(e) => {
                self.error.get_or_insert(e);
                None
            }
        }
    }

    /// Declare an entry. `attributes` must be a JSON object; use
    /// [`remove`](Self::remove) to drop an inherited entry.
    pub fn declare(mut self, concern: Concern, name: &str, attributes: Value) -> Self {
        let Some(name) = self.name(name) else {
            return self;
        };
        match attributes {
            Value::Object(map) => {
                let entry = self.sequencer.declare(name, map);
                self.layer.declare(concern, entry);
            }
            other => {
                self.error.get_or_insert(TypeError::InvalidAttributes {
                    name: name.to_string(),
                    found: value_kind(&other).to_string(),
                });
            }
        }
        self
    }

    /// Declare a tombstone for an inherited entry.
    pub fn remove(mut self, concern: Concern, name: &str) -> Self {
        if let Some(name) = self.name(name) {
            self.layer.remove(concern, name);
        }
        self
    }

    /// Declare an explicit order list.
    pub fn order(mut self, concern: Concern, names: &[&str]) -> Self {
        let order: Vec<EntryName> = names.iter().filter_map(|n| self.name(n)).collect();
        if order.len() == names.len() {
            self.layer.set_order(concern, order);
        }
        self
    }

    pub fn fieldset(self, name: &str, attributes: Value) -> Self {
        self.declare(Concern::Fieldsets, name, attributes)
    }

    pub fn col(self, name: &str, attributes: Value) -> Self {
        self.declare(Concern::Cols, name, attributes)
    }

    pub fn tab(self, name: &str, attributes: Value) -> Self {
        self.declare(Concern::Tabs, name, attributes)
    }

    pub fn remove_fieldset(self, name: &str) -> Self {
        self.remove(Concern::Fieldsets, name)
    }

    pub fn remove_col(self, name: &str) -> Self {
        self.remove(Concern::Cols, name)
    }

    pub fn remove_tab(self, name: &str) -> Self {
        self.remove(Concern::Tabs, name)
    }

    /// Finish the layer.
    ///
    /// # Errors
    ///
    /// Returns the first `TypeError` hit while adding entries.
    pub fn build(self) -> Result<Layer, TypeError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.layer),
        }
    }
}
