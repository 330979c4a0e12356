//! core::column
//!
//! One column of a tab: an ordered group of fieldsets rendered as a single
//! vertical section.
//!
//! # Positions
//!
//! Fieldsets are stored by integer position. Adding without a position
//! appends at the next free slot; adding at an occupied position is an
//! error rather than a silent overwrite.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use super::entry::OrderedEntry;
use super::errors::PageError;
use super::fieldset::{dedup_classes, FieldsetDescriptor};
use super::project::{project_column, ProjectedFieldset};
use super::types::{Concern, EntryName};

/// An ordered collection of fieldsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Entry name the column was declared under
    pub key: EntryName,
    /// Display label (defaults to the entry name)
    pub name: String,
    pub css_id: Option<String>,
    pub css_classes: Vec<String>,
    fieldsets: BTreeMap<usize, Arc<FieldsetDescriptor>>,
}

impl Column {
    /// Create an empty column.
    pub fn new(key: EntryName, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            css_id: None,
            css_classes: Vec::new(),
            fieldsets: BTreeMap::new(),
        }
    }

    /// Add a fieldset at `position`, or at the next free position.
    ///
    /// # Errors
    ///
    /// Returns `PageError::PositionTaken` if `position` is occupied.
    pub fn add_fieldset(
        &mut self,
        fieldset: Arc<FieldsetDescriptor>,
        position: Option<usize>,
    ) -> Result<usize, PageError> {
        let position = match position {
            Some(position) if self.fieldsets.contains_key(&position) => {
                return Err(PageError::PositionTaken {
                    container: format!("col '{}'", self.key),
                    position,
                })
            }
            Some(position) => position,
            None => next_free(&self.fieldsets),
        };
        self.fieldsets.insert(position, fieldset);
        Ok(position)
    }

    /// Fieldsets in position order.
    pub fn fieldsets(&self) -> impl Iterator<Item = &Arc<FieldsetDescriptor>> {
        self.fieldsets.values()
    }

    /// Whether a fieldset with this entry name is in the column.
    pub fn contains(&self, key: &str) -> bool {
        self.fieldsets.values().any(|fs| fs.key.as_str() == key)
    }

    pub fn len(&self) -> usize {
        self.fieldsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fieldsets.is_empty()
    }

    /// Flatten into the renderer's `(name, options)` shape.
    pub fn elements(&self, include_inline: bool) -> Vec<(String, ProjectedFieldset)> {
        project_column(self, include_inline)
    }

    /// The plain (non-inline) fieldsets, as fed to a form builder.
    pub fn form_fieldsets(&self) -> Vec<(String, ProjectedFieldset)> {
        self.elements(false)
    }
}

/// First free slot at or after the current length.
pub(crate) fn next_free<T>(slots: &BTreeMap<usize, T>) -> usize {
    let mut position = slots.len();
    while slots.contains_key(&position) {
        position += 1;
    }
    position
}

/// Attribute vocabulary accepted for a column entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ColumnAttrs {
    pub name: Option<String>,
    pub fieldsets: Vec<EntryName>,
    pub css_id: Option<String>,
    pub css_classes: Vec<String>,
}

impl ColumnAttrs {
    pub(crate) fn parse(entry: &OrderedEntry) -> Result<Self, PageError> {
        serde_json::from_value(serde_json::Value::Object(entry.attributes.clone())).map_err(|e| {
            PageError::InvalidAttributes {
                concern: Concern::Cols,
                name: entry.name.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// An empty column carrying the display attributes.
    pub(crate) fn column(&self, key: &EntryName) -> Column {
        let mut column = Column::new(
            key.clone(),
            self.name.clone().unwrap_or_else(|| key.to_string()),
        );
        column.css_id = self.css_id.clone();
        column.css_classes = dedup_classes(self.css_classes.clone());
        column
    }
}
