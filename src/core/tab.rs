//! core::tab
//!
//! One tab of the page: an ordered group of columns rendered as a
//! switchable section.
//!
//! Disabled tabs are kept. Whether and how a disabled tab is shown is up
//! to the renderer.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use super::column::{next_free, Column};
use super::entry::OrderedEntry;
use super::errors::PageError;
use super::types::{Concern, EntryName};

/// An ordered collection of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    /// Entry name the tab was declared under
    pub key: EntryName,
    /// Display label (defaults to the entry name)
    pub name: String,
    pub enabled: bool,
    cols: BTreeMap<usize, Arc<Column>>,
}

impl Tab {
    /// Create an empty, enabled tab.
    pub fn new(key: EntryName, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            enabled: true,
            cols: BTreeMap::new(),
        }
    }

    /// Add a column at `position`, or at the next free position.
    ///
    /// The position belongs to the tab/column relation, not to the column:
    /// the same column may sit at different positions in different tabs.
    ///
    /// # Errors
    ///
    /// Returns `PageError::PositionTaken` if `position` is occupied.
    pub fn add_col(&mut self, col: Arc<Column>, position: Option<usize>) -> Result<usize, PageError> {
        let position = match position {
            Some(position) if self.cols.contains_key(&position) => {
                return Err(PageError::PositionTaken {
                    container: format!("tab '{}'", self.key),
                    position,
                })
            }
            Some(position) => position,
            None => next_free(&self.cols),
        };
        self.cols.insert(position, col);
        Ok(position)
    }

    /// Columns in position order.
    pub fn cols(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.cols.values()
    }

    /// Column at a position.
    pub fn get(&self, position: usize) -> Option<&Arc<Column>> {
        self.cols.get(&position)
    }

    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}

/// Attribute vocabulary accepted for a tab entry.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TabAttrs {
    pub name: Option<String>,
    pub cols: Vec<EntryName>,
    pub enabled: bool,
}

impl Default for TabAttrs {
    fn default() -> Self {
        Self {
            name: None,
            cols: Vec::new(),
            enabled: true,
        }
    }
}

impl TabAttrs {
    pub(crate) fn parse(entry: &OrderedEntry) -> Result<Self, PageError> {
        serde_json::from_value(serde_json::Value::Object(entry.attributes.clone())).map_err(|e| {
            PageError::InvalidAttributes {
                concern: Concern::Tabs,
                name: entry.name.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// An empty tab carrying the display attributes.
    pub(crate) fn tab(&self, key: &EntryName) -> Tab {
        let mut tab = Tab::new(
            key.clone(),
            self.name.clone().unwrap_or_else(|| key.to_string()),
        );
        tab.enabled = self.enabled;
        tab
    }
}
