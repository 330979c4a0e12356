//! core::fieldset
//!
//! Fieldset descriptors.
//!
//! A fieldset is either a plain group of form fields or a reference to an
//! embedded sub-form (an "inline", keyed by its type name). Exactly one of
//! the two is declared; [`FieldsetContent`] makes the other state
//! unrepresentable once the descriptor is built.

use serde::{Deserialize, Serialize};

use super::entry::OrderedEntry;
use super::errors::PageError;
use super::types::{Concern, EntryName};

/// What a fieldset shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldsetContent {
    /// Plain fields, in display order
    Fields(Vec<String>),
    /// Embedded sub-form, by type name
    Inline(String),
}

/// A named group of fields, or an embedded sub-form reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldsetDescriptor {
    /// Entry name the fieldset was declared under
    pub key: EntryName,
    /// Display label (defaults to the entry name)
    pub name: String,
    pub content: FieldsetContent,
    /// CSS classes, deduplicated, in declared order
    pub css_classes: Vec<String>,
    pub description: Option<String>,
}

/// Attribute vocabulary accepted for a fieldset entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FieldsetAttrs {
    name: Option<String>,
    fields: Option<Vec<String>>,
    #[serde(alias = "inline_ref")]
    inline: Option<String>,
    css_classes: Vec<String>,
    description: Option<String>,
}

impl FieldsetDescriptor {
    /// Build a descriptor from a resolved entry.
    ///
    /// # Errors
    ///
    /// - `InvalidAttributes` if an attribute has the wrong shape
    /// - `InvalidFieldset` unless exactly one of `fields`/`inline` is set
    pub fn from_entry(entry: &OrderedEntry) -> Result<Self, PageError> {
        let attrs: FieldsetAttrs =
            serde_json::from_value(serde_json::Value::Object(entry.attributes.clone())).map_err(
                |e| PageError::InvalidAttributes {
                    concern: Concern::Fieldsets,
                    name: entry.name.to_string(),
                    message: e.to_string(),
                },
            )?;

        let content = match (attrs.fields, attrs.inline) {
            (Some(fields), None) => FieldsetContent::Fields(fields),
            (None, Some(inline)) => FieldsetContent::Inline(inline),
            (None, None) => {
                return Err(PageError::InvalidFieldset {
                    name: entry.name.to_string(),
                    reason: "declares neither 'fields' nor 'inline'".to_string(),
                })
            }
            (Some(_), Some(_)) => {
                return Err(PageError::InvalidFieldset {
                    name: entry.name.to_string(),
                    reason: "declares both 'fields' and 'inline'".to_string(),
                })
            }
        };

        Ok(Self {
            key: entry.name.clone(),
            name: attrs.name.unwrap_or_else(|| entry.name.to_string()),
            content,
            css_classes: dedup_classes(attrs.css_classes),
            description: attrs.description,
        })
    }

    /// The plain fields, if this is not an inline.
    pub fn fields(&self) -> Option<&[String]> {
        match &self.content {
            FieldsetContent::Fields(fields) => Some(fields),
            FieldsetContent::Inline(_) => None,
        }
    }

    /// The embedded sub-form type name, if this is an inline.
    pub fn inline(&self) -> Option<&str> {
        match &self.content {
            FieldsetContent::Inline(inline) => Some(inline),
            FieldsetContent::Fields(_) => None,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.inline().is_some()
    }
}

/// Drop repeated classes, keeping the first occurrence.
pub(crate) fn dedup_classes(classes: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    classes
        .into_iter()
        .filter(|class| seen.insert(class.clone()))
        .collect()
}
