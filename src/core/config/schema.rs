//! core::config::schema
//!
//! Declaration file schema.
//!
//! # Layout
//!
//! One table per configuration type under `[types]`. A type may be
//! written before the type it extends; parents are always defined first:
//!
//! ```toml
//! [types.Article]
//! tabs_order = ["main_tab", "secondary_tab"]
//!
//! [types.Article.fieldsets.titles]
//! name = "Title & Subtitle"
//! fields = ["title", "subtitle"]
//!
//! [types.Article.cols.titles_col]
//! fieldsets = ["titles"]
//!
//! [types.Article.tabs.main_tab]
//! name = "Main"
//! cols = ["titles_col"]
//!
//! [types.ShortArticle]
//! extends = "Article"
//!
//! [types.ShortArticle.fieldsets]
//! titles = false   # removes the inherited entry
//! ```
//!
//! # Validation
//!
//! Parsing is strict (unknown keys rejected). After parsing, a type may not
//! extend itself, an entry value of `true` is rejected (only `false`
//! removes), and order lists may not repeat a name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::entry::Attributes;
use crate::core::types::{Concern, EntryName};

/// A whole declaration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DeclarationFile {
    /// Configuration types, in definition order
    pub types: IndexMap<String, TypeDecl>,
}

impl DeclarationFile {
    /// Validate every type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, decl) in &self.types {
            decl.validate(name)?;
        }
        Ok(())
    }
}

/// Declarations of one configuration type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TypeDecl {
    /// Parent type name
    pub extends: Option<String>,

    pub fieldsets_order: Option<Vec<EntryName>>,
    pub cols_order: Option<Vec<EntryName>>,
    pub tabs_order: Option<Vec<EntryName>>,

    pub fieldsets: IndexMap<EntryName, RawDeclaration>,
    pub cols: IndexMap<EntryName, RawDeclaration>,
    pub tabs: IndexMap<EntryName, RawDeclaration>,
}

impl TypeDecl {
    /// Entry declarations for a concern.
    pub fn entries(&self, concern: Concern) -> &IndexMap<EntryName, RawDeclaration> {
        match concern {
            Concern::Fieldsets => &self.fieldsets,
            Concern::Cols => &self.cols,
            Concern::Tabs => &self.tabs,
        }
    }

    /// Explicit order list for a concern.
    pub fn order(&self, concern: Concern) -> Option<&[EntryName]> {
        match concern {
            Concern::Fieldsets => self.fieldsets_order.as_deref(),
            Concern::Cols => self.cols_order.as_deref(),
            Concern::Tabs => self.tabs_order.as_deref(),
        }
    }

    /// Validate the type's declarations.
    pub fn validate(&self, type_name: &str) -> Result<(), ConfigError> {
        if self.extends.as_deref() == Some(type_name) {
            return Err(ConfigError::InvalidValue(format!(
                "type '{type_name}' cannot extend itself"
            )));
        }

        for concern in Concern::ALL {
            for (entry, decl) in self.entries(concern) {
                if matches!(decl, RawDeclaration::Flag(true)) {
                    return Err(ConfigError::InvalidValue(format!(
                        "type '{type_name}': {concern} entry '{entry}' is `true`; \
                         use a table to declare it or `false` to remove it"
                    )));
                }
            }

            if let Some(order) = self.order(concern) {
                let mut seen = std::collections::HashSet::new();
                if let Some(dup) = order.iter().find(|name| !seen.insert(name.as_str())) {
                    return Err(ConfigError::InvalidValue(format!(
                        "type '{type_name}': {} lists '{dup}' twice",
                        concern.order_key()
                    )));
                }
            }
        }

        Ok(())
    }
}

/// An entry value as written: an attribute table, or `false` to remove.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawDeclaration {
    Flag(bool),
    Attributes(Attributes),
}

impl RawDeclaration {
    /// Whether this value is the removal marker.
    pub fn is_removal(&self) -> bool {
        matches!(self, RawDeclaration::Flag(false))
    }
}
