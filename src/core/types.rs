//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`EntryName`] - Validated name of a declared fieldset, column or tab
//! - [`Sequence`] - Declaration sequence number (default ordering key)
//! - [`Concern`] - Which of the three declaration sets an entry belongs to
//!
//! # Validation
//!
//! Entry names are identifiers: they are referenced from other entries'
//! member lists (`fieldsets = [...]`, `cols = [...]`) and from order lists,
//! so they must be stable, unambiguous keys.
//!
//! # Examples
//!
//! ```
//! use tabset::core::types::{Concern, EntryName};
//!
//! let name = EntryName::new("main_tab").unwrap();
//! assert_eq!(name.as_str(), "main_tab");
//! assert_eq!(Concern::Tabs.order_key(), "tabs_order");
//!
//! assert!(EntryName::new("").is_err());
//! assert!(EntryName::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),

    #[error("attributes of entry '{name}' must be a table, got {found}")]
    InvalidAttributes { name: String, found: String },
}

/// A validated entry name.
///
/// Entry names must be identifiers:
/// - Cannot be empty
/// - Cannot start with a digit
/// - Only ASCII letters, digits and `_`
///
/// # Example
///
/// ```
/// use tabset::core::types::EntryName;
///
/// assert!(EntryName::new("titles").is_ok());
/// assert!(EntryName::new("tab42").is_ok());
/// assert!(EntryName::new("42tab").is_err());
/// assert!(EntryName::new("a-b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryName(String);

impl EntryName {
    /// Create a new validated entry name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidEntryName` if the name is not an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let Some(first) = name.chars().next() else {
            return Err(TypeError::InvalidEntryName(
                "entry name cannot be empty".into(),
            ));
        };

        if first.is_ascii_digit() {
            return Err(TypeError::InvalidEntryName(format!(
                "entry name '{name}' cannot start with a digit"
            )));
        }

        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(TypeError::InvalidEntryName(format!(
                "entry name '{name}' cannot contain '{c}'"
            )));
        }

        Ok(())
    }

    /// Get the entry name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntryName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EntryName {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntryName> for String {
    fn from(name: EntryName) -> Self {
        name.0
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declaration sequence number.
///
/// Assigned by a [`Sequencer`](crate::core::entry::Sequencer) when an entry
/// is declared. Strictly increasing in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sequence(u64);

impl Sequence {
    /// Wrap a raw sequence value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw sequence value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the three declaration sets of a page configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    Fieldsets,
    Cols,
    Tabs,
}

impl Concern {
    /// All concerns, in assembly order (fieldsets are referenced by
    /// columns, columns by tabs).
    pub const ALL: [Concern; 3] = [Concern::Fieldsets, Concern::Cols, Concern::Tabs];

    /// Short name of the concern.
    pub fn as_str(self) -> &'static str {
        match self {
            Concern::Fieldsets => "fieldsets",
            Concern::Cols => "cols",
            Concern::Tabs => "tabs",
        }
    }

    /// The reserved attribute carrying this concern's explicit order list.
    pub fn order_key(self) -> &'static str {
        match self {
            Concern::Fieldsets => "fieldsets_order",
            Concern::Cols => "cols_order",
            Concern::Tabs => "tabs_order",
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
