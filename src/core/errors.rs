//! core::errors
//!
//! Errors raised while assembling and rendering a page configuration.
//!
//! # Design
//!
//! Resolution never fails; every structural problem in a declaration set
//! surfaces here, when the declarations are turned into live objects.
//! These are configuration mistakes: callers are expected to fail fast,
//! never to retry.
//!
//! # Example
//!
//! ```
//! use tabset::core::errors::PageError;
//! use tabset::core::types::Concern;
//!
//! let err = PageError::UnknownEntry {
//!     concern: Concern::Fieldsets,
//!     name: "ghost".to_string(),
//!     referenced_by: "col 'main'".to_string(),
//! };
//! assert!(err.to_string().contains("ghost"));
//! ```

use thiserror::Error;

use super::types::Concern;

/// Errors from page assembly and rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    /// A member list or order list names an entry that does not exist.
    #[error("unknown {concern} entry '{name}' referenced by {referenced_by}")]
    UnknownEntry {
        /// Concern the missing entry was looked up in
        concern: Concern,
        /// The missing name
        name: String,
        /// What referenced it (e.g. "col 'main'", "tabs_order")
        referenced_by: String,
    },

    /// A fieldset declares neither `fields` nor `inline`, or both.
    #[error("invalid fieldset '{name}': {reason}")]
    InvalidFieldset { name: String, reason: String },

    /// An attribute has the wrong shape or an unknown key.
    #[error("invalid attributes for {concern} entry '{name}': {message}")]
    InvalidAttributes {
        concern: Concern,
        name: String,
        message: String,
    },

    /// An explicit position inside a column or tab is already occupied.
    #[error("position {position} already taken in {container}")]
    PositionTaken { container: String, position: usize },

    /// Required request context is absent.
    #[error("missing context: {0}")]
    MissingContext(String),
}
