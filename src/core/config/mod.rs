//! core::config
//!
//! Declaration files: loading configuration types from TOML.
//!
//! # Overview
//!
//! Configuration types can be declared in code through
//! [`ConfigRegistry::layer`], or written down in a TOML file and loaded
//! into a registry in one go. See [`schema`] for the file layout.
//!
//! # Ordering
//!
//! Sequence numbers are assigned in document order: types in the order
//! their tables appear, entries in the order they are written inside each
//! type. A type written before its parent is numbered after it, so
//! inherited entries always come before a type's own. The default order
//! of a loaded configuration therefore follows the file, never the
//! alphabetical order of entry names.
//!
//! # Example
//!
//! ```
//! use tabset::core::config::load_str;
//!
//! let result = load_str(r#"
//!     [types.Base.tabs.main]
//!     name = "Main"
//!
//!     [types.Derived]
//!     extends = "Base"
//!
//!     [types.Derived.tabs.extra]
//!     name = "Extra"
//! "#).unwrap();
//!
//! let resolved = result.registry.resolved("Derived").unwrap();
//! assert_eq!(resolved.tabs.len(), 2);
//! assert!(result.warnings.is_empty());
//! ```

pub mod schema;

pub use schema::{DeclarationFile, RawDeclaration, TypeDecl};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::entry::Sequencer;
use crate::core::layer::Layer;
use crate::core::registry::{ConfigRegistry, RegistryError};
use crate::core::types::Concern;

/// Errors from loading declaration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read declaration file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse declaration file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid declaration: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Warnings generated while loading declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// Configuration type that triggered the warning.
    pub type_name: String,
}

/// Result of loading declarations.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// Registry holding every loaded type.
    pub registry: ConfigRegistry,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Load a declaration file from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails
/// validation, or describes a broken inheritance chain.
pub fn load(path: &Path) -> Result<ConfigLoadResult, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file: DeclarationFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), types = file.types.len(), "loaded declaration file");
    into_registry(file)
}

/// Load declarations from a TOML string.
pub fn load_str(text: &str) -> Result<ConfigLoadResult, ConfigError> {
    let file: DeclarationFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: PathBuf::from("<string>"),
        message: e.to_string(),
    })?;
    into_registry(file)
}

/// Build a registry from a parsed declaration file.
pub fn into_registry(file: DeclarationFile) -> Result<ConfigLoadResult, ConfigError> {
    file.validate()?;

    let mut registry = ConfigRegistry::new();
    let mut warnings = Vec::new();

    for type_name in parent_first(&file) {
        let decl = &file.types[type_name];
        if decl.extends.is_none() {
            warnings.extend(root_removal_warnings(type_name, decl));
        }
        let layer = to_layer(type_name, decl, registry.sequencer_mut());
        registry.define_unchecked(decl.extends.clone(), layer)?;
    }

    registry.validate()?;

    for warning in &warnings {
        warn!(type_name = %warning.type_name, "{}", warning.message);
    }

    Ok(ConfigLoadResult { registry, warnings })
}

/// Type names in file order, except that every type comes after its
/// parent. Unknown parents and cycles are left for registry validation.
fn parent_first(file: &DeclarationFile) -> Vec<&str> {
    let mut ordered: Vec<&str> = Vec::with_capacity(file.types.len());
    let mut placed: HashSet<&str> = HashSet::new();

    for name in file.types.keys() {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = Some(name.as_str());
        while let Some(type_name) = current {
            if placed.contains(type_name) || chain.contains(&type_name) {
                break;
            }
            let Some(decl) = file.types.get(type_name) else {
                break;
            };
            chain.push(type_name);
            current = decl.extends.as_deref();
        }
        for type_name in chain.into_iter().rev() {
            placed.insert(type_name);
            ordered.push(type_name);
        }
    }
    ordered
}

/// Turn one type's declarations into a layer.
fn to_layer(type_name: &str, decl: &TypeDecl, sequencer: &mut Sequencer) -> Layer {
    let mut layer = Layer::new(type_name);
    for concern in Concern::ALL {
        for (name, raw) in decl.entries(concern) {
            match raw {
                RawDeclaration::Attributes(attributes) => {
                    let entry = sequencer.declare(name.clone(), attributes.clone());
                    layer.declare(concern, entry);
                }
                // `true` is rejected by validation
                RawDeclaration::Flag(_) => layer.remove(concern, name.clone()),
            }
        }
        if let Some(order) = decl.order(concern) {
            layer.set_order(concern, order.to_vec());
        }
    }
    layer
}

/// A removal in a type without a parent has nothing to remove.
fn root_removal_warnings(type_name: &str, decl: &TypeDecl) -> Vec<ConfigWarning> {
    Concern::ALL
        .into_iter()
        .flat_map(|concern| {
            decl.entries(concern)
                .iter()
                .filter(|(_, raw)| raw.is_removal())
                .map(move |(name, _)| ConfigWarning {
                    message: format!(
                        "{concern} entry '{name}' is removed but '{type_name}' extends nothing"
                    ),
                    type_name: type_name.to_string(),
                })
        })
        .collect()
}
