//! core::registry
//!
//! Registry of configuration types.
//!
//! # Overview
//!
//! Each configuration type contributes one [`Layer`] and names at most one
//! parent, so every type has a linear chain of ancestors. The registry
//! walks that chain to build the root-to-leaf hierarchy the resolver
//! expects, and memoizes the result per type.
//!
//! # Concurrency
//!
//! Types are immutable once defined, so resolution results can be shared
//! process-wide. The cache sits behind an `RwLock`; two threads resolving
//! the same type at once may both compute it, which is harmless since
//! resolution is pure, and the first stored result wins.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tabset::core::context::PageContext;
//! use tabset::core::registry::ConfigRegistry;
//!
//! let mut registry = ConfigRegistry::new();
//! let base = registry
//!     .layer("Base")
//!     .tab("main", json!({"name": "Main"}))
//!     .build()
//!     .unwrap();
//! registry.define(None, base).unwrap();
//!
//! let derived = registry
//!     .layer("Derived")
//!     .tab("extra", json!({"name": "Extra"}))
//!     .build()
//!     .unwrap();
//! registry.define(Some("Base"), derived).unwrap();
//!
//! let resolved = registry.resolved("Derived").unwrap();
//! assert_eq!(resolved.tabs.len(), 2);
//!
//! let page = registry.page_config("Derived", PageContext::new()).unwrap();
//! assert_eq!(page.tabs().unwrap().count(), 2);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use super::context::PageContext;
use super::entry::Sequencer;
use super::layer::{Layer, LayerBuilder};
use super::page::PageConfig;
use super::resolve::ResolvedPageConfig;

/// Errors from registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown configuration type '{0}'")]
    UnknownType(String),

    #[error("configuration type '{0}' is already defined")]
    DuplicateType(String),

    #[error("configuration type '{child}' extends unknown type '{parent}'")]
    UnknownParent { child: String, parent: String },

    #[error("inheritance cycle through configuration type '{0}'")]
    InheritanceCycle(String),
}

#[derive(Debug)]
struct TypeDef {
    parent: Option<String>,
    layer: Arc<Layer>,
}

/// Configuration types and their memoized resolutions.
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    types: IndexMap<String, TypeDef>,
    sequencer: Sequencer,
    cache: RwLock<HashMap<String, Arc<ResolvedPageConfig>>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a layer whose entries draw sequence numbers from this
    /// registry, so declaration order is global across all its types.
    pub fn layer(&mut self, type_name: impl Into<String>) -> LayerBuilder<'_> {
        LayerBuilder::new(type_name, &mut self.sequencer)
    }

    /// The registry's sequencer, for callers building layers themselves.
    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    /// Define a configuration type from its layer.
    ///
    /// The type is named by `layer.name`. The parent must already be
    /// defined, which rules out cycles among types defined this way.
    ///
    /// # Errors
    ///
    /// - `DuplicateType` if the name is taken
    /// - `UnknownParent` if `parent` is not defined
    pub fn define(&mut self, parent: Option<&str>, layer: Layer) -> Result<(), RegistryError> {
        let name = layer.name.clone();
        if self.types.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }
        if let Some(parent) = parent {
            if !self.types.contains_key(parent) {
                return Err(RegistryError::UnknownParent {
                    child: name,
                    parent: parent.to_string(),
                });
            }
        }

        debug!(type_name = %name, parent = ?parent, "defined configuration type");
        self.types.insert(
            name,
            TypeDef {
                parent: parent.map(str::to_string),
                layer: Arc::new(layer),
            },
        );
        Ok(())
    }

    /// Define a type whose parent may be defined later.
    ///
    /// Used when loading declarations in bulk; call
    /// [`validate`](Self::validate) once everything is in.
    pub(crate) fn define_unchecked(&mut self, parent: Option<String>, layer: Layer) -> Result<(), RegistryError> {
        let name = layer.name.clone();
        if self.types.contains_key(&name) {
            return Err(RegistryError::DuplicateType(name));
        }
        self.types.insert(
            name,
            TypeDef {
                parent,
                layer: Arc::new(layer),
            },
        );
        Ok(())
    }

    /// Check that every type's ancestor chain is complete and acyclic.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for name in self.types.keys() {
            self.hierarchy(name)?;
        }
        Ok(())
    }

    /// Whether a type is defined.
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Defined type names, in definition order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// The layers of a type, root ancestor first.
    ///
    /// # Errors
    ///
    /// `UnknownType`, `UnknownParent` or `InheritanceCycle`.
    pub fn hierarchy(&self, type_name: &str) -> Result<Vec<Arc<Layer>>, RegistryError> {
        let mut chain: Vec<Arc<Layer>> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = type_name;

        loop {
            if !seen.insert(current) {
                return Err(RegistryError::InheritanceCycle(current.to_string()));
            }
            let def = self.types.get(current).ok_or_else(|| {
                match chain.last() {
                    // The child that named `current` as its parent
                    Some(child) => RegistryError::UnknownParent {
                        child: child.name.clone(),
                        parent: current.to_string(),
                    },
                    None => RegistryError::UnknownType(current.to_string()),
                }
            })?;
            chain.push(Arc::clone(&def.layer));
            match &def.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Resolved declarations for a type, computed once and cached.
    pub fn resolved(&self, type_name: &str) -> Result<Arc<ResolvedPageConfig>, RegistryError> {
        if let Ok(cache) = self.cache.read() {
            if let Some(resolved) = cache.get(type_name) {
                debug!(type_name = %type_name, "resolution cache hit");
                return Ok(Arc::clone(resolved));
            }
        }

        let chain = self.hierarchy(type_name)?;
        let layers: Vec<&Layer> = chain.iter().map(|layer| layer.as_ref()).collect();
        let resolved = Arc::new(ResolvedPageConfig::resolve(&layers));
        debug!(type_name = %type_name, layers = layers.len(), "resolved configuration type");

        match self.cache.write() {
            Ok(mut cache) => Ok(Arc::clone(
                cache.entry(type_name.to_string()).or_insert(resolved),
            )),
            // A poisoned cache only costs memoization
            Err(_) => Ok(resolved),
        }
    }

    /// A fresh request-scoped page configuration for a type.
    pub fn page_config(
        &self,
        type_name: &str,
        context: PageContext,
    ) -> Result<PageConfig, RegistryError> {
        Ok(PageConfig::new(type_name, self.resolved(type_name)?, context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn abc_registry() -> ConfigRegistry {
        let mut registry = ConfigRegistry::new();
        let a = registry
            .layer("A")
            .col("a_col", json!({"name": "a_col"}))
            .build()
            .unwrap();
        registry.define(None, a).unwrap();
        let ab = registry
            .layer("AB")
            .col("b_col", json!({"name": "b_col"}))
            .build()
            .unwrap();
        registry.define(Some("A"), ab).unwrap();
        let ad = registry
            .layer("AD")
            .col("d_col", json!({"name": "d_col"}))
            .build()
            .unwrap();
        registry.define(Some("A"), ad).unwrap();
        let abc = registry
            .layer("ABC")
            .col("c_col", json!({"name": "c_col"}))
            .build()
            .unwrap();
        registry.define(Some("AB"), abc).unwrap();
        registry
    }

    fn col_names(registry: &ConfigRegistry, ty: &str) -> Vec<String> {
        registry
            .resolved(ty)
            .unwrap()
            .cols
            .order()
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn hierarchy_is_root_first() {
        let registry = abc_registry();
        let names: Vec<String> = registry
            .hierarchy("ABC")
            .unwrap()
            .iter()
            .map(|l| l.name.clone())
            .collect();
        assert_eq!(names, vec!["A", "AB", "ABC"]);
    }

    #[test]
    fn each_type_sees_only_its_chain() {
        let registry = abc_registry();
        assert_eq!(col_names(&registry, "A"), vec!["a_col"]);
        assert_eq!(col_names(&registry, "AB"), vec!["a_col", "b_col"]);
        assert_eq!(col_names(&registry, "AD"), vec!["a_col", "d_col"]);
        assert_eq!(col_names(&registry, "ABC"), vec!["a_col", "b_col", "c_col"]);
    }

    #[test]
    fn resolution_is_memoized() {
        let registry = abc_registry();
        let first = registry.resolved("ABC").unwrap();
        let second = registry.resolved("ABC").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_type() {
        let registry = abc_registry();
        assert_eq!(
            registry.resolved("Nope").unwrap_err(),
            RegistryError::UnknownType("Nope".to_string())
        );
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut registry = abc_registry();
        let again = registry.layer("A").build().unwrap();
        assert_eq!(
            registry.define(None, again).unwrap_err(),
            RegistryError::DuplicateType("A".to_string())
        );
    }

    #[test]
    fn undefined_parent_rejected() {
        let mut registry = ConfigRegistry::new();
        let orphan = registry.layer("Orphan").build().unwrap();
        assert!(matches!(
            registry.define(Some("Missing"), orphan),
            Err(RegistryError::UnknownParent { .. })
        ));
    }

    #[test]
    fn cycle_detected() {
        let mut registry = ConfigRegistry::new();
        let x = registry.layer("X").build().unwrap();
        let y = registry.layer("Y").build().unwrap();
        registry.define_unchecked(Some("Y".into()), x).unwrap();
        registry.define_unchecked(Some("X".into()), y).unwrap();

        assert!(matches!(
            registry.validate(),
            Err(RegistryError::InheritanceCycle(_))
        ));
    }

    #[test]
    fn dangling_parent_detected_on_validate() {
        let mut registry = ConfigRegistry::new();
        let x = registry.layer("X").build().unwrap();
        registry.define_unchecked(Some("Ghost".into()), x).unwrap();

        assert_eq!(
            registry.validate().unwrap_err(),
            RegistryError::UnknownParent {
                child: "X".to_string(),
                parent: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn page_configs_are_fresh_per_call() {
        let registry = abc_registry();
        let one = registry.page_config("AB", PageContext::new()).unwrap();
        let two = registry.page_config("AB", PageContext::new()).unwrap();
        assert_eq!(one.type_name(), "AB");
        assert!(!std::ptr::eq(one.tree().unwrap(), two.tree().unwrap()));
    }

    #[test]
    fn type_names_in_definition_order() {
        let registry = abc_registry();
        let names: Vec<&str> = registry.type_names().collect();
        assert_eq!(names, vec!["A", "AB", "AD", "ABC"]);
        assert!(registry.contains("AD"));
    }
}
