//! Tabset - layered tab, column and fieldset configuration for admin forms
//!
//! Tabset organizes the fields of a record-editing form into fieldsets,
//! fieldsets into columns and columns into tabs. Configuration types are
//! declared as layers; a derived type adds, overrides or removes entries of
//! its parent without restating them.
//!
//! # Architecture
//!
//! The codebase follows a strict pipeline:
//!
//! - [`core::layer`] - Declarations per configuration type (data, not types)
//! - [`core::resolve`] - Merge root-to-leaf layers into resolved declarations
//! - [`core::registry`] - Parent chains and per-type memoized resolution
//! - [`core::page`] - Assemble a request-scoped Tab → Column → Fieldset tree
//! - [`core::project`] / [`core::render`] - Shapes handed to the renderer
//!
//! Rendering, request handling and persistence belong to the hosting
//! admin; this crate only decides which sections exist, in what order and
//! with what attributes.
//!
//! # Correctness Invariants
//!
//! 1. Resolving the same hierarchy twice yields identical results
//! 2. A derived declaration overrides only the keys it names
//! 3. A removed entry stays removed unless a later layer declares it again
//! 4. Without an explicit order list, entries come out in declaration order

pub mod core;
