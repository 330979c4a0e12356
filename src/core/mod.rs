//! core
//!
//! Declarations, resolution and the live page model.
//!
//! # Modules
//!
//! - [`types`] - Strong types: EntryName, Sequence, Concern
//! - [`entry`] - Ordered entries and the sequencer
//! - [`layer`] - Per-type declaration layers with tombstones
//! - [`resolve`] - Layered configuration resolver
//! - [`fieldset`], [`column`], [`tab`] - The live page model
//! - [`page`] - Page assembly and request-scoped page configs
//! - [`project`] - Projection into the renderer's fieldset shape
//! - [`render`] - Per-request rendering plan
//! - [`context`] - Request context supplied by the host
//! - [`registry`] - Configuration types and memoized resolution
//! - [`config`] - TOML declaration files
//! - [`errors`] - Assembly and rendering errors
//!
//! # Design Principles
//!
//! - Declarations are data; inheritance is an ordered list of layers
//! - Resolution is pure and permissive, assembly is strict
//! - Type-level results are shared, page trees are per request

pub mod column;
pub mod config;
pub mod context;
pub mod entry;
pub mod errors;
pub mod fieldset;
pub mod layer;
pub mod page;
pub mod project;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod tab;
pub mod types;
