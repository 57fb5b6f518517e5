//! Model definition and column-inference for the Slate workspace.
//!
//! One model definition serves two consumers at once: the storage layer gets
//! a table schema with exact column types and nullability, the validation
//! layer gets field specs with required/optional/default semantics. The two
//! systems have different defaulting rules; this crate holds the engine that
//! keeps their decisions consistent.
//!
//! # Design decisions
//!
//! - **Explicit definitions, no reflection**: models are declared through
//!   [`Model::builder`] and [`FieldDecl`], evaluated exactly once. Everything
//!   the engine needs is written down as builder calls; nothing is inferred
//!   from runtime introspection.
//! - **Composition over inheritance**: request/response variants of a model
//!   are projections ([`Model::projection`], [`Model::input_projection`]) of
//!   one canonical field set, not separate class hierarchies.
//! - **Caller-owned registry**: [`SchemaRegistry`] is a plain context object
//!   constructed at startup and passed to whatever needs the compiled
//!   schemas. No global state.
//! - **Independent column/field decisions**: nullability overrides apply to
//!   the column only; required-ness follows defaulting only. The layers may
//!   disagree for a single field, and the disagreement is settled by the
//!   storage backend at write time, not by refusing the definition.

mod decide;
mod descriptor;
mod emit;
mod error;
mod model;
mod registry;

pub use decide::{decide, Decision};
pub use descriptor::{resolve, DefaultRule, FieldDecl, FieldDescriptor};
pub use emit::{emit, ColumnSpec, FieldSpec, TableSchema};
pub use error::SchemaError;
pub use model::{Model, ModelBuilder};
pub use registry::SchemaRegistry;
