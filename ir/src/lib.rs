//! Schema snapshot IR for pool generation.
//!
//! Zero-logic data structures shared between:
//! - the codegen library (extraction + emission)
//! - the codegen binary (loads snapshots from JSON)
//!
//! Three layers:
//! 1. Types    — `FieldType`, the type language of field/method signatures
//! 2. Entities — field/method/mixin definitions per entity
//! 3. Registry — the full snapshot, finalized once before generation
//!
//! The registry is *data*, not a live runtime: the dynamic core exports
//! its bootstrapped state into this shape, and generation only ever reads
//! it. The one mutating operation is [`Registry::finalize`], which merges
//! mixin- and embed-contributed members into each entity exactly once.

pub mod ast;
pub mod entity;
pub mod registry;
pub mod types;

pub use ast::{AstEntry, AstIndex, MethodAstData, MethodRef};
pub use entity::{EntityDef, FieldDef, MethodDef};
pub use registry::{Registry, SchemaError};
pub use types::FieldType;
