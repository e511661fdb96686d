//! Dialect-neutral relational schema.
//!
//! The schema system consists of three parts:
//!
//! 1. **Core Types** (`definition.rs`):
//!    - `Schema` - the container: table name to `Table`, names unique
//!    - `Table`, `Column`, `Constraint`, `Index`
//!    - `ColumnType` / `TypeKind` - the closed abstract type set
//!
//! 2. **Construction** (`builder.rs`):
//!    - `populate` / `Schema::from_document` - Model Document to tables
//!
//! 3. **Ordering** (`ordering.rs`):
//!    - `sort_tables` / `Schema::sorted_tables` - referenced tables first,
//!      ties broken by name
//!
//! A schema is built once per run and is read-only afterwards. Dialect
//! specifics (type names, deferral flags) are applied only while rendering.

mod builder;
mod definition;
mod ordering;

pub use builder::populate;
pub use definition::{
    Column, ColumnType, Constraint, ConstraintBody, ConstraintKind, DefaultValue, Deferral,
    ForeignReference, Index, Schema, Table, TypeKind,
};
pub use ordering::{TableOrder, sort_tables};
