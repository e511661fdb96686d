//! DDL rendering and emission.
//!
//! - `compiler.rs` renders one statement at a time (CREATE TABLE, ADD
//!   CONSTRAINT, CREATE INDEX) with no terminator.
//! - `emitter.rs` walks the schema in dependency order, applies category
//!   exclusions and terminates and joins the statements.

mod compiler;
mod emitter;

pub use compiler::DdlCompiler;
pub use emitter::{DdlEmitter, EmitOptions, Statements};

use thiserror::Error;

use crate::dialect::Backend;
use crate::model::ReferentialAction;

/// A statement the target backend cannot express.
///
/// Aborts the whole run; no partial DDL is produced.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{backend} has no equivalent for type '{type_name}' of column '{table}.{column}'")]
    UnsupportedType {
        backend: Backend,
        table: String,
        column: String,
        type_name: &'static str,
    },

    #[error("{backend} requires a length for string column '{table}.{column}'")]
    MissingLength {
        backend: Backend,
        table: String,
        column: String,
    },

    #[error("{backend} cannot add {constraint} to table '{table}' with ALTER TABLE; exclude constraints for this backend")]
    AddConstraintUnsupported {
        backend: Backend,
        table: String,
        constraint: String,
    },

    #[error("{backend} does not support {clause} {action} ({constraint} on table '{table}')")]
    UnsupportedReferentialAction {
        backend: Backend,
        table: String,
        constraint: String,
        clause: &'static str,
        action: ReferentialAction,
    },

    #[error("Identifier '{identifier}' is {length} long; {backend} allows at most {max}")]
    IdentifierTooLong {
        backend: Backend,
        identifier: String,
        length: usize,
        max: usize,
    },

    #[error("{object} on table '{table}' references unknown column '{column}'")]
    UnknownColumn {
        table: String,
        object: String,
        column: String,
    },

    #[error("{constraint} on table '{table}' references unknown table '{target}'")]
    UnknownTable {
        table: String,
        constraint: String,
        target: String,
    },
}
