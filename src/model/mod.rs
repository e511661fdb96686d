//! Model Document input.
//!
//! The Model Document is the dialect-neutral JSON description of a data model:
//! entities with their fields, relationships, unique/check constraints and
//! indexes. It is read-only input to the schema builder.
//!
//! # Abstract Types
//!
//! | Document name | Aliases |
//! |---------------|---------|
//! | integer | int |
//! | biginteger | bigint |
//! | smallinteger | smallint |
//! | decimal | numeric, number |
//! | float | double, real |
//! | string | varchar |
//! | text | clob |
//! | boolean | bool |
//! | date | |
//! | time | |
//! | datetime | timestamp |
//! | binary | blob |

mod document;

pub use document::{
    Cardinality, CheckDef, EntityDef, FieldDef, IndexDef, ModelDocument, ReferentialAction,
    RelationshipDef, UniqueDef,
};

use thiserror::Error;

/// Errors raised when a Model Document cannot be turned into a valid table graph.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid model document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate entity name '{name}'")]
    DuplicateEntity { name: String },

    #[error("Duplicate field '{field}' in entity '{entity}'")]
    DuplicateField { entity: String, field: String },

    #[error("Field '{field}' in entity '{entity}' has unsupported type '{type_name}'")]
    UnsupportedType {
        entity: String,
        field: String,
        type_name: String,
    },

    #[error("Field '{field}' in entity '{entity}' has an invalid default value: {reason}")]
    InvalidDefault {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("Relationship '{relationship}' in entity '{entity}' references unknown entity '{target}'")]
    UnknownEntity {
        entity: String,
        relationship: String,
        target: String,
    },

    #[error("{object} in entity '{entity}' references unknown field '{field}'")]
    UnknownField {
        entity: String,
        object: String,
        field: String,
    },

    #[error("{object} in entity '{entity}' declares no fields")]
    EmptyFieldList { entity: String, object: String },

    #[error("Relationship '{relationship}' in entity '{entity}' targets entity '{target}', which declares no identity fields")]
    MissingPrimaryKey {
        entity: String,
        relationship: String,
        target: String,
    },

    #[error("Relationship '{relationship}' in entity '{entity}' has {found} field(s) but the primary key of '{target}' has {expected}")]
    ReferenceArity {
        entity: String,
        relationship: String,
        target: String,
        expected: usize,
        found: usize,
    },
}
