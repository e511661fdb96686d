//! Serde types for the JSON Model Document.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::io::Read;

use super::ModelError;

/// Top-level Model Document.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDocument {
    /// Model name (e.g., "omop")
    #[serde(default)]
    pub name: Option<String>,

    /// Model version (e.g., "5.0.0")
    #[serde(default)]
    pub version: Option<String>,

    /// Entity definitions, in document order
    #[serde(alias = "tables")]
    pub entities: Vec<EntityDef>,
}

impl ModelDocument {
    /// Parse a Model Document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a Model Document from any reader (file, stdin).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// One entity; becomes one table.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDef {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldDef>,

    /// Optional name for the primary-key constraint
    #[serde(default)]
    pub primary_key_name: Option<String>,

    #[serde(default)]
    pub relationships: Vec<RelationshipDef>,

    #[serde(default)]
    pub uniques: Vec<UniqueDef>,

    #[serde(default)]
    pub checks: Vec<CheckDef>,

    #[serde(default)]
    pub indexes: Vec<IndexDef>,
}

/// One field; becomes one column.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub name: String,

    /// Abstract type name, resolved by the schema builder
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub length: Option<u32>,

    #[serde(default)]
    pub precision: Option<u32>,

    #[serde(default)]
    pub scale: Option<u32>,

    /// NOT NULL when true
    #[serde(default)]
    pub required: bool,

    /// Member of the entity's primary key
    #[serde(default, alias = "primary_key")]
    pub identity: bool,

    /// Server default: JSON string, number, boolean or null
    #[serde(default)]
    pub default: Value,

    #[serde(default)]
    pub indexed: bool,

    #[serde(default)]
    pub unique: bool,
}

impl FieldDef {
    /// Columns are nullable unless required or part of the identity.
    pub fn is_nullable(&self) -> bool {
        !(self.required || self.identity)
    }
}

/// Relationship cardinality. Informational only; it does not change the DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    #[serde(alias = "one_to_one")]
    OneToOne,
    #[default]
    #[serde(alias = "many_to_one")]
    ManyToOne,
}

/// Referential action for ON DELETE / ON UPDATE clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

impl TryFrom<String> for ReferentialAction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "CASCADE" => Ok(ReferentialAction::Cascade),
            "SET NULL" => Ok(ReferentialAction::SetNull),
            "SET DEFAULT" => Ok(ReferentialAction::SetDefault),
            "RESTRICT" => Ok(ReferentialAction::Restrict),
            "NO ACTION" => Ok(ReferentialAction::NoAction),
            _ => Err(format!("unknown referential action '{}'", value)),
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Foreign reference from this entity to another entity's primary key.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipDef {
    #[serde(default)]
    pub name: Option<String>,

    /// Referencing fields in the owning entity
    pub fields: Vec<String>,

    /// Name of the referenced entity
    pub references: String,

    #[serde(default)]
    pub cardinality: Cardinality,

    #[serde(default)]
    pub on_delete: Option<ReferentialAction>,

    #[serde(default)]
    pub on_update: Option<ReferentialAction>,
}

impl RelationshipDef {
    /// Label used in error messages: the declared name or the target entity.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("-> {}", self.references))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniqueDef {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckDef {
    #[serde(default)]
    pub name: Option<String>,
    /// Fields the expression covers
    pub fields: Vec<String>,
    pub expression: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexDef {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}
