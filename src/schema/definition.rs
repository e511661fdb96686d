//! Core schema definition types.
//!
//! Provides the dialect-neutral relational representation that the schema
//! builder populates and the DDL compiler renders.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ModelError, ReferentialAction};

/// Discriminant of a [`ColumnType`], used as the key of type coercion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    Integer,
    BigInteger,
    SmallInteger,
    Decimal,
    Float,
    String,
    Text,
    Boolean,
    Date,
    Time,
    DateTime,
    Binary,
}

impl TypeKind {
    /// Resolve a Model Document type name (case-insensitive, with aliases).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "integer" | "int" => Some(TypeKind::Integer),
            "biginteger" | "bigint" => Some(TypeKind::BigInteger),
            "smallinteger" | "smallint" => Some(TypeKind::SmallInteger),
            "decimal" | "numeric" | "number" => Some(TypeKind::Decimal),
            "float" | "double" | "real" => Some(TypeKind::Float),
            "string" | "varchar" => Some(TypeKind::String),
            "text" | "clob" => Some(TypeKind::Text),
            "boolean" | "bool" => Some(TypeKind::Boolean),
            "date" => Some(TypeKind::Date),
            "time" => Some(TypeKind::Time),
            "datetime" | "timestamp" => Some(TypeKind::DateTime),
            "binary" | "blob" => Some(TypeKind::Binary),
            _ => None,
        }
    }

    /// Canonical abstract type name.
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Integer => "integer",
            TypeKind::BigInteger => "biginteger",
            TypeKind::SmallInteger => "smallinteger",
            TypeKind::Decimal => "decimal",
            TypeKind::Float => "float",
            TypeKind::String => "string",
            TypeKind::Text => "text",
            TypeKind::Boolean => "boolean",
            TypeKind::Date => "date",
            TypeKind::Time => "time",
            TypeKind::DateTime => "datetime",
            TypeKind::Binary => "binary",
        }
    }
}

/// Abstract column type with its length/precision parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    BigInteger,
    SmallInteger,
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Float {
        precision: Option<u32>,
    },
    /// Variable-length string
    String {
        length: Option<u32>,
    },
    Text,
    Boolean,
    Date,
    Time,
    DateTime,
    Binary,
}

impl ColumnType {
    /// Build a column type from its kind and the document's size hints.
    ///
    /// Hints that do not apply to the kind are ignored.
    pub fn from_parts(
        kind: TypeKind,
        length: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Self {
        match kind {
            TypeKind::Integer => ColumnType::Integer,
            TypeKind::BigInteger => ColumnType::BigInteger,
            TypeKind::SmallInteger => ColumnType::SmallInteger,
            TypeKind::Decimal => ColumnType::Decimal { precision, scale },
            TypeKind::Float => ColumnType::Float { precision },
            TypeKind::String => ColumnType::String { length },
            TypeKind::Text => ColumnType::Text,
            TypeKind::Boolean => ColumnType::Boolean,
            TypeKind::Date => ColumnType::Date,
            TypeKind::Time => ColumnType::Time,
            TypeKind::DateTime => ColumnType::DateTime,
            TypeKind::Binary => ColumnType::Binary,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            ColumnType::Integer => TypeKind::Integer,
            ColumnType::BigInteger => TypeKind::BigInteger,
            ColumnType::SmallInteger => TypeKind::SmallInteger,
            ColumnType::Decimal { .. } => TypeKind::Decimal,
            ColumnType::Float { .. } => TypeKind::Float,
            ColumnType::String { .. } => TypeKind::String,
            ColumnType::Text => TypeKind::Text,
            ColumnType::Boolean => TypeKind::Boolean,
            ColumnType::Date => TypeKind::Date,
            ColumnType::Time => TypeKind::Time,
            ColumnType::DateTime => TypeKind::DateTime,
            ColumnType::Binary => TypeKind::Binary,
        }
    }
}

/// Server-side default value of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// String literal, rendered quoted
    Text(String),
    /// Numeric literal, rendered verbatim
    Number(String),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
}

impl Column {
    /// New nullable column without a default.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Constraint kind, used as the key of constraint deferral rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
}

impl ConstraintKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "primary key",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Unique => "unique constraint",
            ConstraintKind::Check => "check constraint",
        }
    }
}

/// Target of a foreign-key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignReference {
    pub table: String,
    pub columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

/// Kind-specific part of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintBody {
    PrimaryKey,
    ForeignKey(ForeignReference),
    Unique,
    Check { expression: String },
}

/// Deferred-evaluation flag pair.
///
/// Only set by a dialect's deferral rules on a render-time copy of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deferral {
    pub deferrable: bool,
    pub initially_deferred: bool,
}

impl Deferral {
    pub const DEFERRED: Deferral = Deferral {
        deferrable: true,
        initially_deferred: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub body: ConstraintBody,
    pub deferral: Option<Deferral>,
}

impl Constraint {
    pub fn primary_key(columns: Vec<String>) -> Self {
        Self::with_body(columns, ConstraintBody::PrimaryKey)
    }

    pub fn foreign_key(columns: Vec<String>, reference: ForeignReference) -> Self {
        Self::with_body(columns, ConstraintBody::ForeignKey(reference))
    }

    pub fn unique(columns: Vec<String>) -> Self {
        Self::with_body(columns, ConstraintBody::Unique)
    }

    pub fn check(columns: Vec<String>, expression: impl Into<String>) -> Self {
        Self::with_body(
            columns,
            ConstraintBody::Check {
                expression: expression.into(),
            },
        )
    }

    fn with_body(columns: Vec<String>, body: ConstraintBody) -> Self {
        Self {
            name: None,
            columns,
            body,
            deferral: None,
        }
    }

    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn kind(&self) -> ConstraintKind {
        match self.body {
            ConstraintBody::PrimaryKey => ConstraintKind::PrimaryKey,
            ConstraintBody::ForeignKey(_) => ConstraintKind::ForeignKey,
            ConstraintBody::Unique => ConstraintKind::Unique,
            ConstraintBody::Check { .. } => ConstraintKind::Check,
        }
    }

    /// Referenced table name, for foreign keys.
    pub fn referenced_table(&self) -> Option<&str> {
        match &self.body {
            ConstraintBody::ForeignKey(reference) => Some(reference.table.as_str()),
            _ => None,
        }
    }

    /// Name or description used in error messages.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} ({})", self.kind().label(), self.columns.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    /// Owning table name
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// A table: ordered columns plus its constraints and indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_key(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.kind() == ConstraintKind::PrimaryKey)
    }

    /// Primary-key column names, empty when the table has none.
    pub fn primary_key_columns(&self) -> &[String] {
        self.primary_key().map(|pk| pk.columns.as_slice()).unwrap_or(&[])
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.kind() == ConstraintKind::ForeignKey)
    }

    /// Tables this table references through foreign keys, excluding itself.
    pub fn referenced_tables(&self) -> BTreeSet<&str> {
        self.foreign_keys()
            .filter_map(Constraint::referenced_table)
            .filter(|target| *target != self.name)
            .collect()
    }
}

/// Schema Container: table name to table, keys unique.
///
/// Owned by exactly one DDL generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    tables: BTreeMap<String, Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, rejecting a name that is already present.
    pub fn add_table(&mut self, table: Table) -> Result<&mut Table, ModelError> {
        use std::collections::btree_map::Entry;

        match self.tables.entry(table.name.clone()) {
            Entry::Occupied(_) => Err(ModelError::DuplicateEntity { name: table.name }),
            Entry::Vacant(slot) => Ok(slot.insert(table)),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Foreign-key dependencies: table name to the tables it references.
    ///
    /// Self references and references to tables outside the container are left out.
    pub fn dependencies(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        self.tables
            .values()
            .map(|table| {
                let targets = table
                    .referenced_tables()
                    .into_iter()
                    .filter(|target| self.tables.contains_key(*target))
                    .collect();
                (table.name.as_str(), targets)
            })
            .collect()
    }
}
