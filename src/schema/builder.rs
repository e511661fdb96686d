//! Schema Builder: populates a Schema Container from a Model Document.
//!
//! Entities become tables in two passes. The first pass creates every table
//! with its columns, primary key, unique/check constraints and indexes. The
//! second pass resolves relationships into foreign keys, so an entity may
//! reference one declared later in the document.

use serde_json::Value;

use super::definition::{
    Column, ColumnType, Constraint, ConstraintKind, DefaultValue, ForeignReference, Index, Schema,
    Table, TypeKind,
};
use crate::model::{EntityDef, FieldDef, ModelDocument, ModelError, RelationshipDef};

impl Schema {
    /// Build a new Schema Container from a Model Document.
    pub fn from_document(document: &ModelDocument) -> Result<Self, ModelError> {
        let mut schema = Schema::new();
        populate(document, &mut schema)?;
        Ok(schema)
    }
}

/// Populate `schema` with one table per entity of `document`.
///
/// On error the container is left partially populated and must be discarded.
pub fn populate(document: &ModelDocument, schema: &mut Schema) -> Result<(), ModelError> {
    for entity in &document.entities {
        let table = build_table(entity)?;
        tracing::debug!(
            table = %table.name,
            columns = table.columns.len(),
            indexes = table.indexes.len(),
            "built table"
        );
        schema.add_table(table)?;
    }

    for entity in &document.entities {
        for relationship in &entity.relationships {
            let constraint = build_foreign_key(schema, entity, relationship)?;
            if let Some(table) = schema.table_mut(&entity.name) {
                // keep primary key and foreign keys ahead of uniques and checks
                let position = table
                    .constraints
                    .iter()
                    .take_while(|c| {
                        matches!(c.kind(), ConstraintKind::PrimaryKey | ConstraintKind::ForeignKey)
                    })
                    .count();
                table.constraints.insert(position, constraint);
            }
        }
    }

    tracing::info!(
        model = document.name.as_deref().unwrap_or("<unnamed>"),
        version = document.version.as_deref().unwrap_or("<unversioned>"),
        tables = schema.len(),
        "schema constructed"
    );
    Ok(())
}

fn build_table(entity: &EntityDef) -> Result<Table, ModelError> {
    let mut table = Table::new(&entity.name);

    for field in &entity.fields {
        if table.has_column(&field.name) {
            return Err(ModelError::DuplicateField {
                entity: entity.name.clone(),
                field: field.name.clone(),
            });
        }
        table.columns.push(build_column(entity, field)?);
    }

    let identity: Vec<String> = entity
        .fields
        .iter()
        .filter(|f| f.identity)
        .map(|f| f.name.clone())
        .collect();
    if !identity.is_empty() {
        table
            .constraints
            .push(Constraint::primary_key(identity).named(entity.primary_key_name.clone()));
    }

    for unique in &entity.uniques {
        let object = describe("Unique constraint", &unique.name);
        let columns = checked_fields(&table, &object, &unique.fields)?;
        table
            .constraints
            .push(Constraint::unique(columns).named(unique.name.clone()));
    }

    for check in &entity.checks {
        let object = describe("Check constraint", &check.name);
        let columns = checked_fields(&table, &object, &check.fields)?;
        table
            .constraints
            .push(Constraint::check(columns, check.expression.clone()).named(check.name.clone()));
    }

    for field in &entity.fields {
        if field.unique && !field.identity {
            table.indexes.push(Index {
                name: format!("ux_{}_{}", entity.name, field.name),
                table: entity.name.clone(),
                columns: vec![field.name.clone()],
                unique: true,
            });
        } else if field.indexed {
            table.indexes.push(Index {
                name: format!("ix_{}_{}", entity.name, field.name),
                table: entity.name.clone(),
                columns: vec![field.name.clone()],
                unique: false,
            });
        }
    }

    for index in &entity.indexes {
        let object = describe("Index", &index.name);
        let columns = checked_fields(&table, &object, &index.fields)?;
        let name = index
            .name
            .clone()
            .unwrap_or_else(|| format!("ix_{}_{}", entity.name, columns.join("_")));
        table.indexes.push(Index {
            name,
            table: entity.name.clone(),
            columns,
            unique: index.unique,
        });
    }

    Ok(table)
}

fn build_column(entity: &EntityDef, field: &FieldDef) -> Result<Column, ModelError> {
    let kind = TypeKind::from_name(&field.type_name).ok_or_else(|| ModelError::UnsupportedType {
        entity: entity.name.clone(),
        field: field.name.clone(),
        type_name: field.type_name.clone(),
    })?;

    let column_type = ColumnType::from_parts(kind, field.length, field.precision, field.scale);
    let mut column = Column::new(&field.name, column_type);
    column.nullable = field.is_nullable();
    column.default = convert_default(entity, field)?;
    Ok(column)
}

fn convert_default(entity: &EntityDef, field: &FieldDef) -> Result<Option<DefaultValue>, ModelError> {
    match &field.default {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(DefaultValue::Text(s.clone()))),
        Value::Number(n) => Ok(Some(DefaultValue::Number(n.to_string()))),
        Value::Bool(b) => Ok(Some(DefaultValue::Boolean(*b))),
        Value::Array(_) | Value::Object(_) => Err(ModelError::InvalidDefault {
            entity: entity.name.clone(),
            field: field.name.clone(),
            reason: "expected a string, number or boolean".to_string(),
        }),
    }
}

fn build_foreign_key(
    schema: &Schema,
    entity: &EntityDef,
    relationship: &RelationshipDef,
) -> Result<Constraint, ModelError> {
    let label = relationship.label();

    let target = schema
        .table(&relationship.references)
        .ok_or_else(|| ModelError::UnknownEntity {
            entity: entity.name.clone(),
            relationship: label.clone(),
            target: relationship.references.clone(),
        })?;

    let owner = schema
        .table(&entity.name)
        .ok_or_else(|| ModelError::UnknownEntity {
            entity: entity.name.clone(),
            relationship: label.clone(),
            target: entity.name.clone(),
        })?;
    let columns = checked_fields(owner, &format!("Relationship '{}'", label), &relationship.fields)?;

    let target_columns = target.primary_key_columns();
    if target_columns.is_empty() {
        return Err(ModelError::MissingPrimaryKey {
            entity: entity.name.clone(),
            relationship: label,
            target: target.name.clone(),
        });
    }
    if target_columns.len() != columns.len() {
        return Err(ModelError::ReferenceArity {
            entity: entity.name.clone(),
            relationship: label,
            target: target.name.clone(),
            expected: target_columns.len(),
            found: columns.len(),
        });
    }

    let reference = ForeignReference {
        table: target.name.clone(),
        columns: target_columns.to_vec(),
        on_delete: relationship.on_delete,
        on_update: relationship.on_update,
    };
    Ok(Constraint::foreign_key(columns, reference).named(relationship.name.clone()))
}

/// Verify a field list is non-empty and every field exists in `table`.
fn checked_fields(table: &Table, object: &str, fields: &[String]) -> Result<Vec<String>, ModelError> {
    if fields.is_empty() {
        return Err(ModelError::EmptyFieldList {
            entity: table.name.clone(),
            object: object.to_string(),
        });
    }
    if let Some(missing) = fields.iter().find(|f| !table.has_column(f)) {
        return Err(ModelError::UnknownField {
            entity: table.name.clone(),
            object: object.to_string(),
            field: missing.clone(),
        });
    }
    Ok(fields.to_vec())
}

fn describe(kind: &str, name: &Option<String>) -> String {
    match name {
        Some(name) => format!("{} '{}'", kind, name),
        None => kind.to_string(),
    }
}
