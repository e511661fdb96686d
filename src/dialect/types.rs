//! Default SQL type names per backend, used when no coercion rule applies.

use super::Backend;
use crate::schema::ColumnType;

/// Why a type has no default rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeIssue {
    NoEquivalent,
    LengthRequired,
}

pub(crate) fn default_type_sql(backend: Backend, ty: &ColumnType) -> Result<String, TypeIssue> {
    let sql = match ty {
        ColumnType::Integer => "INTEGER".to_string(),
        ColumnType::BigInteger => match backend {
            Backend::Oracle => "NUMBER(19)".to_string(),
            _ => "BIGINT".to_string(),
        },
        ColumnType::SmallInteger => "SMALLINT".to_string(),
        ColumnType::Decimal { precision, scale } => match (precision, scale) {
            (Some(p), Some(s)) => format!("NUMERIC({}, {})", p, s),
            (Some(p), None) => format!("NUMERIC({})", p),
            _ => "NUMERIC".to_string(),
        },
        ColumnType::Float { precision } => match (backend, precision) {
            (Backend::Sqlite, _) | (_, None) => "FLOAT".to_string(),
            (_, Some(p)) => format!("FLOAT({})", p),
        },
        ColumnType::String { length } => {
            let name = match backend {
                Backend::Oracle => "VARCHAR2",
                _ => "VARCHAR",
            };
            match length {
                Some(n) => format!("{}({})", name, n),
                None if matches!(backend, Backend::Oracle | Backend::MySql) => {
                    return Err(TypeIssue::LengthRequired);
                }
                None => name.to_string(),
            }
        }
        ColumnType::Text => match backend {
            Backend::Oracle => "CLOB".to_string(),
            _ => "TEXT".to_string(),
        },
        ColumnType::Boolean => match backend {
            Backend::Oracle => "SMALLINT".to_string(),
            Backend::MySql => "BOOL".to_string(),
            _ => "BOOLEAN".to_string(),
        },
        ColumnType::Date => "DATE".to_string(),
        ColumnType::Time => match backend {
            Backend::Oracle => return Err(TypeIssue::NoEquivalent),
            _ => "TIME".to_string(),
        },
        ColumnType::DateTime => match backend {
            Backend::Postgres => "TIMESTAMP WITHOUT TIME ZONE".to_string(),
            Backend::Oracle => "DATE".to_string(),
            _ => "DATETIME".to_string(),
        },
        ColumnType::Binary => match backend {
            Backend::Postgres => "BYTEA".to_string(),
            _ => "BLOB".to_string(),
        },
    };
    Ok(sql)
}
