//! Type coercion and constraint deferral rules.
//!
//! Rules are plain functions kept in per-dialect tables keyed by abstract type
//! or constraint kind. A missing entry means the default rendering applies.

use std::collections::BTreeMap;

use super::Backend;
use crate::schema::{ColumnType, Constraint, ConstraintKind, Deferral, TypeKind};

/// Result of a type coercion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coercion {
    /// Final SQL type text
    Sql(String),
    /// Render this (possibly adjusted) type with the backend's default names
    Type(ColumnType),
}

/// Coercion rule for one abstract type.
pub type TypeRule = fn(&ColumnType) -> Coercion;

/// Deferral rule for one constraint kind, applied to a render-time copy.
pub type DeferralRule = fn(&mut Constraint);

/// Oracle has no native integer type of fixed precision.
pub fn oracle_integer(_: &ColumnType) -> Coercion {
    Coercion::Sql("NUMBER(10)".to_string())
}

pub fn oracle_decimal(_: &ColumnType) -> Coercion {
    Coercion::Sql("NUMBER".to_string())
}

/// MySQL rejects VARCHAR without a length. An absent or zero length becomes 255.
pub fn mysql_string(ty: &ColumnType) -> Coercion {
    match ty {
        ColumnType::String { length: None | Some(0) } => {
            Coercion::Type(ColumnType::String { length: Some(255) })
        }
        other => Coercion::Type(other.clone()),
    }
}

pub fn defer_initially_deferred(constraint: &mut Constraint) {
    constraint.deferral = Some(Deferral::DEFERRED);
}

/// Built-in type coercion rules for a backend.
pub fn type_rules_for(backend: Backend) -> BTreeMap<TypeKind, TypeRule> {
    let mut rules: BTreeMap<TypeKind, TypeRule> = BTreeMap::new();
    match backend {
        Backend::Oracle => {
            rules.insert(TypeKind::Integer, oracle_integer);
            rules.insert(TypeKind::Decimal, oracle_decimal);
        }
        Backend::MySql => {
            rules.insert(TypeKind::String, mysql_string);
        }
        Backend::Generic | Backend::Postgres | Backend::Sqlite => {}
    }
    rules
}

/// Built-in constraint deferral rules for a backend.
///
/// Only backends with commit-time constraint checking get any.
pub fn deferral_rules_for(backend: Backend) -> BTreeMap<ConstraintKind, DeferralRule> {
    let mut rules: BTreeMap<ConstraintKind, DeferralRule> = BTreeMap::new();
    if backend.supports_deferred_constraints() {
        for kind in [ConstraintKind::ForeignKey, ConstraintKind::Unique, ConstraintKind::Check] {
            rules.insert(kind, defer_initially_deferred);
        }
    }
    rules
}
