//! Per-statement DDL compiler.
//!
//! Produces the raw SQL text of a single statement for a given dialect. The
//! text carries no terminator; the emitter appends it.

use super::RenderError;
use crate::dialect::{ActionSupport, Dialect};
use crate::model::ReferentialAction;
use crate::schema::{Constraint, ConstraintBody, Deferral, ForeignReference, Index, Schema, Table};

/// Compiler for one schema under one dialect.
pub struct DdlCompiler<'a> {
    dialect: &'a Dialect,
    schema: &'a Schema,
}

impl<'a> DdlCompiler<'a> {
    pub fn new(dialect: &'a Dialect, schema: &'a Schema) -> Self {
        Self { dialect, schema }
    }

    /// Generate CREATE TABLE with column definitions only.
    ///
    /// Produces output in the format:
    /// ```sql
    /// CREATE TABLE person (
    /// 	id INTEGER NOT NULL,
    /// 	email VARCHAR(100)
    /// )
    /// ```
    ///
    /// Backends without ALTER TABLE ... ADD CONSTRAINT (SQLite) get the
    /// primary key as a trailing table constraint instead.
    pub fn create_table(&self, table: &Table) -> Result<String, RenderError> {
        let name = self.dialect.quote_checked(&table.name)?;

        let mut columns = table
            .columns
            .iter()
            .map(|column| {
                let mut definition = format!(
                    "\t{} {}",
                    self.dialect.quote_checked(&column.name)?,
                    self.dialect.render_type(&table.name, column)?
                );
                if let Some(default) = &column.default {
                    definition.push_str(" DEFAULT ");
                    definition.push_str(&self.dialect.render_default(default));
                }
                if !column.nullable {
                    definition.push_str(" NOT NULL");
                }
                Ok(definition)
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        if let Some(primary_key) = self.inline_primary_key(table) {
            self.check_columns(table, &primary_key.label(), &primary_key.columns)?;
            let mut definition = String::from("\t");
            if let Some(name) = &primary_key.name {
                definition.push_str("CONSTRAINT ");
                definition.push_str(&self.dialect.quote_checked(name)?);
                definition.push(' ');
            }
            definition.push_str(&format!("PRIMARY KEY ({})", self.column_list(&primary_key.columns)?));
            columns.push(definition);
        }

        Ok(format!("CREATE TABLE {} (\n{}\n)", name, columns.join(",\n")))
    }

    /// The primary key rendered inside CREATE TABLE, if the backend needs it there.
    pub fn inline_primary_key<'t>(&self, table: &'t Table) -> Option<&'t Constraint> {
        if self.dialect.backend().supports_add_constraint() {
            return None;
        }
        table.primary_key().filter(|pk| !pk.columns.is_empty())
    }

    /// Generate ALTER TABLE ... ADD for one constraint.
    ///
    /// The dialect's deferral rule is applied to a copy before rendering:
    /// ```sql
    /// ALTER TABLE "Order" ADD CONSTRAINT fk_order_person FOREIGN KEY(person_id) REFERENCES "Person" (id) DEFERRABLE INITIALLY DEFERRED
    /// ```
    pub fn add_constraint(&self, table: &Table, constraint: &Constraint) -> Result<String, RenderError> {
        let backend = self.dialect.backend();
        if !backend.supports_add_constraint() {
            return Err(RenderError::AddConstraintUnsupported {
                backend,
                table: table.name.clone(),
                constraint: constraint.label(),
            });
        }
        self.check_columns(table, &constraint.label(), &constraint.columns)?;

        let constraint = self.dialect.prepare_constraint(constraint);
        let columns = self.column_list(&constraint.columns)?;

        let mut sql = format!("ALTER TABLE {} ADD ", self.dialect.quote_checked(&table.name)?);
        if let Some(name) = &constraint.name {
            sql.push_str("CONSTRAINT ");
            sql.push_str(&self.dialect.quote_checked(name)?);
            sql.push(' ');
        }

        match &constraint.body {
            ConstraintBody::PrimaryKey => {
                sql.push_str(&format!("PRIMARY KEY ({})", columns));
            }
            ConstraintBody::ForeignKey(reference) => {
                sql.push_str(&format!("FOREIGN KEY({}) ", columns));
                sql.push_str(&self.references(table, &constraint, reference)?);
            }
            ConstraintBody::Unique => {
                sql.push_str(&format!("UNIQUE ({})", columns));
            }
            ConstraintBody::Check { expression } => {
                sql.push_str(&format!("CHECK ({})", expression));
            }
        }

        if let Some(deferral) = constraint.deferral {
            sql.push_str(&deferral_clause(deferral));
        }
        Ok(sql)
    }

    /// Generate CREATE [UNIQUE] INDEX.
    pub fn create_index(&self, table: &Table, index: &Index) -> Result<String, RenderError> {
        self.check_columns(table, &format!("Index '{}'", index.name), &index.columns)?;
        Ok(format!(
            "CREATE {}INDEX {} ON {} ({})",
            if index.unique { "UNIQUE " } else { "" },
            self.dialect.quote_checked(&index.name)?,
            self.dialect.quote_checked(&table.name)?,
            self.column_list(&index.columns)?
        ))
    }

    fn references(
        &self,
        table: &Table,
        constraint: &Constraint,
        reference: &ForeignReference,
    ) -> Result<String, RenderError> {
        let target = self
            .schema
            .table(&reference.table)
            .ok_or_else(|| RenderError::UnknownTable {
                table: table.name.clone(),
                constraint: constraint.label(),
                target: reference.table.clone(),
            })?;
        self.check_columns(target, &constraint.label(), &reference.columns)?;

        let mut sql = format!(
            "REFERENCES {} ({})",
            self.dialect.quote_checked(&target.name)?,
            self.column_list(&reference.columns)?
        );
        if let Some(action) = reference.on_delete {
            sql.push_str(&self.action_clause(table, constraint, "ON DELETE", action)?);
        }
        if let Some(action) = reference.on_update {
            sql.push_str(&self.action_clause(table, constraint, "ON UPDATE", action)?);
        }
        Ok(sql)
    }

    fn action_clause(
        &self,
        table: &Table,
        constraint: &Constraint,
        clause: &'static str,
        action: ReferentialAction,
    ) -> Result<String, RenderError> {
        let backend = self.dialect.backend();
        match backend.referential_action(clause == "ON UPDATE", action) {
            ActionSupport::Render => Ok(format!(" {} {}", clause, action.as_sql())),
            ActionSupport::Omit => Ok(String::new()),
            ActionSupport::Unsupported => Err(RenderError::UnsupportedReferentialAction {
                backend,
                table: table.name.clone(),
                constraint: constraint.label(),
                clause,
                action,
            }),
        }
    }

    fn check_columns(&self, table: &Table, object: &str, columns: &[String]) -> Result<(), RenderError> {
        match columns.iter().find(|c| !table.has_column(c)) {
            Some(missing) => Err(RenderError::UnknownColumn {
                table: table.name.clone(),
                object: object.to_string(),
                column: missing.clone(),
            }),
            None => Ok(()),
        }
    }

    fn column_list(&self, columns: &[String]) -> Result<String, RenderError> {
        Ok(columns
            .iter()
            .map(|c| self.dialect.quote_checked(c))
            .collect::<Result<Vec<_>, _>>()?
            .join(", "))
    }
}

fn deferral_clause(deferral: Deferral) -> String {
    let mut clause = String::new();
    clause.push_str(if deferral.deferrable { " DEFERRABLE" } else { " NOT DEFERRABLE" });
    if deferral.initially_deferred {
        clause.push_str(" INITIALLY DEFERRED");
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Backend;
    use crate::schema::{Column, ColumnType, DefaultValue};
    use rstest::{fixture, rstest};

    #[fixture]
    fn schema() -> Schema {
        let mut schema = Schema::new();

        let person = schema.add_table(Table::new("Person")).unwrap();
        person.columns.push(Column::new("id", ColumnType::Integer).not_null());
        person.columns.push(Column::new("name", ColumnType::String { length: None }));
        person.columns.push(
            Column::new("status", ColumnType::String { length: Some(10) })
                .with_default(DefaultValue::Text("new".into())),
        );
        person.constraints.push(Constraint::primary_key(vec!["id".into()]));

        let order = schema.add_table(Table::new("Order")).unwrap();
        order.columns.push(Column::new("id", ColumnType::Integer).not_null());
        order.columns.push(Column::new("person_id", ColumnType::Integer).not_null());
        order.columns.push(Column::new("total", ColumnType::Decimal { precision: Some(10), scale: Some(2) }));
        order.constraints.push(
            Constraint::primary_key(vec!["id".into()]).named(Some("pk_order".into())),
        );
        order.constraints.push(
            Constraint::foreign_key(
                vec!["person_id".into()],
                ForeignReference {
                    table: "Person".into(),
                    columns: vec!["id".into()],
                    on_delete: Some(ReferentialAction::Cascade),
                    on_update: None,
                },
            )
            .named(Some("fk_order_person".into())),
        );
        order.constraints.push(Constraint::check(vec!["total".into()], "total >= 0"));
        order.indexes.push(Index {
            name: "ix_order_person".into(),
            table: "Order".into(),
            columns: vec!["person_id".into()],
            unique: false,
        });
        schema
    }

    #[rstest]
    fn test_create_table_generic(schema: Schema) {
        let dialect = Dialect::generic();
        let compiler = DdlCompiler::new(&dialect, &schema);
        let sql = compiler.create_table(schema.table("Person").unwrap()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"Person\" (\n\tid INTEGER NOT NULL,\n\tname VARCHAR,\n\tstatus VARCHAR(10) DEFAULT 'new'\n)"
        );
    }

    #[rstest]
    fn test_create_table_oracle(schema: Schema) {
        let dialect = Dialect::new(Backend::Oracle);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let sql = compiler.create_table(schema.table("Order").unwrap()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"Order\" (\n\tid NUMBER(10) NOT NULL,\n\tperson_id NUMBER(10) NOT NULL,\n\ttotal NUMBER\n)"
        );
    }

    #[rstest]
    fn test_create_table_oracle_unbounded_string_fails(schema: Schema) {
        let dialect = Dialect::new(Backend::Oracle);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let err = compiler.create_table(schema.table("Person").unwrap()).unwrap_err();
        assert!(matches!(err, RenderError::MissingLength { ref column, .. } if column == "name"));
        assert!(err.to_string().contains("Person.name"));
    }

    #[rstest]
    fn test_foreign_key_generic(schema: Schema) {
        let dialect = Dialect::generic();
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let sql = compiler.add_constraint(order, &order.constraints[1]).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE \"Order\" ADD CONSTRAINT fk_order_person FOREIGN KEY(person_id) REFERENCES \"Person\" (id) ON DELETE CASCADE"
        );
    }

    #[rstest]
    fn test_foreign_key_postgres_deferred(schema: Schema) {
        let dialect = Dialect::new(Backend::Postgres);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let sql = compiler.add_constraint(order, &order.constraints[1]).unwrap();
        assert!(sql.ends_with("ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED"));
    }

    #[rstest]
    #[case(Backend::Oracle)]
    #[case(Backend::Postgres)]
    fn test_primary_key_immediate_on_deferring_backends(schema: Schema, #[case] backend: Backend) {
        let dialect = Dialect::new(backend);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let sql = compiler.add_constraint(order, &order.constraints[0]).unwrap();
        assert_eq!(sql, "ALTER TABLE \"Order\" ADD CONSTRAINT pk_order PRIMARY KEY (id)");
    }

    #[rstest]
    fn test_unnamed_check(schema: Schema) {
        let dialect = Dialect::new(Backend::Oracle);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let sql = compiler.add_constraint(order, &order.constraints[2]).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE \"Order\" ADD CHECK (total >= 0) DEFERRABLE INITIALLY DEFERRED"
        );
    }

    #[rstest]
    fn test_unique_mysql_quotes_with_backticks() {
        let mut schema = Schema::new();
        let table = schema.add_table(Table::new("order")).unwrap();
        table.columns.push(Column::new("email", ColumnType::String { length: None }));
        table.columns.push(Column::new("left", ColumnType::Integer));
        table.constraints.push(Constraint::unique(vec!["email".into()]));

        let dialect = Dialect::new(Backend::MySql);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("order").unwrap();
        assert_eq!(
            compiler.add_constraint(order, &order.constraints[0]).unwrap(),
            "ALTER TABLE `order` ADD UNIQUE (email)"
        );
        assert_eq!(
            compiler.create_table(order).unwrap(),
            "CREATE TABLE `order` (\n\temail VARCHAR(255),\n\t`left` INTEGER\n)"
        );
    }

    #[rstest]
    fn test_sqlite_cannot_add_constraints(schema: Schema) {
        let dialect = Dialect::new(Backend::Sqlite);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let err = compiler.add_constraint(order, &order.constraints[1]).unwrap_err();
        assert!(matches!(err, RenderError::AddConstraintUnsupported { .. }));
    }

    #[rstest]
    fn test_sqlite_primary_key_inline(schema: Schema) {
        let dialect = Dialect::new(Backend::Sqlite);
        let compiler = DdlCompiler::new(&dialect, &schema);
        assert_eq!(
            compiler.create_table(schema.table("Order").unwrap()).unwrap(),
            "CREATE TABLE \"Order\" (\n\tid INTEGER NOT NULL,\n\tperson_id INTEGER NOT NULL,\n\ttotal NUMERIC(10, 2),\n\tCONSTRAINT pk_order PRIMARY KEY (id)\n)"
        );
        let person = compiler.create_table(schema.table("Person").unwrap()).unwrap();
        assert!(person.ends_with(",\n\tPRIMARY KEY (id)\n)"));
    }

    #[rstest]
    #[case(Backend::Generic)]
    #[case(Backend::Postgres)]
    #[case(Backend::Oracle)]
    #[case(Backend::MySql)]
    fn test_primary_key_not_inline_elsewhere(schema: Schema, #[case] backend: Backend) {
        let dialect = Dialect::new(backend);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        assert!(compiler.inline_primary_key(order).is_none());
    }

    #[rstest]
    fn test_oracle_on_update_unsupported(mut schema: Schema) {
        let order = schema.table_mut("Order").unwrap();
        if let ConstraintBody::ForeignKey(reference) = &mut order.constraints[1].body {
            reference.on_update = Some(ReferentialAction::Cascade);
        }
        let dialect = Dialect::new(Backend::Oracle);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let err = compiler.add_constraint(order, &order.constraints[1]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UnsupportedReferentialAction { clause: "ON UPDATE", .. }
        ));
    }

    #[rstest]
    fn test_create_index(schema: Schema) {
        let dialect = Dialect::generic();
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        assert_eq!(
            compiler.create_index(order, &order.indexes[0]).unwrap(),
            "CREATE INDEX ix_order_person ON \"Order\" (person_id)"
        );

        let unique = Index {
            name: "ux_order_total".into(),
            table: "Order".into(),
            columns: vec!["total".into(), "id".into()],
            unique: true,
        };
        assert_eq!(
            compiler.create_index(order, &unique).unwrap(),
            "CREATE UNIQUE INDEX ux_order_total ON \"Order\" (total, id)"
        );
    }

    #[rstest]
    fn test_index_on_unknown_column(schema: Schema) {
        let dialect = Dialect::generic();
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let index = Index {
            name: "ix_bad".into(),
            table: "Order".into(),
            columns: vec!["nope".into()],
            unique: false,
        };
        let err = compiler.create_index(order, &index).unwrap_err();
        assert!(matches!(err, RenderError::UnknownColumn { ref column, .. } if column == "nope"));
    }

    #[rstest]
    fn test_foreign_key_to_missing_table() {
        let mut schema = Schema::new();
        let table = schema.add_table(Table::new("visit")).unwrap();
        table.columns.push(Column::new("person_id", ColumnType::Integer));
        table.constraints.push(Constraint::foreign_key(
            vec!["person_id".into()],
            ForeignReference {
                table: "person".into(),
                columns: vec!["id".into()],
                on_delete: None,
                on_update: None,
            },
        ));
        let dialect = Dialect::generic();
        let compiler = DdlCompiler::new(&dialect, &schema);
        let visit = schema.table("visit").unwrap();
        let err = compiler.add_constraint(visit, &visit.constraints[0]).unwrap_err();
        assert!(matches!(err, RenderError::UnknownTable { ref target, .. } if target == "person"));
    }

    #[rstest]
    fn test_oracle_long_constraint_name(mut schema: Schema) {
        let order = schema.table_mut("Order").unwrap();
        order.constraints[0].name = Some("pk_this_name_is_far_too_long_for_oracle".into());
        let dialect = Dialect::new(Backend::Oracle);
        let compiler = DdlCompiler::new(&dialect, &schema);
        let order = schema.table("Order").unwrap();
        let err = compiler.add_constraint(order, &order.constraints[0]).unwrap_err();
        assert!(matches!(err, RenderError::IdentifierTooLong { max: 30, .. }));
    }
}
