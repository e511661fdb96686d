//! DDL Emitter.
//!
//! Renders a whole schema in three groups: every CREATE TABLE (dependency
//! order), then every ADD CONSTRAINT, then every CREATE INDEX. Each statement
//! is terminated with `;` and a blank line; a leading newline separates the
//! constraint and index groups from what precedes them. Everything is rendered
//! before anything is written, so a failure never leaves partial output.

use std::io::Write;

use super::{DdlCompiler, RenderError};
use crate::dialect::Dialect;
use crate::error::DdlError;
use crate::schema::{sort_tables, ConstraintKind, Schema};

const TERMINATOR: &str = ";\n\n";

/// Which statement categories to emit and where the result goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub exclude_tables: bool,
    pub exclude_constraints: bool,
    pub exclude_indexes: bool,
    /// Return the text to the caller instead of writing it to stdout
    pub return_string: bool,
}

/// Rendered statements grouped by category, without terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statements {
    pub tables: Vec<String>,
    pub constraints: Vec<String>,
    pub indexes: Vec<String>,
}

pub struct DdlEmitter<'a> {
    dialect: &'a Dialect,
    options: EmitOptions,
}

impl<'a> DdlEmitter<'a> {
    pub fn new(dialect: &'a Dialect, options: EmitOptions) -> Self {
        Self { dialect, options }
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Render the statements of every included category.
    ///
    /// Excluded categories are not rendered at all, so their errors (for
    /// example ADD CONSTRAINT on SQLite) cannot surface. A primary key that
    /// the compiler places inside CREATE TABLE is not repeated here.
    pub fn statements(&self, schema: &Schema) -> Result<Statements, RenderError> {
        let order = sort_tables(schema);
        if !order.cyclic.is_empty()
            && !self.options.exclude_constraints
            && !self.dialect.backend().supports_deferred_constraints()
        {
            tracing::warn!(
                backend = %self.dialect.backend(),
                tables = ?order.cyclic,
                "circular foreign keys cannot be deferred on this backend; loading data may need constraints disabled"
            );
        }

        let compiler = DdlCompiler::new(self.dialect, schema);
        let mut statements = Statements::default();

        if !self.options.exclude_tables {
            for table in &order.tables {
                statements.tables.push(compiler.create_table(table)?);
            }
        }

        if !self.options.exclude_constraints {
            for table in &order.tables {
                for constraint in &table.constraints {
                    if constraint.columns.is_empty() {
                        tracing::debug!(
                            table = %table.name,
                            constraint = %constraint.label(),
                            "skipping constraint without columns"
                        );
                        continue;
                    }
                    if constraint.kind() == ConstraintKind::PrimaryKey
                        && compiler.inline_primary_key(table).is_some()
                    {
                        tracing::debug!(
                            table = %table.name,
                            "primary key rendered inside CREATE TABLE"
                        );
                        continue;
                    }
                    statements
                        .constraints
                        .push(compiler.add_constraint(table, constraint)?);
                }
            }
        }

        if !self.options.exclude_indexes {
            for table in &order.tables {
                for index in &table.indexes {
                    statements.indexes.push(compiler.create_index(table, index)?);
                }
            }
        }

        tracing::info!(
            backend = %self.dialect.backend(),
            tables = statements.tables.len(),
            constraints = statements.constraints.len(),
            indexes = statements.indexes.len(),
            "rendered DDL"
        );
        Ok(statements)
    }

    /// Render the schema to a single DDL script.
    pub fn emit(&self, schema: &Schema) -> Result<String, RenderError> {
        let statements = self.statements(schema)?;
        let mut output = String::new();

        if !self.options.exclude_tables {
            push_group(&mut output, &statements.tables);
        }
        if !self.options.exclude_constraints {
            output.push('\n');
            push_group(&mut output, &statements.constraints);
        }
        if !self.options.exclude_indexes {
            output.push('\n');
            push_group(&mut output, &statements.indexes);
        }
        Ok(output)
    }

    /// Render the schema and write the script to `writer`.
    pub fn write_to<W: Write>(&self, schema: &Schema, writer: &mut W) -> Result<(), DdlError> {
        let output = self.emit(schema)?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Return the script when `return_string` is set, otherwise print it.
    pub fn output(&self, schema: &Schema) -> Result<Option<String>, DdlError> {
        let output = self.emit(schema)?;
        if self.options.return_string {
            return Ok(Some(output));
        }
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(None)
    }
}

fn push_group(output: &mut String, statements: &[String]) {
    for statement in statements {
        output.push_str(statement.trim());
        output.push_str(TERMINATOR);
    }
}
