//! model_ddl library - SQL DDL generation from JSON data models
//!
//! A Model Document is turned into a dialect-neutral schema, then rendered as
//! CREATE TABLE, ALTER TABLE ... ADD CONSTRAINT and CREATE INDEX statements
//! for one target backend (generic, PostgreSQL, Oracle, MySQL or SQLite).
//!
//! ```ignore
//! use model_ddl::{generate_ddl, EmitOptions, ModelDocument};
//!
//! let document = ModelDocument::from_json(json)?;
//! let options = EmitOptions { return_string: true, ..Default::default() };
//! let ddl = generate_ddl(&document, "oracle", &options)?;
//! ```

pub mod cli;
pub mod config;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod logging;
pub mod model;
pub mod schema;

#[macro_use]
pub mod test_macros;

pub use ddl::{DdlEmitter, EmitOptions};
pub use dialect::{Backend, Dialect};
pub use error::DdlError;
pub use model::ModelDocument;
pub use schema::Schema;

/// Generate DDL for `document` on the backend named by `dialect`.
///
/// The dialect is resolved before any schema construction. Returns
/// `Some(text)` when `options.return_string` is set; otherwise the text is
/// written to stdout and `None` is returned. On any error nothing is written.
pub fn generate_ddl(
    document: &ModelDocument,
    dialect: &str,
    options: &EmitOptions,
) -> Result<Option<String>, DdlError> {
    let dialect = Dialect::from_name(dialect)?;
    let schema = Schema::from_document(document)?;
    DdlEmitter::new(&dialect, *options).output(&schema)
}

/// Render DDL for `document` with a prepared dialect, always returning the text.
pub fn render_ddl(
    document: &ModelDocument,
    dialect: &Dialect,
    options: &EmitOptions,
) -> Result<String, DdlError> {
    let schema = Schema::from_document(document)?;
    Ok(DdlEmitter::new(dialect, *options).emit(&schema)?)
}
