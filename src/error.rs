//! Top-level error for a DDL generation run.

use thiserror::Error;

use crate::ddl::RenderError;
use crate::dialect::UnsupportedDialectError;
use crate::model::ModelError;

#[derive(Error, Debug)]
pub enum DdlError {
    #[error("Invalid model: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Dialect(#[from] UnsupportedDialectError),

    #[error("Cannot render DDL: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
