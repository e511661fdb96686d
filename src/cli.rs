//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::ddl::EmitOptions;

/// Generate SQL DDL for a target database from a JSON data model.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the model document (JSON), or "-" to read stdin
    pub model: String,

    /// Target dialect: generic, postgresql, oracle, mysql or sqlite
    ///
    /// Falls back to the config file's "dialect", then to generic.
    pub dialect: Option<String>,

    /// Exclude CREATE TABLE statements
    #[arg(short = 't', long)]
    pub xtables: bool,

    /// Exclude ALTER TABLE ... ADD CONSTRAINT statements
    ///
    /// Required on sqlite for models with foreign keys, uniques or checks.
    /// sqlite keeps the primary key inside CREATE TABLE either way.
    #[arg(short = 'c', long)]
    pub xconstraints: bool,

    /// Exclude CREATE INDEX statements
    #[arg(short = 'i', long)]
    pub xindexes: bool,

    /// Write the DDL to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file
    ///
    /// If not specified, searches for .model_ddl.json in:
    ///   1. the current directory
    ///   2. the home directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Whether the model comes from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.model == "-"
    }

    /// Emission options from the exclusion flags.
    ///
    /// The text is always returned so the binary decides where it goes.
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            exclude_tables: self.xtables,
            exclude_constraints: self.xconstraints,
            exclude_indexes: self.xindexes,
            return_string: true,
        }
    }
}
