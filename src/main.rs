use clap::Parser;
use std::fs;
use std::io::{self, Write};

use model_ddl::cli::Args;
use model_ddl::config::ConfigFile;
use model_ddl::logging::{self, LoggingConfig};
use model_ddl::{generate_ddl, ModelDocument};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = ConfigFile::load(args.config.as_deref())?.unwrap_or_default();

    logging::init(&LoggingConfig::from_settings(
        args.verbose,
        config.log_filter.as_deref(),
    ));

    let document = if args.reads_stdin() {
        ModelDocument::from_reader(io::stdin().lock())?
    } else {
        ModelDocument::from_reader(fs::File::open(&args.model)?)?
    };

    let dialect = args
        .dialect
        .clone()
        .or_else(|| config.dialect.clone())
        .unwrap_or_else(|| "generic".to_string());

    let mut options = args.emit_options();
    config.apply(&mut options);

    let ddl = generate_ddl(&document, &dialect, &options)?.unwrap_or_default();

    match &args.output {
        Some(path) => fs::write(path, ddl)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(ddl.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
