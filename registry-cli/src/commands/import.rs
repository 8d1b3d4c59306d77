use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use registry_catalog::EntitySchema;
use registry_import::settings::{self, OptionOverrides};
use registry_import::{LogProgress, default_output_path, import_file};

use crate::cli_types::ImportArgs;
use crate::error::CliError;

/// Import one CSV file with the given schema and write its statements.
pub(crate) fn run_import(schema: &EntitySchema, args: ImportArgs) -> Result<(), CliError> {
    let stable_ids = args.stable_ids_override();
    let Some(source) = args.source else {
        return Err(CliError::usage(
            "missing source file: pass the path of the CSV file to import",
        ));
    };

    let options = settings::load_import_settings()
        .resolve(OptionOverrides {
            delimiter: args.delimiter,
            on_invalid: args.on_invalid,
            stable_ids,
        })
        .map_err(CliError::config)?;
    let output = args.output.unwrap_or_else(|| default_output_path(&source));

    log::debug!(
        "Options: delimiter {:?}, ids {}, invalid values {}",
        options.delimiter as char,
        options.id_mode,
        options.on_invalid,
    );

    let stats = import_file(&source, &output, schema, &options, &LogProgress)?;

    if stats.rows_skipped > 0 {
        log::warn!(
            "{} row(s) skipped because of invalid values",
            stats.rows_skipped
        );
    }
    log::info!(
        "{} Wrote {} statement(s) to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        stats.statements_written,
        output.display().if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}
