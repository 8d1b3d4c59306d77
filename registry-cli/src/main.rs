//! registry-import CLI
//!
//! Command-line interface for turning vehicle registry CSV exports into SQL
//! insert statements.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use commands::config::{run_config_path, run_config_set, run_config_show};
use commands::import::run_import;
use commands::schemas::run_schemas;
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Owners(args) => run_import(&registry_catalog::owners(), args),
        Commands::Cars(args) => run_import(&registry_catalog::cars(), args),
        Commands::CarOwners(args) => run_import(&registry_catalog::car_owners(), args),
        Commands::Custom { schema, import } => {
            let schema = registry_catalog::load_schema(&schema)?;
            run_import(&schema, import)
        }
        Commands::Schemas { show } => run_schemas(show),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::Path => run_config_path(),
            ConfigAction::Set {
                delimiter,
                on_invalid,
                stable_ids,
            } => run_config_set(delimiter, on_invalid, stable_ids),
        },
    }
}
