//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use registry_catalog::BuiltinEntity;
use registry_import::InvalidValuePolicy;

#[derive(Parser)]
#[command(name = "registry-import")]
#[command(
    about = "Turn vehicle registry CSV exports into SQL insert statements",
    long_about = None
)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every import command.
#[derive(Args, Clone, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file to import; the header row names the fields
    pub source: Option<PathBuf>,

    /// Where to write the statements (default: source path with a .sql extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field delimiter (default: ',')
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// What to do with a value that is not valid for its column: abort, skip or null
    #[arg(long)]
    pub on_invalid: Option<InvalidValuePolicy>,

    /// Derive ids from each row's natural key so re-imports reuse them
    #[arg(long, conflicts_with = "random_ids")]
    pub stable_ids: bool,

    /// Use random ids for this run even if stable ids are saved as the default
    #[arg(long)]
    pub random_ids: bool,
}

impl ImportArgs {
    /// The id mode asked for on the command line, if any.
    pub fn stable_ids_override(&self) -> Option<bool> {
        match (self.stable_ids, self.random_ids) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import owners (name, country, state, city)
    Owners(ImportArgs),

    /// Import cars with their factory, shipping and sale details
    Cars(ImportArgs),

    /// Import ownership history linking cars to owners
    CarOwners(ImportArgs),

    /// Import with a schema described in a YAML file
    Custom {
        /// YAML schema file (see `registry-import schemas --show owners` for the layout)
        #[arg(short, long)]
        schema: PathBuf,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// List the built-in schemas
    Schemas {
        /// Print one schema as YAML (owners, cars, car-owners)
        #[arg(long)]
        show: Option<BuiltinEntity>,
    },

    /// Inspect or change saved import defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and its contents
    Show,

    /// Print the settings file path
    Path,

    /// Save import defaults (flags given on the command line still win)
    Set {
        /// Default field delimiter
        #[arg(long)]
        delimiter: Option<char>,

        /// Default policy for invalid values: abort, skip or null
        #[arg(long)]
        on_invalid: Option<InvalidValuePolicy>,

        /// Use stable ids by default
        #[arg(long)]
        stable_ids: Option<bool>,
    },
}
