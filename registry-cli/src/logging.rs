//! Console logger: info and below to stdout, warnings and errors to stderr,
//! optionally mirrored to a log file.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::error::CliError;

struct CliLogger {
    /// Level and `RUST_LOG` directives; used only for filtering.
    filter: env_logger::Logger,
    verbose: bool,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    fn format(&self, record: &Record) -> String {
        let message = match record.level() {
            Level::Error => format!(
                "{} {}",
                "error:".if_supports_color(Stderr, |t| t.red()),
                record.args()
            ),
            Level::Warn => format!(
                "{} {}",
                "warning:".if_supports_color(Stderr, |t| t.yellow()),
                record.args()
            ),
            Level::Info => record.args().to_string(),
            Level::Debug | Level::Trace => format!(
                "{} {}",
                record.level().if_supports_color(Stderr, |t| t.dimmed()),
                record.args()
            ),
        };
        if self.verbose {
            format!("{} {}", chrono::Local::now().format("%H:%M:%S%.3f"), message)
        } else {
            message
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.filter.matches(record) {
            return;
        }
        let line = self.format(record);
        match record.level() {
            Level::Error | Level::Warn => eprintln!("{line}"),
            _ => println!("{line}"),
        }
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = writeln!(f, "{}", strip_ansi_escapes::strip_str(&line));
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = f.flush();
        }
    }
}

/// Install the logger.
///
/// `--quiet` keeps warnings and errors, `--verbose` adds debug output and
/// timestamps. `RUST_LOG`, when set, refines the level further.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let filter = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .build();
    let max_level = filter.filter();

    let file = match logfile {
        Some(path) => Some(Mutex::new(File::create(path)?)),
        None => None,
    };

    log::set_boxed_logger(Box::new(CliLogger {
        filter,
        verbose,
        file,
    }))
    .map_err(|e| CliError::config(format!("logger already installed: {e}")))?;
    log::set_max_level(max_level);
    Ok(())
}
