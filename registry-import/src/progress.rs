//! Import progress reporting.

use crate::error::RecordError;
use crate::pipeline::ImportStats;

/// Trait for receiving import progress updates.
pub trait ImportProgress {
    /// Called once the source is parsed and the header resolved.
    fn on_start(&self, table: &str, source: &str, total: usize);

    /// Called after each row is processed.
    fn on_record(&self, current: usize, total: usize);

    /// Called for a row that was skipped or had values written as `NULL`.
    fn on_record_error(&self, error: &RecordError);

    /// Called when every row has been processed.
    fn on_complete(&self, stats: &ImportStats);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_start(&self, _table: &str, _source: &str, _total: usize) {}
    fn on_record(&self, _current: usize, _total: usize) {}
    fn on_record_error(&self, _error: &RecordError) {}
    fn on_complete(&self, _stats: &ImportStats) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_start(&self, table: &str, source: &str, total: usize) {
        log::info!("Importing {} row(s) from {} into {}", total, source, table);
    }

    fn on_record(&self, current: usize, total: usize) {
        if current.is_multiple_of(500) || current == total {
            log::debug!("  [{}/{}]", current, total);
        }
    }

    fn on_record_error(&self, error: &RecordError) {
        log::warn!("{}", error);
    }

    fn on_complete(&self, stats: &ImportStats) {
        log::info!(
            "Generated {} statement(s) from {} row(s) ({} skipped, {} value(s) written as NULL)",
            stats.statements_written,
            stats.rows_read,
            stats.rows_skipped,
            stats.values_nulled,
        );
    }
}
