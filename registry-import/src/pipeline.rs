//! The import pipeline: delimited source text in, insert statements out.
//!
//! A run reads the whole source into memory, parses every row before mapping
//! any of them, renders one statement per row, and writes the output in a
//! single step. Parse and schema failures therefore never leave a partial
//! output file behind.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use registry_catalog::EntitySchema;

use crate::error::ImportError;
use crate::ids::IdMode;
use crate::mapper::{HeaderIndex, MapOutcome, SourceRecord, map_record};
use crate::normalize::InvalidValuePolicy;
use crate::progress::ImportProgress;
use crate::statement::render_insert;

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub delimiter: u8,
    pub id_mode: IdMode,
    pub on_invalid: InvalidValuePolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            id_mode: IdMode::Random,
            on_invalid: InvalidValuePolicy::Abort,
        }
    }
}

/// Statistics from a single import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Non-empty data rows in the source.
    pub rows_read: u64,
    pub statements_written: u64,
    pub rows_skipped: u64,
    pub values_nulled: u64,
}

/// The statements of a run, before they are written anywhere.
#[derive(Debug, Clone)]
pub struct Generated {
    pub statements: Vec<String>,
    pub stats: ImportStats,
}

impl Generated {
    /// Statements joined by newlines, without a trailing newline.
    pub fn to_sql(&self) -> String {
        self.statements.join("\n")
    }
}

/// Output path for a source: same location, `.sql` extension.
///
/// A source that is already `.sql` gets `.sql` appended instead so it is
/// never overwritten.
pub fn default_output_path(source: &Path) -> PathBuf {
    let is_sql = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"));
    if is_sql {
        let mut name = source.as_os_str().to_owned();
        name.push(".sql");
        PathBuf::from(name)
    } else {
        source.with_extension("sql")
    }
}

/// Turn delimited source text into insert statements.
///
/// `source_name` is only used for progress messages.
pub fn generate(
    source_text: &str,
    source_name: &str,
    schema: &EntitySchema,
    options: &ImportOptions,
    progress: &dyn ImportProgress,
) -> Result<Generated, ImportError> {
    schema.validate()?;
    let mut ids = options.id_mode.generator(schema)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(source_text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    let index = HeaderIndex::resolve(&headers, schema)?;
    let records = read_records(&mut reader, headers.len())?;

    let total = records.len();
    progress.on_start(&schema.table, source_name, total);

    let mut stats = ImportStats {
        rows_read: total as u64,
        ..Default::default()
    };
    let mut statements = Vec::with_capacity(total);

    for (i, (row, record)) in records.iter().enumerate() {
        let source = SourceRecord::new(*row, record, &index);
        match map_record(&source, schema, ids.as_mut(), options.on_invalid)? {
            MapOutcome::Mapped(mapped) => {
                for err in &mapped.nulled {
                    progress.on_record_error(err);
                }
                stats.values_nulled += mapped.nulled.len() as u64;
                statements.push(render_insert(&schema.table, &mapped));
            }
            MapOutcome::Skipped(err) => {
                progress.on_record_error(&err);
                stats.rows_skipped += 1;
            }
        }
        progress.on_record(i + 1, total);
    }

    stats.statements_written = statements.len() as u64;
    progress.on_complete(&stats);

    Ok(Generated { statements, stats })
}

/// Read `source`, generate statements, and write them to `output`.
pub fn import_file(
    source: &Path,
    output: &Path,
    schema: &EntitySchema,
    options: &ImportOptions,
    progress: &dyn ImportProgress,
) -> Result<ImportStats, ImportError> {
    let text = fs::read_to_string(source).map_err(|e| ImportError::io(source, e))?;
    let generated = generate(
        &text,
        &source.display().to_string(),
        schema,
        options,
        progress,
    )?;
    write_atomic(output, &generated.to_sql())?;
    Ok(generated.stats)
}

/// Parse every data row up front, paired with its source line number.
///
/// Blank rows (every field empty or whitespace) are dropped. Rows shorter than the header are kept (their
/// trailing fields are absent); rows longer than the header are malformed.
fn read_records(
    reader: &mut csv::Reader<&[u8]>,
    header_len: usize,
) -> Result<Vec<(u64, StringRecord)>, ImportError> {
    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() > header_len {
            return Err(ImportError::RowTooLong {
                line,
                found: record.len(),
                expected: header_len,
            });
        }
        records.push((line, record));
    }
    Ok(records)
}

fn csv_error(e: csv::Error) -> ImportError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    ImportError::Csv { line, source: e }
}

/// Write through a sibling temporary file so `path` is either the complete
/// output or untouched.
fn write_atomic(path: &Path, contents: &str) -> Result<(), ImportError> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(ImportError::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ImportError::io(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            default_output_path(Path::new("data/owners.csv")),
            PathBuf::from("data/owners.sql")
        );
        assert_eq!(
            default_output_path(Path::new("owners")),
            PathBuf::from("owners.sql")
        );
    }

    #[test]
    fn output_path_never_overwrites_sql_source() {
        assert_eq!(
            default_output_path(Path::new("dump.SQL")),
            PathBuf::from("dump.SQL.sql")
        );
    }

    #[test]
    fn default_options() {
        let options = ImportOptions::default();
        assert_eq!(options.delimiter, b',');
        assert_eq!(options.id_mode, IdMode::Random);
        assert_eq!(options.on_invalid, InvalidValuePolicy::Abort);
    }
}
