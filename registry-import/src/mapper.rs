//! Record mapping: one source row to one ordered set of literals.

use std::collections::HashMap;

use csv::StringRecord;
use registry_catalog::{EntitySchema, ID_COLUMN};

use crate::error::{ImportError, RecordError};
use crate::ids::IdGenerator;
use crate::normalize::{InvalidValuePolicy, Literal, normalize};

/// Positions of the schema's source fields within the header row.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Resolve every source field the schema reads against the header.
    ///
    /// Header names match case-sensitively. Fails with every missing name
    /// at once so a bad schema is fixed in one pass.
    pub fn resolve(headers: &StringRecord, schema: &EntitySchema) -> Result<Self, ImportError> {
        let mut positions = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            // First occurrence wins for duplicated header names
            positions.entry(name.to_string()).or_insert(i);
        }

        let missing: Vec<String> = schema
            .source_fields()
            .into_iter()
            .filter(|f| !positions.contains_key(*f))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingFields {
                table: schema.table.clone(),
                fields: missing,
            });
        }

        Ok(Self { positions })
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }
}

/// One parsed row of the source, addressed by header name.
#[derive(Debug, Clone, Copy)]
pub struct SourceRecord<'a> {
    /// Line number of the row in the source file.
    pub row: u64,
    record: &'a StringRecord,
    index: &'a HeaderIndex,
}

impl<'a> SourceRecord<'a> {
    pub fn new(row: u64, record: &'a StringRecord, index: &'a HeaderIndex) -> Self {
        Self { row, record, index }
    }

    /// Value of a header field. `None` when the row is too short to have it.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.index.position(field).and_then(|i| self.record.get(i))
    }
}

/// A row rendered to literals, in the schema's output column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRecord {
    pub row: u64,
    pub values: Vec<(String, Literal)>,
    /// Invalid values that were written as `NULL` under the null policy.
    pub nulled: Vec<RecordError>,
}

impl MappedRecord {
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(c, _)| c.as_str())
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.values.iter().map(|(_, l)| l)
    }

    pub fn get(&self, column: &str) -> Option<&Literal> {
        self.values
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, l)| l)
    }
}

/// Outcome of mapping a row that did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOutcome {
    Mapped(MappedRecord),
    /// Dropped under the skip policy.
    Skipped(RecordError),
}

/// Map one row to literals.
///
/// Value errors follow `policy`: under `Abort` they are returned as `Err`,
/// under `Skip` the row comes back as [`MapOutcome::Skipped`], and under
/// `Null` the value renders as `NULL`. Identifier errors are never nulled.
pub fn map_record(
    record: &SourceRecord<'_>,
    schema: &EntitySchema,
    ids: &mut dyn IdGenerator,
    policy: InvalidValuePolicy,
) -> Result<MapOutcome, RecordError> {
    let mut values = Vec::with_capacity(schema.columns.len() + 1);
    let mut nulled = Vec::new();

    for col in &schema.columns {
        let raw = record.get(col.source_field());
        let literal = match normalize(raw, col.kind) {
            Ok(l) => l,
            Err(e) => {
                let err = RecordError::invalid(record.row, &col.column, e);
                match policy {
                    InvalidValuePolicy::Abort => return Err(err),
                    InvalidValuePolicy::Skip => return Ok(MapOutcome::Skipped(err)),
                    InvalidValuePolicy::Null => {
                        nulled.push(err);
                        Literal::null()
                    }
                }
            }
        };
        values.push((col.column.clone(), literal));
    }

    if schema.generate_id {
        let id = match ids.next_id(record, schema) {
            Ok(id) => id,
            Err(cause) => {
                let err = RecordError::new(record.row, cause);
                return match policy {
                    InvalidValuePolicy::Abort => Err(err),
                    _ => Ok(MapOutcome::Skipped(err)),
                };
            }
        };
        values.insert(0, (ID_COLUMN.to_string(), Literal::quoted(&id)));
    }

    Ok(MapOutcome::Mapped(MappedRecord {
        row: record.row,
        values,
        nulled,
    }))
}

#[cfg(test)]
#[path = "tests/mapper_tests.rs"]
mod tests;
