//! Surrogate identifier generation.
//!
//! Two strategies: fresh random UUIDs (the default, one per row, new on every
//! run) and stable UUIDs derived from a schema's natural key, so re-importing
//! the same source yields the same identifiers.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use registry_catalog::EntitySchema;
use uuid::Uuid;

use crate::error::{ImportError, RecordErrorCause};
use crate::mapper::SourceRecord;

/// Namespace for stable identifiers. Changing it changes every derived id.
pub const STABLE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93d7_4b0a_8e55_1d2c_7b9f_3a60);

/// Separates natural key parts so `("ab", "c")` and `("a", "bc")` differ.
const KEY_SEPARATOR: char = '\u{1f}';

/// Produces the value of the `id` column for one row.
pub trait IdGenerator {
    fn next_id(
        &mut self,
        record: &SourceRecord<'_>,
        schema: &EntitySchema,
    ) -> Result<String, RecordErrorCause>;
}

/// How identifiers are produced for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdMode {
    #[default]
    Random,
    Stable,
}

impl IdMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Stable => "stable",
        }
    }

    /// Build the generator for `schema`, checking the mode can work with it.
    pub fn generator(&self, schema: &EntitySchema) -> Result<Box<dyn IdGenerator>, ImportError> {
        match self {
            Self::Random => Ok(Box::new(RandomIds::default())),
            Self::Stable if schema.generate_id && schema.natural_key.is_empty() => {
                Err(ImportError::config(format!(
                    "stable ids need a natural key, and the schema for {} declares none",
                    schema.table
                )))
            }
            Self::Stable => Ok(Box::new(StableIds::default())),
        }
    }
}

impl fmt::Display for IdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "stable" => Ok(Self::Stable),
            other => Err(format!("unknown id mode '{other}' (expected random or stable)")),
        }
    }
}

/// Identifiers already handed out during this run.
#[derive(Debug, Default)]
struct Issued(HashSet<Uuid>);

impl Issued {
    fn claim(&mut self, id: Uuid) -> Result<String, RecordErrorCause> {
        let text = id.hyphenated().to_string();
        if self.0.insert(id) {
            Ok(text)
        } else {
            Err(RecordErrorCause::DuplicateId(text))
        }
    }
}

/// Random version 4 UUIDs.
#[derive(Debug, Default)]
pub struct RandomIds {
    issued: Issued,
}

impl IdGenerator for RandomIds {
    fn next_id(
        &mut self,
        _record: &SourceRecord<'_>,
        _schema: &EntitySchema,
    ) -> Result<String, RecordErrorCause> {
        self.issued.claim(Uuid::new_v4())
    }
}

/// Version 5 UUIDs over the table name and the row's natural key.
///
/// Two rows with the same natural key collide, which surfaces as
/// [`RecordErrorCause::DuplicateId`].
#[derive(Debug, Default)]
pub struct StableIds {
    issued: Issued,
}

impl StableIds {
    /// The identifier a row with these natural key values receives.
    pub fn derive(table: &str, key_values: &[&str]) -> Uuid {
        let mut name = String::from(table);
        for value in key_values {
            name.push(KEY_SEPARATOR);
            name.push_str(value);
        }
        Uuid::new_v5(&STABLE_ID_NAMESPACE, name.as_bytes())
    }
}

impl IdGenerator for StableIds {
    fn next_id(
        &mut self,
        record: &SourceRecord<'_>,
        schema: &EntitySchema,
    ) -> Result<String, RecordErrorCause> {
        let values: Vec<&str> = schema
            .natural_key
            .iter()
            .map(|field| record.get(field).unwrap_or(""))
            .collect();
        if values.iter().all(|v| v.is_empty()) {
            return Err(RecordErrorCause::EmptyNaturalKey {
                fields: schema.natural_key.clone(),
            });
        }
        self.issued.claim(Self::derive(&schema.table, &values))
    }
}

#[cfg(test)]
#[path = "tests/ids_tests.rs"]
mod tests;
