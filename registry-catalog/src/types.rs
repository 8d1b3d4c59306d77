//! Data model types for entity schemas.
//!
//! An [`EntitySchema`] is the declarative description of one target table:
//! its name, the fixed order of its columns, the kind of value each column
//! holds, and whether rows get a generated identifier.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the column that receives a generated identifier.
pub const ID_COLUMN: &str = "id";

// ── Field kinds ─────────────────────────────────────────────────────────────

/// The kind of value a column holds, which decides how source text is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Decimal,
    Boolean,
    Timestamp,
    /// A foreign key into another entity. Rendered like a string.
    Reference,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Columns ─────────────────────────────────────────────────────────────────

/// One output column and the source field it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub column: String,
    /// Source header name. Defaults to the column name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub kind: FieldKind,
}

impl ColumnSpec {
    /// A column read from a source field of the same name.
    pub fn new(column: &str, kind: FieldKind) -> Self {
        Self {
            column: column.to_string(),
            source: None,
            kind,
        }
    }

    /// A column read from a differently named source field.
    pub fn renamed(column: &str, source: &str, kind: FieldKind) -> Self {
        Self {
            column: column.to_string(),
            source: Some(source.to_string()),
            kind,
        }
    }

    /// The header name this column is read from.
    pub fn source_field(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.column)
    }
}

// ── Entity schema ───────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema has an empty table name")]
    EmptyTable,
    #[error("schema for {0} declares no columns")]
    NoColumns(String),
    #[error("schema for {table} has a column with an empty name")]
    EmptyColumn { table: String },
    #[error("schema for {table} declares column {column} more than once")]
    DuplicateColumn { table: String, column: String },
    #[error("schema for {0} generates ids but also declares an explicit `id` column")]
    ExplicitIdColumn(String),
    #[error("natural key field {field} of {table} is not a source field of any column")]
    UnknownNaturalKey { table: String, field: String },
}

/// Declarative description of a target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub table: String,
    /// Prepend an `id` column bound to a generated identifier.
    #[serde(default)]
    pub generate_id: bool,
    /// Source fields that identify a row, used for stable identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub natural_key: Vec<String>,
    pub columns: Vec<ColumnSpec>,
}

impl EntitySchema {
    /// The fixed column order of every insert statement for this entity.
    pub fn output_columns(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.columns.len() + 1);
        if self.generate_id {
            out.push(ID_COLUMN);
        }
        out.extend(self.columns.iter().map(|c| c.column.as_str()));
        out
    }

    /// Distinct source header names this schema reads, in column order.
    pub fn source_fields(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .map(ColumnSpec::source_field)
            .filter(|f| seen.insert(*f))
            .collect()
    }

    /// Check the schema is internally consistent.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.table.trim().is_empty() {
            return Err(SchemaError::EmptyTable);
        }
        if self.columns.is_empty() {
            return Err(SchemaError::NoColumns(self.table.clone()));
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if col.column.trim().is_empty() || col.source_field().trim().is_empty() {
                return Err(SchemaError::EmptyColumn {
                    table: self.table.clone(),
                });
            }
            if self.generate_id && col.column == ID_COLUMN {
                return Err(SchemaError::ExplicitIdColumn(self.table.clone()));
            }
            if !seen.insert(col.column.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.table.clone(),
                    column: col.column.clone(),
                });
            }
        }

        let sources = self.source_fields();
        for field in &self.natural_key {
            if !sources.contains(&field.as_str()) {
                return Err(SchemaError::UnknownNaturalKey {
                    table: self.table.clone(),
                    field: field.clone(),
                });
            }
        }

        Ok(())
    }
}
