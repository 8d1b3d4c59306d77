//! YAML loading for operator-supplied entity schemas.
//!
//! A schema file holds a single [`EntitySchema`]:
//!
//! ```text
//! table: dealers
//! generate_id: true
//! natural_key: [name]
//! columns:
//!   - column: name
//!     kind: string
//!   - column: opened
//!     source: Opened On
//!     kind: timestamp
//! ```

use std::path::Path;

use thiserror::Error;

use crate::types::{EntitySchema, SchemaError};

#[derive(Debug, Error)]
pub enum SchemaFileError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("Invalid schema in {path}: {source}")]
    Invalid { path: String, source: SchemaError },
}

/// Load and validate one schema file.
pub fn load_schema(path: &Path) -> Result<EntitySchema, SchemaFileError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SchemaFileError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_schema(&contents).map_err(|e| match e {
        ParseFailure::Yaml(source) => SchemaFileError::Parse {
            path: path.display().to_string(),
            source,
        },
        ParseFailure::Invalid(source) => SchemaFileError::Invalid {
            path: path.display().to_string(),
            source,
        },
    })
}

/// Render a schema as YAML, in the same layout [`load_schema`] reads.
pub fn to_yaml(schema: &EntitySchema) -> Result<String, serde_yml::Error> {
    serde_yml::to_string(schema)
}

enum ParseFailure {
    Yaml(serde_yml::Error),
    Invalid(SchemaError),
}

fn parse_schema(contents: &str) -> Result<EntitySchema, ParseFailure> {
    let schema: EntitySchema = serde_yml::from_str(contents).map_err(ParseFailure::Yaml)?;
    schema.validate().map_err(ParseFailure::Invalid)?;
    Ok(schema)
}
