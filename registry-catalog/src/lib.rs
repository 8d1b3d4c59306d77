//! Entity schema model for the vehicle registry importer.
//!
//! This crate describes *what* gets imported: field kinds, column order, and
//! identifier requirements for each target table, plus YAML I/O for custom
//! schemas. It has no knowledge of CSV or SQL rendering; `registry-import`
//! consumes these types to drive the pipeline.

pub mod builtin;
pub mod types;
pub mod yaml;

pub use builtin::{BuiltinEntity, car_owners, cars, owners};
pub use types::*;
pub use yaml::{SchemaFileError, load_schema, to_yaml};
