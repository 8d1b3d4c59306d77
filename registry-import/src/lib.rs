//! Turn delimited registry exports into SQL insert statements.
//!
//! This crate owns all ETL logic: normalizing raw field text into SQL
//! literals, mapping source rows onto an entity schema, generating
//! identifiers, rendering insert statements, and driving a whole file
//! through the pipeline.

pub mod error;
pub mod ids;
pub mod mapper;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod settings;
pub mod statement;

pub use error::{ImportError, RecordError, RecordErrorCause};
pub use ids::{IdGenerator, IdMode, RandomIds, StableIds};
pub use mapper::{HeaderIndex, MapOutcome, MappedRecord, SourceRecord, map_record};
pub use normalize::{InvalidValuePolicy, Literal, NormalizeError, normalize};
pub use pipeline::{
    Generated, ImportOptions, ImportStats, default_output_path, generate, import_file,
};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use settings::{ImportSettings, OptionOverrides};
pub use statement::render_insert;
