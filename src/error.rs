/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

use regionmap_common::configs::ConfigError;
use regionmap_vector::ShapefileError;
use std::io;
use std::path::PathBuf;

/// Errors that abort a region load. Data-quality problems confined to a
/// single region are reported as `RegionWarning`s instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file {path} not found or not readable: {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("attribute table has {found} fields, dialect '{dialect}' expects {expected}")]
    SchemaMismatch {
        dialect: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid attribute dialect '{dialect}': {reason}")]
    InvalidDialect { dialect: String, reason: String },
    #[error("unknown attribute dialect '{0}'")]
    UnknownDialect(String),
    #[error("attribute table has {records} records, geometry source has {regions}")]
    RecordCountMismatch { records: usize, regions: usize },
    #[error("record {record} carries record number {record_number}, outside 1..={count}")]
    RecordIdOutOfRange {
        record: usize,
        record_number: i32,
        count: usize,
    },
    #[error(transparent)]
    Shapefile(ShapefileError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ShapefileError> for LoadError {
    fn from(e: ShapefileError) -> LoadError {
        match e {
            ShapefileError::SourceNotFound { path, source } => {
                LoadError::SourceNotFound { path, source }
            }
            other => LoadError::Shapefile(other),
        }
    }
}
