/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

use crate::shapefile::geometry::ShapeType;
use std::io;
use std::path::PathBuf;

/// Errors raised while reading or writing shapefile components.
#[derive(Debug, thiserror::Error)]
pub enum ShapefileError {
    #[error("file {path} not found or not readable: {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("not a shapefile: file code {0}, expected 9994")]
    InvalidFileCode(i32),
    #[error("malformed file header: {0}")]
    MalformedHeader(String),
    #[error("malformed record {record}: {reason}")]
    MalformedRecord { record: usize, reason: String },
    #[error("malformed attribute table: {0}")]
    MalformedTable(String),
    #[error("shape type {0} cannot be written")]
    UnsupportedShapeType(ShapeType),
}
