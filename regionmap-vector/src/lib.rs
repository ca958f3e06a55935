/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

// private sub-module defined in other files
mod error;
pub mod shapefile;

// exports identifiers from private sub-modules in the current module namespace
pub use crate::error::ShapefileError;
pub use crate::shapefile::attributes::*;
pub use crate::shapefile::geometry::*;
pub use crate::shapefile::writer::ShapefileWriter;
pub use crate::shapefile::{ShapefileHeader, ShapefileReader};
pub use regionmap_common::structures::Point2D;
