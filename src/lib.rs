/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

//! Reads polygon shapefiles and their dBASE attribute tables into a set of
//! map regions scaled for display.

// private sub-module defined in other files
mod error;
pub mod logging;
pub mod regions;

// exports identifiers from private sub-modules in the current module namespace
pub use crate::error::LoadError;
pub use crate::regions::{
    AttributeDialect, AttributeReader, ColumnMapping, GeometryReader, LoadOptions, Region,
    RegionField, RegionLoader, RegionSet, RegionWarning, Ring, DISPLAY_SCALE,
};
pub use regionmap_common::algorithms::{
    signed_edge_sum, winding_direction, WindingDirection, YAxis,
};
pub use regionmap_common::configs::Configs;
pub use regionmap_common::structures::{BoundingBox, Point2D};
