/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/
// private sub-module defined in other files
mod ring_orientation;

// exports identifiers from private sub-modules in the current module namespace
pub use self::ring_orientation::{signed_edge_sum, winding_direction, WindingDirection, YAxis};
