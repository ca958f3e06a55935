/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

pub mod algorithms;
pub mod configs;
pub mod structures;
pub mod utils;
