/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT

Notes: Turns the polygon records of a .shp file into region rings.
*/

use super::{Region, RegionSet, RegionWarning, Ring};
use crate::error::LoadError;
use regionmap_common::structures::Point2D;
use regionmap_vector::{ShapeRecord, ShapefileReader};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// Factor applied to both coordinates so that low-precision renderers
/// keep sub-degree detail.
pub const DISPLAY_SCALE: f64 = 100.0;

/// Reads polygon geometry into a `RegionSet` indexed by record id.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryReader {
    /// Shift negative longitudes into [180, 360) so that regions crossing
    /// the antimeridian stay contiguous.
    pub normalize_longitude: bool,
}

impl GeometryReader {
    pub fn new(normalize_longitude: bool) -> GeometryReader {
        GeometryReader {
            normalize_longitude,
        }
    }

    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<RegionSet, LoadError> {
        let reader = ShapefileReader::open(path)?;
        self.read_from(reader)
    }

    /// Consumes `reader`; the source is released on return, including on error.
    pub fn read_from<R: Read + Seek>(
        &self,
        mut reader: ShapefileReader<R>,
    ) -> Result<RegionSet, LoadError> {
        let entities = reader.num_records();
        let mut regions = RegionSet::with_len(entities);
        let mut written = vec![false; entities];

        for i in 0..entities {
            let record = reader.read_record(i)?;

            // Record order in the file need not match record ids.
            let id = match record.index() {
                Some(id) if id < entities => id,
                _ => {
                    return Err(LoadError::RecordIdOutOfRange {
                        record: i,
                        record_number: record.record_number,
                        count: entities,
                    })
                }
            };
            if written[id] {
                warn!(id, record = i, "duplicate record id, overwriting earlier record");
            }
            written[id] = true;

            let mut region = Region::new(id);
            region.part_count = record.num_parts.max(0) as usize;
            region.shape_type = record.shape_type();

            // only polygon shapes are used
            if region.is_polygon() {
                let (rings, warnings) = self.build_rings(&record);
                for w in &warnings {
                    warn!(id, warning = ?w, "degenerate ring");
                }
                region.polygons = rings;
                region.warnings = warnings;
            } else {
                debug!(id, shape_type = record.shape_type_code, "skipping non-polygon record");
            }
            regions[id] = region;
        }
        reader.close();

        debug!(
            regions = regions.len(),
            rings = regions.num_rings(),
            normalize_longitude = self.normalize_longitude,
            "read geometry"
        );
        Ok(regions)
    }

    /// Splits a polygon record into closed rings, one per declared part.
    ///
    /// A record with at most one part yields a single ring over all of its
    /// vertices. Every ring gets a copy of its first vertex appended, even
    /// if the source already closes it.
    pub fn build_rings(&self, record: &ShapeRecord) -> (Vec<Ring>, Vec<RegionWarning>) {
        let num_points = record.points.len();
        let num_parts = record.num_parts.max(0) as usize;

        let mut start_indices = Vec::with_capacity(num_parts.max(1) + 1);
        if num_parts > 1 {
            let mut previous = 0usize;
            for part in 0..num_parts {
                let start = record
                    .parts
                    .get(part)
                    .map_or(num_points, |s| (*s).max(0) as usize)
                    .clamp(previous, num_points);
                start_indices.push(start);
                previous = start;
            }
        } else {
            start_indices.push(0);
        }
        start_indices.push(num_points);

        let mut rings = Vec::with_capacity(start_indices.len() - 1);
        let mut warnings = vec![];
        for (part, range) in start_indices.windows(2).enumerate() {
            let source = &record.points[range[0]..range[1]];
            let mut ring: Ring = Vec::with_capacity(source.len() + 1);
            ring.extend(source.iter().map(|p| self.transform(p)));
            // add the first point again to get a closed polygon
            if let Some(first) = ring.first().copied() {
                ring.push(first);
            }
            if source.len() < 2 {
                warnings.push(RegionWarning::DegenerateRing {
                    part,
                    points: source.len(),
                });
            }
            rings.push(ring);
        }
        (rings, warnings)
    }

    /// Maps a source vertex to display coordinates.
    pub fn transform(&self, p: &Point2D) -> Point2D {
        let x = if self.normalize_longitude && p.x < 0f64 {
            p.x + 360f64
        } else {
            p.x
        };
        Point2D::new(x, p.y).scale(DISPLAY_SCALE)
    }
}
