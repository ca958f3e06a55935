/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

// private sub-module defined in other files
mod attribute_reader;
mod dialect;
mod geometry_reader;
mod loader;

// exports identifiers from private sub-modules in the current module namespace
pub use self::attribute_reader::AttributeReader;
pub use self::dialect::{AttributeDialect, ColumnMapping, RegionField};
pub use self::geometry_reader::{GeometryReader, DISPLAY_SCALE};
pub use self::loader::{LoadOptions, RegionLoader};

use regionmap_common::algorithms::{winding_direction, WindingDirection, YAxis};
use regionmap_common::structures::{BoundingBox, Point2D};
use regionmap_vector::ShapeType;
use serde::Serializer;
use serde_derive::Serialize;
use std::ops::{Index, IndexMut};
use std::slice;

/// A closed sequence of display coordinates; the first point is repeated last.
///
/// A part with no source vertices yields an empty ring, flagged with a
/// `RegionWarning::DegenerateRing` on its region. Check `is_empty()` before
/// indexing.
pub type Ring = Vec<Point2D>;

/// A non-fatal data-quality finding attached to a single region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionWarning {
    /// A cell that should hold an integer could not be parsed; the field is left unset.
    MalformedNumericField { field: RegionField, value: String },
    /// A part with fewer than two source vertices.
    DegenerateRing { part: usize, points: usize },
}

/// One administrative or geographic unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Region {
    /// Record index in the geometry source.
    pub id: usize,
    /// Number of parts the source record declared.
    pub part_count: usize,
    #[serde(serialize_with = "serialize_shape_type")]
    pub shape_type: Option<ShapeType>,
    /// Rings in part order.
    pub polygons: Vec<Ring>,

    pub name: Option<String>,
    /// Administrative code as stored, e.g. "01002000" (German AGS).
    pub admin_code_text: Option<String>,
    /// `admin_code_text` parsed as an integer.
    pub admin_code: Option<i64>,
    pub population: Option<i64>,
    /// Category label, e.g. "Kreisfreie Stadt".
    pub category: Option<String>,
    pub state_code: Option<String>,
    pub county_code: Option<String>,

    pub warnings: Vec<RegionWarning>,
}

impl Region {
    pub fn new(id: usize) -> Region {
        Region {
            id,
            ..Default::default()
        }
    }

    pub fn is_polygon(&self) -> bool {
        self.shape_type.map_or(false, |st| st.is_polygon())
    }

    pub fn num_points(&self) -> usize {
        self.polygons.iter().map(|r| r.len()).sum()
    }

    /// Extent of all rings; inverted (`is_empty()`) when there are none.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for ring in &self.polygons {
            for p in ring {
                bb.expand_to_point(p);
            }
        }
        bb
    }

    /// Winding direction of ring `index` under the given axis convention.
    pub fn ring_direction(&self, index: usize, y_axis: YAxis) -> Option<WindingDirection> {
        self.polygons
            .get(index)
            .map(|ring| winding_direction(ring, y_axis))
    }
}

fn serialize_shape_type<S: Serializer>(st: &Option<ShapeType>, s: S) -> Result<S::Ok, S::Error> {
    match st {
        Some(st) => s.serialize_some(&st.to_string()),
        None => s.serialize_none(),
    }
}

/// The regions of one load, indexed by region id.
///
/// The set is sized once from the record count and written by id; it
/// never grows or shrinks afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// A set of `len` empty regions with ids `0..len`.
    pub fn with_len(len: usize) -> RegionSet {
        RegionSet {
            regions: (0..len).map(Region::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    pub fn iter(&self) -> slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn num_rings(&self) -> usize {
        self.regions.iter().map(|r| r.polygons.len()).sum()
    }

    pub fn num_warnings(&self) -> usize {
        self.regions.iter().map(|r| r.warnings.len()).sum()
    }

    /// Extent of every ring in the set.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for region in &self.regions {
            let rbb = region.bounding_box();
            if !rbb.is_empty() {
                bb.expand_to(rbb);
            }
        }
        bb
    }
}

impl Index<usize> for RegionSet {
    type Output = Region;

    fn index(&self, id: usize) -> &Region {
        &self.regions[id]
    }
}

impl IndexMut<usize> for RegionSet {
    fn index_mut(&mut self, id: usize) -> &mut Region {
        &mut self.regions[id]
    }
}

impl<'a> IntoIterator for &'a RegionSet {
    type Item = &'a Region;
    type IntoIter = slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}
