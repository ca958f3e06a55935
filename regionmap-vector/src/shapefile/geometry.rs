/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/
use regionmap_common::structures::{BoundingBox, Point2D};
use std::fmt;

/// One record of a .shp file, reduced to the data needed for region building.
///
/// Parts and XY points are only decoded for the polyline and polygon
/// families; every other shape type carries empty `parts` and `points`.
/// Z and M arrays are never kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeRecord {
    /// 1-based record number from the record header.
    pub record_number: i32,
    /// Raw shape type code; kept so unknown codes can still be reported.
    pub shape_type_code: i32,
    pub num_parts: i32,
    pub parts: Vec<i32>,
    pub points: Vec<Point2D>,
}

impl ShapeRecord {
    pub fn new(record_number: i32, shape_type: ShapeType) -> ShapeRecord {
        ShapeRecord {
            record_number,
            shape_type_code: shape_type.to_int(),
            ..Default::default()
        }
    }

    /// A polygon record with one part per slice in `parts`.
    pub fn polygon(record_number: i32, parts: &[Vec<Point2D>]) -> ShapeRecord {
        let mut sfg = ShapeRecord::new(record_number, ShapeType::Polygon);
        for part in parts {
            sfg.add_part(part);
        }
        sfg
    }

    /// The recognized shape type, or `None` for a code outside the format.
    pub fn shape_type(&self) -> Option<ShapeType> {
        ShapeType::from_int(self.shape_type_code)
    }

    /// Zero-based index of the record, derived from its record number.
    pub fn index(&self) -> Option<usize> {
        if self.record_number < 1 {
            return None;
        }
        Some(self.record_number as usize - 1)
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Adds a part of Point2Ds to the record.
    pub fn add_part(&mut self, points: &[Point2D]) {
        self.parts.push(self.points.len() as i32);
        self.num_parts += 1i32;
        self.points.extend_from_slice(points);
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }
}

#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
    MultiPatch = 31,
}

impl ShapeType {
    pub fn from_int(value: i32) -> Option<ShapeType> {
        let st = match value {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            31 => ShapeType::MultiPatch,
            _ => return None,
        };
        Some(st)
    }

    pub fn to_int(&self) -> i32 {
        *self as i32
    }

    pub fn base_shape_type(&self) -> ShapeType {
        match self {
            ShapeType::Null => ShapeType::Null,
            ShapeType::Point | ShapeType::PointZ | ShapeType::PointM => ShapeType::Point,
            ShapeType::PolyLine | ShapeType::PolyLineZ | ShapeType::PolyLineM => {
                ShapeType::PolyLine
            }
            ShapeType::Polygon | ShapeType::PolygonZ | ShapeType::PolygonM => ShapeType::Polygon,
            ShapeType::MultiPoint | ShapeType::MultiPointZ | ShapeType::MultiPointM => {
                ShapeType::MultiPoint
            }
            ShapeType::MultiPatch => ShapeType::MultiPatch,
        }
    }

    pub fn is_polygon(&self) -> bool {
        self.base_shape_type() == ShapeType::Polygon
    }

    /// Whether records of this type start with a bounding box, part list
    /// and XY point list.
    pub fn has_parts(&self) -> bool {
        matches!(
            self.base_shape_type(),
            ShapeType::PolyLine | ShapeType::Polygon
        )
    }
}

impl Default for ShapeType {
    fn default() -> ShapeType {
        ShapeType::Null
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
            ShapeType::PointZ => "PointZ",
            ShapeType::PolyLineZ => "PolyLineZ",
            ShapeType::PolygonZ => "PolygonZ",
            ShapeType::MultiPointZ => "MultiPointZ",
            ShapeType::PointM => "PointM",
            ShapeType::PolyLineM => "PolyLineM",
            ShapeType::PolygonM => "PolygonM",
            ShapeType::MultiPointM => "MultiPointM",
            ShapeType::MultiPatch => "MultiPatch",
        };
        write!(f, "{}", printable)
    }
}

#[cfg(test)]
mod test {
    use super::{ShapeRecord, ShapeType};
    use regionmap_common::structures::Point2D;

    #[test]
    fn test_shape_type_codes() {
        assert_eq!(ShapeType::from_int(5), Some(ShapeType::Polygon));
        assert_eq!(ShapeType::Polygon.to_int(), 5);
        assert_eq!(ShapeType::from_int(25), Some(ShapeType::PolygonM));
        assert_eq!(ShapeType::from_int(7), None);
        assert!(ShapeType::PolygonZ.is_polygon());
        assert!(!ShapeType::PolyLine.is_polygon());
        assert!(ShapeType::PolyLineM.has_parts());
        assert!(!ShapeType::MultiPoint.has_parts());
    }

    #[test]
    fn test_polygon_part_offsets() {
        let record = ShapeRecord::polygon(
            4,
            &[
                vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)],
                vec![Point2D::new(5.0, 5.0)],
            ],
        );
        assert_eq!(record.num_parts, 2);
        assert_eq!(record.parts, vec![0, 2]);
        assert_eq!(record.num_points(), 3);
        assert_eq!(record.index(), Some(3));
        assert_eq!(record.shape_type(), Some(ShapeType::Polygon));
    }
}
