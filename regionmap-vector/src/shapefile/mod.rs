/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT

Notes: Read access to the geometry component (.shp) of an ESRI Shapefile.
*/

pub mod attributes;
pub mod geometry;
pub mod writer;

use self::geometry::*;
use crate::error::ShapefileError;
use regionmap_common::structures::Point2D;
use regionmap_common::utils::{ByteOrderReader, Endianness};
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

pub(crate) const FILE_CODE: i32 = 9994;
pub(crate) const HEADER_LENGTH: usize = 100;
const RECORD_HEADER_LENGTH: usize = 8;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShapefileHeader {
    pub file_code: i32,        // BigEndian; value is 9994
    pub file_length: i32,      // BigEndian; in 16-bit words
    pub version: i32,          // LittleEndian
    pub shape_type: i32,       // LittleEndian
    pub x_min: f64,            // LittleEndian
    pub y_min: f64,            // LittleEndian
    pub x_max: f64,            // LittleEndian
    pub y_max: f64,            // LittleEndian
    pub z_min: f64,            // LittleEndian; 0 if shapeType not z or measured
    pub z_max: f64,            // LittleEndian; 0 if shapeType not z or measured
    pub m_min: f64,            // LittleEndian; 0 if shapeType not z or measured
    pub m_max: f64,            // LittleEndian; 0 if shapeType not z or measured
}

impl ShapefileHeader {
    fn read<R: Read + Seek>(bor: &mut ByteOrderReader<R>) -> Result<ShapefileHeader, ShapefileError> {
        if bor.len() < HEADER_LENGTH {
            return Err(ShapefileError::MalformedHeader(format!(
                "file is {} bytes, shorter than the {} byte header",
                bor.len(),
                HEADER_LENGTH
            )));
        }
        let mut header = ShapefileHeader::default();

        // Note: the shapefile format uses mixed endianness, so the
        // reader's byte order is switched part way through the header.
        bor.set_byte_order(Endianness::BigEndian);
        bor.seek(0)?;
        header.file_code = bor.read_i32()?;
        if header.file_code != FILE_CODE {
            return Err(ShapefileError::InvalidFileCode(header.file_code));
        }
        bor.seek(24)?;
        header.file_length = bor.read_i32()?;

        bor.set_byte_order(Endianness::LittleEndian);
        header.version = bor.read_i32()?;
        header.shape_type = bor.read_i32()?;

        // bounding box
        header.x_min = bor.read_f64()?;
        header.y_min = bor.read_f64()?;
        header.x_max = bor.read_f64()?;
        header.y_max = bor.read_f64()?;
        header.z_min = bor.read_f64()?;
        header.z_max = bor.read_f64()?;
        header.m_min = bor.read_f64()?;
        header.m_max = bor.read_f64()?;
        Ok(header)
    }
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shape_type = match ShapeType::from_int(self.shape_type) {
            Some(st) => st.to_string(),
            None => format!("Unknown({})", self.shape_type),
        };
        write!(
            f,
            "file_code: {}
file_length: {}
version: {}
shape_type: {}
x_min: {}
x_max: {}
y_min: {}
y_max: {}",
            self.file_code,
            self.file_length,
            self.version,
            shape_type,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max
        )
    }
}

#[derive(Debug, Copy, Clone)]
struct RecordOffset {
    pos: usize,
    content_length: usize,
}

/// Record-at-a-time reader over a .shp file.
///
/// Opening the reader parses the file header and walks the record headers
/// once to build an offset table, so the record count is known before any
/// record content is decoded. The underlying handle is released when the
/// reader is dropped.
///
/// ```no_run
/// # use regionmap_vector::ShapefileReader;
/// let mut reader = ShapefileReader::open("counties.shp")?;
/// for i in 0..reader.num_records() {
///     let record = reader.read_record(i)?;
///     println!("{} parts", record.num_parts);
/// }
/// # Ok::<(), regionmap_vector::ShapefileError>(())
/// ```
pub struct ShapefileReader<R: Read + Seek> {
    pub header: ShapefileHeader,
    bor: ByteOrderReader<R>,
    offsets: Vec<RecordOffset>,
}

impl ShapefileReader<BufReader<File>> {
    /// Opens a .shp file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ShapefileError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|source| ShapefileError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened geometry source");
        ShapefileReader::from_reader(BufReader::new(f))
    }
}

impl<R: Read + Seek> ShapefileReader<R> {
    pub fn from_reader(reader: R) -> Result<Self, ShapefileError> {
        let mut bor = ByteOrderReader::new(reader, Endianness::BigEndian)?;
        let header = ShapefileHeader::read(&mut bor)?;
        let offsets = scan_records(&mut bor, &header)?;
        debug!(
            records = offsets.len(),
            shape_type = header.shape_type,
            "indexed shapefile records"
        );
        Ok(ShapefileReader {
            header,
            bor,
            offsets,
        })
    }

    /// The total number of records (entities) in the file.
    pub fn num_records(&self) -> usize {
        self.offsets.len()
    }

    /// The header shape type, if it is a recognized code.
    pub fn shape_type(&self) -> Option<ShapeType> {
        ShapeType::from_int(self.header.shape_type)
    }

    /// Decodes the record at position `index` in file order.
    pub fn read_record(&mut self, index: usize) -> Result<ShapeRecord, ShapefileError> {
        let offset = match self.offsets.get(index) {
            Some(o) => *o,
            None => {
                return Err(ShapefileError::MalformedRecord {
                    record: index,
                    reason: format!("only {} records in file", self.offsets.len()),
                })
            }
        };
        let malformed = |reason: String| ShapefileError::MalformedRecord {
            record: index,
            reason,
        };

        let bor = &mut self.bor;
        bor.seek(offset.pos)?;
        bor.set_byte_order(Endianness::BigEndian);
        let record_number = bor.read_i32()?;
        bor.inc_pos(4)?; // content length, already in the offset table

        if offset.content_length < 4 {
            return Err(malformed("content too short to hold a shape type".to_string()));
        }
        bor.set_byte_order(Endianness::LittleEndian);
        let shape_type_code = bor.read_i32()?;
        let mut sfg = ShapeRecord {
            record_number,
            shape_type_code,
            ..Default::default()
        };

        let shape_type = match ShapeType::from_int(shape_type_code) {
            Some(st) => st,
            None => {
                warn!(record = index, code = shape_type_code, "unknown shape type");
                return Ok(sfg);
            }
        };
        if !shape_type.has_parts() {
            return Ok(sfg);
        }

        // bounding box (32 bytes) then part and point counts
        if offset.content_length < 44 {
            return Err(malformed(format!(
                "{} record needs at least 44 bytes, has {}",
                shape_type, offset.content_length
            )));
        }
        bor.inc_pos(32)?;
        let num_parts = bor.read_i32()?;
        let num_points = bor.read_i32()?;
        if num_parts < 0 || num_points < 0 {
            return Err(malformed(format!(
                "negative counts: {} parts, {} points",
                num_parts, num_points
            )));
        }
        let required = 44 + 4 * num_parts as usize + 16 * num_points as usize;
        if required > offset.content_length {
            return Err(malformed(format!(
                "declares {} parts and {} points but holds only {} bytes",
                num_parts, num_points, offset.content_length
            )));
        }

        sfg.num_parts = num_parts;
        sfg.parts.reserve(num_parts as usize);
        let mut previous = 0i32;
        for part in 0..num_parts as usize {
            let start = bor.read_i32()?;
            if start < previous || start > num_points {
                return Err(malformed(format!(
                    "part {} starts at vertex {}, outside {}..={}",
                    part, start, previous, num_points
                )));
            }
            previous = start;
            sfg.parts.push(start);
        }

        sfg.points.reserve(num_points as usize);
        for _ in 0..num_points {
            sfg.points.push(Point2D {
                x: bor.read_f64()?,
                y: bor.read_f64()?,
            });
        }

        Ok(sfg)
    }

    /// Iterates over all records in file order.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            next: 0,
        }
    }

    /// Releases the source. Dropping the reader has the same effect.
    pub fn close(self) -> R {
        self.bor.into_inner()
    }
}

pub struct Records<'a, R: Read + Seek> {
    reader: &'a mut ShapefileReader<R>,
    next: usize,
}

impl<'a, R: Read + Seek> Iterator for Records<'a, R> {
    type Item = Result<ShapeRecord, ShapefileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.reader.num_records() {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.reader.read_record(index))
    }
}

fn scan_records<R: Read + Seek>(
    bor: &mut ByteOrderReader<R>,
    header: &ShapefileHeader,
) -> Result<Vec<RecordOffset>, ShapefileError> {
    let declared_len = header.file_length.max(0) as usize * 2;
    let end = if declared_len > bor.len() {
        warn!(
            declared = declared_len,
            actual = bor.len(),
            "shapefile is shorter than its header declares"
        );
        bor.len()
    } else {
        declared_len
    };

    let mut offsets = vec![];
    let mut pos = HEADER_LENGTH;
    bor.set_byte_order(Endianness::BigEndian);
    while pos + RECORD_HEADER_LENGTH <= end {
        bor.seek(pos + 4)?; // the record number is read with the record
        let content_length = bor.read_i32()?;
        if content_length < 0 {
            return Err(ShapefileError::MalformedRecord {
                record: offsets.len(),
                reason: format!("negative content length {}", content_length),
            });
        }
        let content_length = content_length as usize * 2; // in bytes
        if pos + RECORD_HEADER_LENGTH + content_length > end {
            return Err(ShapefileError::MalformedRecord {
                record: offsets.len(),
                reason: "content runs past the end of the file".to_string(),
            });
        }
        offsets.push(RecordOffset {
            pos,
            content_length,
        });
        pos += RECORD_HEADER_LENGTH + content_length;
    }
    if pos < end {
        warn!(trailing = end - pos, "ignoring trailing bytes after the last record");
    }
    Ok(offsets)
}

#[cfg(test)]
mod test {
    use super::geometry::{ShapeRecord, ShapeType};
    use super::writer::ShapefileWriter;
    use super::ShapefileReader;
    use crate::error::ShapefileError;
    use regionmap_common::structures::Point2D;
    use std::io::Cursor;

    fn shp_bytes(writer: &ShapefileWriter) -> Vec<u8> {
        let mut buf = vec![];
        writer.write_shp(&mut buf).unwrap();
        buf
    }

    fn triangle(dx: f64) -> Vec<Point2D> {
        vec![
            Point2D::new(dx, 0.0),
            Point2D::new(dx + 1.0, 0.0),
            Point2D::new(dx + 1.0, 1.0),
        ]
    }

    #[test]
    fn test_read_polygon_records() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_polygon(&[triangle(0.0), triangle(5.0)], vec![]);
        writer.add_polygon(&[triangle(10.0)], vec![]);
        let mut reader = ShapefileReader::from_reader(Cursor::new(shp_bytes(&writer))).unwrap();

        assert_eq!(reader.num_records(), 2);
        assert_eq!(reader.shape_type(), Some(ShapeType::Polygon));
        assert_eq!(reader.header.x_min, 0.0);
        assert_eq!(reader.header.x_max, 11.0);

        let first = reader.read_record(0).unwrap();
        assert_eq!(first.record_number, 1);
        assert_eq!(first.num_parts, 2);
        assert_eq!(first.parts, vec![0, 3]);
        assert_eq!(first.points[4], Point2D::new(6.0, 0.0));

        let records: Vec<ShapeRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].points, triangle(10.0));
    }

    #[test]
    fn test_non_polygon_records_carry_no_points() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_null(vec![]);
        let mut point = ShapeRecord::new(2, ShapeType::Point);
        point.points.push(Point2D::new(1.0, 2.0));
        writer.add_record(point, vec![]);
        let mut reader = ShapefileReader::from_reader(Cursor::new(shp_bytes(&writer))).unwrap();

        let null = reader.read_record(0).unwrap();
        assert_eq!(null.shape_type(), Some(ShapeType::Null));
        let point = reader.read_record(1).unwrap();
        assert_eq!(point.shape_type(), Some(ShapeType::Point));
        assert_eq!(point.num_parts, 0);
        assert!(point.points.is_empty());
    }

    #[test]
    fn test_bad_file_code() {
        let mut bytes = vec![0u8; 100];
        bytes[3] = 1;
        match ShapefileReader::from_reader(Cursor::new(bytes)) {
            Err(ShapefileError::InvalidFileCode(1)) => {}
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_short_header() {
        let bytes = vec![0u8; 40];
        assert!(matches!(
            ShapefileReader::from_reader(Cursor::new(bytes)),
            Err(ShapefileError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_part_index_past_point_count() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        let mut record = ShapeRecord::polygon(1, &[triangle(0.0), triangle(2.0)]);
        record.parts[1] = 9;
        writer.add_record(record, vec![]);
        let mut reader = ShapefileReader::from_reader(Cursor::new(shp_bytes(&writer))).unwrap();
        match reader.read_record(0) {
            Err(ShapefileError::MalformedRecord { record: 0, .. }) => {}
            other => panic!("expected a malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_record() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_polygon(&[triangle(0.0)], vec![]);
        let mut bytes = shp_bytes(&writer);
        // keep the declared file length but drop the last vertex
        bytes.truncate(bytes.len() - 16);
        assert!(matches!(
            ShapefileReader::from_reader(Cursor::new(bytes)),
            Err(ShapefileError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.shp");
        match ShapefileReader::open(&path) {
            Err(ShapefileError::SourceNotFound { path: p, .. }) => assert_eq!(p, path),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }
}
