/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT

Notes: Writes small polygon shapefiles (.shp, .shx and .dbf), used to
produce sample datasets and fixtures.
*/

use super::attributes::{AttributeField, FieldData};
use super::geometry::{ShapeRecord, ShapeType};
use super::{FILE_CODE, HEADER_LENGTH};
use crate::error::ShapefileError;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use chrono::{Datelike, Local};
use regionmap_common::structures::{BoundingBox, Point2D};
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;

/// Accumulates records and their attribute rows, then writes the
/// three shapefile components in one go.
///
/// Only Null, Point, PolyLine and Polygon records can be written.
#[derive(Default, Clone)]
pub struct ShapefileWriter {
    pub shape_type: ShapeType,
    pub fields: Vec<AttributeField>,
    records: Vec<ShapeRecord>,
    rows: Vec<Vec<FieldData>>,
}

impl ShapefileWriter {
    pub fn new(shape_type: ShapeType) -> ShapefileWriter {
        ShapefileWriter {
            shape_type,
            ..Default::default()
        }
    }

    pub fn add_field(&mut self, field: AttributeField) {
        self.fields.push(field);
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Adds a record as-is, keeping its record number.
    pub fn add_record(&mut self, record: ShapeRecord, attributes: Vec<FieldData>) {
        self.records.push(record);
        self.rows.push(attributes);
    }

    /// Adds a polygon record numbered after the records already added.
    pub fn add_polygon(&mut self, parts: &[Vec<Point2D>], attributes: Vec<FieldData>) {
        let record = ShapeRecord::polygon(self.records.len() as i32 + 1, parts);
        self.add_record(record, attributes);
    }

    pub fn add_null(&mut self, attributes: Vec<FieldData>) {
        let record = ShapeRecord::new(self.records.len() as i32 + 1, ShapeType::Null);
        self.add_record(record, attributes);
    }

    /// Writes `<path>.shp`, `<path>.shx` and `<path>.dbf`.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), ShapefileError> {
        let path = path.as_ref();
        let mut shp = BufWriter::new(File::create(path.with_extension("shp"))?);
        self.write_shp(&mut shp)?;
        shp.flush()?;
        let mut shx = BufWriter::new(File::create(path.with_extension("shx"))?);
        self.write_shx(&mut shx)?;
        shx.flush()?;
        let mut dbf = BufWriter::new(File::create(path.with_extension("dbf"))?);
        self.write_dbf(&mut dbf)?;
        dbf.flush()?;
        Ok(())
    }

    /// Length of the record content in bytes, excluding the 8 byte record header.
    fn content_length(&self, record: &ShapeRecord) -> Result<usize, ShapefileError> {
        match record.shape_type() {
            Some(ShapeType::Null) => Ok(4),
            Some(ShapeType::Point) => Ok(20),
            Some(ShapeType::PolyLine) | Some(ShapeType::Polygon) => {
                Ok(44 + 4 * record.parts.len() + 16 * record.points.len())
            }
            Some(st) => Err(ShapefileError::UnsupportedShapeType(st)),
            None => Err(ShapefileError::MalformedRecord {
                record: record.record_number as usize,
                reason: format!("unknown shape type {}", record.shape_type_code),
            }),
        }
    }

    fn extent(&self) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for record in &self.records {
            for p in &record.points {
                bb.expand_to_point(p);
            }
        }
        if bb.is_empty() {
            return BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        }
        bb
    }

    fn write_header<W: Write>(&self, writer: &mut W, file_length: usize) -> Result<(), ShapefileError> {
        writer.write_i32::<BigEndian>(FILE_CODE)?;
        // unused header bytes
        for _ in 0..5 {
            writer.write_i32::<BigEndian>(0i32)?;
        }
        writer.write_i32::<BigEndian>((file_length / 2) as i32)?; // in 16-bit words
        writer.write_i32::<LittleEndian>(1000i32)?; // version
        writer.write_i32::<LittleEndian>(self.shape_type.to_int())?;

        let bb = self.extent();
        writer.write_f64::<LittleEndian>(bb.min_x)?;
        writer.write_f64::<LittleEndian>(bb.min_y)?;
        writer.write_f64::<LittleEndian>(bb.max_x)?;
        writer.write_f64::<LittleEndian>(bb.max_y)?;
        // z and m ranges
        for _ in 0..4 {
            writer.write_f64::<LittleEndian>(0f64)?;
        }
        Ok(())
    }

    pub fn write_shp<W: Write>(&self, writer: &mut W) -> Result<(), ShapefileError> {
        let mut size = HEADER_LENGTH;
        for record in &self.records {
            size += 8 + self.content_length(record)?;
        }
        self.write_header(writer, size)?;

        for record in &self.records {
            let content_length = self.content_length(record)?;
            writer.write_i32::<BigEndian>(record.record_number)?;
            writer.write_i32::<BigEndian>((content_length / 2) as i32)?;
            writer.write_i32::<LittleEndian>(record.shape_type_code)?;
            match record.shape_type() {
                Some(ShapeType::Point) => {
                    let p = record.points.first().copied().unwrap_or_default();
                    writer.write_f64::<LittleEndian>(p.x)?;
                    writer.write_f64::<LittleEndian>(p.y)?;
                }
                Some(ShapeType::PolyLine) | Some(ShapeType::Polygon) => {
                    let bb = if record.points.is_empty() {
                        BoundingBox::new(0.0, 0.0, 0.0, 0.0)
                    } else {
                        record.get_bounding_box()
                    };
                    writer.write_f64::<LittleEndian>(bb.min_x)?;
                    writer.write_f64::<LittleEndian>(bb.min_y)?;
                    writer.write_f64::<LittleEndian>(bb.max_x)?;
                    writer.write_f64::<LittleEndian>(bb.max_y)?;
                    writer.write_i32::<LittleEndian>(record.parts.len() as i32)?;
                    writer.write_i32::<LittleEndian>(record.points.len() as i32)?;
                    for part in &record.parts {
                        writer.write_i32::<LittleEndian>(*part)?;
                    }
                    for p in &record.points {
                        writer.write_f64::<LittleEndian>(p.x)?;
                        writer.write_f64::<LittleEndian>(p.y)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn write_shx<W: Write>(&self, writer: &mut W) -> Result<(), ShapefileError> {
        self.write_header(writer, HEADER_LENGTH + 8 * self.records.len())?;
        let mut pos = HEADER_LENGTH;
        for record in &self.records {
            let content_length = self.content_length(record)?;
            writer.write_i32::<BigEndian>((pos / 2) as i32)?;
            writer.write_i32::<BigEndian>((content_length / 2) as i32)?;
            pos += 8 + content_length;
        }
        Ok(())
    }

    pub fn write_dbf<W: Write>(&self, writer: &mut W) -> Result<(), ShapefileError> {
        let header_length = 32 + 32 * self.fields.len() + 1;
        let record_length = 1 + self
            .fields
            .iter()
            .map(|f| f.field_length as usize)
            .sum::<usize>();
        if header_length > u16::MAX as usize || record_length > u16::MAX as usize {
            return Err(ShapefileError::MalformedTable(
                "too many fields for a dBASE table".to_string(),
            ));
        }

        let today = Local::now().date_naive();
        writer.write_u8(0x03)?; // dBASE III without memo
        writer.write_u8((today.year() - 1900).clamp(0, 255) as u8)?;
        writer.write_u8(today.month() as u8)?;
        writer.write_u8(today.day() as u8)?;
        writer.write_u32::<LittleEndian>(self.records.len() as u32)?;
        writer.write_u16::<LittleEndian>(header_length as u16)?;
        writer.write_u16::<LittleEndian>(record_length as u16)?;
        writer.write_all(&[0u8; 20])?;

        for field in &self.fields {
            let mut name = [0u8; 11];
            for (i, b) in field.name.bytes().take(10).enumerate() {
                name[i] = b;
            }
            writer.write_all(&name)?;
            writer.write_u8(field.field_type as u8)?;
            writer.write_all(&[0u8; 4])?;
            writer.write_u8(field.field_length)?;
            writer.write_u8(field.decimal_count)?;
            writer.write_all(&[0u8; 14])?;
        }
        writer.write_u8(0x0d)?;

        let empty = vec![];
        for i in 0..self.records.len() {
            let row = self.rows.get(i).unwrap_or(&empty);
            writer.write_u8(0x20)?; // not deleted
            for (j, field) in self.fields.iter().enumerate() {
                let value = row.get(j).cloned().unwrap_or(FieldData::Null);
                writer.write_all(format_cell(field, &value).as_bytes())?;
            }
        }
        writer.write_u8(0x1a)?;
        Ok(())
    }
}

/// Fixed-width text for one cell: text left aligned, numbers right aligned,
/// truncated to the field length.
fn format_cell(field: &AttributeField, value: &FieldData) -> String {
    let width = field.field_length as usize;
    let text = match value {
        FieldData::Null => String::new(),
        FieldData::Real(v) => format!("{:.*}", field.decimal_count as usize, v),
        FieldData::Date(d) => d.format("%Y%m%d").to_string(),
        FieldData::Bool(b) => (if *b { "T" } else { "F" }).to_string(),
        other => other.to_string(),
    };
    let text: String = text.chars().filter(|c| c.is_ascii()).take(width).collect();
    if field.is_numeric() {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

#[cfg(test)]
mod test {
    use super::ShapefileWriter;
    use crate::shapefile::attributes::{AttributeField, AttributeTable, FieldData};
    use crate::shapefile::geometry::{ShapeRecord, ShapeType};
    use crate::shapefile::ShapefileReader;
    use crate::ShapefileError;
    use regionmap_common::structures::Point2D;

    #[test]
    fn test_write_all_components() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("regions");
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_field(AttributeField::new("NAME", 'C', 20, 0));
        writer.add_field(AttributeField::new("EWZ", 'N', 9, 0));
        writer.add_polygon(
            &[vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(1.0, 0.0),
                Point2D::new(1.0, 1.0),
            ]],
            vec![FieldData::Text("Aachen".to_string()), FieldData::Int(248960)],
        );
        writer.write(&base).unwrap();

        let shx_len = std::fs::metadata(base.with_extension("shx")).unwrap().len();
        assert_eq!(shx_len, 108);

        let mut reader = ShapefileReader::open(base.with_extension("shp")).unwrap();
        assert_eq!(reader.num_records(), 1);
        assert_eq!(reader.read_record(0).unwrap().num_points(), 3);

        let table = AttributeTable::open(base.with_extension("dbf")).unwrap();
        assert_eq!(table.num_fields(), 2);
        assert_eq!(
            table.get_value(0, 0),
            Some(&FieldData::Text("Aachen".to_string()))
        );
        assert_eq!(table.get_value(0, 1), Some(&FieldData::Int(248960)));
    }

    #[test]
    fn test_unsupported_shape_type() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_record(ShapeRecord::new(1, ShapeType::PolygonZ), vec![]);
        let mut buf = vec![];
        assert!(matches!(
            writer.write_shp(&mut buf),
            Err(ShapefileError::UnsupportedShapeType(ShapeType::PolygonZ))
        ));
    }
}
