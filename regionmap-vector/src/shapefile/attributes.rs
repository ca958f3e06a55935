/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT

NOTE: Structures and functions for reading the attribute table
contained in the .dbf file that accompanies a shapefile.
*/

use crate::error::ShapefileError;
use chrono::NaiveDate;
use regionmap_common::utils::{ByteOrderReader, Endianness};
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

const FIELD_DESCRIPTOR_LENGTH: usize = 32;
const HEADER_TERMINATOR: u8 = 0x0d;
const DELETED_FLAG: u8 = 0x2a;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttributeHeader {
    pub version: u8,
    /// Date of last update; `None` when the stored date is not a real date.
    pub last_update: Option<NaiveDate>,
    pub num_records: u32,
    pub num_fields: u32, // not actually stored in file but derived
    pub bytes_in_header: u16,
    pub bytes_in_record: u16,
    pub incomplete_transaction: u8,
    pub encryption_flag: u8,
    pub mdx_flag: u8,
    pub language_driver_id: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Int(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    Bool(bool),
    Null,
}

impl FieldData {
    pub fn is_null(&self) -> bool {
        *self == FieldData::Null
    }
}

impl fmt::Display for FieldData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldData::Int(v) => write!(f, "{}", v),
            FieldData::Real(v) => write!(f, "{}", v),
            FieldData::Text(v) => write!(f, "{}", v),
            FieldData::Date(v) => write!(f, "{}", v),
            FieldData::Bool(v) => write!(f, "{}", v),
            FieldData::Null => write!(f, ""),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttributeField {
    pub name: String,
    pub field_type: char,
    pub field_length: u8,
    pub decimal_count: u8,
}

impl AttributeField {
    pub fn new(name: &str, field_type: char, field_length: u8, decimal_count: u8) -> AttributeField {
        AttributeField {
            name: name.to_string(),
            field_type,
            field_length,
            decimal_count,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.field_type, 'N' | 'F' | 'I' | 'O')
    }

    /// Decodes the fixed-width text of one cell.
    fn parse_value(&self, raw: &str) -> FieldData {
        let str_rep = raw.replace(char::from(0), "");
        let str_rep = str_rep.trim();
        if str_rep.replace('?', "").is_empty() {
            return FieldData::Null;
        }
        match self.field_type {
            'N' | 'F' | 'I' | 'O' => {
                if self.decimal_count == 0 {
                    if let Ok(v) = str_rep.parse::<i64>() {
                        return FieldData::Int(v);
                    }
                }
                match str_rep.parse::<f64>() {
                    Ok(v) => FieldData::Real(v),
                    // left for the caller to judge
                    Err(_) => FieldData::Text(str_rep.to_string()),
                }
            }
            'D' => match NaiveDate::parse_from_str(str_rep, "%Y%m%d") {
                Ok(d) => FieldData::Date(d),
                Err(_) => FieldData::Null,
            },
            'L' => match str_rep.chars().next() {
                Some('T') | Some('t') | Some('Y') | Some('y') => FieldData::Bool(true),
                Some('F') | Some('f') | Some('N') | Some('n') => FieldData::Bool(false),
                _ => FieldData::Null,
            },
            // treat it like a string
            _ => FieldData::Text(str_rep.to_string()),
        }
    }
}

/// An in-memory dBASE table.
#[derive(Debug, Default, Clone)]
pub struct AttributeTable {
    pub header: AttributeHeader,
    pub fields: Vec<AttributeField>,
    data: Vec<Vec<FieldData>>,
    deleted: Vec<bool>,
}

impl AttributeTable {
    /// Reads a .dbf file. The handle is closed before this returns.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<AttributeTable, ShapefileError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|source| ShapefileError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened attribute source");
        AttributeTable::from_reader(BufReader::new(f))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<AttributeTable, ShapefileError> {
        let mut bor = ByteOrderReader::new(reader, Endianness::LittleEndian)?;
        if bor.len() < 32 {
            return Err(ShapefileError::MalformedTable(format!(
                "file is {} bytes, shorter than the 32 byte header",
                bor.len()
            )));
        }
        let mut table = AttributeTable::default();
        table.read_header(&mut bor)?;
        table.read_field_descriptors(&mut bor)?;
        table.read_records(&mut bor)?;
        debug!(
            records = table.num_records(),
            fields = table.num_fields(),
            "read attribute table"
        );
        Ok(table)
    }

    fn read_header<R: Read + Seek>(&mut self, bor: &mut ByteOrderReader<R>) -> Result<(), ShapefileError> {
        let header = &mut self.header;
        header.version = bor.read_u8()?;
        let year = 1900i32 + bor.read_u8()? as i32;
        let month = bor.read_u8()? as u32;
        let day = bor.read_u8()? as u32;
        header.last_update = NaiveDate::from_ymd_opt(year, month, day);
        header.num_records = bor.read_u32()?;
        header.bytes_in_header = bor.read_u16()?;
        header.bytes_in_record = bor.read_u16()?;
        // reserved bytes
        bor.inc_pos(2)?;
        header.incomplete_transaction = bor.read_u8()?;
        header.encryption_flag = bor.read_u8()?;
        // skip free record thread for LAN only
        bor.inc_pos(4)?;
        // reserved for multi-user dBASE in dBASE III+
        bor.inc_pos(8)?;
        header.mdx_flag = bor.read_u8()?;
        header.language_driver_id = bor.read_u8()?;
        // reserved bytes
        bor.inc_pos(2)?;
        Ok(())
    }

    fn read_field_descriptors<R: Read + Seek>(
        &mut self,
        bor: &mut ByteOrderReader<R>,
    ) -> Result<(), ShapefileError> {
        self.fields = vec![];
        // Valid .dbf files end the field descriptor array with 0x0d.
        loop {
            if bor.remaining() == 0 {
                return Err(ShapefileError::MalformedTable(
                    "field descriptor array is not terminated".to_string(),
                ));
            }
            if bor.peek_u8()? == HEADER_TERMINATOR {
                break;
            }
            if bor.remaining() < FIELD_DESCRIPTOR_LENGTH {
                return Err(ShapefileError::MalformedTable(format!(
                    "field descriptor {} is truncated",
                    self.fields.len()
                )));
            }
            let name = bor.read_utf8(11)?.replace(char::from(0), "");
            let field_type = char::from(bor.read_u8()?);
            bor.inc_pos(4)?;
            let field_length = bor.read_u8()?;
            let decimal_count = bor.read_u8()?;
            // work area id, set fields flag, index field flag and reserved bytes
            bor.inc_pos(14)?;
            self.fields.push(AttributeField {
                name: name.trim().to_string(),
                field_type,
                field_length,
                decimal_count,
            });
        }
        self.header.num_fields = self.fields.len() as u32;
        Ok(())
    }

    fn read_records<R: Read + Seek>(&mut self, bor: &mut ByteOrderReader<R>) -> Result<(), ShapefileError> {
        let bytes_in_record = self.header.bytes_in_record as usize;
        let field_bytes: usize = self.fields.iter().map(|f| f.field_length as usize).sum();
        if field_bytes + 1 > bytes_in_record {
            return Err(ShapefileError::MalformedTable(format!(
                "fields need {} bytes per record, header declares {}",
                field_bytes + 1,
                bytes_in_record
            )));
        }
        let start = self.header.bytes_in_header as usize;
        let num_records = self.header.num_records as usize;
        if start + num_records * bytes_in_record > bor.len() {
            return Err(ShapefileError::MalformedTable(format!(
                "{} records of {} bytes do not fit in the file",
                num_records, bytes_in_record
            )));
        }

        self.data = Vec::with_capacity(num_records);
        self.deleted = Vec::with_capacity(num_records);
        for i in 0..num_records {
            bor.seek(start + i * bytes_in_record)?;
            let deleted = bor.read_u8()? == DELETED_FLAG;
            let mut rec: Vec<FieldData> = Vec::with_capacity(self.fields.len());
            for field in &self.fields {
                let raw = bor.read_utf8(field.field_length as usize)?;
                rec.push(field.parse_value(&raw));
            }
            self.data.push(rec);
            self.deleted.push(deleted);
        }
        Ok(())
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn num_records(&self) -> usize {
        self.data.len()
    }

    pub fn get_record(&self, index: usize) -> Option<&[FieldData]> {
        self.data.get(index).map(|r| r.as_slice())
    }

    pub fn get_value(&self, record_index: usize, field_index: usize) -> Option<&FieldData> {
        self.data.get(record_index)?.get(field_index)
    }

    pub fn is_deleted(&self, record_index: usize) -> bool {
        self.deleted.get(record_index).copied().unwrap_or(false)
    }

    pub fn get_field_num(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn get_field_info(&self, index: usize) -> Option<&AttributeField> {
        self.fields.get(index)
    }
}

#[cfg(test)]
mod test {
    use super::{AttributeField, AttributeTable, FieldData};
    use crate::shapefile::geometry::ShapeType;
    use crate::shapefile::writer::ShapefileWriter;
    use crate::ShapefileError;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn dbf_bytes(writer: &ShapefileWriter) -> Vec<u8> {
        let mut buf = vec![];
        writer.write_dbf(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_field_types() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_field(AttributeField::new("NAME", 'C', 12, 0));
        writer.add_field(AttributeField::new("AGS", 'C', 8, 0));
        writer.add_field(AttributeField::new("EWZ", 'N', 10, 0));
        writer.add_field(AttributeField::new("SHARE", 'N', 8, 3));
        writer.add_field(AttributeField::new("SINCE", 'D', 8, 0));
        writer.add_field(AttributeField::new("COAST", 'L', 1, 0));
        writer.add_null(vec![
            FieldData::Text("Kiel".to_string()),
            FieldData::Text("01002000".to_string()),
            FieldData::Int(246601),
            FieldData::Real(0.25),
            FieldData::Date(NaiveDate::from_ymd_opt(1990, 10, 3).unwrap()),
            FieldData::Bool(true),
        ]);
        writer.add_null(vec![FieldData::Text("Leer".to_string())]);

        let table = AttributeTable::from_reader(Cursor::new(dbf_bytes(&writer))).unwrap();
        assert_eq!(table.num_fields(), 6);
        assert_eq!(table.num_records(), 2);
        assert_eq!(table.get_field_num("EWZ"), Some(2));
        assert!(table.get_field_info(3).unwrap().is_numeric());
        assert!(table.header.last_update.is_some());

        let rec = table.get_record(0).unwrap();
        assert_eq!(rec[0], FieldData::Text("Kiel".to_string()));
        // leading zeros survive in character fields
        assert_eq!(rec[1], FieldData::Text("01002000".to_string()));
        assert_eq!(rec[2], FieldData::Int(246601));
        assert_eq!(rec[3], FieldData::Real(0.25));
        assert_eq!(
            rec[4],
            FieldData::Date(NaiveDate::from_ymd_opt(1990, 10, 3).unwrap())
        );
        assert_eq!(rec[5], FieldData::Bool(true));

        assert!(table.get_value(1, 2).unwrap().is_null());
        assert!(!table.is_deleted(1));
        assert_eq!(table.get_value(2, 0), None);
    }

    #[test]
    fn test_unterminated_descriptors() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_field(AttributeField::new("NAME", 'C', 12, 0));
        let mut bytes = dbf_bytes(&writer);
        bytes.truncate(32 + 32);
        assert!(matches!(
            AttributeTable::from_reader(Cursor::new(bytes)),
            Err(ShapefileError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_records_past_end_of_file() {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        writer.add_field(AttributeField::new("NAME", 'C', 12, 0));
        writer.add_null(vec![FieldData::Text("A".to_string())]);
        writer.add_null(vec![FieldData::Text("B".to_string())]);
        let mut bytes = dbf_bytes(&writer);
        bytes.truncate(bytes.len() - 14);
        assert!(matches!(
            AttributeTable::from_reader(Cursor::new(bytes)),
            Err(ShapefileError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_parse_numeric_garbage_as_text() {
        let field = AttributeField::new("EWZ", 'N', 6, 0);
        assert_eq!(field.parse_value("  12a "), FieldData::Text("12a".to_string()));
        assert_eq!(field.parse_value("      "), FieldData::Null);
        assert_eq!(field.parse_value("  -42 "), FieldData::Int(-42));
    }
}
