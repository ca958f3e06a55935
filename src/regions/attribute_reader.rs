/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT

Notes: Copies attribute table columns onto the regions read from the
twin geometry source. Record i of the table belongs to region i.
*/

use super::{AttributeDialect, Region, RegionField, RegionSet, RegionWarning};
use crate::error::LoadError;
use regionmap_vector::{AttributeTable, FieldData};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AttributeReader {
    dialect: AttributeDialect,
}

impl AttributeReader {
    pub fn new(dialect: AttributeDialect) -> AttributeReader {
        AttributeReader { dialect }
    }

    pub fn dialect(&self) -> &AttributeDialect {
        &self.dialect
    }

    pub fn read<P: AsRef<Path>>(&self, path: P, regions: &mut RegionSet) -> Result<(), LoadError> {
        self.dialect.validate()?;
        let table = AttributeTable::open(path)?;
        self.read_table(&table, regions)
    }

    /// Assigns the dialect's columns onto `regions`.
    ///
    /// All checks that can fail the load run before the first region is
    /// touched, so an error leaves `regions` unchanged.
    pub fn read_table(&self, table: &AttributeTable, regions: &mut RegionSet) -> Result<(), LoadError> {
        self.dialect.validate()?;
        if table.num_fields() != self.dialect.expected_fields {
            return Err(LoadError::SchemaMismatch {
                dialect: self.dialect.name.clone(),
                expected: self.dialect.expected_fields,
                found: table.num_fields(),
            });
        }
        let records = table.num_records();
        if records > regions.len() {
            return Err(LoadError::RecordCountMismatch {
                records,
                regions: regions.len(),
            });
        }
        if records < regions.len() {
            warn!(
                records,
                regions = regions.len(),
                "attribute table is shorter than the geometry source"
            );
        }

        for i in 0..records {
            if table.is_deleted(i) {
                debug!(record = i, "attribute record is flagged as deleted");
            }
            let region = &mut regions[i];
            for mapping in &self.dialect.columns {
                let value = table.get_value(i, mapping.column).unwrap_or(&FieldData::Null);
                assign(region, mapping.field, value);
            }
        }

        debug!(
            records,
            dialect = %self.dialect.name,
            "read attributes"
        );
        Ok(())
    }
}

fn assign(region: &mut Region, field: RegionField, value: &FieldData) {
    match field {
        RegionField::Name => region.name = as_text(value),
        RegionField::AdminCode => {
            region.admin_code_text = as_text(value);
            region.admin_code = as_integer(region, field, value);
        }
        RegionField::Population => region.population = as_integer(region, field, value),
        RegionField::Category => region.category = as_text(value),
        RegionField::StateCode => region.state_code = as_text(value),
        RegionField::CountyCode => region.county_code = as_text(value),
    }
}

fn as_text(value: &FieldData) -> Option<String> {
    if value.is_null() {
        return None;
    }
    Some(value.to_string())
}

/// Reads an integer cell. Unparsable cells are recorded on the region and
/// read as unset.
fn as_integer(region: &mut Region, field: RegionField, value: &FieldData) -> Option<i64> {
    let parsed = match value {
        FieldData::Null => return None,
        FieldData::Int(v) => Some(*v),
        FieldData::Real(v) if v.is_finite() && v.fract() == 0f64 => Some(*v as i64),
        FieldData::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        let value = value.to_string();
        warn!(id = region.id, %field, %value, "malformed numeric field");
        region
            .warnings
            .push(RegionWarning::MalformedNumericField { field, value });
    }
    parsed
}

#[cfg(test)]
mod test {
    use super::AttributeReader;
    use crate::error::LoadError;
    use crate::regions::{AttributeDialect, RegionField, RegionSet, RegionWarning};
    use regionmap_vector::{AttributeField, AttributeTable, FieldData, ShapeType, ShapefileWriter};
    use std::io::Cursor;

    fn table(fields: usize, rows: Vec<Vec<FieldData>>) -> AttributeTable {
        let mut writer = ShapefileWriter::new(ShapeType::Polygon);
        for j in 0..fields {
            writer.add_field(AttributeField::new(&format!("F{}", j), 'C', 16, 0));
        }
        for row in rows {
            writer.add_null(row);
        }
        let mut buf = vec![];
        writer.write_dbf(&mut buf).unwrap();
        AttributeTable::from_reader(Cursor::new(buf)).unwrap()
    }

    fn text(s: &str) -> FieldData {
        FieldData::Text(s.to_string())
    }

    fn germany_row(name: &str, ags: &str, ewz: &str, bez: &str) -> Vec<FieldData> {
        let mut row = vec![FieldData::Null; 23];
        row[5] = text(name);
        row[3] = text(ags);
        row[18] = text(ewz);
        row[6] = text(bez);
        row
    }

    #[test]
    fn test_germany_dialect() {
        let table = table(
            23,
            vec![
                germany_row("Flensburg", "01001", "89934", "Kreisfreie Stadt"),
                germany_row("Kiel", "01002", "246601", "Kreisfreie Stadt"),
            ],
        );
        let mut regions = RegionSet::with_len(2);
        AttributeReader::new(AttributeDialect::germany())
            .read_table(&table, &mut regions)
            .unwrap();

        assert_eq!(regions[1].name.as_deref(), Some("Kiel"));
        assert_eq!(regions[1].admin_code_text.as_deref(), Some("01002"));
        assert_eq!(regions[1].admin_code, Some(1002));
        assert_eq!(regions[1].population, Some(246601));
        assert_eq!(regions[0].category.as_deref(), Some("Kreisfreie Stadt"));
        assert!(regions[0].warnings.is_empty());
    }

    #[test]
    fn test_usa_dialect() {
        let mut row = vec![FieldData::Null; 9];
        row[0] = text("01");
        row[1] = text("001");
        row[5] = text("Autauga");
        let table = table(9, vec![row]);
        let mut regions = RegionSet::with_len(1);
        AttributeReader::new(AttributeDialect::usa())
            .read_table(&table, &mut regions)
            .unwrap();
        assert_eq!(regions[0].name.as_deref(), Some("Autauga"));
        assert_eq!(regions[0].state_code.as_deref(), Some("01"));
        assert_eq!(regions[0].county_code.as_deref(), Some("001"));
        assert_eq!(regions[0].admin_code, None);
    }

    #[test]
    fn test_dialect_mismatch() {
        let table = table(9, vec![vec![FieldData::Null; 9]]);
        let mut regions = RegionSet::with_len(1);
        let result = AttributeReader::new(AttributeDialect::germany()).read_table(&table, &mut regions);
        match result {
            Err(LoadError::SchemaMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, 23);
                assert_eq!(found, 9);
            }
            other => panic!("expected a schema mismatch, got {:?}", other),
        }
        assert_eq!(regions, RegionSet::with_len(1));
    }

    #[test]
    fn test_malformed_admin_code_is_a_warning() {
        let table = table(
            23,
            vec![
                germany_row("Bad", "01O02", "100", "Kreis"),
                germany_row("Good", "01003", "200", "Kreis"),
            ],
        );
        let mut regions = RegionSet::with_len(2);
        AttributeReader::new(AttributeDialect::germany())
            .read_table(&table, &mut regions)
            .unwrap();

        assert_eq!(regions[0].admin_code, None);
        assert_eq!(regions[0].admin_code_text.as_deref(), Some("01O02"));
        assert_eq!(
            regions[0].warnings,
            vec![RegionWarning::MalformedNumericField {
                field: RegionField::AdminCode,
                value: "01O02".to_string(),
            }]
        );
        assert_eq!(regions[1].admin_code, Some(1003));
        assert_eq!(regions[1].population, Some(200));
    }

    #[test]
    fn test_more_records_than_regions() {
        let table = table(9, vec![vec![FieldData::Null; 9]; 3]);
        let mut regions = RegionSet::with_len(2);
        assert!(matches!(
            AttributeReader::new(AttributeDialect::usa()).read_table(&table, &mut regions),
            Err(LoadError::RecordCountMismatch { records: 3, regions: 2 })
        ));
    }

    #[test]
    fn test_fewer_records_leave_regions_unset() {
        let mut row = vec![FieldData::Null; 9];
        row[5] = text("Baldwin");
        let table = table(9, vec![row]);
        let mut regions = RegionSet::with_len(2);
        AttributeReader::new(AttributeDialect::usa())
            .read_table(&table, &mut regions)
            .unwrap();
        assert_eq!(regions[0].name.as_deref(), Some("Baldwin"));
        assert_eq!(regions[1].name, None);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut regions = RegionSet::with_len(1);
        let result = AttributeReader::new(AttributeDialect::usa())
            .read(dir.path().join("none.dbf"), &mut regions);
        assert!(matches!(result, Err(LoadError::SourceNotFound { .. })));
    }
}
