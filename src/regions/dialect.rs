/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

use crate::error::LoadError;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// The region attribute a table column feeds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionField {
    Name,
    /// Sets `admin_code_text` and the parsed `admin_code`.
    AdminCode,
    Population,
    Category,
    StateCode,
    CountyCode,
}

impl fmt::Display for RegionField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            RegionField::Name => "name",
            RegionField::AdminCode => "admin_code",
            RegionField::Population => "population",
            RegionField::Category => "category",
            RegionField::StateCode => "state_code",
            RegionField::CountyCode => "county_code",
        };
        write!(f, "{}", printable)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub field: RegionField,
    /// Zero-based column position in the table.
    pub column: usize,
}

/// Column layout of one dataset's attribute table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDialect {
    pub name: String,
    /// Exact number of fields a table of this dialect has.
    pub expected_fields: usize,
    pub columns: Vec<ColumnMapping>,
}

impl AttributeDialect {
    pub fn new(name: &str, expected_fields: usize) -> AttributeDialect {
        AttributeDialect {
            name: name.to_string(),
            expected_fields,
            columns: vec![],
        }
    }

    pub fn with_column(mut self, field: RegionField, column: usize) -> AttributeDialect {
        self.columns.push(ColumnMapping { field, column });
        self
    }

    /// German districts (VG250 Kreise), 23 fields.
    pub fn germany() -> AttributeDialect {
        AttributeDialect::new("germany", 23)
            .with_column(RegionField::Name, 5)
            .with_column(RegionField::AdminCode, 3)
            .with_column(RegionField::Population, 18)
            .with_column(RegionField::Category, 6)
    }

    /// US counties (Census cartographic boundaries), 9 fields.
    pub fn usa() -> AttributeDialect {
        AttributeDialect::new("usa", 9)
            .with_column(RegionField::Name, 5)
            .with_column(RegionField::StateCode, 0)
            .with_column(RegionField::CountyCode, 1)
    }

    /// Looks up a built-in dialect by name, ignoring case.
    pub fn from_name(name: &str) -> Option<AttributeDialect> {
        match name.to_lowercase().as_str() {
            "germany" | "de" => Some(AttributeDialect::germany()),
            "usa" | "us" => Some(AttributeDialect::usa()),
            _ => None,
        }
    }

    /// Checks that every mapped column exists in a table of this dialect.
    pub fn validate(&self) -> Result<(), LoadError> {
        for mapping in &self.columns {
            if mapping.column >= self.expected_fields {
                return Err(LoadError::InvalidDialect {
                    dialect: self.name.clone(),
                    reason: format!(
                        "{} is mapped to column {} but the dialect has {} fields",
                        mapping.field, mapping.column, self.expected_fields
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{AttributeDialect, RegionField};
    use crate::error::LoadError;

    #[test]
    fn test_builtin_dialects_are_valid() {
        let germany = AttributeDialect::from_name("Germany").unwrap();
        assert_eq!(germany.expected_fields, 23);
        assert!(germany.validate().is_ok());
        let usa = AttributeDialect::from_name("us").unwrap();
        assert_eq!(usa.expected_fields, 9);
        assert!(usa.validate().is_ok());
        assert!(AttributeDialect::from_name("france").is_none());
    }

    #[test]
    fn test_column_outside_dialect() {
        let dialect = AttributeDialect::new("tiny", 2).with_column(RegionField::Name, 2);
        assert!(matches!(
            dialect.validate(),
            Err(LoadError::InvalidDialect { .. })
        ));
    }

    #[test]
    fn test_dialect_from_json() {
        let json = r#"{
            "name": "custom",
            "expected_fields": 3,
            "columns": [
                { "field": "name", "column": 2 },
                { "field": "admin_code", "column": 0 }
            ]
        }"#;
        let dialect: AttributeDialect = serde_json::from_str(json).unwrap();
        assert_eq!(dialect.columns[1].field, RegionField::AdminCode);
        assert!(dialect.validate().is_ok());
    }
}
