/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

use super::{AttributeDialect, AttributeReader, GeometryReader, RegionSet};
use crate::error::LoadError;
use regionmap_common::configs::Configs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, info_span};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub normalize_longitude: bool,
    /// Attribute layout of the .dbf twin; `None` loads geometry only.
    pub dialect: Option<AttributeDialect>,
}

/// Loads a shapefile and its attribute table into a `RegionSet`.
#[derive(Debug, Clone, Default)]
pub struct RegionLoader {
    pub options: LoadOptions,
}

impl RegionLoader {
    pub fn new(options: LoadOptions) -> RegionLoader {
        RegionLoader { options }
    }

    /// Builds a loader from settings. The dialect name "none" disables
    /// attribute reading.
    pub fn from_configs(configs: &Configs) -> Result<RegionLoader, LoadError> {
        let dialect = match configs.dialect.trim().to_lowercase().as_str() {
            "" | "none" => None,
            name => Some(
                AttributeDialect::from_name(name)
                    .ok_or_else(|| LoadError::UnknownDialect(configs.dialect.clone()))?,
            ),
        };
        Ok(RegionLoader::new(LoadOptions {
            normalize_longitude: configs.normalize_longitude,
            dialect,
        }))
    }

    /// Loads `shp` and, when a dialect is set, the .dbf file next to it.
    pub fn load<P: AsRef<Path>>(&self, shp: P) -> Result<RegionSet, LoadError> {
        let shp = shp.as_ref();
        let dbf = shp.with_extension("dbf");
        self.load_pair(shp, dbf)
    }

    pub fn load_pair<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        shp: P,
        dbf: Q,
    ) -> Result<RegionSet, LoadError> {
        let shp: PathBuf = shp.as_ref().to_path_buf();
        let span = info_span!("load", shp = %shp.display());
        let _enter = span.enter();
        let start = Instant::now();

        let mut regions = GeometryReader::new(self.options.normalize_longitude).read(&shp)?;
        if let Some(dialect) = &self.options.dialect {
            let dbf = dbf.as_ref();
            AttributeReader::new(dialect.clone()).read(dbf, &mut regions)?;
            info!(dbf = %dbf.display(), dialect = %dialect.name, "attributes attached");
        }

        info!(
            regions = regions.len(),
            rings = regions.num_rings(),
            warnings = regions.num_warnings(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded regions"
        );
        Ok(regions)
    }
}
