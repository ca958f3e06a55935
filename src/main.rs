/*
This code is part of the RegionMap shapefile-to-region library.
Authors: RegionMap developers
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/

use regionmap::logging::init_logging;
use regionmap::{
    winding_direction, AttributeDialect, LoadError, RegionLoader, RegionSet, WindingDirection,
    YAxis,
};
use regionmap_common::configs::{read_configs, ConfigError};
use regionmap_common::utils::get_formatted_elapsed_time;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no input file given, see --help")]
    MissingInput,
    #[error("unrecognized argument '{0}', see --help")]
    UnknownArgument(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode regions as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

/// Strips any of `flags` from the front of `arg` and returns the value after
/// the '=' sign, without quotes.
fn flag_value(arg: &str, flags: &[&str]) -> Option<String> {
    for flag in flags {
        if let Some(rest) = arg.strip_prefix(flag) {
            if let Some(v) = rest.strip_prefix('=') {
                return Some(v.replace('"', "").replace('\'', ""));
            }
        }
    }
    None
}

fn run() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        help();
        return Ok(());
    }

    let mut settings_dir: Option<PathBuf> = None;
    let mut input: Option<PathBuf> = None;
    let mut dbf: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut dialect: Option<String> = None;
    let mut normalize_longitude = false;
    let mut verbose = false;
    for arg in &args {
        let arg = arg.trim();
        if arg == "-h" || arg == "--help" {
            help();
            return Ok(());
        } else if arg == "--version" {
            version();
            return Ok(());
        } else if let Some(v) = flag_value(arg, &["--wd", "--cd"]) {
            settings_dir = Some(PathBuf::from(v));
        } else if let Some(v) = flag_value(arg, &["--input", "-i"]) {
            input = Some(PathBuf::from(v));
        } else if let Some(v) = flag_value(arg, &["--dbf"]) {
            dbf = Some(PathBuf::from(v));
        } else if let Some(v) = flag_value(arg, &["--output", "-o"]) {
            output = Some(PathBuf::from(v));
        } else if let Some(v) = flag_value(arg, &["--dialect"]) {
            dialect = Some(v);
        } else if arg == "--normalize_longitude" {
            normalize_longitude = true;
        } else if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else {
            return Err(CliError::UnknownArgument(arg.to_string()));
        }
    }

    let settings_dir = match settings_dir {
        Some(dir) => dir,
        None => env::current_dir().map_err(|source| CliError::Output {
            path: PathBuf::from("."),
            source,
        })?,
    };
    let mut configs = read_configs(&settings_dir)?;
    let working_dir = configs.working_dir(&settings_dir);
    configs.verbose_mode |= verbose;
    configs.normalize_longitude |= normalize_longitude;
    if let Some(d) = dialect {
        configs.dialect = d;
    }
    init_logging(configs.verbose_mode);

    let input = resolve(&working_dir, input.ok_or(CliError::MissingInput)?);
    let dbf = resolve(&working_dir, dbf.unwrap_or_else(|| input.with_extension("dbf")));

    let start = Instant::now();
    let loader = RegionLoader::from_configs(&configs)?;
    let regions = loader.load_pair(&input, &dbf)?;
    print_summary(&input, &regions, loader.options.dialect.as_ref());
    println!("Elapsed time: {}", get_formatted_elapsed_time(start));

    if let Some(output) = output {
        let output = resolve(&working_dir, output);
        write_json(&output, &regions)?;
        println!("Regions written to {}", output.display());
    }
    Ok(())
}

fn resolve(working_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        working_dir.join(path)
    }
}

fn print_summary(input: &Path, regions: &RegionSet, dialect: Option<&AttributeDialect>) {
    let mut polygon_regions = 0;
    let mut outer = 0;
    let mut holes = 0;
    let mut degenerate = 0;
    for region in regions {
        if !region.is_polygon() {
            continue;
        }
        polygon_regions += 1;
        // display coordinates keep the source's y-up axis
        for ring in &region.polygons {
            match winding_direction(ring, YAxis::Up) {
                WindingDirection::Clockwise => outer += 1,
                WindingDirection::CounterClockwise => holes += 1,
                WindingDirection::Degenerate => degenerate += 1,
            }
        }
    }

    println!("Input: {}", input.display());
    match dialect {
        Some(d) => println!("Attribute dialect: {}", d.name),
        None => println!("Attribute dialect: none"),
    }
    println!("Records: {}", regions.len());
    println!("Polygon regions: {}", polygon_regions);
    println!(
        "Rings: {} ({} outer, {} holes, {} degenerate)",
        regions.num_rings(),
        outer,
        holes,
        degenerate
    );
    let bb = regions.bounding_box();
    if !bb.is_empty() {
        println!(
            "Extent: x {} to {}, y {} to {}",
            bb.min_x, bb.max_x, bb.min_y, bb.max_y
        );
    }
    println!("Warnings: {}", regions.num_warnings());
}

fn write_json(path: &Path, regions: &RegionSet) -> Result<(), CliError> {
    let to_output_error = |source| CliError::Output {
        path: path.to_path_buf(),
        source,
    };
    let f = File::create(path).map_err(to_output_error)?;
    let mut writer = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut writer, regions)?;
    writer.flush().map_err(to_output_error)
}

fn help() {
    let mut ext = "";
    if cfg!(target_os = "windows") {
        ext = ".exe";
    }
    let exe_name = format!("regionmap{}", ext);
    let s = "regionmap Help

Reads a polygon shapefile and its attribute table into display regions.

The following commands are recognized:
-i, --input            Input .shp file; -i=kreise.shp
--dbf                  Attribute table; defaults to the .dbf next to the input.
--dialect              Attribute layout: germany, usa or none.
--normalize_longitude  Shift negative longitudes by 360 degrees.
-o, --output           Writes the regions as JSON; -o=regions.json
--wd, --cd             Directory holding settings.json; relative paths resolve
                       against it unless settings.json sets working_directory.
-v, --verbose          Verbose logging.
-h, --help             Prints help information.
--version              Prints the version.

Example Usage:
>> EXE_NAME --wd=\"/path/to/data\" -i=counties.shp --dialect=usa --normalize_longitude -o=counties.json
"
    .replace("EXE_NAME", &exe_name);
    println!("{}", s);
}

fn version() {
    const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
    println!("regionmap v{}", VERSION.unwrap_or("unknown"));
}
