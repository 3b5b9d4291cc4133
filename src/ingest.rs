//! Reading lap times and the driver table from comma-separated files.
//!
//! Layout of the lap time source, one row per completed lap:
//!
//! ```text
//! raceId,driverId,lap,position,time,milliseconds
//! 841,20,1,1,"1:38.109",98109
//! ```
//!
//! A leading `raceId,...` header row, blank lines, surrounding whitespace and
//! double quotes are tolerated. Rows are only split on commas; quoted commas are not supported.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{LapTime, OwnerId, Record};

/// What to do with a row that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestMode {
    /// Log the row and carry on.
    #[default]
    Lenient,
    /// Stop at the first bad row.
    Strict,
}

const LAP_TIME_COLUMNS: usize = 6;

/// Parse lap time rows from any buffered reader.
pub fn parse_lap_times<R: BufRead>(reader: R, mode: IngestMode) -> Result<Vec<LapTime>> {
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (n, (line, cells)) in rows_of(reader)?.into_iter().enumerate() {
        if n == 0 && is_header(&cells, "raceId") {
            debug!("skipping header at line {line}");
            continue;
        }
        match parse_lap_time(&cells) {
            Ok(row) => rows.push(row),
            Err(reason) => match mode {
                IngestMode::Strict => return Err(Error::MalformedRow { line, reason }),
                IngestMode::Lenient => {
                    warn!("skipping line {line}: {reason}");
                    skipped += 1;
                }
            },
        }
    }

    info!("ingested {} lap times ({skipped} rows skipped)", rows.len());
    Ok(rows)
}

/// Open and parse a lap time file.
pub fn load_lap_times(path: &Path, mode: IngestMode) -> Result<Vec<LapTime>> {
    let file = File::open(path)?;
    parse_lap_times(BufReader::new(file), mode)
}

fn parse_lap_time(cells: &[String]) -> std::result::Result<LapTime, String> {
    if cells.len() < LAP_TIME_COLUMNS {
        return Err(format!(
            "expected {LAP_TIME_COLUMNS} columns, found {}",
            cells.len()
        ));
    }
    let race_id = parse_u32(&cells[0], "raceId")?;
    let owner_id = parse_u32(&cells[1], "driverId")?;
    let lap = parse_u32(&cells[2], "lap")?;
    let position = parse_u32(&cells[3], "position")?;
    let record = Record::parse(owner_id, cells[4].as_str(), &cells[5]).map_err(|e| e.to_string())?;

    Ok(LapTime {
        race_id,
        lap,
        position,
        record,
    })
}

fn parse_u32(cell: &str, column: &str) -> std::result::Result<u32, String> {
    cell.parse()
        .map_err(|_| format!("{column} {cell:?} is not a non-negative integer"))
}

/// Split every non-blank line into trimmed, unquoted cells.
/// Line numbers are 1-based.
fn rows_of<R: BufRead>(reader: R) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<String> = line.split(',').map(|cell| unquote(cell).to_string()).collect();
        rows.push((i + 1, cells));
    }
    Ok(rows)
}

fn unquote(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
}

/// A header row names its first column; anything else is data.
fn is_header(cells: &[String], first_column: &str) -> bool {
    cells.first().is_some_and(|c| c.eq_ignore_ascii_case(first_column))
}

/// Maps driver ids to display names. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct DriverDirectory {
    names: HashMap<OwnerId, String>,
}

impl DriverDirectory {
    /// Parse rows of `driverId,driverRef,number,code,forename,surname,...`.
    ///
    /// The display name is "forename surname", or the driver reference when
    /// both are missing. Unparseable rows are skipped: the directory only
    /// feeds reporting.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut names = HashMap::new();
        for (n, (line, cells)) in rows_of(reader)?.into_iter().enumerate() {
            if n == 0 && is_header(&cells, "driverId") {
                continue;
            }
            let Ok(id) = cells[0].parse::<OwnerId>() else {
                warn!("skipping driver at line {line}: bad id {:?}", cells[0]);
                continue;
            };
            names.insert(id, display_name(&cells));
        }
        info!("loaded {} drivers", names.len());
        Ok(DriverDirectory { names })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Display name for `owner_id`, or `#<id>` if unknown.
    pub fn name(&self, owner_id: OwnerId) -> Cow<'_, str> {
        match self.names.get(&owner_id) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("#{owner_id}")),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(OwnerId, String)> for DriverDirectory {
    fn from_iter<I: IntoIterator<Item = (OwnerId, String)>>(iter: I) -> Self {
        DriverDirectory {
            names: iter.into_iter().collect(),
        }
    }
}

fn display_name(cells: &[String]) -> String {
    let present = |i: usize| {
        cells
            .get(i)
            .map(String::as_str)
            .filter(|c| !c.is_empty() && *c != "\\N")
    };
    match (present(4), present(5)) {
        (Some(forename), Some(surname)) => format!("{forename} {surname}"),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => present(1)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", cells[0])),
    }
}
