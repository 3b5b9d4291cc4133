use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ingest::DriverDirectory;
use crate::retrieval::{Comparison, StrategyOutcome};

/// One ranked lap as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLap {
    pub owner_display_name: String,
    pub display_time: String,
}

/// The report artifact: both rankings and both timings.
///
/// ```json
/// {
///   "priority_index_results": [{"owner_display_name": "Lewis Hamilton", "display_time": "1:38.109"}],
///   "ordered_index_results":  [{"owner_display_name": "Lewis Hamilton", "display_time": "1:38.109"}],
///   "priority_index_seconds": 0.000012,
///   "ordered_index_seconds":  0.000034
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub priority_index_results: Vec<RankedLap>,
    pub ordered_index_results: Vec<RankedLap>,
    pub priority_index_seconds: f64,
    pub ordered_index_seconds: f64,
}

impl Report {
    /// Resolve driver names and flatten a comparison into report shape.
    pub fn from_comparison(comparison: &Comparison, drivers: &DriverDirectory) -> Self {
        let ranked = |outcome: &StrategyOutcome| -> Vec<RankedLap> {
            outcome
                .records
                .iter()
                .map(|record| RankedLap {
                    owner_display_name: drivers.name(record.owner_id()).into_owned(),
                    display_time: record.display_time().to_string(),
                })
                .collect()
        };
        Report {
            priority_index_results: ranked(&comparison.priority),
            ordered_index_results: ranked(&comparison.ordered),
            priority_index_seconds: comparison.priority.seconds(),
            ordered_index_seconds: comparison.ordered.seconds(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty-printed JSON, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!("report written to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("Priority index (min-heap)", &self.priority_index_results, self.priority_index_seconds),
            ("Ordered index (skip list)", &self.ordered_index_results, self.ordered_index_seconds),
        ];
        for (i, (title, laps, seconds)) in sections.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{title}: {seconds:.9} s")?;
            if laps.is_empty() {
                writeln!(f, "  (no laps)")?;
            }
            for (rank, lap) in laps.iter().enumerate() {
                writeln!(f, "  {:>2}. {:<24} {}", rank + 1, lap.owner_display_name, lap.display_time)?;
            }
        }
        Ok(())
    }
}
