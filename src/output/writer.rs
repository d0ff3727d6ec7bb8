use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::config::constant::{HOURLY_SUMMARY_SUFFIX, RAW_FLOW_PREFIX};
use crate::domain::{FlowError, HourlySummary, RouteMatrix};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub counts: PathBuf,
    pub raw_rates: PathBuf,
    pub hourly: PathBuf,
}

impl OutputPaths {
    /// `flow.csv` -> `flow.csv`, `raw_flow.csv`, `flow_hourly.json`, all in
    /// the same directory.
    pub fn for_output(output_file: &Path) -> Self {
        let dir = output_file.parent().unwrap_or_else(|| Path::new(""));
        let name = output_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = output_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        OutputPaths {
            counts: output_file.to_path_buf(),
            raw_rates: dir.join(format!("{}{}", RAW_FLOW_PREFIX, name)),
            hourly: dir.join(format!("{}{}", stem, HOURLY_SUMMARY_SUFFIX)),
        }
    }
}

/// One headerless row per tick, 16 values row-major with a zero diagonal.
pub fn write_matrix_csv<T>(matrix: &RouteMatrix<T>, path: &Path) -> Result<(), FlowError>
where
    T: Copy + Default + ToString,
{
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;

    for tick in 0..matrix.ticks() {
        wtr.write_record(matrix.row(tick).iter().map(ToString::to_string))?;
    }

    wtr.flush()?;
    info!("Wrote {} rows to {}", matrix.ticks(), path.display());
    Ok(())
}

/// Summary plus the seed that produced it, so the plot data can be replayed.
#[derive(Serialize)]
struct HourlyReport<'a> {
    seed: u64,
    #[serde(flatten)]
    summary: &'a HourlySummary,
}

pub fn write_hourly_summary(
    summary: &HourlySummary,
    seed: u64,
    path: &Path,
) -> Result<(), FlowError> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, &HourlyReport { seed, summary })?;
    info!("Wrote hourly summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Route;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("inflow-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::for_output(Path::new("out/flow.csv"));
        assert_eq!(paths.counts, PathBuf::from("out/flow.csv"));
        assert_eq!(paths.raw_rates, PathBuf::from("out/raw_flow.csv"));
        assert_eq!(paths.hourly, PathBuf::from("out/flow_hourly.json"));

        let bare = OutputPaths::for_output(Path::new("flow.csv"));
        assert_eq!(bare.raw_rates, PathBuf::from("raw_flow.csv"));
    }

    #[test]
    fn test_counts_csv_layout() {
        let dir = scratch_dir("csv");
        let path = dir.join("counts.csv");
        let matrix = RouteMatrix::from_pairs(
            2,
            Route::all().map(|r| (r, vec![r.index() as u64 + 1; 2])),
        );
        write_matrix_csv(&matrix, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "0,1,2,3,4,0,5,6,7,8,0,9,10,11,12,0");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_hourly_summary_json() {
        let dir = scratch_dir("json");
        let path = dir.join("hourly.json");
        let summary = HourlySummary {
            route: Route::all().next().unwrap(),
            hours: (0..24).collect(),
            counts: vec![1; 24],
            total: 24,
        };
        write_hourly_summary(&summary, 31, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 31);
        assert_eq!(value["total"], 24);
        assert_eq!(value["route"]["origin"], 0);
        assert_eq!(value["route"]["destination"], 1);
        assert_eq!(value["hours"][23], 23);
        fs::remove_dir_all(dir).ok();
    }
}
