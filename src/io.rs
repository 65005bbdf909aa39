//! Plane sources and the run-metrics log.
//!
//! Planes are read from the JSON array format the generator writes. After
//! each run the driver hands a [`MetricsRecord`] to a [`MetricsSink`]; the
//! CSV sink appends one line per run and reads the log back for
//! performance comparisons.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::models::Plane;

/// Reads a JSON array of planes.
///
/// # Errors
/// [`SchedulerError::Source`] if the file cannot be opened,
/// [`SchedulerError::Parse`] if it is not a valid plane array.
pub fn load_planes(path: impl AsRef<Path>) -> Result<Vec<Plane>, SchedulerError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| SchedulerError::Source {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Parses a JSON array of planes from a string.
pub fn parse_planes(json: &str) -> Result<Vec<Plane>, SchedulerError> {
    Ok(serde_json::from_str(json)?)
}

/// Writes planes as a pretty-printed JSON array, creating parent directories.
pub fn write_planes(path: impl AsRef<Path>, planes: &[Plane]) -> Result<(), SchedulerError> {
    let path = path.as_ref();
    let io_err = |source: io::Error| SchedulerError::Source {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, planes)?;
    writer.flush().map_err(io_err)
}

/// One line of the run-metrics log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Seconds since the Unix epoch when the run finished.
    pub timestamp: u64,
    /// Policy label (e.g., "Round Robin").
    pub policy: String,
    /// Wall-clock run time in milliseconds.
    pub elapsed_ms: f64,
}

impl MetricsRecord {
    /// Creates a record stamped with the current time.
    pub fn now(policy: impl Into<String>, elapsed_ms: f64) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            timestamp,
            policy: policy.into(),
            elapsed_ms,
        }
    }

    fn to_csv_line(&self) -> String {
        let policy = if self.policy.contains([',', '"']) {
            format!("\"{}\"", self.policy.replace('"', "\"\""))
        } else {
            self.policy.clone()
        };
        format!("{},{},{:.2}", self.timestamp, policy, self.elapsed_ms)
    }

    /// Parses a line written by [`to_csv_line`](Self::to_csv_line).
    fn from_csv_line(line: &str) -> Option<Self> {
        let (timestamp, rest) = line.split_once(',')?;
        let (policy, elapsed_ms) = rest.rsplit_once(',')?;
        let policy = match policy.strip_prefix('"').and_then(|p| p.strip_suffix('"')) {
            Some(quoted) => quoted.replace("\"\"", "\""),
            None => policy.to_string(),
        };
        Some(Self {
            timestamp: timestamp.trim().parse().ok()?,
            policy,
            elapsed_ms: elapsed_ms.trim().parse().ok()?,
        })
    }
}

/// Mean elapsed milliseconds per policy label.
pub fn mean_elapsed_by_policy(records: &[MetricsRecord]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.policy.clone()).or_insert((0.0, 0));
        entry.0 += record.elapsed_ms;
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(policy, (sum, n))| (policy, sum / n as f64))
        .collect()
}

/// Append-only destination for run metrics.
pub trait MetricsSink: Send + Sync {
    fn record(&self, record: &MetricsRecord) -> io::Result<()>;
}

/// Appends `timestamp,policy,elapsed_ms` lines to a CSV file.
///
/// A header line is written when the file is created.
#[derive(Debug)]
pub struct CsvMetricsLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvMetricsLog {
    pub const HEADER: &'static str = "timestamp,policy,elapsed_ms";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back every record in the log, in the order written.
    ///
    /// # Errors
    /// `NotFound` if no run has been logged yet; `InvalidData` naming the
    /// line number if a line is not a metrics record.
    pub fn records(&self) -> io::Result<Vec<MetricsRecord>> {
        let _guard = self.lock.lock();
        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || (idx == 0 && line == Self::HEADER) {
                continue;
            }
            let record = MetricsRecord::from_csv_line(&line).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{}:{}: malformed metrics line", self.path.display(), idx + 1),
                )
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

impl MetricsSink for CsvMetricsLog {
    fn record(&self, record: &MetricsRecord) -> io::Result<()> {
        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let is_new = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if is_new {
            writeln!(file, "{}", Self::HEADER)?;
        }
        writeln!(file, "{}", record.to_csv_line())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryMetricsLog {
    records: Mutex<Vec<MetricsRecord>>,
}

impl MemoryMetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records logged so far.
    pub fn records(&self) -> Vec<MetricsRecord> {
        self.records.lock().clone()
    }
}

impl MetricsSink for MemoryMetricsLog {
    fn record(&self, record: &MetricsRecord) -> io::Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
