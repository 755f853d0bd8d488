//! Fixed-column rendering of profile results.
//!
//! The table layout is consumed by existing tooling and must stay stable:
//!
//! ```text
//! Function Name   Call Count    Total Time
//! parse           3             0.01250 sec
//! ```
//!
//! Names are left-justified to 15 bytes and call counts to 13; neither is
//! truncated. Totals are accumulated as raw [`Duration`]s and converted to the
//! display unit exactly once, here.

use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult, Write as FmtWrite};
use std::io::Write;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use tracing::info;

use crate::error::ProfilerError;

const NAME_WIDTH: usize = 15;
const COUNT_WIDTH: usize = 13;
const TIME_WIDTH: usize = 10;
const TIME_PRECISION: usize = 5;

/// Unit used when printing accumulated time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, StrumDisplay, EnumString, EnumIter,
)]
pub enum TimeUnit {
    #[default]
    #[serde(rename = "sec")]
    #[strum(to_string = "sec", serialize = "s", serialize = "seconds")]
    Seconds,
    #[serde(rename = "ms")]
    #[strum(to_string = "ms", serialize = "milliseconds")]
    Milliseconds,
    #[serde(rename = "us")]
    #[strum(to_string = "us", serialize = "µs", serialize = "microseconds")]
    Microseconds,
    #[serde(rename = "ns")]
    #[strum(to_string = "ns", serialize = "nanoseconds")]
    Nanoseconds,
}

impl TimeUnit {
    /// Express `duration` as a fractional count of this unit.
    pub fn convert(&self, duration: Duration) -> f64 {
        let secs = duration.as_secs_f64();
        match self {
            TimeUnit::Seconds => secs,
            TimeUnit::Milliseconds => secs * 1_000.0,
            TimeUnit::Microseconds => secs * 1_000_000.0,
            TimeUnit::Nanoseconds => duration.as_nanos() as f64,
        }
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub call_count: u64,
    pub total_elapsed: Duration,
}

/// Point-in-time copy of every entry in a registry, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    unit: TimeUnit,
    rows: Vec<ReportRow>,
}

impl Report {
    pub(crate) fn new(unit: TimeUnit, rows: Vec<ReportRow>) -> Self {
        Self { unit, rows }
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Same rows, rendered in a different unit.
    pub fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn row(&self, name: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table to `out`, one line per entry after the header.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), ProfilerError> {
        write!(out, "{self}")?;
        out.flush()?;
        Ok(())
    }

    /// Write the table to standard output.
    pub fn print(&self) -> Result<(), ProfilerError> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)
    }

    /// Emit one `info` event per row.
    pub fn log(&self) {
        for row in &self.rows {
            info!(
                event = "Report",
                name = row.name.as_str(),
                call_count = row.call_count,
                total = self.unit.convert(row.total_elapsed),
                unit = %self.unit
            );
        }
    }

    /// Serialize the rows as JSON.
    pub fn to_json(&self) -> Result<String, ProfilerError> {
        serde_json::to_string(self).map_err(|e| ProfilerError::InvalidFormat(e.to_string()))
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(
            f,
            "{:<NAME_WIDTH$} {:<COUNT_WIDTH$} {:<TIME_WIDTH$}",
            "Function Name", "Call Count", "Total Time"
        )?;
        for row in &self.rows {
            write_padded(f, &row.name, NAME_WIDTH)?;
            write!(f, " {:<COUNT_WIDTH$} ", row.call_count)?;
            writeln!(
                f,
                "{:.TIME_PRECISION$} {}",
                self.unit.convert(row.total_elapsed),
                self.unit
            )?;
        }
        Ok(())
    }
}

/// Left-justify `text` to `width` bytes. Multi-byte names take as many
/// columns as they have UTF-8 bytes, keeping byte offsets fixed.
fn write_padded(f: &mut Formatter<'_>, text: &str, width: usize) -> FmtResult {
    f.write_str(text)?;
    for _ in text.len()..width {
        f.write_char(' ')?;
    }
    Ok(())
}
