//! Log-rotation footprint estimates and the table of log sources feeding them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use toolbench_core::{ToolbenchError, ToolbenchResult};

use crate::storage::{checked_u64, parse_size};

/// When the active log file is rotated out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationSchedule {
    Hourly,
    Daily,
    Weekly,
    /// Rotate once the active file reaches this many bytes
    Size(u64),
}

impl fmt::Display for RotationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hourly => f.write_str("hourly"),
            Self::Daily => f.write_str("daily"),
            Self::Weekly => f.write_str("weekly"),
            Self::Size(n) => write!(f, "size:{n}"),
        }
    }
}

/// Accepts `hourly`, `daily`, `weekly` or `size:<size>` (e.g. `size:100MB`).
impl FromStr for RotationSchedule {
    type Err = ToolbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(size) = s.strip_prefix("size:") {
            return Ok(Self::Size(parse_size(size)?));
        }
        match s.as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(ToolbenchError::invalid(format!(
                "unknown rotation schedule: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationPolicy {
    pub schedule: RotationSchedule,
    /// Rotated files kept besides the active one
    pub keep: u32,
    /// Size ratio applied to rotated files when they are compressed
    pub compress_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationEstimate {
    /// Size of one file at rotation time
    pub file_bytes: u64,
    /// Worst-case size of the active file
    pub active_bytes: u64,
    /// All rotated files, after compression
    pub retained_bytes: u64,
    pub total_bytes: u64,
    pub files_on_disk: u32,
    /// Hours of history on disk, active file included
    pub coverage_hours: f64,
}

/// Disk usage of a rotation policy for a source writing `daily_bytes`.
pub fn estimate_rotation(daily_bytes: u64, policy: &RotationPolicy) -> ToolbenchResult<RotationEstimate> {
    if daily_bytes == 0 {
        return Err(ToolbenchError::invalid("daily log volume must be greater than zero"));
    }
    let compress = match policy.compress_ratio {
        None => 1.0,
        Some(r) if r.is_finite() && r > 0.0 && r <= 1.0 => r,
        Some(_) => {
            return Err(ToolbenchError::invalid(
                "compression ratio must be greater than 0 and at most 1",
            ))
        }
    };

    let daily = daily_bytes as f64;
    let (file_bytes, period_hours) = match policy.schedule {
        RotationSchedule::Hourly => (daily / 24.0, 1.0),
        RotationSchedule::Daily => (daily, 24.0),
        RotationSchedule::Weekly => (daily * 7.0, 168.0),
        RotationSchedule::Size(0) => {
            return Err(ToolbenchError::invalid("rotation size must be greater than zero"))
        }
        RotationSchedule::Size(max) => (max as f64, max as f64 / daily * 24.0),
    };

    let retained = file_bytes * compress * f64::from(policy.keep);
    let files_on_disk = policy.keep.saturating_add(1);

    let estimate = RotationEstimate {
        file_bytes: checked_u64(file_bytes)?,
        active_bytes: checked_u64(file_bytes)?,
        retained_bytes: checked_u64(retained)?,
        total_bytes: checked_u64(file_bytes + retained)?,
        files_on_disk,
        coverage_hours: period_hours * f64::from(files_on_disk),
    };
    tracing::debug!(
        schedule = %policy.schedule,
        keep = policy.keep,
        total_bytes = estimate.total_bytes,
        "estimated rotation"
    );
    Ok(estimate)
}

/// Source of row identifiers for a [`LogSourceTable`].
pub trait IdGenerator {
    fn next_id(&mut self) -> u64;
}

/// Hands out 1, 2, 3, ... for the lifetime of one table.
#[derive(Debug, Default)]
pub struct SequentialIds {
    last: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSource {
    pub id: u64,
    pub name: String,
    pub daily_bytes: u64,
}

/// Named log sources whose volumes add up to one rotation estimate.
#[derive(Debug, Default)]
pub struct LogSourceTable<G = SequentialIds> {
    ids: G,
    sources: Vec<LogSource>,
}

impl LogSourceTable<SequentialIds> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: IdGenerator> LogSourceTable<G> {
    pub fn with_ids(ids: G) -> Self {
        Self {
            ids,
            sources: Vec::new(),
        }
    }

    /// Append a source and return its id. Ids are never reused.
    pub fn add(&mut self, name: impl Into<String>, daily_bytes: u64) -> u64 {
        let id = self.ids.next_id();
        self.sources.push(LogSource {
            id,
            name: name.into(),
            daily_bytes,
        });
        id
    }

    pub fn remove(&mut self, id: u64) -> ToolbenchResult<LogSource> {
        let idx = self.position(id)?;
        Ok(self.sources.remove(idx))
    }

    pub fn update(&mut self, id: u64, daily_bytes: u64) -> ToolbenchResult<()> {
        let idx = self.position(id)?;
        self.sources[idx].daily_bytes = daily_bytes;
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&LogSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn total_daily_bytes(&self) -> u64 {
        self.sources
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.daily_bytes))
    }

    /// Rotation estimate for the combined volume of every source.
    pub fn estimate(&self, policy: &RotationPolicy) -> ToolbenchResult<RotationEstimate> {
        estimate_rotation(self.total_daily_bytes(), policy)
    }

    fn position(&self, id: u64) -> ToolbenchResult<usize> {
        self.sources
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ToolbenchError::invalid(format!("no log source with id {id}")))
    }
}
