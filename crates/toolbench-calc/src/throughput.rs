//! Transactions-per-second arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use toolbench_core::{ToolbenchError, ToolbenchResult};

use crate::storage::checked_u64;

/// Window over which a transaction count was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
        })
    }
}

impl FromStr for TimeUnit {
    type Err = ToolbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Ok(Self::Second),
            "m" | "min" | "minute" | "minutes" => Ok(Self::Minute),
            "h" | "hr" | "hour" | "hours" => Ok(Self::Hour),
            "d" | "day" | "days" => Ok(Self::Day),
            other => Err(ToolbenchError::invalid(format!("unknown time unit: {other}"))),
        }
    }
}

/// Average and peak rates derived from one observed volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TpsReport {
    pub average_tps: f64,
    pub peak_tps: f64,
    pub per_minute: f64,
    pub per_hour: f64,
    pub per_day: f64,
}

/// Convert `transactions` observed over one `per` window into rates.
///
/// `peak_factor` scales the average to a provisioning peak and must be at
/// least 1.
pub fn tps(transactions: f64, per: TimeUnit, peak_factor: f64) -> ToolbenchResult<TpsReport> {
    if !transactions.is_finite() || transactions < 0.0 {
        return Err(ToolbenchError::invalid(
            "transaction count must be a non-negative number",
        ));
    }
    if !peak_factor.is_finite() || peak_factor < 1.0 {
        return Err(ToolbenchError::invalid("peak factor must be at least 1"));
    }

    let average_tps = transactions / per.seconds() as f64;
    let report = TpsReport {
        average_tps,
        peak_tps: average_tps * peak_factor,
        per_minute: average_tps * TimeUnit::Minute.seconds() as f64,
        per_hour: average_tps * TimeUnit::Hour.seconds() as f64,
        per_day: average_tps * TimeUnit::Day.seconds() as f64,
    };
    tracing::debug!(%per, average_tps, peak_factor, "computed tps");
    Ok(report)
}

/// Nodes needed so that `per_node_tps` capacity covers `target_tps`.
pub fn nodes_required(target_tps: f64, per_node_tps: f64) -> ToolbenchResult<u64> {
    if !target_tps.is_finite() || target_tps < 0.0 {
        return Err(ToolbenchError::invalid("target tps must be a non-negative number"));
    }
    if !per_node_tps.is_finite() || per_node_tps <= 0.0 {
        return Err(ToolbenchError::invalid("per-node tps must be greater than zero"));
    }
    checked_u64((target_tps / per_node_tps).ceil())
}
