//! Byte-size formatting/parsing and retention storage estimates.

use serde::{Deserialize, Serialize};

use toolbench_core::{ToolbenchError, ToolbenchResult};

const BINARY_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Longest retention accepted, in days (one hundred years)
pub const MAX_RETENTION_DAYS: u32 = 36_500;

const DAYS_PER_MONTH: u32 = 30;

/// Render a byte count in binary units, e.g. `1536` → `1.50 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BINARY_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", BINARY_UNITS[unit])
}

/// Parse a human size such as `10`, `1.5 KB`, `2GiB` or `3 gb`.
///
/// SI suffixes (`KB`, `MB`, ...) are powers of 1000; IEC suffixes
/// (`KiB`, `MiB`, ...) are powers of 1024. Suffixes are case-insensitive.
pub fn parse_size(input: &str) -> ToolbenchResult<u64> {
    let s = input.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    if number.is_empty() {
        return Err(ToolbenchError::invalid(format!("not a size: {input:?}")));
    }
    let value: f64 = number
        .parse()
        .map_err(|_| ToolbenchError::invalid(format!("not a size: {input:?}")))?;

    let multiplier = unit_multiplier(unit.trim())
        .ok_or_else(|| ToolbenchError::invalid(format!("unknown size unit in {input:?}")))?;

    let bytes = (value * multiplier).round();
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(ToolbenchError::invalid(format!("size out of range: {input:?}")));
    }
    Ok(bytes as u64)
}

/// Round a computed byte count, refusing anything a `u64` cannot hold.
pub(crate) fn checked_u64(value: f64) -> ToolbenchResult<u64> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded >= u64::MAX as f64 {
        return Err(ToolbenchError::invalid("result out of range"));
    }
    Ok(rounded as u64)
}

fn unit_multiplier(unit: &str) -> Option<f64> {
    let m = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "k" | "kb" => 1e3,
        "m" | "mb" => 1e6,
        "g" | "gb" => 1e9,
        "t" | "tb" => 1e12,
        "p" | "pb" => 1e15,
        "kib" => 1024f64,
        "mib" => 1024f64.powi(2),
        "gib" => 1024f64.powi(3),
        "tib" => 1024f64.powi(4),
        "pib" => 1024f64.powi(5),
        _ => return None,
    };
    Some(m)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageInput {
    /// Bytes ingested per day at the start of the window
    pub daily_bytes: u64,
    pub retention_days: u32,
    /// Number of copies kept (1 = no replication)
    pub replication_factor: u32,
    /// Stored size over raw size, in (0, 1]; 1.0 means uncompressed
    pub compression_ratio: f64,
    /// Ingest growth, compounded every 30 days
    pub growth_percent_per_month: f64,
}

impl Default for StorageInput {
    fn default() -> Self {
        Self {
            daily_bytes: 0,
            retention_days: 30,
            replication_factor: 1,
            compression_ratio: 1.0,
            growth_percent_per_month: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StorageEstimate {
    /// Logical bytes retained over the window, before compression/replication
    pub raw_bytes: u64,
    /// Bytes on disk: raw × compression ratio × replicas
    pub stored_bytes: u64,
    /// On-disk bytes written during the first 30 days
    pub monthly_bytes: u64,
}

/// Estimate the disk footprint of a retention window.
///
/// Day `d` (0-based) ingests `daily_bytes × (1 + growth)^(d / 30)` with
/// integer division, so growth steps once per 30-day month.
pub fn estimate_storage(input: &StorageInput) -> ToolbenchResult<StorageEstimate> {
    if input.retention_days == 0 || input.retention_days > MAX_RETENTION_DAYS {
        return Err(ToolbenchError::invalid(format!(
            "retention must be between 1 and {MAX_RETENTION_DAYS} days"
        )));
    }
    if input.replication_factor == 0 {
        return Err(ToolbenchError::invalid("replication factor must be at least 1"));
    }
    let ratio = input.compression_ratio;
    if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
        return Err(ToolbenchError::invalid(
            "compression ratio must be greater than 0 and at most 1",
        ));
    }
    let growth = input.growth_percent_per_month;
    if !growth.is_finite() || growth < 0.0 {
        return Err(ToolbenchError::invalid(
            "monthly growth must be a non-negative percentage",
        ));
    }

    let daily = input.daily_bytes as f64;
    let step = 1.0 + growth / 100.0;
    let mut raw = 0.0;
    let mut remaining = input.retention_days;
    let mut month = 0;
    while remaining > 0 {
        let days = remaining.min(DAYS_PER_MONTH);
        raw += daily * step.powi(month) * f64::from(days);
        remaining -= days;
        month += 1;
    }

    let on_disk = ratio * f64::from(input.replication_factor);
    let first_month = daily * f64::from(input.retention_days.min(DAYS_PER_MONTH)) * on_disk;

    let estimate = StorageEstimate {
        raw_bytes: checked_u64(raw)?,
        stored_bytes: checked_u64(raw * on_disk)?,
        monthly_bytes: checked_u64(first_month)?,
    };
    tracing::debug!(
        retention_days = input.retention_days,
        stored_bytes = estimate.stored_bytes,
        "estimated storage"
    );
    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn format_small_and_binary() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MiB");
        assert_eq!(format_bytes(1 << 50), "1.00 PiB");
    }

    #[test]
    fn format_saturates_at_pib() {
        assert_eq!(format_bytes(u64::MAX), "16384.00 PiB");
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(parse_size("10").unwrap(), 10);
        assert_eq!(parse_size("10B").unwrap(), 10);
        assert_eq!(parse_size("1.5 KB").unwrap(), 1_500);
        assert_eq!(parse_size("2GiB").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("3 gb").unwrap(), 3_000_000_000);
        assert_eq!(parse_size("  4 mib ").unwrap(), 4 * 1024 * 1024);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("GB").is_err());
        assert!(parse_size("-5").is_err());
        assert!(parse_size("1.2.3").is_err());
        assert!(parse_size("12 parsecs").is_err());
        assert!(parse_size("99999999 PB").is_err());
        assert!(parse_size("18446744073709551616").is_err());
    }

    #[test]
    fn flat_estimate() {
        let input = StorageInput {
            daily_bytes: 1_000,
            retention_days: 10,
            replication_factor: 3,
            compression_ratio: 0.5,
            growth_percent_per_month: 0.0,
        };
        let e = estimate_storage(&input).unwrap();
        assert_eq!(e.raw_bytes, 10_000);
        assert_eq!(e.stored_bytes, 15_000);
        assert_eq!(e.monthly_bytes, 15_000);
    }

    #[test]
    fn growth_steps_each_thirty_days() {
        let input = StorageInput {
            daily_bytes: 100,
            retention_days: 60,
            growth_percent_per_month: 10.0,
            ..StorageInput::default()
        };
        let e = estimate_storage(&input).unwrap();
        // 30 days at 100, then 30 days at 110
        assert_eq!(e.raw_bytes, 3_000 + 3_300);
        assert_eq!(e.monthly_bytes, 3_000);
    }

    #[test]
    fn overflowing_estimate_is_an_error() {
        let input = StorageInput {
            daily_bytes: u64::MAX,
            retention_days: 30,
            ..StorageInput::default()
        };
        assert!(matches!(
            estimate_storage(&input),
            Err(ToolbenchError::InvalidInput(_))
        ));

        // Raw fits, three replicas do not
        let input = StorageInput {
            daily_bytes: u64::MAX / 60,
            retention_days: 30,
            replication_factor: 3,
            ..StorageInput::default()
        };
        assert!(estimate_storage(&input).is_err());
    }

    #[test]
    fn checked_u64_bounds() {
        assert_eq!(checked_u64(1.4).unwrap(), 1);
        assert_eq!(checked_u64(0.0).unwrap(), 0);
        assert!(checked_u64(u64::MAX as f64).is_err());
        assert!(checked_u64(f64::INFINITY).is_err());
        assert!(checked_u64(f64::NAN).is_err());
        assert!(checked_u64(-1.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        let base = StorageInput {
            daily_bytes: 1,
            ..StorageInput::default()
        };
        let bad = [
            StorageInput { retention_days: 0, ..base },
            StorageInput { retention_days: MAX_RETENTION_DAYS + 1, ..base },
            StorageInput { replication_factor: 0, ..base },
            StorageInput { compression_ratio: 0.0, ..base },
            StorageInput { compression_ratio: 1.5, ..base },
            StorageInput { compression_ratio: f64::NAN, ..base },
            StorageInput { growth_percent_per_month: -1.0, ..base },
        ];
        for input in bad {
            assert!(estimate_storage(&input).is_err(), "{input:?}");
        }
    }

    proptest! {
        #[test]
        fn iec_sizes_parse_exactly(n in 0u64..1_000_000) {
            prop_assert_eq!(parse_size(&format!("{n} KiB")).unwrap(), n * 1024);
            prop_assert_eq!(parse_size(&format!("{n}kb")).unwrap(), n * 1000);
        }

        #[test]
        fn stored_never_exceeds_raw_times_replicas(
            daily in 0u64..1_000_000_000,
            days in 1u32..1_000,
            replicas in 1u32..6,
            ratio in 0.01f64..=1.0,
        ) {
            let e = estimate_storage(&StorageInput {
                daily_bytes: daily,
                retention_days: days,
                replication_factor: replicas,
                compression_ratio: ratio,
                growth_percent_per_month: 0.0,
            }).unwrap();
            prop_assert_eq!(e.raw_bytes, daily * u64::from(days));
            prop_assert!(e.stored_bytes <= e.raw_bytes * u64::from(replicas) + 1);
        }
    }
}
