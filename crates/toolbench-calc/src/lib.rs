//! toolbench-calc: capacity planning arithmetic and random value generators
//!
//! Everything here is pure computation over validated inputs. Invalid
//! numbers (negative, non-finite, out of range) are rejected with
//! [`ToolbenchError::InvalidInput`](toolbench_core::ToolbenchError) rather
//! than clamped.

pub mod random;
pub mod rotation;
pub mod storage;
pub mod throughput;

pub use random::{random_numbers, random_string, CharsetOptions};
pub use rotation::{
    estimate_rotation, IdGenerator, LogSource, LogSourceTable, RotationEstimate, RotationPolicy,
    RotationSchedule, SequentialIds,
};
pub use storage::{estimate_storage, format_bytes, parse_size, StorageEstimate, StorageInput};
pub use throughput::{nodes_required, tps, TimeUnit, TpsReport};
