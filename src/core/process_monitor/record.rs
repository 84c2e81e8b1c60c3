use serde::{Deserialize, Serialize};

/// Normalized snapshot of one OS process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub priority: i32,
    pub path: String,
}

/// A process as reported by a metrics source, before normalization.
///
/// Every field except `pid` may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu: Option<f64>,
    pub memory_bytes: Option<u64>,
    pub memory_percent: Option<f64>,
    pub priority: Option<i32>,
    pub path: Option<String>,
}

/// Total system memory, queried separately from the process list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySummary {
    pub total_bytes: u64,
}

impl ProcessRecord {
    /// Build a record from a raw source entry.
    ///
    /// `memory` is `None` when the memory summary could not be fetched; the raw
    /// record's own percentage is used then, else 0.
    pub fn from_raw(raw: RawProcess, memory: Option<&MemorySummary>) -> Self {
        let memory_percent = match (raw.memory_bytes, memory) {
            (Some(bytes), Some(summary)) if summary.total_bytes > 0 => {
                bytes as f64 / summary.total_bytes as f64 * 100.0
            }
            _ => raw.memory_percent.unwrap_or(0.0),
        };

        Self {
            pid: raw.pid,
            name: raw.name.unwrap_or_default(),
            cpu_percent: normalize_cpu(raw.cpu),
            memory_percent: sanitize_percent(memory_percent),
            priority: raw.priority.unwrap_or(0),
            path: raw.path.unwrap_or_default(),
        }
    }
}

/// Coerce a reported cpu value to a non-negative number with one decimal.
pub fn normalize_cpu(cpu: Option<f64>) -> f64 {
    match cpu {
        Some(value) if value.is_finite() && value >= 0.0 => (value * 10.0).round() / 10.0,
        _ => 0.0,
    }
}

fn sanitize_percent(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}
