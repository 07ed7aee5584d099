//! Per-task execution records.

use serde::{Deserialize, Serialize};

use super::bench::Benchmark;
use super::task::{TaskError, TaskId};
use crate::feature::{Now, SystemInfo};
use crate::scan::{HostSweepResult, PortScanResult, VulnScanReport};

/// Typed payload of a successful task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TaskOutput {
    Text(String),
    System(Box<SystemInfo>),
    Time(Now),
    Number(f64),
    Integer(i64),
    Flag(bool),
    /// Arbitrary-precision integer in decimal
    BigInteger(String),
    /// Lowercase hex digest
    Digest(String),
    Benchmark(Benchmark),
    Http { status: u16, url: String, bytes: usize },
    Ports(Vec<PortScanResult>),
    Host(HostSweepResult),
    Vulnerabilities(VulnScanReport),
    None,
}

impl TaskOutput {
    /// One-line rendering for logs.
    pub fn summary(&self) -> String {
        match self {
            TaskOutput::Text(text) => text.clone(),
            TaskOutput::System(info) => format!(
                "{} {} ({} cpus, {:.1}% memory)",
                info.os_name,
                info.os_version,
                info.cpu_count,
                info.memory_percent()
            ),
            TaskOutput::Time(now) => now.formatted.clone(),
            TaskOutput::Number(n) => n.to_string(),
            TaskOutput::Integer(n) => n.to_string(),
            TaskOutput::Flag(b) => b.to_string(),
            TaskOutput::BigInteger(digits) if digits.len() > 40 => {
                format!("{}... ({} digits)", &digits[..20], digits.len())
            }
            TaskOutput::BigInteger(digits) | TaskOutput::Digest(digits) => digits.clone(),
            TaskOutput::Benchmark(b) => {
                format!("{} iterations, checksum {:#018x}", b.iterations, b.checksum)
            }
            TaskOutput::Http { status, url, bytes } => {
                format!("{} {} ({} bytes)", status, url, bytes)
            }
            TaskOutput::Ports(results) => format!(
                "{} open / {} scanned",
                results.iter().filter(|r| r.is_open).count(),
                results.len()
            ),
            TaskOutput::Host(sweep) => format!(
                "{} {} open {:?}",
                sweep.host,
                if sweep.is_alive { "alive" } else { "down" },
                sweep.open_ports
            ),
            TaskOutput::Vulnerabilities(report) if !report.reachable => {
                format!("{} unreachable", report.target)
            }
            TaskOutput::Vulnerabilities(report) => {
                format!("{} vulnerabilities on {}", report.findings.len(), report.target)
            }
            TaskOutput::None => String::new(),
        }
    }
}

/// Record of one executed task.
///
/// # Invariants
/// - `ok == error.is_none()`
/// - `!ok` implies `output == TaskOutput::None`
/// - `duration_ms >= 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: TaskId,
    pub task_label: String,
    pub output: TaskOutput,
    /// Wall time spent executing the task
    pub duration_ms: f64,
    pub ok: bool,
    pub error: Option<String>,
}

impl TaskResult {
    pub fn from_outcome(
        task_id: TaskId,
        task_label: String,
        outcome: Result<TaskOutput, TaskError>,
        duration_ms: f64,
    ) -> Self {
        let duration_ms = duration_ms.max(0.0);
        match outcome {
            Ok(output) => Self {
                task_id,
                task_label,
                output,
                duration_ms,
                ok: true,
                error: None,
            },
            Err(e) => Self {
                task_id,
                task_label,
                output: TaskOutput::None,
                duration_ms,
                ok: false,
                error: Some(e.to_string()),
            },
        }
    }
}
