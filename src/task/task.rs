//! Core Task type: one unit of work queued on a pipeline.
//!
//! # Invariants
//! - A `Task` is immutable once enqueued
//! - Every queued task gets a fresh `TaskId`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feature::{FeatureError, HashAlgo};
use crate::scan::ScanError;

/// Unique identifier for a queued task.
///
/// # Properties
/// - Globally unique within a process
/// - Immutable once created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Math operations a [`Task::MathOp`] can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOp {
    Sum,
    Mean,
    Sqrt,
    Factorial,
    IsPrime,
    Random,
    RandomRange,
    Min,
    Max,
}

impl MathOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MathOp::Sum => "sum",
            MathOp::Mean => "mean",
            MathOp::Sqrt => "sqrt",
            MathOp::Factorial => "factorial",
            MathOp::IsPrime => "is_prime",
            MathOp::Random => "random",
            MathOp::RandomRange => "random_range",
            MathOp::Min => "min",
            MathOp::Max => "max",
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MathOp {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(MathOp::Sum),
            "mean" | "avg" => Ok(MathOp::Mean),
            "sqrt" => Ok(MathOp::Sqrt),
            "factorial" => Ok(MathOp::Factorial),
            "is_prime" | "prime" => Ok(MathOp::IsPrime),
            "random" => Ok(MathOp::Random),
            "random_range" => Ok(MathOp::RandomRange),
            "min" => Ok(MathOp::Min),
            "max" => Ok(MathOp::Max),
            other => Err(TaskError::UnknownOperation(other.to_string())),
        }
    }
}

/// A unit of work. Closed set of variants, matched exhaustively by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Task {
    Print { text: String },
    SystemSnapshot,
    TimeSnapshot,
    MathOp { op: MathOp, args: Vec<f64> },
    HashOp { algo: HashAlgo, data: String },
    /// `n` arithmetic iterations
    LoopCalc { iterations: u64 },
    /// `height * width` chained hash-like iterations
    Blockchain { height: u32, width: u32 },
    HttpGet { url: String },
    PortScan { host: String, ports: Vec<u16> },
    QuickScan { host: String },
    VulnScan { url: String },
}

impl Task {
    /// Build a math task from an operation name.
    ///
    /// # Errors
    /// `UnknownOperation` if `op` names no [`MathOp`].
    pub fn math(op: &str, args: Vec<f64>) -> Result<Self, TaskError> {
        Ok(Task::MathOp {
            op: op.parse()?,
            args,
        })
    }

    /// Build a hash task from an algorithm name.
    pub fn hash(algo: &str, data: impl Into<String>) -> Result<Self, TaskError> {
        let algo = algo
            .parse::<HashAlgo>()
            .map_err(|_| TaskError::UnknownOperation(algo.to_string()))?;
        Ok(Task::HashOp {
            algo,
            data: data.into(),
        })
    }

    /// Short human-readable label used in results and logs.
    pub fn label(&self) -> String {
        match self {
            Task::Print { .. } => "print".to_string(),
            Task::SystemSnapshot => "system".to_string(),
            Task::TimeSnapshot => "time".to_string(),
            Task::MathOp { op, .. } => format!("math:{}", op),
            Task::HashOp { algo, .. } => format!("hash:{}", algo),
            Task::LoopCalc { iterations } => format!("loop_calc:{}", iterations),
            Task::Blockchain { height, width } => format!("blockchain:{}x{}", height, width),
            Task::HttpGet { url } => format!("http_get:{}", url),
            Task::PortScan { host, ports } => format!("port_scan:{}:{}", host, ports.len()),
            Task::QuickScan { host } => format!("quick_scan:{}", host),
            Task::VulnScan { url } => format!("vuln_scan:{}", url),
        }
    }

    /// Whether executing the task touches the network.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Task::HttpGet { .. }
                | Task::PortScan { .. }
                | Task::QuickScan { .. }
                | Task::VulnScan { .. }
        )
    }
}

/// Errors a task can fail with. Captured into `TaskResult::error`, never
/// propagated out of a pipeline run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

impl TaskError {
    /// Whether the failure is the caller's fault rather than the environment's.
    pub fn is_input_error(&self) -> bool {
        match self {
            TaskError::Feature(e) => e.is_input_error(),
            TaskError::Scan(_) | TaskError::UnknownOperation(_) => true,
        }
    }
}
