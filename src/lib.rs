//! # reconflow
//!
//! Ordered task pipeline plus network reconnaissance primitives.
//!
//! This library provides:
//! - A pipeline that queues typed tasks, runs them strictly in order and
//!   records per-task timing and results
//! - A concurrent TCP port scanner with per-probe timeouts and a sweep budget
//! - An HTTP vulnerability check battery with severity classification
//! - A Feature library of system, time, math, crypto and HTTP primitives
//!
//! ## Architecture
//!
//! ```text
//!        ┌──────────────────────────────────┐
//!        │             Pipeline             │
//!        │   (queue -> execute -> results)  │
//!        └────────────────┬─────────────────┘
//!                         │ Capabilities
//!         ┌───────────────┼────────────────┐
//!         ▼               ▼                ▼
//!   ┌──────────┐   ┌─────────────┐  ┌─────────────┐
//!   │ Feature  │   │ PortScanner │  │ VulnScanner │
//!   └──────────┘   └─────────────┘  └─────────────┘
//! ```
//!
//! ## Modules
//! - `task`: Task definitions, results and the pipeline
//! - `scan`: Port and vulnerability scanners
//! - `feature`: Commodity primitives used by tasks
//! - `config`: Environment and file configuration
//! - `logging`: Tracing subscriber setup

pub mod config;
pub mod feature;
pub mod logging;
pub mod scan;
pub mod task;
pub mod util;

pub use config::Config;
pub use feature::Feature;
pub use scan::{PortScanner, VulnScanner};
pub use task::{Pipeline, Task, TaskOutput, TaskResult};
