//! Network reconnaissance: TCP port scanning and HTTP vulnerability checks.
//!
//! Both scanners are plain settings holders, `Clone + Send + Sync`, and fold
//! network failures into their results. Only malformed input is an error.

mod error;
pub mod port;
pub mod services;
pub mod target;
pub mod vuln;

pub use error::{ScanError, ScanResult};
pub use port::{HostSweepResult, PortScanResult, PortScanner, PortState};
pub use services::{service_name, COMMON_PORTS};
pub use target::ScanTarget;
pub use vuln::{Check, Severity, VulnScanReport, VulnScanner, Vulnerability};
