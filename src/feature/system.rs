//! Host system snapshots backed by `sysinfo`.

use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Static and slowly-changing facts about the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub hostname: String,
    pub cpu_count: usize,
    pub cpu_brand: String,
    /// Bytes
    pub total_memory: u64,
    /// Bytes
    pub used_memory: u64,
    pub total_swap: u64,
    pub used_swap: u64,
    /// Seconds since boot
    pub uptime: u64,
}

impl SystemInfo {
    pub fn collect() -> Self {
        let sys = System::new_all();

        let unknown = || "Unknown".to_string();
        let cpu_brand = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(unknown);

        Self {
            os_name: System::name().unwrap_or_else(unknown),
            os_version: System::os_version().unwrap_or_else(unknown),
            kernel_version: System::kernel_version().unwrap_or_else(unknown),
            hostname: System::host_name().unwrap_or_else(unknown),
            cpu_count: sys.cpus().len(),
            cpu_brand,
            total_memory: sys.total_memory(),
            used_memory: sys.used_memory(),
            total_swap: sys.total_swap(),
            used_swap: sys.used_swap(),
            uptime: System::uptime(),
        }
    }

    /// Used memory as a percentage of total, 0 when total is unknown.
    pub fn memory_percent(&self) -> f64 {
        percent(self.used_memory, self.total_memory)
    }
}

/// Per-core CPU usage percentages.
///
/// Blocks for `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` between two samples so
/// the values reflect actual load.
pub fn cpu_usage() -> Vec<f32> {
    let mut sys = System::new_all();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.cpus()
        .iter()
        .map(|cpu| cpu.cpu_usage().clamp(0.0, 100.0))
        .collect()
}

pub fn memory_percent() -> f64 {
    let mut sys = System::new();
    sys.refresh_memory();
    percent(sys.used_memory(), sys.total_memory())
}

fn percent(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
