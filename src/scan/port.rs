//! Concurrent TCP connect scanning and host sweeps.
//!
//! Probes run through a bounded `buffer_unordered` pool; a single collector
//! drains completions into an ordered map. Every probe is bounded by the
//! probe timeout and a sweep additionally by the sweep budget: probes still
//! pending at the deadline are dropped (closing their sockets) and reported
//! as filtered.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use super::error::{ScanError, ScanResult};
use super::services::{service_name, COMMON_PORTS};
use super::target::ScanTarget;
use crate::config::ScanConfig;
use crate::util::duration_ms;

/// Largest banner kept by [`PortScanner::banner_grab`].
const BANNER_MAX_BYTES: usize = 1024;

/// Upper end of the range covered by [`PortScanner::full_scan`].
const FULL_SCAN_LAST_PORT: u16 = 1024;

/// Observed state of a single TCP port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// Handshake completed
    Open,
    /// Host answered with a reset
    Closed,
    /// No answer within the timeout, unreachable, or unresolvable
    Filtered,
}

/// Outcome of probing one port.
///
/// # Invariants
/// - `port` is in `1..=65535`
/// - `is_open == (state == PortState::Open)`
/// - `service` depends only on `port`, never on the probe outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortScanResult {
    pub host: String,
    pub port: u16,
    pub is_open: bool,
    pub service: Option<String>,
    pub state: PortState,
}

impl PortScanResult {
    fn new(host: &str, port: u16, state: PortState) -> Self {
        Self {
            host: host.to_string(),
            port,
            is_open: state == PortState::Open,
            service: service_name(port).map(str::to_string),
            state,
        }
    }
}

/// Aggregated liveness summary of one host.
///
/// # Invariants
/// - `open_ports` is strictly ascending
/// - `is_alive` holds iff some port is open; refusals alone do not count,
///   since filtering middleboxes send resets for hosts that are down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSweepResult {
    pub host: String,
    pub is_alive: bool,
    pub open_ports: Vec<u16>,
    /// Services of the open ports that have a well-known name
    pub services: BTreeSet<String>,
    /// Wall time of the whole sweep
    pub duration_ms: f64,
}

impl HostSweepResult {
    fn from_results(host: &str, results: &[PortScanResult], elapsed: Duration) -> Self {
        let open: Vec<&PortScanResult> = results.iter().filter(|r| r.is_open).collect();

        Self {
            host: host.to_string(),
            is_alive: !open.is_empty(),
            open_ports: open.iter().map(|r| r.port).collect(),
            services: open.iter().filter_map(|r| r.service.clone()).collect(),
            duration_ms: duration_ms(elapsed),
        }
    }
}

/// TCP connect scanner. Holds only settings; cheap to clone.
#[derive(Debug, Clone)]
pub struct PortScanner {
    probe_timeout: Duration,
    sweep_budget: Duration,
    workers: usize,
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl PortScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            probe_timeout: config.probe_timeout,
            sweep_budget: config.sweep_budget,
            workers: config.workers.max(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_sweep_budget(mut self, budget: Duration) -> Self {
        self.sweep_budget = budget;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn sweep_budget(&self) -> Duration {
        self.sweep_budget
    }

    /// Probe one port with the configured timeout.
    ///
    /// # Errors
    /// Only for a malformed host or port 0. Unreachable hosts yield a closed result.
    pub async fn scan_port(&self, host: &str, port: u16) -> ScanResult<PortScanResult> {
        self.scan_port_with_timeout(host, port, self.probe_timeout)
            .await
    }

    /// Probe one port; `timeout` bounds DNS resolution and connect together.
    pub async fn scan_port_with_timeout(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> ScanResult<PortScanResult> {
        validate_port(port)?;
        let target = ScanTarget::parse(host)?;
        tracing::trace!(%target, port, "Probing port");

        let state = match tokio::time::timeout(timeout, async {
            let ips = target.resolve(timeout).await;
            connect_any(&ips, port).await
        })
        .await
        {
            Ok(state) => state,
            Err(_) => PortState::Filtered,
        };

        Ok(PortScanResult::new(target.host(), port, state))
    }

    /// Probe `ports` concurrently. Results are deduplicated and in ascending port order.
    pub async fn scan_ports(&self, host: &str, ports: &[u16]) -> ScanResult<Vec<PortScanResult>> {
        let target = ScanTarget::parse(host)?;
        let ports = validated_ports(ports)?;
        tracing::debug!(%target, count = ports.len(), "Scanning ports");
        Ok(self.sweep(&target, &ports, None).await)
    }

    /// Probe every port in `start..=end`.
    pub async fn scan_range(
        &self,
        host: &str,
        start: u16,
        end: u16,
    ) -> ScanResult<Vec<PortScanResult>> {
        if start == 0 || start > end {
            return Err(ScanError::InvalidPortRange { start, end });
        }
        let ports: Vec<u16> = (start..=end).collect();
        self.scan_ports(host, &ports).await
    }

    /// Sweep [`COMMON_PORTS`] within the sweep budget and summarize the host.
    pub async fn quick_scan(&self, host: &str) -> ScanResult<HostSweepResult> {
        let target = ScanTarget::parse(host)?;
        tracing::debug!(%target, budget = ?self.sweep_budget, "Quick scan");
        Ok(self
            .summarize(&target, &COMMON_PORTS, Some(self.sweep_budget))
            .await)
    }

    /// Sweep the privileged range `1..=1024` and summarize the host.
    ///
    /// Not bounded by the sweep budget; each probe still has its own timeout.
    pub async fn full_scan(&self, host: &str) -> ScanResult<HostSweepResult> {
        let target = ScanTarget::parse(host)?;
        let ports: Vec<u16> = (1..=FULL_SCAN_LAST_PORT).collect();
        tracing::debug!(%target, ports = ports.len(), "Full scan");
        Ok(self.summarize(&target, &ports, None).await)
    }

    async fn summarize(
        &self,
        target: &ScanTarget,
        ports: &[u16],
        budget: Option<Duration>,
    ) -> HostSweepResult {
        let started = Instant::now();
        let results = self.sweep(target, ports, budget).await;
        let summary = HostSweepResult::from_results(target.host(), &results, started.elapsed());

        tracing::debug!(
            %target,
            alive = summary.is_alive,
            open = ?summary.open_ports,
            elapsed_ms = summary.duration_ms,
            "Host sweep finished"
        );
        summary
    }

    /// Read the greeting a service sends after connect, if any.
    ///
    /// Returns `Ok(None)` when the port is not open or nothing arrives
    /// within the probe timeout.
    pub async fn banner_grab(&self, host: &str, port: u16) -> ScanResult<Option<String>> {
        validate_port(port)?;
        let target = ScanTarget::parse(host)?;
        let timeout = self.probe_timeout;

        let banner = tokio::time::timeout(timeout * 2, async {
            let ips = target.resolve(timeout).await;
            for ip in ips {
                let Ok(Ok(mut stream)) =
                    tokio::time::timeout(timeout, TcpStream::connect(SocketAddr::new(ip, port)))
                        .await
                else {
                    continue;
                };
                let mut buf = vec![0u8; BANNER_MAX_BYTES];
                return match tokio::time::timeout(timeout, stream.read(&mut buf)).await {
                    Ok(Ok(n)) if n > 0 => {
                        Some(String::from_utf8_lossy(&buf[..n]).trim().to_string())
                    }
                    _ => None,
                };
            }
            None
        })
        .await
        .ok()
        .flatten();

        Ok(banner.filter(|b| !b.is_empty()))
    }

    /// Probe `ports` (already validated and deduplicated) against `target`.
    ///
    /// With a `budget`, DNS resolution and collection both stop at the
    /// deadline and unanswered ports are reported filtered.
    async fn sweep(
        &self,
        target: &ScanTarget,
        ports: &[u16],
        budget: Option<Duration>,
    ) -> Vec<PortScanResult> {
        let deadline = budget.map(|b| tokio::time::Instant::now() + b);
        let ips = resolve_within(target.resolve(self.probe_timeout), deadline).await;
        if ips.is_empty() {
            tracing::debug!(%target, "Host did not resolve; all ports filtered");
            return assemble(target.host(), ports, &BTreeMap::new());
        }

        let timeout = self.probe_timeout;
        let ips = &ips;
        let probes = stream::iter(ports.iter().copied())
            .map(|port| async move {
                let state = match tokio::time::timeout(timeout, connect_any(ips, port)).await {
                    Ok(state) => state,
                    Err(_) => PortState::Filtered,
                };
                (port, state)
            })
            .buffer_unordered(self.workers);

        let collected = collect_states(probes, deadline).await;
        if collected.len() < ports.len() {
            tracing::debug!(
                %target,
                answered = collected.len(),
                total = ports.len(),
                "Sweep budget exhausted"
            );
        }
        assemble(target.host(), ports, &collected)
    }
}

/// Await `resolve`, giving up with no addresses once `deadline` passes.
async fn resolve_within<F>(resolve: F, deadline: Option<tokio::time::Instant>) -> Vec<IpAddr>
where
    F: Future<Output = Vec<IpAddr>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, resolve)
            .await
            .unwrap_or_default(),
        None => resolve.await,
    }
}

/// Drain port answers into an ordered map until the stream ends or the
/// deadline passes. Dropping the stream cancels connects still in flight.
async fn collect_states<S>(
    probes: S,
    deadline: Option<tokio::time::Instant>,
) -> BTreeMap<u16, PortState>
where
    S: Stream<Item = (u16, PortState)>,
{
    futures::pin_mut!(probes);
    let mut collected = BTreeMap::new();
    loop {
        let next = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, probes.next()).await {
                Ok(next) => next,
                Err(_) => break,
            },
            None => probes.next().await,
        };
        match next {
            Some((port, state)) => {
                collected.insert(port, state);
            }
            None => break,
        }
    }
    collected
}

/// One result per distinct port, ascending; ports without an answer are filtered.
fn assemble(host: &str, ports: &[u16], collected: &BTreeMap<u16, PortState>) -> Vec<PortScanResult> {
    let mut ordered: Vec<u16> = ports.to_vec();
    ordered.sort_unstable();
    ordered.dedup();
    ordered
        .into_iter()
        .map(|port| {
            let state = collected.get(&port).copied().unwrap_or(PortState::Filtered);
            PortScanResult::new(host, port, state)
        })
        .collect()
}

/// Try each address in turn; the first completed handshake wins.
async fn connect_any(ips: &[IpAddr], port: u16) -> PortState {
    let mut state = PortState::Filtered;
    for ip in ips {
        match TcpStream::connect(SocketAddr::new(*ip, port)).await {
            Ok(_stream) => return PortState::Open,
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                state = PortState::Closed;
            }
            Err(e) => {
                tracing::trace!(%ip, port, error = %e, "Connect failed");
            }
        }
    }
    state
}

fn validate_port(port: u16) -> ScanResult<()> {
    if port == 0 {
        Err(ScanError::InvalidPort(port))
    } else {
        Ok(())
    }
}

fn validated_ports(ports: &[u16]) -> ScanResult<Vec<u16>> {
    let mut unique: Vec<u16> = Vec::with_capacity(ports.len());
    for &port in ports {
        validate_port(port)?;
        unique.push(port);
    }
    unique.sort_unstable();
    unique.dedup();
    Ok(unique)
}
