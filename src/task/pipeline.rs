//! Ordered task pipeline.
//!
//! # State Machine
//! ```text
//! Idle -> enqueue -> Loaded -> run -> Executed -> clear -> Idle
//!                      ^                  |
//!                      +---- enqueue -----+
//! ```
//!
//! `run` takes `&mut self`, so one pipeline can never run twice at once.
//! Share one behind a mutex to serialize runs.

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::bench;
use super::result::{TaskOutput, TaskResult};
use super::task::{MathOp, Task, TaskError, TaskId};
use crate::config::Config;
use crate::feature::{Feature, FeatureError, HashAlgo, Now, SystemInfo};
use crate::scan::{PortScanner, VulnScanner};
use crate::util::duration_ms;

/// Highest meaningful verbosity level; larger values clamp to it.
pub const MAX_VERBOSITY: u8 = 3;

/// Largest integer an `f64` argument can carry exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Logging controls of one pipeline. Never affects result content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 0 silent, 1 run start/finish, 2 per-task, 3 timing and raw output
    pub verbosity: u8,
    /// Adds task inputs, math arguments and benchmark state as `info`
    /// events, so they show under the default `reconflow=info` filter.
    /// Silent at verbosity 0.
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            verbosity: 1,
            debug: false,
        }
    }
}

impl PipelineConfig {
    pub fn new(verbosity: u8, debug: bool) -> Self {
        Self {
            verbosity: verbosity.min(MAX_VERBOSITY),
            debug,
        }
    }

    /// Whether debug diagnostics are emitted.
    pub fn diagnostics(&self) -> bool {
        self.debug && self.verbosity >= 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    /// Nothing queued, nothing executed
    Idle,
    /// Tasks waiting for `run`
    Loaded,
    /// Queue drained, results available
    Executed,
}

/// Totals of one `run` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
    pub total_ms: f64,
}

/// The services tasks execute against.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub feature: Feature,
    pub ports: PortScanner,
    pub vulns: VulnScanner,
}

impl Capabilities {
    pub fn from_config(config: &Config) -> Result<Self, TaskError> {
        Ok(Self {
            feature: Feature::new(&config.http)?,
            ports: PortScanner::new(&config.scan),
            vulns: VulnScanner::new(&config.http)?,
        })
    }
}

#[derive(Debug, Clone)]
struct QueuedTask {
    id: TaskId,
    task: Task,
}

/// Sequential executor of queued tasks.
#[derive(Debug)]
pub struct Pipeline {
    caps: Capabilities,
    config: PipelineConfig,
    queue: VecDeque<QueuedTask>,
    results: Vec<TaskResult>,
    executed: bool,
}

impl Pipeline {
    /// Pipeline with default configuration.
    pub fn new() -> Result<Self, TaskError> {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self, TaskError> {
        Ok(Self::with_capabilities(
            Capabilities::from_config(config)?,
            PipelineConfig::new(config.verbosity, config.debug),
        ))
    }

    pub fn with_capabilities(caps: Capabilities, config: PipelineConfig) -> Self {
        Self {
            caps,
            config: PipelineConfig::new(config.verbosity, config.debug),
            queue: VecDeque::new(),
            results: Vec::new(),
            executed: false,
        }
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    pub fn set_verbose(&mut self, level: u8) {
        self.config.verbosity = level.min(MAX_VERBOSITY);
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.config.debug = enabled;
    }

    pub fn state(&self) -> PipelineState {
        if !self.queue.is_empty() {
            PipelineState::Loaded
        } else if self.executed {
            PipelineState::Executed
        } else {
            PipelineState::Idle
        }
    }

    /// Number of tasks waiting for the next `run`.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    /// Append a task. Nothing runs until [`Pipeline::run`].
    pub fn enqueue(&mut self, task: Task) -> TaskId {
        let id = TaskId::new();
        if self.config.diagnostics() {
            tracing::info!(task_id = %id, task = ?task, "Task queued");
        }
        self.queue.push_back(QueuedTask { id, task });
        id
    }

    pub fn print(&mut self, text: impl Into<String>) -> &mut Self {
        self.enqueue(Task::Print { text: text.into() });
        self
    }

    pub fn system(&mut self) -> &mut Self {
        self.enqueue(Task::SystemSnapshot);
        self
    }

    pub fn time(&mut self) -> &mut Self {
        self.enqueue(Task::TimeSnapshot);
        self
    }

    pub fn math(&mut self, op: MathOp, args: Vec<f64>) -> &mut Self {
        self.enqueue(Task::MathOp { op, args });
        self
    }

    pub fn hash(&mut self, algo: HashAlgo, data: impl Into<String>) -> &mut Self {
        self.enqueue(Task::HashOp {
            algo,
            data: data.into(),
        });
        self
    }

    pub fn loop_calc(&mut self, iterations: u64) -> &mut Self {
        self.enqueue(Task::LoopCalc { iterations });
        self
    }

    pub fn blockchain(&mut self, height: u32, width: u32) -> &mut Self {
        self.enqueue(Task::Blockchain { height, width });
        self
    }

    pub fn http_get(&mut self, url: impl Into<String>) -> &mut Self {
        self.enqueue(Task::HttpGet { url: url.into() });
        self
    }

    pub fn scan_ports(&mut self, host: impl Into<String>, ports: Vec<u16>) -> &mut Self {
        self.enqueue(Task::PortScan {
            host: host.into(),
            ports,
        });
        self
    }

    pub fn quick_scan(&mut self, host: impl Into<String>) -> &mut Self {
        self.enqueue(Task::QuickScan { host: host.into() });
        self
    }

    pub fn scan_vulns(&mut self, url: impl Into<String>) -> &mut Self {
        self.enqueue(Task::VulnScan { url: url.into() });
        self
    }

    /// Drop queued tasks and accumulated results. Configuration is kept.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.results.clear();
        self.executed = false;
    }

    /// Execute every queued task in enqueue order, one at a time.
    ///
    /// A failing task never stops the run; its error lands in
    /// [`TaskResult::error`]. The queue is empty afterwards.
    pub async fn run(&mut self) -> RunSummary {
        let total = self.queue.len();
        let verbosity = self.config.verbosity;
        if verbosity >= 1 {
            tracing::info!(tasks = total, "Pipeline starting");
        }

        let started = Instant::now();
        let mut failed = 0;
        let mut position = 0;

        while let Some(QueuedTask { id, task }) = self.queue.pop_front() {
            position += 1;
            let label = task.label();
            if verbosity >= 2 {
                tracing::info!(
                    task_id = %id,
                    task = %label,
                    network = task.is_network(),
                    "Task {}/{} starting",
                    position,
                    total
                );
            }
            if self.config.diagnostics() {
                tracing::info!(task_id = %id, task = ?task, "Task input");
            }

            let task_started = Instant::now();
            let outcome = self.execute(&task).await;
            let elapsed = duration_ms(task_started.elapsed());

            let result = TaskResult::from_outcome(id, label, outcome, elapsed);
            self.log_result(&result);
            if !result.ok {
                failed += 1;
            }
            self.results.push(result);
        }
        self.executed = true;

        let summary = RunSummary {
            executed: total,
            failed,
            total_ms: duration_ms(started.elapsed()),
        };
        if verbosity >= 1 {
            tracing::info!(
                executed = summary.executed,
                failed = summary.failed,
                total_ms = summary.total_ms,
                "Pipeline finished"
            );
        }
        summary
    }

    fn log_result(&self, result: &TaskResult) {
        let verbosity = self.config.verbosity;
        if let Some(error) = &result.error {
            if verbosity >= 1 {
                tracing::warn!(task_id = %result.task_id, task = %result.task_label, %error, "Task failed");
            }
            return;
        }
        if verbosity >= 3 {
            tracing::info!(
                task_id = %result.task_id,
                task = %result.task_label,
                duration_ms = result.duration_ms,
                output = %result.output.summary(),
                "Task finished"
            );
        } else if verbosity >= 2 {
            tracing::info!(task_id = %result.task_id, task = %result.task_label, "Task finished");
        }
        if self.config.diagnostics() {
            if let TaskOutput::Benchmark(b) = &result.output {
                tracing::info!(
                    task_id = %result.task_id,
                    iterations = b.iterations,
                    checksum = b.checksum,
                    "Benchmark state"
                );
            }
        }
    }

    async fn execute(&self, task: &Task) -> Result<TaskOutput, TaskError> {
        match task {
            Task::Print { text } => {
                if self.config.verbosity >= 1 {
                    tracing::info!(output = %text, "Print");
                }
                Ok(TaskOutput::Text(text.clone()))
            }
            Task::SystemSnapshot => Ok(TaskOutput::System(Box::new(SystemInfo::collect()))),
            Task::TimeSnapshot => Ok(TaskOutput::Time(Now::local())),
            Task::MathOp { op, args } => {
                if self.config.diagnostics() {
                    tracing::info!(op = %op, ?args, "Math arguments");
                }
                execute_math(&self.caps.feature, *op, args)
            }
            Task::HashOp { algo, data } => Ok(TaskOutput::Digest(algo.digest(data))),
            Task::LoopCalc { iterations } => Ok(TaskOutput::Benchmark(bench::loop_calc(*iterations))),
            Task::Blockchain { height, width } => {
                Ok(TaskOutput::Benchmark(bench::blockchain(*height, *width)))
            }
            Task::HttpGet { url } => {
                let response = self.caps.feature.http_get(url).await?;
                Ok(TaskOutput::Http {
                    status: response.status,
                    url: response.url,
                    bytes: response.body.len(),
                })
            }
            Task::PortScan { host, ports } => Ok(TaskOutput::Ports(
                self.caps.ports.scan_ports(host, ports).await?,
            )),
            Task::QuickScan { host } => Ok(TaskOutput::Host(self.caps.ports.quick_scan(host).await?)),
            Task::VulnScan { url } => Ok(TaskOutput::Vulnerabilities(
                self.caps.vulns.vuln_scan_report(url).await?,
            )),
        }
    }
}

fn execute_math(feature: &Feature, op: MathOp, args: &[f64]) -> Result<TaskOutput, TaskError> {
    let output = match op {
        MathOp::Sum => TaskOutput::Number(feature.sum(args)?),
        MathOp::Mean => TaskOutput::Number(feature.mean(args)?),
        MathOp::Min => TaskOutput::Number(feature.min(args)?),
        MathOp::Max => TaskOutput::Number(feature.max(args)?),
        MathOp::Sqrt => {
            let [x] = exact_args::<1>(op, args)?;
            TaskOutput::Number(feature.sqrt(x)?)
        }
        MathOp::Factorial => {
            let [n] = exact_args::<1>(op, args)?;
            TaskOutput::BigInteger(feature.factorial(non_negative_integer(op, n)?))
        }
        MathOp::IsPrime => {
            let [n] = exact_args::<1>(op, args)?;
            TaskOutput::Flag(feature.is_prime(non_negative_integer(op, n)?))
        }
        MathOp::Random => {
            exact_args::<0>(op, args)?;
            TaskOutput::Number(feature.random())
        }
        MathOp::RandomRange => {
            let [lo, hi] = exact_args::<2>(op, args)?;
            TaskOutput::Integer(feature.random_range(integer(op, lo)?, integer(op, hi)?)?)
        }
    };
    Ok(output)
}

fn invalid(op: MathOp, reason: String) -> FeatureError {
    FeatureError::InvalidArguments {
        op: op.to_string(),
        reason,
    }
}

fn exact_args<const N: usize>(op: MathOp, args: &[f64]) -> Result<[f64; N], FeatureError> {
    <[f64; N]>::try_from(args)
        .map_err(|_| invalid(op, format!("expected {} argument(s), got {}", N, args.len())))
}

fn integer(op: MathOp, x: f64) -> Result<i64, FeatureError> {
    if x.is_finite() && x.fract() == 0.0 && x.abs() <= MAX_EXACT_INTEGER {
        Ok(x as i64)
    } else {
        Err(invalid(op, format!("{} is not an integer", x)))
    }
}

fn non_negative_integer(op: MathOp, x: f64) -> Result<u64, FeatureError> {
    let n = integer(op, x)?;
    u64::try_from(n).map_err(|_| invalid(op, format!("{} is negative", x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpConfig, ScanConfig};
    use std::time::Duration;

    fn fast_config() -> Config {
        Config {
            scan: ScanConfig {
                probe_timeout: Duration::from_millis(300),
                sweep_budget: Duration::from_secs(2),
                workers: 32,
            },
            http: HttpConfig {
                timeout: Duration::from_secs(2),
                ..HttpConfig::default()
            },
            ..Config::default()
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::from_config(&fast_config()).unwrap()
    }

    fn closed_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn runs_tasks_in_enqueue_order() {
        let mut p = pipeline();
        assert_eq!(p.state(), PipelineState::Idle);

        p.print("hello")
            .math(MathOp::Sum, vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .hash(HashAlgo::Sha256, "hello")
            .math(MathOp::Factorial, vec![20.0])
            .math(MathOp::IsPrime, vec![97.0])
            .loop_calc(1_000);
        assert_eq!(p.state(), PipelineState::Loaded);
        assert_eq!(p.queued(), 6);

        let summary = p.run().await;
        assert_eq!(summary.executed, 6);
        assert_eq!(summary.failed, 0);
        assert_eq!(p.state(), PipelineState::Executed);
        assert_eq!(p.queued(), 0);

        let labels: Vec<&str> = p.results().iter().map(|r| r.task_label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "print",
                "math:sum",
                "hash:sha256",
                "math:factorial",
                "math:is_prime",
                "loop_calc:1000"
            ]
        );

        let outputs: Vec<&TaskOutput> = p.results().iter().map(|r| &r.output).collect();
        assert_eq!(outputs[0], &TaskOutput::Text("hello".to_string()));
        assert_eq!(outputs[1], &TaskOutput::Number(15.0));
        assert_eq!(
            outputs[2],
            &TaskOutput::Digest(
                "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824".to_string()
            )
        );
        assert_eq!(
            outputs[3],
            &TaskOutput::BigInteger("2432902008176640000".to_string())
        );
        assert_eq!(outputs[4], &TaskOutput::Flag(true));
        assert!(p.results().iter().all(|r| r.ok && r.duration_ms >= 0.0));
    }

    #[tokio::test]
    async fn failing_task_does_not_stop_the_run() {
        let mut p = pipeline();
        p.math(MathOp::Mean, vec![])
            .math(MathOp::Sqrt, vec![-4.0])
            .math(MathOp::Sum, vec![2.0, 2.0]);

        let summary = p.run().await;
        assert_eq!(summary.executed, 3);
        assert_eq!(summary.failed, 2);

        let results = p.results();
        assert!(!results[0].ok);
        assert_eq!(results[0].output, TaskOutput::None);
        assert!(results[1].error.as_deref().unwrap().contains("negative"));
        assert!(results[2].ok);
        assert_eq!(results[2].output, TaskOutput::Number(4.0));
    }

    #[tokio::test]
    async fn math_arguments_are_validated() {
        let mut p = pipeline();
        p.math(MathOp::RandomRange, vec![1.0])
            .math(MathOp::Factorial, vec![2.5])
            .math(MathOp::IsPrime, vec![-7.0])
            .math(MathOp::Random, vec![1.0])
            .math(MathOp::RandomRange, vec![6.0, 1.0])
            .math(MathOp::RandomRange, vec![1.0, 6.0])
            .math(MathOp::Random, vec![]);
        p.run().await;

        let results = p.results();
        for result in &results[..5] {
            assert!(!result.ok, "{} should fail", result.task_label);
        }
        match results[5].output {
            TaskOutput::Integer(n) => assert!((1..=6).contains(&n)),
            ref other => panic!("unexpected output {:?}", other),
        }
        match results[6].output {
            TaskOutput::Number(x) => assert!((0.0..1.0).contains(&x)),
            ref other => panic!("unexpected output {:?}", other),
        }
    }

    #[tokio::test]
    async fn results_survive_later_enqueues_until_clear() {
        let mut p = pipeline();
        p.print("first");
        p.run().await;
        assert_eq!(p.results().len(), 1);

        p.print("second");
        assert_eq!(p.state(), PipelineState::Loaded);
        assert_eq!(p.results().len(), 1);

        p.run().await;
        assert_eq!(p.results().len(), 2);

        p.set_verbose(0);
        p.set_debug(true);
        p.print("pending");
        p.clear();
        assert_eq!(p.state(), PipelineState::Idle);
        assert!(p.results().is_empty());
        assert_eq!(p.queued(), 0);
        assert_eq!(p.config(), PipelineConfig::new(0, true));
    }

    #[tokio::test]
    async fn empty_run_is_harmless() {
        let mut p = pipeline();
        let summary = p.run().await;
        assert_eq!(summary.executed, 0);
        assert_eq!(summary.failed, 0);
        assert!(p.results().is_empty());
    }

    #[test]
    fn verbosity_clamps() {
        let mut p = pipeline();
        p.set_verbose(9);
        assert_eq!(p.config().verbosity, MAX_VERBOSITY);
        assert_eq!(PipelineConfig::new(200, false).verbosity, MAX_VERBOSITY);
    }

    #[tokio::test]
    async fn enqueue_assigns_distinct_ids() {
        let mut p = pipeline();
        let a = p.enqueue(Task::TimeSnapshot);
        let b = p.enqueue(Task::TimeSnapshot);
        assert_ne!(a, b);
        p.run().await;
        assert_eq!(p.results()[0].task_id, a);
        assert_eq!(p.results()[1].task_id, b);
    }

    #[tokio::test]
    async fn snapshots_produce_typed_output() {
        let mut p = pipeline();
        p.set_verbose(3);
        p.set_debug(true);
        p.system().time().blockchain(4, 8).blockchain(4, 8);
        p.run().await;

        let results = p.results();
        assert!(matches!(&results[0].output, TaskOutput::System(info) if info.cpu_count > 0));
        assert!(matches!(&results[1].output, TaskOutput::Time(now) if now.month >= 1));
        assert_eq!(results[2].output, results[3].output);
        assert!(matches!(
            results[2].output,
            TaskOutput::Benchmark(b) if b.iterations == 32
        ));
    }

    #[tokio::test]
    async fn network_tasks_fold_failures_into_results() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = listener.local_addr().unwrap().port();
        let closed = closed_port();

        let mut p = pipeline();
        p.scan_ports("127.0.0.1", vec![open, closed])
            .quick_scan("127.0.0.1")
            .http_get(format!("http://127.0.0.1:{}/", closed))
            .scan_vulns(format!("http://127.0.0.1:{}", closed))
            .scan_ports("not a host", vec![80])
            .print("still running");
        let summary = p.run().await;
        assert_eq!(summary.executed, 6);

        let results = p.results();
        match &results[0].output {
            TaskOutput::Ports(ports) => {
                assert_eq!(ports.len(), 2);
                let open_result = ports.iter().find(|r| r.port == open).unwrap();
                assert!(open_result.is_open);
            }
            other => panic!("unexpected output {:?}", other),
        }
        assert!(matches!(
            &results[1].output,
            TaskOutput::Host(sweep) if sweep.is_alive == !sweep.open_ports.is_empty()
        ));
        assert!(!results[2].ok);
        assert!(matches!(
            &results[3].output,
            TaskOutput::Vulnerabilities(report) if !report.reachable && report.findings.is_empty()
        ));
        assert!(!results[4].ok);
        assert!(results[5].ok);
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn benchmark_timing_is_consistent() {
        let mut p = pipeline();
        p.set_verbose(0);
        p.loop_calc(2_000_000);
        p.run().await;

        let mut samples = Vec::new();
        for _ in 0..12 {
            p.clear();
            p.loop_calc(2_000_000);
            p.run().await;
            samples.push(p.results()[0].duration_ms);
        }
        samples.sort_by(|a, b| a.total_cmp(b));
        let trimmed = &samples[2..samples.len() - 2];

        let n = trimmed.len() as f64;
        let mean = trimmed.iter().sum::<f64>() / n;
        let variance = trimmed.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let cv = variance.sqrt() / mean.max(0.001);
        assert!(cv < 0.2, "coefficient of variation {cv:.3}: {:?}", samples);
    }

    fn deterministic_run(p: &mut Pipeline) {
        p.print("same")
            .math(MathOp::Sum, vec![1.0, 2.0, 3.5])
            .math(MathOp::Sqrt, vec![-1.0])
            .math(MathOp::Factorial, vec![25.0])
            .hash(HashAlgo::Md5, "abc")
            .loop_calc(10_000)
            .blockchain(3, 5);
    }

    fn comparable(results: &[TaskResult]) -> Vec<(String, bool, Option<String>, TaskOutput)> {
        results
            .iter()
            .map(|r| (r.task_label.clone(), r.ok, r.error.clone(), r.output.clone()))
            .collect()
    }

    #[tokio::test]
    async fn logging_controls_never_change_results() {
        let mut quiet = pipeline();
        quiet.set_verbose(0);
        quiet.set_debug(false);
        deterministic_run(&mut quiet);
        quiet.run().await;

        let mut loud = pipeline();
        loud.set_verbose(3);
        loud.set_debug(true);
        deterministic_run(&mut loud);
        loud.run().await;

        assert_eq!(comparable(quiet.results()), comparable(loud.results()));
        assert_eq!(quiet.results().len(), 7);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    async fn captured_run(verbosity: u8, debug: bool) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_env_filter(crate::logging::DEFAULT_FILTER)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut p = pipeline();
        p.set_verbose(verbosity);
        p.set_debug(debug);
        deterministic_run(&mut p);
        p.run().await;
        captured.text()
    }

    #[tokio::test]
    async fn verbosity_zero_logs_nothing() {
        let output = captured_run(0, true).await;
        assert!(output.is_empty(), "unexpected output: {output}");
    }

    #[tokio::test]
    async fn debug_adds_diagnostics_under_default_filter() {
        let plain = captured_run(3, false).await;
        assert!(plain.contains("Pipeline starting"));
        assert!(plain.contains("network=false"));
        assert!(!plain.contains("Task input"));

        let detailed = captured_run(3, true).await;
        assert!(detailed.contains("Task input"));
        assert!(detailed.contains("Math arguments"));
        assert!(detailed.contains("checksum="));
    }
}
