//! HTTP vulnerability check battery.
//!
//! Each [`Check`] pairs a probe (the target itself, an appended path, or an
//! appended query) with a matcher over the response. Severity is looked up
//! from a static policy keyed by check id, so the battery and the policy can
//! be reviewed independently.
//!
//! A scan fetches every distinct probe URL once, concurrently, then evaluates
//! the checks in battery order. Failed probes contribute no findings.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{ScanError, ScanResult};
use super::target::parse_target_url;
use crate::config::HttpConfig;
use crate::feature::{HttpClient, HttpResponse};
use crate::util::truncate_chars;

/// Evidence strings are cut to this many characters.
const EVIDENCE_MAX_CHARS: usize = 200;

/// Finding severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(ScanError::InvalidSeverity(other.to_string())),
        }
    }
}

/// A matched check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    /// The probe URL that produced the match
    pub url: String,
    pub evidence: Option<String>,
}

/// Findings plus whether any probe got a response at all.
///
/// Distinguishes "unreachable" from "reachable and clean", which a bare
/// finding list cannot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnScanReport {
    pub target: String,
    pub reachable: bool,
    pub findings: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Copy)]
enum Probe {
    Target,
    Path(&'static str),
    Query(&'static str),
}

impl Probe {
    fn url(&self, base: &url::Url) -> String {
        let base_str = base.as_str().trim_end_matches('/');
        match self {
            Probe::Target => base.as_str().to_string(),
            Probe::Path(path) if base.query().is_none() => format!("{}{}", base_str, path),
            // Keep an existing query after the appended path
            Probe::Path(path) => {
                let mut url = base.clone();
                url.set_query(None);
                format!(
                    "{}{}?{}",
                    url.as_str().trim_end_matches('/'),
                    path,
                    base.query().unwrap_or_default()
                )
            }
            Probe::Query(query) => {
                let sep = if base.query().is_some() { '&' } else { '?' };
                format!("{}{}{}", base.as_str(), sep, query)
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Status(u16),
    Contains(&'static str),
    Body(Regex),
    MissingHeader(&'static str),
    Header(&'static str, Regex),
    /// A 3xx whose `Location` contains the given text
    RedirectTo(&'static str),
}

impl Matcher {
    /// Evidence for a match, `None` when the response does not match.
    fn evaluate(&self, response: &HttpResponse) -> Option<String> {
        match self {
            Matcher::Status(code) => {
                (response.status == *code).then(|| body_evidence(response, &response.body))
            }
            Matcher::Contains(needle) => response
                .body
                .find(needle)
                .map(|idx| body_evidence(response, &response.body[idx..])),
            Matcher::Body(re) => re
                .find(&response.body)
                .map(|m| body_evidence(response, &response.body[m.start()..])),
            Matcher::MissingHeader(name) => response
                .header(name)
                .is_none()
                .then(|| format!("Status: {}, header '{}' not present", response.status, name)),
            Matcher::Header(name, re) => response
                .header(name)
                .filter(|value| re.is_match(value))
                .map(|value| format!("{}: {}", name, value)),
            Matcher::RedirectTo(host) => {
                if !response.is_redirect() {
                    return None;
                }
                response
                    .header("location")
                    .filter(|location| location.contains(host))
                    .map(|location| format!("Status: {}, Location: {}", response.status, location))
            }
        }
    }
}

fn body_evidence(response: &HttpResponse, body: &str) -> String {
    format!("Status: {}, Body: {}", response.status, body)
}

/// One entry of the battery.
#[derive(Debug, Clone)]
pub struct Check {
    pub id: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    probe: Probe,
    matcher: Matcher,
}

/// Severity policy, keyed by check id.
fn severity_of(id: &str) -> Severity {
    match id {
        "sql-injection-error" | "exposed-env" => Severity::Critical,
        "directory-traversal" | "reflected-xss" | "exposed-git" | "exposed-admin-panel" => {
            Severity::High
        }
        "outdated-server-banner" | "verbose-error" | "debug-mode" | "open-redirect" => {
            Severity::Medium
        }
        "missing-x-frame-options" | "missing-x-content-type-options" => Severity::Low,
        _ => Severity::Info,
    }
}

fn regex(id: &'static str, pattern: &str) -> ScanResult<Regex> {
    Regex::new(pattern).map_err(|e| ScanError::InvalidPattern {
        id,
        reason: e.to_string(),
    })
}

fn check(id: &'static str, name: &'static str, probe: Probe, matcher: Matcher) -> Check {
    Check {
        id,
        name,
        severity: severity_of(id),
        probe,
        matcher,
    }
}

/// The fixed battery, in evaluation order.
fn battery() -> ScanResult<Vec<Check>> {
    Ok(vec![
        check(
            "missing-x-frame-options",
            "Missing X-Frame-Options Header",
            Probe::Target,
            Matcher::MissingHeader("x-frame-options"),
        ),
        check(
            "missing-x-content-type-options",
            "Missing X-Content-Type-Options Header",
            Probe::Target,
            Matcher::MissingHeader("x-content-type-options"),
        ),
        check(
            "server-version-disclosure",
            "Server Version Disclosure",
            Probe::Target,
            Matcher::Header(
                "server",
                regex("server-version-disclosure", r"[A-Za-z][\w.-]*/\d")?,
            ),
        ),
        check(
            "outdated-server-banner",
            "Outdated Server Software",
            Probe::Target,
            Matcher::Header(
                "server",
                regex(
                    "outdated-server-banner",
                    r"(?i)(apache/(1\.|2\.[0-2]\.)|nginx/(0\.|1\.([0-9]|1[0-7])\.)|microsoft-iis/[1-7]\.|php/([1-6]\.|7\.[0-3]\.))",
                )?,
            ),
        ),
        check(
            "verbose-error",
            "Verbose Error Page",
            Probe::Path("/reconflow-nonexistent-page"),
            Matcher::Body(regex(
                "verbose-error",
                r"(?i)(traceback \(most recent call last\)|stack trace|exception in thread|fatal error:.* on line \d+|at [\w.$]+\([\w]+\.java:\d+\))",
            )?),
        ),
        check(
            "debug-mode",
            "Debug Mode Enabled",
            Probe::Target,
            Matcher::Body(regex("debug-mode", r"(DEBUG|debug_mode|DEBUG_MODE).*true")?),
        ),
        check(
            "directory-traversal",
            "Directory Traversal",
            // Encoded slashes survive URL normalization of `..` segments
            Probe::Path("/..%2f..%2f..%2f..%2fetc%2fpasswd"),
            Matcher::Contains("root:x:0:0"),
        ),
        check(
            "sql-injection-error",
            "SQL Injection (Error Based)",
            Probe::Query("id=1'"),
            Matcher::Body(regex(
                "sql-injection-error",
                r"(SQL syntax|mysql_fetch|PostgreSQL query|ORA-\d{5}|SQLite3::|unterminated quoted string)",
            )?),
        ),
        check(
            "reflected-xss",
            "Reflected XSS",
            Probe::Query("q=<script>alert(1)</script>"),
            Matcher::Contains("<script>alert(1)</script>"),
        ),
        check(
            "open-redirect",
            "Open Redirect",
            Probe::Query(
                "next=https://evil.example.com&url=https://evil.example.com&redirect=https://evil.example.com",
            ),
            Matcher::RedirectTo("evil.example.com"),
        ),
        check(
            "exposed-git",
            "Exposed .git Directory",
            Probe::Path("/.git/config"),
            Matcher::Contains("[core]"),
        ),
        check(
            "exposed-env",
            "Exposed .env File",
            Probe::Path("/.env"),
            Matcher::Body(regex(
                "exposed-env",
                r"(?m)^\s*(DB_PASSWORD|APP_KEY|SECRET_KEY|AWS_SECRET_ACCESS_KEY)\s*=",
            )?),
        ),
        check(
            "exposed-admin-panel",
            "Exposed Admin Panel",
            Probe::Path("/admin"),
            Matcher::Status(200),
        ),
        check(
            "api-docs-exposure",
            "Exposed API Documentation",
            Probe::Path("/swagger-ui.html"),
            Matcher::Body(regex("api-docs-exposure", r"(?i)(swagger|openapi)")?),
        ),
    ])
}

/// Runs the check battery against a web target. Cheap to clone.
#[derive(Debug, Clone)]
pub struct VulnScanner {
    client: HttpClient,
    checks: Vec<Check>,
}

impl VulnScanner {
    pub fn new(config: &HttpConfig) -> ScanResult<Self> {
        let client =
            HttpClient::without_redirects(config).map_err(|e| ScanError::Client(e.to_string()))?;
        Ok(Self {
            client,
            checks: battery()?,
        })
    }

    /// The battery, in evaluation order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Run the battery and return the findings in battery order.
    ///
    /// An unreachable target yields an empty list.
    ///
    /// # Errors
    /// `InvalidUrl` if `target` is not an absolute http(s) URL.
    pub async fn vuln_scan(&self, target: &str) -> ScanResult<Vec<Vulnerability>> {
        Ok(self.vuln_scan_report(target).await?.findings)
    }

    /// Findings of at least `min` severity, in battery order.
    pub async fn scan_with_min_severity(
        &self,
        target: &str,
        min: Severity,
    ) -> ScanResult<Vec<Vulnerability>> {
        let mut findings = self.vuln_scan(target).await?;
        findings.retain(|finding| finding.severity >= min);
        Ok(findings)
    }

    pub async fn vuln_scan_report(&self, target: &str) -> ScanResult<VulnScanReport> {
        let base = parse_target_url(target)?;
        tracing::info!(target = %base, checks = self.checks.len(), "Starting vulnerability scan");

        let responses = self.fetch_probes(&base).await;
        let reachable = responses.values().any(Option::is_some);
        if !reachable {
            tracing::warn!(target = %base, "Target unreachable; no checks evaluated");
        }

        let mut findings = Vec::new();
        for check in &self.checks {
            let url = check.probe.url(&base);
            let Some(Some(response)) = responses.get(&url) else {
                continue;
            };
            tracing::debug!(check = check.id, %url, status = response.status, "Evaluating check");

            if let Some(evidence) = check.matcher.evaluate(response) {
                tracing::warn!(
                    check = check.id,
                    severity = %check.severity,
                    %url,
                    "Vulnerability found"
                );
                findings.push(Vulnerability {
                    id: check.id.to_string(),
                    name: check.name.to_string(),
                    severity: check.severity,
                    url,
                    evidence: Some(truncate_chars(&evidence, EVIDENCE_MAX_CHARS)),
                });
            }
        }

        tracing::info!(target = %base, findings = findings.len(), "Vulnerability scan finished");
        Ok(VulnScanReport {
            target: base.to_string(),
            reachable,
            findings,
        })
    }

    /// GET every distinct probe URL concurrently. Failures map to `None`.
    async fn fetch_probes(&self, base: &url::Url) -> HashMap<String, Option<HttpResponse>> {
        let mut urls: Vec<String> = Vec::new();
        for check in &self.checks {
            let url = check.probe.url(base);
            if !urls.contains(&url) {
                urls.push(url);
            }
        }

        let fetches = urls.into_iter().map(|url| async move {
            let response = match self.client.get(&url).await {
                Ok(response) => Some(response),
                Err(e) => {
                    tracing::debug!(%url, error = %e, "Probe failed");
                    None
                }
            };
            (url, response)
        });

        futures::future::join_all(fetches).await.into_iter().collect()
    }
}
