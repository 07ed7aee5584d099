//! Feature library - system, time, math, crypto and HTTP primitives.
//!
//! Everything here is stateless apart from the HTTP connection pool held by
//! [`Feature`]. The free functions in the submodules can be called directly;
//! [`Feature`] bundles them as a capability object that the pipeline and
//! callers pass around explicitly.

pub mod clock;
pub mod crypto;
mod error;
pub mod http;
pub mod math;
pub mod system;

pub use clock::{Now, TimeOfDay};
pub use crypto::HashAlgo;
pub use error::{FeatureError, FeatureResult};
pub use http::{HttpClient, HttpResponse};
pub use system::SystemInfo;

use crate::config::HttpConfig;

/// Capability handle for Feature library calls.
///
/// Cheap to clone and safe to share between tasks and threads.
#[derive(Debug, Clone)]
pub struct Feature {
    http: HttpClient,
}

impl Feature {
    pub fn new(http: &HttpConfig) -> FeatureResult<Self> {
        Ok(Self {
            http: HttpClient::new(http)?,
        })
    }

    // System

    pub fn system_info(&self) -> SystemInfo {
        SystemInfo::collect()
    }

    pub fn cpu_usage(&self) -> Vec<f32> {
        system::cpu_usage()
    }

    pub fn memory_percent(&self) -> f64 {
        system::memory_percent()
    }

    // Time

    pub fn now(&self) -> Now {
        Now::local()
    }

    pub fn timestamp(&self) -> i64 {
        clock::timestamp()
    }

    pub fn timestamp_ms(&self) -> i64 {
        clock::timestamp_ms()
    }

    pub fn greeting(&self) -> String {
        clock::greeting()
    }

    // Math

    pub fn sum(&self, numbers: &[f64]) -> FeatureResult<f64> {
        math::sum(numbers)
    }

    pub fn mean(&self, numbers: &[f64]) -> FeatureResult<f64> {
        math::mean(numbers)
    }

    pub fn min(&self, numbers: &[f64]) -> FeatureResult<f64> {
        math::min(numbers)
    }

    pub fn max(&self, numbers: &[f64]) -> FeatureResult<f64> {
        math::max(numbers)
    }

    pub fn median(&self, numbers: &[f64]) -> FeatureResult<f64> {
        math::median(numbers)
    }

    pub fn std_dev(&self, numbers: &[f64]) -> FeatureResult<f64> {
        math::std_dev(numbers)
    }

    pub fn sqrt(&self, x: f64) -> FeatureResult<f64> {
        math::sqrt(x)
    }

    pub fn factorial(&self, n: u64) -> String {
        math::factorial(n)
    }

    pub fn is_prime(&self, n: u64) -> bool {
        math::is_prime(n)
    }

    pub fn random(&self) -> f64 {
        math::random()
    }

    pub fn random_range(&self, lo: i64, hi: i64) -> FeatureResult<i64> {
        math::random_range(lo, hi)
    }

    // Crypto

    pub fn hash_sha256(&self, data: &str) -> String {
        crypto::hash_sha256(data)
    }

    pub fn hash_md5(&self, data: &str) -> String {
        crypto::hash_md5(data)
    }

    // Network

    pub async fn http_get(&self, url: &str) -> FeatureResult<HttpResponse> {
        self.http.get(url).await
    }
}
