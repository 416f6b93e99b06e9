use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;

use crate::domain::entities::{MetricKind, Signal, SignalStatus, Target, TargetKind};
use crate::domain::ports::source::{SignalSource, SourceError, TargetDiscovery};

/// Only the tail of the log matters; older attempts have either been acted
/// on already or aged out.
const TAIL_LINES: usize = 1000;

/// Counts failed authentication attempts per IP from the system auth log.
///
/// IP targets are not configured statically; this source discovers them
/// from the log and then serves their attempt counts. The log is parsed at
/// most once per process (one invocation = one cycle), cached behind a
/// mutex.
///
/// A missing log file is an empty result, not a fault — a fresh host simply
/// has no failed logins yet. An unreadable log (permissions) is a local
/// fault that skips the whole ban domain for this cycle.
pub struct AuthLogSource {
    log_path: PathBuf,
    ip_pattern: Regex,
    counts: Mutex<Option<HashMap<String, u32>>>,
}

impl AuthLogSource {
    #[must_use]
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            #[allow(clippy::expect_used)]
            ip_pattern: Regex::new(r"(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})")
                .expect("static pattern is valid"),
            counts: Mutex::new(None),
        }
    }

    fn failed_attempts(&self) -> Result<HashMap<String, u32>, SourceError> {
        let mut cache = self
            .counts
            .lock()
            .map_err(|e| SourceError::Unavailable(format!("cache lock poisoned: {e}")))?;
        if let Some(ref counts) = *cache {
            return Ok(counts.clone());
        }

        let content = match std::fs::read_to_string(&self.log_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("auth log {} not found", self.log_path.display());
                String::new()
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                return Err(SourceError::PermissionDenied(
                    self.log_path.display().to_string(),
                ));
            }
            Err(e) => {
                return Err(SourceError::Unavailable(format!(
                    "failed to read {}: {e}",
                    self.log_path.display()
                )));
            }
        };

        let counts = parse_attempts(&content, &self.ip_pattern);
        *cache = Some(counts.clone());
        Ok(counts)
    }
}

fn parse_attempts(content: &str, ip_pattern: &Regex) -> HashMap<String, u32> {
    let lines: Vec<&str> = content.lines().collect();
    let tail = lines.len().saturating_sub(TAIL_LINES);
    let mut counts: HashMap<String, u32> = HashMap::new();

    for line in &lines[tail..] {
        if !line.contains("Failed password") && !line.contains("authentication failure") {
            continue;
        }
        if let Some(m) = ip_pattern.find(line) {
            let ip = m.as_str();
            if ip.starts_with("127.") {
                continue;
            }
            *counts.entry(ip.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

#[async_trait]
impl TargetDiscovery for AuthLogSource {
    fn name(&self) -> &'static str {
        "auth-log-discovery"
    }

    async fn discover(&self) -> Result<Vec<Target>, SourceError> {
        let counts = self.failed_attempts()?;
        let mut ips: Vec<&String> = counts.keys().collect();
        ips.sort();
        Ok(ips
            .into_iter()
            .map(|ip| Target::ip_source(ip, self.log_path.clone()))
            .collect())
    }
}

#[async_trait]
impl SignalSource for AuthLogSource {
    async fn observe(&self, target: &Target) -> Result<Signal, SourceError> {
        let TargetKind::IpSource { ref ip, .. } = target.kind else {
            return Err(SourceError::UnsupportedTarget(target.id.clone()));
        };
        let counts = self.failed_attempts()?;
        let attempts = counts.get(ip).copied().unwrap_or(0);
        let status = if attempts == 0 {
            SignalStatus::Ok
        } else {
            SignalStatus::Degraded
        };
        Ok(Signal::new(
            &target.id,
            MetricKind::FailedLogins,
            f64::from(attempts),
            status,
            Utc::now(),
        ))
    }
}
