use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::domain::entities::{MetricKind, Signal, SignalStatus, Target, TargetKind};
use crate::domain::ports::source::{SignalSource, SourceError};

const OPENSSL_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads certificate expiry through `openssl x509 -enddate`.
///
/// The value is days until expiry (negative once expired). A certificate
/// file that does not exist is `Down`; an unparseable openssl answer is
/// `Unknown`, which the policy treats as "hold, decide nothing".
pub struct CertificateSource {
    cert_dir: PathBuf,
}

impl CertificateSource {
    #[must_use]
    pub fn new(cert_dir: PathBuf) -> Self {
        Self { cert_dir }
    }

    fn cert_path(&self, domain: &str) -> PathBuf {
        self.cert_dir.join(domain).join("fullchain.pem")
    }
}

/// Parses openssl's `notAfter=Jun  1 12:00:00 2026 GMT` line.
fn parse_not_after(stdout: &str) -> Option<NaiveDateTime> {
    let date = stdout.trim().strip_prefix("notAfter=")?;
    let date = date.trim_end_matches(" GMT").trim_end_matches(" UTC");
    NaiveDateTime::parse_from_str(date, "%b %e %H:%M:%S %Y").ok()
}

#[async_trait]
impl SignalSource for CertificateSource {
    async fn observe(&self, target: &Target) -> Result<Signal, SourceError> {
        let TargetKind::Certificate { ref domain } = target.kind else {
            return Err(SourceError::UnsupportedTarget(target.id.clone()));
        };
        let now = Utc::now();
        let cert_path = self.cert_path(domain);

        if !cert_path.exists() {
            return Ok(Signal::new(
                &target.id,
                MetricKind::CertDaysLeft,
                0.0,
                SignalStatus::Down,
                now,
            ));
        }

        let command = tokio::process::Command::new("openssl")
            .args(["x509", "-enddate", "-noout", "-in"])
            .arg(&cert_path)
            .kill_on_drop(true)
            .output();
        let output = match tokio::time::timeout(OPENSSL_TIMEOUT, command).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SourceError::Unavailable(format!("openssl not runnable: {e}")));
            }
            Err(_) => {
                return Err(SourceError::Unavailable("openssl timed out".to_string()));
            }
        };

        let (value, status) = if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            match parse_not_after(&stdout) {
                Some(expiry) => {
                    let days_left = (expiry.and_utc() - now).num_days();
                    #[allow(clippy::cast_precision_loss)]
                    (days_left as f64, SignalStatus::Ok)
                }
                None => {
                    tracing::warn!("unparseable openssl output for {domain}: {stdout}");
                    (0.0, SignalStatus::Unknown)
                }
            }
        } else {
            tracing::warn!(
                "openssl failed for {domain}: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            (0.0, SignalStatus::Unknown)
        };

        Ok(Signal::new(
            &target.id,
            MetricKind::CertDaysLeft,
            value,
            status,
            now,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_openssl_enddate_line() {
        let parsed = parse_not_after("notAfter=Jun  1 12:00:00 2026 GMT\n").expect("parse");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2026-06-01 12:00");
    }

    #[test]
    fn two_digit_day_also_parses() {
        assert!(parse_not_after("notAfter=Dec 31 23:59:59 2025 GMT").is_some());
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_not_after("unable to load certificate").is_none());
    }

    #[tokio::test]
    async fn missing_certificate_is_down() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = CertificateSource::new(dir.path().to_path_buf());
        let target = Target::certificate("missing.example.org");
        let signal = source.observe(&target).await.expect("signal");
        assert_eq!(signal.status, SignalStatus::Down);
        assert_eq!(signal.metric_kind, MetricKind::CertDaysLeft);
    }
}
