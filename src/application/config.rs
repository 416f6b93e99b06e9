use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Target;
use crate::domain::value_objects::PolicyConfig;

/// Top-level application configuration loaded from TOML.
///
/// Every section and field defaults, so a partial (or absent) file is
/// always usable. Loaded once at process start; the derived `PolicyConfig`
/// is validated before any cycle runs and never re-read mid-cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scaling: ScalingConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub bans: BanConfig,
    #[serde(default)]
    pub certificates: CertificateConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub state: StateConfig,
}

/// Resource autoscaling of one compose service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingConfig {
    /// Compose service to scale; no service means no scaling target.
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default = "default_scale_up")]
    pub scale_up_threshold: u32,
    #[serde(default = "default_scale_down")]
    pub scale_down_threshold: u32,
    #[serde(default = "default_min_units")]
    pub min_units: u32,
    #[serde(default = "default_max_units")]
    pub max_units: u32,
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u32,
}

/// HTTP endpoint health monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default = "default_failure_threshold")]
    pub failure_alert_threshold: u32,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
}

/// Brute-force IP banning from auth-log analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_auth_log")]
    pub auth_log: PathBuf,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_ban_duration")]
    pub ban_duration_seconds: u32,
}

/// TLS certificate expiry tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateConfig {
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default = "default_cert_dir")]
    pub cert_dir: PathBuf,
    #[serde(default = "default_renew_within")]
    pub renew_within_days: i64,
    #[serde(default = "default_notify_within")]
    pub notify_within_days: i64,
}

/// Alert dedup behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_dedup_window")]
    pub dedup_window_seconds: u32,
}

/// Notification channels. A channel is active iff its section is present
/// and complete; a missing credential is a load-time skip, never a runtime
/// lookup failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub terminal: bool,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub slack: Option<WebhookConfig>,
    #[serde(default)]
    pub discord: Option<WebhookConfig>,
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub webhook_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_email_from")]
    pub from: String,
    #[serde(default = "default_email_to")]
    pub to: String,
}

/// Persisted state location and retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path to the JSON state document; defaults under the user data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

// --- Defaults ---

const fn default_scale_up() -> u32 {
    80
}

const fn default_scale_down() -> u32 {
    30
}

const fn default_min_units() -> u32 {
    1
}

const fn default_max_units() -> u32 {
    5
}

const fn default_cooldown() -> u32 {
    300
}

const fn default_failure_threshold() -> u32 {
    3
}

const fn default_probe_timeout() -> u64 {
    10
}

fn default_auth_log() -> PathBuf {
    PathBuf::from("/var/log/auth.log")
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_ban_duration() -> u32 {
    86_400
}

fn default_cert_dir() -> PathBuf {
    PathBuf::from("/etc/letsencrypt/live")
}

const fn default_renew_within() -> i64 {
    7
}

const fn default_notify_within() -> i64 {
    14
}

const fn default_dedup_window() -> u32 {
    3600
}

const fn default_true() -> bool {
    true
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_email_from() -> String {
    "vigia@localhost".into()
}

fn default_email_to() -> String {
    "admin@localhost".into()
}

const fn default_retention_days() -> u32 {
    30
}

// --- Default impls ---

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            service: None,
            scale_up_threshold: default_scale_up(),
            scale_down_threshold: default_scale_down(),
            min_units: default_min_units(),
            max_units: default_max_units(),
            cooldown_seconds: default_cooldown(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            failure_alert_threshold: default_failure_threshold(),
            probe_timeout_seconds: default_probe_timeout(),
        }
    }
}

impl Default for BanConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            auth_log: default_auth_log(),
            max_attempts: default_max_attempts(),
            ban_duration_seconds: default_ban_duration(),
        }
    }
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            cert_dir: default_cert_dir(),
            renew_within_days: default_renew_within(),
            notify_within_days: default_notify_within(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            dedup_window_seconds: default_dedup_window(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            terminal: true,
            telegram: None,
            slack: None,
            discord: None,
            email: None,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: None,
            retention_days: default_retention_days(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from the default path, creating a default file if absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or write a default config file first.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, content).context("failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("vigia").join("config.toml"))
    }

    /// Resolved state file path.
    pub fn state_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.state.path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_local_dir().context("could not determine data directory")?;
        Ok(data_dir.join("vigia").join("state.json"))
    }

    /// Collapse the per-section knobs into the immutable policy value the
    /// decision function reads.
    #[must_use]
    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            scale_up_threshold: self.scaling.scale_up_threshold,
            scale_down_threshold: self.scaling.scale_down_threshold,
            min_units: self.scaling.min_units,
            max_units: self.scaling.max_units,
            cooldown_seconds: self.scaling.cooldown_seconds,
            failure_alert_threshold: self.health.failure_alert_threshold,
            dedup_window_seconds: self.alerts.dedup_window_seconds,
            max_attempts: self.bans.max_attempts,
            ban_duration_seconds: self.bans.ban_duration_seconds,
            renew_within_days: self.certificates.renew_within_days,
            notify_within_days: self.certificates.notify_within_days,
            retention_days: self.state.retention_days,
        }
    }

    /// The statically configured targets. IP targets are discovered from
    /// the auth log at cycle time, not listed here.
    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        if let Some(ref service) = self.scaling.service {
            targets.push(Target::service(service));
        }
        for url in &self.health.urls {
            targets.push(Target::endpoint(url));
        }
        for domain in &self.certificates.domains {
            targets.push(Target::certificate(domain));
        }
        targets
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = AppConfig::default();
        assert!(config.scaling.service.is_none());
        assert_eq!(config.scaling.scale_up_threshold, 80);
        assert_eq!(config.scaling.scale_down_threshold, 30);
        assert_eq!(config.scaling.cooldown_seconds, 300);
        assert_eq!(config.health.failure_alert_threshold, 3);
        assert!(!config.bans.enabled);
        assert_eq!(config.bans.max_attempts, 5);
        assert_eq!(config.certificates.renew_within_days, 7);
        assert_eq!(config.alerts.dedup_window_seconds, 3600);
        assert!(config.notifications.terminal);
        assert!(config.notifications.telegram.is_none());
        assert_eq!(config.state.retention_days, 30);
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(AppConfig::default().policy().validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scaling]
            service = "app"
            scale_up_threshold = 75

            [health]
            urls = ["http://localhost:3000/health"]
            "#,
        )
        .expect("parse");
        assert_eq!(config.scaling.service.as_deref(), Some("app"));
        assert_eq!(config.scaling.scale_up_threshold, 75);
        assert_eq!(config.scaling.scale_down_threshold, 30);
        assert_eq!(config.health.urls.len(), 1);
        assert_eq!(config.bans.max_attempts, 5);
    }

    #[test]
    fn invalid_combo_surfaces_through_policy_validate() {
        let config: AppConfig = toml::from_str(
            r#"
            [scaling]
            min_units = 9
            max_units = 2
            "#,
        )
        .expect("parse");
        assert!(config.policy().validate().is_err());
    }

    #[test]
    fn targets_reflect_configured_domains() {
        let config: AppConfig = toml::from_str(
            r#"
            [scaling]
            service = "app"

            [health]
            urls = ["http://a/health", "http://b/health"]

            [certificates]
            domains = ["example.org"]
            "#,
        )
        .expect("parse");
        let targets = config.targets();
        assert_eq!(targets.len(), 4);
        assert_eq!(targets[0].id, "service:app");
        assert_eq!(targets[3].id, "cert:example.org");
    }

    #[test]
    fn serde_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let back: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(back.scaling.scale_up_threshold, config.scaling.scale_up_threshold);
        assert_eq!(back.state.retention_days, config.state.retention_days);
    }

    #[test]
    fn load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let config = AppConfig::load_or_create(&path).expect("create");
        assert!(path.exists());
        assert_eq!(config.scaling.scale_up_threshold, 80);

        let reloaded = AppConfig::load_or_create(&path).expect("reload");
        assert_eq!(reloaded.alerts.dedup_window_seconds, 3600);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml {{").expect("write");
        assert!(AppConfig::load_from(&path).is_err());
    }
}
