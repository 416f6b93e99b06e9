pub mod notify;
pub mod run;
pub mod scale;
pub mod status;
pub mod sweep;

use std::time::Duration;

use anyhow::Context;

use crate::application::config::AppConfig;
use crate::application::services::AlertDispatcher;
use crate::domain::ports::effector::Effector;
use crate::domain::value_objects::PolicyConfig;
use crate::infrastructure::effectors::{NoopEffector, SystemEffector};
use crate::infrastructure::notifications::build_channels;
use crate::infrastructure::persistence::FileStateStore;
use crate::infrastructure::sources::{
    AuthLogSource, CertificateSource, CompositeSource, HttpHealthSource, ResourceSource,
};

/// Concrete adapters wired from configuration. Commands borrow these into
/// a `CycleService`; the struct only exists to keep ownership in one place.
pub struct Wiring {
    pub source: CompositeSource,
    pub effector: Box<dyn Effector>,
    pub store: FileStateStore,
    pub dispatcher: AlertDispatcher,
    pub policy: PolicyConfig,
}

impl Wiring {
    /// # Errors
    ///
    /// Fails if the HTTP probe client cannot be built or the state path
    /// cannot be resolved.
    pub fn build(config: &AppConfig, dry_run: bool) -> anyhow::Result<Self> {
        let source = CompositeSource::new(
            ResourceSource::new(),
            HttpHealthSource::new(Duration::from_secs(config.health.probe_timeout_seconds))
                .context("health probe client")?,
            AuthLogSource::new(config.bans.auth_log.clone()),
            CertificateSource::new(config.certificates.cert_dir.clone()),
        );

        let effector: Box<dyn Effector> = if dry_run {
            Box::new(NoopEffector::new())
        } else {
            Box::new(SystemEffector::new())
        };

        let store = FileStateStore::new(config.state_path()?, config.state.retention_days);
        let dispatcher = AlertDispatcher::new(
            build_channels(&config.notifications),
            config.alerts.dedup_window_seconds,
        );

        Ok(Self {
            source,
            effector,
            store,
            dispatcher,
            policy: config.policy(),
        })
    }
}
