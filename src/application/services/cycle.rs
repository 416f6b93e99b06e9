use anyhow::Context;
use chrono::{DateTime, Utc};

use super::dispatcher::AlertDispatcher;
use crate::domain::entities::{
    Action, AlertKind, AlertProposal, ControlState, Signal, SignalStatus, StateMap, Target,
    TargetKind,
};
use crate::domain::policy::{self, ban};
use crate::domain::ports::effector::{Effector, EffectorError};
use crate::domain::ports::source::{SignalSource, TargetDiscovery};
use crate::domain::ports::store::StateStore;
use crate::domain::value_objects::PolicyConfig;

/// How one target ended the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Healthy or no action needed.
    Healthy,
    /// An action was proposed and successfully applied.
    Actioned,
    /// Observed unhealthy with no corrective action available yet.
    Unhealthy,
    /// Signal collection failed locally; state untouched this cycle.
    Skipped,
    /// The effector call failed; the decision will be reproduced next cycle.
    Failed,
}

#[derive(Debug, Clone)]
pub struct TargetOutcome {
    pub target_id: String,
    pub status: OutcomeStatus,
    pub detail: String,
}

/// Aggregate result of one decision cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub outcomes: Vec<TargetOutcome>,
    pub save_error: Option<String>,
}

impl CycleReport {
    /// 0 iff every target ended healthy/no-op or successfully actioned and
    /// the state was persisted. A skipped observation counts as unresolved.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        let all_clear = self.outcomes.iter().all(|o| {
            matches!(o.status, OutcomeStatus::Healthy | OutcomeStatus::Actioned)
        });
        i32::from(!(all_clear && self.save_error.is_none()))
    }

    #[must_use]
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    fn record(&mut self, target_id: &str, status: OutcomeStatus, detail: impl Into<String>) {
        self.outcomes.push(TargetOutcome {
            target_id: target_id.to_string(),
            status,
            detail: detail.into(),
        });
    }
}

/// Direction of a manual scaling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    Up,
    Down,
}

/// Result of a manual scale request.
#[derive(Debug)]
pub struct ForceScaleOutcome {
    pub from_units: u32,
    pub to_units: u32,
    pub applied: bool,
    pub reason: Option<String>,
}

/// Composes source → policy → effector → store → dispatcher for one
/// decision cycle over a set of targets. Each target is processed
/// independently; no per-target failure stops the rest, and all state
/// changes land in a single serialized save at the end.
pub struct CycleService<'a> {
    source: &'a dyn SignalSource,
    discovery: &'a [&'a dyn TargetDiscovery],
    effector: &'a dyn Effector,
    store: &'a dyn StateStore,
    dispatcher: &'a AlertDispatcher,
    policy: &'a PolicyConfig,
}

impl<'a> CycleService<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn SignalSource,
        discovery: &'a [&'a dyn TargetDiscovery],
        effector: &'a dyn Effector,
        store: &'a dyn StateStore,
        dispatcher: &'a AlertDispatcher,
        policy: &'a PolicyConfig,
    ) -> Self {
        Self {
            source,
            discovery,
            effector,
            store,
            dispatcher,
            policy,
        }
    }

    /// Run exactly one decision cycle: ban-expiry sweep, then per-target
    /// observe → decide → apply → alert, then one save.
    pub async fn run_once(&self, targets: &[Target], now: DateTime<Utc>) -> CycleReport {
        let mut report = CycleReport::default();
        let mut states = self.store.load();

        self.sweep_bans(&mut states, &mut report, now).await;

        let mut all_targets: Vec<Target> = targets.to_vec();
        for discovery in self.discovery {
            match discovery.discover().await {
                Ok(found) => all_targets.extend(found),
                Err(e) => {
                    tracing::warn!("{} discovery skipped: {e}", discovery.name());
                    report.record(discovery.name(), OutcomeStatus::Skipped, e.to_string());
                }
            }
        }

        for target in &all_targets {
            let outcome = self.process_target(target, &mut states, now).await;
            tracing::debug!("{}: {:?} ({})", outcome.target_id, outcome.status, outcome.detail);
            report.outcomes.push(outcome);
        }

        if let Err(e) = self.store.save(&states) {
            tracing::error!("state not persisted: {e}");
            report.save_error = Some(e.to_string());
        }

        report
    }

    /// Standalone ban-expiry sweep for the CLI. Loads state, lifts expired
    /// bans, and saves in one pass.
    pub async fn sweep(&self, now: DateTime<Utc>) -> anyhow::Result<CycleReport> {
        let mut report = CycleReport::default();
        let mut states = self.store.load();
        self.sweep_bans(&mut states, &mut report, now).await;
        self.store
            .save(&states)
            .context("state not persisted after sweep")?;
        Ok(report)
    }

    async fn sweep_bans(
        &self,
        states: &mut StateMap,
        report: &mut CycleReport,
        now: DateTime<Utc>,
    ) {
        for (target_id, action) in ban::sweep_expired(states, self.policy, now) {
            let Action::Unban { ref ip } = action else {
                continue;
            };
            match self.effector.unban(ip).await {
                Ok(()) => {
                    if let Some(state) = states.get_mut(&target_id) {
                        action.commit(state, now);
                    }
                    tracing::info!("ban expired, unbanned {ip}");
                    report.record(&target_id, OutcomeStatus::Actioned, action.to_string());
                }
                Err(e) => {
                    tracing::warn!("unban of {ip} failed: {e}");
                    report.record(&target_id, OutcomeStatus::Failed, e.to_string());
                }
            }
        }
    }

    async fn process_target(
        &self,
        target: &Target,
        states: &mut StateMap,
        now: DateTime<Utc>,
    ) -> TargetOutcome {
        let signal = match self.source.observe(target).await {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!("{target}: observation skipped: {e}");
                return TargetOutcome {
                    target_id: target.id.clone(),
                    status: OutcomeStatus::Skipped,
                    detail: e.to_string(),
                };
            }
        };

        let previous = states
            .get(&target.id)
            .cloned()
            .unwrap_or_else(|| self.initial_state(target));
        let decision = policy::decide(target, &previous, &signal, self.policy, now);
        let mut state = decision.state;

        let (status, detail) = if decision.action.is_noop() {
            if let Some(ref alert) = decision.alert {
                self.dispatcher.maybe_alert(&mut state, alert, now).await;
            }
            if is_unhealthy(target, &signal, decision.alert.as_ref()) {
                (OutcomeStatus::Unhealthy, format!("{:?}", signal.status))
            } else {
                (OutcomeStatus::Healthy, String::from("ok"))
            }
        } else {
            match self.apply(target, &decision.action).await {
                Ok(()) => {
                    decision.action.commit(&mut state, now);
                    tracing::info!("{target}: {}", decision.action);
                    if let Some(ref alert) = decision.alert {
                        self.dispatcher.maybe_alert(&mut state, alert, now).await;
                    }
                    self.announce_action(target, &decision.action).await;
                    (OutcomeStatus::Actioned, decision.action.to_string())
                }
                Err(e) => {
                    // No commit, no alert: the cooldown clock must not start
                    // for an action that never took effect, and the next
                    // cycle will reproduce the same decision.
                    tracing::warn!("{target}: {} failed: {e}", decision.action);
                    (OutcomeStatus::Failed, e.to_string())
                }
            }
        };

        states.insert(target.id.clone(), state);
        TargetOutcome {
            target_id: target.id.clone(),
            status,
            detail,
        }
    }

    fn initial_state(&self, target: &Target) -> ControlState {
        match target.kind {
            TargetKind::Service { .. } => ControlState::with_units(self.policy.min_units),
            _ => ControlState::default(),
        }
    }

    async fn apply(&self, target: &Target, action: &Action) -> Result<(), EffectorError> {
        match (action, &target.kind) {
            (Action::ScaleTo(units), TargetKind::Service { name }) => {
                self.effector.reconcile(name, *units).await
            }
            (
                Action::Ban {
                    ip,
                    duration_seconds,
                },
                _,
            ) => self.effector.ban(ip, *duration_seconds).await,
            (Action::Unban { ip }, _) => self.effector.unban(ip).await,
            (Action::Renew { domain }, _) => self.effector.renew(domain).await,
            (Action::NoOp, _) | (Action::ScaleTo(_), _) => Ok(()),
        }
    }

    async fn announce_action(&self, target: &Target, action: &Action) {
        let body = match action {
            Action::ScaleTo(units) => format!("scaled to {units} unit(s)"),
            Action::Renew { domain } => format!("certificate renewed for {domain}"),
            _ => return,
        };
        let notice = AlertProposal::notice(&target.id, "Action applied", body);
        self.dispatcher.announce(&notice).await;
    }

    /// Manual scaling for the CLI. Bounds are always enforced; the cooldown
    /// is honored unless `bypass_cooldown` is set.
    pub async fn force_scale(
        &self,
        service: &str,
        direction: ScaleDirection,
        bypass_cooldown: bool,
        now: DateTime<Utc>,
    ) -> anyhow::Result<ForceScaleOutcome> {
        let target = Target::service(service);
        let mut states = self.store.load();
        let mut state = states
            .get(&target.id)
            .cloned()
            .unwrap_or_else(|| ControlState::with_units(self.policy.min_units));
        state.current_units = state
            .current_units
            .clamp(self.policy.min_units, self.policy.max_units);
        let from_units = state.current_units;

        let to_units = match direction {
            ScaleDirection::Up => from_units.saturating_add(1).min(self.policy.max_units),
            ScaleDirection::Down => from_units.saturating_sub(1).max(self.policy.min_units),
        };
        if to_units == from_units {
            return Ok(ForceScaleOutcome {
                from_units,
                to_units,
                applied: false,
                reason: Some(format!("already at the configured bound ({from_units})")),
            });
        }
        if !bypass_cooldown && !state.cooldown_elapsed(now, self.policy.cooldown_seconds) {
            return Ok(ForceScaleOutcome {
                from_units,
                to_units,
                applied: false,
                reason: Some("cooldown active (pass --force to bypass)".to_string()),
            });
        }

        let action = Action::ScaleTo(to_units);
        self.effector
            .reconcile(service, to_units)
            .await
            .with_context(|| format!("manual {action} failed"))?;
        action.commit(&mut state, now);
        state.last_seen = Some(now);
        states.insert(target.id.clone(), state);
        self.store
            .save(&states)
            .context("state not persisted after manual scale")?;
        self.announce_action(&target, &action).await;

        Ok(ForceScaleOutcome {
            from_units,
            to_units,
            applied: true,
            reason: None,
        })
    }
}

fn is_unhealthy(target: &Target, signal: &Signal, alert: Option<&AlertProposal>) -> bool {
    if alert.is_some_and(|a| a.kind == AlertKind::Failure) {
        return true;
    }
    matches!(target.kind, TargetKind::Endpoint { .. }) && signal.status != SignalStatus::Ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_exits_zero() {
        assert_eq!(CycleReport::default().exit_code(), 0);
    }

    #[test]
    fn any_failed_outcome_exits_nonzero() {
        let mut report = CycleReport::default();
        report.record("service:app", OutcomeStatus::Actioned, "scale to 2 unit(s)");
        report.record("endpoint:x", OutcomeStatus::Failed, "timeout");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn skipped_observation_counts_as_unresolved() {
        let mut report = CycleReport::default();
        report.record("ip-discovery", OutcomeStatus::Skipped, "permission denied");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn save_error_exits_nonzero() {
        let mut report = CycleReport::default();
        report.record("service:app", OutcomeStatus::Healthy, "ok");
        report.save_error = Some("conflict".into());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn counts_by_status() {
        let mut report = CycleReport::default();
        report.record("a", OutcomeStatus::Healthy, "ok");
        report.record("b", OutcomeStatus::Healthy, "ok");
        report.record("c", OutcomeStatus::Unhealthy, "down");
        assert_eq!(report.count(OutcomeStatus::Healthy), 2);
        assert_eq!(report.count(OutcomeStatus::Unhealthy), 1);
        assert_eq!(report.count(OutcomeStatus::Failed), 0);
    }
}
