//! Shared test doubles for the cycle integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use vigia::domain::entities::{AlertProposal, Signal, Target};
use vigia::domain::ports::effector::{Effector, EffectorError};
use vigia::domain::ports::notifier::{NotificationError, Notifier};
use vigia::domain::ports::source::{SignalSource, SourceError};

/// Fixed base instant so cooldown and dedup arithmetic is deterministic.
pub fn ts(offset_seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset_seconds, 0).unwrap()
}

/// Source that replays a scripted queue of observations per target and
/// errors once a queue runs dry.
#[derive(Default)]
pub struct ScriptedSource {
    queues: Mutex<HashMap<String, VecDeque<Result<Signal, SourceError>>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, target_id: &str, signal: Signal) {
        self.queues
            .lock()
            .expect("source lock")
            .entry(target_id.to_string())
            .or_default()
            .push_back(Ok(signal));
    }

    pub fn push_error(&self, target_id: &str, error: SourceError) {
        self.queues
            .lock()
            .expect("source lock")
            .entry(target_id.to_string())
            .or_default()
            .push_back(Err(error));
    }
}

#[async_trait]
impl SignalSource for ScriptedSource {
    async fn observe(&self, target: &Target) -> Result<Signal, SourceError> {
        self.queues
            .lock()
            .expect("source lock")
            .get_mut(&target.id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(SourceError::Unavailable(format!(
                    "no scripted observation left for {}",
                    target.id
                )))
            })
    }
}

/// Effector that records every call and optionally fails them all.
pub struct RecordingEffector {
    pub calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingEffector {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// An effector whose every call times out after recording itself.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("effector lock").clone()
    }

    fn record(&self, call: String) -> Result<(), EffectorError> {
        self.calls.lock().expect("effector lock").push(call);
        if self.fail {
            Err(EffectorError::Timeout(60))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Effector for RecordingEffector {
    async fn reconcile(&self, service: &str, target_units: u32) -> Result<(), EffectorError> {
        self.record(format!("reconcile {service}={target_units}"))
    }

    async fn ban(&self, ip: &str, _duration_seconds: u32) -> Result<(), EffectorError> {
        self.record(format!("ban {ip}"))
    }

    async fn unban(&self, ip: &str) -> Result<(), EffectorError> {
        self.record(format!("unban {ip}"))
    }

    async fn renew(&self, domain: &str) -> Result<(), EffectorError> {
        self.record(format!("renew {domain}"))
    }
}

/// Notifier that collects every proposal it is asked to deliver. The inner
/// log is shared so tests keep a handle after the channel moves into the
/// dispatcher.
pub struct CollectingChannel {
    log: Arc<Mutex<Vec<AlertProposal>>>,
}

impl CollectingChannel {
    pub fn new() -> (Box<dyn Notifier>, Arc<Mutex<Vec<AlertProposal>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let channel = Self {
            log: Arc::clone(&log),
        };
        (Box::new(channel), log)
    }
}

#[async_trait]
impl Notifier for CollectingChannel {
    fn name(&self) -> &'static str {
        "collecting"
    }

    async fn send(&self, alert: &AlertProposal) -> Result<(), NotificationError> {
        self.log.lock().expect("channel lock").push(alert.clone());
        Ok(())
    }
}
