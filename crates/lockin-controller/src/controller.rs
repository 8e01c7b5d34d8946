//! The access controller.
//!
//! [`AccessController`] is the single owner of all mutable device state:
//! lock position, lockout counters, device identity and connectivity. Every
//! handler takes `&mut self` plus the current time, so the caller decides
//! how events are scheduled and tests can drive the clock explicitly.
//!
//! # Submission Flow
//!
//! ```text
//! submit_code(code)
//!     │
//!     ├─ unpaired? ──────────────> OfflineRejected(Unpaired)     [warning]
//!     ├─ offline? ───────────────> OfflineRejected(Disconnected) [warning]
//!     ├─ lockout window open? ───> LockedOut                     [lockout]
//!     │
//!     └─ authority.validate (bounded)
//!            ├─ true ───> release bolt, reset counters ─> Unlocked  [unlocked]
//!            ├─ false ──> count failure ─┬─> Rejected              [error]
//!            │                           └─> LockedOut (threshold) [lockout]
//!            └─ error ──> go offline, not counted
//!                         ─> OfflineRejected(Transport)          [warning]
//! ```
//!
//! Peripheral and audit failures are logged and never change an outcome
//! that has already been decided.
//!
//! # Relock Deadline
//!
//! Remote calls made while the bolt is released race the relock deadline.
//! If the deadline passes first, the bolt is engaged at once and the call
//! then runs to completion.

use crate::event::{EventReport, LockEvent};
use crate::lockout::{FailureVerdict, LockoutPolicy, LockoutState};
use crate::state_machine::{LockMachine, LockTransition, TransitionCause};
use crate::status::StatusSnapshot;
use lockin_core::{
    AuditEventType, ControllerConfig, DeviceIdentity, LockState, OfflineCause, Outcome, Result,
    Signal,
};
use lockin_hardware::LockActuator;
use lockin_network::{
    AuditEvent, Bounded, EventMetadata, HeartbeatReport, NetworkLink, RemoteAuthority, bounded,
};
use lockin_storage::CredentialStore;
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, error, info, warn};

/// What a call to [`AccessController::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The unlock window elapsed and the bolt was re-engaged.
    pub relocked: bool,
    /// The radio reported the link down while the device believed it was online.
    pub link_lost: bool,
    /// A reassociation was attempted; `Some(true)` if it succeeded.
    pub reassociated: Option<bool>,
    /// A heartbeat was sent; `Some(true)` if it was acknowledged.
    pub heartbeat: Option<bool>,
}

impl TickReport {
    /// True when the tick had nothing to do.
    pub fn is_idle(&self) -> bool {
        !self.relocked && !self.link_lost && self.reassociated.is_none() && self.heartbeat.is_none()
    }
}

/// Access-control core of the lock.
///
/// Generic over its four collaborators so tests can inject deterministic
/// fakes. Every remote call goes through [`Bounded`], capped by
/// [`ControllerConfig::network_timeout`].
#[derive(Debug)]
pub struct AccessController<A, S, L, N> {
    config: ControllerConfig,
    authority: Bounded<A>,
    store: S,
    actuator: L,
    link: N,
    identity: DeviceIdentity,
    lock: LockMachine,
    lockout: LockoutState,
    policy: LockoutPolicy,
    online: bool,
    booted_at: Instant,
    last_heartbeat: Instant,
    last_reconnect: Option<Instant>,
}

impl<A, S, L, N> AccessController<A, S, L, N>
where
    A: RemoteAuthority,
    S: CredentialStore,
    L: LockActuator,
    N: NetworkLink,
{
    /// Create a controller in the power-up state: locked, unpaired, offline.
    ///
    /// Call [`boot`](Self::boot) before delivering events.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` fails validation.
    pub fn new(
        config: ControllerConfig,
        authority: A,
        store: S,
        actuator: L,
        link: N,
        now: Instant,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            authority: Bounded::new(authority, config.network_timeout()),
            lock: LockMachine::new(config.unlock_duration()),
            policy: LockoutPolicy::from(&config),
            config,
            store,
            actuator,
            link,
            identity: DeviceIdentity::unpaired(),
            lockout: LockoutState::new(),
            online: false,
            booted_at: now,
            last_heartbeat: now,
            last_reconnect: None,
        })
    }

    /// Power-up sequence.
    ///
    /// Loads the stored identity, engages the bolt, associates with the
    /// network and, if online and paired, sends an initial heartbeat. A
    /// failed identity read leaves the device unpaired.
    pub async fn boot(&mut self, now: Instant) {
        self.booted_at = now;

        self.identity = match self.store.load().await {
            Ok(identity) => identity,
            Err(e) => {
                error!(error = %e, "Failed to load device identity, starting unpaired");
                DeviceIdentity::unpaired()
            }
        };

        self.lock.force_lock(now, TransitionCause::Boot);
        lock_bolt(&mut self.actuator).await;

        if !self.reassociate(now).await {
            self.indicate(Signal::Warning).await;
        }

        if self.online && self.identity.is_paired() {
            self.send_heartbeat(now).await;
        }
        self.last_heartbeat = now;

        info!(
            paired = self.identity.is_paired(),
            online = self.online,
            firmware = %self.config.firmware_version,
            "Controller booted"
        );
    }

    /// Evaluate a submitted code.
    ///
    /// The code is assumed to have the configured length; the input layer
    /// filters anything else.
    pub async fn submit_code(&mut self, code: &str, now: Instant) -> Outcome {
        self.enforce_relock(now).await;

        if !self.identity.is_paired() {
            debug!("Submission refused, device is not paired");
            return self.refuse(OfflineCause::Unpaired).await;
        }
        if !self.online {
            debug!("Submission refused, device is offline");
            return self.refuse(OfflineCause::Disconnected).await;
        }
        if self.lockout.is_locked_out(now) {
            debug!(
                remaining_secs = self.lockout.remaining(now).as_secs(),
                "Submission refused, lockout active"
            );
            self.indicate(Signal::Lockout).await;
            return Outcome::LockedOut;
        }

        let validation = relock_during(
            &mut self.lock,
            &mut self.actuator,
            self.authority.validate(&self.identity, code),
        )
        .await;

        match validation {
            Ok(true) => {
                self.online = true;
                self.lockout.record_success();
                self.unlock(now, TransitionCause::Validated).await;
                info!("Code accepted");

                self.audit(AuditEventType::UnlockSuccess, code_metadata(code)).await;
                Outcome::Unlocked
            }
            Ok(false) => {
                self.online = true;
                let verdict = self.lockout.record_failure(&self.policy, now);
                let outcome = match verdict {
                    FailureVerdict::Counted { attempts } => {
                        info!(attempts, max = self.policy.max_attempts, "Code rejected");
                        Outcome::Rejected
                    }
                    FailureVerdict::LockoutTriggered { attempts, .. } => {
                        warn!(
                            attempts,
                            penalty_secs = self.policy.penalty.as_secs(),
                            "Too many failed attempts, lockout started"
                        );
                        Outcome::LockedOut
                    }
                };
                self.indicate(outcome.signal()).await;

                let mut metadata = code_metadata(code);
                metadata.insert("attempts".to_string(), Value::from(verdict.attempts()));
                self.audit(AuditEventType::UnlockFail, metadata).await;
                outcome
            }
            Err(e) => {
                let e = lockin_core::Error::from(e);
                warn!(error = %e, "Validation did not complete, attempt not counted");
                self.online = false;
                self.refuse(OfflineCause::Transport).await
            }
        }
    }

    /// Physical override: release the bolt regardless of lockout or
    /// connectivity. Attempt counters are left as they are.
    pub async fn manual_unlock(&mut self, now: Instant) {
        info!(
            lockout_active = self.lockout.is_locked_out(now),
            "Manual override"
        );
        self.unlock(now, TransitionCause::ManualOverride).await;
        self.audit(AuditEventType::ManualUnlock, EventMetadata::new()).await;
    }

    /// Replace the device identity and persist it.
    ///
    /// The in-memory identity only changes once the store has confirmed the
    /// write.
    ///
    /// # Errors
    ///
    /// Returns `Error::Persistence` if the token does not fit the identity
    /// slot or the store rejects the write.
    pub async fn pair(&mut self, token: &str) -> Result<()> {
        match self.persist_identity(token).await {
            Ok(identity) => {
                self.identity = identity;
                info!(paired = self.identity.is_paired(), "Device identity replaced");
                self.indicate(Signal::Unlocked).await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Pairing failed, identity unchanged");
                self.indicate(Signal::Error).await;
                Err(e)
            }
        }
    }

    async fn persist_identity(&self, token: &str) -> Result<DeviceIdentity> {
        let identity = DeviceIdentity::new(token)?;
        self.store.save(&identity).await?;
        Ok(identity)
    }

    /// Pairing button: signal that the device is ready to be provisioned.
    pub async fn begin_pairing(&mut self) {
        info!(paired = self.identity.is_paired(), "Pairing mode requested");
        self.indicate(Signal::Pairing).await;
    }

    pub fn is_paired(&self) -> bool {
        self.identity.is_paired()
    }

    /// Periodic housekeeping, safe to call at any granularity.
    ///
    /// In order: auto-relock, passive link check, reassociation (at most once
    /// per reconnect interval), heartbeat (at most once per heartbeat
    /// interval).
    pub async fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport {
            relocked: self.enforce_relock(now).await,
            ..TickReport::default()
        };

        if self.online && !self.link.is_associated() {
            warn!("Network link lost");
            self.online = false;
            report.link_lost = true;
            self.indicate(Signal::Warning).await;
        }

        if !self.online && self.reconnect_due(now) {
            report.reassociated = Some(self.reassociate(now).await);
        }

        if elapsed(self.last_heartbeat, now) >= self.config.heartbeat_interval() {
            self.last_heartbeat = now;
            if self.online && self.identity.is_paired() {
                report.heartbeat = Some(self.send_heartbeat(now).await);
            }
        }

        report
    }

    /// Re-engage the bolt if the unlock window has elapsed.
    ///
    /// Returns whether a relock happened.
    pub async fn enforce_relock(&mut self, now: Instant) -> bool {
        if self.lock.relock(now).is_none() {
            return false;
        }
        info!("Unlock window elapsed, relocking");
        lock_bolt(&mut self.actuator).await;
        true
    }

    /// Dispatch an input event to its handler.
    pub async fn handle(&mut self, event: LockEvent, now: Instant) -> EventReport {
        match event {
            LockEvent::SubmitCode(code) => {
                let outcome = self.submit_code(&code, now).await;
                let remaining_secs = self.lockout.remaining(now).as_secs();
                if let Some(refusal) = outcome.into_error(remaining_secs) {
                    debug!(%refusal, "Submission refused");
                }
                EventReport::Submission(outcome)
            }
            LockEvent::ManualUnlock => {
                self.manual_unlock(now).await;
                EventReport::ManualUnlocked
            }
            LockEvent::Pair(token) => match self.pair(&token).await {
                Ok(()) => EventReport::Paired,
                Err(e) => EventReport::PairingFailed(e),
            },
            LockEvent::BeginPairing => {
                self.begin_pairing().await;
                EventReport::PairingMode
            }
            LockEvent::Status => EventReport::Status(self.status(now)),
        }
    }

    pub fn status(&self, now: Instant) -> StatusSnapshot {
        StatusSnapshot {
            lock_state: self.lock.state(),
            online: self.online,
            paired: self.identity.is_paired(),
            attempt_count: self.lockout.attempt_count(),
            lockout_remaining_secs: self.lockout.remaining(now).as_secs(),
            signal_strength: self.link.signal_strength(),
            mac_address: self.link.mac_address(),
            uptime_secs: elapsed(self.booted_at, now).as_secs(),
            firmware_version: self.config.firmware_version.clone(),
        }
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    pub fn attempt_count(&self) -> u32 {
        self.lockout.attempt_count()
    }

    pub fn lockout_until(&self) -> Option<Instant> {
        self.lockout.lockout_until()
    }

    pub fn is_locked_out(&self, now: Instant) -> bool {
        self.lockout.is_locked_out(now)
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Recent lock transitions, oldest first.
    pub fn lock_history(&self) -> &VecDeque<LockTransition> {
        self.lock.history()
    }

    async fn refuse(&mut self, cause: OfflineCause) -> Outcome {
        let outcome = Outcome::OfflineRejected(cause);
        self.indicate(outcome.signal()).await;
        outcome
    }

    async fn unlock(&mut self, now: Instant, cause: TransitionCause) {
        self.lock.release(now, cause);
        if let Err(e) = self.actuator.release().await {
            error!(error = %e, %cause, "Failed to release bolt");
        }
        self.indicate(Signal::Unlocked).await;
    }

    async fn indicate(&mut self, signal: Signal) {
        if let Err(e) = self.actuator.indicate(signal).await {
            warn!(error = %e, %signal, "Indicator unavailable");
        }
    }

    fn reconnect_due(&self, now: Instant) -> bool {
        self.last_reconnect
            .is_none_or(|at| elapsed(at, now) >= self.config.reconnect_interval())
    }

    async fn reassociate(&mut self, now: Instant) -> bool {
        self.last_reconnect = Some(now);
        let limit = self.config.network_timeout();
        let call = bounded(limit, self.link.associate());

        match relock_during(&mut self.lock, &mut self.actuator, call).await {
            Ok(()) => {
                info!(rssi = self.link.signal_strength(), "Network associated");
                self.online = true;
            }
            Err(e) => {
                warn!(error = %e, "Network association failed");
                self.online = false;
            }
        }
        self.online
    }

    async fn send_heartbeat(&mut self, now: Instant) -> bool {
        let report = HeartbeatReport {
            lock_state: self.lock.state(),
            signal_strength: self.link.signal_strength(),
            uptime_secs: elapsed(self.booted_at, now).as_secs(),
            firmware_version: self.config.firmware_version.clone(),
            mac_address: self.link.mac_address(),
        };

        let call = self.authority.heartbeat(&self.identity, &report);

        match relock_during(&mut self.lock, &mut self.actuator, call).await {
            Ok(()) => {
                debug!(uptime_secs = report.uptime_secs, "Heartbeat acknowledged");
                self.online = true;
                true
            }
            Err(e) => {
                warn!(error = %e, "Heartbeat failed, marking offline");
                self.online = false;
                self.indicate(Signal::Warning).await;
                false
            }
        }
    }

    /// Best-effort audit record. Skipped while offline or unpaired; delivery
    /// failures are dropped.
    async fn audit(&mut self, event_type: AuditEventType, metadata: EventMetadata) {
        if !self.online || !self.identity.is_paired() {
            debug!(%event_type, "Audit event skipped, no connectivity");
            return;
        }

        let event = AuditEvent::new(event_type, metadata);
        let call = self.authority.log_event(&self.identity, &event);
        if let Err(e) = relock_during(&mut self.lock, &mut self.actuator, call).await {
            debug!(error = %e, %event_type, "Audit event dropped");
        }
    }
}

/// Await `call`, engaging the bolt if the unlock window ends first.
async fn relock_during<L, F>(lock: &mut LockMachine, actuator: &mut L, call: F) -> F::Output
where
    L: LockActuator,
    F: Future,
{
    let Some(deadline) = lock.relock_deadline() else {
        return call.await;
    };

    tokio::pin!(call);
    tokio::select! {
        biased;
        output = &mut call => return output,
        () = time::sleep_until(deadline) => {}
    }

    if lock.relock(deadline).is_some() {
        info!("Unlock window elapsed during a remote call, relocking");
        lock_bolt(actuator).await;
    }
    call.await
}

async fn lock_bolt<L: LockActuator>(actuator: &mut L) {
    if let Err(e) = actuator.engage().await {
        error!(error = %e, "Failed to engage bolt");
    }
    if let Err(e) = actuator.indicate(Signal::Locked).await {
        warn!(error = %e, "Indicator unavailable");
    }
}

fn code_metadata(code: &str) -> EventMetadata {
    let mut metadata = EventMetadata::new();
    metadata.insert("code".to_string(), Value::from(code));
    metadata
}

fn elapsed(since: Instant, now: Instant) -> Duration {
    now.saturating_duration_since(since)
}
