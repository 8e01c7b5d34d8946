//! Shared fixtures for controller integration tests.
//!
//! A [`Rig`] is a booted controller wired to mock collaborators, plus the
//! handles needed to script them and inspect what the controller did. Tests
//! run on tokio's paused clock; `t0` is the boot instant.

#![allow(dead_code)]

use lockin_controller::AccessController;
use lockin_core::{ControllerConfig, DeviceIdentity};
use lockin_hardware::mock::{MockActuator, MockActuatorHandle};
use lockin_network::mock::{MockAuthority, MockAuthorityHandle, MockLink, MockLinkHandle, Verdict};
use lockin_storage::MemoryCredentialStore;
use std::time::Duration;
use tokio::time::Instant;

pub const TOKEN: &str = "T1";
pub const GOOD_CODE: &str = "123456";
pub const BAD_CODE: &str = "000000";

pub type TestController =
    AccessController<MockAuthority, MemoryCredentialStore, MockActuator, MockLink>;

pub struct Rig {
    pub controller: TestController,
    pub authority: MockAuthorityHandle,
    pub actuator: MockActuatorHandle,
    pub link: MockLinkHandle,
    pub store: MemoryCredentialStore,
    pub t0: Instant,
}

impl Rig {
    pub fn at(&self, secs: u64) -> Instant {
        self.t0 + Duration::from_secs(secs)
    }

    pub fn at_ms(&self, ms: u64) -> Instant {
        self.t0 + Duration::from_millis(ms)
    }
}

/// Three attempts, 900 s penalty, otherwise defaults.
pub fn test_config() -> ControllerConfig {
    ControllerConfig::default()
        .with_max_attempts(3)
        .with_lockout_secs(900)
}

/// Booted, paired with [`TOKEN`], online, accepting only [`GOOD_CODE`].
pub async fn paired_rig(config: ControllerConfig) -> Rig {
    let store = MemoryCredentialStore::with_identity(DeviceIdentity::new(TOKEN).unwrap());
    rig_with_store(config, store).await
}

/// Booted and online, but never paired.
pub async fn unpaired_rig(config: ControllerConfig) -> Rig {
    rig_with_store(config, MemoryCredentialStore::new()).await
}

pub async fn rig_with_store(config: ControllerConfig, store: MemoryCredentialStore) -> Rig {
    let (authority, authority_handle) =
        MockAuthority::new(Verdict::AcceptCodes(vec![GOOD_CODE.to_string()]));
    let (actuator, actuator_handle) = MockActuator::new();
    let (link, link_handle) = MockLink::new();
    let t0 = Instant::now();

    let mut controller =
        AccessController::new(config, authority, store.clone(), actuator, link, t0).unwrap();
    controller.boot(t0).await;
    actuator_handle.clear();

    Rig {
        controller,
        authority: authority_handle,
        actuator: actuator_handle,
        link: link_handle,
        store,
        t0,
    }
}
