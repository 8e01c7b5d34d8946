//! Access-control core of the Lockin smart lock.
//!
//! This crate decides, from a submitted code and the remote authority's
//! verdict, whether to release the bolt, and enforces the lockout policy
//! against repeated failures.
//!
//! # Components
//!
//! - [`LockMachine`]: `Locked`/`Unlocked` with a time-triggered relock
//! - [`LockoutState`]: attempt counter and penalty window
//! - [`AccessController`]: owns all device state and orchestrates the
//!   collaborators (remote authority, credential store, actuator, link)
//! - [`runner`]: the cooperative poll loop that feeds events and ticks to
//!   the controller one at a time
//!
//! # Example
//!
//! ```
//! use lockin_controller::AccessController;
//! use lockin_core::{ControllerConfig, DeviceIdentity, LockState, Outcome};
//! use lockin_hardware::mock::MockActuator;
//! use lockin_network::mock::{MockAuthority, MockLink, Verdict};
//! use lockin_storage::MemoryCredentialStore;
//! use tokio::time::Instant;
//!
//! # #[tokio::main]
//! # async fn main() -> lockin_core::Result<()> {
//! let (authority, _) = MockAuthority::new(Verdict::AcceptCodes(vec!["123456".into()]));
//! let (actuator, _) = MockActuator::new();
//! let (link, _) = MockLink::new();
//! let store = MemoryCredentialStore::with_identity(DeviceIdentity::new("sk_live_demo")?);
//!
//! let now = Instant::now();
//! let mut controller =
//!     AccessController::new(ControllerConfig::default(), authority, store, actuator, link, now)?;
//! controller.boot(now).await;
//!
//! assert_eq!(controller.submit_code("123456", now).await, Outcome::Unlocked);
//! assert_eq!(controller.lock_state(), LockState::Unlocked);
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod event;
pub mod lockout;
pub mod runner;
pub mod state_machine;
pub mod status;

pub use controller::{AccessController, TickReport};
pub use event::{EventReport, LockEvent};
pub use lockout::{FailureVerdict, LockoutPolicy, LockoutState};
pub use state_machine::{LockMachine, LockTransition, TransitionCause};
pub use status::StatusSnapshot;
