//! Remote authority and connectivity seams for Lockin.
//!
//! The access controller talks to exactly two network collaborators:
//!
//! - **[`RemoteAuthority`]**: validates codes, accepts heartbeats and audit
//!   events. Wire format and transport belong to the implementation.
//! - **[`NetworkLink`]**: the local link (Wi-Fi association, signal strength,
//!   MAC address).
//!
//! Every remote call the controller makes goes through [`Bounded`], which
//! caps it with a timeout so a stalled server can never freeze the lock.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use lockin_core::DeviceIdentity;
//! use lockin_network::{Bounded, RemoteAuthority};
//! use lockin_network::mock::{MockAuthority, Verdict};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (authority, handle) = MockAuthority::new(Verdict::AcceptCodes(vec!["123456".into()]));
//! let authority = Bounded::new(authority, Duration::from_secs(3));
//! let identity = DeviceIdentity::new("sk_live_demo")?;
//!
//! assert!(authority.validate(&identity, "123456").await?);
//! assert!(!authority.validate(&identity, "000000").await?);
//! assert_eq!(handle.validate_calls(), 2);
//! # Ok(())
//! # }
//! ```

mod bounded;
mod error;
pub mod mock;
mod traits;
mod types;

pub use bounded::{Bounded, bounded};
pub use error::{NetworkError, Result};
pub use traits::{NetworkLink, RemoteAuthority};
pub use types::{AuditEvent, EventMetadata, HeartbeatReport};
