//! Durable storage for the device identity token.
//!
//! The controller reads the identity once at boot and writes it only when the
//! device is paired. Anything implementing [`CredentialStore`] can back it:
//!
//! - [`SqliteCredentialStore`]: single-row SQLite table managed by sqlx
//!   migrations; survives power loss.
//! - [`MemoryCredentialStore`]: process-local store with failure injection,
//!   for tests.
//!
//! # Example
//!
//! ```no_run
//! use lockin_core::DeviceIdentity;
//! use lockin_storage::{CredentialStore, Database, DatabaseConfig, SqliteCredentialStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("lockin.db")).await?;
//! let store = SqliteCredentialStore::new(db.pool().clone());
//!
//! store.save(&DeviceIdentity::new("sk_live_abc")?).await?;
//! assert!(store.load().await?.is_paired());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod memory;
pub mod sqlite;
mod store;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;
pub use store::CredentialStore;
