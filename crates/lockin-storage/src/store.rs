#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use lockin_core::DeviceIdentity;

/// Durable home of the device identity token.
///
/// `save` must not return until the token is durable; a failed save must
/// leave the previously stored token intact.
pub trait CredentialStore: Send {
    /// Read the stored identity, [`DeviceIdentity::unpaired`] if none was ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    async fn load(&self) -> StorageResult<DeviceIdentity>;

    /// Replace the stored identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not complete.
    async fn save(&self, identity: &DeviceIdentity) -> StorageResult<()>;
}
