use crate::Context;
use crate::Result;
use std::fmt::Debug;

/// SigningCredential is the trait used by signers as the signing key.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is still valid for signing.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used to load credentials from the environment.
///
/// Sources differ in how they obtain the credential set: some read process
/// environment variables, some perform a network round trip to a metadata
/// service. The contract is the same for all of them: produce a complete
/// credential set, or `None` when this source has nothing to offer.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: SigningCredential;

    /// Load credentials from the current environment.
    ///
    /// - Returns `Ok(Some(credential))` when a complete set was obtained.
    /// - Returns `Ok(None)` when this source is not configured.
    /// - Returns `Err(..)` when the source exists but failed to produce a
    ///   complete set (unreachable endpoint, malformed response, ...).
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}
