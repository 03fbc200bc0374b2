use crate::Credential;
use async_trait::async_trait;
use graphsign_core::{Context, ProvideCredential, Result};
use std::fmt::{self, Debug};

/// A chain of credential providers that will be tried in order.
///
/// The first provider that produces a credential wins. A provider that
/// fails is logged and skipped; the chain only fails by exhaustion, which
/// surfaces as `Ok(None)`.
pub struct ProvideCredentialChain {
    providers: Vec<Box<dyn ProvideCredential<Credential = Credential>>>,
}

impl ProvideCredentialChain {
    /// Create a new empty credential provider chain.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Add a credential provider to the chain.
    pub fn push(
        mut self,
        provider: impl ProvideCredential<Credential = Credential> + 'static,
    ) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl Default for ProvideCredentialChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ProvideCredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers_count", &self.providers.len())
            .finish()
    }
}

#[async_trait]
impl ProvideCredential for ProvideCredentialChain {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            log::debug!("trying credential provider: {:?}", provider);

            match provider.provide_credential(ctx).await {
                Ok(Some(cred)) => {
                    log::debug!("loaded credential from provider: {:?}", provider);
                    return Ok(Some(cred));
                }
                Ok(None) => {
                    log::debug!("no credential found in provider: {:?}", provider);
                    continue;
                }
                Err(e) => {
                    log::warn!("credential provider {:?} failed: {:?}", provider, e);
                    // Continue to next provider on error.
                    continue;
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MockSuccessProvider {
        access_key: String,
        secret_key: String,
    }

    #[async_trait]
    impl ProvideCredential for MockSuccessProvider {
        type Credential = Credential;

        async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
            Ok(Some(Credential {
                access_key_id: self.access_key.clone(),
                secret_access_key: self.secret_key.clone(),
                session_token: None,
                region: "us-east-1".to_string(),
                expires_in: None,
            }))
        }
    }

    #[derive(Debug)]
    struct MockFailProvider;

    #[async_trait]
    impl ProvideCredential for MockFailProvider {
        type Credential = Credential;

        async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
            Err(graphsign_core::Error::credentials_unavailable(
                "mock provider failed",
            ))
        }
    }

    #[derive(Debug)]
    struct MockEmptyProvider;

    #[async_trait]
    impl ProvideCredential for MockEmptyProvider {
        type Credential = Credential;

        async fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_chain_returns_first_success() {
        let ctx = Context::new();

        let chain = ProvideCredentialChain::new()
            .push(MockFailProvider)
            .push(MockEmptyProvider)
            .push(MockSuccessProvider {
                access_key: "test_key".to_string(),
                secret_key: "test_secret".to_string(),
            })
            .push(MockSuccessProvider {
                access_key: "should_not_be_used".to_string(),
                secret_key: "should_not_be_used".to_string(),
            });

        let result = chain.provide_credential(&ctx).await.unwrap();
        let cred = result.expect("must load");
        assert_eq!(cred.access_key_id, "test_key");
        assert_eq!(cred.secret_access_key, "test_secret");
    }

    #[tokio::test]
    async fn test_chain_returns_none_when_all_fail() {
        let ctx = Context::new();

        let chain = ProvideCredentialChain::new()
            .push(MockFailProvider)
            .push(MockEmptyProvider)
            .push(MockFailProvider);

        let result = chain.provide_credential(&ctx).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_chain_returns_none() {
        let ctx = Context::new();

        let chain = ProvideCredentialChain::new();

        let result = chain.provide_credential(&ctx).await.unwrap();
        assert!(result.is_none());
    }
}
