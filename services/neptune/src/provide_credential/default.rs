use crate::provide_credential::{
    EnvCredentialProvider, IMDSv2CredentialProvider, ProvideCredentialChain,
};
use crate::Credential;
use async_trait::async_trait;
use graphsign_core::{Context, ProvideCredential, Result};

/// The credential source a provider is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// Static credentials from process environment variables.
    Environment,
    /// Dynamic, time-limited credentials from the EC2 instance metadata
    /// service.
    InstanceMetadata,
}

/// DefaultCredentialProvider is a loader that will try to load credentials
/// via the default chain.
///
/// Resolution order:
///
/// 1. Environment variables
/// 2. EC2 IMDSv2
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(IMDSv2CredentialProvider::new());

        Self { chain }
    }

    /// Restrict the provider to a single credential source.
    pub fn from_mode(mode: CredentialMode) -> Self {
        let chain = match mode {
            CredentialMode::Environment => {
                ProvideCredentialChain::new().push(EnvCredentialProvider::new())
            }
            CredentialMode::InstanceMetadata => {
                ProvideCredentialChain::new().push(IMDSv2CredentialProvider::new())
            }
        };

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{AWS_ACCESS_KEY_ID, AWS_REGION, AWS_SECRET_ACCESS_KEY};
    use graphsign_core::StaticEnv;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_default_provider_without_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        // No env and no reachable metadata service: the chain is exhausted.
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::new(),
        });

        let provider = DefaultCredentialProvider::new();
        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("load must succeed");
        assert!(cred.is_none());
    }

    #[tokio::test]
    async fn test_default_provider_with_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([
                (AWS_ACCESS_KEY_ID.to_string(), "access_key_id".to_string()),
                (
                    AWS_SECRET_ACCESS_KEY.to_string(),
                    "secret_access_key".to_string(),
                ),
                (AWS_REGION.to_string(), "us-east-1".to_string()),
            ]),
        });

        let provider = DefaultCredentialProvider::new();
        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("load must succeed")
            .expect("must load");
        assert_eq!("access_key_id", cred.access_key_id);
        assert_eq!("secret_access_key", cred.secret_access_key);
        assert_eq!("us-east-1", cred.region);
    }

    #[tokio::test]
    async fn test_environment_mode_skips_metadata() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::new(),
        });

        // Environment-only mode must not touch the metadata service even
        // though the environment is empty.
        let provider = DefaultCredentialProvider::from_mode(CredentialMode::Environment);
        let cred = provider
            .provide_credential(&ctx)
            .await
            .expect("load must succeed");
        assert!(cred.is_none());
    }
}
