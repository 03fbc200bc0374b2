// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{constants::*, Credential};
use async_trait::async_trait;
use graphsign_core::{Context, ProvideCredential, Result};
use log::debug;

/// EnvCredentialProvider loads credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AWS_ACCESS_KEY_ID`: the access key ID
/// - `AWS_SECRET_ACCESS_KEY`: the secret access key
/// - `AWS_SESSION_TOKEN`: the session token (optional)
/// - `AWS_REGION`, falling back to `AWS_DEFAULT_REGION`: the signing region
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let (Some(access_key_id), Some(secret_access_key)) =
            (envs.get(AWS_ACCESS_KEY_ID), envs.get(AWS_SECRET_ACCESS_KEY))
        else {
            return Ok(None);
        };

        let Some(region) = envs.get(AWS_REGION).or_else(|| envs.get(AWS_DEFAULT_REGION)) else {
            debug!("access keys found in environment but no region is set");
            return Ok(None);
        };

        Ok(Some(Credential {
            access_key_id: access_key_id.clone(),
            secret_access_key: secret_access_key.clone(),
            session_token: envs.get(AWS_SESSION_TOKEN).cloned(),
            region: region.clone(),
            expires_in: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphsign_core::StaticEnv;
    use std::collections::HashMap;

    fn ctx_with_envs(envs: HashMap<String, String>) -> Context {
        Context::new().with_env(StaticEnv { envs })
    }

    #[tokio::test]
    async fn test_env_credential_provider() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(HashMap::from([
            (AWS_ACCESS_KEY_ID.to_string(), "test_access_key".to_string()),
            (
                AWS_SECRET_ACCESS_KEY.to_string(),
                "test_secret_key".to_string(),
            ),
            (AWS_REGION.to_string(), "us-east-1".to_string()),
        ]));

        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await?.expect("must load");
        assert_eq!(cred.access_key_id, "test_access_key");
        assert_eq!(cred.secret_access_key, "test_secret_key");
        assert_eq!(cred.region, "us-east-1");
        assert!(cred.session_token.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_with_session_token() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(HashMap::from([
            (AWS_ACCESS_KEY_ID.to_string(), "test_access_key".to_string()),
            (
                AWS_SECRET_ACCESS_KEY.to_string(),
                "test_secret_key".to_string(),
            ),
            (
                AWS_SESSION_TOKEN.to_string(),
                "test_session_token".to_string(),
            ),
            (AWS_DEFAULT_REGION.to_string(), "eu-central-1".to_string()),
        ]));

        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await?.expect("must load");
        assert_eq!(cred.session_token, Some("test_session_token".to_string()));
        assert_eq!(cred.region, "eu-central-1");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_prefers_aws_region() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(HashMap::from([
            (AWS_ACCESS_KEY_ID.to_string(), "test_access_key".to_string()),
            (
                AWS_SECRET_ACCESS_KEY.to_string(),
                "test_secret_key".to_string(),
            ),
            (AWS_REGION.to_string(), "us-east-1".to_string()),
            (AWS_DEFAULT_REGION.to_string(), "eu-central-1".to_string()),
        ]));

        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await?.expect("must load");
        assert_eq!(cred.region, "us-east-1");

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_missing_credentials() -> anyhow::Result<()> {
        let ctx = ctx_with_envs(HashMap::new());

        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_env_credential_provider_incomplete_credentials() -> anyhow::Result<()> {
        // Keys without a region are not a complete credential set.
        let ctx = ctx_with_envs(HashMap::from([
            (AWS_ACCESS_KEY_ID.to_string(), "test_access_key".to_string()),
            (
                AWS_SECRET_ACCESS_KEY.to_string(),
                "test_secret_key".to_string(),
            ),
        ]));

        let provider = EnvCredentialProvider::new();
        let cred = provider.provide_credential(&ctx).await?;
        assert!(cred.is_none());

        Ok(())
    }
}
