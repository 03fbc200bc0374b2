use crate::constants::{AWS_EC2_METADATA_DISABLED, AWS_EC2_METADATA_SERVICE_ENDPOINT};
use crate::Credential;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::Method;
use graphsign_core::time::{now, parse_rfc3339, DateTime};
use graphsign_core::{Context, Error, ProvideCredential, Result};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

const DEFAULT_ENDPOINT: &str = "http://169.254.169.254";

/// IMDSv2CredentialProvider loads time-limited credentials from the EC2
/// instance metadata service (IMDSv2).
///
/// The credentials carry an expiration time; callers are expected to
/// re-fetch once a loaded set approaches expiry. The signing region is read
/// from the instance placement metadata.
#[derive(Debug, Clone)]
pub struct IMDSv2CredentialProvider {
    endpoint: Option<String>,
    token: Arc<Mutex<(String, DateTime)>>,
}

impl Default for IMDSv2CredentialProvider {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: Arc::new(Mutex::new((String::new(), DateTime::default()))),
        }
    }
}

impl IMDSv2CredentialProvider {
    /// Create a new `IMDSv2CredentialProvider` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint for the metadata service.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    fn get_endpoint(&self, ctx: &Context) -> String {
        // First check configured endpoint, then environment, then default.
        self.endpoint.clone().unwrap_or_else(|| {
            ctx.env_var(AWS_EC2_METADATA_SERVICE_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.into())
        })
    }

    async fn load_metadata_token(&self, ctx: &Context) -> Result<String> {
        {
            let (token, expires_in) = self.token.lock().expect("lock poisoned").clone();
            if expires_in > now() {
                return Ok(token);
            }
        }

        let endpoint = self.get_endpoint(ctx);
        let url = format!("{endpoint}/latest/api/token");
        let req = http::Request::builder()
            .uri(&url)
            .method(Method::PUT)
            .header(CONTENT_LENGTH, "0")
            // 21600s (6h) is the recommended session duration.
            .header("x-aws-ec2-metadata-token-ttl-seconds", "21600")
            .body(Bytes::new())
            .map_err(|e| {
                Error::unexpected("failed to build metadata token request")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;

        let resp = ctx.http_send_as_string(req).await.map_err(|e| {
            Error::credentials_unavailable("failed to connect to the instance metadata service")
                .with_source(e)
                .with_context(format!("endpoint: {endpoint}"))
                .set_retryable(true)
        })?;

        if resp.status() != http::StatusCode::OK {
            return Err(metadata_error("fetch_token", resp.status(), resp.body()));
        }
        let token = resp.into_body();
        // Refresh the cached token 10 minutes before the session expires.
        let expires_in = now() + chrono::TimeDelta::try_seconds(21600).expect("in bounds")
            - chrono::TimeDelta::try_seconds(600).expect("in bounds");

        {
            *self.token.lock().expect("lock poisoned") = (token.clone(), expires_in);
        }

        Ok(token)
    }

    async fn fetch_metadata(&self, ctx: &Context, token: &str, path: &str) -> Result<String> {
        let endpoint = self.get_endpoint(ctx);
        let url = format!("{endpoint}{path}");
        let req = http::Request::builder()
            .uri(&url)
            .method(Method::GET)
            .header("x-aws-ec2-metadata-token", token)
            .body(Bytes::new())
            .map_err(|e| {
                Error::unexpected("failed to build metadata request")
                    .with_source(e)
                    .with_context(format!("url: {url}"))
            })?;

        let resp = ctx.http_send_as_string(req).await.map_err(|e| {
            Error::credentials_unavailable("failed to query the instance metadata service")
                .with_source(e)
                .with_context(format!("url: {url}"))
                .set_retryable(true)
        })?;

        if resp.status() != http::StatusCode::OK {
            return Err(metadata_error(path, resp.status(), resp.body()));
        }

        Ok(resp.into_body())
    }
}

#[async_trait]
impl ProvideCredential for IMDSv2CredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        // Check if disabled via environment.
        let disabled = ctx
            .env_var(AWS_EC2_METADATA_DISABLED)
            .map(|v| v == "true")
            .unwrap_or(false);

        if disabled {
            return Ok(None);
        }

        let token = self.load_metadata_token(ctx).await?;

        // List the instance profiles attached to this instance.
        let profile_name = self
            .fetch_metadata(ctx, &token, "/latest/meta-data/iam/security-credentials/")
            .await?;

        if profile_name.is_empty() {
            return Err(Error::credentials_unavailable(
                "no IAM role is attached to this instance",
            ));
        }

        // Fetch the credential document for that profile.
        let content = self
            .fetch_metadata(
                ctx,
                &token,
                &format!("/latest/meta-data/iam/security-credentials/{profile_name}"),
            )
            .await?;

        let resp: InstanceProfileCredentials = serde_json::from_str(&content).map_err(|e| {
            Error::credentials_unavailable("failed to parse the metadata credential document")
                .with_source(e)
                .with_context(format!("profile: {profile_name}"))
        })?;

        if resp.code != "Success" {
            return Err(Error::credentials_unavailable(format!(
                "instance metadata service returned an error: [{}] {}",
                resp.code, resp.message
            ))
            .with_context(format!("profile: {profile_name}")));
        }

        // The signing region comes from the instance placement.
        let region = self
            .fetch_metadata(ctx, &token, "/latest/meta-data/placement/region")
            .await?;

        let cred = Credential {
            access_key_id: resp.access_key_id,
            secret_access_key: resp.secret_access_key,
            session_token: Some(resp.token),
            region,
            expires_in: Some(parse_rfc3339(&resp.expiration).map_err(|e| {
                Error::credentials_unavailable("failed to parse the credential expiration time")
                    .with_source(e)
                    .with_context(format!("expiration_value: {}", resp.expiration))
            })?),
        };

        Ok(Some(cred))
    }
}

fn metadata_error(operation: &str, status: http::StatusCode, body: &str) -> Error {
    Error::credentials_unavailable(format!(
        "instance metadata service replied with status {status}"
    ))
    .with_context(format!("operation: {operation}"))
    .with_context(format!(
        "response: {}",
        body.chars().take(128).collect::<String>()
    ))
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct InstanceProfileCredentials {
    access_key_id: String,
    secret_access_key: String,
    token: String,
    expiration: String,

    code: String,
    message: String,
}
