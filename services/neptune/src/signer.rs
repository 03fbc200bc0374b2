use crate::credential::Credential;
use crate::request::{SignedRequest, SigningRequest};
use crate::sign_request::RequestSigner;
use graphsign_core::{Context, Error, ProvideCredential, Result, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign requests with dynamically loaded
/// credentials.
///
/// It pairs a credential provider with the request signer and caches the
/// loaded credential: the cached set is revalidated on every call and
/// reloaded once it is no longer valid, so static environment credentials
/// are fetched once per process while expiring instance-metadata
/// credentials are re-fetched as they approach expiry.
#[derive(Clone, Debug)]
pub struct Signer {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    signer: RequestSigner,
    credential: Arc<Mutex<Option<Credential>>>,
}

impl Signer {
    /// Create a new signer.
    pub fn new(ctx: Context, provider: impl ProvideCredential<Credential = Credential>) -> Self {
        Self {
            ctx,
            provider: Arc::new(provider),
            signer: RequestSigner::new(),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Sign the request, loading credentials on demand.
    ///
    /// Fails with
    /// [`ErrorKind::CredentialsUnavailable`](graphsign_core::ErrorKind::CredentialsUnavailable)
    /// when no source can supply a complete credential set; there is no
    /// partial or fallback signing path.
    pub async fn sign(&self, req: &SigningRequest) -> Result<SignedRequest> {
        let cred = self.credential.lock().expect("lock poisoned").clone();
        let cred = if cred.is_valid() {
            cred
        } else {
            let loaded = self.provider.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = loaded.clone();
            loaded
        };

        let Some(cred) = cred else {
            return Err(Error::credentials_unavailable(
                "no credential source could supply a complete credential set",
            ));
        };

        self.signer.sign(req, &cred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::provide_credential::StaticCredentialProvider;
    use async_trait::async_trait;
    use http::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for CountingProvider {
        type Credential = Credential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Credential {
                access_key_id: "access_key_id".to_string(),
                secret_access_key: "secret_access_key".to_string(),
                session_token: None,
                region: "us-east-1".to_string(),
                expires_in: None,
            }))
        }
    }

    #[tokio::test]
    async fn test_sign_with_static_provider() {
        let signer = Signer::new(
            Context::new(),
            StaticCredentialProvider::new("access_key_id", "secret_access_key", "us-east-1"),
        );

        let req = SigningRequest::new(Method::GET, Action::Status, "localhost", 8182);
        let signed = signer.sign(&req).await.expect("must sign");

        assert_eq!(signed.url, "http://localhost:8182/status");
        assert!(signed.headers.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn test_valid_credential_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
            },
        );

        let req = SigningRequest::new(Method::GET, Action::Status, "localhost", 8182);
        signer.sign(&req).await.expect("must sign");
        signer.sign(&req).await.expect("must sign");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_credential_fails() {
        #[derive(Debug)]
        struct EmptyProvider;

        #[async_trait]
        impl ProvideCredential for EmptyProvider {
            type Credential = Credential;

            async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
                Ok(None)
            }
        }

        let signer = Signer::new(Context::new(), EmptyProvider);
        let req = SigningRequest::new(Method::GET, Action::Status, "localhost", 8182);

        let err = signer.sign(&req).await.expect_err("must fail");
        assert_eq!(
            err.kind(),
            graphsign_core::ErrorKind::CredentialsUnavailable
        );
    }
}
