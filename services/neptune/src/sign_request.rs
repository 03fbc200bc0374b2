use crate::canonical::{build_canonical_request, CanonicalRequest};
use crate::constants::{
    ALGORITHM, AUTHORIZATION, CONTENT_TYPE, CONTENT_TYPE_FORM_URLENCODED, SERVICE, SIGNED_HEADERS,
    X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::credential::Credential;
use crate::request::{parse_method, SignedRequest, SigningRequest};
use graphsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use graphsign_core::time::{now, DateTime};
use graphsign_core::Result;
use http::Method;
use log::debug;
use serde_json::Value;
use std::collections::HashMap;

/// RequestSigner that implements AWS SigV4 for the graph database service.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self { time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub(crate) fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign the request with the given credential.
    ///
    /// Produces a ready-to-send request descriptor; signing is pure given
    /// the request, the credential and the current wall-clock time.
    pub fn sign(&self, req: &SigningRequest, credential: &Credential) -> Result<SignedRequest> {
        let now = self.time.unwrap_or_else(now);
        sign_at(req, credential, now)
    }
}

pub(crate) fn sign_at(
    req: &SigningRequest,
    cred: &Credential,
    now: DateTime,
) -> Result<SignedRequest> {
    let creq = build_canonical_request(req, now)?;

    // Mixed-case region input must not affect the signature.
    let region = cred.region.to_lowercase();

    // Scope: "20220313/<region>/neptune-db/aws4_request"
    let scope = format!("{}/{}/{}/aws4_request", creq.date_stamp, region, SERVICE);
    debug!("calculated scope: {scope}");

    // StringToSign:
    //
    // AWS4-HMAC-SHA256
    // 20220313T072004Z
    // 20220313/<region>/neptune-db/aws4_request
    // <hashed_canonical_request>
    let string_to_sign = format!(
        "{ALGORITHM}\n{}\n{scope}\n{}",
        creq.amz_date,
        hex_sha256(creq.text.as_bytes())
    );
    debug!("calculated string to sign: {string_to_sign}");

    let signing_key = generate_signing_key(&cred.secret_access_key, &creq.date_stamp, &region);
    let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        cred.access_key_id
    );

    Ok(assemble(
        req,
        &creq,
        authorization,
        cred.session_token.as_deref(),
    ))
}

/// Combine the canonical request and the authorization header into the final
/// request descriptor.
fn assemble(
    req: &SigningRequest,
    creq: &CanonicalRequest,
    authorization: String,
    session_token: Option<&str>,
) -> SignedRequest {
    let mut headers = HashMap::new();
    if req.method == Method::POST {
        headers.insert(
            CONTENT_TYPE.to_string(),
            CONTENT_TYPE_FORM_URLENCODED.to_string(),
        );
    }
    headers.insert(X_AMZ_DATE.to_string(), creq.amz_date.clone());
    headers.insert(AUTHORIZATION.to_string(), authorization);

    // Caller supplied headers are applied after the base set; on conflict
    // the caller's value wins.
    for (name, value) in &req.extra_headers {
        headers.insert(name.clone(), value.clone());
    }

    if let Some(token) = session_token {
        if !token.is_empty() {
            headers.insert(X_AMZ_SECURITY_TOKEN.to_string(), token.to_string());
        }
    }

    let protocol = if req.use_tls { "https" } else { "http" };
    let url = format!(
        "{protocol}://{}:{}{}",
        req.host, req.port, creq.canonical_uri
    );

    SignedRequest {
        url,
        headers,
        params: creq.request_parameters.clone(),
    }
}

fn generate_signing_key(secret: &str, date_stamp: &str, region: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), SERVICE.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}

/// Build and sign a request in one call.
///
/// This is the synchronous entry point for callers that already hold a
/// complete credential set: it resolves the logical action, canonicalizes
/// the payload, signs with the current wall-clock time and returns the
/// `{url, headers, params}` descriptor. An empty `session_token` means no
/// token.
#[allow(clippy::too_many_arguments)]
pub fn make_signed_request(
    method: &str,
    action: &str,
    payload: Value,
    host: &str,
    port: u16,
    access_key: &str,
    secret_key: &str,
    region: &str,
    use_tls: bool,
    session_token: &str,
    extra_headers: HashMap<String, String>,
) -> Result<SignedRequest> {
    let req = SigningRequest {
        method: parse_method(method)?,
        action: action.parse()?,
        payload,
        host: host.to_string(),
        port,
        use_tls,
        extra_headers,
    };
    let cred = Credential {
        access_key_id: access_key.to_string(),
        secret_access_key: secret_key.to_string(),
        session_token: (!session_token.is_empty()).then(|| session_token.to_string()),
        region: region.to_string(),
        expires_in: None,
    };

    RequestSigner::new().sign(&req, &cred)
}
