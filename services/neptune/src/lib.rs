//! AWS SigV4 request signing for graph database endpoints.
//!
//! This crate turns a logical database request — an HTTP method, an action
//! like `gremlin` or `sparql`, a query payload and a host — into a
//! canonical, deterministically signed request descriptor
//! (`{url, headers, params}`) that an HTTP or WebSocket dispatcher can send
//! as-is. The signature is indistinguishable from one produced by an
//! official SDK: byte-exact canonicalization, the 4-stage HMAC-SHA256 key
//! derivation chain and the `neptune-db` credential scope.
//!
//! ## Example
//!
//! Signing with explicit credentials:
//!
//! ```no_run
//! use graphsign_neptune::make_signed_request;
//! use std::collections::HashMap;
//!
//! # fn main() -> graphsign_core::Result<()> {
//! let signed = make_signed_request(
//!     "get",
//!     "status",
//!     serde_json::Value::Null,
//!     "db.example.com",
//!     8182,
//!     "AKIAEXAMPLE",
//!     "secret",
//!     "us-east-1",
//!     true,
//!     "",
//!     HashMap::new(),
//! )?;
//!
//! println!("{}: {:?}", signed.url, signed.headers);
//! # Ok(())
//! # }
//! ```
//!
//! Signing with dynamically loaded credentials:
//!
//! ```no_run
//! use graphsign_core::{Context, OsEnv};
//! use graphsign_http_send_reqwest::ReqwestHttpSend;
//! use graphsign_neptune::{Action, DefaultCredentialProvider, Signer, SigningRequest};
//! use http::Method;
//!
//! # async fn example() -> graphsign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_env(OsEnv)
//!     .with_http_send(ReqwestHttpSend::default());
//! let signer = Signer::new(ctx, DefaultCredentialProvider::new());
//!
//! let req = SigningRequest::new(Method::GET, Action::Status, "db.example.com", 8182)
//!     .with_tls(true);
//! let signed = signer.sign(&req).await?;
//! # Ok(())
//! # }
//! ```

mod action;
pub use action::Action;

mod canonical;

mod constants;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::CredentialMode;
pub use provide_credential::DefaultCredentialProvider;
pub use provide_credential::EnvCredentialProvider;
pub use provide_credential::IMDSv2CredentialProvider;
pub use provide_credential::ProvideCredentialChain;
pub use provide_credential::StaticCredentialProvider;

mod request;
pub use request::parse_method;
pub use request::SignedRequest;
pub use request::SigningRequest;

mod sign_request;
pub use sign_request::make_signed_request;
pub use sign_request::RequestSigner;

mod signer;
pub use signer::Signer;
