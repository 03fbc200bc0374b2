//! Core components for signing graph database API requests.
//!
//! This crate provides the foundational types and traits for the graphsign
//! ecosystem. It defines the abstractions that service crates build on:
//!
//! - **Context**: a container holding implementations for HTTP sending and
//!   environment access, used by credential providers
//! - **Traits**: abstract interfaces for credential loading
//!   ([`ProvideCredential`]) and credential validation ([`SigningCredential`])
//! - **Error**: the structured error type shared across the workspace
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use graphsign_core::{Context, ProvideCredential, Result, SigningCredential};
//!
//! // Define your credential type
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! // Implement a credential loader
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//! ```
//!
//! ## Utilities
//!
//! The crate also provides utility modules:
//!
//! - [`hash`]: cryptographic hashing utilities
//! - [`time`]: time formatting and parsing utilities
//! - [`utils`]: general utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod api;
pub use api::ProvideCredential;
pub use api::SigningCredential;
