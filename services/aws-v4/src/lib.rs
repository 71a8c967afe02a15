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

//! AWS SigV4 request signing.
//!
//! The signing pipeline is split into small pure steps, each usable on its
//! own:
//!
//! - [`canonical`]: build the canonical request and its SHA-256 hash
//! - [`generate_signing_key`]: derive the scoped [`SigningKey`]
//! - [`signature`]: credential scope, string to sign, signature and the
//!   `Authorization` value
//! - [`sign`]: run the whole pipeline and return [`SignedHeaders`]
//!
//! [`RequestSigner`] plugs [`sign`] into [`connsign_core::Signer`] together
//! with one of the credential providers.
//!
//! ## Example
//!
//! ```no_run
//! use connsign_aws_v4::{Config, DefaultCredentialProvider, RequestSigner};
//! use connsign_core::{Context, OsEnv, Result, Signer};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let cfg = Config {
//!     service: Some("s3".to_string()),
//!     ..Default::default()
//! }
//! .from_env(&ctx);
//!
//! let builder = RequestSigner::from_config(&cfg)?;
//! let loader = DefaultCredentialProvider::new(Arc::new(cfg));
//! let signer = Signer::new(ctx, loader, builder);
//!
//! let (mut parts, _) = http::Request::get("https://examplebucket.s3.amazonaws.com/test.txt")
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//! signer.sign(&mut parts, None)?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

pub mod canonical;
pub use canonical::CanonicalRequest;

mod signing_key;
pub use signing_key::generate_signing_key;
pub use signing_key::SigningKey;

pub mod signature;
pub use signature::Timestamp;

mod sign_request;
pub use sign_request::sign;
pub use sign_request::RequestSigner;
pub use sign_request::SignedHeaders;

mod provide_credential;
pub use provide_credential::*;
