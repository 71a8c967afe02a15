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

use crate::canonical::{payload_hash, CanonicalRequest};
use crate::constants::{X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};
use crate::signature::{
    authorization_header, calculate_signature, credential_scope, string_to_sign, Timestamp,
};
use crate::{generate_signing_key, Config, Credential};
use connsign_core::time::{now, DateTime};
use connsign_core::{Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::uri::Scheme;
use http::{header, HeaderMap, HeaderValue};
use log::debug;

/// SignedHeaders is the header set produced by signing one request.
///
/// It always holds `host`, `x-amz-date`, `x-amz-content-sha256` and
/// `authorization`, plus `x-amz-security-token` when the credential carries
/// a session token.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    headers: HeaderMap,
    signature: String,
    signed_headers: String,
    credential_scope: String,
}

impl SignedHeaders {
    /// The headers to merge into the outgoing request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The hex encoded signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The `;` joined list of signed header names.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// The credential scope the signature is bound to.
    pub fn credential_scope(&self) -> &str {
        &self.credential_scope
    }

    /// Merge into `headers`, replacing any value the caller set for the same names.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        for (name, value) in self.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
    }

    /// Take the header map out.
    pub fn into_header_map(self) -> HeaderMap {
        self.headers
    }
}

/// Sign a request with AWS SigV4 and return the headers to send along with it.
///
/// This is a pure function: the same request, body, scope, credential and
/// `now` always give the same result. `req` is only read.
///
/// `req.path` is used verbatim, so it must already be percent-encoded the
/// way the server expects.
pub fn sign(
    req: &SigningRequest,
    body: Option<&[u8]>,
    service: &str,
    region: &str,
    cred: &Credential,
    now: DateTime,
) -> Result<SignedHeaders> {
    cred.check()?;
    if service.is_empty() {
        return Err(Error::config_invalid("service is empty"));
    }
    if region.is_empty() {
        return Err(Error::config_invalid("region is empty"));
    }

    let ts = Timestamp::from(now);
    let payload = payload_hash(body);

    let mut signed = HeaderMap::with_capacity(5);
    signed.insert(header::HOST, host_header(req)?);
    signed.insert(X_AMZ_DATE, HeaderValue::from_str(ts.amz_date())?);
    signed.insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&payload)?);
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token).map_err(|e| {
            Error::encoding_invalid("session token is not a valid header value").with_source(e)
        })?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);
        signed.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    // Synthesized headers replace whatever the caller set for the same names.
    let mut headers = req.headers.clone();
    for (name, value) in signed.iter() {
        headers.insert(name.clone(), value.clone());
    }

    let creq = CanonicalRequest::build(&req.method, &req.path, &req.query, &headers, &payload)?;
    let creq_hash = creq.hash();
    debug!(
        "calculated canonical request hash: {creq_hash}, signed headers: {}",
        creq.signed_headers()
    );

    // Scope: "20220313/<region>/<service>/aws4_request"
    let scope = credential_scope(ts.date_stamp(), region, service);
    debug!("calculated scope: {scope}");

    let string_to_sign = string_to_sign(ts.amz_date(), &scope, &creq_hash)?;
    debug!("calculated string to sign: {string_to_sign}");

    let signing_key =
        generate_signing_key(&cred.secret_access_key, ts.date_stamp(), region, service);
    let signature = calculate_signature(&signing_key, &string_to_sign);

    let mut authorization = HeaderValue::from_str(&authorization_header(
        &cred.access_key_id,
        &scope,
        creq.signed_headers(),
        &signature,
    ))?;
    authorization.set_sensitive(true);
    signed.insert(header::AUTHORIZATION, authorization);

    Ok(SignedHeaders {
        headers: signed,
        signature,
        signed_headers: creq.signed_headers().to_string(),
        credential_scope: scope,
    })
}

/// Host header value: the authority without userinfo, and without the port
/// when it is the scheme's default because http clients omit it on the wire.
fn host_header(req: &SigningRequest) -> Result<HeaderValue> {
    let host = req.authority.host();
    let value = match req.authority.port_u16() {
        Some(80) if req.scheme == Scheme::HTTP => host.to_string(),
        Some(443) if req.scheme == Scheme::HTTPS => host.to_string(),
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Ok(HeaderValue::from_str(&value)?)
}

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for AWS V4 signer.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
        }
    }

    /// Create a signer from config, which must carry both service and region.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let service = cfg
            .service
            .as_deref()
            .ok_or_else(|| Error::config_invalid("service is required"))?;
        let region = cfg
            .region
            .as_deref()
            .ok_or_else(|| Error::config_invalid("region is required"))?;

        Ok(Self::new(service, region))
    }

    /// Specify the signing time.
    ///
    /// Without it, every call signs with the current time.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: &mut Parts,
        body: Option<&[u8]>,
        credential: &Self::Credential,
    ) -> Result<()> {
        let now = self.time.unwrap_or_else(now);
        let mut signing_req = SigningRequest::build(req)?;

        let result = sign(
            &signing_req,
            body,
            &self.service,
            &self.region,
            credential,
            now,
        );
        if let Ok(signed) = &result {
            signed.apply_to(&mut signing_req.headers);
        }

        // Apply to the request, the parts are restored even if signing failed.
        signing_req.apply(req)?;
        result.map(|_| ())
    }
}
