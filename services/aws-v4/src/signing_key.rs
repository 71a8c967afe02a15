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

use std::fmt::{Debug, Formatter};

use connsign_core::hash::{hmac_sha256, to_hex};

use crate::constants::{AWS4_REQUEST, AWS4_SECRET_PREFIX};

/// SigningKey is the key scoped to one date, region and service.
///
/// It is raw binary and never treated as text. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey([u8; 32]);

impl SigningKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoded key, for comparing against published vectors.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

/// Derive the signing key through the HMAC chain:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date_stamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
pub fn generate_signing_key(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> SigningKey {
    let mut secret_key = Vec::with_capacity(AWS4_SECRET_PREFIX.len() + secret.len());
    secret_key.extend_from_slice(AWS4_SECRET_PREFIX.as_bytes());
    secret_key.extend_from_slice(secret.as_bytes());

    let sign_date = hmac_sha256(&secret_key, date_stamp.as_bytes());
    let sign_region = hmac_sha256(&sign_date, region.as_bytes());
    let sign_service = hmac_sha256(&sign_region, service.as_bytes());
    let sign_request = hmac_sha256(&sign_service, AWS4_REQUEST.as_bytes());

    SigningKey(sign_request)
}
