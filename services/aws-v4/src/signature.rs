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

//! String to sign, signature and `Authorization` header value.

use std::fmt::Write;

use connsign_core::hash::hex_hmac_sha256;
use connsign_core::time::{format_date, format_iso8601, DateTime};
use connsign_core::Result;

use crate::constants::{AWS4_HMAC_SHA256, AWS4_REQUEST};
use crate::SigningKey;

/// Timestamp is the signing instant rendered the two ways signing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    amz_date: String,
    date_stamp: String,
}

impl Timestamp {
    /// The full timestamp: `20150830T123600Z`.
    pub fn amz_date(&self) -> &str {
        &self.amz_date
    }

    /// The date part: `20150830`.
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }
}

impl From<DateTime> for Timestamp {
    fn from(t: DateTime) -> Self {
        Self {
            amz_date: format_iso8601(t),
            date_stamp: format_date(t),
        }
    }
}

/// Credential scope: `20150830/us-east-1/s3/aws4_request`
pub fn credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{date_stamp}/{region}/{service}/{AWS4_REQUEST}")
}

/// Build the string to sign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20150830T123600Z
/// 20150830/us-east-1/s3/aws4_request
/// <hashed canonical request>
/// ```
pub fn string_to_sign(amz_date: &str, scope: &str, canonical_request_hash: &str) -> Result<String> {
    let mut f = String::with_capacity(
        AWS4_HMAC_SHA256.len() + amz_date.len() + scope.len() + canonical_request_hash.len() + 3,
    );
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{amz_date}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{canonical_request_hash}")?;

    Ok(f)
}

/// Hex encoded HMAC-SHA256 of the string to sign, always 64 lowercase chars.
pub fn calculate_signature(key: &SigningKey, string_to_sign: &str) -> String {
    hex_hmac_sha256(key.as_bytes(), string_to_sign.as_bytes())
}

/// Render the `Authorization` header value.
///
/// The server parses `Credential=`, `SignedHeaders=` and `Signature=` and the
/// `, ` separators literally.
pub fn authorization_header(
    access_key_id: &str,
    scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{AWS4_HMAC_SHA256} Credential={access_key_id}/{scope}, SignedHeaders={signed_headers}, Signature={signature}"
    )
}
