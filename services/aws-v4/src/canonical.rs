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

//! Canonical request construction.
//!
//! The canonical request is six fields joined by `\n`:
//!
//! ```text
//! <method>
//! <canonical uri>
//! <canonical query string>
//! <canonical headers, one "name:value\n" line each>
//! <signed headers>
//! <hex sha256 of payload>
//! ```
//!
//! Every sort in this module compares bytes. Rust's `str` ordering is
//! already byte-wise, so no locale-aware collation can sneak in; a
//! collated order would produce a canonical request the server rejects.

use std::fmt::Write;

use connsign_core::hash::hex_sha256;
use connsign_core::{Error, Result};
use http::header;
use http::HeaderMap;
use http::Method;
use percent_encoding::utf8_percent_encode;

use crate::constants::{AWS_QUERY_ENCODE_SET, EMPTY_STRING_SHA256};

/// CanonicalRequest holds the canonical form of one request.
///
/// It is consumed right away to compute its hash and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    value: String,
    signed_headers: String,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// `path` is used verbatim: it must already be percent-encoded the way
    /// the server expects. `headers` must already contain every header that
    /// will be signed.
    pub fn build(
        method: &Method,
        path: &str,
        query: &[(String, String)],
        headers: &HeaderMap,
        payload_hash: &str,
    ) -> Result<Self> {
        let (canonical_headers, signed_headers) = canonical_headers(headers)?;

        // 256 is specially chosen to avoid reallocation for most requests.
        let mut f = String::with_capacity(256);
        writeln!(f, "{method}")?;
        writeln!(f, "{}", if path.is_empty() { "/" } else { path })?;
        writeln!(f, "{}", canonical_query_string(query))?;
        // Every header line ends with '\n', which leaves the blank line
        // between the header block and the signed header list.
        writeln!(f, "{canonical_headers}")?;
        writeln!(f, "{signed_headers}")?;
        write!(f, "{payload_hash}")?;

        Ok(Self {
            value: f,
            signed_headers,
        })
    }

    /// The canonical request string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Lower-cased header names in signing order, joined by `;`.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Hex encoded SHA256 of the canonical request.
    pub fn hash(&self) -> String {
        hex_sha256(self.value.as_bytes())
    }
}

/// Hex encoded SHA256 of the payload.
///
/// An absent body hashes exactly like an empty one.
pub fn payload_hash(body: Option<&[u8]>) -> String {
    match body {
        None | Some([]) => EMPTY_STRING_SHA256.to_string(),
        Some(bs) => hex_sha256(bs),
    }
}

/// Build the canonical query string.
///
/// Keys and values are percent-encoded first, then pairs are sorted by
/// encoded key and encoded value.
pub fn canonical_query_string(query: &[(String, String)]) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical header block and the signed header list.
///
/// Returns `("name:value\n...", "name;...")`. Repeated headers are joined
/// by `,` in insertion order. `authorization` is never signed.
pub fn canonical_headers(headers: &HeaderMap) -> Result<(String, String)> {
    let mut lines = Vec::with_capacity(headers.keys_len());
    for name in headers.keys() {
        if name == header::AUTHORIZATION {
            continue;
        }

        let mut values = Vec::new();
        for value in headers.get_all(name) {
            let value = std::str::from_utf8(value.as_bytes()).map_err(|e| {
                Error::encoding_invalid(format!("header {name} is not valid utf-8"))
                    .with_source(e)
            })?;
            values.push(value.trim());
        }

        lines.push((name.as_str().to_ascii_lowercase(), values.join(",")));
    }
    lines.sort_unstable();

    let mut canonical = String::with_capacity(lines.len() * 32);
    for (name, value) in &lines {
        writeln!(canonical, "{name}:{value}")?;
    }
    let signed = lines
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    Ok((canonical, signed))
}
