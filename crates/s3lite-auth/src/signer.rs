//! SigV2 string-to-sign construction and signing.
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +
//!                Content-Type + "\n" +
//!                Date + "\n" +
//!                CanonicalizedAmzHeaders +
//!                CanonicalizedResource
//! ```
//!
//! The `Date` line carries `x-amz-date` when the request has one, and the
//! `Date` header otherwise. `x-amz-date` is also signed as part of the
//! canonicalized `x-amz-*` headers.
//!
//! Header values are signed as their UTF-8 text. A value that is not valid
//! UTF-8 fails the request with [`AuthError::InvalidSecurity`].

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use http::{HeaderMap, HeaderValue};
use sha1::Sha1;

use crate::addressing::{ResourcePath, resolve_resource};
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Build the string to sign for a request addressing `resource`.
pub fn string_to_sign(
    parts: &http::request::Parts,
    resource: &ResourcePath,
) -> Result<String, AuthError> {
    let headers = &parts.headers;
    let method = parts.method.as_str();
    let content_md5 = header_text(headers, "content-md5")?.unwrap_or_default();
    let content_type = header_text(headers, "content-type")?.unwrap_or_default();
    let date = match header_text(headers, "x-amz-date")? {
        Some(amz_date) => amz_date,
        None => header_text(headers, "date")?.unwrap_or_default(),
    };

    let amz_headers = canonicalized_amz_headers(headers)?;
    let resource = resource.canonical_resource(has_acl_subresource(parts.uri.query()));

    Ok(format!(
        "{method}\n{content_md5}\n{content_type}\n{date}\n{amz_headers}{resource}"
    ))
}

/// Build the CanonicalizedAmzHeaders string.
///
/// Every `x-amz-*` header, sorted by lowercase name, values of repeated
/// headers joined with `,`, each rendered as `name:value\n`.
pub fn canonicalized_amz_headers(headers: &HeaderMap) -> Result<String, AuthError> {
    let mut amz_headers: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (name, value) in headers {
        let name = name.as_str();
        if name.starts_with("x-amz-") {
            let value = utf8_value(name, value)?.trim();
            amz_headers.entry(name).or_default().push(value);
        }
    }

    let mut result = String::new();
    for (name, values) in &amz_headers {
        result.push_str(name);
        result.push(':');
        result.push_str(&values.join(","));
        result.push('\n');
    }
    Ok(result)
}

/// Whether the query string selects the `acl` sub-resource.
#[must_use]
pub fn has_acl_subresource(query: Option<&str>) -> bool {
    query.is_some_and(|q| {
        q.split('&')
            .any(|param| param.split_once('=').map_or(param, |(k, _)| k) == "acl")
    })
}

/// Compute `Base64(HMAC-SHA1(secret, string_to_sign))`.
///
/// # Examples
///
/// ```
/// use s3lite_auth::sign;
///
/// // Example from the S3 developer guide.
/// let string_to_sign = "GET\n\n\nTue, 27 Mar 2007 19:36:42 +0000\n/johnsmith/photos/puppy.jpg";
/// let signature = sign("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY", string_to_sign).unwrap();
/// assert_eq!(signature, "bWq2s1WEIj+Ydj0vQ697zp+IXMU=");
/// ```
pub fn sign(secret: &str, string_to_sign: &str) -> Result<String, AuthError> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::Signing(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Format an `Authorization` header value.
#[must_use]
pub fn authorization_header(access_key_id: &str, signature: &str) -> String {
    format!("AWS {access_key_id}:{signature}")
}

/// Signs outgoing requests on behalf of one access key.
///
/// Used by clients and tests to produce requests the
/// [`Authenticator`](crate::Authenticator) accepts.
pub struct RequestSigner {
    access_key_id: String,
    secret: String,
    base_host: String,
}

impl RequestSigner {
    /// Create a signer for `access_key_id` talking to `base_host`.
    pub fn new(
        access_key_id: impl Into<String>,
        secret: impl Into<String>,
        base_host: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret: secret.into(),
            base_host: base_host.into(),
        }
    }

    /// Compute the signature of `parts` without modifying them.
    pub fn signature(&self, parts: &http::request::Parts) -> Result<String, AuthError> {
        let host = header_text(&parts.headers, "host")?;
        let resource = resolve_resource(host, parts.uri.path(), &self.base_host);
        sign(&self.secret, &string_to_sign(parts, &resource)?)
    }

    /// Sign `parts`, setting its `Authorization` header.
    pub fn sign(&self, parts: &mut http::request::Parts) -> Result<(), AuthError> {
        let signature = self.signature(parts)?;
        let value = authorization_header(&self.access_key_id, &signature)
            .parse()
            .map_err(|e: http::header::InvalidHeaderValue| AuthError::Signing(e.to_string()))?;
        parts.headers.insert(http::header::AUTHORIZATION, value);
        Ok(())
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key_id", &self.access_key_id)
            .field("base_host", &self.base_host)
            .finish_non_exhaustive()
    }
}

/// The UTF-8 text of header `name`, or `None` when it is absent.
pub(crate) fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AuthError> {
    headers
        .get(name)
        .map(|value| utf8_value(name, value))
        .transpose()
}

fn utf8_value<'a>(name: &str, value: &'a HeaderValue) -> Result<&'a str, AuthError> {
    std::str::from_utf8(value.as_bytes())
        .map_err(|_| AuthError::InvalidSecurity(format!("header {name} is not valid UTF-8")))
}
