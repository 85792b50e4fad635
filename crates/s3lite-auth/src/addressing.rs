//! Bucket and key resolution.
//!
//! A request names its bucket in one of three ways, decided by comparing the
//! `Host` header with the configured base host (case-insensitively, ignoring
//! the port when the base host has none):
//!
//! 1. no `Host`, or `Host` equal to the base host: path style, the bucket is
//!    the first path segment and the key is the rest;
//! 2. `Host` ending in `.<base host>`: virtual-hosted style, the bucket is the
//!    leading label(s) and the key is the whole path;
//! 3. any other `Host`: the whole host names the bucket (CNAME style) and the
//!    key is the whole path.
//!
//! Bucket names taken from the host keep the case they were sent with.

use percent_encoding::percent_decode_str;

/// The bucket and key a request addresses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourcePath {
    bucket: Option<String>,
    key: Option<String>,
    raw_remainder: String,
}

impl ResourcePath {
    /// The addressed bucket, if any.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The decoded object key, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The still-encoded part of the path that follows the bucket.
    #[must_use]
    pub fn raw_remainder(&self) -> &str {
        &self.raw_remainder
    }

    /// The canonicalized resource of the SigV2 string to sign:
    /// `/` + bucket + undecoded remainder, plus `?acl` for the ACL sub-resource.
    #[must_use]
    pub fn canonical_resource(&self, acl: bool) -> String {
        let mut resource = String::with_capacity(1 + self.raw_remainder.len() + 16);
        resource.push('/');
        if let Some(bucket) = &self.bucket {
            resource.push_str(bucket);
        }
        resource.push_str(&self.raw_remainder);
        if acl {
            resource.push_str("?acl");
        }
        resource
    }
}

/// Resolve the bucket and key addressed by a request.
///
/// `raw_path` is the request path as received, still percent-encoded.
///
/// # Examples
///
/// ```
/// use s3lite_auth::resolve_resource;
///
/// let path_style = resolve_resource(Some("s3.example.com"), "/photos/2006/jan.jpg", "s3.example.com");
/// assert_eq!(path_style.bucket(), Some("photos"));
/// assert_eq!(path_style.key(), Some("2006/jan.jpg"));
///
/// let virtual_host = resolve_resource(Some("photos.s3.example.com"), "/2006/jan.jpg", "s3.example.com");
/// assert_eq!(virtual_host.bucket(), Some("photos"));
/// assert_eq!(virtual_host.canonical_resource(false), "/photos/2006/jan.jpg");
/// ```
#[must_use]
pub fn resolve_resource(host: Option<&str>, raw_path: &str, base_host: &str) -> ResourcePath {
    let Some(host) = host.map(|h| strip_port(h.trim(), base_host)) else {
        return path_style(raw_path);
    };
    if host.eq_ignore_ascii_case(base_host) {
        return path_style(raw_path);
    }

    let bucket = virtual_host_bucket(host, base_host).unwrap_or(host);
    host_style(bucket.to_owned(), raw_path)
}

/// The leading label(s) of `host` when it ends in `.<base_host>`, ignoring case.
fn virtual_host_bucket<'a>(host: &'a str, base_host: &str) -> Option<&'a str> {
    let split = host.len().checked_sub(base_host.len() + 1)?;
    if !host.is_char_boundary(split) {
        return None;
    }
    let (prefix, suffix) = host.split_at(split);
    let domain = suffix.strip_prefix('.')?;
    (domain.eq_ignore_ascii_case(base_host) && !prefix.is_empty()).then_some(prefix)
}

/// Drop the port of `host` unless the base host carries one.
fn strip_port<'a>(host: &'a str, base_host: &str) -> &'a str {
    if base_host.contains(':') {
        return host;
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

fn path_style(raw_path: &str) -> ResourcePath {
    let trimmed = raw_path.strip_prefix('/').unwrap_or(raw_path);
    if trimmed.is_empty() {
        return ResourcePath::default();
    }

    let (bucket, remainder) = match trimmed.find('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
        None => (trimmed, ""),
    };

    ResourcePath {
        bucket: Some(decode_uri_component(bucket)),
        key: key_from(remainder),
        raw_remainder: remainder.to_owned(),
    }
}

fn host_style(bucket: String, raw_path: &str) -> ResourcePath {
    ResourcePath {
        bucket: Some(bucket),
        key: key_from(raw_path),
        raw_remainder: raw_path.to_owned(),
    }
}

/// The decoded key for a remainder such as `/a%20b`, or `None` for `""` and `"/"`.
fn key_from(remainder: &str) -> Option<String> {
    let key = remainder.strip_prefix('/').unwrap_or(remainder);
    (!key.is_empty()).then(|| decode_uri_component(key))
}

fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}
