//! End-to-end tests for the s3lite protocol components.
//!
//! [`TestService`] is a minimal in-memory orchestration layer: it
//! authenticates each request, authorizes it against bucket and object
//! policies, serves byte ranges and lists keys. The scenarios in the
//! `test_*` modules drive it with signed and anonymous requests.
//!
//! Run them with:
//! ```text
//! cargo test -p s3lite-integration
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read};
use std::sync::{Arc, Once};

use http::StatusCode;
use percent_encoding::percent_decode_str;
use s3lite_acl::{AccessControlPolicy, Grantee, Permission, check_resource_access, xml};
use s3lite_auth::{Authenticator, RequestSigner, StaticUserDirectory};
use s3lite_core::{CanonicalUser, S3Error, S3ErrorCode, S3LiteConfig};
use s3lite_list::{ListingPaginator, ListingQuery, ListingResult, MemoryKeySource, ObjectMetadata};
use s3lite_range::{RangeReader, resolve_range_header};
use tracing::debug;

static INIT: Once = Once::new();

/// Initialize tracing (once), falling back to `log_level` when `RUST_LOG` is unset.
fn init_tracing(log_level: &str) {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
            )
            .with_test_writer()
            .init();
    });
}

/// Base host the test service is reached at.
pub const BASE_HOST: &str = "s3.example.com";

/// A fixed request date used by signed requests.
pub const DATE: &str = "Tue, 27 Mar 2007 19:36:42 +0000";

/// Credentials of a registered test user.
#[derive(Debug, Clone)]
pub struct TestUser {
    /// Access key id.
    pub access_key_id: &'static str,
    /// Secret access key.
    pub secret: &'static str,
    /// Canonical identity.
    pub user: CanonicalUser,
}

impl TestUser {
    /// The user as a grantee.
    #[must_use]
    pub fn grantee(&self) -> Grantee {
        Grantee::from(self.user.clone())
    }

    /// Sign `parts` with this user's credentials.
    pub fn sign(&self, parts: &mut http::request::Parts) {
        RequestSigner::new(self.access_key_id, self.secret, BASE_HOST)
            .sign(parts)
            .unwrap_or_else(|e| panic!("sign request: {e}"));
    }
}

/// The bucket owner.
#[must_use]
pub fn alice() -> TestUser {
    TestUser {
        access_key_id: "AKIAALICE",
        secret: "alice-secret",
        user: CanonicalUser::with_display_name("alice-id", "alice"),
    }
}

/// Another registered user.
#[must_use]
pub fn bob() -> TestUser {
    TestUser {
        access_key_id: "AKIABOB",
        secret: "bob-secret",
        user: CanonicalUser::with_display_name("bob-id", "bob"),
    }
}

/// The user file registering [`alice`] and [`bob`].
pub const USER_FILE: &str = "\
# accessKeyId,secretAccessKey,canonicalId,displayName
AKIAALICE,alice-secret,alice-id,alice
AKIABOB,bob-secret,bob-id,bob
";

/// Build request parts for `method` and `uri` with the given headers.
#[must_use]
pub fn request(method: &str, uri: &str, headers: &[(&str, &str)]) -> http::request::Parts {
    let mut builder = http::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
        .body(())
        .unwrap_or_else(|e| panic!("build request {method} {uri}: {e}"))
        .into_parts()
        .0
}

/// A path-style request signed by `user`.
#[must_use]
pub fn signed(user: &TestUser, method: &str, uri: &str) -> http::request::Parts {
    let mut parts = request(method, uri, &[("host", BASE_HOST), ("date", DATE)]);
    user.sign(&mut parts);
    parts
}

/// An unsigned path-style request.
#[must_use]
pub fn anonymous(method: &str, uri: &str) -> http::request::Parts {
    request(method, uri, &[("host", BASE_HOST), ("date", DATE)])
}

struct StoredObject {
    body: Vec<u8>,
    acp: AccessControlPolicy,
}

struct Bucket {
    acp: AccessControlPolicy,
    keys: MemoryKeySource,
    objects: HashMap<String, StoredObject>,
}

/// A successful object read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectResponse {
    /// `200 OK` or `206 Partial Content`.
    pub status: StatusCode,
    /// `Content-Range` value of a partial response.
    pub content_range: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

/// In-memory S3 front end built from the s3lite components.
pub struct TestService {
    authenticator: Authenticator,
    paginator: ListingPaginator,
    buckets: BTreeMap<String, Bucket>,
    clock: u64,
}

impl std::fmt::Debug for TestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestService")
            .field("authenticator", &self.authenticator)
            .field("buckets", &self.buckets.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl TestService {
    /// A service with [`alice`] and [`bob`] registered and default settings.
    #[must_use]
    pub fn new() -> Self {
        let config = S3LiteConfig::builder()
            .base_host(BASE_HOST.to_owned())
            .log_level("warn".to_owned())
            .build();
        Self::with_config(&config)
    }

    /// A service configured by `config`.
    ///
    /// Users come from `config.user_file` when set, otherwise [`alice`] and
    /// [`bob`] are registered.
    #[must_use]
    pub fn with_config(config: &S3LiteConfig) -> Self {
        init_tracing(&config.log_level);
        let directory = match config.user_file {
            Some(_) => StaticUserDirectory::from_config(config),
            None => StaticUserDirectory::parse(USER_FILE),
        }
        .unwrap_or_else(|e| panic!("load users: {e}"));
        Self {
            authenticator: Authenticator::from_config(Arc::new(directory), config),
            paginator: ListingPaginator::from_config(config),
            buckets: BTreeMap::new(),
            clock: 1_175_024_202_000,
        }
    }

    /// `PUT /bucket`: create a bucket owned by the requestor.
    pub fn create_bucket(&mut self, parts: &http::request::Parts) -> Result<(), S3Error> {
        let request = self.authenticator.authenticate(parts)?;
        if request.requestor.is_anonymous() {
            return Err(S3Error::new(S3ErrorCode::AccessDenied));
        }
        let name = request
            .resource
            .bucket()
            .ok_or_else(|| S3Error::with_message(S3ErrorCode::InvalidRequest, "missing bucket"))?
            .to_owned();

        debug!(bucket = %name, owner = %request.requestor, "create bucket");
        self.buckets.insert(
            name,
            Bucket {
                acp: AccessControlPolicy::for_owner(request.requestor),
                keys: MemoryKeySource::new(),
                objects: HashMap::new(),
            },
        );
        Ok(())
    }

    /// `PUT /bucket/key`: store an object owned by the requestor.
    ///
    /// Requires `WRITE` on the bucket.
    pub fn put_object(
        &mut self,
        parts: &http::request::Parts,
        body: &[u8],
    ) -> Result<(), S3Error> {
        let request = self.authenticator.authenticate(parts)?;
        let (bucket_name, key) = object_path(&request.resource)?;
        let bucket = self
            .buckets
            .get_mut(&bucket_name)
            .ok_or_else(|| S3Error::no_such_bucket(&bucket_name))?;
        check_resource_access(
            Some(&bucket.acp),
            &Grantee::from(request.requestor.clone()),
            Permission::WRITE,
        )?;

        self.clock += 1_000;
        let metadata = ObjectMetadata {
            size: body.len() as u64,
            last_modified_millis: i64::try_from(self.clock).unwrap_or(i64::MAX),
            etag: format!("\"{:08x}\"", checksum(body)),
            owner: request.requestor.clone(),
        };
        bucket.keys.insert(key.clone(), metadata);
        bucket.objects.insert(
            key,
            StoredObject {
                body: body.to_vec(),
                acp: AccessControlPolicy::for_owner(request.requestor),
            },
        );
        Ok(())
    }

    /// `GET /bucket/key`, honoring a `Range` header.
    ///
    /// Requires `READ` on the object.
    pub fn get_object(&self, parts: &http::request::Parts) -> Result<ObjectResponse, S3Error> {
        let request = self.authenticator.authenticate(parts)?;
        let (bucket_name, key) = object_path(&request.resource)?;
        let object = self
            .buckets
            .get(&bucket_name)
            .ok_or_else(|| S3Error::no_such_bucket(&bucket_name))?
            .objects
            .get(&key)
            .ok_or_else(|| S3Error::no_such_key(&key))?;
        check_resource_access(
            Some(&object.acp),
            &Grantee::from(request.requestor),
            Permission::READ,
        )?;

        let total = object.body.len() as u64;
        let Some(range) = parts.headers.get(http::header::RANGE) else {
            return Ok(ObjectResponse {
                status: StatusCode::OK,
                content_range: None,
                body: object.body.clone(),
            });
        };

        let range = range
            .to_str()
            .map_err(|_| S3Error::with_message(S3ErrorCode::InvalidArgument, "invalid Range"))?;
        let range = resolve_range_header(range, total)?;
        let mut reader = RangeReader::new(Cursor::new(object.body.as_slice()), range)?;
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .map_err(|e| S3Error::internal_error(e.to_string()))?;

        Ok(ObjectResponse {
            status: StatusCode::PARTIAL_CONTENT,
            content_range: Some(range.content_range(total)),
            body,
        })
    }

    /// `GET /bucket?prefix=..&marker=..&delimiter=..&max-keys=..`.
    ///
    /// Requires `READ` on the bucket.
    pub fn list_objects(&self, parts: &http::request::Parts) -> Result<ListingResult, S3Error> {
        let request = self.authenticator.authenticate(parts)?;
        let bucket_name = request
            .resource
            .bucket()
            .ok_or_else(|| S3Error::with_message(S3ErrorCode::InvalidRequest, "missing bucket"))?;
        let bucket = self
            .buckets
            .get(bucket_name)
            .ok_or_else(|| S3Error::no_such_bucket(bucket_name))?;
        check_resource_access(
            Some(&bucket.acp),
            &Grantee::from(request.requestor.clone()),
            Permission::READ,
        )?;

        let query = listing_query(parts.uri.query().unwrap_or(""))?;
        Ok(self.paginator.paginate(&bucket.keys, &query))
    }

    /// `GET /bucket?acl` or `GET /bucket/key?acl`.
    pub fn get_acl(&self, parts: &http::request::Parts) -> Result<String, S3Error> {
        let request = self.authenticator.authenticate(parts)?;
        let acp = self.policy(&request.resource)?;
        acp.can_read_acp(&Grantee::from(request.requestor))?;
        Ok(xml::encode(acp)?)
    }

    /// `PUT /bucket?acl` or `PUT /bucket/key?acl` with an
    /// `AccessControlPolicy` document.
    pub fn put_acl(&mut self, parts: &http::request::Parts, body: &[u8]) -> Result<(), S3Error> {
        let request = self.authenticator.authenticate(parts)?;
        let grantee = Grantee::from(request.requestor.clone());
        self.policy(&request.resource)?.can_write_acp(&grantee)?;

        let replacement = xml::decode(body)?;
        *self.policy_mut(&request.resource)? = replacement;
        Ok(())
    }

    fn policy(&self, resource: &s3lite_auth::ResourcePath) -> Result<&AccessControlPolicy, S3Error> {
        let bucket_name = resource
            .bucket()
            .ok_or_else(|| S3Error::with_message(S3ErrorCode::InvalidRequest, "missing bucket"))?;
        let bucket = self
            .buckets
            .get(bucket_name)
            .ok_or_else(|| S3Error::no_such_bucket(bucket_name))?;
        match resource.key() {
            None => Ok(&bucket.acp),
            Some(key) => bucket
                .objects
                .get(key)
                .map(|o| &o.acp)
                .ok_or_else(|| S3Error::no_such_key(key)),
        }
    }

    fn policy_mut(
        &mut self,
        resource: &s3lite_auth::ResourcePath,
    ) -> Result<&mut AccessControlPolicy, S3Error> {
        let bucket_name = resource
            .bucket()
            .ok_or_else(|| S3Error::with_message(S3ErrorCode::InvalidRequest, "missing bucket"))?;
        let bucket = self
            .buckets
            .get_mut(bucket_name)
            .ok_or_else(|| S3Error::no_such_bucket(bucket_name))?;
        match resource.key() {
            None => Ok(&mut bucket.acp),
            Some(key) => bucket
                .objects
                .get_mut(key)
                .map(|o| &mut o.acp)
                .ok_or_else(|| S3Error::no_such_key(key)),
        }
    }
}

impl Default for TestService {
    fn default() -> Self {
        Self::new()
    }
}

fn object_path(resource: &s3lite_auth::ResourcePath) -> Result<(String, String), S3Error> {
    match (resource.bucket(), resource.key()) {
        (Some(bucket), Some(key)) => Ok((bucket.to_owned(), key.to_owned())),
        _ => Err(S3Error::with_message(
            S3ErrorCode::InvalidRequest,
            "request does not address an object",
        )),
    }
}

fn listing_query(query: &str) -> Result<ListingQuery, S3Error> {
    let mut listing = ListingQuery::default();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = percent_decode_str(value).decode_utf8_lossy().into_owned();
        match name {
            "prefix" => listing.prefix = value,
            "marker" => listing.marker = Some(value),
            "delimiter" => listing.delimiter = Some(value),
            "max-keys" => {
                let max_keys = value.parse().map_err(|_| {
                    S3Error::with_message(S3ErrorCode::InvalidArgument, "max-keys must be an integer")
                })?;
                listing.max_keys = Some(max_keys);
            }
            _ => {}
        }
    }
    Ok(listing)
}

fn checksum(body: &[u8]) -> u32 {
    body.iter()
        .fold(0x811c_9dc5_u32, |h, b| (h ^ u32::from(*b)).wrapping_mul(0x0100_0193))
}

mod test_auth;
mod test_list;
