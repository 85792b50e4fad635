//! Request authentication.
//!
//! Resolves the requestor of an inbound request from its `Authorization`
//! header. Requests without the header are anonymous; signed requests must
//! carry a valid SigV2 signature for a known access key.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use s3lite_core::{CanonicalUser, S3LiteConfig};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::addressing::{ResourcePath, resolve_resource};
use crate::directory::UserDirectory;
use crate::error::AuthError;
use crate::signer::{header_text, sign, string_to_sign};
use crate::timestamp::{check_request_time, request_timestamp};

/// The outcome of authenticating a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedRequest {
    /// The resolved identity; anonymous for unsigned requests.
    pub requestor: CanonicalUser,
    /// The access key id of a signed request.
    pub access_key_id: Option<String>,
    /// The addressed bucket and key.
    pub resource: ResourcePath,
    /// The string that was signed; `None` for anonymous requests.
    pub string_to_sign: Option<String>,
    /// The time the request claims to have been made.
    pub timestamp: Option<DateTime<Utc>>,
}

impl AuthenticatedRequest {
    /// Whether the request carried no credentials.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.access_key_id.is_none()
    }
}

/// SigV2 request authenticator.
#[derive(Clone)]
pub struct Authenticator {
    directory: Arc<dyn UserDirectory>,
    base_host: String,
    max_skew: Option<Duration>,
}

impl Authenticator {
    /// Create an authenticator with the clock-skew check disabled.
    pub fn new(directory: Arc<dyn UserDirectory>, base_host: impl Into<String>) -> Self {
        Self {
            directory,
            base_host: base_host.into(),
            max_skew: None,
        }
    }

    /// Build an authenticator from configuration.
    #[must_use]
    pub fn from_config(directory: Arc<dyn UserDirectory>, config: &S3LiteConfig) -> Self {
        let authenticator = Self::new(directory, config.base_host.clone());
        match config.request_skew_window() {
            Some(secs) => authenticator.with_max_skew(Duration::seconds(secs)),
            None => authenticator,
        }
    }

    /// Reject signed requests whose timestamp is further than `max_skew`
    /// from the server clock.
    #[must_use]
    pub fn with_max_skew(mut self, max_skew: Duration) -> Self {
        self.max_skew = Some(max_skew);
        self
    }

    /// The accepted clock skew, if the check is enabled.
    #[must_use]
    pub fn max_skew(&self) -> Option<Duration> {
        self.max_skew
    }

    /// Authenticate a request against the current time.
    pub fn authenticate(
        &self,
        parts: &http::request::Parts,
    ) -> Result<AuthenticatedRequest, AuthError> {
        self.authenticate_at(parts, Utc::now())
    }

    /// Authenticate a request as if the server clock read `now`.
    pub fn authenticate_at(
        &self,
        parts: &http::request::Parts,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedRequest, AuthError> {
        let host = header_text(&parts.headers, "host")?;
        let resource = resolve_resource(host, parts.uri.path(), &self.base_host);
        let timestamp = request_timestamp(&parts.headers);

        let Some(authorization) = parts.headers.get(http::header::AUTHORIZATION) else {
            debug!(method = %parts.method, path = %parts.uri.path(), "anonymous request");
            return Ok(AuthenticatedRequest {
                requestor: CanonicalUser::anonymous(),
                access_key_id: None,
                resource,
                string_to_sign: None,
                timestamp,
            });
        };

        let authorization = authorization.to_str().map_err(|_| {
            AuthError::InvalidSecurity("Authorization header is not valid ASCII".to_owned())
        })?;
        let (access_key_id, signature) = parse_authorization(authorization)?;

        let string_to_sign = string_to_sign(parts, &resource)?;
        let secret = self.directory.secret_for(access_key_id)?;
        let expected = sign(&secret, &string_to_sign)?;
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            debug!(
                access_key_id,
                string_to_sign = %string_to_sign.escape_debug(),
                "signature mismatch"
            );
            return Err(AuthError::SignatureDoesNotMatch);
        }

        if let Some(max_skew) = self.max_skew {
            check_request_time(timestamp, now, max_skew)?;
        }

        let requestor = self.directory.canonical_user_for(access_key_id)?;
        debug!(access_key_id, requestor = %requestor, "authenticated request");

        Ok(AuthenticatedRequest {
            requestor,
            access_key_id: Some(access_key_id.to_owned()),
            resource,
            string_to_sign: Some(string_to_sign),
            timestamp,
        })
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("base_host", &self.base_host)
            .field("max_skew", &self.max_skew)
            .finish_non_exhaustive()
    }
}

/// Split `AWS <accessKeyId>:<signature>` into its two credentials.
fn parse_authorization(value: &str) -> Result<(&str, &str), AuthError> {
    let invalid =
        || AuthError::InvalidSecurity(format!("expected 'AWS <id>:<signature>', got '{value}'"));

    let fields: Vec<&str> = value.split(' ').collect();
    let [scheme, credentials] = fields.as_slice() else {
        return Err(invalid());
    };
    if *scheme != "AWS" {
        return Err(invalid());
    }

    let parts: Vec<&str> = credentials.split(':').collect();
    match parts.as_slice() {
        [id, signature] if !id.is_empty() && !signature.is_empty() => Ok((*id, *signature)),
        _ => Err(invalid()),
    }
}
