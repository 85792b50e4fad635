//! Request time parsing and the optional clock-skew check.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use http::HeaderMap;

use crate::error::AuthError;

/// Default accepted distance between the request time and the server clock.
pub const DEFAULT_MAX_SKEW: Duration = Duration::minutes(15);

/// The time a request claims to have been made.
///
/// `x-amz-date` takes precedence over `Date`. Returns `None` when neither is
/// present or the chosen value cannot be parsed.
#[must_use]
pub fn request_timestamp(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let value = headers
        .get("x-amz-date")
        .or_else(|| headers.get(http::header::DATE))?;
    parse_http_date(value.to_str().ok()?)
}

/// Parse an HTTP date.
///
/// Accepts RFC 1123/2822 (`Tue, 27 Mar 2007 19:36:42 +0000`), RFC 850,
/// asctime and the ISO 8601 basic form (`20070327T193642Z`).
///
/// # Examples
///
/// ```
/// use s3lite_auth::timestamp::parse_http_date;
///
/// let a = parse_http_date("Tue, 27 Mar 2007 19:36:42 GMT").unwrap();
/// let b = parse_http_date("20070327T193642Z").unwrap();
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: &[&str] = &[
        "%Y%m%dT%H%M%SZ",
        "%A, %d-%b-%y %H:%M:%S GMT",
        "%a %b %e %H:%M:%S %Y",
    ];

    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

/// Check that `timestamp` lies within `max_skew` of `now`.
///
/// A missing timestamp fails the check.
pub fn check_request_time(
    timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    max_skew: Duration,
) -> Result<(), AuthError> {
    let timestamp = timestamp.ok_or_else(|| {
        AuthError::RequestTimeTooSkewed("request has no valid Date or x-amz-date".to_owned())
    })?;

    let skew = (now - timestamp).abs();
    if skew > max_skew {
        return Err(AuthError::RequestTimeTooSkewed(format!(
            "request time {} is {}s away from server time {}",
            timestamp.to_rfc2822(),
            skew.num_seconds(),
            now.to_rfc2822()
        )));
    }
    Ok(())
}
