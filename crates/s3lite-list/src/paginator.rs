//! `ListObjects` pagination over an ordered key source.

use s3lite_core::S3LiteConfig;
use s3lite_core::config::MAX_KEYS_CEILING;
use serde::Serialize;
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::entry::ObjectSummary;
use crate::source::KeySource;

/// Parameters of one listing request.
///
/// # Examples
///
/// ```
/// use s3lite_list::ListingQuery;
///
/// let query = ListingQuery::builder().prefix("photos/").delimiter("/").max_keys(50).build();
/// assert_eq!(query.prefix, "photos/");
/// assert_eq!(query.marker, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, TypedBuilder)]
pub struct ListingQuery {
    /// Only keys starting with this prefix are listed.
    #[builder(default, setter(into))]
    pub prefix: String,
    /// Resume after this key.
    #[builder(default, setter(strip_option, into))]
    pub marker: Option<String>,
    /// Roll keys up into common prefixes at this delimiter.
    #[builder(default, setter(strip_option, into))]
    pub delimiter: Option<String>,
    /// Requested page size; absent means the ceiling.
    #[builder(default, setter(strip_option))]
    pub max_keys: Option<i64>,
}

impl ListingQuery {
    /// The delimiter, with an empty string treated as absent.
    #[must_use]
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref().filter(|d| !d.is_empty())
    }

    /// The marker if it lies inside the prefix; markers outside it are ignored.
    #[must_use]
    pub fn effective_marker(&self) -> Option<&str> {
        self.marker
            .as_deref()
            .filter(|m| m.starts_with(self.prefix.as_str()))
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    /// Prefix the page was listed under.
    pub prefix: String,
    /// Marker the page was listed after, as requested.
    pub marker: Option<String>,
    /// Delimiter in effect, if any.
    pub delimiter: Option<String>,
    /// Page size in effect after clamping.
    pub max_keys: usize,
    /// Keys not rolled up into a common prefix.
    pub entries: Vec<ObjectSummary>,
    /// Distinct common prefixes, in key order.
    pub common_prefixes: Vec<String>,
    /// Whether more results follow.
    pub is_truncated: bool,
    /// Where to resume a delimiter listing.
    pub next_marker: Option<String>,
}

impl ListingResult {
    /// Number of entries plus common prefixes on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len() + self.common_prefixes.len()
    }

    /// Whether the page holds neither entries nor common prefixes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.common_prefixes.is_empty()
    }

    /// The marker to pass for the next page: `next_marker` when set,
    /// otherwise the last listed key.
    #[must_use]
    pub fn resume_marker(&self) -> Option<&str> {
        self.next_marker
            .as_deref()
            .or_else(|| self.entries.last().map(|e| e.key.as_str()))
    }
}

/// Lists keys page by page under a fixed page-size ceiling.
#[derive(Debug, Clone, Copy)]
pub struct ListingPaginator {
    ceiling: usize,
}

impl Default for ListingPaginator {
    fn default() -> Self {
        Self {
            ceiling: MAX_KEYS_CEILING,
        }
    }
}

impl ListingPaginator {
    /// A paginator with the given ceiling, itself capped at 1000.
    #[must_use]
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling: ceiling.min(MAX_KEYS_CEILING),
        }
    }

    /// A paginator using the configured ceiling.
    #[must_use]
    pub fn from_config(config: &S3LiteConfig) -> Self {
        Self::new(config.effective_max_keys())
    }

    /// The page size used for `requested`.
    ///
    /// Absent means the ceiling, non-positive means zero, larger values are
    /// capped.
    #[must_use]
    pub fn effective_max_keys(&self, requested: Option<i64>) -> usize {
        match requested {
            None => self.ceiling,
            Some(n) if n <= 0 => 0,
            Some(n) => usize::try_from(n).map_or(self.ceiling, |n| n.min(self.ceiling)),
        }
    }

    /// List one page of `source` for `query`.
    pub fn paginate(&self, source: &dyn KeySource, query: &ListingQuery) -> ListingResult {
        let prefix = query.prefix.as_str();
        let delimiter = query.delimiter();
        let marker = query.effective_marker();
        let max_keys = self.effective_max_keys(query.max_keys);

        let mut result = ListingResult {
            prefix: prefix.to_owned(),
            marker: query.marker.clone(),
            delimiter: delimiter.map(str::to_owned),
            max_keys,
            ..ListingResult::default()
        };
        if max_keys == 0 {
            return result;
        }

        // A marker inside a rolled-up prefix means that prefix was already listed.
        let mut last_prefix: Option<String> = match (marker, delimiter) {
            (Some(m), Some(d)) => common_prefix(m, prefix, d).map(str::to_owned),
            _ => None,
        };
        let mut last_key: Option<String> = None;
        let mut count = 0usize;

        let entries = source
            .entries_from(marker.unwrap_or(prefix))
            .skip_while(|e| marker.is_some_and(|m| e.key.as_str() <= m))
            .take_while(|e| e.key.starts_with(prefix));

        for entry in entries {
            if count >= max_keys {
                result.is_truncated = true;
                break;
            }

            let rolled_up = delimiter.and_then(|d| common_prefix(&entry.key, prefix, d));
            if let Some(cp) = rolled_up {
                if last_prefix.as_deref() != Some(cp) {
                    let cp = cp.to_owned();
                    result.common_prefixes.push(cp.clone());
                    last_prefix = Some(cp);
                    count += 1;
                }
                last_key = Some(entry.key);
            } else {
                last_key = Some(entry.key.clone());
                result.entries.push(entry.into());
                count += 1;
            }
        }

        if delimiter.is_some() {
            result.next_marker = last_key;
        }

        debug!(
            prefix,
            marker = ?query.marker,
            delimiter = ?delimiter,
            max_keys,
            entries = result.entries.len(),
            common_prefixes = result.common_prefixes.len(),
            is_truncated = result.is_truncated,
            "listed keys"
        );
        result
    }
}

/// List one page of `source` under the default 1000-key ceiling.
///
/// # Examples
///
/// ```
/// use s3lite_core::CanonicalUser;
/// use s3lite_list::{ListingQuery, MemoryKeySource, ObjectMetadata, list_keys};
///
/// let mut source = MemoryKeySource::new();
/// for key in ["photos/2006/jan.jpg", "photos/2006/feb.jpg", "photos/2007/jan.jpg", "sample.txt"] {
///     let metadata = ObjectMetadata {
///         size: 1,
///         last_modified_millis: 0,
///         etag: "\"etag\"".to_owned(),
///         owner: CanonicalUser::new("owner"),
///     };
///     source.insert(key, metadata);
/// }
///
/// let query = ListingQuery::builder().prefix("photos/").delimiter("/").build();
/// let page = list_keys(&source, &query);
/// assert!(page.entries.is_empty());
/// assert_eq!(page.common_prefixes, ["photos/2006/", "photos/2007/"]);
/// ```
pub fn list_keys(source: &dyn KeySource, query: &ListingQuery) -> ListingResult {
    ListingPaginator::default().paginate(source, query)
}

/// The common prefix `key` rolls up into: everything through the first
/// `delimiter` found after `prefix`.
fn common_prefix<'k>(key: &'k str, prefix: &str, delimiter: &str) -> Option<&'k str> {
    let rest = key.strip_prefix(prefix)?;
    let pos = rest.find(delimiter)?;
    Some(&key[..prefix.len() + pos + delimiter.len()])
}
