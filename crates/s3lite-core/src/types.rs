//! Identity types shared across s3lite components.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A canonical user: the identity of an account that owns or is granted
/// access to buckets and objects.
///
/// Two users are equal when their ids are equal; the display name is
/// presentation only. The reserved id [`CanonicalUser::ANONYMOUS_ID`] stands
/// for an unauthenticated requestor.
///
/// # Examples
///
/// ```
/// use s3lite_core::CanonicalUser;
///
/// let user = CanonicalUser::new("a1b2c3");
/// assert_eq!(user.display_name(), "a1b2c3");
///
/// let named = CanonicalUser::with_display_name("a1b2c3", "alice");
/// assert_eq!(user, named);
/// assert!(CanonicalUser::anonymous().is_anonymous());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalUser {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl CanonicalUser {
    /// Id of the anonymous (unauthenticated) requestor.
    pub const ANONYMOUS_ID: &str = "<anonymous>";

    /// Create a user with no display name.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    /// Create a user with a display name.
    #[must_use]
    pub fn with_display_name(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: Some(display_name.into()),
        }
    }

    /// The anonymous requestor.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(Self::ANONYMOUS_ID)
    }

    /// The canonical id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name, falling back to the id when none was set.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    /// Replace the display name.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = Some(display_name.into());
    }

    /// Whether this is the anonymous requestor.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.id == Self::ANONYMOUS_ID
    }
}

impl PartialEq for CanonicalUser {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CanonicalUser {}

impl Hash for CanonicalUser {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for CanonicalUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id {}", self.id)
    }
}
