use std::fmt;

use s3lite_core::CanonicalUser;

/// Predefined groups a permission can be granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// Everyone, including anonymous requestors.
    AllUsers,
    /// Every requestor that authenticated as a canonical user.
    AuthenticatedUsers,
}

impl Group {
    /// URI identifying the all-users group.
    pub const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";
    /// URI identifying the authenticated-users group.
    pub const AUTHENTICATED_USERS_URI: &str =
        "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

    /// The group URI used in ACL documents.
    #[must_use]
    pub fn uri(&self) -> &'static str {
        match self {
            Self::AllUsers => Self::ALL_USERS_URI,
            Self::AuthenticatedUsers => Self::AUTHENTICATED_USERS_URI,
        }
    }

    /// Look up a group by URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            Self::ALL_USERS_URI => Some(Self::AllUsers),
            Self::AUTHENTICATED_USERS_URI => Some(Self::AuthenticatedUsers),
            _ => None,
        }
    }

    /// Whether `candidate` belongs to this group.
    #[must_use]
    pub fn is_member(&self, candidate: &Grantee) -> bool {
        match (self, candidate) {
            (Self::AllUsers, _) => true,
            (Self::AuthenticatedUsers, Grantee::CanonicalUser(user)) => !user.is_anonymous(),
            (Self::AuthenticatedUsers, Grantee::Group(group)) => *group == Self::AuthenticatedUsers,
        }
    }
}

/// Discriminant of a [`Grantee`], rendered as the `xsi:type` of ACL documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GranteeKind {
    /// A single canonical user.
    CanonicalUser,
    /// A predefined group.
    Group,
}

impl GranteeKind {
    /// The `xsi:type` value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanonicalUser => "CanonicalUser",
            Self::Group => "Group",
        }
    }

    /// Parse an `xsi:type` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CanonicalUser" => Some(Self::CanonicalUser),
            "Group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// An identity that can hold a grant.
///
/// Users compare by id; groups compare by kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Grantee {
    /// A canonical user, possibly the anonymous requestor.
    CanonicalUser(CanonicalUser),
    /// A predefined group.
    Group(Group),
}

impl Grantee {
    /// The all-users group.
    pub const ALL_USERS: Self = Self::Group(Group::AllUsers);
    /// The authenticated-users group.
    pub const AUTHENTICATED_USERS: Self = Self::Group(Group::AuthenticatedUsers);

    /// Which kind of grantee this is.
    #[must_use]
    pub fn kind(&self) -> GranteeKind {
        match self {
            Self::CanonicalUser(_) => GranteeKind::CanonicalUser,
            Self::Group(_) => GranteeKind::Group,
        }
    }

    /// Whether `candidate` is covered by this grantee: the same user, or a
    /// member of this group.
    #[must_use]
    pub fn is_member(&self, candidate: &Grantee) -> bool {
        match self {
            Self::CanonicalUser(_) => self == candidate,
            Self::Group(group) => group.is_member(candidate),
        }
    }

    /// The canonical user, when this grantee is one.
    #[must_use]
    pub fn as_user(&self) -> Option<&CanonicalUser> {
        match self {
            Self::CanonicalUser(user) => Some(user),
            Self::Group(_) => None,
        }
    }
}

impl From<CanonicalUser> for Grantee {
    fn from(user: CanonicalUser) -> Self {
        Self::CanonicalUser(user)
    }
}

impl From<Group> for Grantee {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl fmt::Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CanonicalUser(user) => fmt::Display::fmt(user, f),
            Self::Group(group) => write!(f, "group {}", group.uri()),
        }
    }
}
