use s3lite_core::CanonicalUser;
use tracing::debug;

use crate::error::AclError;
use crate::grantee::Grantee;
use crate::permission::Permission;

/// Maximum number of grants a single policy may hold.
pub const MAX_GRANT_COUNT: usize = 100;

/// A grantee paired with the actions it may perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grant {
    grantee: Grantee,
    permission: Permission,
}

impl Grant {
    /// Create a grant.
    #[must_use]
    pub fn new(grantee: Grantee, permission: Permission) -> Self {
        Self {
            grantee,
            permission,
        }
    }

    /// The grantee.
    #[must_use]
    pub fn grantee(&self) -> &Grantee {
        &self.grantee
    }

    /// The granted actions.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Whether this grant allows `grantee` to perform `permission`.
    ///
    /// Requires every requested action to be granted, and the requester to
    /// be the granted user or a member of the granted group.
    #[must_use]
    pub fn implies(&self, grantee: &Grantee, permission: Permission) -> bool {
        self.permission.contains(permission) && self.grantee.is_member(grantee)
    }
}

/// Owner and grants of a bucket or object.
///
/// Grants keep insertion order and are append-only; replacing a policy means
/// building a new one. The owner has no implicit access to the resource
/// itself, only to the policy document (see [`AccessControlPolicy::can_read_acp`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControlPolicy {
    owner: Option<CanonicalUser>,
    grants: Vec<Grant>,
}

impl AccessControlPolicy {
    /// Create an empty policy with no owner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the policy of a newly created resource: `owner` is set and
    /// granted `FULL_CONTROL`.
    #[must_use]
    pub fn for_owner(owner: CanonicalUser) -> Self {
        let grants = vec![Grant::new(
            Grantee::CanonicalUser(owner.clone()),
            Permission::FULL_CONTROL,
        )];
        Self {
            owner: Some(owner),
            grants,
        }
    }

    /// The owner, if set.
    #[must_use]
    pub fn owner(&self) -> Option<&CanonicalUser> {
        self.owner.as_ref()
    }

    /// Set the owner.
    pub fn set_owner(&mut self, owner: CanonicalUser) {
        self.owner = Some(owner);
    }

    /// Grants in insertion order.
    #[must_use]
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Number of grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Whether the policy has no grants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Grant the actions named by `action` (e.g. `"READ,WRITE"`) to `grantee`.
    pub fn grant(
        &mut self,
        grantee: impl Into<Grantee>,
        action: &str,
    ) -> Result<Grant, AclError> {
        let permission: Permission = action.parse()?;
        self.grant_permission(grantee, permission)
    }

    /// Grant `permission` to `grantee`.
    ///
    /// Fails when the permission is empty or the policy already holds
    /// [`MAX_GRANT_COUNT`] grants.
    pub fn grant_permission(
        &mut self,
        grantee: impl Into<Grantee>,
        permission: Permission,
    ) -> Result<Grant, AclError> {
        if permission.is_empty() {
            return Err(AclError::InvalidAction(permission.to_string()));
        }
        if self.grants.len() >= MAX_GRANT_COUNT {
            return Err(AclError::TooManyGrants {
                limit: MAX_GRANT_COUNT,
            });
        }

        let grant = Grant::new(grantee.into(), permission);
        debug!(grantee = %grant.grantee, permission = %permission, "added grant");
        self.grants.push(grant.clone());
        Ok(grant)
    }

    /// Check whether some grant allows `grantee` to perform `permission`.
    pub fn check_permission(
        &self,
        grantee: &Grantee,
        permission: Permission,
    ) -> Result<(), AclError> {
        if self.grants.iter().any(|g| g.implies(grantee, permission)) {
            return Ok(());
        }
        debug!(grantee = %grantee, permission = %permission, "permission denied");
        Err(AclError::AccessDenied {
            grantee: grantee.to_string(),
            permission: permission.to_string(),
        })
    }

    /// Check whether `grantee` may read this policy. The owner always may.
    pub fn can_read_acp(&self, grantee: &Grantee) -> Result<(), AclError> {
        if self.is_owner(grantee) {
            return Ok(());
        }
        self.check_permission(grantee, Permission::READ_ACP)
    }

    /// Check whether `grantee` may replace this policy. The owner always may.
    pub fn can_write_acp(&self, grantee: &Grantee) -> Result<(), AclError> {
        if self.is_owner(grantee) {
            return Ok(());
        }
        self.check_permission(grantee, Permission::WRITE_ACP)
    }

    fn is_owner(&self, grantee: &Grantee) -> bool {
        matches!((&self.owner, grantee.as_user()), (Some(owner), Some(user)) if owner == user)
    }
}

/// Check access to resource data (`READ` or `WRITE` on a bucket or object).
///
/// The owner gets no special treatment here. A resource without a policy
/// denies everything.
pub fn check_resource_access(
    acp: Option<&AccessControlPolicy>,
    grantee: &Grantee,
    permission: Permission,
) -> Result<(), AclError> {
    match acp {
        Some(acp) => acp.check_permission(grantee, permission),
        None => {
            debug!(grantee = %grantee, permission = %permission, "no policy, denying access");
            Err(AclError::AccessDenied {
                grantee: grantee.to_string(),
                permission: permission.to_string(),
            })
        }
    }
}
