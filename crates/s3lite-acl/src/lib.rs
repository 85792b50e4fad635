//! Access control policies for s3lite.
//!
//! An [`AccessControlPolicy`] holds an owner and up to
//! [`MAX_GRANT_COUNT`] grants. Each [`Grant`] pairs a [`Grantee`] (a canonical
//! user or one of the predefined [`Group`]s) with a [`Permission`] mask.
//!
//! Authorization questions are answered by plain functions over a policy
//! value; there is no global registry:
//!
//! - [`AccessControlPolicy::check_permission`] for any permission,
//! - [`AccessControlPolicy::can_read_acp`] / [`AccessControlPolicy::can_write_acp`]
//!   for the policy document itself (the owner always passes),
//! - [`check_resource_access`] for bucket and object data.
//!
//! The [`xml`] module encodes and decodes the `AccessControlPolicy` document
//! used by the `?acl` sub-resource.
//!
//! # Example
//!
//! ```
//! use s3lite_acl::{AccessControlPolicy, Grantee, Permission};
//! use s3lite_core::CanonicalUser;
//!
//! let owner = CanonicalUser::new("owner-id");
//! let mut acp = AccessControlPolicy::for_owner(owner);
//! acp.grant(Grantee::ALL_USERS, "READ").unwrap();
//!
//! let anonymous = Grantee::from(CanonicalUser::anonymous());
//! assert!(acp.check_permission(&anonymous, Permission::READ).is_ok());
//! assert!(acp.check_permission(&anonymous, Permission::WRITE).is_err());
//! ```

mod acp;
mod error;
mod grantee;
mod permission;
pub mod xml;

pub use acp::{AccessControlPolicy, Grant, MAX_GRANT_COUNT, check_resource_access};
pub use error::AclError;
pub use grantee::{Grantee, GranteeKind, Group};
pub use permission::Permission;
