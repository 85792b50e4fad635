use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::error::AclError;

/// A set of ACL actions stored as a 4-bit mask.
///
/// Text form is a comma-separated list of `READ`, `WRITE`, `READ_ACP`,
/// `WRITE_ACP` and `FULL_CONTROL`. Parsing is case-insensitive and ignores
/// whitespace around tokens; rendering lists the bits in that fixed order and
/// collapses to `FULL_CONTROL` only when all four are set.
///
/// # Examples
///
/// ```
/// use s3lite_acl::Permission;
///
/// let p: Permission = "write_acp, read".parse().unwrap();
/// assert_eq!(p.to_string(), "READ,WRITE_ACP");
/// assert_eq!("READ,WRITE,READ_ACP,WRITE_ACP".parse::<Permission>().unwrap(), Permission::FULL_CONTROL);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Permission(u8);

const NAMED_BITS: [(Permission, &str); 4] = [
    (Permission::READ, "READ"),
    (Permission::WRITE, "WRITE"),
    (Permission::READ_ACP, "READ_ACP"),
    (Permission::WRITE_ACP, "WRITE_ACP"),
];

impl Permission {
    /// Read the resource.
    pub const READ: Self = Self(0b0001);
    /// Write the resource.
    pub const WRITE: Self = Self(0b0010);
    /// Read the resource's policy.
    pub const READ_ACP: Self = Self(0b0100);
    /// Write the resource's policy.
    pub const WRITE_ACP: Self = Self(0b1000);
    /// All of the above.
    pub const FULL_CONTROL: Self = Self(0b1111);

    /// The raw mask.
    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether no action is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every action in `other` is also in `self`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Permission {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl FromStr for Permission {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = Self::default();
        for token in s.split(',') {
            let action = match token.trim().to_ascii_uppercase().as_str() {
                "READ" => Self::READ,
                "WRITE" => Self::WRITE,
                "READ_ACP" => Self::READ_ACP,
                "WRITE_ACP" => Self::WRITE_ACP,
                "FULL_CONTROL" => Self::FULL_CONTROL,
                _ => return Err(AclError::InvalidAction(s.to_owned())),
            };
            mask = mask | action;
        }
        Ok(mask)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::FULL_CONTROL {
            return f.write_str("FULL_CONTROL");
        }
        let names: Vec<&str> = NAMED_BITS
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join(","))
    }
}
