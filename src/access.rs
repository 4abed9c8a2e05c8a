//! Roles, permissions and permission sets
//!
//! Two independent mechanisms live here. `Role::permissions` is the static
//! role → permission table consulted by `has_permission`. `Role::satisfies`
//! is the hand-written role hierarchy consulted by `has_role`. They agree
//! today but are kept apart on purpose, and are tested apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{
    bits_to_names, names_to_bits, ACCESS_ADMIN, ADMIN_BITS, GUEST_BITS, MANAGE_FAVORITES,
    USER_BITS, VIEW_GALLERY,
};
use crate::error::GalleryError;

/// Role tag carried by every actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Guest, Role::User, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Permissions granted to this role by the static table
    pub fn permissions(self) -> PermissionSet {
        match self {
            Role::Guest => PermissionSet(GUEST_BITS),
            Role::User => PermissionSet(USER_BITS),
            Role::Admin => PermissionSet(ADMIN_BITS),
        }
    }

    /// Whether an actor holding `self` passes a `has_role(required)` query.
    ///
    /// Admin satisfies every role, user satisfies user and guest, guest only
    /// satisfies guest.
    pub fn satisfies(self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::User => matches!(required, Role::User | Role::Guest),
            Role::Guest => required == Role::Guest,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| GalleryError::Parse(format!("unknown role '{}'", s)))
    }
}

/// A single permission tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "view:gallery")]
    ViewGallery,
    #[serde(rename = "manage:favorites")]
    ManageFavorites,
    #[serde(rename = "access:admin")]
    AccessAdmin,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::ViewGallery,
        Permission::ManageFavorites,
        Permission::AccessAdmin,
    ];

    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Permission::ViewGallery => VIEW_GALLERY,
            Permission::ManageFavorites => MANAGE_FAVORITES,
            Permission::AccessAdmin => ACCESS_ADMIN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewGallery => "view:gallery",
            Permission::ManageFavorites => "manage:favorites",
            Permission::AccessAdmin => "access:admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| GalleryError::Parse(format!("unknown permission '{}'", s)))
    }
}

/// Bitmask of permissions.
///
/// Serialized as an array of permission tags in declaration order, which is
/// the layout the persisted actor has always used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(u8);

impl PermissionSet {
    pub const fn empty() -> Self {
        PermissionSet(0)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, p: Permission) -> bool {
        self.0 & p.bit() != 0
    }

    #[must_use]
    pub fn with(self, p: Permission) -> Self {
        PermissionSet(self.0 | p.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = Permission> {
        Permission::ALL.into_iter().filter(move |p| self.contains(*p))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn names(self) -> Vec<&'static str> {
        bits_to_names(self.0)
    }

    pub fn from_names(names: &[&str]) -> Self {
        PermissionSet(names_to_bits(names))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        iter.into_iter().fold(PermissionSet::empty(), PermissionSet::with)
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Vec::<Permission>::deserialize(d)?.into_iter().collect())
    }
}
