//! Session and permission store
//!
//! Holds who is acting now and answers what they may do. The current actor is
//! mirrored into the `dogGalleryUser` slot on every login and logout so a new
//! `Session` over the same storage picks it back up.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::access::{Permission, PermissionSet, Role};
use crate::directory::Directory;
use crate::error::Result;
use crate::storage::Storage;

const SESSION_KEY: &str = "dogGalleryUser";

/// Session identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl Actor {
    /// Build an actor whose permissions come from the role table
    pub fn new(id: &str, email: &str, display_name: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            role,
            permissions: role.permissions(),
        }
    }
}

/// Explicitly owned session context
pub struct Session<S> {
    storage: S,
    directory: Directory,
    actor: Option<Actor>,
}

impl<S: Storage> Session<S> {
    /// Start a session, picking up a persisted actor if one is stored.
    ///
    /// An unreadable slot, or an actor that differs from its directory entry,
    /// leaves the session anonymous.
    pub fn restore(storage: S, directory: Directory) -> Result<Self> {
        let actor = match storage.get(SESSION_KEY)? {
            None => None,
            Some(raw) => match serde_json::from_slice::<Actor>(&raw) {
                Ok(a) if directory.find_by_email(&a.email) == Some(&a) => {
                    debug!(email = %a.email, role = %a.role, "restored session");
                    Some(a)
                }
                Ok(a) => {
                    warn!(
                        email = %a.email,
                        role = %a.role,
                        "persisted actor does not match directory; starting anonymous"
                    );
                    None
                }
                Err(e) => {
                    warn!(error = %e, "unreadable session slot; starting anonymous");
                    None
                }
            },
        };
        Ok(Self {
            storage,
            directory,
            actor,
        })
    }

    /// Log in as the directory entry with this email.
    ///
    /// Returns `Ok(false)` and leaves state unchanged when nobody matches.
    /// Logging in while authenticated replaces the current actor.
    pub fn login(&mut self, email: &str) -> Result<bool> {
        let Some(found) = self.directory.find_by_email(email).cloned() else {
            debug!(%email, "login rejected: unknown email");
            return Ok(false);
        };
        self.storage.set(SESSION_KEY, &serde_json::to_vec(&found)?)?;
        info!(email = %found.email, role = %found.role, "logged in");
        self.actor = Some(found);
        Ok(true)
    }

    /// Clear the current actor from memory and storage
    pub fn logout(&mut self) -> Result<()> {
        if let Some(a) = self.actor.take() {
            info!(email = %a.email, "logged out");
        }
        self.storage.remove(SESSION_KEY)?;
        Ok(())
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_some()
    }

    /// Permission-set membership; false when anonymous
    pub fn has_permission(&self, p: Permission) -> bool {
        self.actor.as_ref().is_some_and(|a| a.permissions.contains(p))
    }

    /// Role hierarchy check; false when anonymous
    pub fn has_role(&self, r: Role) -> bool {
        self.actor.as_ref().is_some_and(|a| a.role.satisfies(r))
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Every known actor, for admin user management. Empty without `access:admin`.
    pub fn list_actors(&self) -> Vec<&Actor> {
        if !self.has_permission(Permission::AccessAdmin) {
            debug!("actor listing denied");
            return Vec::new();
        }
        self.directory.iter().collect()
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    /// Tear down the session, handing the storage back
    pub fn into_storage(self) -> S {
        self.storage
    }
}
