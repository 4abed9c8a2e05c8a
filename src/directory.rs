//! Directory of known actors
//!
//! Login is a lookup by email in this table; there is no credential check.

use crate::access::Role;
use crate::session::Actor;

/// Fixed set of actors that may log in
#[derive(Debug, Clone)]
pub struct Directory {
    actors: Vec<Actor>,
}

impl Directory {
    pub fn new(actors: Vec<Actor>) -> Self {
        Self { actors }
    }

    /// The guest, user and admin accounts the gallery ships with
    pub fn builtin() -> Self {
        Self::new(vec![
            Actor::new("1", "guest@example.com", "Guest User", Role::Guest),
            Actor::new("2", "user@example.com", "Regular User", Role::User),
            Actor::new("3", "admin@example.com", "Admin User", Role::Admin),
        ])
    }

    /// Exact, case-sensitive email match
    pub fn find_by_email(&self, email: &str) -> Option<&Actor> {
        self.actors.iter().find(|a| a.email == email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::builtin()
    }
}
