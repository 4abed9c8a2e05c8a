//! Favorites store
//!
//! The collection lives in a single `dogGalleryFavorites` slot as a JSON array
//! in insertion order. Every call reads the whole array and every mutation
//! writes the whole array back. There is no version check: two contexts
//! sharing a backend race, and the last write wins.
//!
//! Every operation passes the permission gate first. Without
//! `manage:favorites` reads come back empty and mutations are no-ops that
//! report failure through their return value.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::access::Permission;
use crate::clock::Clock;
use crate::error::Result;
use crate::session::Session;
use crate::storage::Storage;

const FAVORITES_KEY: &str = "dogGalleryFavorites";

/// A favorited image. `id` is always the image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    /// Unix epoch milliseconds
    pub added_at: i64,
}

/// Permission-gated view over the persisted favorites
pub struct Favorites<'a, S> {
    session: &'a Session<S>,
    clock: &'a dyn Clock,
}

impl<'a, S: Storage> Favorites<'a, S> {
    pub fn new(session: &'a Session<S>, clock: &'a dyn Clock) -> Self {
        Self { session, clock }
    }

    /// Whether the active actor may read or change favorites
    pub fn can_manage(&self) -> bool {
        self.session.has_permission(Permission::ManageFavorites)
    }

    fn gate(&self, op: &'static str) -> bool {
        let ok = self.can_manage();
        if !ok {
            debug!(op, "favorites: permission denied");
        }
        ok
    }

    fn load(&self) -> Result<Vec<FavoriteItem>> {
        let Some(raw) = self.session.storage().get(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(error = %e, "unreadable favorites slot; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn store(&self, items: &[FavoriteItem]) -> Result<()> {
        self.session.storage().set(FAVORITES_KEY, &serde_json::to_vec(items)?)
    }

    /// All favorites in insertion order
    pub fn list(&self) -> Result<Vec<FavoriteItem>> {
        if !self.gate("list") {
            return Ok(Vec::new());
        }
        self.load()
    }

    /// Add an image. Idempotent by URL: an existing entry is returned as is.
    ///
    /// `None` when permission is denied.
    pub fn add(&self, image_url: &str, breed: Option<&str>) -> Result<Option<FavoriteItem>> {
        if !self.gate("add") {
            return Ok(None);
        }
        let mut items = self.load()?;
        if let Some(existing) = items.iter().find(|f| f.image_url == image_url) {
            debug!(%image_url, "favorite already present");
            return Ok(Some(existing.clone()));
        }
        let item = FavoriteItem {
            id: image_url.to_string(),
            image_url: image_url.to_string(),
            breed: breed.map(str::to_string),
            added_at: self.clock.now_millis(),
        };
        items.push(item.clone());
        self.store(&items)?;
        debug!(%image_url, count = items.len(), "favorite added");
        Ok(Some(item))
    }

    /// Remove an image. `false` when denied or not present; neither writes.
    pub fn remove(&self, image_url: &str) -> Result<bool> {
        if !self.gate("remove") {
            return Ok(false);
        }
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|f| f.image_url != image_url);
        if items.len() == before {
            return Ok(false);
        }
        self.store(&items)?;
        debug!(%image_url, count = items.len(), "favorite removed");
        Ok(true)
    }

    /// Flip membership. The membership check and the mutation are separate
    /// reads of the slot.
    pub fn toggle(&self, image_url: &str, breed: Option<&str>) -> Result<()> {
        if !self.gate("toggle") {
            return Ok(());
        }
        if self.is_favorite(image_url)? {
            self.remove(image_url)?;
        } else {
            self.add(image_url, breed)?;
        }
        Ok(())
    }

    pub fn is_favorite(&self, image_url: &str) -> Result<bool> {
        if !self.gate("is_favorite") {
            return Ok(false);
        }
        Ok(self.load()?.iter().any(|f| f.image_url == image_url))
    }

    /// Drop the whole collection
    pub fn clear(&self) -> Result<()> {
        if !self.gate("clear") {
            return Ok(());
        }
        self.session.storage().remove(FAVORITES_KEY)?;
        debug!("favorites cleared");
        Ok(())
    }
}
