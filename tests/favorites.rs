//! Favorites store tests

use std::cell::Cell;
use std::sync::Arc;

use dog_gallery::{Directory, FavoriteItem, Gallery, MemoryStorage, Result, Storage};

const AFGHAN: &str = "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg";
const BASSET: &str = "https://images.dog.ceo/breeds/hound-basset/n02088238_10005.jpg";
const AKITA: &str = "https://images.dog.ceo/breeds/akita/Akita_Inu_dog.jpg";

/// Clock that advances one millisecond per reading
fn ticking_clock(start: i64) -> Box<dyn dog_gallery::Clock> {
    let now = Cell::new(start);
    Box::new(move || {
        let t = now.get();
        now.set(t + 1);
        t
    })
}

fn gallery_on(storage: Arc<MemoryStorage>, email: Option<&str>) -> Gallery<Arc<MemoryStorage>> {
    let clock = ticking_clock(1_700_000_000_000);
    let mut g = Gallery::with_parts(storage, Directory::builtin(), clock).unwrap();
    if let Some(e) = email {
        assert!(g.login(e).unwrap());
    }
    g
}

fn setup(email: Option<&str>) -> (Gallery<Arc<MemoryStorage>>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (gallery_on(Arc::clone(&storage), email), storage)
}

fn urls(items: &[FavoriteItem]) -> Vec<&str> {
    items.iter().map(|f| f.image_url.as_str()).collect()
}

// ============================================================================
// Add / List
// ============================================================================

#[test]
fn test_add_builds_item() {
    let (g, _) = setup(Some("user@example.com"));
    let item = g
        .favorites()
        .add(AFGHAN, Some("hound-afghan"))
        .unwrap()
        .unwrap();
    assert_eq!(item.id, AFGHAN);
    assert_eq!(item.image_url, AFGHAN);
    assert_eq!(item.breed.as_deref(), Some("hound-afghan"));
    assert_eq!(item.added_at, 1_700_000_000_000);
}

#[test]
fn test_list_keeps_insertion_order() {
    let (g, _) = setup(Some("user@example.com"));
    let favs = g.favorites();
    favs.add(BASSET, None).unwrap();
    favs.add(AKITA, None).unwrap();
    favs.add(AFGHAN, None).unwrap();
    assert_eq!(urls(&favs.list().unwrap()), [BASSET, AKITA, AFGHAN]);
}

#[test]
fn test_add_is_idempotent_by_url() {
    let (g, _) = setup(Some("user@example.com"));
    let favs = g.favorites();
    let first = favs.add(AFGHAN, Some("hound-afghan")).unwrap().unwrap();
    let second = favs.add(AFGHAN, Some("something-else")).unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(second.added_at, first.added_at);
    assert_eq!(second.breed.as_deref(), Some("hound-afghan"));

    let list = favs.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0], first);
}

#[test]
fn test_add_then_remove_round_trip() {
    let (g, _) = setup(Some("user@example.com"));
    let favs = g.favorites();
    favs.add(AFGHAN, None).unwrap();
    let u2 = favs.add(BASSET, None).unwrap().unwrap();
    assert!(favs.remove(AFGHAN).unwrap());
    assert_eq!(favs.list().unwrap(), vec![u2]);
}

// ============================================================================
// Remove / IsFavorite / Toggle / Clear
// ============================================================================

#[test]
fn test_remove_absent_is_false_and_writes_nothing() {
    let (g, storage) = setup(Some("user@example.com"));
    assert!(!g.favorites().remove(AFGHAN).unwrap());
    assert!(storage.get("dogGalleryFavorites").unwrap().is_none());
}

#[test]
fn test_is_favorite_tracks_membership() {
    let (g, _) = setup(Some("user@example.com"));
    let favs = g.favorites();
    assert!(!favs.is_favorite(AKITA).unwrap());
    favs.add(AKITA, None).unwrap();
    assert!(favs.is_favorite(AKITA).unwrap());
    favs.remove(AKITA).unwrap();
    assert!(!favs.is_favorite(AKITA).unwrap());
}

#[test]
fn test_toggle_flips_and_restores() {
    let (g, _) = setup(Some("user@example.com"));
    let favs = g.favorites();
    favs.toggle(AFGHAN, Some("hound-afghan")).unwrap();
    assert!(favs.is_favorite(AFGHAN).unwrap());
    assert_eq!(favs.list().unwrap()[0].breed.as_deref(), Some("hound-afghan"));
    favs.toggle(AFGHAN, Some("hound-afghan")).unwrap();
    assert!(!favs.is_favorite(AFGHAN).unwrap());
}

#[test]
fn test_clear_twice_is_safe() {
    let (g, storage) = setup(Some("admin@example.com"));
    let favs = g.favorites();
    favs.add(AFGHAN, None).unwrap();
    favs.add(AKITA, None).unwrap();
    favs.clear().unwrap();
    assert!(favs.list().unwrap().is_empty());
    favs.clear().unwrap();
    assert!(favs.list().unwrap().is_empty());
    assert!(storage.get("dogGalleryFavorites").unwrap().is_none());
}

// ============================================================================
// Permission gate
// ============================================================================

fn assert_gate_holds(email: Option<&str>) {
    let storage = Arc::new(MemoryStorage::new());
    {
        let owner = gallery_on(Arc::clone(&storage), Some("user@example.com"));
        owner.favorites().add(AFGHAN, None).unwrap();
    }
    let before = storage.get("dogGalleryFavorites").unwrap();

    let mut g =
        Gallery::with_parts(Arc::clone(&storage), Directory::builtin(), ticking_clock(0)).unwrap();
    g.logout().unwrap();
    if let Some(e) = email {
        g.login(e).unwrap();
    }
    let favs = g.favorites();
    assert!(!favs.can_manage());
    assert!(favs.list().unwrap().is_empty());
    assert_eq!(favs.add(BASSET, None).unwrap(), None);
    assert!(!favs.remove(AFGHAN).unwrap());
    assert!(!favs.is_favorite(AFGHAN).unwrap());
    favs.toggle(AFGHAN, None).unwrap();
    favs.toggle(AKITA, None).unwrap();
    favs.clear().unwrap();

    assert_eq!(storage.get("dogGalleryFavorites").unwrap(), before);
}

#[test]
fn test_anonymous_cannot_touch_favorites() {
    assert_gate_holds(None);
}

#[test]
fn test_guest_cannot_touch_favorites() {
    assert_gate_holds(Some("guest@example.com"));
}

#[test]
fn test_user_and_admin_can_manage() {
    assert!(setup(Some("user@example.com")).0.favorites().can_manage());
    assert!(setup(Some("admin@example.com")).0.favorites().can_manage());
}

// ============================================================================
// Persisted slot
// ============================================================================

#[test]
fn test_persisted_layout_matches_browser_slot() {
    let (g, storage) = setup(Some("user@example.com"));
    g.favorites().add(AFGHAN, Some("hound-afghan")).unwrap();
    g.favorites().add(AKITA, None).unwrap();

    let raw = storage.get("dogGalleryFavorites").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {
                "id": AFGHAN,
                "imageUrl": AFGHAN,
                "breed": "hound-afghan",
                "addedAt": 1_700_000_000_000i64
            },
            {
                "id": AKITA,
                "imageUrl": AKITA,
                "addedAt": 1_700_000_000_001i64
            },
        ])
    );
}

#[test]
fn test_reads_slot_written_elsewhere() {
    let storage = Arc::new(MemoryStorage::new());
    let external = format!(r#"[{{"id":"{0}","imageUrl":"{0}","addedAt":42}}]"#, BASSET);
    storage.set("dogGalleryFavorites", external.as_bytes()).unwrap();

    let g = gallery_on(storage, Some("user@example.com"));
    let list = g.favorites().list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].breed, None);
    assert_eq!(list[0].added_at, 42);
}

#[test]
fn test_corrupted_slot_reads_as_empty_and_is_overwritten() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set("dogGalleryFavorites", b"[{\"id\": oops").unwrap();

    let g = gallery_on(Arc::clone(&storage), Some("user@example.com"));
    let favs = g.favorites();
    assert!(favs.list().unwrap().is_empty());
    assert!(!favs.is_favorite(AFGHAN).unwrap());
    assert!(!favs.remove(AFGHAN).unwrap());

    favs.add(AFGHAN, None).unwrap();
    assert_eq!(urls(&favs.list().unwrap()), [AFGHAN]);
}

#[test]
fn test_favorites_survive_logout_and_relogin() {
    let (mut g, _) = setup(Some("user@example.com"));
    g.favorites().add(AFGHAN, None).unwrap();
    g.logout().unwrap();
    assert!(g.favorites().list().unwrap().is_empty());
    g.login("admin@example.com").unwrap();
    assert_eq!(urls(&g.favorites().list().unwrap()), [AFGHAN]);
}

// ============================================================================
// Shared storage (two tabs)
// ============================================================================

#[test]
fn test_contexts_on_one_store_see_each_others_writes() {
    let storage = Arc::new(MemoryStorage::new());
    let tab_a = gallery_on(Arc::clone(&storage), Some("user@example.com"));
    let tab_b = gallery_on(Arc::clone(&storage), None);
    assert!(tab_b.session().is_authenticated());

    tab_a.favorites().add(AFGHAN, None).unwrap();
    tab_b.favorites().add(AKITA, None).unwrap();
    assert_eq!(urls(&tab_a.favorites().list().unwrap()), [AFGHAN, AKITA]);
}

/// Wraps one tab's storage so another tab gets to write between this tab's
/// first favorites read and whatever it does next.
struct Interleaved<'a> {
    inner: Arc<MemoryStorage>,
    after_read: Cell<Option<Box<dyn FnOnce() + 'a>>>,
}

impl<'a> Interleaved<'a> {
    fn new(inner: Arc<MemoryStorage>, other_tab: impl FnOnce() + 'a) -> Self {
        Self {
            inner,
            after_read: Cell::new(Some(Box::new(other_tab))),
        }
    }
}

impl Storage for Interleaved<'_> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.inner.get(key)?;
        if key == "dogGalleryFavorites" {
            if let Some(other_tab) = self.after_read.take() {
                other_tab();
            }
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.inner.remove(key)
    }
}

#[test]
fn test_stale_read_then_write_loses_other_change() {
    let storage = Arc::new(MemoryStorage::new());
    let tab_b = gallery_on(Arc::clone(&storage), Some("user@example.com"));
    tab_b.favorites().add(BASSET, None).unwrap();

    let b_wrote = Cell::new(false);
    let tab_a_storage = Interleaved::new(Arc::clone(&storage), || {
        tab_b.favorites().add(AKITA, None).unwrap();
        assert_eq!(urls(&tab_b.favorites().list().unwrap()), [BASSET, AKITA]);
        b_wrote.set(true);
    });
    let tab_a = Gallery::with_parts(tab_a_storage, Directory::builtin(), ticking_clock(0)).unwrap();
    assert!(tab_a.session().is_authenticated());

    // A reads [BASSET], B appends AKITA, A writes back [BASSET, AFGHAN]
    tab_a.favorites().add(AFGHAN, None).unwrap();
    assert!(b_wrote.get());

    assert_eq!(urls(&tab_b.favorites().list().unwrap()), [BASSET, AFGHAN]);
    assert!(!tab_b.favorites().is_favorite(AKITA).unwrap());
}
