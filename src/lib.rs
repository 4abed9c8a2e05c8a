//! Dog gallery core - sessions, permissions and favorites over a key-value store

pub mod access;
pub mod api;
pub mod breeds;
pub mod clock;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod favorites;
pub mod feed;
pub mod gallery;
pub mod session;
pub mod storage;

pub use access::{Permission, PermissionSet, Role};
pub use api::{ApiResponse, ImageSource};
#[cfg(feature = "api")]
pub use api::DogApiClient;
pub use breeds::{breed_from_url, filter_breeds, format_breed_name, BreedInfo};
pub use clock::{Clock, SystemClock};
pub use config::GalleryConfig;
pub use directory::Directory;
pub use error::{GalleryError, Result};
pub use favorites::{FavoriteItem, Favorites};
pub use feed::Feed;
pub use gallery::Gallery;
pub use session::{Actor, Session};
pub use storage::{LmdbStorage, MemoryStorage, Storage};
