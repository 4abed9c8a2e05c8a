//! Permission bits and runtime defaults

// Permission bit constants
pub const VIEW_GALLERY: u8 = 1;
pub const MANAGE_FAVORITES: u8 = 1 << 1;
pub const ACCESS_ADMIN: u8 = 1 << 2;

// Role permission table
pub const GUEST_BITS: u8 = VIEW_GALLERY;
pub const USER_BITS: u8 = VIEW_GALLERY | MANAGE_FAVORITES;
pub const ADMIN_BITS: u8 = VIEW_GALLERY | MANAGE_FAVORITES | ACCESS_ADMIN;

// Dog CEO API
pub const DOG_API_BASE_URL: &str = "https://dog.ceo/api";
pub const DEFAULT_PAGE_SIZE: usize = 10;
// The API refuses random batches larger than this
pub const MAX_PAGE_SIZE: usize = 50;

// Local store
pub const DEFAULT_DATA_DIR: &str = "gallery_data";
pub const DEFAULT_MAP_SIZE: usize = 1 << 24;

// Permission name mappings
pub(crate) const PERMISSION_NAMES: &[(&str, u8)] = &[
    ("view:gallery", VIEW_GALLERY),
    ("manage:favorites", MANAGE_FAVORITES),
    ("access:admin", ACCESS_ADMIN),
];

/// Convert a permission mask to a list of permission names
pub fn bits_to_names(mask: u8) -> Vec<&'static str> {
    PERMISSION_NAMES
        .iter()
        .filter(|(_, b)| mask & b == *b)
        .map(|(n, _)| *n)
        .collect()
}

/// Convert a list of permission names to a mask (unknown names are ignored)
pub fn names_to_bits(names: &[&str]) -> u8 {
    names
        .iter()
        .filter_map(|n| PERMISSION_NAMES.iter().find(|(k, _)| k == n).map(|(_, v)| v))
        .fold(0, |a, b| a | b)
}
