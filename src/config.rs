//! Runtime configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_MAP_SIZE, DEFAULT_PAGE_SIZE, DOG_API_BASE_URL, MAX_PAGE_SIZE,
};
use crate::error::{GalleryError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GalleryConfig {
    /// Directory holding the LMDB store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_map_size")]
    pub map_size: usize,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Images fetched per feed page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_api_base_url() -> String {
    DOG_API_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
        }
    }
}

impl GalleryConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: Self =
            toml::from_str(content).map_err(|e| GalleryError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `GALLERY_CONFIG` (if set), then apply `GALLERY_*` overrides
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub(crate) fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match var("GALLERY_CONFIG") {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        if let Some(dir) = var("GALLERY_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(size) = var("GALLERY_MAP_SIZE") {
            cfg.map_size = parse_num("GALLERY_MAP_SIZE", &size)?;
        }
        if let Some(url) = var("GALLERY_API_URL") {
            cfg.api_base_url = url;
        }
        if let Some(n) = var("GALLERY_PAGE_SIZE") {
            cfg.page_size = parse_num("GALLERY_PAGE_SIZE", &n)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(GalleryError::Config(format!(
                "page_size must be within 1..={}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.map_size == 0 {
            return Err(GalleryError::Config("map_size must be non-zero".into()));
        }
        let url = self.api_base_url.to_lowercase();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GalleryError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

fn parse_num(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| GalleryError::Config(format!("{} is not a number: '{}'", name, value)))
}
