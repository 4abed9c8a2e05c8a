//! Image source collaborator
//!
//! The favorites core never calls this; it only receives the URLs and breed
//! names the gallery front end got from here.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::breeds::BreedInfo;
use crate::error::{GalleryError, Result};

/// Where gallery images come from
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_random_images(&self, count: usize) -> Result<Vec<String>>;
    async fn fetch_breed_images(&self, breed: &str) -> Result<Vec<String>>;
    async fn fetch_random_breed_images(&self, breed: &str, count: usize) -> Result<Vec<String>>;
    async fn fetch_all_breeds(&self) -> Result<Vec<BreedInfo>>;
}

/// Dog CEO response envelope
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub message: T,
    pub status: String,
}

impl<T> ApiResponse<T> {
    pub fn into_message(self) -> Result<T> {
        if self.status == "success" {
            Ok(self.message)
        } else {
            Err(GalleryError::Api(format!("unexpected status '{}'", self.status)))
        }
    }
}

pub type BreedListing = BTreeMap<String, Vec<String>>;

/// Request paths relative to the API base URL
pub mod paths {
    pub const RANDOM_IMAGE: &str = "/breeds/image/random";
    pub const BREED_LIST: &str = "/breeds/list/all";

    pub fn random_images(count: usize) -> String {
        format!("{}/{}", RANDOM_IMAGE, count)
    }

    pub fn breed_images(breed: &str) -> String {
        format!("/breed/{}/images", breed)
    }

    pub fn random_breed_images(breed: &str, count: usize) -> String {
        format!("/breed/{}/images/random/{}", breed, count)
    }

    pub fn sub_breed_images(breed: &str, sub_breed: &str) -> String {
        format!("/breed/{}/{}/images", breed, sub_breed)
    }
}

#[cfg(feature = "api")]
pub use client::DogApiClient;

#[cfg(feature = "api")]
mod client {
    use async_trait::async_trait;
    use serde::de::DeserializeOwned;
    use tracing::debug;

    use super::{paths, ApiResponse, BreedListing, ImageSource};
    use crate::breeds::{breeds_from_listing, BreedInfo};
    use crate::config::GalleryConfig;
    use crate::error::{GalleryError, Result};

    /// HTTP client for https://dog.ceo/dog-api/
    #[derive(Debug, Clone)]
    pub struct DogApiClient {
        client: reqwest::Client,
        base_url: String,
    }

    impl DogApiClient {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }
        }

        pub fn from_config(cfg: &GalleryConfig) -> Self {
            Self::new(cfg.api_base_url.clone())
        }

        pub fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }

        async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
            let url = self.url(path);
            debug!(%url, "dog api request");
            let response = self.client.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GalleryError::Api(format!("{} from {}: {}", status, url, body)));
            }
            response.json::<ApiResponse<T>>().await?.into_message()
        }

        /// One random image from any breed
        pub async fn random_image(&self) -> Result<String> {
            self.get(paths::RANDOM_IMAGE).await
        }

        pub async fn sub_breed_images(&self, breed: &str, sub_breed: &str) -> Result<Vec<String>> {
            self.get(&paths::sub_breed_images(breed, sub_breed)).await
        }
    }

    #[async_trait]
    impl ImageSource for DogApiClient {
        async fn fetch_random_images(&self, count: usize) -> Result<Vec<String>> {
            self.get(&paths::random_images(count)).await
        }

        async fn fetch_breed_images(&self, breed: &str) -> Result<Vec<String>> {
            self.get(&paths::breed_images(breed)).await
        }

        async fn fetch_random_breed_images(
            &self,
            breed: &str,
            count: usize,
        ) -> Result<Vec<String>> {
            self.get(&paths::random_breed_images(breed, count)).await
        }

        async fn fetch_all_breeds(&self) -> Result<Vec<BreedInfo>> {
            let listing: BreedListing = self.get(paths::BREED_LIST).await?;
            Ok(breeds_from_listing(listing))
        }
    }
}
