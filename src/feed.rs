//! Infinite-scroll image feed
//!
//! Pages accumulate in fetch order. The optional breed filter is part of the
//! feed's identity: changing it starts over from page one.

use tracing::debug;

use crate::api::ImageSource;
use crate::error::Result;

pub struct Feed<I> {
    source: I,
    breed: Option<String>,
    page_size: usize,
    pages: Vec<Vec<String>>,
}

impl<I: ImageSource> Feed<I> {
    pub fn new(source: I, page_size: usize) -> Self {
        Self {
            source,
            breed: None,
            page_size,
            pages: Vec::new(),
        }
    }

    /// An empty breed means no filter
    pub fn for_breed(source: I, breed: impl Into<String>, page_size: usize) -> Self {
        let mut feed = Self::new(source, page_size);
        feed.breed = Some(breed.into()).filter(|b| !b.is_empty());
        feed
    }

    pub fn source(&self) -> &I {
        &self.source
    }

    pub fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }

    /// Switch the breed filter, dropping loaded pages if it changed.
    /// `Some("")` is treated as `None`.
    pub fn set_breed(&mut self, breed: Option<String>) {
        let breed = breed.filter(|b| !b.is_empty());
        if self.breed != breed {
            debug!(from = ?self.breed, to = ?breed, "feed filter changed");
            self.breed = breed;
            self.pages.clear();
        }
    }

    /// Fetch and append the next page. A failed fetch leaves loaded pages as they were.
    pub async fn next_page(&mut self) -> Result<&[String]> {
        let page = match &self.breed {
            Some(b) => {
                self.source
                    .fetch_random_breed_images(b, self.page_size)
                    .await?
            }
            None => self.source.fetch_random_images(self.page_size).await?,
        };
        debug!(
            page = self.next_page_param(),
            images = page.len(),
            "feed page loaded"
        );
        self.pages.push(page);
        Ok(self.pages.last().map(Vec::as_slice).unwrap_or_default())
    }

    pub fn next_page_param(&self) -> usize {
        self.pages.len() + 1
    }

    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flatten().map(String::as_str)
    }

    pub fn reset(&mut self) {
        self.pages.clear();
    }
}
