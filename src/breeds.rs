//! Breed catalogue helpers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreedInfo {
    pub name: String,
    pub sub_breeds: Vec<String>,
}

/// Turn the API's `{breed: [sub, ...]}` listing into name-ordered entries
pub fn breeds_from_listing(listing: BTreeMap<String, Vec<String>>) -> Vec<BreedInfo> {
    listing
        .into_iter()
        .map(|(name, sub_breeds)| BreedInfo { name, sub_breeds })
        .collect()
}

/// Case-insensitive substring match on the breed name
pub fn filter_breeds<'a>(breeds: &'a [BreedInfo], query: &str) -> Vec<&'a BreedInfo> {
    let q = query.to_lowercase();
    breeds
        .iter()
        .filter(|b| b.name.to_lowercase().contains(&q))
        .collect()
}

/// `"hound-afghan"` → `"Hound Afghan"`
pub fn format_breed_name(breed: &str) -> String {
    breed
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                Some(first) => first.to_uppercase().chain(c).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Breed segment of a Dog CEO image URL,
/// e.g. `hound-afghan` in `https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg`
pub fn breed_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/breeds/")?;
    let seg = rest.split('/').next()?;
    (!seg.is_empty()).then_some(seg)
}
