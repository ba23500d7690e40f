//! Category catalog and secret item selection.
//!
//! The built-in lists can be replaced by a JSON file of the shape
//! `{ "category": ["item", ...] }`. Category keys are matched lowercase.

use crate::types::DEFAULT_SECRET_ITEM;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_CATEGORY: &str = "location";

/// Built-in categories as (key, label) in menu order
pub const CATEGORIES: &[(&str, &str)] = &[
    ("location", "Locations"),
    ("cities", "Cities"),
    ("activities", "Activities"),
    ("movies", "Movies"),
    ("games", "Video Games"),
    ("mythology", "Mythology"),
    ("festivals", "Festivals"),
    ("food", "Food"),
    ("clothings", "Clothings"),
    ("instruments", "Instruments"),
];

const BUILTIN_ITEMS: &[(&str, &[&str])] = &[
    ("location", &["Beach", "Hospital", "Airport", "Library", "Casino", "Submarine"]),
    ("cities", &["Paris", "Tokyo", "Cairo", "Rio de Janeiro", "Sydney", "Toronto"]),
    ("activities", &["Skydiving", "Knitting", "Fishing", "Karaoke", "Camping", "Bowling"]),
    ("movies", &["Titanic", "Jaws", "Inception", "The Matrix", "Up", "Casablanca"]),
    ("games", &["Minecraft", "Tetris", "Pac-Man", "Portal", "Zelda", "Among Us"]),
    ("mythology", &["Zeus", "Thor", "Anubis", "Medusa", "Minotaur", "Phoenix"]),
    ("festivals", &["Diwali", "Carnival", "Oktoberfest", "Hanami", "Holi", "Lantern Festival"]),
    ("food", &["Pizza", "Sushi", "Tacos", "Croissant", "Ramen", "Paella"]),
    ("clothings", &["Scarf", "Tuxedo", "Kimono", "Raincoat", "Sombrero", "Sneakers"]),
    ("instruments", &["Guitar", "Violin", "Drums", "Harp", "Trumpet", "Accordion"]),
];

/// Where a resolved item came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    Category,
    AnyCategory,
    Default,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedItem {
    pub item: String,
    pub source: ItemSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: BTreeMap<String, Vec<String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        let categories = BUILTIN_ITEMS
            .iter()
            .map(|(key, items)| {
                (
                    key.to_string(),
                    items.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { categories }
    }

    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Self {
        let categories = map
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self { categories }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(text)?;
        Ok(Self::from_map(map))
    }

    /// Load from `path`, falling back to the built-in lists on any failure
    pub async fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match tokio::fs::read_to_string(path).await {
            Ok(text) => match Self::from_json(&text) {
                Ok(catalog) => {
                    tracing::info!(
                        "Loaded {} categories from {}",
                        catalog.categories.len(),
                        path.display()
                    );
                    catalog
                }
                Err(e) => {
                    tracing::warn!(
                        "Catalog {} is not in the expected format ({}), using built-in lists",
                        path.display(),
                        e
                    );
                    Self::builtin()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read catalog {}: {}. Using built-in lists",
                    path.display(),
                    e
                );
                Self::builtin()
            }
        }
    }

    pub fn category_keys(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    pub fn items(&self, category: &str) -> &[String] {
        self.categories
            .get(&category.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn resolve_item(&self, category: &str) -> ResolvedItem {
        self.resolve_item_with_rng(category, &mut rand::rng())
    }

    /// Pick the secret item: from the category, else from every category,
    /// else the fixed default.
    pub fn resolve_item_with_rng<R: Rng + ?Sized>(
        &self,
        category: &str,
        rng: &mut R,
    ) -> ResolvedItem {
        if let Some(item) = self.items(category).choose(rng) {
            return ResolvedItem {
                item: item.clone(),
                source: ItemSource::Category,
            };
        }

        let all: Vec<&String> = self.categories.values().flatten().collect();
        if let Some(item) = all.choose(rng) {
            tracing::info!(
                "No options found for '{}', using a general random option",
                category
            );
            return ResolvedItem {
                item: (*item).clone(),
                source: ItemSource::AnyCategory,
            };
        }

        tracing::warn!("Catalog is completely empty, using default item");
        ResolvedItem {
            item: DEFAULT_SECRET_ITEM.to_string(),
            source: ItemSource::Default,
        }
    }
}
