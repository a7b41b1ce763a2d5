//! Static page content.
//!
//! Reviews, menu, wine cards, gallery photos and contact details are plain data.
//! The stock fixture ships embedded in the binary (`static/content.toml`); a
//! `content.toml` placed in the site source directory replaces it wholesale.
//! Content is loaded once at startup and is read-only afterwards.
//!
//! ## Validation
//!
//! The rotation timer computes `(index + 1) % reviews.len()`, and the menu
//! section always shows one category, so both lists must be non-empty.
//! Ratings are clamped to the five-star display and must be `1..=5`.

use crate::types::{ContactInfo, GalleryItem, MenuCategory, MenuItem, ReviewEntry, WineCategory};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

const STOCK_CONTENT: &str = include_str!("../static/content.toml");

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Content validation error: {0}")]
    Validation(String),
}

/// Everything the page displays that is not interaction state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Content {
    /// Restaurant name, first line of the hero title
    pub name: String,
    /// Second line of the hero title
    pub tagline: String,
    pub intro: String,
    pub hero_image: String,
    /// Aggregate rating shown in the hero badge and footer (`"4.7"`)
    pub rating: String,
    /// Number of reviews behind the aggregate rating
    pub review_total: u32,
    /// Service labels shown as hero chips
    pub services: Vec<String>,
    pub experience: Experience,
    pub contact: ContactInfo,
    pub reviews: Vec<ReviewEntry>,
    pub menu: Vec<MenuCategory>,
    pub wines: Vec<WineCategory>,
    pub gallery: Vec<GalleryItem>,
}

/// The "Alchemy Experience" section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub image: String,
    pub heading: String,
    pub body: String,
    pub closing: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

impl Content {
    /// The embedded stock content.
    pub fn stock() -> Self {
        Self::parse(STOCK_CONTENT).expect("stock content must parse and validate")
    }

    /// Parse and validate content from TOML text.
    pub fn parse(text: &str) -> Result<Self, ContentError> {
        let content: Content = toml::from_str(text)?;
        content.validate()?;
        Ok(content)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.reviews.is_empty() {
            return Err(ContentError::Validation(
                "reviews must not be empty".into(),
            ));
        }
        if let Some(review) = self.reviews.iter().find(|r| !(1..=5).contains(&r.rating)) {
            return Err(ContentError::Validation(format!(
                "review {} has rating {}; ratings must be 1-5",
                review.id, review.rating
            )));
        }
        if self.menu.is_empty() {
            return Err(ContentError::Validation("menu must not be empty".into()));
        }
        if let Some(category) = self.menu.iter().find(|c| c.items.is_empty()) {
            return Err(ContentError::Validation(format!(
                "menu category '{}' has no items",
                category.title
            )));
        }
        Ok(())
    }

    /// Items of the category at `index`, or `None` when out of range.
    pub fn menu_items(&self, index: usize) -> Option<&[MenuItem]> {
        self.menu.get(index).map(|c| c.items.as_slice())
    }

    pub fn menu_item_count(&self) -> usize {
        self.menu.iter().map(|c| c.items.len()).sum()
    }
}

/// Load `content.toml` from the given directory, falling back to stock content.
pub fn load_content(root: &Path) -> Result<Content, ContentError> {
    let path = root.join("content.toml");
    if !path.exists() {
        return Ok(Content::stock());
    }
    let text = fs::read_to_string(&path)?;
    Content::parse(&text)
}
