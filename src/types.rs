//! Shared types for the page content and the interaction state.
//!
//! Content types ([`ReviewEntry`], [`MenuCategory`], [`GalleryItem`], ...) are
//! deserialized once from `content.toml` and never mutated afterwards. The only
//! runtime-mutable entity is [`ReservationRequest`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A guest review shown in the rotating testimonial panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewEntry {
    pub id: u32,
    /// Author display name, e.g. `"Sophia R."`
    pub name: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    /// Relative time label, e.g. `"1 week ago"`
    pub time: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ReviewEntry {
    /// First character of the author name, used for the avatar badge.
    pub fn initial(&self) -> String {
        self.name.chars().next().map(String::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Display string, currency included (`"ETB 1,250"`)
    pub price: String,
    pub image: String,
}

/// A tab of the menu section and the items it displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuCategory {
    pub id: u32,
    pub title: String,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryItem {
    pub id: u32,
    /// Overlay label (`"Food"`, `"Wine"`, `"Vibe"`)
    pub category: String,
    pub image: String,
    pub title: String,
}

/// A card in the wine collection section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WineCategory {
    pub title: String,
    pub description: String,
}

/// Address, hours and contact channels for the location section and footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactInfo {
    pub address: String,
    pub plus_code: String,
    pub phone: String,
    pub website: String,
    pub email: String,
    pub hours: String,
    pub map_embed_url: String,
    #[serde(default)]
    pub socials: Vec<String>,
}

// ============================================================================
// Page anchors
// ============================================================================

/// A top-level section of the page, addressable by its anchor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    Experience,
    Menu,
    Wine,
    Reviews,
    Gallery,
    Contact,
}

impl Section {
    /// All sections in document order.
    pub const ALL: [Section; 7] = [
        Section::Hero,
        Section::Experience,
        Section::Menu,
        Section::Wine,
        Section::Reviews,
        Section::Gallery,
        Section::Contact,
    ];

    /// The `id` attribute of the section element. The hero is `home`.
    pub fn anchor(self) -> &'static str {
        match self {
            Section::Hero => "home",
            Section::Experience => "experience",
            Section::Menu => "menu",
            Section::Wine => "wine",
            Section::Reviews => "reviews",
            Section::Gallery => "gallery",
            Section::Contact => "contact",
        }
    }

    pub fn is_hero(self) -> bool {
        self == Section::Hero
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().trim_start_matches('#').to_ascii_lowercase();
        if lower == "hero" {
            return Ok(Section::Hero);
        }
        Section::ALL
            .into_iter()
            .find(|section| section.anchor() == lower)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Navigation bar entries: label and target section.
pub const NAV_LINKS: [(&str, Section); 6] = [
    ("Home", Section::Hero),
    ("Experience", Section::Experience),
    ("Menu", Section::Menu),
    ("Wine", Section::Wine),
    ("Gallery", Section::Gallery),
    ("Contact", Section::Contact),
];

// ============================================================================
// Reservation form
// ============================================================================

/// One of the four reservation inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    Phone,
    Date,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Phone,
        FormField::Date,
        FormField::Message,
    ];

    /// The input's `name` attribute.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Phone => "phone",
            FormField::Date => "date",
            FormField::Message => "message",
        }
    }

    /// Whether the input carries the `required` attribute.
    pub fn is_required(self) -> bool {
        !matches!(self, FormField::Message)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown form field '{0}' (expected name, phone, date or message)")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// The reservation request being typed into the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub name: String,
    pub phone: String,
    /// `datetime-local` value, e.g. `"2024-01-01T19:00"`
    pub date: String,
    pub message: String,
}

impl ReservationRequest {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Phone => &self.phone,
            FormField::Date => &self.date,
            FormField::Message => &self.message,
        }
    }

    /// Replace a single field, leaving the other three untouched.
    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Phone => &mut self.phone,
            FormField::Date => &mut self.date,
            FormField::Message => &mut self.message,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Required inputs that are still empty, in form order.
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_empty())
            .collect()
    }
}
