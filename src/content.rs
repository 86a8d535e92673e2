//! Portfolio content catalog.
//!
//! The map's four sections reveal entries from a catalog embedded at compile
//! time as JSON. A section with no entries simply shows its heading alone;
//! a catalog that fails to parse is logged and replaced with an empty one,
//! matching the original's log-and-carry-on handling of missing data.

use std::collections::HashMap;

use bevy::prelude::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw catalog document compiled into the binary.
const EMBEDDED_CATALOG: &str = include_str!("../content/portfolio.json");

static PARSED_CATALOG: Lazy<Catalog> = Lazy::new(|| match Catalog::from_json(EMBEDDED_CATALOG) {
    Ok(catalog) => catalog,
    Err(err) => {
        log::error!("embedded portfolio catalog is invalid: {err}");
        Catalog::empty()
    }
});

/// The four portfolio sections on the map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect,
)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    /// Employment history.
    WorkExperience,
    /// Side projects and open source.
    Projects,
    /// Tools and technologies.
    Skills,
    /// Introduction and contact.
    AboutMe,
}

impl SectionKind {
    /// All sections in reading order.
    pub const ALL: [Self; 4] = [
        Self::WorkExperience,
        Self::Projects,
        Self::Skills,
        Self::AboutMe,
    ];

    /// Human-readable heading for the section.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::WorkExperience => "Work Experience",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
            Self::AboutMe => "About Me",
        }
    }

    /// Asset key of the section's floating icon.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::WorkExperience => "icons/work-experience",
            Self::Projects => "icons/projects",
            Self::Skills => "icons/skills",
            Self::AboutMe => "icons/about-me",
        }
    }
}

/// One catalog entry, shown as an orb and expanded in the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Asset key of the entry's logo.
    pub icon: String,
    /// Headline, e.g. a job title or project name.
    pub title: String,
    /// Employer, client, or project owner.
    pub organisation: String,
    /// Free-form time range or status line.
    pub period: String,
    /// Short paragraph shown above the fold.
    pub summary: String,
    /// Technology tags rendered as a separated list.
    pub technologies: Vec<String>,
    /// Bullet points rendered under "Key Achievements".
    pub highlights: Vec<String>,
}

/// Errors raised while loading a catalog document.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The document was not valid JSON or did not match the schema.
    #[error("portfolio catalog is not valid: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Portfolio entries grouped by section.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    sections: HashMap<SectionKind, Vec<ContentEntry>>,
}

impl Catalog {
    /// A catalog with no entries at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sections: HashMap::new(),
        }
    }

    /// Parses a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Parse`] when the document is malformed or a
    /// section key is not one of the four known sections.
    pub fn from_json(document: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Entries for one section; empty when the catalog has none.
    #[must_use]
    pub fn entries(&self, kind: SectionKind) -> &[ContentEntry] {
        self.sections.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Total number of entries across all sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Catalog {
    /// The embedded catalog, or an empty one when it fails to parse.
    fn default() -> Self {
        PARSED_CATALOG.clone()
    }
}
