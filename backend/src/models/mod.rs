//! Domain models served to the website.
//!
//! - [`Show`] - One booked performance
//! - [`Photo`] - One gallery image
//! - [`PhotoFeed`] - Gallery images plus the gallery they came from
//! - [`Member`] - One troupe member
//!
//! Field names serialize in camelCase, matching the bundled JSON files
//! (`data/shows/index.json`, `data/instagram/index.json`) so the same types
//! read the fallbacks and write the API responses.

use serde::{Deserialize, Serialize};

// =============================================================================
// Shows
// =============================================================================

/// A booked show.
///
/// `title` and `date` are never empty once a show leaves the mapper.
/// `poster` and `thumbnail` hold normalized, directly embeddable URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Show {
    pub title: String,
    pub date: String,
    pub venue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Shape of the bundled `shows/index.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowsDocument {
    pub upcoming: Vec<Show>,
}

// =============================================================================
// Photos
// =============================================================================

/// A gallery image. `src` is never empty once a photo leaves the mapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Gallery images in display order, with the gallery they came from.
///
/// This is also the shape of the bundled `instagram/index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoFeed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub photos: Vec<Photo>,
}

// =============================================================================
// Members
// =============================================================================

/// A troupe member, as listed on the about page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Shape of the bundled `members/members.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MembersIndex {
    pub members: Vec<String>,
}

impl Member {
    fn builtin(slug: &str, name: &str, role: &str, quote: &str, bio: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            role: Some(role.to_string()),
            quote: Some(quote.to_string()),
            bio: Some(bio.to_string()),
            photo: Some(format!("data/members/{}/photo.svg", slug)),
        }
    }

    /// Roster shown when the bundled member files are missing or empty.
    pub fn fallback_roster() -> Vec<Member> {
        vec![
            Member::builtin(
                "jules",
                "Jules Park",
                "Host & keys",
                "I'll write a song about your backpack right now.",
                "Jules drives the pacing, comps on piano, and keeps the audience inside the bit.",
            ),
            Member::builtin(
                "riley",
                "Riley Cruz",
                "Characters",
                "If I enter as a raccoon, please clap.",
                "Riley goes from heartfelt to absurd in one breath, always heightening the weirdness.",
            ),
            Member::builtin(
                "sam",
                "Sam Verma",
                "Game brain",
                "My superpower is making sense of chaos.",
                "Sam spots the game fast, connects threads, and tags at the perfect moment.",
            ),
        ]
    }
}
