use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::FetchError;

/// One file to materialize under the root directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageEntry {
    #[serde(rename = "path")]
    pub relative_path: PathBuf,
    #[serde(rename = "url")]
    pub source_url: String,
    /// Keywords describing the picture. Not used when downloading.
    #[serde(default, rename = "tags")]
    pub descriptive_tags: Vec<String>,
}

impl ImageEntry {
    pub fn new(relative_path: impl Into<PathBuf>, source_url: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            source_url: source_url.into(),
            descriptive_tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptive_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    fn validate(&self) -> Result<(), FetchError> {
        let invalid = |reason: &str| FetchError::CatalogValidation {
            path: self.relative_path.clone(),
            reason: reason.to_string(),
        };

        if self.relative_path.components().next().is_none() {
            return Err(invalid("path is empty"));
        }

        // Only plain names, so that a path always names one file below the
        // root and two spellings of the same file cannot both pass.
        let plain_names = self
            .relative_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if !plain_names {
            return Err(invalid("path must be relative, without `.` or `..` segments"));
        }

        let url = Url::parse(&self.source_url).map_err(|e| invalid(&e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(&format!("unsupported URL scheme {}", url.scheme())));
        }

        Ok(())
    }
}

/// Ordered list of entries. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    images: Vec<ImageEntry>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate paths and entries that would
    /// resolve outside the root directory.
    pub fn new(entries: Vec<ImageEntry>) -> Result<Self, FetchError> {
        let mut seen = HashSet::new();

        for entry in &entries {
            entry.validate()?;

            if !seen.insert(entry.relative_path.as_path()) {
                return Err(FetchError::CatalogValidation {
                    path: entry.relative_path.clone(),
                    reason: "duplicate path".to_string(),
                });
            }
        }

        Ok(Self { entries })
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN_IMAGES
            .iter()
            .map(|(path, url, tags)| ImageEntry::new(*path, *url).with_tags(tags.iter().copied()))
            .collect();

        Self { entries }
    }

    /// Reads a catalog from a TOML, YAML or JSON file with a top-level
    /// `images` array.
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        let file: CatalogFile = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;

        tracing::debug!(path = %path.display(), entries = file.images.len(), "Loaded catalog");

        Self::new(file.images)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ImageEntry;
    type IntoIter = std::slice::Iter<'a, ImageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

type BuiltinImage = (&'static str, &'static str, &'static [&'static str]);

#[rustfmt::skip]
const BUILTIN_IMAGES: &[BuiltinImage] = &[
    (
        "avatars/avatar-default.jpg",
        "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=200&h=200&fit=crop",
        &["person", "profile", "avatar"],
    ),
    (
        "avatars/avatar-landlord.jpg",
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=200&h=200&fit=crop",
        &["businessman", "professional", "landlord"],
    ),
    (
        "avatars/avatar-review-1.jpg",
        "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=200&h=200&fit=crop",
        &["woman", "smile", "review"],
    ),
    (
        "avatars/avatar-review-2.jpg",
        "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=200&h=200&fit=crop",
        &["man", "smile", "review"],
    ),
    (
        "banner-living.jpg",
        "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=1200&h=400&fit=crop",
        &["apartment", "living", "room"],
    ),
    (
        "banner-commute.jpg",
        "https://images.unsplash.com/photo-1519494026892-80bbd2d6fd0d?w=1200&h=400&fit=crop",
        &["subway", "metro", "commute"],
    ),
    (
        "banner-service.jpg",
        "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=1200&h=400&fit=crop",
        &["cleaning", "service", "home"],
    ),
    (
        "hero-visual.jpg",
        "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=1200&h=600&fit=crop",
        &["modern", "apartment", "building"],
    ),
    (
        "booking-default.jpg",
        "https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=400&h=300&fit=crop",
        &["apartment", "booking", "house"],
    ),
    (
        "categories/category-share.jpg",
        "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=300&h=200&fit=crop",
        &["shared", "room", "apartment"],
    ),
    (
        "categories/category-studio.jpg",
        "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?w=300&h=200&fit=crop",
        &["studio", "apartment", "modern"],
    ),
    (
        "categories/category-one.jpg",
        "https://images.unsplash.com/photo-1505843513577-22bb7d21e455?w=300&h=200&fit=crop",
        &["one", "bedroom", "apartment"],
    ),
    (
        "categories/category-two.jpg",
        "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=300&h=200&fit=crop",
        &["two", "bedroom", "apartment"],
    ),
    (
        "categories/category-small.jpg",
        "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=300&h=200&fit=crop",
        &["small", "living", "room"],
    ),
    (
        "categories/category-large.jpg",
        "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=300&h=200&fit=crop",
        &["large", "living", "room"],
    ),
    (
        "categories/category-short.jpg",
        "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=300&h=200&fit=crop",
        &["short", "rent", "apartment"],
    ),
    (
        "categories/category-deposit.jpg",
        "https://images.unsplash.com/photo-1505843513577-22bb7d21e455?w=300&h=200&fit=crop",
        &["apartment", "modern", "home"],
    ),
    (
        "properties/property-a.jpg",
        "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800&h=600&fit=crop",
        &["loft", "apartment", "modern"],
    ),
    (
        "properties/property-b.jpg",
        "https://images.unsplash.com/photo-1505843513577-22bb7d21e455?w=800&h=600&fit=crop",
        &["garden", "home", "house"],
    ),
    (
        "properties/property-c.jpg",
        "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=800&h=600&fit=crop",
        &["tech", "suite", "modern"],
    ),
    (
        "properties/property-d.jpg",
        "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800&h=600&fit=crop",
        &["duplex", "apartment"],
    ),
    (
        "properties/property-e.jpg",
        "https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?w=800&h=600&fit=crop",
        &["co-living", "shared"],
    ),
    (
        "properties/property-f.jpg",
        "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=800&h=600&fit=crop",
        &["creative", "hub", "workspace"],
    ),
    (
        "properties/property-g.jpg",
        "https://images.unsplash.com/photo-1560448075-cbc16ba4ae9b?w=800&h=600&fit=crop",
        &["family", "home", "house"],
    ),
    (
        "properties/property-h.jpg",
        "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=800&h=600&fit=crop",
        &["master", "suite", "bedroom"],
    ),
    (
        "properties/property-i.jpg",
        "https://images.unsplash.com/photo-1512918728675-ed5a9ecdebfd?w=800&h=600&fit=crop",
        &["garden", "villa", "house"],
    ),
    (
        "properties/property-j.jpg",
        "https://images.unsplash.com/photo-1519494026892-80bbd2d6fd0d?w=800&h=600&fit=crop",
        &["metro", "life", "apartment"],
    ),
    (
        "properties/property-k.jpg",
        "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800&h=600&fit=crop",
        &["digital", "share", "modern"],
    ),
    (
        "properties/property-l.jpg",
        "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=800&h=600&fit=crop",
        &["cbd", "elite", "luxury"],
    ),
    (
        "gallery/property-gallery-1.jpg",
        "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800&h=600&fit=crop",
        &["apartment", "living", "room"],
    ),
    (
        "gallery/property-gallery-2.jpg",
        "https://images.unsplash.com/photo-1505843513577-22bb7d21e455?w=800&h=600&fit=crop",
        &["bedroom", "modern"],
    ),
    (
        "gallery/property-gallery-3.jpg",
        "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=800&h=600&fit=crop",
        &["kitchen", "modern"],
    ),
    (
        "gallery/property-gallery-4.jpg",
        "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800&h=600&fit=crop",
        &["bathroom", "modern"],
    ),
    (
        "services/service-clean-basic.jpg",
        "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=600&h=400&fit=crop",
        &["cleaning", "service"],
    ),
    (
        "services/service-clean-plus.jpg",
        "https://images.unsplash.com/photo-1556911220-e15b29be8c8f?w=600&h=400&fit=crop",
        &["deep", "cleaning"],
    ),
    (
        "services/service-newbie.jpg",
        "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=600&h=400&fit=crop",
        &["newbie", "service"],
    ),
    (
        "services/service-strip-move.jpg",
        "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=600&h=400&fit=crop",
        &["moving", "service"],
    ),
    (
        "services/service-strip-smart.jpg",
        "https://images.unsplash.com/photo-1484154218962-a197022b5858?w=600&h=400&fit=crop",
        &["smart", "home"],
    ),
    (
        "services/service-vip-a.jpg",
        "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=600&h=400&fit=crop",
        &["vip", "service"],
    ),
    (
        "services/service-vip-b.jpg",
        "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=600&h=400&fit=crop",
        &["vip", "service"],
    ),
    (
        "services/service-vip-c.jpg",
        "https://images.unsplash.com/photo-1519494026892-80bbd2d6fd0d?w=600&h=400&fit=crop",
        &["vip", "service"],
    ),
    (
        "discover/discover-activity-party.jpg",
        "https://images.unsplash.com/photo-1511578314322-379afb476865?w=600&h=400&fit=crop",
        &["party", "event", "activity"],
    ),
    (
        "discover/discover-activity-run.jpg",
        "https://images.unsplash.com/photo-1544966503-7cc5ac882d5e?w=600&h=400&fit=crop",
        &["running", "event", "activity"],
    ),
    (
        "discover/discover-activity-garden.jpg",
        "https://images.unsplash.com/photo-1416879595882-3373a0480b5b?w=600&h=400&fit=crop",
        &["garden", "workshop", "activity"],
    ),
    (
        "discover/discover-benefit.jpg",
        "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=600&h=400&fit=crop",
        &["benefit", "coupon"],
    ),
    (
        "discover/discover-movie.jpg",
        "https://images.unsplash.com/photo-1489599849927-2ee91cede3ba?w=600&h=400&fit=crop",
        &["movie", "cinema"],
    ),
    (
        "support/support-hero.jpg",
        "https://images.unsplash.com/photo-1552664730-d307ca884978?w=1200&h=600&fit=crop",
        &["support", "customer", "service"],
    ),
];
