//! Session-scoped community gallery.

use crate::brand::{Branding, SeedItem};
use chrono::{DateTime, Local};
use serde::Serialize;

/// A shared result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryItem {
    /// Unique, time-derived id.
    pub id: String,
    /// Image location (URL or data URL).
    pub image_url: String,
    /// Display name of the author.
    pub author_name: String,
    /// Localized creation date.
    pub created_date: String,
    /// Number of votes received.
    pub vote_count: u32,
}

impl From<&SeedItem> for GalleryItem {
    fn from(seed: &SeedItem) -> Self {
        Self {
            id: seed.id.to_string(),
            image_url: seed.image_url.to_string(),
            author_name: seed.author_name.to_string(),
            created_date: seed.created_date.to_string(),
            vote_count: seed.vote_count,
        }
    }
}

/// Most-recent-first list of shared results. Items are never removed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Gallery {
    items: Vec<GalleryItem>,
}

impl Gallery {
    /// Creates an empty gallery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gallery holding the brand's default items.
    pub fn seeded(brand: &Branding) -> Self {
        Self {
            items: brand.default_gallery.iter().map(GalleryItem::from).collect(),
        }
    }

    /// Items, newest first.
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the gallery has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one vote. Returns false (and changes nothing) for unknown ids.
    pub fn vote(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.vote_count = item.vote_count.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Publishes an image at the front of the gallery.
    ///
    /// A blank author falls back to the brand's default label.
    pub fn share(
        &mut self,
        image_url: impl Into<String>,
        author_name: Option<&str>,
        brand: &Branding,
    ) -> &GalleryItem {
        self.share_at(image_url, author_name, brand, Local::now())
    }

    fn share_at(
        &mut self,
        image_url: impl Into<String>,
        author_name: Option<&str>,
        brand: &Branding,
        now: DateTime<Local>,
    ) -> &GalleryItem {
        let author_name = author_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(brand.copy.default_author)
            .to_string();

        let item = GalleryItem {
            id: self.next_id(now.timestamp_millis()),
            image_url: image_url.into(),
            author_name,
            created_date: brand
                .numerals
                .localize(&now.format("%Y/%m/%d").to_string()),
            vote_count: 0,
        };
        tracing::info!(id = %item.id, author = %item.author_name, "shared to gallery");

        self.items.insert(0, item);
        &self.items[0]
    }

    fn next_id(&self, millis: i64) -> String {
        let mut candidate = millis;
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{AMNA, NANO_BANANO};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seeded_gallery() {
        let gallery = Gallery::seeded(&NANO_BANANO);
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.items()[0].id, "1");
        assert_eq!(gallery.get("2").unwrap().vote_count, 243);
    }

    #[test]
    fn test_vote_increments_by_n() {
        let mut gallery = Gallery::seeded(&NANO_BANANO);
        for _ in 0..5 {
            assert!(gallery.vote("1"));
        }
        assert_eq!(gallery.get("1").unwrap().vote_count, 161);
        assert_eq!(gallery.get("2").unwrap().vote_count, 243);
    }

    #[test]
    fn test_vote_unknown_id_is_noop() {
        let mut gallery = Gallery::seeded(&NANO_BANANO);
        let before = gallery.clone();
        assert!(!gallery.vote("missing"));
        assert_eq!(gallery.items(), before.items());
    }

    #[test]
    fn test_share_prepends() {
        let mut gallery = Gallery::seeded(&NANO_BANANO);
        for n in 0..3 {
            let url = format!("data:image/png;base64,{n}");
            let id = gallery.share(url.clone(), Some("Layla"), &NANO_BANANO).id.clone();
            assert_eq!(gallery.len(), 3 + n);
            assert_eq!(gallery.items()[0].id, id);
            assert_eq!(gallery.items()[0].image_url, url);
            assert_eq!(gallery.items()[0].vote_count, 0);
        }
    }

    #[test]
    fn test_share_ids_unique_within_same_millisecond() {
        let mut gallery = Gallery::new();
        let now = fixed_now();
        let a = gallery.share_at("a", None, &AMNA, now).id.clone();
        let b = gallery.share_at("b", None, &AMNA, now).id.clone();
        assert_ne!(a, b);
        assert_eq!(b, (now.timestamp_millis() + 1).to_string());
    }

    #[test]
    fn test_share_default_author_and_localized_date() {
        let mut gallery = Gallery::new();
        let item = gallery.share_at("x", Some("   "), &AMNA, fixed_now());
        assert_eq!(item.author_name, AMNA.copy.default_author);
        assert_eq!(item.created_date, "٢٠٢٥/٠٣/٠٧");
    }

    #[test]
    fn test_serializes_as_list() {
        let gallery = Gallery::seeded(&NANO_BANANO);
        let json = serde_json::to_value(&gallery).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["vote_count"], 243);
    }
}
