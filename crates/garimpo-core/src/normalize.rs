use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::clean::{
    DESCRIPTION_UNAVAILABLE, TITLE_UNAVAILABLE, clean_color, clean_location, clean_mileage,
    clean_price, clean_year,
};
use crate::models::{Listing, SourceName};
use crate::traits::IdSource;

/// The raw key/value record pulled out of one listing fragment, before any
/// cleaning. Every field is optional; an empty record is valid input.
#[derive(Debug, Clone, Default)]
pub struct RawListing {
    /// Source-provided id, kept when the source exposes a stable one.
    pub id: Option<String>,
    pub title: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub year: Option<String>,
    pub mileage: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
}

/// Maps raw records into the canonical [`Listing`] schema.
///
/// Runs every field through the cleaners, substitutes the documented
/// sentinel for missing title/description, and stamps `scraped_at`. Never
/// fails: an empty record yields the all-sentinel listing.
#[derive(Clone)]
pub struct Normalizer<I: IdSource> {
    ids: I,
}

impl<I: IdSource> Normalizer<I> {
    pub fn new(ids: I) -> Self {
        Self { ids }
    }

    pub fn normalize(&self, raw: RawListing, source: SourceName) -> Listing {
        Listing {
            id: match non_empty(raw.id) {
                Some(id) => id,
                None => self.ids.next_id(source),
            },
            title: non_empty(raw.title).unwrap_or_else(|| TITLE_UNAVAILABLE.to_string()),
            price: clean_price(raw.price.as_deref()),
            location: clean_location(raw.location.as_deref()),
            description: non_empty(raw.description)
                .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string()),
            image_url: non_empty(raw.image),
            detail_url: non_empty(raw.url),
            year: clean_year(raw.year.as_deref()),
            mileage_text: clean_mileage(raw.mileage.as_deref()),
            fuel: non_empty(raw.fuel),
            transmission: non_empty(raw.transmission),
            color: clean_color(raw.color.as_deref()),
            source_name: source,
            scraped_at: Utc::now(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Production id source: `<source>_<epoch-millis>_<sequence>`, with the
/// sequence shared across clones so concurrent extractions never collide.
#[derive(Clone, Default)]
pub struct TimestampIdSource {
    counter: Arc<AtomicU64>,
}

impl TimestampIdSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for TimestampIdSource {
    fn next_id(&self, source: SourceName) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}_{}_{}",
            source.id_prefix(),
            Utc::now().timestamp_millis(),
            seq
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{LOCATION_UNAVAILABLE, PRICE_UNAVAILABLE};
    use crate::testutil::FixedIdSource;

    fn normalizer() -> Normalizer<FixedIdSource> {
        Normalizer::new(FixedIdSource::new())
    }

    #[test]
    fn empty_record_yields_all_sentinels() {
        let listing = normalizer().normalize(RawListing::default(), SourceName::Olx);

        assert_eq!(listing.title, TITLE_UNAVAILABLE);
        assert_eq!(listing.price, PRICE_UNAVAILABLE);
        assert_eq!(listing.location, LOCATION_UNAVAILABLE);
        assert_eq!(listing.description, DESCRIPTION_UNAVAILABLE);
        assert_eq!(listing.image_url, None);
        assert_eq!(listing.detail_url, None);
        assert_eq!(listing.year, None);
        assert_eq!(listing.mileage_text, None);
        assert_eq!(listing.fuel, None);
        assert_eq!(listing.transmission, None);
        assert_eq!(listing.color, None);
        assert_eq!(listing.source_name, SourceName::Olx);
        assert!(!listing.has_substance());
    }

    #[test]
    fn no_field_is_ever_an_empty_string() {
        let raw = RawListing {
            title: Some("   ".into()),
            price: Some("".into()),
            location: Some(" \n ".into()),
            description: Some("".into()),
            fuel: Some("  ".into()),
            ..RawListing::default()
        };
        let listing = normalizer().normalize(raw, SourceName::Webmotors);

        assert_eq!(listing.title, TITLE_UNAVAILABLE);
        assert_eq!(listing.price, PRICE_UNAVAILABLE);
        assert_eq!(listing.location, LOCATION_UNAVAILABLE);
        assert_eq!(listing.description, DESCRIPTION_UNAVAILABLE);
        assert_eq!(listing.fuel, None);
    }

    #[test]
    fn fields_run_through_the_cleaners() {
        let raw = RawListing {
            title: Some("  Honda Civic EXL  ".into()),
            price: Some("R$ 75.000".into()),
            location: Some("São   Paulo  -  SP".into()),
            year: Some("Ano 2018 - Flex".into()),
            mileage: Some("45.000 km rodados".into()),
            color: Some("prata metálico".into()),
            ..RawListing::default()
        };
        let listing = normalizer().normalize(raw, SourceName::Icarros);

        assert_eq!(listing.title, "Honda Civic EXL");
        assert_eq!(listing.price, "75.000");
        assert_eq!(listing.location, "São Paulo - SP");
        assert_eq!(listing.year, Some("2018".into()));
        assert_eq!(listing.mileage_text, Some("45.000 km".into()));
        assert_eq!(listing.color, Some("Prata".into()));
    }

    #[test]
    fn source_provided_id_is_kept() {
        let raw = RawListing {
            id: Some("wm-12345".into()),
            title: Some("Civic".into()),
            ..RawListing::default()
        };
        let listing = normalizer().normalize(raw, SourceName::Webmotors);
        assert_eq!(listing.id, "wm-12345");
    }

    #[test]
    fn missing_id_comes_from_the_id_source() {
        let listing = normalizer().normalize(RawListing::default(), SourceName::Olx);
        assert_eq!(listing.id, "test_0");
    }

    #[test]
    fn timestamp_ids_are_unique_across_clones() {
        let ids = TimestampIdSource::new();
        let sibling = ids.clone();

        let a = ids.next_id(SourceName::Olx);
        let b = sibling.next_id(SourceName::Olx);

        assert!(a.starts_with("olx_"));
        assert_ne!(a, b);
    }
}
