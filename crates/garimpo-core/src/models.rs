use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clean::{
    DESCRIPTION_UNAVAILABLE, LOCATION_UNAVAILABLE, PRICE_UNAVAILABLE, TITLE_UNAVAILABLE,
};

/// The fixed set of listing sites the pipeline scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceName {
    #[serde(rename = "OLX")]
    Olx,
    Webmotors,
    #[serde(rename = "iCarros")]
    Icarros,
}

impl SourceName {
    /// Wire/display name, matching the per-source status keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Olx => "OLX",
            SourceName::Webmotors => "Webmotors",
            SourceName::Icarros => "iCarros",
        }
    }

    /// Lowercase prefix used when deriving listing ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SourceName::Olx => "olx",
            SourceName::Webmotors => "webmotors",
            SourceName::Icarros => "icarros",
        }
    }
}

impl std::fmt::Display for SourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed direct fetch: any response the server actually answered
/// with a status below 500. Server errors and network failures surface as
/// `ScrapeError::Transport` instead.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    /// The only status whose body is used without the render fallback.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Client-blocking status (bot walls answer 403).
    pub fn is_blocked(&self) -> bool {
        self.status == 403
    }
}

/// One normalized vehicle listing in the canonical cross-source schema.
///
/// Immutable once produced by the normalizer. String fields that the source
/// did not provide carry the documented sentinel; optional fields are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub year: Option<String>,
    pub mileage_text: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub color: Option<String>,
    pub source_name: SourceName,
    pub scraped_at: DateTime<Utc>,
}

impl Listing {
    /// A real (non-sentinel) title was extracted.
    pub fn has_title(&self) -> bool {
        self.title != TITLE_UNAVAILABLE
    }

    /// A real (non-sentinel) price was extracted.
    pub fn is_priced(&self) -> bool {
        self.price != PRICE_UNAVAILABLE
    }

    /// Invariant gate: a listing must carry a real title or a real price to
    /// survive extraction.
    pub fn has_substance(&self) -> bool {
        self.has_title() || self.is_priced()
    }

    /// Number of populated canonical fields, used as the ranking tie-break.
    /// Sentinel values count as missing.
    pub fn completeness(&self) -> usize {
        let mut count = 0;
        if self.has_title() {
            count += 1;
        }
        if self.is_priced() {
            count += 1;
        }
        if self.location != LOCATION_UNAVAILABLE {
            count += 1;
        }
        if self.description != DESCRIPTION_UNAVAILABLE {
            count += 1;
        }
        count
            + [
                &self.image_url,
                &self.detail_url,
                &self.year,
                &self.mileage_text,
                &self.fuel,
                &self.transmission,
                &self.color,
            ]
            .iter()
            .filter(|field| field.is_some())
            .count()
    }
}

/// One source's successful extraction result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBatch {
    pub source: SourceName,
    pub listings: Vec<Listing>,
    /// Listings actually kept (post-discard, capped at the requested limit).
    pub total_found: usize,
}

/// Per-source entry in the response's status summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceStatus {
    Success {
        #[serde(rename = "adsCount")]
        ads_count: usize,
    },
    Error {
        error: String,
    },
}

impl SourceStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, SourceStatus::Error { .. })
    }
}

/// Immutable pipeline input. The boundary layer validates; the core assumes
/// a well-formed request (limit in [1, 50], default 10).
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query_text: String,
    pub location_filter: Option<String>,
    pub per_source_limit: usize,
}

/// Boundary-contract default for `per_source_limit`.
pub const DEFAULT_PER_SOURCE_LIMIT: usize = 10;

/// Boundary-contract upper bound for `per_source_limit`.
pub const MAX_PER_SOURCE_LIMIT: usize = 50;

impl SearchRequest {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            location_filter: None,
            per_source_limit: DEFAULT_PER_SOURCE_LIMIT,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_filter = Some(location.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.per_source_limit = limit;
        self
    }
}

/// The merged, ranked response handed back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub listings: Vec<Listing>,
    pub total_results: usize,
    pub per_source_status: BTreeMap<String, SourceStatus>,
    pub execution_time_ms: u64,
}
