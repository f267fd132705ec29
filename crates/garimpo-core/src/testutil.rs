//! Test utilities: handwritten mock implementations of the core traits.
//!
//! Mocks hold their scripted responses behind `Arc<Mutex<_>>` so clones
//! share one queue and tests can assert on recorded calls.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::error::ScrapeError;
use crate::models::{FetchedPage, Listing, SearchRequest, SourceBatch, SourceName};
use crate::traits::{IdSource, PageFetcher, PageRenderer, SourceExtractor};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock direct fetcher with a queue of scripted responses. Each call pops
/// the front; an empty queue answers a default 200 page.
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Mutex<Vec<Result<FetchedPage, ScrapeError>>>>,
}

impl MockFetcher {
    /// Always answer 200 with the given body.
    pub fn ok(body: &str) -> Self {
        Self::with_page(FetchedPage {
            status: 200,
            body: body.to_string(),
        })
    }

    pub fn with_page(page: FetchedPage) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Ok(page)])),
        }
    }

    pub fn with_error(error: ScrapeError) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Err(error)])),
        }
    }

    pub fn with_responses(responses: Vec<Result<FetchedPage, ScrapeError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch(&self, _url: &str, _referer: &str) -> Result<FetchedPage, ScrapeError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(FetchedPage {
                status: 200,
                body: "<html><body>default</body></html>".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

/// Mock render fallback that records how often it was invoked.
#[derive(Clone)]
pub struct MockRenderer {
    responses: Arc<Mutex<Vec<Result<String, ScrapeError>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockRenderer {
    /// A renderer the test expects never to be called; if it is anyway, it
    /// errors and the call counter gives it away.
    pub fn unused() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_document(body: &str) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Ok(body.to_string())])),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_error(error: ScrapeError) -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![Err(error)])),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of render invocations across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageRenderer for MockRenderer {
    async fn render(&self, _url: &str, _referer: &str) -> Result<String, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(ScrapeError::Render("no scripted response".to_string()))
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// FixedIdSource
// ---------------------------------------------------------------------------

/// Deterministic id source: `test_0`, `test_1`, ...
#[derive(Clone, Default)]
pub struct FixedIdSource {
    counter: Arc<AtomicU64>,
}

impl FixedIdSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for FixedIdSource {
    fn next_id(&self, _source: SourceName) -> String {
        format!("test_{}", self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// StaticExtractor
// ---------------------------------------------------------------------------

/// Source extractor with a canned outcome, for orchestrator tests.
#[derive(Clone)]
pub struct StaticExtractor {
    source: SourceName,
    listings: Vec<Listing>,
    failure: Option<String>,
}

impl StaticExtractor {
    pub fn succeeding(source: SourceName, listings: Vec<Listing>) -> Self {
        Self {
            source,
            listings,
            failure: None,
        }
    }

    pub fn failing(source: SourceName, cause: &str) -> Self {
        Self {
            source,
            listings: Vec::new(),
            failure: Some(cause.to_string()),
        }
    }
}

impl SourceExtractor for StaticExtractor {
    fn source(&self) -> SourceName {
        self.source
    }

    async fn extract(&self, _request: &SearchRequest) -> Result<SourceBatch, ScrapeError> {
        if let Some(cause) = &self.failure {
            return Err(ScrapeError::extraction(self.source, cause.clone()));
        }
        Ok(SourceBatch {
            source: self.source,
            listings: self.listings.clone(),
            total_found: self.listings.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Listing builders
// ---------------------------------------------------------------------------

/// A listing with a real title/price and a couple of populated optionals.
pub fn sample_listing(source: SourceName, title: &str, price: &str) -> Listing {
    Listing {
        id: format!("{}_{}", source.id_prefix(), title.len()),
        title: title.to_string(),
        price: price.to_string(),
        location: "São Paulo - SP".to_string(),
        description: "Único dono, revisões em dia".to_string(),
        image_url: Some("https://cdn.example/car.jpg".to_string()),
        detail_url: Some("https://example.com/anuncio/1".to_string()),
        year: None,
        mileage_text: None,
        fuel: None,
        transmission: None,
        color: None,
        source_name: source,
        scraped_at: Utc::now(),
    }
}

/// `count` distinct priced listings for one source.
pub fn sample_listings(source: SourceName, count: usize) -> Vec<Listing> {
    (0..count)
        .map(|i| {
            let mut listing = sample_listing(
                source,
                &format!("{} anúncio {i}", source.as_str()),
                &format!("{}.000", 30 + i),
            );
            listing.id = format!("{}_{i}", source.id_prefix());
            listing
        })
        .collect()
}
