use std::future::Future;

use crate::error::ScrapeError;
use crate::models::{FetchedPage, SearchRequest, SourceBatch, SourceName};

/// Direct HTTP document fetch with a browser-like request signature.
///
/// Implementations complete any response below status 500 as a
/// [`FetchedPage`]; network failures, timeouts and 5xx responses are
/// `ScrapeError::Transport`/`Timeout`.
pub trait PageFetcher: Send + Sync + Clone {
    fn fetch(
        &self,
        url: &str,
        referer: &str,
    ) -> impl Future<Output = Result<FetchedPage, ScrapeError>> + Send;
}

/// Headless-browser document fetch, used when a source blocks the plain
/// HTTP path or only populates listings after client-side rendering.
///
/// Implementations must scope any browser instance to the single call and
/// release it unconditionally before returning.
pub trait PageRenderer: Send + Sync + Clone {
    fn render(
        &self,
        url: &str,
        referer: &str,
    ) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}

/// One registered listing source.
///
/// A failed extraction is scoped to this source: the orchestrator converts
/// the error into a status entry and the sibling sources are unaffected.
pub trait SourceExtractor: Send + Sync {
    fn source(&self) -> SourceName;

    fn extract(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SourceBatch, ScrapeError>> + Send;
}

/// Injected listing-id generator, keeping normalization deterministic in
/// tests. Production ids are `<source>_<epoch-millis>_<sequence>`.
pub trait IdSource: Send + Sync {
    fn next_id(&self, source: SourceName) -> String;
}
