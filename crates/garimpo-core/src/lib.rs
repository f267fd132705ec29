//! Core of the garimpo pipeline: canonical listing schema, field cleaning,
//! normalization, per-source extraction engines, and the search
//! orchestrator. All I/O goes through the traits in [`traits`], so this
//! crate is pure domain logic.

pub mod clean;
pub mod error;
pub mod models;
pub mod normalize;
pub mod rank;
pub mod search;
pub mod selectors;
pub mod sources;
pub mod testutil;
pub mod traits;

pub use error::ScrapeError;
pub use models::{Listing, SearchRequest, SearchResponse, SourceName, SourceStatus};
pub use normalize::{Normalizer, TimestampIdSource};
pub use search::{SearchConfig, SearchService};
pub use sources::{SiteExtractor, standard_extractors};
pub use traits::{IdSource, PageFetcher, PageRenderer, SourceExtractor};
