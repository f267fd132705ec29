//! Source extractors: one generic engine, one declarative profile per site.
//!
//! Each site contributes a [`SourceProfile`] describing its URLs, selector
//! fallback chains and lazy-load image attributes; [`SiteExtractor`] runs
//! the same fetch → fallback → locate → extract pipeline for all of them.
//! New sources register a profile; the engine and orchestration stay
//! untouched.

pub mod icarros;
pub mod olx;
pub mod webmotors;

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::ScrapeError;
use crate::models::{SearchRequest, SourceBatch, SourceName};
use crate::normalize::{Normalizer, RawListing};
use crate::selectors::{SelectorChain, first_image_attr};
use crate::traits::{IdSource, PageFetcher, PageRenderer, SourceExtractor};

/// Declarative description of one listing site.
///
/// Selector arrays are ordered most specific/stable first; an empty array
/// means the site does not expose that field on its result cards.
#[derive(Debug, Clone, Copy)]
pub struct SourceProfile {
    pub source: SourceName,
    /// Origin used to absolutize relative detail links.
    pub base_url: &'static str,
    /// Fixed search path the query parameters are appended to.
    pub search_base: &'static str,
    /// Query-parameter name for the location filter.
    pub location_param: &'static str,
    pub referer: &'static str,
    /// Path fragment identifying listing detail links, for the generic
    /// anchor heuristic.
    pub listing_path: &'static str,
    pub listing_selectors: &'static [&'static str],
    pub title_selectors: &'static [&'static str],
    pub price_selectors: &'static [&'static str],
    pub location_selectors: &'static [&'static str],
    pub description_selectors: &'static [&'static str],
    pub year_selectors: &'static [&'static str],
    pub mileage_selectors: &'static [&'static str],
    pub fuel_selectors: &'static [&'static str],
    pub transmission_selectors: &'static [&'static str],
    pub color_selectors: &'static [&'static str],
    /// `<img>` attribute names tried in order (eager first, lazy-load after).
    pub image_attrs: &'static [&'static str],
}

impl SourceProfile {
    /// Builds the percent-encoded search URL for a query and optional
    /// location filter.
    pub fn search_url(&self, query: &str, location: Option<&str>) -> Result<String, ScrapeError> {
        let mut url = Url::parse(self.search_base).map_err(|err| {
            ScrapeError::Generic(format!("invalid search base for {}: {err}", self.source))
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(location) = location.filter(|l| !l.is_empty()) {
                pairs.append_pair(self.location_param, location);
            }
        }
        Ok(url.into())
    }
}

/// Pre-parsed selector chains for one profile.
struct FieldChains {
    listing: SelectorChain,
    title: SelectorChain,
    price: SelectorChain,
    location: SelectorChain,
    description: SelectorChain,
    year: SelectorChain,
    mileage: SelectorChain,
    fuel: SelectorChain,
    transmission: SelectorChain,
    color: SelectorChain,
    anchor: SelectorChain,
}

impl FieldChains {
    fn parse(profile: &SourceProfile) -> Self {
        Self {
            listing: SelectorChain::parse(profile.listing_selectors),
            title: SelectorChain::parse(profile.title_selectors),
            price: SelectorChain::parse(profile.price_selectors),
            location: SelectorChain::parse(profile.location_selectors),
            description: SelectorChain::parse(profile.description_selectors),
            year: SelectorChain::parse(profile.year_selectors),
            mileage: SelectorChain::parse(profile.mileage_selectors),
            fuel: SelectorChain::parse(profile.fuel_selectors),
            transmission: SelectorChain::parse(profile.transmission_selectors),
            color: SelectorChain::parse(profile.color_selectors),
            anchor: SelectorChain::parse(&["a[href]"]),
        }
    }
}

/// What one parse pass over a document produced. `fragments_found` is
/// tracked separately from the kept listings so the engine can distinguish
/// "page had no listing markup" (retry through the renderer) from "every
/// fragment was discarded" (a normal empty success).
struct Harvest {
    fragments_found: usize,
    listings: Vec<crate::models::Listing>,
}

/// Generic per-source extraction engine.
///
/// Fetches the search page directly, falls back to the headless renderer on
/// any non-200 outcome, locates listing fragments through the profile's
/// selector chain (then the anchor heuristic, then one render retry for
/// dynamically-populated pages), and normalizes up to `limit` fragments.
#[derive(Clone)]
pub struct SiteExtractor<F, R, I>
where
    F: PageFetcher,
    R: PageRenderer,
    I: IdSource + Clone,
{
    profile: SourceProfile,
    chains: std::sync::Arc<FieldChains>,
    fetcher: F,
    renderer: R,
    normalizer: Normalizer<I>,
}

impl<F, R, I> SiteExtractor<F, R, I>
where
    F: PageFetcher,
    R: PageRenderer,
    I: IdSource + Clone,
{
    pub fn new(profile: SourceProfile, fetcher: F, renderer: R, normalizer: Normalizer<I>) -> Self {
        Self {
            chains: std::sync::Arc::new(FieldChains::parse(&profile)),
            profile,
            fetcher,
            renderer,
            normalizer,
        }
    }

    async fn run(&self, request: &SearchRequest) -> Result<SourceBatch, ScrapeError> {
        let source = self.profile.source;
        let url = self
            .profile
            .search_url(&request.query_text, request.location_filter.as_deref())?;
        tracing::info!(source = %source, url = %url, "starting extraction");

        let mut used_render = false;
        let body = match self.fetcher.fetch(&url, self.profile.referer).await {
            Ok(page) if page.is_ok() => page.body,
            Ok(page) => {
                tracing::warn!(
                    source = %source,
                    status = page.status,
                    "direct fetch not usable, switching to render fallback"
                );
                used_render = true;
                self.render_document(&url).await?
            }
            Err(err) if err.triggers_render_fallback() => {
                tracing::warn!(
                    source = %source,
                    error = %err,
                    "direct fetch failed, switching to render fallback"
                );
                used_render = true;
                self.render_document(&url).await?
            }
            Err(err) => return Err(ScrapeError::extraction(source, err.to_string())),
        };

        let mut harvest = self.harvest(&body, request.per_source_limit);

        // Pages that populate results client-side come back as an empty
        // shell over plain HTTP; one render pass absorbs those.
        if harvest.fragments_found == 0 && !used_render {
            tracing::info!(source = %source, "no fragments in direct fetch, retrying rendered");
            let rendered = self.render_document(&url).await?;
            harvest = self.harvest(&rendered, request.per_source_limit);
        }

        if harvest.fragments_found == 0 {
            return Err(ScrapeError::extraction(
                source,
                "no listing fragments found after selector chain and render fallbacks",
            ));
        }

        tracing::info!(
            source = %source,
            fragments = harvest.fragments_found,
            kept = harvest.listings.len(),
            "extraction complete"
        );

        let total_found = harvest.listings.len();
        Ok(SourceBatch {
            source,
            listings: harvest.listings,
            total_found,
        })
    }

    async fn render_document(&self, url: &str) -> Result<String, ScrapeError> {
        let body = self
            .renderer
            .render(url, self.profile.referer)
            .await
            .map_err(|err| {
                ScrapeError::extraction(self.profile.source, format!("render fallback failed: {err}"))
            })?;
        if body.trim().is_empty() {
            return Err(ScrapeError::extraction(
                self.profile.source,
                "render fallback produced an empty document",
            ));
        }
        Ok(body)
    }

    /// One synchronous parse pass over a document. `Html` is not `Send`, so
    /// it lives and dies inside this function, never across an await.
    fn harvest(&self, body: &str, limit: usize) -> Harvest {
        let document = Html::parse_document(body);

        let mut fragments = self.chains.listing.first_match(&document);
        if fragments.is_empty() {
            fragments = self.anchor_fragments(&document);
        }

        let mut listings = Vec::new();
        for (index, fragment) in fragments.iter().enumerate() {
            if listings.len() >= limit {
                break;
            }
            match self.listing_from_fragment(fragment, index) {
                Ok(listing) => listings.push(listing),
                Err(err) => {
                    tracing::warn!(source = %self.profile.source, index, error = %err, "skipping fragment");
                }
            }
        }

        Harvest {
            fragments_found: fragments.len(),
            listings,
        }
    }

    /// Generic heuristic when every listing selector misses: anchors whose
    /// target matches the source's listing-URL path, minus script links.
    fn anchor_fragments<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.chains
            .anchor
            .first_match(document)
            .into_iter()
            .filter(|anchor| {
                anchor
                    .value()
                    .attr("href")
                    .is_some_and(|href| {
                        href.contains(self.profile.listing_path)
                            && !href.contains("javascript:")
                    })
            })
            .collect()
    }

    fn listing_from_fragment(
        &self,
        fragment: &ElementRef<'_>,
        index: usize,
    ) -> Result<crate::models::Listing, ScrapeError> {
        let raw = RawListing {
            id: None,
            title: self.chains.title.first_text(fragment),
            price: self.chains.price.first_text(fragment),
            location: self.chains.location.first_text(fragment),
            description: self.chains.description.first_text(fragment),
            image: first_image_attr(fragment, self.profile.image_attrs),
            url: self.detail_url(fragment),
            year: self.chains.year.first_text(fragment),
            mileage: self.chains.mileage.first_text(fragment),
            fuel: self.chains.fuel.first_text(fragment),
            transmission: self.chains.transmission.first_text(fragment),
            color: self.chains.color.first_text(fragment),
        };

        let listing = self.normalizer.normalize(raw, self.profile.source);
        if !listing.has_substance() {
            return Err(ScrapeError::Fragment(format!(
                "fragment {index} has neither title nor price"
            )));
        }
        Ok(listing)
    }

    /// The fragment's own `href` when the card is an anchor, else its first
    /// descendant link; relative targets are rewritten to absolute form.
    fn detail_url(&self, fragment: &ElementRef<'_>) -> Option<String> {
        let href = match fragment.value().attr("href") {
            Some(own) => own.to_string(),
            None => self
                .chains
                .anchor
                .first_element(fragment)?
                .value()
                .attr("href")?
                .to_string(),
        };
        if href.contains("javascript:") {
            return None;
        }
        if href.starts_with("http") {
            return Some(href);
        }
        Url::parse(self.profile.base_url)
            .ok()?
            .join(&href)
            .ok()
            .map(String::from)
    }
}

impl<F, R, I> SourceExtractor for SiteExtractor<F, R, I>
where
    F: PageFetcher,
    R: PageRenderer,
    I: IdSource + Clone,
{
    fn source(&self) -> SourceName {
        self.profile.source
    }

    async fn extract(&self, request: &SearchRequest) -> Result<SourceBatch, ScrapeError> {
        self.run(request).await
    }
}

/// The fixed source set, wired to one fetcher/renderer/normalizer triple.
pub fn standard_extractors<F, R, I>(
    fetcher: F,
    renderer: R,
    normalizer: Normalizer<I>,
) -> Vec<SiteExtractor<F, R, I>>
where
    F: PageFetcher,
    R: PageRenderer,
    I: IdSource + Clone,
{
    vec![
        SiteExtractor::new(
            olx::profile(),
            fetcher.clone(),
            renderer.clone(),
            normalizer.clone(),
        ),
        SiteExtractor::new(
            webmotors::profile(),
            fetcher.clone(),
            renderer.clone(),
            normalizer.clone(),
        ),
        SiteExtractor::new(icarros::profile(), fetcher, renderer, normalizer),
    ]
}
