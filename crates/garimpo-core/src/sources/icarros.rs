//! iCarros profile. The loosest selector set of the three — its markup has
//! no stable test hooks, so the chains end in `[class*=...]` substring
//! matches and the card chain ends in a bare `.card`.

use super::SourceProfile;
use crate::models::SourceName;

pub fn profile() -> SourceProfile {
    SourceProfile {
        source: SourceName::Icarros,
        base_url: "https://www.icarros.com.br",
        search_base: "https://www.icarros.com.br/comprar/carros",
        location_param: "localizacao",
        referer: "https://www.icarros.com.br/",
        listing_path: "/comprar/carros/",
        listing_selectors: &[
            r#"[data-testid="vehicle-card"]"#,
            ".vehicle-card",
            ".card-vehicle",
            ".card",
            r#"[class*="card"]"#,
        ],
        title_selectors: &[
            r#"[data-testid="vehicle-title"]"#,
            ".vehicle-title",
            "h2",
            "h3",
            ".title",
        ],
        price_selectors: &[
            r#"[data-testid="vehicle-price"]"#,
            ".vehicle-price",
            ".price",
            r#"[class*="price"]"#,
        ],
        location_selectors: &[
            r#"[data-testid="vehicle-location"]"#,
            ".vehicle-location",
            ".location",
            r#"[class*="location"]"#,
        ],
        description_selectors: &[
            r#"[data-testid="vehicle-description"]"#,
            ".vehicle-description",
            ".description",
        ],
        year_selectors: &[
            r#"[data-testid="vehicle-year"]"#,
            ".vehicle-year",
            ".year",
            r#"[class*="year"]"#,
        ],
        mileage_selectors: &[
            r#"[data-testid="vehicle-mileage"]"#,
            ".vehicle-mileage",
            ".mileage",
            r#"[class*="mileage"]"#,
        ],
        fuel_selectors: &[
            r#"[data-testid="vehicle-fuel"]"#,
            ".vehicle-fuel",
            ".fuel",
            r#"[class*="fuel"]"#,
        ],
        transmission_selectors: &[
            r#"[data-testid="vehicle-transmission"]"#,
            ".vehicle-transmission",
            ".transmission",
            r#"[class*="transmission"]"#,
        ],
        color_selectors: &[
            r#"[data-testid="vehicle-color"]"#,
            ".vehicle-color",
            ".color",
            r#"[class*="color"]"#,
        ],
        image_attrs: &["src", "data-src", "data-lazy-src", "data-original"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchRequest;
    use crate::normalize::Normalizer;
    use crate::sources::SiteExtractor;
    use crate::testutil::{FixedIdSource, MockFetcher, MockRenderer};
    use crate::traits::SourceExtractor;

    // No test hooks, only loose class names — exercises the substring end
    // of the chains.
    const PAGE: &str = r#"<html><body>
        <div class="listing-card-compact">
            <h3>Fiat Argo Drive 1.0</h3>
            <span class="card-price-value">R$ 62.900</span>
            <span class="seller-location">Belo Horizonte - MG</span>
            <span class="model-year">2021</span>
            <span class="vehicle-color">prata metálico</span>
            <a href="/comprar/carros/argo-2021">ver anúncio</a>
            <img data-original="https://img.icarros.com.br/argo.jpg">
        </div>
    </body></html>"#;

    #[tokio::test]
    async fn substring_selectors_catch_hookless_markup() {
        let site = SiteExtractor::new(
            profile(),
            MockFetcher::ok(PAGE),
            MockRenderer::unused(),
            Normalizer::new(FixedIdSource::new()),
        );

        let batch = site.extract(&SearchRequest::new("Argo")).await.unwrap();
        assert_eq!(batch.listings.len(), 1);

        let listing = &batch.listings[0];
        assert_eq!(listing.title, "Fiat Argo Drive 1.0");
        assert_eq!(listing.price, "62.900");
        assert_eq!(listing.location, "Belo Horizonte - MG");
        assert_eq!(listing.year.as_deref(), Some("2021"));
        assert_eq!(listing.color.as_deref(), Some("Prata"));
        assert_eq!(
            listing.detail_url.as_deref(),
            Some("https://www.icarros.com.br/comprar/carros/argo-2021")
        );
        assert_eq!(
            listing.image_url.as_deref(),
            Some("https://img.icarros.com.br/argo.jpg")
        );
    }

    #[test]
    fn data_original_is_the_last_image_fallback() {
        assert_eq!(profile().image_attrs.last(), Some(&"data-original"));
    }
}
