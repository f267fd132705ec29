//! OLX profile.
//!
//! Result cards are anchors (`[data-cy="l-card"]`); the `sc-*` class chains
//! are the styled-components hashes OLX shipped historically and rotate on
//! redesigns, which is why they sit behind the data attributes.

use super::SourceProfile;
use crate::models::SourceName;

pub fn profile() -> SourceProfile {
    SourceProfile {
        source: SourceName::Olx,
        base_url: "https://www.olx.com.br",
        search_base: "https://www.olx.com.br/estado-sp/regiao-de-sao-paulo/veiculos/carros",
        location_param: "location",
        referer: "https://www.olx.com.br/",
        listing_path: "/veiculos/carros/",
        listing_selectors: &[
            r#"[data-cy="l-card"]"#,
            ".sc-1wimjbb-1",
            ".sc-1wimjbb-0",
            r#"[data-testid="ad-card"]"#,
        ],
        title_selectors: &["h2", ".sc-1wimjbb-5", r#"[data-testid="ad-title"]"#],
        price_selectors: &[".sc-1wimjbb-6", r#"[data-testid="ad-price"]"#, ".price"],
        location_selectors: &[".sc-1wimjbb-7", r#"[data-testid="ad-location"]"#, ".location"],
        description_selectors: &[".sc-1wimjbb-8", ".description"],
        // OLX result cards don't expose the vehicle attributes below.
        year_selectors: &[],
        mileage_selectors: &[],
        fuel_selectors: &[],
        transmission_selectors: &[],
        color_selectors: &[],
        image_attrs: &["src", "data-src"],
    }
}
