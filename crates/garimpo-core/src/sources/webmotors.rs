//! Webmotors profile. Cards carry `data-testid` hooks and expose the full
//! vehicle attribute set except color.

use super::SourceProfile;
use crate::models::SourceName;

pub fn profile() -> SourceProfile {
    SourceProfile {
        source: SourceName::Webmotors,
        base_url: "https://www.webmotors.com.br",
        search_base: "https://www.webmotors.com.br/carros",
        location_param: "localizacao",
        referer: "https://www.webmotors.com.br/",
        listing_path: "/carros/",
        listing_selectors: &[
            r#"[data-testid="card-vehicle"]"#,
            ".card-vehicle",
            ".vehicle-card",
            r#"[data-testid="vehicle-card"]"#,
            ".card",
        ],
        title_selectors: &[
            r#"[data-testid="vehicle-title"]"#,
            ".vehicle-title",
            "h2",
            "h3",
        ],
        price_selectors: &[r#"[data-testid="vehicle-price"]"#, ".vehicle-price", ".price"],
        location_selectors: &[
            r#"[data-testid="vehicle-location"]"#,
            ".vehicle-location",
            ".location",
        ],
        description_selectors: &[
            r#"[data-testid="vehicle-description"]"#,
            ".vehicle-description",
            ".description",
        ],
        year_selectors: &[r#"[data-testid="vehicle-year"]"#, ".vehicle-year", ".year"],
        mileage_selectors: &[
            r#"[data-testid="vehicle-mileage"]"#,
            ".vehicle-mileage",
            ".mileage",
        ],
        fuel_selectors: &[r#"[data-testid="vehicle-fuel"]"#, ".vehicle-fuel", ".fuel"],
        transmission_selectors: &[
            r#"[data-testid="vehicle-transmission"]"#,
            ".vehicle-transmission",
            ".transmission",
        ],
        color_selectors: &[],
        image_attrs: &["src", "data-src", "data-lazy-src"],
    }
}
