//! Field-cleaning functions shared by every source.
//!
//! All functions are pure and total: any `Option<&str>` input (including
//! `None` and empty strings) produces a well-defined output, and applying a
//! cleaner to its own output is a no-op.

use std::sync::LazyLock;

use regex::Regex;

/// Sentinel for a listing whose title could not be extracted.
pub const TITLE_UNAVAILABLE: &str = "Título não disponível";
/// Sentinel for a listing with no usable price text.
pub const PRICE_UNAVAILABLE: &str = "Preço não informado";
/// Sentinel for a listing with no location text.
pub const LOCATION_UNAVAILABLE: &str = "Localização não informada";
/// Sentinel for a listing with no description text.
pub const DESCRIPTION_UNAVAILABLE: &str = "Descrição não disponível";

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year pattern"));

static MILEAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*km").expect("mileage pattern"));

/// Common vehicle colors, checked by substring against lowercased input.
const COMMON_COLORS: &[&str] = &[
    "branco", "preto", "prata", "cinza", "azul", "vermelho", "verde", "amarelo", "laranja",
    "rosa", "marrom", "bege", "dourado", "roxo", "violeta",
];

/// Strips price text down to digits, commas and dots, trimming leading and
/// trailing separators. Empty results become the price sentinel.
pub fn clean_price(text: Option<&str>) -> String {
    let Some(text) = text else {
        return PRICE_UNAVAILABLE.to_string();
    };
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let trimmed = kept.trim_matches([',', '.']);
    if trimmed.is_empty() {
        PRICE_UNAVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Collapses internal whitespace runs to single spaces and trims. Empty
/// results become the location sentinel.
pub fn clean_location(text: Option<&str>) -> String {
    let Some(text) = text else {
        return LOCATION_UNAVAILABLE.to_string();
    };
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        LOCATION_UNAVAILABLE.to_string()
    } else {
        collapsed
    }
}

/// Finds the first 4-digit year in the range 1900–2099.
pub fn clean_year(text: Option<&str>) -> Option<String> {
    let text = text?;
    YEAR_RE.find(text).map(|m| m.as_str().to_string())
}

/// Normalizes mileage text to `"<number> km"`. Text without a recognizable
/// mileage pattern passes through trimmed; empty input yields `None`.
pub fn clean_mileage(text: Option<&str>) -> Option<String> {
    let text = text?;
    if let Some(caps) = MILEAGE_RE.captures(text) {
        return Some(format!("{} km", &caps[1]));
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Maps color text onto the fixed vocabulary when possible (capitalized),
/// otherwise passes it through trimmed; empty input yields `None`.
pub fn clean_color(text: Option<&str>) -> Option<String> {
    let text = text?;
    let lowered = text.to_lowercase();
    let lowered = lowered.trim();
    if lowered.is_empty() {
        return None;
    }
    for color in COMMON_COLORS {
        if lowered.contains(color) {
            let mut chars = color.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => continue,
            };
            return Some(capitalized);
        }
    }
    Some(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_keeps_digits_commas_dots() {
        assert_eq!(clean_price(Some("R$ 45.000")), "45.000");
        assert_eq!(clean_price(Some("R$ 1.200,50")), "1.200,50");
        assert_eq!(clean_price(Some("a partir de 30000")), "30000");
    }

    #[test]
    fn price_trims_leading_and_trailing_separators() {
        assert_eq!(clean_price(Some(".45.000,")), "45.000");
        assert_eq!(clean_price(Some(",,1000..")), "1000");
    }

    #[test]
    fn price_sentinel_for_missing_or_textless_input() {
        assert_eq!(clean_price(None), PRICE_UNAVAILABLE);
        assert_eq!(clean_price(Some("")), PRICE_UNAVAILABLE);
        assert_eq!(clean_price(Some("sob consulta")), PRICE_UNAVAILABLE);
        assert_eq!(clean_price(Some(",.,")), PRICE_UNAVAILABLE);
    }

    #[test]
    fn location_collapses_whitespace() {
        assert_eq!(
            clean_location(Some("  São   Paulo \n SP ")),
            "São Paulo SP"
        );
        assert_eq!(clean_location(None), LOCATION_UNAVAILABLE);
        assert_eq!(clean_location(Some("   ")), LOCATION_UNAVAILABLE);
    }

    #[test]
    fn year_extracts_first_match_in_range() {
        assert_eq!(clean_year(Some("Ano 2015 - Flex")), Some("2015".into()));
        assert_eq!(clean_year(Some("1998/1999")), Some("1998".into()));
        assert_eq!(clean_year(Some("sem info")), None);
        assert_eq!(clean_year(Some("ano 1850")), None);
        assert_eq!(clean_year(None), None);
    }

    #[test]
    fn year_requires_word_boundaries() {
        assert_eq!(clean_year(Some("id 120150")), None);
    }

    #[test]
    fn mileage_normalizes_km_pattern() {
        assert_eq!(
            clean_mileage(Some("45.000 km rodados")),
            Some("45.000 km".into())
        );
        assert_eq!(clean_mileage(Some("80000KM")), Some("80000 km".into()));
        assert_eq!(clean_mileage(Some("  baixa km sem número  ")), Some("baixa km sem número".into()));
        assert_eq!(clean_mileage(Some("pouco rodado")), Some("pouco rodado".into()));
        assert_eq!(clean_mileage(Some("   ")), None);
        assert_eq!(clean_mileage(None), None);
    }

    #[test]
    fn color_maps_to_vocabulary_capitalized() {
        assert_eq!(clean_color(Some("PRATA metálico")), Some("Prata".into()));
        assert_eq!(clean_color(Some("azul marinho")), Some("Azul".into()));
        assert_eq!(clean_color(Some("grafite")), Some("grafite".into()));
        assert_eq!(clean_color(Some("  ")), None);
        assert_eq!(clean_color(None), None);
    }

    #[test]
    fn cleaners_are_idempotent() {
        let samples = [
            "R$ 45.000",
            "  São   Paulo - SP ",
            "Ano 2015 - Flex",
            "45.000 km rodados",
            "prata metálico",
            "",
            "sem info",
            ",.,",
        ];
        for s in samples {
            let once = clean_price(Some(s));
            assert_eq!(clean_price(Some(&once)), once, "clean_price on {s:?}");

            let once = clean_location(Some(s));
            assert_eq!(clean_location(Some(&once)), once, "clean_location on {s:?}");

            if let Some(once) = clean_year(Some(s)) {
                assert_eq!(clean_year(Some(&once)), Some(once.clone()), "clean_year on {s:?}");
            }

            if let Some(once) = clean_mileage(Some(s)) {
                assert_eq!(
                    clean_mileage(Some(&once)),
                    Some(once.clone()),
                    "clean_mileage on {s:?}"
                );
            }

            if let Some(once) = clean_color(Some(s)) {
                assert_eq!(clean_color(Some(&once)), Some(once.clone()), "clean_color on {s:?}");
            }
        }
    }

    #[test]
    fn sentinels_survive_their_own_cleaner() {
        assert_eq!(clean_price(Some(PRICE_UNAVAILABLE)), PRICE_UNAVAILABLE);
        assert_eq!(
            clean_location(Some(LOCATION_UNAVAILABLE)),
            LOCATION_UNAVAILABLE
        );
    }
}
