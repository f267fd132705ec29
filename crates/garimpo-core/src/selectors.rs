//! Selector fallback chains over `scraper` documents.
//!
//! A chain is an ordered list of CSS selector patterns, most specific first.
//! Lookups try each pattern in turn and stop at the first that yields a
//! result, so a site redesign that kills the primary selector degrades to
//! the next one instead of to nothing.

use scraper::{ElementRef, Html, Selector};

/// An ordered fallback chain of parsed selectors.
///
/// Patterns that fail to parse are dropped with a warning at construction;
/// markup assumptions live in data, not in control flow.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    pub fn parse(patterns: &[&str]) -> Self {
        let selectors = patterns
            .iter()
            .filter_map(|pattern| match Selector::parse(pattern) {
                Ok(selector) => Some(selector),
                Err(err) => {
                    tracing::warn!(pattern, %err, "dropping unparseable selector");
                    None
                }
            })
            .collect();
        Self { selectors }
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// All elements matched by the first pattern that matches anything.
    pub fn first_match<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in &self.selectors {
            let matched: Vec<_> = document.select(selector).collect();
            if !matched.is_empty() {
                return matched;
            }
        }
        Vec::new()
    }

    /// First descendant element matched by any pattern, in chain order.
    pub fn first_element<'a>(&self, fragment: &ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| fragment.select(selector).next())
    }

    /// Trimmed text of the first descendant matched by the first pattern
    /// that yields non-empty text.
    pub fn first_text(&self, fragment: &ElementRef<'_>) -> Option<String> {
        for selector in &self.selectors {
            for element in fragment.select(selector) {
                let text = element_text(&element);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }
}

/// Whole-subtree text of an element, whitespace-trimmed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First non-empty attribute of the fragment's first `<img>`, trying the
/// given attribute names in priority order (`src` before the lazy-load
/// variants sites swap in).
pub fn first_image_attr(fragment: &ElementRef<'_>, attrs: &[&str]) -> Option<String> {
    let img_selector = Selector::parse("img").ok()?;
    let img = fragment.select(&img_selector).next()?;
    attrs
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn first_match_respects_priority_order() {
        let html = doc(
            r#"<div class="primary">one</div>
               <div class="fallback">two</div>
               <div class="fallback">three</div>"#,
        );
        let chain = SelectorChain::parse(&[".primary", ".fallback"]);
        let matched = chain.first_match(&html);
        assert_eq!(matched.len(), 1);
        assert_eq!(element_text(&matched[0]), "one");
    }

    #[test]
    fn first_match_falls_through_to_later_patterns() {
        let html = doc(r#"<div class="fallback">two</div><div class="fallback">three</div>"#);
        let chain = SelectorChain::parse(&[".primary", ".fallback"]);
        assert_eq!(chain.first_match(&html).len(), 2);
    }

    #[test]
    fn first_match_empty_when_nothing_matches() {
        let html = doc("<p>nothing here</p>");
        let chain = SelectorChain::parse(&[".primary", ".fallback"]);
        assert!(chain.first_match(&html).is_empty());
    }

    #[test]
    fn unparseable_patterns_are_dropped_not_fatal() {
        let chain = SelectorChain::parse(&["[[[", ".ok"]);
        let html = doc(r#"<div class="ok">kept</div>"#);
        assert_eq!(chain.first_match(&html).len(), 1);
    }

    #[test]
    fn first_text_skips_empty_matches() {
        let html = doc(
            r#"<article><h2>  </h2><span class="title">Honda Civic</span></article>"#,
        );
        let root = html.root_element();
        let chain = SelectorChain::parse(&["h2", ".title"]);
        assert_eq!(chain.first_text(&root), Some("Honda Civic".to_string()));
    }

    #[test]
    fn first_text_none_when_all_empty() {
        let html = doc("<article><h2> </h2></article>");
        let root = html.root_element();
        let chain = SelectorChain::parse(&["h2", ".title"]);
        assert_eq!(chain.first_text(&root), None);
    }

    #[test]
    fn image_attr_priority_prefers_src_then_lazy_variants() {
        let html = doc(r#"<div><img data-src="https://cdn.example/lazy.jpg"></div>"#);
        let root = html.root_element();
        assert_eq!(
            first_image_attr(&root, &["src", "data-src"]),
            Some("https://cdn.example/lazy.jpg".to_string())
        );

        let html = doc(
            r#"<div><img src="https://cdn.example/eager.jpg" data-src="https://cdn.example/lazy.jpg"></div>"#,
        );
        let root = html.root_element();
        assert_eq!(
            first_image_attr(&root, &["src", "data-src"]),
            Some("https://cdn.example/eager.jpg".to_string())
        );
    }

    #[test]
    fn image_attr_none_without_an_img() {
        let html = doc("<div><p>no picture</p></div>");
        let root = html.root_element();
        assert_eq!(first_image_attr(&root, &["src", "data-src"]), None);
    }
}
