//! Relevance ordering for the merged result set.
//!
//! Priced listings sort before unpriced ones; among priced listings,
//! ascending numeric price; ties (and unparseable prices) fall back to
//! field-completeness, more complete first. The sort is stable, so listings
//! that compare equal keep their fan-in order.

use std::cmp::Ordering;

use crate::models::Listing;

/// Parses a cleaned price string into a number: non-digit characters other
/// than the comma are stripped, the comma is the decimal separator. Price
/// text that still doesn't parse (several commas, no digits) yields `None`.
pub fn parse_price(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    if kept.is_empty() {
        return None;
    }
    kept.replacen(',', ".", 1).parse().ok()
}

/// Relevance comparator over two listings.
pub fn compare(a: &Listing, b: &Listing) -> Ordering {
    let by_priced = b.is_priced().cmp(&a.is_priced());
    if by_priced != Ordering::Equal {
        return by_priced;
    }

    if a.is_priced() {
        if let (Some(price_a), Some(price_b)) = (parse_price(&a.price), parse_price(&b.price)) {
            match price_a.partial_cmp(&price_b) {
                Some(Ordering::Equal) | None => {}
                Some(ordering) => return ordering,
            }
        }
    }

    b.completeness().cmp(&a.completeness())
}

/// Stable in-place relevance sort.
pub fn sort_by_relevance(listings: &mut [Listing]) {
    listings.sort_by(compare);
}
