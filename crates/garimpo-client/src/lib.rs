//! I/O implementations of the garimpo core traits: a reqwest-based direct
//! fetcher and a headless-Chromium render fallback.

mod fetcher;
mod renderer;

pub use fetcher::ReqwestFetcher;
pub use renderer::{ChromiumRenderer, RenderConfig};
