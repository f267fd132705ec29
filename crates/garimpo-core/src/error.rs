use thiserror::Error;

use crate::models::SourceName;

/// Failure taxonomy for the scraping pipeline.
///
/// Fetch-stage variants (`Transport`, `Blocked`, `Timeout`) route a source
/// into the render fallback; `Extraction` is the terminal per-source failure
/// recorded in the response's status summary and never propagated past the
/// orchestrator.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Direct fetch could not complete, or the server answered with 5xx.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The source answered with a client-blocking status (e.g. 403).
    #[error("blocked by source (HTTP {0})")]
    Blocked(u16),

    /// A bounded operation exceeded its time limit.
    #[error("timed out after {0} seconds")]
    Timeout(u64),

    /// The headless-browser fallback failed to produce a document.
    #[error("render fallback failed: {0}")]
    Render(String),

    /// No listing fragments locatable after exhausting every fallback.
    /// Scoped to a single source.
    #[error("{source_name}: extraction failed: {cause}")]
    Extraction {
        source_name: SourceName,
        cause: String,
    },

    /// A single fragment could not become a Listing. Logged and skipped;
    /// never aborts the remaining fragments.
    #[error("fragment skipped: {0}")]
    Fragment(String),

    /// Anything that doesn't fit the categories above.
    #[error("{0}")]
    Generic(String),
}

impl ScrapeError {
    /// Returns true if a direct fetch ending in this error should be retried
    /// through the render fallback instead of failing the source outright.
    pub fn triggers_render_fallback(&self) -> bool {
        matches!(
            self,
            ScrapeError::Transport(_) | ScrapeError::Blocked(_) | ScrapeError::Timeout(_)
        )
    }

    /// Shorthand for the terminal per-source failure.
    pub fn extraction(source_name: SourceName, cause: impl Into<String>) -> Self {
        ScrapeError::Extraction {
            source_name,
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_stage_errors_trigger_render_fallback() {
        assert!(ScrapeError::Transport("connection reset".into()).triggers_render_fallback());
        assert!(ScrapeError::Blocked(403).triggers_render_fallback());
        assert!(ScrapeError::Timeout(30).triggers_render_fallback());
    }

    #[test]
    fn terminal_errors_do_not_trigger_render_fallback() {
        assert!(!ScrapeError::Render("no browser".into()).triggers_render_fallback());
        assert!(
            !ScrapeError::extraction(SourceName::Olx, "no fragments").triggers_render_fallback()
        );
        assert!(!ScrapeError::Fragment("empty".into()).triggers_render_fallback());
    }

    #[test]
    fn extraction_error_names_the_source() {
        let err = ScrapeError::extraction(SourceName::Webmotors, "no fragments");
        assert!(err.to_string().contains("Webmotors"));
    }
}
