use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use garimpo_core::error::ScrapeError;
use garimpo_core::traits::PageRenderer;

/// User-agent for rendered navigations.
const RENDER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Render-fallback tunables.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Overall bound on one render call, launch to captured document.
    pub navigation_timeout: Duration,
    /// Fixed pause after DOM-ready so lazy-loaded listings populate.
    pub settle_delay: Duration,
    /// Explicit browser executable. `None` resolves via `CHROME_BIN`,
    /// well-known install paths, then chromiumoxide's own lookup.
    pub executable: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(90),
            settle_delay: Duration::from_millis(1500),
            executable: None,
        }
    }
}

/// Headless-Chromium render fallback.
///
/// Every call launches its own browser process, navigates with a realistic
/// user-agent and the caller's referer, waits for navigation plus a short
/// settle delay, captures the rendered DOM, and tears the browser down
/// unconditionally — success, error, or timeout. Nothing is pooled or
/// shared between concurrent extractions.
#[derive(Clone, Default)]
pub struct ChromiumRenderer {
    config: RenderConfig,
}

impl ChromiumRenderer {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ScrapeError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        if let Some(bin) = self
            .config
            .executable
            .clone()
            .or_else(Self::find_chrome_binary)
        {
            tracing::debug!(binary = %bin.display(), "using explicit Chrome binary");
            builder = builder.chrome_executable(bin);
        }

        builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .build()
            .map_err(ScrapeError::Render)
    }

    /// Locates a Chrome/Chromium binary: the `CHROME_BIN` override first,
    /// then well-known install locations. `None` lets chromiumoxide run its
    /// own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        let candidates: &[&str] = &[
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];

        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }

    async fn navigate(browser: &Browser, url: &str, referer: &str, settle: Duration) -> Result<String, ScrapeError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| ScrapeError::Render(format!("failed to open page: {err}")))?;

        page.set_user_agent(RENDER_USER_AGENT)
            .await
            .map_err(|err| ScrapeError::Render(format!("failed to set user agent: {err}")))?;

        let params = NavigateParams::builder()
            .url(url)
            .referrer(referer)
            .build()
            .map_err(ScrapeError::Render)?;
        page.goto(params)
            .await
            .map_err(|err| ScrapeError::Render(format!("navigation to {url} failed: {err}")))?;
        page.wait_for_navigation()
            .await
            .map_err(|err| ScrapeError::Render(format!("page did not become ready: {err}")))?;

        // Lazy-loaded listing grids populate shortly after DOM-ready.
        tokio::time::sleep(settle).await;

        let html = page
            .content()
            .await
            .map_err(|err| ScrapeError::Render(format!("failed to capture document: {err}")))?;
        let _ = page.close().await;
        Ok(html)
    }
}

impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str, referer: &str) -> Result<String, ScrapeError> {
        tracing::info!(url, "render fallback");

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|err| ScrapeError::Render(format!("failed to launch browser: {err}")))?;

        // The CDP connection only makes progress while the handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::debug!("browser CDP handler finished: {event:?}");
                    break;
                }
            }
        });

        let outcome = tokio::time::timeout(
            self.config.navigation_timeout,
            Self::navigate(&browser, url, referer, self.config.settle_delay),
        )
        .await;

        // Teardown happens on every path out of this function; a render
        // call must never leak a running browser process.
        let _ = browser.close().await;
        let _ = browser.wait().await;
        handler_task.abort();

        match outcome {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Timeout(
                self.config.navigation_timeout.as_secs(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_match_the_render_contract() {
        let config = RenderConfig::default();
        assert_eq!(config.navigation_timeout, Duration::from_secs(90));
        assert_eq!(config.settle_delay, Duration::from_millis(1500));
        assert!(config.executable.is_none());
    }

    #[test]
    fn browser_config_builds_without_a_real_browser() {
        let renderer = ChromiumRenderer::with_config(RenderConfig {
            executable: Some(PathBuf::from("/usr/bin/true")),
            ..RenderConfig::default()
        });
        assert!(renderer.browser_config().is_ok());
    }
}
