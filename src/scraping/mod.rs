mod extractor;
mod guard;
mod locator;
mod models;
mod paginator;
pub mod session;


pub use models::{Review, ScrapeReport};
pub use session::{normalize_cookies, parse_cookie_export, SessionCookie};

use std::time::Duration;

use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::config::AppConfig;
use crate::error::AppError;
use locator::ContentSource;

/// One scraping run: owns the browser session from bootstrap to close.
///
/// The session is isolated per run and released on every exit path,
/// including the service-unavailable abort and any extraction failure.
pub struct Scraper {
    client: Client,
    config: AppConfig,
    target: Url,
}

impl Scraper {
    /// Opens one isolated browser session configured with the locale,
    /// user-agent, and window size, then replays the normalized session
    /// cookies into it.
    ///
    /// WebDriver only accepts cookies matching the current document's
    /// domain, so the store origin is loaded once before injection; the
    /// product page itself is not navigated to until [`Scraper::run`].
    /// Any failure here closes the session and aborts before that
    /// navigation, so partial session state is never used.
    pub async fn connect(
        config: &AppConfig,
        cookies: &[SessionCookie],
        target: &str,
    ) -> Result<Self, AppError> {
        let target = Url::parse(target)
            .map_err(|e| AppError::InvalidUrl(format!("{target}: {e}")))?;

        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(config))
            .connect(&config.webdriver.url)
            .await?;

        let scraper = Self {
            client,
            config: config.clone(),
            target,
        };

        if !cookies.is_empty() {
            if let Err(e) = scraper.inject_cookies(cookies).await {
                scraper.close().await;
                return Err(e);
            }
        }

        Ok(scraper)
    }

    /// Navigates to the product page, collects every review page, and
    /// closes the session no matter how the run ended.
    pub async fn run(self) -> Result<ScrapeReport, AppError> {
        let result = self.scrape().await;
        self.close().await;
        result
    }

    async fn scrape(&self) -> Result<ScrapeReport, AppError> {
        info!(url = %self.target, "navigating to product page");
        self.client.goto(self.target.as_str()).await?;
        sleep(Duration::from_millis(self.config.scrape.nav_settle_ms)).await;

        guard::ensure_available(&self.client.source().await?)?;

        let source = locator::locate_review_source(&self.client, &self.config.scrape).await?;
        match source {
            ContentSource::ReviewFrame => info!("collecting reviews from the nested frame"),
            ContentSource::TopLevel => info!("collecting reviews from the page itself"),
        }

        let reviews = paginator::collect_reviews(&self.client, &self.config.scrape).await?;
        Ok(ScrapeReport::new(reviews))
    }

    async fn inject_cookies(&self, cookies: &[SessionCookie]) -> Result<(), AppError> {
        let origin = store_origin(&self.target)?;
        self.client.goto(&origin).await?;
        for cookie in cookies {
            self.client.add_cookie(cookie.to_webdriver_cookie()).await?;
        }
        info!(count = cookies.len(), "session cookies injected");
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.client.clone().close().await {
            warn!(error = %e, "browser session did not close cleanly");
        }
    }
}

/// The store origin used to prime the session before cookie injection.
fn store_origin(target: &Url) -> Result<String, AppError> {
    let origin = target.origin().ascii_serialization();
    if origin == "null" {
        return Err(AppError::InvalidUrl(format!(
            "{target}: URL has no usable origin"
        )));
    }
    Ok(origin)
}

/// Chrome capabilities for a session that looks like a person's browser:
/// pinned locale, desktop user-agent, and a regular viewport, with the
/// automation banner disabled.
fn chrome_capabilities(config: &AppConfig) -> serde_json::map::Map<String, serde_json::Value> {
    let browser = &config.browser;
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--no-sandbox".to_string(),
        format!("--lang={}", browser.locale),
        format!("--user-agent={}", browser.user_agent),
        format!(
            "--window-size={},{}",
            browser.viewport_width, browser.viewport_height
        ),
    ];
    if config.webdriver.headless {
        args.push("--headless=new".to_string());
    }

    let mut caps = serde_json::map::Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}
