use std::time::Duration;

use fantoccini::{Client, Locator};
use tokio::time::sleep;
use tracing::{debug, info};

use super::extractor::{extract_page, CardSelectors};
use super::guard;
use super::models::{Review, ReviewAccumulator};
use crate::config::ScrapeConfig;
use crate::error::AppError;

/// Class of the block wrapping the numbered page anchors.
const PAGINATION_BLOCK: &str = "LiT9lKOVbw";

/// One full page visit: load the current markup, extract and merge its
/// cards, then seek the control for the next page number.
enum PageCycle {
    Loading(u32),
    Extracting { page: u32, html: String },
    Seeking(u32),
    Done,
}

/// Walks the paginated review list starting at page 1 and returns the
/// deduplicated, insertion-ordered result.
///
/// Termination is normal in both cases: the next-page control is absent
/// (end of the list) or the configured page limit is reached. The client is
/// expected to already sit in the content source picked by the locator.
pub async fn collect_reviews(
    client: &Client,
    cfg: &ScrapeConfig,
) -> Result<Vec<Review>, AppError> {
    let selectors = CardSelectors::new();
    let mut accumulator = ReviewAccumulator::new();
    let mut state = PageCycle::Loading(1);

    loop {
        state = match state {
            PageCycle::Loading(page) => {
                let html = client.source().await?;
                // A block can land mid-run; it must never pass as an
                // empty page.
                guard::ensure_available(&html)?;
                PageCycle::Extracting { page, html }
            }
            PageCycle::Extracting { page, html } => {
                let cards = extract_page(&html, &selectors);
                let found = cards.len();
                let mut fresh = 0usize;
                for review in cards {
                    if accumulator.merge(review) {
                        fresh += 1;
                    }
                }
                info!(
                    page,
                    cards = found,
                    new = fresh,
                    total = accumulator.len(),
                    "page extracted"
                );
                PageCycle::Seeking(page)
            }
            PageCycle::Seeking(page) => {
                if page >= cfg.page_limit {
                    debug!(page, "page limit reached");
                    PageCycle::Done
                } else if advance_to(client, page + 1).await? {
                    sleep(Duration::from_millis(cfg.page_settle_ms)).await;
                    PageCycle::Loading(page + 1)
                } else {
                    debug!(page, "no control for the next page");
                    PageCycle::Done
                }
            }
            PageCycle::Done => break,
        };
    }

    Ok(accumulator.into_reviews())
}

/// Clicks the pagination anchor whose normalized text is exactly the target
/// page number. A missing anchor is the normal end of the list, not an
/// error.
async fn advance_to(client: &Client, page: u32) -> Result<bool, AppError> {
    let locator = format!(
        r#"//*[contains(@class, "{PAGINATION_BLOCK}")]//a[normalize-space(.) = "{page}"]"#
    );
    match client.find(Locator::XPath(&locator)).await {
        Ok(anchor) => {
            anchor.click().await?;
            info!(page, "advanced to next page");
            Ok(true)
        }
        Err(e) if e.is_no_such_element() => Ok(false),
        Err(e) => Err(e.into()),
    }
}
