use std::time::Duration;

use fantoccini::{Client, Locator};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::ScrapeConfig;
use crate::error::AppError;

/// The clickable tab that switches the product page to its review section.
const REVIEW_TAB: &str = r#"[data-name="REVIEW"]"#;

/// Address markers of the documents known to host the review list.
const FRAME_URL_MARKERS: [&str; 2] = ["review", "pstatic"];

/// Where the review cards ended up after locating.
///
/// `ReviewFrame` means the client has been switched into the nested
/// sub-document; `TopLevel` is the older layout (or the fallback when the
/// tab or frame never appeared) where cards render in the page itself.
/// Downstream code reads the current browsing context either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    ReviewFrame,
    TopLevel,
}

#[derive(Debug, PartialEq, Eq)]
enum TabOutcome {
    Clicked,
    NotFound,
}

/// Brings review cards into a reachable document and reports which one.
///
/// Neither a missing tab nor a missing frame is an error; both resolve to
/// the top-level fallback so template variations degrade instead of failing.
pub async fn locate_review_source(
    client: &Client,
    cfg: &ScrapeConfig,
) -> Result<ContentSource, AppError> {
    match open_review_tab(client, cfg).await? {
        TabOutcome::Clicked => {}
        TabOutcome::NotFound => {
            info!("review tab never appeared; reading the top-level document");
            return Ok(ContentSource::TopLevel);
        }
    }

    if enter_review_frame(client, cfg).await? {
        Ok(ContentSource::ReviewFrame)
    } else {
        info!("no review frame detected; reading the top-level document");
        Ok(ContentSource::TopLevel)
    }
}

/// Scroll-hunts for the review tab and clicks it once. Bounded by the
/// configured attempt ceiling; exhaustion is the soft not-found outcome.
async fn open_review_tab(client: &Client, cfg: &ScrapeConfig) -> Result<TabOutcome, AppError> {
    for attempt in 0..cfg.tab_poll_attempts {
        match client.find(Locator::Css(REVIEW_TAB)).await {
            Ok(tab) => {
                if tab.is_displayed().await? {
                    client
                        .execute(
                            "arguments[0].scrollIntoView({block: 'center'});",
                            vec![serde_json::to_value(&tab)?],
                        )
                        .await?;
                    tab.click().await?;
                    debug!(attempt, "review tab clicked");
                    return Ok(TabOutcome::Clicked);
                }
            }
            Err(e) if e.is_no_such_element() => {}
            Err(e) => return Err(e.into()),
        }

        client
            .execute(
                "window.scrollBy(0, arguments[0]);",
                vec![cfg.scroll_step.into()],
            )
            .await?;
        sleep(Duration::from_millis(cfg.tab_poll_interval_ms)).await;
    }

    Ok(TabOutcome::NotFound)
}

/// Polls the loaded iframes for one whose address matches a review-host
/// marker and switches the client into it.
async fn enter_review_frame(client: &Client, cfg: &ScrapeConfig) -> Result<bool, AppError> {
    for _ in 0..cfg.frame_poll_attempts {
        for frame in client.find_all(Locator::Css("iframe")).await? {
            // A frame can go stale mid-poll while the page rerenders.
            let src = match frame.attr("src").await {
                Ok(Some(src)) => src,
                _ => continue,
            };
            if is_review_frame_src(&src) {
                info!(%src, "review frame detected");
                frame.enter_frame().await?;
                return Ok(true);
            }
        }
        sleep(Duration::from_millis(cfg.frame_poll_interval_ms)).await;
    }

    Ok(false)
}

fn is_review_frame_src(src: &str) -> bool {
    let lower = src.to_lowercase();
    FRAME_URL_MARKERS.iter().any(|marker| lower.contains(marker))
}
