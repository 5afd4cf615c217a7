use std::path::PathBuf;

use config::Config;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cli::CliArgs;
use crate::error::AppError;

/// Desktop Chrome identity presented to the store; sessions replayed from a
/// person's cookie export should look like a person's browser.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub webdriver: WebDriverConfig,
    pub browser: BrowserConfig,
    #[validate(nested)]
    pub scrape: ScrapeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct WebDriverConfig {
    /// WebDriver endpoint (chromedriver) this run connects to.
    #[validate(length(min = 1, message = "WebDriver URL cannot be empty"))]
    pub url: String,
    pub headless: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4444".to_string(),
            headless: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub locale: String,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            locale: "ko-KR".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Bounds for the run loop: how far pagination goes, how long rendered
/// state gets to settle, and the (attempts, interval) pairs of the two
/// polling loops in the content locator.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct ScrapeConfig {
    #[validate(range(min = 1, message = "page limit must be at least 1"))]
    pub page_limit: u32,
    pub nav_settle_ms: u64,
    pub page_settle_ms: u64,
    #[validate(range(min = 1, message = "poll attempts must be at least 1"))]
    pub tab_poll_attempts: u32,
    pub tab_poll_interval_ms: u64,
    #[validate(range(min = 1, message = "poll attempts must be at least 1"))]
    pub frame_poll_attempts: u32,
    pub frame_poll_interval_ms: u64,
    /// Wheel increment in pixels while hunting for the review tab.
    pub scroll_step: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            page_limit: 10,
            nav_settle_ms: 2000,
            page_settle_ms: 2000,
            tab_poll_attempts: 40,
            tab_poll_interval_ms: 200,
            frame_poll_attempts: 80,
            frame_poll_interval_ms: 250,
            scroll_step: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("reviews.csv"),
            format: OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl AppConfig {
    /// Loads the optional config file and merges CLI overrides on top, then
    /// validates the result.
    pub fn load_with_cli_args(cli_args: &CliArgs) -> Result<Self, AppError> {
        let mut builder = Config::builder()
            .add_source(config::File::with_name("smartstore").required(false));

        if let Some(config_path) = &cli_args.config {
            builder = builder.add_source(config::File::from(config_path.clone()));
        }

        if let Some(pages) = cli_args.pages {
            builder = builder.set_override("scrape.page_limit", i64::from(pages))?;
        }
        if cli_args.headless {
            builder = builder.set_override("webdriver.headless", true)?;
        }
        if let Some(webdriver_url) = &cli_args.webdriver_url {
            builder = builder.set_override("webdriver.url", webdriver_url.clone())?;
        }
        if let Some(output) = &cli_args.output {
            builder =
                builder.set_override("output.path", output.to_string_lossy().to_string())?;
        }
        if let Some(format) = cli_args.format {
            builder = builder.set_override("output.format", format.as_str())?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = AppConfig::default();
        assert_eq!(config.webdriver.url, "http://localhost:4444");
        assert!(!config.webdriver.headless);
        assert_eq!(config.browser.locale, "ko-KR");
        assert_eq!(config.browser.viewport_width, 1280);
        assert_eq!(config.browser.viewport_height, 720);
        assert_eq!(config.scrape.page_limit, 10);
        assert_eq!(config.scrape.tab_poll_attempts, 40);
        assert_eq!(config.scrape.frame_poll_attempts, 80);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn zero_page_limit_fails_validation() {
        let mut config = AppConfig::default();
        config.scrape.page_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_poll_attempts_fail_validation() {
        let mut config = AppConfig::default();
        config.scrape.frame_poll_attempts = 0;
        assert!(config.validate().is_err());
    }
}
