use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::{AppConfig, OutputFormat};
use crate::error::AppError;
use crate::processor::{CsvGenerator, JsonGenerator, ProgressTracker};
use crate::scraping::{normalize_cookies, parse_cookie_export, ScrapeReport, Scraper, SessionCookie};

pub struct App {
    config: AppConfig,
    target: String,
    cookie_file: Option<PathBuf>,
    progress: ProgressTracker,
}

impl App {
    pub fn new(config: AppConfig, target: String, cookie_file: Option<PathBuf>) -> Self {
        Self {
            config,
            target,
            cookie_file,
            progress: ProgressTracker::new(),
        }
    }

    pub async fn run(&mut self) -> Result<(), AppError> {
        // Credential problems surface here, before any browser work.
        let cookies = self.load_session_cookies()?;

        self.progress.phase("Opening browser session");
        let scraper = Scraper::connect(&self.config, &cookies, &self.target).await?;

        self.progress.phase("Collecting reviews");
        let report = scraper.run().await?;
        info!(count = report.count, "collection finished");

        self.progress.phase("Writing output");
        self.write_output(&report)?;
        info!(path = %self.config.output.path.display(), "output written");

        self.progress.finish(report.count);
        Ok(())
    }

    fn load_session_cookies(&self) -> Result<Vec<SessionCookie>, AppError> {
        let Some(path) = &self.cookie_file else {
            info!("no cookie file given; running without a session");
            return Ok(Vec::new());
        };

        let body = fs::read_to_string(path)?;
        let raw = parse_cookie_export(&body)?;
        let cookies = normalize_cookies(&raw)?;
        info!(count = cookies.len(), "session cookies normalized");
        Ok(cookies)
    }

    fn write_output(&self, report: &ScrapeReport) -> Result<(), AppError> {
        match self.config.output.format {
            OutputFormat::Csv => {
                CsvGenerator::new(self.config.output.clone()).generate(&report.reviews)
            }
            OutputFormat::Json => JsonGenerator::new(self.config.output.clone()).generate(report),
        }
    }
}
