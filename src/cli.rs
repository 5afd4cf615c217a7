use clap::Parser;
use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Product page URL to collect reviews from
    #[arg(value_name = "URL")]
    pub url: String,

    /// Cookie export JSON file used to replay a logged-in session
    #[arg(short = 'c', long, value_name = "FILE")]
    pub cookies: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Maximum number of review pages to visit
    #[arg(short, long, value_name = "N")]
    pub pages: Option<u32>,

    /// Run the browser in headless mode
    #[arg(long)]
    pub headless: bool,

    /// WebDriver endpoint to connect to
    #[arg(long, value_name = "URL")]
    pub webdriver_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Valid levels are: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if let Err(e) = url::Url::parse(&self.url) {
            return Err(format!("Invalid product URL '{}': {}", self.url, e));
        }

        if self.pages == Some(0) {
            return Err("pages must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(url: &str) -> CliArgs {
        CliArgs {
            url: url.to_string(),
            cookies: None,
            config: None,
            output: None,
            format: None,
            pages: None,
            headless: false,
            webdriver_url: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn accepts_a_product_url() {
        assert!(args("https://smartstore.naver.com/maca-mall/products/12491774443")
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_a_bad_url_and_bad_bounds() {
        assert!(args("not a url").validate().is_err());

        let mut zero_pages = args("https://smartstore.naver.com/x/products/1");
        zero_pages.pages = Some(0);
        assert!(zero_pages.validate().is_err());

        let mut bad_level = args("https://smartstore.naver.com/x/products/1");
        bad_level.log_level = "loud".to_string();
        assert!(bad_level.validate().is_err());
    }
}
