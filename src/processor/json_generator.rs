use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::OutputConfig;
use crate::error::AppError;
use crate::scraping::ScrapeReport;

/// Writes the run result as the `{ "count": N, "reviews": [...] }` report.
pub struct JsonGenerator {
    output_path: PathBuf,
}

impl JsonGenerator {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            output_path: config.path,
        }
    }

    pub fn generate(&self, report: &ScrapeReport) -> Result<(), AppError> {
        let file = BufWriter::new(File::create(&self.output_path)?);
        serde_json::to_writer_pretty(file, report)?;
        Ok(())
    }
}
