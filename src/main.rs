use std::error::Error;

mod app;
mod cli;
mod config;
mod error;
mod processor;
mod scraping;

use app::App;
use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args = CliArgs::parse_args();
    cli_args.validate()?;

    let log_level = match cli_args.log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    tracing::info!("Starting SmartStore review exporter");

    let config = config::AppConfig::load_with_cli_args(&cli_args)?;
    let mut app = App::new(config, cli_args.url.clone(), cli_args.cookies.clone());

    // The run itself defines no mid-flight cancellation; Ctrl-C ends the
    // process and the WebDriver service reclaims the session.
    tokio::select! {
        result = app.run() => {
            match result {
                Ok(()) => tracing::info!("Export completed successfully"),
                Err(e) => {
                    tracing::error!("Export failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted before the run finished");
        }
    }

    Ok(())
}
