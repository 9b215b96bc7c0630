#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use medici::api::ApiClient;
use medici::config::Config;
use medici::logging;
use medici::tui::App;

#[derive(Parser)]
#[command(
    name = "medici",
    about = "Apply for education funding or join the donor waitlist",
    version,
    long_about = None
)]
struct Cli {
    /// Config file to load instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// API origin; overrides the config file and MEDICI_API_URL.
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Where to write the log file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.clone().or_else(logging::default_log_path) {
        logging::init(&path)?;
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    let client = Arc::new(ApiClient::new(&config.api)?);
    info!(api = %client.base_url(), "starting medici");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(config, client.clone(), client);
    let result = app.run(&mut terminal).await;

    let restore_result = restore_terminal();
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
