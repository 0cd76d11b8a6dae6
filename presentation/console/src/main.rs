use std::io::Write;

use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};

mod config;
mod console;
mod setup;

use config::app_config::AppConfig;
use console::command::{Command, CommandError};
use console::session::{Flow, Session};
use setup::dependency_injection::DependencyContainer;

/// Console entry point for the product catalog.
///
/// - config/: environment-driven settings (API, UI timings, date layouts)
/// - setup/: dependency wiring
/// - console/: command parsing, rendering and the screen session
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // 2. Load environment variables
    dotenv().ok();

    // 3. Load configuration
    let config = AppConfig::from_env();
    tracing::info!("Using products API at {}", config.api.base_url);

    // 4. Wire dependencies
    let container = DependencyContainer::new(&config)?;

    // 5. Run the console
    let mut session = Session::new(container, config.ui.display_format);
    session.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.parse::<Command>() {
            Ok(command) => {
                if session.execute(command).await == Flow::Quit {
                    break;
                }
            }
            Err(CommandError::Empty) => {}
            Err(e) => println!("{}", e),
        }
        session.print_toasts();
    }

    Ok(())
}
