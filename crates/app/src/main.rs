mod cli;
mod config;
mod quiz;

use aid_core::Clock;
use services::AppServices;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{ArgsError, Command};

const DEFAULT_LOG_FILTER: &str = "app=info,services=info,storage=warn";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url.starts_with("sqlite::memory:") || db_url.contains("mode=memory") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn run(cli: cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.command == Command::Help {
        cli::print_usage();
        return Ok(());
    }

    let config = config::load(cli.db_url)?;
    prepare_sqlite_file(&config.db_url)?;
    let services = AppServices::new_sqlite(&config.db_url, config.ai, Clock::default()).await?;

    match cli.command {
        Command::Quiz(mode) => quiz::run_quiz(&services, mode, tokio::io::stdin()).await,
        Command::Stats => quiz::show_stats(&services).await,
        Command::Import(path) => quiz::import_file(&services, &path).await,
        Command::Generate { topic, difficulty } => {
            quiz::generate(&services, topic, difficulty).await
        }
        Command::Ask(message) => {
            quiz::ask(&services, &message).await;
            Ok(())
        }
        Command::SetKey(key) => quiz::set_key(&services, &key).await,
        Command::Theme(theme) => quiz::set_theme(&services, theme).await,
        Command::Help => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = match cli::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            cli::print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
