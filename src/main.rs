use std::path::PathBuf;

use clap::Parser;

use auth_api::{app, config::AppConfig, state::AppState};

#[derive(Parser)]
#[command(name = "auth-api")]
#[command(about = "User management service")]
struct Args {
    /// Path to the dotenv file loaded before reading the environment
    #[arg(long, default_value = ".env")]
    config_path: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let loaded = dotenvy::from_path(&args.config_path);

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "auth_api=debug,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    if let Err(e) = loaded {
        tracing::warn!(path = %args.config_path.display(), error = %e, "config file not loaded; using process environment");
    }

    let config = AppConfig::from_env()?;
    let state = AppState::init(&config).await?;

    app::serve(app::build_app(state), &config.address()).await
}
