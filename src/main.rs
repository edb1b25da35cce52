use clap::Parser;
use film_library_api::cli::Cli;
use film_library_api::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and JWT_PRIVATE_KEY can live there
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("film_library_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match AppConfig::from_env() {
        Ok(config) => film_library_api::cli::run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
