//! Zoobotica server binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zoobotica_llm::{
    GeminiBackend, ImageBackend, LlmBackend, MockBackend, MockImageBackend, StabilityBackend,
};
use zoobotica_web::{routes, AppState, Config, ProfileStore};

const DEFAULT_FILTER: &str = "zoobotica_web=info,zoobotica_llm=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "zoobotica")]
#[command(about = "Zoobotica - biomimetic robot design studio")]
struct Cli {
    /// Config file (defaults to zoobotica.toml in this or a parent directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Use canned backends instead of the hosted APIs
    #[arg(long)]
    mock: bool,

    /// Print the default config and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    if cli.print_config {
        print!("{}", Config::default_toml()?);
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }

    let mut state = AppState::new(
        ProfileStore::new(&config.storage.data_dir),
        config.render.clone(),
    );

    if cli.mock {
        info!("using mock backends");
        state = state
            .with_llm(Arc::new(MockBackend::demo()))
            .with_images(Arc::new(MockImageBackend::new()));
    } else {
        match GeminiBackend::from_env_with_config(config.llm.clone()) {
            Ok(backend) => {
                info!(model = %config.llm.model, "text backend ready");
                state = state.with_llm(Arc::new(backend) as Arc<dyn LlmBackend>);
            }
            Err(e) => warn!("text generation disabled: {}", e),
        }
        match StabilityBackend::from_env_with_config(config.image.clone()) {
            Ok(backend) => {
                info!(engine = %config.image.engine, "image backend ready");
                state = state.with_images(Arc::new(backend) as Arc<dyn ImageBackend>);
            }
            Err(e) => warn!("image generation disabled: {}", e),
        }
    }

    let app = routes::create_router(state, config.server.static_dir.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Zoobotica listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
