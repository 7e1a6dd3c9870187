use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;
use propai::{parse_log_level, serve};
use propai_api::{AppContext, DashboardConfig};
use propai_core::Regressor;
use propai_storage::{ArtifactLoader, ArtifactStore};

/// Property valuation dashboard backed by a pre-trained regressor
#[derive(Parser, Debug)]
#[command(name = "propai")]
#[command(about = "Intelligent property price prediction", long_about = None)]
struct Args {
    /// Directory holding trained_model, label_encoder and columns artifacts
    #[arg(short, long, default_value = "./models")]
    model_dir: PathBuf,

    /// HTTP port
    #[arg(long, default_value_t = 8501)]
    http_port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Optional JSON dashboard config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_log_level(&args.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting PropAI v{}", env!("CARGO_PKG_VERSION"));
    info!("Model directory: {:?}", args.model_dir);
    info!("HTTP port: {}", args.http_port);

    let config = match &args.config {
        Some(path) => {
            info!("Loading dashboard config from {:?}", path);
            DashboardConfig::from_file(path)?
        }
        None => DashboardConfig::default(),
    };

    // Load once up front; a failure is cached and shown on the dashboard
    let store = Arc::new(ArtifactStore::new(ArtifactLoader::new(&args.model_dir)));
    match store.get() {
        Ok(artifacts) => info!(
            "Artifacts ready: {} model, {} locations",
            artifacts.regressor().kind(),
            artifacts.encoder().len()
        ),
        Err(e) => error!("Predictions disabled: {}", e),
    }

    let ctx = Arc::new(AppContext::new(store, config));
    info!("Dashboard: http://localhost:{}/", args.http_port);

    if let Err(e) = serve(ctx, &args.bind, args.http_port).await {
        error!("{:#}", e);
        return Err(e);
    }

    info!("Shutting down...");
    Ok(())
}
