use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shopqueue::auth::password;
use shopqueue::config::{AppConfig, UnclaimPolicy};
use shopqueue::http::{router, ApiState};
use shopqueue::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "shopqueue")]
#[command(version)]
#[command(about = "Job queue tracker for a machine shop floor")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Directory for uploaded files (G-code, drawings, completion photos)
    #[arg(long, default_value = "data/files")]
    data_dir: PathBuf,

    /// Public base URL prefixed to returned file references
    #[arg(long)]
    public_url: Option<String>,

    /// Seed an approved admin account on first start, "email:password"
    #[arg(long)]
    bootstrap_admin: Option<String>,

    /// Bearer session lifetime in hours
    #[arg(long, default_value = "168")]
    session_ttl_hours: i64,

    /// Only the claimant (or an admin) may release a claimed job
    #[arg(long)]
    strict_unclaim: bool,
}

fn parse_bootstrap_admin(raw: &str) -> Option<(String, String)> {
    let (email, password) = raw.split_once(':')?;
    if email.is_empty() || password.is_empty() {
        return None;
    }
    Some((email.to_string(), password.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listen_addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    let public_url = args
        .public_url
        .unwrap_or_else(|| format!("http://{}", listen_addr));

    let unclaim_policy = if args.strict_unclaim {
        UnclaimPolicy::ClaimantOnly
    } else {
        UnclaimPolicy::Anyone
    };

    let config = AppConfig::new(listen_addr)
        .with_storage_root(args.data_dir)
        .with_public_base(public_url)
        .with_unclaim_policy(unclaim_policy)
        .with_session_ttl_hours(args.session_ttl_hours);

    tracing::info!(
        listen_addr = %config.listen_addr,
        storage_root = %config.storage.root.display(),
        unclaim_policy = ?config.unclaim_policy,
        "Starting shopqueue"
    );

    let state = ApiState::new(config.clone());

    // Seed an admin so someone can approve the first signups.
    if let Some(raw) = args.bootstrap_admin.as_deref() {
        let (email, admin_password) =
            parse_bootstrap_admin(raw).ok_or("--bootstrap-admin expects email:password")?;
        let mut directory = state.directory.write().await;
        if directory.is_empty() {
            let hash = password::hash(&admin_password).await?;
            let profile = directory.create_admin(&email, "Shop Admin", hash)?;
            tracing::info!(user_id = %profile.id, email = %profile.email, "Bootstrap admin created");
        } else {
            tracing::warn!("Directory not empty, skipping bootstrap admin");
        }
    }

    tokio::fs::create_dir_all(state.attachments.root()).await?;

    let shutdown = install_shutdown_handler();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
