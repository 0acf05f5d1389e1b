//! `roboto`: serve or print the robots.txt and sitemaps of the demo app.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use roboto::{DocumentCache, DocumentKind, Origin, RobotoConfig};
use roboto_server::{demo, robots_router, Server};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "roboto")]
#[command(about = "robots.txt and sitemap generation from a route table")]
#[command(version)]
struct Cli {
    /// JSON config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also serve robots.txt at /robots, /robot and /robot.txt
    #[arg(long, global = true)]
    legacy_aliases: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo app with its robots.txt and sitemaps
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },
    /// Print one document to stdout
    Render {
        #[arg(value_enum)]
        document: DocumentArg,

        /// Origin for absolute URLs, e.g. https://example.com
        #[arg(long)]
        origin: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentArg {
    Robots,
    SitemapXml,
    SitemapTxt,
}

impl From<DocumentArg> for DocumentKind {
    fn from(arg: DocumentArg) -> Self {
        match arg {
            DocumentArg::Robots => DocumentKind::RobotsTxt,
            DocumentArg::SitemapXml => DocumentKind::SitemapXml,
            DocumentArg::SitemapTxt => DocumentKind::SitemapTxt,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roboto=info".parse()?)
                .add_directive("roboto_server=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => RobotoConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RobotoConfig::default(),
    };
    if cli.legacy_aliases {
        config = config.with_legacy_robots_aliases();
    }

    let cache = Arc::new(
        DocumentCache::from_source(&demo::registry(), config)
            .context("failed to classify routes")?,
    );

    match cli.command {
        Commands::Serve { bind } => serve(cache, bind).await,
        Commands::Render { document, origin } => render(&cache, document.into(), origin),
    }
}

async fn serve(cache: Arc<DocumentCache>, bind: SocketAddr) -> Result<()> {
    info!("starting roboto v{}", env!("CARGO_PKG_VERSION"));

    let app = demo::router().merge(robots_router(cache));
    let mut server = Server::bind(bind, app)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    println!("roboto listening on http://{}", server.addr());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutting down");
    server.shutdown().map_err(anyhow::Error::msg)?;
    Ok(())
}

fn render(cache: &DocumentCache, kind: DocumentKind, origin: Option<String>) -> Result<()> {
    let origin = origin
        .as_deref()
        .map(Origin::from_url)
        .transpose()
        .context("invalid --origin")?;
    let document = cache
        .get(kind, origin.as_ref())
        .with_context(|| format!("failed to render {kind}"))?;
    print!("{}", document.body());
    Ok(())
}
