use clap::Parser;
use notewire_client::{Client, ClientConfig};
use notewire_core::PanelContext;
use notewire_panel::{Labels, PanelKind, TextRenderer};

/// Headless panel client for a notewire kernel. Opens a backlinks
/// panel (scoped when a document is given) plus a global relation
/// graph panel and keeps them fresh until interrupted.
#[derive(Parser)]
#[command(name = "notewire")]
struct Args {
    /// Kernel WebSocket endpoint.
    #[arg(long, default_value = "ws://127.0.0.1:6806/ws")]
    url: String,

    /// Document URL for a scoped backlinks panel.
    #[arg(long, requires = "doc_path")]
    doc_url: Option<String>,

    /// Document path for a scoped backlinks panel.
    #[arg(long, requires = "doc_url")]
    doc_path: Option<String>,

    /// Free-text filter for the relation graph.
    #[arg(long)]
    filter: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let client = Client::connect(ClientConfig::new(args.url.clone())).await?;

    let context = match (args.doc_url, args.doc_path) {
        (Some(url), Some(path)) => PanelContext::scoped(url, path),
        _ => PanelContext::Global,
    };

    let backlinks = client
        .open_panel(
            PanelKind::Backlinks,
            context,
            Box::new(TextRenderer::new(Labels::default())),
        )
        .await?;
    tracing::info!(panel_id = %backlinks, "Backlinks panel open");

    let graph = client
        .open_panel(
            PanelKind::Graph,
            PanelContext::Global,
            Box::new(TextRenderer::new(Labels::default())),
        )
        .await?;
    tracing::info!(panel_id = %graph, "Graph panel open");

    if let Some(k) = args.filter {
        client.set_filter(graph, k)?;
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    client.shutdown().await;
    Ok(())
}
