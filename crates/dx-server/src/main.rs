//! Dataset explorer server.
//!
//! Accepts a tabular file upload, infers a semantic type per column and
//! serves summary statistics and chart-ready series over JSON. Filters are
//! applied to a view of the upload and can be reset to the original.
//!
//! # Endpoints
//!
//! - `GET    /`               liveness message
//! - `POST   /upload`         multipart `file` → dataset report
//! - `POST   /filter`         range/category/search filter on the view
//! - `DELETE /reset`          restore the original upload
//! - `GET    /column/{name}`  statistics and chart for one column
//! - `POST   /analyze-image`  multipart `file` → dominant colors

mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::Router;
use clap::Parser;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

/// Dataset explorer: upload a table, get statistics and charts back.
#[derive(Parser, Debug)]
#[command(name = "dataset-explorer", version, about)]
struct Cli {
    /// Port to listen on.
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Bind address.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum request body size in MiB (applies to uploads and images).
    #[arg(long, default_value = "64")]
    max_body_mb: usize,

    /// Allowed browser origin. Repeat for several; `*` allows any origin.
    #[arg(long = "cors-origin", default_value = "http://localhost:3000")]
    cors_origins: Vec<String>,

    /// Number of dominant colors returned by image analysis.
    #[arg(long, default_value_t = dx_analysis::palette::DEFAULT_COLOR_COUNT)]
    palette_colors: usize,

    /// Maximum number of threads for column analysis (0 = auto).
    #[arg(long, default_value = "0")]
    threads: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    if cli.palette_colors == 0 {
        anyhow::bail!("--palette-colors must be at least 1");
    }

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let state = Arc::new(AppState::new(cli.palette_colors));
    let cors = cors_layer(&cli.cors_origins)?;

    let app = Router::new()
        .merge(routes::router())
        .layer(DefaultBodyLimit::max(mb_to_bytes(cli.max_body_mb)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    tracing::info!(
        %addr,
        origins = ?cli.cors_origins,
        palette_colors = cli.palette_colors,
        "dataset-explorer starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any))
}

fn mb_to_bytes(mb: usize) -> usize {
    mb.saturating_mul(1024).saturating_mul(1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mb_to_bytes_saturates() {
        assert_eq!(mb_to_bytes(1), 1024 * 1024);
        assert_eq!(mb_to_bytes(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_cors_origins() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["http://localhost:3000".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["dataset-explorer"]);
        assert_eq!(cli.port, 8000);
        assert_eq!(cli.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(cli.palette_colors, 5);

        let cli = Cli::parse_from([
            "dataset-explorer",
            "--cors-origin",
            "http://a.test",
            "--cors-origin",
            "http://b.test",
        ]);
        assert_eq!(cli.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
