use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docsift_core::{AnalysisPipeline, Config, Secret};
use docsift_document::{PdfExtractor, TextExtractor, UploadedDocument};
use docsift_gateway::{GatewayServer, SharedPipeline};
use docsift_llm::{AnyProvider, GenerativeProvider};
use docsift_llm::gemini::GeminiProvider;
use tokio::sync::watch;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Multi-document PDF analysis backed by a generative model
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway (default)
    Serve {
        /// Override `gateway.bind`
        #[arg(long)]
        bind: Option<String>,

        /// Override `gateway.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze PDF files once and print the JSON result
    Analyze {
        /// PDF files, analyzed in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Gemini API key; falls back to GEMINI_API_KEY
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config, std::env::var("DOCSIFT_CONFIG").ok());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), model = %config.llm.model, "config loaded");

    match cli.command.unwrap_or(Command::Serve {
        bind: None,
        port: None,
    }) {
        Command::Serve { bind, port } => serve(config, bind, port).await,
        Command::Analyze { files, api_key } => analyze(config, &files, api_key).await,
    }
}

fn build_pipeline(config: &Config) -> AnalysisPipeline<AnyProvider, Arc<dyn TextExtractor>> {
    let provider = AnyProvider::Gemini(GeminiProvider::new(
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm_timeout(),
    ));
    AnalysisPipeline::new(provider, Arc::new(PdfExtractor) as Arc<dyn TextExtractor>)
        .with_default_api_key(config.secrets.gemini_api_key.clone())
}

async fn serve(config: Config, bind: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if config.secrets.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; requests must carry their own apiKey");
    }

    let pipeline: SharedPipeline = Arc::new(build_pipeline(&config));
    tracing::info!(
        provider = pipeline.provider().name(),
        model = %config.llm.model,
        "analysis provider ready"
    );
    let bind = bind.unwrap_or_else(|| config.gateway.bind.clone());
    let port = port.unwrap_or(config.gateway.port);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    GatewayServer::new(&bind, port, pipeline, shutdown_rx)
        .with_max_body_size(config.gateway.max_body_size)
        .serve()
        .await?;
    Ok(())
}

async fn analyze(config: Config, paths: &[PathBuf], api_key: Option<String>) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(UploadedDocument::new(upload_name(path), data));
    }

    let pipeline = build_pipeline(&config);
    let response = pipeline
        .run(files, api_key.and_then(Secret::non_empty))
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// File name component of `path`, as a browser would send it.
fn upload_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

fn resolve_config_path(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_beats_env() {
        let path = resolve_config_path(
            Some(PathBuf::from("flag.toml")),
            Some("env.toml".into()),
        );
        assert_eq!(path, PathBuf::from("flag.toml"));
    }

    #[test]
    fn config_env_beats_default() {
        let path = resolve_config_path(None, Some("env.toml".into()));
        assert_eq!(path, PathBuf::from("env.toml"));
        assert_eq!(
            resolve_config_path(None, None),
            PathBuf::from(DEFAULT_CONFIG_PATH)
        );
    }

    #[test]
    fn upload_name_strips_directories() {
        assert_eq!(upload_name(Path::new("/tmp/reports/q3.pdf")), "q3.pdf");
        assert_eq!(upload_name(Path::new("a.pdf")), "a.pdf");
    }

    #[test]
    fn cli_parses_analyze_in_order() {
        let cli = Cli::try_parse_from([
            "docsift",
            "--config",
            "c.toml",
            "analyze",
            "b.pdf",
            "a.pdf",
            "--api-key",
            "k",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        match cli.command {
            Some(Command::Analyze { files, api_key }) => {
                assert_eq!(files, [PathBuf::from("b.pdf"), PathBuf::from("a.pdf")]);
                assert_eq!(api_key.as_deref(), Some("k"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_analyze_requires_files() {
        assert!(Cli::try_parse_from(["docsift", "analyze"]).is_err());
    }

    #[test]
    fn cli_defaults_to_serve() {
        let cli = Cli::try_parse_from(["docsift"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["docsift", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Serve {
                port: Some(8080),
                ..
            })
        ));
    }

    #[test]
    fn pipeline_is_backed_by_gemini() {
        let mut config = Config::default();
        config.secrets.gemini_api_key = Some(Secret::new("k"));
        let pipeline = build_pipeline(&config);
        assert!(matches!(pipeline.provider(), AnyProvider::Gemini(_)));
    }
}
