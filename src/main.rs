use anyhow::{bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use remedex::{
    AppState, CatalogStore, HashingEmbedder, Indexer, Language, MatchEngine, OpenAiConfig,
    OpenAiEmbedder, RestApi, SharedCatalog, SharedEmbedder, DEFAULT_ACCEPTANCE_THRESHOLD,
    DEFAULT_INDEX_PATH,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Symptom-to-remedy matching over precomputed embeddings
#[derive(Parser, Debug)]
#[command(name = "remedex")]
#[command(about = "Match symptom descriptions to remedies", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(flatten)]
    embedding: EmbeddingArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct EmbeddingArgs {
    /// Embedding backend
    #[arg(long, value_enum, default_value_t = Provider::Openai, global = true)]
    provider: Provider,

    /// API key for the hosted embedding model
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = remedex_embed::DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Embedding model; changing it requires reindexing
    #[arg(long, env = "REMEDEX_EMBEDDING_MODEL", default_value = remedex_embed::DEFAULT_MODEL, global = true)]
    model: String,

    /// Per-request timeout for embedding calls, in seconds
    #[arg(long, default_value_t = 15, global = true)]
    timeout_secs: u64,

    /// Retries for transient embedding failures
    #[arg(long, default_value_t = 2, global = true)]
    max_retries: u32,

    /// Vector size for the local hashing provider
    #[arg(long, default_value_t = remedex_embed::DEFAULT_HASHING_DIM, global = true)]
    hashing_dim: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Provider {
    Openai,
    Hashing,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed the curated remedy catalog and rewrite the index
    Index {
        /// Curated remedy catalog (JSON array)
        #[arg(short, long, default_value = "data/medicines.json")]
        input: PathBuf,

        /// Embedding index to write
        #[arg(short, long, default_value = DEFAULT_INDEX_PATH)]
        output: PathBuf,
    },
    /// Serve the match engine over HTTP
    Serve {
        /// Embedding index to load
        #[arg(short, long, default_value = DEFAULT_INDEX_PATH)]
        catalog: PathBuf,

        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// HTTP API port
        #[arg(long, default_value_t = 5000)]
        http_port: u16,

        /// Minimum dot product for a match
        #[arg(long, default_value_t = DEFAULT_ACCEPTANCE_THRESHOLD)]
        threshold: f32,
    },
    /// Look up a single query and print the result as JSON
    Match {
        /// Symptom description
        query: String,

        /// Embedding index to load
        #[arg(short, long, default_value = DEFAULT_INDEX_PATH)]
        catalog: PathBuf,

        /// Language of the localized view (en, ur, roman)
        #[arg(long, default_value = "en")]
        lang: Language,

        /// Minimum dot product for a match
        #[arg(long, default_value_t = DEFAULT_ACCEPTANCE_THRESHOLD)]
        threshold: f32,
    },
}

fn build_embedder(args: &EmbeddingArgs) -> anyhow::Result<SharedEmbedder> {
    match args.provider {
        Provider::Openai => {
            let Some(api_key) = args.api_key.clone().filter(|k| !k.trim().is_empty()) else {
                bail!("OPENAI_API_KEY not found in environment or .env");
            };
            let config = OpenAiConfig::new(api_key)
                .base_url(args.base_url.clone())
                .model(args.model.clone())
                .timeout(Duration::from_secs(args.timeout_secs))
                .max_retries(args.max_retries);
            Ok(Arc::new(OpenAiEmbedder::new(config)?))
        }
        Provider::Hashing => {
            warn!("using the local hashing embedder; the default threshold is tuned for the hosted model");
            Ok(Arc::new(HashingEmbedder::new(args.hashing_dim)?))
        }
    }
}

fn load_engine(
    embedder: SharedEmbedder,
    catalog: &Path,
    threshold: f32,
) -> anyhow::Result<(MatchEngine, CatalogStore)> {
    let store = CatalogStore::new(catalog);
    let catalog = store
        .load()
        .with_context(|| format!("failed to load embedding index {}", store.path().display()))?;
    let engine = MatchEngine::new(embedder, SharedCatalog::new(catalog)).with_threshold(threshold);
    Ok((engine, store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let embedder = build_embedder(&args.embedding)?;

    match args.command {
        Command::Index { input, output } => {
            info!(input = %input.display(), output = %output.display(), "starting index run");
            let indexer = Indexer::new(embedder, CatalogStore::new(&output));
            let report = indexer.run_from_path(&input).await?;

            for skipped in &report.skipped {
                warn!(position = skipped.position, remedy = %skipped.name, reason = %skipped.reason, "not indexed");
            }
            println!(
                "Indexed {} remedies ({} skipped) into {}",
                report.indexed,
                report.skipped.len(),
                output.display()
            );
        }
        Command::Match {
            query,
            catalog,
            lang,
            threshold,
        } => {
            let (engine, _) = load_engine(embedder, &catalog, threshold)?;
            let result = engine.find_best_match(&query).await?.map(|found| {
                serde_json::json!({
                    "score": found.score,
                    "localized": found.remedy.localized(lang),
                    "remedy": found.remedy,
                })
            });
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "result": result }))?);
        }
        Command::Serve {
            catalog,
            host,
            http_port,
            threshold,
        } => {
            info!("Starting Remedex v{}", env!("CARGO_PKG_VERSION"));
            let (engine, store) = load_engine(embedder, &catalog, threshold)?;
            info!(model = engine.model(), threshold = engine.threshold(), "match engine ready");

            let state = Arc::new(AppState::new(engine, store));
            let http_handle = std::thread::spawn(move || {
                info!("Starting HTTP server on {}:{}", host, http_port);
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(state, &host, http_port).await {
                        tracing::error!("HTTP server error: {}", e);
                    }
                })
            });

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }

            info!("Shutting down...");
        }
    }

    Ok(())
}
