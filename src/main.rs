//! opinion-score server binary.
//!
//! Wires adapters from configuration: PostgreSQL or in-memory job store,
//! Redis or in-process progress channel, OpenAI-compatible or no feedback
//! provider, and a CSV directory as the dataset source.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use opinion_score::adapters::http::{api_router, JobHandlers};
use opinion_score::adapters::{
    CsvDirectorySource, InMemoryEventBus, InMemoryJobRepository, OpenAIFeedbackProvider,
    PostgresJobRepository, RedisEventPublisher,
};
use opinion_score::application::{
    GetJobResultsHandler, GetJobStatusHandler, JobOrchestrator, RecordAnalysisPipeline,
    SubmitJobHandler, DEFAULT_PUBLISH_TIMEOUT,
};
use opinion_score::config::{AppConfig, LogFormat, ServerConfig};
use opinion_score::ports::{EventPublisher, JobRepository};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    // Job store
    let repository: Arc<dyn JobRepository> = match &config.database {
        Some(db) => {
            let pool = db.pool_options().connect(&db.url).await?;
            let repo = PostgresJobRepository::new(pool);
            if db.run_migrations {
                repo.migrate().await?;
            }
            info!("using postgres job store");
            Arc::new(repo)
        }
        None => {
            warn!("no database configured, job results are kept in memory");
            Arc::new(InMemoryJobRepository::new())
        }
    };

    // Progress channel
    let mut publish_timeout = DEFAULT_PUBLISH_TIMEOUT;
    let publisher: Arc<dyn EventPublisher> = match &config.redis {
        Some(redis) => {
            let connect = RedisEventPublisher::connect(&redis.url);
            let publisher = tokio::time::timeout(redis.timeout(), connect)
                .await
                .map_err(|_| "timed out connecting to redis")??
                .with_channel_prefix(redis.channel_prefix.clone());
            info!(prefix = %redis.channel_prefix, "publishing progress to redis");
            publish_timeout = redis.timeout();
            Arc::new(publisher)
        }
        None => {
            info!("no redis configured, progress events stay in process");
            Arc::new(InMemoryEventBus::new())
        }
    };

    // Row pipeline
    let lexicon = Arc::new(config.analysis.load_lexicon()?);
    let mut pipeline = RecordAnalysisPipeline::new(lexicon)
        .with_enrichment_deadline(config.enrichment.deadline());
    match config.enrichment.provider_config() {
        Some(provider_config) => {
            info!(model = %provider_config.model, "llm enrichment enabled");
            pipeline = pipeline.with_feedback_provider(Arc::new(OpenAIFeedbackProvider::new(
                provider_config,
            )?));
        }
        None => warn!("no enrichment api key configured, enrichment requests will fall back"),
    }

    let datasets = Arc::new(CsvDirectorySource::new(config.analysis.dataset_dir.clone()));
    let orchestrator = Arc::new(JobOrchestrator::new(
        repository.clone(),
        publisher,
        datasets,
        Arc::new(pipeline),
    )
    .with_publish_timeout(publish_timeout));

    let handlers = JobHandlers::new(
        Arc::new(SubmitJobHandler::new(repository.clone(), orchestrator)),
        Arc::new(GetJobStatusHandler::new(repository.clone())),
        Arc::new(GetJobResultsHandler::new(repository)),
    )
    .with_defaults(config.analysis.default_params()?);

    let app = api_router(
        handlers,
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, dataset_dir = %config.analysis.dataset_dir.display(), "opinion-score listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match server.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
