// src/main.rs

use dotenvy::dotenv;
use mock_exam::config::Config;
use mock_exam::state::AppState;
use mock_exam::{corpus, routes};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "mock_exam.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let corpus = match corpus::from_config(&config) {
        Ok(corpus) => corpus,
        Err(e) => {
            tracing::error!("Invalid CORPUS_URL '{}': {}", config.corpus_url, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Serving questions from {}", config.corpus_url);

    // Probe the index once so a bad corpus shows up at startup, not on the first request.
    match corpus.fetch_index().await {
        Ok(index) => tracing::info!("Corpus index lists {} subjects", index.subjects.len()),
        Err(e) => tracing::warn!("Corpus index not reachable yet: {}", e),
    }

    if let Some(seed) = config.sampler_seed {
        tracing::warn!("SAMPLER_SEED={} set; every mock for the same chapters will be identical", seed);
    }

    let addr = config.bind_addr;
    let state = AppState { config, corpus };

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}
