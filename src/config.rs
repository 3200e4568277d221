// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

/// Upper bound on questions in one mock.
pub const MAX_QUESTIONS_LIMIT: u32 = 10;
pub const MIN_QUESTIONS_LIMIT: u32 = 1;

/// Exam duration bounds, in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 1200;
pub const MIN_DURATION_SECS: u32 = 60;
pub const MAX_DURATION_SECS: u32 = 3600;

/// Marking scheme.
pub const MARKS_CORRECT: i64 = 4;
pub const MARKS_WRONG: i64 = -1;

/// Countdown tick period for the client session driver.
pub const TICK_INTERVAL_MS: u64 = 250;

/// Number of leading token characters used to build the session storage key.
pub const SESSION_KEY_PREFIX_LEN: usize = 48;
/// Hex characters of the SHA-256 token digest appended to session keys.
pub const SESSION_KEY_DIGEST_LEN: usize = 16;
pub const SESSION_KEY_NAMESPACE: &str = "mock-session";

/// Parse errors surfaced in a diagnostic list are capped at this many entries.
pub const MAX_PARSE_DIAGNOSTICS: usize = 20;

/// Largest decompressed token body accepted by the decoder.
pub const MAX_DECODED_TOKEN_BYTES: u64 = 4 * 1024 * 1024;

/// Largest token accepted by the scoring endpoint.
pub const MAX_TOKEN_CHARS: u64 = 512 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base of the question corpus: an http(s) URL or a local directory.
    pub corpus_url: String,
    /// Origin used when building share links.
    pub public_base_url: String,
    pub bind_addr: SocketAddr,
    pub fetch_timeout_secs: u64,
    /// Fixed RNG seed for sampling; `None` draws from OS entropy per request.
    pub sampler_seed: Option<u64>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let corpus_url = env::var("CORPUS_URL")
            .expect("CORPUS_URL must be set");

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let sampler_seed = env::var("SAMPLER_SEED")
            .ok()
            .and_then(|v| v.parse().ok());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            corpus_url,
            public_base_url,
            bind_addr,
            fetch_timeout_secs,
            sampler_seed,
            rust_log,
        }
    }
}
