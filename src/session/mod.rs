// src/session/mod.rs

//! Client-side exam session: decode a token, answer and navigate under a
//! persisted deadline, then score.

pub mod machine;
pub mod runner;
pub mod store;

pub use machine::{ExamSession, SessionState, SubmitReason, Tick};
pub use runner::{Clock, DEFAULT_TICK, SystemClock, run_countdown};
pub use store::{FileStore, MemoryStore, SessionStore};
