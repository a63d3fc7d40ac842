//! Data store layer.
//!
//! The `runs` table lives in a hosted store with row-level security. Every
//! call is a single request/response and returns a [`StoreResult`].

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use crate::models::{NewRun, Run, RunStatsRow, Session};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Table names as constants.
pub mod tables {
    pub const RUNS: &str = "runs";
}

/// Failure payload of a store call, shaped like the store's JSON error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Result of every store call.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Typed operations on the `runs` table, scoped to one session.
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Insert one run owned by the session's user.
    async fn insert_run(&self, session: &Session, run: &NewRun) -> StoreResult<()>;

    /// All columns of the user's runs, newest first.
    async fn list_runs(&self, session: &Session) -> StoreResult<Vec<Run>>;

    /// `distance, duration, pace` of the user's runs, unordered.
    async fn stats_rows(&self, session: &Session) -> StoreResult<Vec<RunStatsRow>>;
}
