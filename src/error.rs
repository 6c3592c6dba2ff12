use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while chunking. Recoverable conditions
/// (unclosed fence, oversize code block, skipped overlap, undersized
/// chunk) are never represented here — those are reported as warnings
/// attached to `ChunkingResult::warnings` (spec §7).
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Input was empty or whitespace-only. Not fatal: callers receive
    /// an empty chunk list with `success = false`.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// Input contained invalid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    /// `ChunkConfig` is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A caller forced a strategy by name that does not exist.
    #[error("strategy not found: '{requested}' (available: {available:?})")]
    StrategyNotFound {
        requested: String,
        available: Vec<&'static str>,
    },

    /// A strategy's `apply` failed; the orchestrator retries with the
    /// next strategy in priority order before surfacing this.
    #[error("strategy '{strategy}' failed: {message}")]
    StrategyFailed { strategy: String, message: String },

    /// Every strategy (including the always-applicable fallback)
    /// failed to produce a chunk sequence. Indicates an engine bug.
    #[error("no strategy could handle the input")]
    NoStrategyCanHandle,

    /// Completeness validation failed and `strict_validation` is set.
    #[error(
        "data loss detected: {char_coverage:.4} coverage ({missing_chars} of {input_chars} chars missing)"
    )]
    DataLoss {
        char_coverage: f64,
        missing_chars: usize,
        input_chars: usize,
    },

    /// A post-chunk invariant was violated (non-monotonic ordering,
    /// zero-length chunk, inconsistent indexing). Indicates an engine
    /// bug, not a caller error.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}
