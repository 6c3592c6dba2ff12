// src/lib.rs
//! # Markdown Chunker
//!
//! A markdown chunking engine for RAG ingestion pipelines: a structural
//! parser feeds a content analyzer, which drives a strategy selector
//! across three strategies (code-aware, structural, fallback), followed
//! by a merge/overlap/enrich/validate post-processing pipeline.
//!
//! ## Quick Start
//!
//! ```rust
//! use markdown_chunker::Chunker;
//!
//! let markdown = "# Introduction\n\nThis is a test document.";
//! let chunker = Chunker::default();
//! let chunks = chunker.chunk(markdown);
//!
//! for chunk in chunks {
//!     println!("chunk: {} chars, strategy {}", chunk.metadata.size, chunk.metadata.strategy);
//! }
//! ```
//!
//! ## Advanced usage
//!
//! ```rust
//! use markdown_chunker::Chunker;
//!
//! let chunker = Chunker::builder()
//!     .max_chunk_size(2048)
//!     .min_chunk_size(256)
//!     .overlap_size(100)
//!     .build();
//!
//! let chunks = chunker.chunk("# My Document\n\nContent here.");
//! ```

pub mod analysis;
pub mod cache;
pub mod config;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod merger;
pub mod overlap;
pub mod parser;
pub mod segmentation;
pub mod strategy;
pub mod textutil;
pub mod types;
pub mod validate;

pub use config::{ChunkConfig, OverlapMode, SelectionMode};
pub use engine::{ChunkingEngine, ChunkingResult, Metrics, State};
pub use error::{ChunkerError, Result};
pub use types::{
    Chunk, ChunkMetadata, ContentAnalysis, ContentType, Link, LinkType, MissingContentBlock,
    StrategyKind, ValidationResult,
};

/// Convenience façade over `ChunkingEngine` for hosts that only need the
/// common path: build once, call `chunk`/`chunk_result` as needed.
pub struct Chunker {
    config: ChunkConfig,
    engine: ChunkingEngine,
}

impl Chunker {
    /// A chunker with default settings (`ChunkConfig::default()`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use markdown_chunker::Chunker;
    ///
    /// let chunker = Chunker::default();
    /// let chunks = chunker.chunk("# Title\n\nContent here.");
    /// ```
    pub fn default() -> Self {
        Self {
            config: ChunkConfig::default(),
            engine: ChunkingEngine::new(),
        }
    }

    /// Start a builder for custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use markdown_chunker::Chunker;
    ///
    /// let chunker = Chunker::builder()
    ///     .max_chunk_size(1500)
    ///     .min_chunk_size(200)
    ///     .overlap_size(80)
    ///     .build();
    /// ```
    pub fn builder() -> ChunkerBuilder {
        ChunkerBuilder::new()
    }

    /// Chunk `text`, discarding warnings/analysis/timing. For the full
    /// result use `chunk_result`.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.chunk_result(text).chunks
    }

    /// Run the full pipeline and return the complete result, including
    /// warnings, the analysis record, and which strategy was used.
    ///
    /// Never panics: malformed or empty input comes back as
    /// `ChunkingResult { success: false, .. }` rather than an `Err`.
    /// `Err` is reserved for configuration and engine-bug conditions.
    pub fn chunk_result(&self, text: &str) -> ChunkingResult {
        match self.engine.run(text, &self.config, None) {
            Ok(result) => result,
            Err(err) => ChunkingResult {
                chunks: Vec::new(),
                analysis: analysis::analyze("", &self.config),
                warnings: vec![err.to_string()],
                strategy_used: String::new(),
                processing_time_ms: 0,
                success: false,
            },
        }
    }

    /// Force a specific strategy, falling back to normal selection with
    /// a warning if it cannot handle the input.
    pub fn chunk_with_strategy(&self, text: &str, strategy: StrategyKind) -> Result<ChunkingResult> {
        self.engine.run(text, &self.config, Some(strategy))
    }

    /// Run just the content analyzer, without chunking.
    pub fn analyze(&self, text: &str) -> ContentAnalysis {
        analysis::analyze(text, &self.config)
    }

    /// Run the completeness validator over an already-produced chunk
    /// sequence.
    pub fn validate(&self, text: &str, chunks: &[Chunk]) -> ValidationResult {
        validate::validate(text, chunks, &self.config)
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Per-stage duration snapshot from the most recent `chunk`/
    /// `chunk_result`/`chunk_with_strategy` call. Empty unless the
    /// builder had `with_metrics(true)` set.
    pub fn metrics(&self) -> engine::Metrics {
        self.engine.metrics()
    }
}

/// Builder for configuring a `Chunker`.
pub struct ChunkerBuilder {
    config: ChunkConfig,
    with_metrics: bool,
}

impl ChunkerBuilder {
    pub fn new() -> Self {
        Self {
            config: ChunkConfig::default(),
            with_metrics: false,
        }
    }

    /// Upper soft bound on chunk character count. Default: 4096.
    ///
    /// Also pulls `target_chunk_size`, `min_chunk_size`, and `overlap_size`
    /// back within bounds so a caller adjusting only this one knob doesn't
    /// need to touch the others to keep the config valid.
    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.config.max_chunk_size = size;
        if self.config.target_chunk_size > size {
            self.config.target_chunk_size = size;
        }
        if self.config.min_chunk_size > size {
            self.config.min_chunk_size = size;
        }
        if self.config.overlap_size >= size {
            self.config.overlap_size = size.saturating_sub(1);
        }
        self
    }

    /// Lower bound; smaller chunks are merged where possible. Default: 512.
    pub fn min_chunk_size(mut self, size: usize) -> Self {
        self.config.min_chunk_size = size;
        if self.config.target_chunk_size < size {
            self.config.target_chunk_size = size;
        }
        if self.config.max_chunk_size < size {
            self.config.max_chunk_size = size;
        }
        self
    }

    /// Desired size around which packing gravitates. Default: 1536.
    pub fn target_chunk_size(mut self, size: usize) -> Self {
        self.config.target_chunk_size = size;
        self
    }

    /// Fixed overlap in characters. Default: 200.
    pub fn overlap_size(mut self, size: usize) -> Self {
        self.config.overlap_size = size;
        self
    }

    /// Whether to attach overlap metadata/content at all. Default: true.
    pub fn enable_overlap(mut self, enabled: bool) -> Self {
        self.config.enable_overlap = enabled;
        self
    }

    /// Permit chunks exceeding `max_chunk_size` to preserve atomic
    /// blocks (fenced code, tables). Default: true.
    pub fn allow_oversize(mut self, allow: bool) -> Self {
        self.config.allow_oversize = allow;
        self
    }

    /// Selection mode for the strategy selector. Default: `Strict`.
    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.config.selection_mode = mode;
        self
    }

    /// Overlap attachment mode. Default: `Metadata`.
    pub fn overlap_mode(mut self, mode: OverlapMode) -> Self {
        self.config.overlap_mode = mode;
        self
    }

    /// Raise a `DataLoss` error instead of a warning when completeness
    /// validation fails. Default: false.
    pub fn strict_validation(mut self, strict: bool) -> Self {
        self.config.strict_validation = strict;
        self
    }

    /// Enable per-stage duration metrics. Default: false.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.with_metrics = enabled;
        self
    }

    /// Start from an already-constructed config rather than the
    /// individual setters above.
    pub fn with_config(mut self, config: ChunkConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the `Chunker`. Panics if the accumulated configuration is
    /// internally inconsistent; use `try_build` to handle that as a
    /// `Result` instead.
    pub fn build(self) -> Chunker {
        self.try_build().expect("invalid chunker configuration")
    }

    pub fn try_build(self) -> Result<Chunker> {
        self.config.validate()?;
        Ok(Chunker {
            engine: ChunkingEngine::new().with_metrics(self.with_metrics),
            config: self.config,
        })
    }
}

impl Default for ChunkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chunker_chunks_plain_markdown() {
        let chunker = Chunker::default();
        let chunks = chunker.chunk("# Introduction\n\nThis is a test document.\n");
        assert!(!chunks.is_empty());
    }

    #[test]
    fn builder_applies_custom_sizes() {
        let chunker = Chunker::builder()
            .max_chunk_size(2048)
            .min_chunk_size(128)
            .overlap_size(64)
            .build();
        assert_eq!(chunker.config().max_chunk_size, 2048);
        assert_eq!(chunker.config().min_chunk_size, 128);
    }

    #[test]
    fn invalid_builder_config_rejected_by_try_build() {
        let result = Chunker::builder()
            .min_chunk_size(5000)
            .max_chunk_size(100)
            .try_build();
        assert!(result.is_err());
    }

    #[test]
    fn chunk_result_reports_strategy_used() {
        let chunker = Chunker::default();
        let result = chunker.chunk_result("Just a single plain paragraph of text.\n");
        assert!(result.success);
        assert!(!result.strategy_used.is_empty());
    }
}
