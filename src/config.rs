use serde::{Deserialize, Serialize};

use crate::error::{ChunkerError, Result};

/// Configuration for a single chunking invocation. Read-only for the
/// duration of an invocation (spec §3.3); validated eagerly at
/// `Chunker`/`ChunkingEngine` construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Upper soft bound on chunk character count.
    pub max_chunk_size: usize,
    /// Lower bound; smaller chunks are merged where possible.
    pub min_chunk_size: usize,
    /// Desired size around which packing gravitates.
    pub target_chunk_size: usize,
    /// Fixed overlap in characters; takes precedence over percentage when > 0.
    pub overlap_size: usize,
    /// Fraction of chunk size used as overlap when `overlap_size` is 0.
    pub overlap_percentage: f64,
    pub enable_overlap: bool,
    /// Permit chunks exceeding `max_chunk_size` to preserve atomic blocks.
    pub allow_oversize: bool,
    /// Minimum code ratio to select the code-aware strategy.
    pub code_ratio_threshold: f64,
    pub min_code_blocks: usize,
    pub structural_min_headers: usize,
    pub extract_preamble: bool,
    pub separate_preamble_chunk: bool,
    /// Code blocks, tables, and list items are never split internally.
    pub preserve_atomic: bool,
    /// Tolerance for the completeness validator (`ε` in spec §3.2).
    pub coverage_tolerance: f64,
    /// Header level at or below which the merger will not cross a
    /// section-path boundary even to satisfy `min_chunk_size`.
    pub respect_header_level: u8,
    /// When true, a failed completeness validation raises
    /// `ChunkerError::DataLoss` instead of being reported as a warning.
    pub strict_validation: bool,
    /// Selection mode for the strategy selector.
    pub selection_mode: SelectionMode,
    /// Overlap attachment mode.
    pub overlap_mode: OverlapMode,
}

/// How the strategy selector chooses among applicable strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// First strategy (by priority) whose `can_handle` is true.
    Strict,
    /// `score = (11 - priority) * 0.5 + quality * 0.5` across applicable strategies.
    Weighted,
}

/// How neighbor overlap is attached to a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapMode {
    /// Overlap is metadata-only; `content` is untouched.
    Metadata,
    /// Overlap text is prepended/appended to `content` (compat mode).
    Inline,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 4096,
            min_chunk_size: 512,
            target_chunk_size: 1536,
            overlap_size: 200,
            overlap_percentage: 0.1,
            enable_overlap: true,
            allow_oversize: true,
            code_ratio_threshold: 0.7,
            min_code_blocks: 3,
            structural_min_headers: 2,
            extract_preamble: true,
            separate_preamble_chunk: false,
            preserve_atomic: true,
            coverage_tolerance: 0.05,
            respect_header_level: 6,
            strict_validation: false,
            selection_mode: SelectionMode::Strict,
            overlap_mode: OverlapMode::Metadata,
        }
    }
}

impl ChunkConfig {
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    pub fn with_min_chunk_size(mut self, size: usize) -> Self {
        self.min_chunk_size = size;
        self
    }

    pub fn with_target_chunk_size(mut self, size: usize) -> Self {
        self.target_chunk_size = size;
        self
    }

    pub fn with_overlap_size(mut self, size: usize) -> Self {
        self.overlap_size = size;
        self
    }

    pub fn with_overlap_enabled(mut self, enabled: bool) -> Self {
        self.enable_overlap = enabled;
        self
    }

    pub fn with_allow_oversize(mut self, allow: bool) -> Self {
        self.allow_oversize = allow;
        self
    }

    /// The effective overlap size for a neighbor of the given size, in
    /// characters: fixed size takes precedence over percentage, and
    /// never exceeds 50% of the target chunk size (spec invariant 8).
    pub fn effective_overlap_size(&self, neighbor_size: usize) -> usize {
        let raw = if self.overlap_size > 0 {
            self.overlap_size.min((neighbor_size as f64 * 0.4) as usize)
        } else {
            (self.overlap_percentage * self.target_chunk_size as f64) as usize
        };
        raw.min(self.target_chunk_size / 2)
    }

    /// Validate internal consistency. Mirrors
    /// `context-code-chunker`'s `ChunkerConfig::validate`.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(ChunkerError::InvalidConfig(
                "max_chunk_size must be > 0".into(),
            ));
        }
        if self.min_chunk_size > self.max_chunk_size {
            return Err(ChunkerError::InvalidConfig(format!(
                "min_chunk_size ({}) cannot exceed max_chunk_size ({})",
                self.min_chunk_size, self.max_chunk_size
            )));
        }
        if self.target_chunk_size < self.min_chunk_size || self.target_chunk_size > self.max_chunk_size
        {
            return Err(ChunkerError::InvalidConfig(format!(
                "target_chunk_size ({}) must fall within [min_chunk_size ({}), max_chunk_size ({})]",
                self.target_chunk_size, self.min_chunk_size, self.max_chunk_size
            )));
        }
        if self.overlap_size >= self.max_chunk_size {
            return Err(ChunkerError::InvalidConfig(format!(
                "overlap_size ({}) must be less than max_chunk_size ({})",
                self.overlap_size, self.max_chunk_size
            )));
        }
        if !(0.0..=1.0).contains(&self.overlap_percentage) {
            return Err(ChunkerError::InvalidConfig(
                "overlap_percentage must be within [0.0, 1.0]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.code_ratio_threshold) {
            return Err(ChunkerError::InvalidConfig(
                "code_ratio_threshold must be within [0.0, 1.0]".into(),
            ));
        }
        if self.min_code_blocks == 0 {
            return Err(ChunkerError::InvalidConfig(
                "min_code_blocks must be > 0".into(),
            ));
        }
        if self.structural_min_headers == 0 {
            return Err(ChunkerError::InvalidConfig(
                "structural_min_headers must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.coverage_tolerance) {
            return Err(ChunkerError::InvalidConfig(
                "coverage_tolerance must be within [0.0, 1.0]".into(),
            ));
        }
        Ok(())
    }
}
