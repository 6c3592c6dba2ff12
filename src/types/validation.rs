use serde::{Deserialize, Serialize};

/// A contiguous run of input lines that the completeness validator
/// could not find, verbatim, in any output chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingContentBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub content_preview: String,
    pub size_chars: usize,
}

/// Result of running the completeness validator over a chunk sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub input_chars: usize,
    pub output_chars: usize,
    pub missing_chars: usize,
    pub char_coverage: f64,
    pub missing_blocks: Vec<MissingContentBlock>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn diff_ratio(&self) -> f64 {
        if self.input_chars == 0 {
            0.0
        } else {
            (self.output_chars as f64 - self.input_chars as f64).abs() / self.input_chars as f64
        }
    }
}
