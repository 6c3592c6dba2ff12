use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which delimiter character opened a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceType {
    Backtick,
    Tilde,
}

/// A fenced code block located by the fence scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FencedBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub fence_type: FenceType,
    pub fence_length: usize,
    pub indent: usize,
    pub language: Option<String>,
    pub nesting_level: usize,
    /// The scanner reached end-of-document before finding a matching
    /// closing fence; the block was closed implicitly at EOF.
    pub unclosed: bool,
}

/// An ATX or Setext header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub line: usize,
    pub level: u8,
    pub text: String,
    pub byte_offset: usize,
}

/// Column alignment as declared by a table's separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
    Center,
    None,
}

/// A GFM-style pipe table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub column_count: usize,
    pub header_row_line: usize,
    pub separator_row_line: usize,
    pub data_row_count: usize,
    pub alignments: Vec<Alignment>,
}

/// Kind of list, inferred from its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Ordered,
    Unordered,
    Task,
    Mixed,
}

/// A contiguous run of list items (possibly nested).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub list_type: ListType,
    pub item_count: usize,
    pub max_nesting_depth: usize,
}

/// A run of three or more consecutive lines, each containing a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRun {
    pub start_line: usize,
    pub end_line: usize,
}

/// Document-level classification of before-first-header preamble text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreambleType {
    Introduction,
    Summary,
    Metadata,
    General,
}

/// Content found before the document's first header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreambleInfo {
    pub start_line: usize,
    pub end_line: usize,
    pub preamble_type: PreambleType,
    pub content: String,
    pub metadata_fields: HashMap<String, String>,
}

/// Whole-document content classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTypeClass {
    CodeHeavy,
    ListHeavy,
    TableHeavy,
    Structural,
    Mixed,
    Plain,
}

/// All structural elements the parser found, in document order. Kept
/// separate from `ContentAnalysis` so strategies can consume the raw
/// element lists without recomputing ratios.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Elements {
    pub fenced_blocks: Vec<FencedBlock>,
    pub headers: Vec<Header>,
    pub tables: Vec<TableBlock>,
    pub lists: Vec<ListBlock>,
    pub url_runs: Vec<UrlRun>,
}

/// The single read-only analysis record produced once per invocation
/// and consumed by the strategy selector and the strategies themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub total_chars: usize,
    pub total_lines: usize,

    pub code_ratio: f64,
    pub text_ratio: f64,
    pub list_ratio: f64,
    pub table_ratio: f64,

    pub code_block_count: usize,
    pub list_count: usize,
    pub table_count: usize,
    pub header_count_by_level: HashMap<u8, usize>,

    pub elements: Elements,

    pub content_type: ContentTypeClass,
    pub complexity_score: f64,
    pub has_mixed_content: bool,

    pub preamble: Option<PreambleInfo>,

    /// Non-fatal observations accumulated while scanning/analyzing
    /// (`unclosed_fence`, mixed tab/space list indentation, etc).
    pub warnings: Vec<String>,
}

impl ContentAnalysis {
    pub fn header_count(&self) -> usize {
        self.elements.headers.len()
    }

    pub fn max_header_count_at_any_level(&self) -> usize {
        self.header_count_by_level.values().copied().max().unwrap_or(0)
    }

    pub fn distinct_header_levels(&self) -> usize {
        self.header_count_by_level.len()
    }
}
