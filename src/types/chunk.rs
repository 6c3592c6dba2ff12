use serde::{Deserialize, Serialize};

/// The output unit of the engine: a contiguous slice of the source
/// document plus everything a downstream retrieval pipeline needs to
/// know about it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The chunk's textual payload.
    pub content: String,

    /// 1-indexed, inclusive start line in the original document.
    pub start_line: usize,

    /// 1-indexed, inclusive end line in the original document.
    pub end_line: usize,

    /// Positional, structural, and semantic metadata.
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: String, start_line: usize, end_line: usize, metadata: ChunkMetadata) -> Self {
        Self {
            content,
            start_line,
            end_line,
            metadata,
        }
    }

    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn size(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty_content(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Which of the three strategies produced a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    CodeAware,
    Structural,
    Fallback,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeAware => "code_aware",
            Self::Structural => "structural",
            Self::Fallback => "fallback",
        }
    }

    /// Selection priority; lower sorts first (1 = tried first).
    pub fn priority(self) -> u8 {
        match self {
            Self::CodeAware => 1,
            Self::Structural => 2,
            Self::Fallback => 3,
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic classification of a single chunk's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Code,
    List,
    Table,
    Text,
    Mixed,
    Header,
    Preamble,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::List => "list",
            Self::Table => "table",
            Self::Text => "text",
            Self::Mixed => "mixed",
            Self::Header => "header",
            Self::Preamble => "preamble",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link extracted from a chunk's markdown content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub target: String,
    pub link_type: LinkType,
}

/// Kinds of links recognized inside chunk content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// `[text](url)`
    Markdown,
    /// `[[page]]` or `[[page|text]]`
    Wiki,
    /// `[text][ref]`
    Reference,
    /// `<url>`
    Autolink,
}

/// Rich, per-chunk metadata. Field names and ordering are alphabetical
/// by serialized key so that default struct-field serialization already
/// satisfies the engine's "sorted keys" serialization contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_oversize: Option<bool>,
    pub chunk_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub has_bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_column_alignment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_comments: Option<bool>,
    pub has_emails: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_imports: Option<bool>,
    pub has_inline_code: bool,
    pub has_italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_nested_lists: Option<bool>,
    pub has_numbers: bool,
    pub has_overlap: bool,
    pub has_urls: bool,
    pub header_count: usize,
    pub header_path: Vec<String>,
    pub is_first_chunk: bool,
    pub is_last_chunk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub line_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_header_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_list_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_header_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_chunk_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_item_count: Option<usize>,
    pub overlap_size_next: usize,
    pub overlap_size_prev: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oversize_reason: Option<String>,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_chunk_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_content: Option<String>,
    pub section_path: String,
    pub size: usize,
    pub strategy: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_item_count: Option<usize>,
    pub total_chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unordered_item_count: Option<usize>,
    pub word_count: usize,
}

impl ChunkMetadata {
    /// A bare-bones metadata record with everything falsy/zero/empty.
    /// Callers fill in the fields relevant to their strategy; the
    /// enricher (see `crate::enrich`) fills in the rest.
    pub fn new(strategy: StrategyKind, content_type: ContentType) -> Self {
        Self {
            allow_oversize: None,
            chunk_index: 0,
            code_block_count: None,
            column_count: None,
            content_type,
            document_id: None,
            has_bold: false,
            has_column_alignment: None,
            has_comments: None,
            has_emails: false,
            has_imports: None,
            has_inline_code: false,
            has_italic: false,
            has_nested_lists: None,
            has_numbers: false,
            has_overlap: false,
            has_urls: false,
            header_count: 0,
            header_path: Vec::new(),
            is_first_chunk: false,
            is_last_chunk: false,
            language: None,
            line_count: 0,
            links: Vec::new(),
            max_header_level: None,
            max_list_depth: None,
            min_header_level: None,
            next_chunk_index: None,
            next_content: None,
            ordered_item_count: None,
            overlap_size_next: 0,
            overlap_size_prev: 0,
            oversize_reason: None,
            preview: String::new(),
            previous_chunk_index: None,
            previous_content: None,
            section_path: String::new(),
            size: 0,
            strategy,
            table_row_count: None,
            task_item_count: None,
            total_chunks: 0,
            unordered_item_count: None,
            word_count: 0,
        }
    }
}
