//! Code-aware strategy (component 6): keeps every fenced code block
//! atomic and packs the surrounding text by paragraph.

use crate::config::ChunkConfig;
use crate::error::Result;
use crate::parser;
use crate::textutil::{join_lines, pack_greedy};
use crate::types::{Chunk, ChunkMetadata, ContentAnalysis, ContentType, FencedBlock, StrategyKind};

use super::Strategy;

pub struct CodeAwareStrategy;

enum Segment {
    Text(usize, usize),
    Code(usize),
}

impl Strategy for CodeAwareStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::CodeAware
    }

    fn can_handle(&self, analysis: &ContentAnalysis, config: &ChunkConfig) -> bool {
        analysis.code_ratio >= config.code_ratio_threshold
            && analysis.code_block_count >= config.min_code_blocks
    }

    fn quality(&self, analysis: &ContentAnalysis) -> f64 {
        (analysis.code_ratio * 0.7 + (analysis.code_block_count as f64 / 10.0).min(1.0) * 0.3)
            .clamp(0.0, 1.0)
    }

    fn apply(
        &self,
        input: &str,
        analysis: &ContentAnalysis,
        config: &ChunkConfig,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<Chunk>> {
        let normalized = parser::normalize_line_endings(input);
        let lines: Vec<&str> = normalized.lines().collect();
        let fences = &analysis.elements.fenced_blocks;

        let segments = build_segments(&lines, fences);

        let mut chunks: Vec<Chunk> = Vec::new();
        for segment in segments {
            match segment {
                Segment::Text(start, end) => {
                    for (content, cs, ce) in pack_greedy(&lines, start, end, config.max_chunk_size)
                    {
                        let mut metadata = ChunkMetadata::new(StrategyKind::CodeAware, ContentType::Text);
                        metadata.size = content.chars().count();
                        chunks.push(Chunk::new(content, cs, ce, metadata));
                    }
                }
                Segment::Code(idx) => {
                    chunks.extend(build_code_chunk(&lines, &fences[idx], config, warnings));
                }
            }
        }

        merge_small_text_chunks(&mut chunks, config);

        Ok(chunks)
    }
}

fn build_segments(lines: &[&str], fences: &[FencedBlock]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 1;
    for (idx, fence) in fences.iter().enumerate() {
        if cursor <= fence.start_line.saturating_sub(1) {
            segments.push(Segment::Text(cursor, fence.start_line - 1));
        }
        segments.push(Segment::Code(idx));
        cursor = fence.end_line + 1;
    }
    if cursor <= lines.len() {
        segments.push(Segment::Text(cursor, lines.len()));
    }
    segments
}

fn build_code_chunk(
    lines: &[&str],
    fence: &FencedBlock,
    config: &ChunkConfig,
    warnings: &mut Vec<String>,
) -> Vec<Chunk> {
    let content = join_lines(lines, fence.start_line, fence.end_line);
    let size = content.chars().count();

    let mut metadata = ChunkMetadata::new(StrategyKind::CodeAware, ContentType::Code);
    metadata.language = fence.language.clone();
    metadata.code_block_count = Some(1);
    metadata.has_imports = Some(has_import_keywords(&content));
    metadata.has_comments = Some(has_comment_markers(&content));

    if size <= config.max_chunk_size {
        metadata.size = size;
        return vec![Chunk::new(content, fence.start_line, fence.end_line, metadata)];
    }

    if config.allow_oversize {
        metadata.allow_oversize = Some(true);
        metadata.oversize_reason = Some("code_block_atomicity".to_string());
        metadata.size = size;
        return vec![Chunk::new(content, fence.start_line, fence.end_line, metadata)];
    }

    warnings.push(format!(
        "code_block_split at lines {}-{}",
        fence.start_line, fence.end_line
    ));
    split_code_by_lines(lines, fence, config)
}

/// Splits an oversized code block at line boundaries when
/// `allow_oversize` is false. Atomicity is violated here by
/// configuration choice; this is the documented escape hatch.
fn split_code_by_lines(lines: &[&str], fence: &FencedBlock, config: &ChunkConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut start = fence.start_line;
    for line_no in fence.start_line..=fence.end_line {
        let line = lines[line_no - 1];
        let candidate_len = current.chars().count() + line.chars().count() + 1;
        if !current.is_empty() && candidate_len > config.max_chunk_size {
            let mut metadata = ChunkMetadata::new(StrategyKind::CodeAware, ContentType::Code);
            metadata.size = current.chars().count();
            chunks.push(Chunk::new(
                std::mem::take(&mut current),
                start,
                line_no - 1,
                metadata,
            ));
            start = line_no;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        let mut metadata = ChunkMetadata::new(StrategyKind::CodeAware, ContentType::Code);
        metadata.size = current.chars().count();
        chunks.push(Chunk::new(current, start, fence.end_line, metadata));
    }
    chunks
}

fn has_import_keywords(content: &str) -> bool {
    ["import ", "use ", "require(", "from ", "#include"]
        .iter()
        .any(|kw| content.contains(kw))
}

fn has_comment_markers(content: &str) -> bool {
    ["//", "#", "/*", "--"]
        .iter()
        .any(|marker| content.lines().any(|l| l.trim_start().starts_with(marker)))
}

/// Merge an undersized text chunk with the chunk immediately following
/// it, provided that chunk is also non-atomic (text), and never merges
/// across a code chunk boundary. Code-aware step 5.
fn merge_small_text_chunks(chunks: &mut Vec<Chunk>, config: &ChunkConfig) {
    let mut i = 0;
    while i + 1 < chunks.len() {
        let is_small_text =
            chunks[i].metadata.content_type == ContentType::Text && chunks[i].size() < config.min_chunk_size;
        let next_is_text = chunks[i + 1].metadata.content_type == ContentType::Text;
        if is_small_text && next_is_text {
            let combined_size = chunks[i].size() + 2 + chunks[i + 1].size();
            if combined_size <= config.max_chunk_size {
                let next = chunks.remove(i + 1);
                let merged_content = format!("{}\n\n{}", chunks[i].content, next.content);
                chunks[i].content = merged_content;
                chunks[i].end_line = next.end_line;
                chunks[i].metadata.size = chunks[i].content.chars().count();
                chunks[i].metadata.content_type = ContentType::Mixed;
                continue;
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    fn config() -> ChunkConfig {
        ChunkConfig {
            max_chunk_size: 50,
            min_chunk_size: 5,
            code_ratio_threshold: 0.0,
            min_code_blocks: 1,
            ..Default::default()
        }
    }

    #[test]
    fn code_block_preserved_atomic() {
        let input = "Intro paragraph.\n\n```python\ndef f():\n    return 1\n```\n\nOutro.\n";
        let config = config();
        let analysis = analyze(input, &config);
        let mut warnings = Vec::new();
        let chunks = CodeAwareStrategy
            .apply(input, &analysis, &config, &mut warnings)
            .unwrap();

        let code_chunk = chunks
            .iter()
            .find(|c| c.metadata.content_type == ContentType::Code)
            .unwrap();
        assert!(code_chunk.content.contains("def f():"));
        assert!(code_chunk.content.starts_with("```python"));
        assert_eq!(code_chunk.metadata.language.as_deref(), Some("python"));
    }

    #[test]
    fn oversize_code_block_kept_atomic_when_allowed() {
        let input = "```python\n".to_string()
            + &"x = 1\n".repeat(30)
            + "```\n";
        let mut config = config();
        config.allow_oversize = true;
        let analysis = analyze(&input, &config);
        let mut warnings = Vec::new();
        let chunks = CodeAwareStrategy
            .apply(&input, &analysis, &config, &mut warnings)
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.allow_oversize, Some(true));
    }
}
