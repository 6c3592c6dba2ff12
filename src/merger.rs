//! Block packer / merger (component 9): coalesces under-minimum
//! chunks produced by any strategy, without crossing atomic or
//! section-path boundaries.

use crate::config::ChunkConfig;
use crate::types::{Chunk, ContentType};

fn is_atomic(chunk: &Chunk) -> bool {
    matches!(chunk.metadata.content_type, ContentType::Code | ContentType::Table)
}

/// Whether merging `a` and `b` would cross a section-path boundary at
/// or below `respect_level`. `respect_level == 0` disables the check.
fn crosses_section_boundary(a: &Chunk, b: &Chunk, respect_level: u8) -> bool {
    if respect_level == 0 {
        return false;
    }
    a.metadata.section_path != b.metadata.section_path
}

fn merge_pair(chunks: &mut Vec<Chunk>, keep: usize, drop: usize) {
    let removed = chunks.remove(drop);
    let kept = &mut chunks[keep];
    if drop > keep {
        kept.content = format!("{}\n\n{}", kept.content, removed.content);
        kept.end_line = removed.end_line;
    } else {
        kept.content = format!("{}\n\n{}", removed.content, kept.content);
        kept.start_line = removed.start_line;
    }
    if kept.metadata.content_type != removed.metadata.content_type {
        kept.metadata.content_type = ContentType::Mixed;
    }
    kept.metadata.size = kept.content.chars().count();
}

/// Scan chunks left to right, merging any chunk under `min_chunk_size`
/// with a non-atomic neighbor when the combined size still fits under
/// `max_chunk_size`. Chunks that cannot be merged emit an
/// `undersized_chunk` warning but are left as-is.
pub fn merge_undersized(mut chunks: Vec<Chunk>, config: &ChunkConfig, warnings: &mut Vec<String>) -> Vec<Chunk> {
    let mut i = 0;
    while i < chunks.len() {
        if is_atomic(&chunks[i]) || chunks[i].size() >= config.min_chunk_size {
            i += 1;
            continue;
        }

        let can_merge_next = i + 1 < chunks.len()
            && !is_atomic(&chunks[i + 1])
            && !crosses_section_boundary(&chunks[i], &chunks[i + 1], config.respect_header_level)
            && chunks[i].size() + chunks[i + 1].size() <= config.max_chunk_size;

        if can_merge_next {
            merge_pair(&mut chunks, i, i + 1);
            continue;
        }

        let can_merge_prev = i > 0
            && !is_atomic(&chunks[i - 1])
            && !crosses_section_boundary(&chunks[i - 1], &chunks[i], config.respect_header_level)
            && chunks[i - 1].size() + chunks[i].size() <= config.max_chunk_size;

        if can_merge_prev {
            merge_pair(&mut chunks, i - 1, i);
            i -= 1;
            continue;
        }

        warnings.push(format!(
            "undersized_chunk at lines {}-{}",
            chunks[i].start_line, chunks[i].end_line
        ));
        i += 1;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, StrategyKind};

    fn text_chunk(content: &str, start: usize, end: usize) -> Chunk {
        let mut metadata = ChunkMetadata::new(StrategyKind::Fallback, ContentType::Text);
        metadata.size = content.chars().count();
        Chunk::new(content.to_string(), start, end, metadata)
    }

    #[test]
    fn undersized_chunk_merges_with_next() {
        let chunks = vec![text_chunk("short", 1, 1), text_chunk("a longer following chunk body", 2, 2)];
        let config = ChunkConfig {
            min_chunk_size: 10,
            max_chunk_size: 1000,
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let merged = merge_undersized(chunks, &config, &mut warnings);
        assert_eq!(merged.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn atomic_chunk_never_merged() {
        let mut code = text_chunk("code", 1, 1);
        code.metadata.content_type = ContentType::Code;
        let chunks = vec![code, text_chunk("more text after", 2, 2)];
        let config = ChunkConfig {
            min_chunk_size: 100,
            max_chunk_size: 1000,
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let merged = merge_undersized(chunks, &config, &mut warnings);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn undersized_chunk_between_atomic_neighbors_warns() {
        let mut before = text_chunk("code before", 1, 1);
        before.metadata.content_type = ContentType::Code;
        let short = text_chunk("short", 2, 2);
        let mut after = text_chunk("code after", 3, 3);
        after.metadata.content_type = ContentType::Code;
        let chunks = vec![before, short, after];
        let config = ChunkConfig {
            min_chunk_size: 100,
            max_chunk_size: 1000,
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let merged = merge_undersized(chunks, &config, &mut warnings);
        assert_eq!(merged.len(), 3);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("undersized_chunk"));
    }
}
