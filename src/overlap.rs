//! Overlap manager (component 10): attaches neighbor previous/next
//! context, block-aware and fence-safe, as metadata or inline.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ChunkConfig, OverlapMode};
use crate::types::Chunk;

static FENCE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(`{3,}|~{3,})").unwrap());

/// Attach overlap metadata (and, in inline mode, mutate `content`)
/// across the chunk sequence. No-op when `enable_overlap` is false.
pub fn apply_overlap(chunks: &mut [Chunk], config: &ChunkConfig, warnings: &mut Vec<String>) {
    if !config.enable_overlap || chunks.len() < 2 {
        return;
    }

    let mut previous_texts = vec![None; chunks.len()];
    let mut next_texts = vec![None; chunks.len()];

    for i in 0..chunks.len() {
        if i > 0 {
            let k = config.effective_overlap_size(chunks[i - 1].size());
            match extract_suffix_blocks(&chunks[i - 1].content, k) {
                Some(text) if !has_unbalanced_fence(&text) => previous_texts[i] = Some(text),
                Some(_) => warnings.push(format!("overlap_skipped_fence at chunk {}", i)),
                None => warnings.push(format!("overlap_skipped_oversize at chunk {}", i)),
            }
        }
        if i + 1 < chunks.len() {
            let k = config.effective_overlap_size(chunks[i + 1].size());
            match extract_prefix_blocks(&chunks[i + 1].content, k) {
                Some(text) if !has_unbalanced_fence(&text) => next_texts[i] = Some(text),
                Some(_) => warnings.push(format!("overlap_skipped_fence at chunk {}", i)),
                None => warnings.push(format!("overlap_skipped_oversize at chunk {}", i)),
            }
        }
    }

    for (i, chunk) in chunks.iter_mut().enumerate() {
        if let Some(prev) = &previous_texts[i] {
            chunk.metadata.overlap_size_prev = prev.chars().count();
            chunk.metadata.previous_chunk_index = Some(i - 1);
            chunk.metadata.previous_content = Some(prev.clone());
            chunk.metadata.has_overlap = true;
        }
        if let Some(next) = &next_texts[i] {
            chunk.metadata.overlap_size_next = next.chars().count();
            chunk.metadata.next_chunk_index = Some(i + 1);
            chunk.metadata.next_content = Some(next.clone());
            chunk.metadata.has_overlap = true;
        }

        if config.overlap_mode == OverlapMode::Inline {
            let mut content = chunk.content.clone();
            if let Some(prev) = &previous_texts[i] {
                content = format!("{}\n\n{}", prev, content);
            }
            if let Some(next) = &next_texts[i] {
                content = format!("{}\n\n{}", content, next);
            }
            chunk.content = content;
        }
    }
}

/// Split text into blank-line-delimited blocks (paragraphs, list runs,
/// code fences kept whole since a fence never contains a blank line at
/// its own nesting level in already-chunked content).
fn blocks(text: &str) -> Vec<&str> {
    text.split("\n\n").filter(|b| !b.trim().is_empty()).collect()
}

/// Take complete trailing blocks up to `limit` chars; `None` if even
/// the last block alone exceeds `limit`.
fn extract_suffix_blocks(text: &str, limit: usize) -> Option<String> {
    if limit == 0 {
        return Some(String::new());
    }
    let blocks = blocks(text);
    let mut taken = Vec::new();
    let mut total = 0;
    for block in blocks.iter().rev() {
        let len = block.chars().count();
        if taken.is_empty() && len > limit {
            return None;
        }
        if total + len > limit {
            break;
        }
        taken.push(*block);
        total += len;
    }
    taken.reverse();
    Some(taken.join("\n\n"))
}

/// Take complete leading blocks up to `limit` chars; `None` if even the
/// first block alone exceeds `limit`.
fn extract_prefix_blocks(text: &str, limit: usize) -> Option<String> {
    if limit == 0 {
        return Some(String::new());
    }
    let blocks = blocks(text);
    let mut taken = Vec::new();
    let mut total = 0;
    for block in blocks.iter() {
        let len = block.chars().count();
        if taken.is_empty() && len > limit {
            return None;
        }
        if total + len > limit {
            break;
        }
        taken.push(*block);
        total += len;
    }
    Some(taken.join("\n\n"))
}

/// Whether the extracted text would introduce an unclosed or unopened
/// fence marker: an odd count of fence-looking lines.
fn has_unbalanced_fence(text: &str) -> bool {
    text.lines().filter(|l| FENCE_LINE.is_match(l)).count() % 2 != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, ContentType, StrategyKind};

    fn chunk(content: &str) -> Chunk {
        let mut metadata = ChunkMetadata::new(StrategyKind::Fallback, ContentType::Text);
        metadata.size = content.chars().count();
        Chunk::new(content.to_string(), 1, 1, metadata)
    }

    #[test]
    fn metadata_mode_leaves_content_untouched() {
        let mut chunks = vec![
            chunk("First paragraph here with some body text."),
            chunk("Second paragraph here with some more text."),
        ];
        let config = ChunkConfig {
            overlap_size: 20,
            enable_overlap: true,
            overlap_mode: OverlapMode::Metadata,
            ..Default::default()
        };
        let mut warnings = Vec::new();
        apply_overlap(&mut chunks, &config, &mut warnings);
        assert_eq!(chunks[0].content, "First paragraph here with some body text.");
        assert!(chunks[1].metadata.previous_content.is_some());
        assert!(chunks[1].metadata.has_overlap);
    }

    #[test]
    fn inline_mode_mutates_content() {
        let mut chunks = vec![chunk("First paragraph text."), chunk("Second paragraph text.")];
        let config = ChunkConfig {
            overlap_size: 50,
            enable_overlap: true,
            overlap_mode: OverlapMode::Inline,
            ..Default::default()
        };
        let mut warnings = Vec::new();
        apply_overlap(&mut chunks, &config, &mut warnings);
        assert!(chunks[1].content.contains("First paragraph"));
    }

    #[test]
    fn disabled_overlap_is_a_no_op() {
        let mut chunks = vec![chunk("one"), chunk("two")];
        let config = ChunkConfig {
            enable_overlap: false,
            ..Default::default()
        };
        let mut warnings = Vec::new();
        apply_overlap(&mut chunks, &config, &mut warnings);
        assert!(chunks[1].metadata.previous_content.is_none());
    }

    #[test]
    fn unbalanced_fence_in_overlap_is_skipped() {
        let text = "```python\ndef f():\n    pass\n```\n\nmore text after";
        assert!(has_unbalanced_fence("```python\ndef f():"));
        let _ = text;
    }

    #[test]
    fn oversized_single_block_skips_overlap() {
        let huge = "word ".repeat(100);
        assert!(extract_suffix_blocks(&huge, 5).is_none());
        assert!(extract_prefix_blocks(&huge, 5).is_none());
    }
}
