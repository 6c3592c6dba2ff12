//! Completeness validator (component 12): confirms the chunk sequence
//! covers the input well enough to trust, without requiring byte-exact
//! reconstruction.

use std::collections::HashSet;

use crate::config::ChunkConfig;
use crate::types::{Chunk, MissingContentBlock, ValidationResult};

/// Longest run of missing contiguous lines tolerated regardless of
/// overall coverage ratio.
const MAX_MISSING_RUN: usize = 10;

fn normalize(line: &str) -> String {
    line.trim().to_string()
}

/// Compare input lines against the union of lines present in any output
/// chunk (whitespace-normalized), reporting coverage and any missing
/// contiguous runs.
pub fn validate(input: &str, chunks: &[Chunk], config: &ChunkConfig) -> ValidationResult {
    let input_lines: Vec<&str> = input.lines().collect();
    let input_chars = input.chars().count();
    let output_chars: usize = chunks.iter().map(|c| c.content.chars().count()).sum();

    let mut covered_lines: HashSet<String> = HashSet::new();
    for chunk in chunks {
        for line in chunk.content.lines() {
            let normalized = normalize(line);
            if !normalized.is_empty() {
                covered_lines.insert(normalized);
            }
        }
    }

    let mut missing_blocks = Vec::new();
    let mut warnings = Vec::new();
    let mut missing_chars = 0usize;

    let mut run_start: Option<usize> = None;
    for (i, line) in input_lines.iter().enumerate() {
        let normalized = normalize(line);
        let is_covered = normalized.is_empty() || covered_lines.contains(&normalized);
        if is_covered {
            if let Some(start) = run_start.take() {
                close_run(&input_lines, start, i, &mut missing_blocks, &mut missing_chars);
            }
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }
    if let Some(start) = run_start {
        close_run(&input_lines, start, input_lines.len(), &mut missing_blocks, &mut missing_chars);
    }

    let char_coverage = if input_chars == 0 {
        1.0
    } else {
        1.0 - (missing_chars as f64 / input_chars as f64)
    };

    let mut is_valid = char_coverage >= 1.0 - config.coverage_tolerance;
    for block in &missing_blocks {
        let run_len = block.end_line - block.start_line + 1;
        if run_len > MAX_MISSING_RUN {
            is_valid = false;
            warnings.push(format!(
                "missing_content_block at lines {}-{} ({} lines)",
                block.start_line, block.end_line, run_len
            ));
        }
    }
    if char_coverage < 1.0 - config.coverage_tolerance {
        warnings.push(format!(
            "char_coverage {:.4} below tolerance threshold {:.4}",
            char_coverage,
            1.0 - config.coverage_tolerance
        ));
    }

    ValidationResult {
        is_valid,
        input_chars,
        output_chars,
        missing_chars,
        char_coverage,
        missing_blocks,
        warnings,
    }
}

fn close_run(
    input_lines: &[&str],
    start: usize,
    end: usize,
    missing_blocks: &mut Vec<MissingContentBlock>,
    missing_chars: &mut usize,
) {
    let run = &input_lines[start..end];
    let size_chars: usize = run.iter().map(|l| l.chars().count() + 1).sum();
    *missing_chars += size_chars;
    let preview: String = run.join("\n").chars().take(100).collect();
    missing_blocks.push(MissingContentBlock {
        start_line: start + 1,
        end_line: end,
        content_preview: preview,
        size_chars,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkMetadata, ContentType, StrategyKind};

    fn chunk(content: &str, start: usize, end: usize) -> Chunk {
        Chunk::new(
            content.to_string(),
            start,
            end,
            ChunkMetadata::new(StrategyKind::Fallback, ContentType::Text),
        )
    }

    #[test]
    fn fully_covered_input_is_valid() {
        let input = "line one\nline two\nline three";
        let chunks = vec![chunk("line one\nline two\nline three", 1, 3)];
        let config = ChunkConfig::default();
        let result = validate(input, &chunks, &config);
        assert!(result.is_valid);
        assert_eq!(result.missing_chars, 0);
        assert!(result.missing_blocks.is_empty());
    }

    #[test]
    fn large_missing_gap_is_invalid() {
        let mut lines: Vec<String> = (0..20).map(|i| format!("body line {}", i)).collect();
        lines.insert(0, "kept line".to_string());
        let input = lines.join("\n");
        let chunks = vec![chunk("kept line", 1, 1)];
        let config = ChunkConfig::default();
        let result = validate(&input, &chunks, &config);
        assert!(!result.is_valid);
        assert!(result.missing_blocks.iter().any(|b| b.end_line - b.start_line + 1 > 10));
    }

    #[test]
    fn small_gap_within_tolerance_stays_valid() {
        let input = (0..200)
            .map(|i| format!("body line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let mut kept_lines: Vec<&str> = input.lines().collect();
        // Drop 3 contiguous lines out of 200; well within default tolerance.
        kept_lines.drain(50..53);
        let output = kept_lines.join("\n");
        let chunks = vec![chunk(&output, 1, 197)];
        let config = ChunkConfig::default();
        let result = validate(&input, &chunks, &config);
        assert!(result.is_valid);
    }
}
