//! Content analyzer (component 3): turns the raw element lists from
//! `parser` into ratios, counts, a content-type classification, and a
//! complexity score.

use std::collections::HashMap;

use crate::config::ChunkConfig;
use crate::parser;
use crate::types::{ContentAnalysis, ContentTypeClass, Elements};

/// Run the full structural parser and compute the resulting analysis
/// record. This is the sole entry point components 1–4 are driven
/// through; strategies and the selector only ever see the result.
pub fn analyze(input: &str, config: &ChunkConfig) -> ContentAnalysis {
    let normalized = parser::normalize_line_endings(input);
    let lines: Vec<&str> = normalized.lines().collect();
    let total_lines = lines.len();
    let total_chars = normalized.chars().count();

    let mut warnings = Vec::new();

    let fenced_blocks = parser::scan_fences(&lines, &mut warnings);
    let headers = parser::scan_headers(&lines, &fenced_blocks);
    let tables = parser::scan_tables(&lines, &fenced_blocks);
    let lists = parser::scan_lists(&lines, &fenced_blocks, &mut warnings);
    let url_runs = parser::scan_url_runs(&lines, &fenced_blocks);

    let preamble = if config.extract_preamble {
        parser::extract_preamble(&lines, &headers)
    } else {
        None
    };

    let code_chars = sum_line_chars(&lines, line_ranges(&fenced_blocks));
    let table_chars = sum_line_chars(&lines, line_ranges(&tables));
    let list_chars = sum_line_chars(&lines, line_ranges(&lists));
    let claimed_chars = code_chars + table_chars + list_chars;
    let text_chars = total_chars.saturating_sub(claimed_chars.min(total_chars));

    let denom = total_chars.max(1) as f64;
    let code_ratio = code_chars as f64 / denom;
    let table_ratio = table_chars as f64 / denom;
    let list_ratio = list_chars as f64 / denom;
    let text_ratio = text_chars as f64 / denom;

    let mut header_count_by_level: HashMap<u8, usize> = HashMap::new();
    for h in &headers {
        *header_count_by_level.entry(h.level).or_insert(0) += 1;
    }

    let content_type = classify_content_type(
        code_ratio,
        fenced_blocks.len(),
        list_ratio,
        lists.len(),
        table_ratio,
        tables.len(),
        text_ratio,
        &header_count_by_level,
        config.structural_min_headers,
    );

    let has_mixed_content = [code_ratio, list_ratio, table_ratio, text_ratio]
        .iter()
        .filter(|r| **r >= 0.1)
        .count()
        >= 3;

    let complexity_score = complexity_score(
        code_ratio,
        list_ratio,
        table_ratio,
        headers.len(),
        total_lines,
        has_mixed_content,
    );

    ContentAnalysis {
        total_chars,
        total_lines,
        code_ratio,
        text_ratio,
        list_ratio,
        table_ratio,
        code_block_count: fenced_blocks.len(),
        list_count: lists.len(),
        table_count: tables.len(),
        header_count_by_level,
        elements: Elements {
            fenced_blocks,
            headers,
            tables,
            lists,
            url_runs,
        },
        content_type,
        complexity_score,
        has_mixed_content,
        preamble,
        warnings,
    }
}

trait LineSpan {
    fn span(&self) -> (usize, usize);
}
impl LineSpan for crate::types::FencedBlock {
    fn span(&self) -> (usize, usize) {
        (self.start_line, self.end_line)
    }
}
impl LineSpan for crate::types::TableBlock {
    fn span(&self) -> (usize, usize) {
        (self.start_line, self.end_line)
    }
}
impl LineSpan for crate::types::ListBlock {
    fn span(&self) -> (usize, usize) {
        (self.start_line, self.end_line)
    }
}

fn line_ranges<T: LineSpan>(items: &[T]) -> Vec<(usize, usize)> {
    items.iter().map(|i| i.span()).collect()
}

fn sum_line_chars(lines: &[&str], ranges: Vec<(usize, usize)>) -> usize {
    ranges
        .into_iter()
        .map(|(start, end)| {
            lines[(start - 1).min(lines.len())..end.min(lines.len())]
                .iter()
                .map(|l| l.chars().count() + 1) // +1 for the newline
                .sum::<usize>()
        })
        .sum()
}

#[allow(clippy::too_many_arguments)]
fn classify_content_type(
    code_ratio: f64,
    code_block_count: usize,
    list_ratio: f64,
    list_count: usize,
    table_ratio: f64,
    table_count: usize,
    text_ratio: f64,
    header_count_by_level: &HashMap<u8, usize>,
    structural_min_headers: usize,
) -> ContentTypeClass {
    if code_ratio >= 0.7 && code_block_count >= 3 {
        return ContentTypeClass::CodeHeavy;
    }
    if list_ratio >= 0.6 || list_count >= 5 {
        return ContentTypeClass::ListHeavy;
    }
    if table_ratio >= 0.4 || table_count >= 3 {
        return ContentTypeClass::TableHeavy;
    }
    let ratios_above_tenth = [code_ratio, list_ratio, table_ratio, text_ratio]
        .iter()
        .filter(|r| **r >= 0.1)
        .count();
    if ratios_above_tenth >= 3 {
        return ContentTypeClass::Mixed;
    }
    let max_at_any_level = header_count_by_level.values().copied().max().unwrap_or(0);
    if max_at_any_level >= structural_min_headers {
        return ContentTypeClass::Structural;
    }
    ContentTypeClass::Plain
}

fn complexity_score(
    code_ratio: f64,
    list_ratio: f64,
    table_ratio: f64,
    header_count: usize,
    total_lines: usize,
    has_mixed_content: bool,
) -> f64 {
    let header_density = header_count as f64 / (total_lines as f64 / 10.0).max(1.0);
    let mixed_indicator = if has_mixed_content { 1.0 } else { 0.0 };
    let score = 0.3 * code_ratio
        + 0.2 * list_ratio
        + 0.15 * table_ratio
        + 0.15 * header_density
        + 0.2 * mixed_indicator;
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentTypeClass;

    #[test]
    fn plain_text_classified_plain() {
        let analysis = analyze("Just a short paragraph with nothing special.", &ChunkConfig::default());
        assert_eq!(analysis.content_type, ContentTypeClass::Plain);
    }

    #[test]
    fn structural_document_classified() {
        let text = "# One\n\nbody\n\n## Two\n\nbody\n\n### Three\n\nbody\n";
        let analysis = analyze(text, &ChunkConfig::default());
        assert_eq!(analysis.content_type, ContentTypeClass::Structural);
    }

    #[test]
    fn code_heavy_document_classified() {
        let text = "```py\ndef a(): pass\n```\n```py\ndef b(): pass\n```\n```py\ndef c(): pass\n```\n";
        let analysis = analyze(text, &ChunkConfig::default());
        assert_eq!(analysis.code_block_count, 3);
        assert_eq!(analysis.content_type, ContentTypeClass::CodeHeavy);
    }

    #[test]
    fn complexity_score_within_bounds() {
        let text = "# H\n\n```py\ncode\n```\n\n- a\n- b\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let analysis = analyze(text, &ChunkConfig::default());
        assert!(analysis.complexity_score >= 0.0 && analysis.complexity_score <= 1.0);
    }
}
