//! Structural strategy (component 7): splits on the header hierarchy,
//! preserving section paths, and packs oversize sections by paragraph.

use crate::config::ChunkConfig;
use crate::error::Result;
use crate::parser;
use crate::textutil::{join_lines, pack_greedy};
use crate::types::{
    Chunk, ChunkMetadata, ContentAnalysis, ContentType, Header, PreambleInfo, StrategyKind,
};

use super::Strategy;

pub struct StructuralStrategy;

impl Strategy for StructuralStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Structural
    }

    fn can_handle(&self, analysis: &ContentAnalysis, config: &ChunkConfig) -> bool {
        analysis.distinct_header_levels() >= 2
            || analysis.header_count() >= config.structural_min_headers
    }

    fn quality(&self, analysis: &ContentAnalysis) -> f64 {
        let level_score = (analysis.distinct_header_levels() as f64 / 6.0).min(1.0);
        let density = (analysis.header_count() as f64 / (analysis.total_lines.max(1) as f64 / 20.0))
            .min(1.0);
        (level_score * 0.5 + density * 0.5).clamp(0.0, 1.0)
    }

    fn apply(
        &self,
        input: &str,
        analysis: &ContentAnalysis,
        config: &ChunkConfig,
        _warnings: &mut Vec<String>,
    ) -> Result<Vec<Chunk>> {
        let normalized = parser::normalize_line_endings(input);
        let lines: Vec<&str> = normalized.lines().collect();
        let headers = &analysis.elements.headers;

        let mut chunks = Vec::new();

        if let Some(preamble) = &analysis.preamble {
            if config.separate_preamble_chunk {
                let mut metadata = ChunkMetadata::new(StrategyKind::Structural, ContentType::Preamble);
                metadata.section_path = String::new();
                metadata.size = preamble.content.chars().count();
                chunks.push(Chunk::new(
                    preamble.content.clone(),
                    preamble.start_line,
                    preamble.end_line,
                    metadata,
                ));
            }
        }

        let sections = build_sections(headers, lines.len());
        render_section_list(&lines, &sections, "", config, &mut chunks);

        if let Some(preamble) = &analysis.preamble {
            if !config.separate_preamble_chunk {
                fold_preamble_into_first_chunk(&mut chunks, preamble);
            }
        }

        Ok(chunks)
    }
}

/// When `separate_preamble_chunk` is false (the default), the preamble
/// is not its own chunk: it is prepended into whatever chunk the
/// document's first section produced, which keeps that chunk's own
/// `section_path` (the preamble itself never gets a section path of
/// its own). If structural produced no chunks at all, the preamble
/// becomes a standalone chunk so its content is never dropped.
fn fold_preamble_into_first_chunk(chunks: &mut Vec<Chunk>, preamble: &PreambleInfo) {
    match chunks.first_mut() {
        Some(first) => {
            first.content = format!("{}\n\n{}", preamble.content, first.content);
            first.start_line = preamble.start_line;
            first.metadata.size = first.content.chars().count();
        }
        None => {
            let mut metadata = ChunkMetadata::new(StrategyKind::Structural, ContentType::Preamble);
            metadata.section_path = String::new();
            metadata.size = preamble.content.chars().count();
            chunks.push(Chunk::new(
                preamble.content.clone(),
                preamble.start_line,
                preamble.end_line,
                metadata,
            ));
        }
    }
}

struct SectionNode {
    header: Header,
    start_line: usize,
    end_line: usize,
    children: Vec<SectionNode>,
}

/// Build the section tree for one level of `headers`, recursing into
/// the span between each top-level header and the next header at the
/// same or shallower level.
fn build_sections(headers: &[Header], doc_end: usize) -> Vec<SectionNode> {
    if headers.is_empty() {
        return Vec::new();
    }
    let min_level = headers.iter().map(|h| h.level).min().unwrap();
    let mut sections = Vec::new();
    let mut i = 0;
    while i < headers.len() {
        if headers[i].level != min_level {
            i += 1;
            continue;
        }
        let end_line = end_of_section(headers, i, doc_end);
        let mut j = i + 1;
        while j < headers.len() && headers[j].level > min_level {
            j += 1;
        }
        let children = build_sections(&headers[i + 1..j], end_line);
        sections.push(SectionNode {
            header: headers[i].clone(),
            start_line: headers[i].line,
            end_line,
            children,
        });
        i = j;
    }
    sections
}

fn end_of_section(headers: &[Header], idx: usize, doc_end: usize) -> usize {
    let level = headers[idx].level;
    for h in &headers[idx + 1..] {
        if h.level <= level {
            return h.line - 1;
        }
    }
    doc_end
}

fn section_size(lines: &[&str], node: &SectionNode) -> usize {
    join_lines(lines, node.start_line, node.end_line).chars().count()
}

fn render_section_list(
    lines: &[&str],
    nodes: &[SectionNode],
    parent_path: &str,
    config: &ChunkConfig,
    chunks: &mut Vec<Chunk>,
) {
    let mut i = 0;
    while i < nodes.len() {
        if i + 1 < nodes.len() {
            let size_i = section_size(lines, &nodes[i]);
            let size_next = section_size(lines, &nodes[i + 1]);
            let both_simple = nodes[i].children.is_empty() && nodes[i + 1].children.is_empty();
            if both_simple && size_i + size_next <= config.target_chunk_size {
                let content = format!(
                    "{}\n\n{}",
                    join_lines(lines, nodes[i].start_line, nodes[i].end_line),
                    join_lines(lines, nodes[i + 1].start_line, nodes[i + 1].end_line)
                );
                let path = format!("{}/{}", parent_path, nodes[i].header.text);
                let mut metadata = ChunkMetadata::new(StrategyKind::Structural, ContentType::Text);
                metadata.section_path = path;
                metadata.header_path =
                    vec![nodes[i].header.text.clone(), nodes[i + 1].header.text.clone()];
                metadata.header_count = 2;
                metadata.min_header_level =
                    Some(nodes[i].header.level.min(nodes[i + 1].header.level));
                metadata.max_header_level =
                    Some(nodes[i].header.level.max(nodes[i + 1].header.level));
                metadata.size = content.chars().count();
                chunks.push(Chunk::new(
                    content,
                    nodes[i].start_line,
                    nodes[i + 1].end_line,
                    metadata,
                ));
                i += 2;
                continue;
            }
        }
        render_section(lines, &nodes[i], parent_path, config, chunks);
        i += 1;
    }
}

fn render_section(
    lines: &[&str],
    node: &SectionNode,
    parent_path: &str,
    config: &ChunkConfig,
    chunks: &mut Vec<Chunk>,
) {
    let path = format!("{}/{}", parent_path, node.header.text);
    let size = section_size(lines, node);

    if (size as f64) <= config.max_chunk_size as f64 * 1.2 {
        let content = join_lines(lines, node.start_line, node.end_line);
        let mut metadata = ChunkMetadata::new(StrategyKind::Structural, ContentType::Text);
        metadata.section_path = path;
        metadata.header_path = vec![node.header.text.clone()];
        metadata.header_count = 1;
        metadata.min_header_level = Some(node.header.level);
        metadata.max_header_level = Some(node.header.level);
        metadata.size = content.chars().count();
        chunks.push(Chunk::new(content, node.start_line, node.end_line, metadata));
        return;
    }

    // Descend: own content is the header plus any text before the
    // first subsection; it is never duplicated into continuation
    // chunks, but `section_path` is set on every resulting chunk.
    let own_end = node
        .children
        .first()
        .map(|c| c.start_line - 1)
        .unwrap_or(node.end_line);

    if own_end >= node.start_line {
        for (content, cs, ce) in pack_greedy(lines, node.start_line, own_end, config.max_chunk_size) {
            let mut metadata = ChunkMetadata::new(StrategyKind::Structural, ContentType::Text);
            metadata.section_path = path.clone();
            metadata.header_path = vec![node.header.text.clone()];
            metadata.header_count = 1;
            metadata.min_header_level = Some(node.header.level);
            metadata.max_header_level = Some(node.header.level);
            metadata.size = content.chars().count();
            chunks.push(Chunk::new(content, cs, ce, metadata));
        }
    }

    render_section_list(lines, &node.children, &path, config, chunks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn single_section_document_is_one_chunk() {
        let input = "# Hello\n\nWorld paragraph.\n";
        let config = ChunkConfig::default();
        let analysis = analyze(input, &config);
        let mut warnings = Vec::new();
        let chunks = StructuralStrategy
            .apply(input, &analysis, &config, &mut warnings)
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.section_path, "/Hello");
    }

    #[test]
    fn nested_headers_produce_nested_section_paths() {
        let input = "# One\n\nintro\n\n## Two\n\nbody\n";
        let mut config = ChunkConfig::default();
        config.max_chunk_size = 5; // force descent
        config.target_chunk_size = 5;
        let analysis = analyze(input, &config);
        let mut warnings = Vec::new();
        let chunks = StructuralStrategy
            .apply(input, &analysis, &config, &mut warnings)
            .unwrap();
        assert!(chunks.iter().any(|c| c.metadata.section_path.contains("Two")));
    }

    #[test]
    fn preamble_chunk_has_empty_section_path_when_separated() {
        let input = "Document metadata here with enough text to qualify.\nSecond line of preamble content.\n\n# Title\n\nBody text.\n";
        let mut config = ChunkConfig::default();
        config.separate_preamble_chunk = true;
        let analysis = analyze(input, &config);
        let mut warnings = Vec::new();
        let chunks = StructuralStrategy
            .apply(input, &analysis, &config, &mut warnings)
            .unwrap();
        assert_eq!(chunks[0].metadata.content_type, ContentType::Preamble);
        assert_eq!(chunks[0].metadata.section_path, "");
    }

    #[test]
    fn preamble_is_folded_into_first_section_by_default() {
        let input = "Document metadata here with enough text to qualify.\nSecond line of preamble content.\n\n# Title\n\nBody text.\n";
        let config = ChunkConfig::default();
        assert!(!config.separate_preamble_chunk);
        let analysis = analyze(input, &config);
        let mut warnings = Vec::new();
        let chunks = StructuralStrategy
            .apply(input, &analysis, &config, &mut warnings)
            .unwrap();
        assert!(!chunks.iter().any(|c| c.metadata.content_type == ContentType::Preamble));
        assert!(chunks[0].content.contains("Document metadata here"));
        assert_eq!(chunks[0].metadata.section_path, "/Title");
    }
}
