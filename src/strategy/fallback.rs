//! Fallback strategy (component 8): unconditional paragraph/sentence/
//! word splitter, used when neither code-aware nor structural applies.

use crate::config::ChunkConfig;
use crate::error::Result;
use crate::parser;
use crate::textutil::pack_greedy;
use crate::types::{Chunk, ChunkMetadata, ContentAnalysis, ContentType, StrategyKind};

use super::Strategy;

pub struct FallbackStrategy;

impl Strategy for FallbackStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    fn can_handle(&self, _analysis: &ContentAnalysis, _config: &ChunkConfig) -> bool {
        true
    }

    fn quality(&self, analysis: &ContentAnalysis) -> f64 {
        (1.0 - analysis.complexity_score).clamp(0.0, 1.0)
    }

    fn apply(
        &self,
        input: &str,
        _analysis: &ContentAnalysis,
        config: &ChunkConfig,
        _warnings: &mut Vec<String>,
    ) -> Result<Vec<Chunk>> {
        let normalized = parser::normalize_line_endings(input);
        let lines: Vec<&str> = normalized.lines().collect();
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let packed = pack_greedy(&lines, 1, lines.len(), config.max_chunk_size);
        let chunks = packed
            .into_iter()
            .map(|(content, start, end)| {
                let mut metadata = ChunkMetadata::new(StrategyKind::Fallback, ContentType::Text);
                metadata.size = content.chars().count();
                Chunk::new(content, start, end, metadata)
            })
            .collect();
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    #[test]
    fn always_handles_any_input() {
        let config = ChunkConfig::default();
        let analysis = analyze("plain text", &config);
        assert!(FallbackStrategy.can_handle(&analysis, &config));
    }

    #[test]
    fn packs_paragraphs_under_bound() {
        let input = "Para one.\n\nPara two.\n\nPara three.\n";
        let mut config = ChunkConfig::default();
        config.max_chunk_size = 1000;
        let analysis = analyze(input, &config);
        let mut warnings = Vec::new();
        let chunks = FallbackStrategy
            .apply(input, &analysis, &config, &mut warnings)
            .unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn splits_oversized_single_paragraph() {
        let input = "sentence one here. sentence two here. sentence three here. sentence four here.";
        let mut config = ChunkConfig::default();
        config.max_chunk_size = 30;
        let analysis = analyze(input, &config);
        let mut warnings = Vec::new();
        let chunks = FallbackStrategy
            .apply(input, &analysis, &config, &mut warnings)
            .unwrap();
        assert!(chunks.len() > 1);
    }
}
