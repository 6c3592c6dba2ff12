//! Orchestrator (component 13): drives one chunking invocation through
//! its state machine and assembles the `ChunkingResult`.

use std::sync::Mutex;
use std::time::Instant;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::analyze;
use crate::config::ChunkConfig;
use crate::enrich;
use crate::error::{ChunkerError, Result};
use crate::merger;
use crate::overlap;
use crate::parser;
use crate::strategy::{all_strategies, Selector, Strategy};
use crate::types::{Chunk, ContentAnalysis, StrategyKind};
use crate::validate;

/// States the orchestrator passes through for one invocation. Exposed
/// for observability; callers never drive this directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Init,
    Analyzing,
    Selecting,
    Chunking,
    Merging,
    Overlapping,
    Enriching,
    Validating,
    Done,
    Failed,
}

/// The full result of one chunking invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingResult {
    pub chunks: Vec<Chunk>,
    pub analysis: ContentAnalysis,
    pub warnings: Vec<String>,
    pub strategy_used: String,
    pub processing_time_ms: u64,
    pub success: bool,
}

/// Per-stage wall-clock duration recorded for the most recent `run`,
/// gated behind `ChunkingEngine::with_metrics(true)`. A single sample
/// per stage, not an actual histogram: good enough to answer "which
/// stage is slow" for one invocation without the bookkeeping of
/// retaining a distribution across many.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    pub stage_durations_us: Vec<(String, u64)>,
}

/// The concrete orchestrator. Holds only its optional metrics flag and
/// the last-run metrics snapshot; safe to share behind `Arc` or
/// construct fresh per call.
#[derive(Debug, Default)]
pub struct ChunkingEngine {
    metrics_enabled: bool,
    metrics: Mutex<Metrics>,
}

impl ChunkingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Snapshot of per-stage durations from the most recent `run` call.
    /// Empty if `with_metrics(true)` was never set.
    pub fn metrics(&self) -> Metrics {
        self.metrics.lock().unwrap().clone()
    }

    fn record_stage(&self, timings: &mut Vec<(String, u64)>, stage_start: &mut Instant, name: &str) {
        if self.metrics_enabled {
            timings.push((name.to_string(), stage_start.elapsed().as_micros() as u64));
        }
        *stage_start = Instant::now();
    }

    fn store_metrics(&self, timings: Vec<(String, u64)>) {
        if self.metrics_enabled {
            *self.metrics.lock().unwrap() = Metrics {
                stage_durations_us: timings,
            };
        }
    }

    /// Run the full pipeline: analyze, select, chunk, merge, overlap,
    /// enrich, validate. Never panics on malformed input; all failure
    /// modes surface through `ChunkingResult::success` or `Err`.
    pub fn run(&self, input: &str, config: &ChunkConfig, forced: Option<StrategyKind>) -> Result<ChunkingResult> {
        let start = Instant::now();
        config.validate()?;

        let mut state = State::Init;
        let mut warnings = Vec::new();
        let mut stage_timings: Vec<(String, u64)> = Vec::new();
        let mut stage_start = Instant::now();

        if input.trim().is_empty() {
            warnings.push("empty_input".to_string());
            let analysis = analyze("", config);
            self.record_stage(&mut stage_timings, &mut stage_start, "init");
            self.store_metrics(stage_timings);
            return Ok(ChunkingResult {
                chunks: Vec::new(),
                analysis,
                warnings,
                strategy_used: String::new(),
                processing_time_ms: elapsed_ms(start),
                success: false,
            });
        }

        state = State::Analyzing;
        trace!("engine: entering {:?}", state);
        let normalized = parser::normalize_line_endings(input);
        let analysis = analyze(&normalized, config);
        warnings.extend(analysis.warnings.clone());
        self.record_stage(&mut stage_timings, &mut stage_start, "analyzing");

        state = State::Selecting;
        trace!("engine: entering {:?}", state);
        let strategies = all_strategies();
        let selected = match Selector::select(&strategies, &analysis, config, forced, &mut warnings) {
            Ok(s) => s,
            Err(err) => {
                state = State::Failed;
                warn!("engine: {:?}: {}", state, err);
                self.record_stage(&mut stage_timings, &mut stage_start, "selecting");
                self.store_metrics(stage_timings);
                return Err(err);
            }
        };
        self.record_stage(&mut stage_timings, &mut stage_start, "selecting");

        state = State::Chunking;
        trace!("engine: entering {:?}", state);
        let (chunks, strategy_used) =
            match self.chunk_with_retry(&strategies, selected, &normalized, &analysis, config, &mut warnings) {
                Ok(result) => result,
                Err(err) => {
                    state = State::Failed;
                    warn!("engine: {:?}: {}", state, err);
                    self.record_stage(&mut stage_timings, &mut stage_start, "chunking");
                    self.store_metrics(stage_timings);
                    return Err(err);
                }
            };
        self.record_stage(&mut stage_timings, &mut stage_start, "chunking");

        state = State::Merging;
        trace!("engine: entering {:?}", state);
        let chunks = merger::merge_undersized(chunks, config, &mut warnings);
        self.record_stage(&mut stage_timings, &mut stage_start, "merging");

        state = State::Overlapping;
        trace!("engine: entering {:?}", state);
        let mut chunks = chunks;
        overlap::apply_overlap(&mut chunks, config, &mut warnings);
        self.record_stage(&mut stage_timings, &mut stage_start, "overlapping");

        state = State::Enriching;
        trace!("engine: entering {:?}", state);
        enrich::enrich(&mut chunks, None);
        self.record_stage(&mut stage_timings, &mut stage_start, "enriching");

        state = State::Validating;
        trace!("engine: entering {:?}", state);
        let validation = validate::validate(&normalized, &chunks, config);
        warnings.extend(validation.warnings.clone());
        if !validation.is_valid {
            debug!(
                "engine: completeness validation below tolerance: coverage={:.4}",
                validation.char_coverage
            );
            if config.strict_validation {
                state = State::Failed;
                warn!("engine: {:?}: data loss in strict mode", state);
                self.record_stage(&mut stage_timings, &mut stage_start, "validating");
                self.store_metrics(stage_timings);
                return Err(ChunkerError::DataLoss {
                    char_coverage: validation.char_coverage,
                    missing_chars: validation.missing_chars,
                    input_chars: validation.input_chars,
                });
            }
        }
        self.record_stage(&mut stage_timings, &mut stage_start, "validating");

        self.check_invariants(&chunks)?;

        state = State::Done;
        trace!("engine: entering {:?}", state);
        let _ = state;
        self.store_metrics(stage_timings);

        Ok(ChunkingResult {
            chunks,
            analysis,
            warnings,
            strategy_used: strategy_used.as_str().to_string(),
            processing_time_ms: elapsed_ms(start),
            success: true,
        })
    }

    /// Apply `selected`; on `StrategyFailed`, retry once with the next
    /// applicable strategy by priority order before surfacing the error.
    fn chunk_with_retry<'a>(
        &self,
        strategies: &'a [Box<dyn Strategy>],
        selected: &'a dyn Strategy,
        input: &str,
        analysis: &ContentAnalysis,
        config: &ChunkConfig,
        warnings: &mut Vec<String>,
    ) -> Result<(Vec<Chunk>, StrategyKind)> {
        match selected.apply(input, analysis, config, warnings) {
            Ok(chunks) => Ok((chunks, selected.kind())),
            Err(first_err) => {
                warnings.push(format!(
                    "strategy '{}' failed, retrying with next by priority: {}",
                    selected.kind().as_str(),
                    first_err
                ));
                let next = strategies
                    .iter()
                    .filter(|s| s.kind() != selected.kind() && s.can_handle(analysis, config))
                    .min_by_key(|s| s.kind().priority());
                match next {
                    Some(fallback) => fallback
                        .apply(input, analysis, config, warnings)
                        .map(|chunks| (chunks, fallback.kind()))
                        .map_err(|_| ChunkerError::NoStrategyCanHandle),
                    None => Err(ChunkerError::NoStrategyCanHandle),
                }
            }
        }
    }

    fn check_invariants(&self, chunks: &[Chunk]) -> Result<()> {
        for (i, chunk) in chunks.iter().enumerate() {
            if chunk.is_empty_content() {
                return Err(ChunkerError::Invariant(format!("chunk {} is empty", i)));
            }
            if let Some(prev) = chunks.get(i.wrapping_sub(1)) {
                if i > 0 && chunk.start_line < prev.start_line {
                    return Err(ChunkerError::Invariant(format!(
                        "chunk {} starts before chunk {} (non-monotonic ordering)",
                        i,
                        i - 1
                    )));
                }
            }
        }
        Ok(())
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
