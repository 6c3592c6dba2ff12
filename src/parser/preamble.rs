//! Preamble extractor (component 4): isolates and classifies content
//! that precedes the document's first header.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::types::{Header, PreambleInfo, PreambleType};

const MIN_PREAMBLE_CHARS: usize = 50;
const MIN_PREAMBLE_LINES: usize = 2;

static METADATA_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\w+\s*:\s*\S+").unwrap());

/// Extract the preamble given the document's line list and its headers.
/// Returns `None` if there is no header (whole document is preamble —
/// handled by the caller as a fallback-strategy document) or if the
/// preamble is below the size threshold.
pub fn extract_preamble(lines: &[&str], headers: &[Header]) -> Option<PreambleInfo> {
    let end_line = match headers.first() {
        Some(h) if h.line > 1 => h.line - 1,
        _ => return None,
    };

    let preamble_lines = &lines[0..end_line];
    let content = preamble_lines.join("\n");
    let non_blank = preamble_lines.iter().filter(|l| !l.trim().is_empty()).count();

    if content.trim().chars().count() < MIN_PREAMBLE_CHARS || non_blank < MIN_PREAMBLE_LINES {
        return None;
    }

    let preamble_type = classify(preamble_lines);
    let metadata_fields = if preamble_type == PreambleType::Metadata {
        extract_metadata_fields(preamble_lines)
    } else {
        HashMap::new()
    };

    Some(PreambleInfo {
        start_line: 1,
        end_line,
        preamble_type,
        content,
        metadata_fields,
    })
}

fn classify(lines: &[&str]) -> PreambleType {
    let leading_metadata_lines = lines
        .iter()
        .take_while(|l| l.trim().is_empty() || METADATA_LINE.is_match(l))
        .filter(|l| METADATA_LINE.is_match(l))
        .count();
    if leading_metadata_lines >= 2 {
        return PreambleType::Metadata;
    }

    let first_paragraph = lines
        .iter()
        .find(|l| !l.trim().is_empty())
        .copied()
        .unwrap_or("");
    let lower = first_paragraph.to_lowercase();
    if ["tl;dr", "summary", "abstract", "synopsis"]
        .iter()
        .any(|kw| lower.trim_start().starts_with(kw))
    {
        return PreambleType::Summary;
    }

    let whole_lower = lines.join(" ").to_lowercase();
    if ["introduction", "overview", "about", "welcome"]
        .iter()
        .any(|kw| whole_lower.contains(kw))
    {
        return PreambleType::Introduction;
    }

    PreambleType::General
}

fn extract_metadata_fields(lines: &[&str]) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in lines {
        if let Some(idx) = line.find(':') {
            if METADATA_LINE.is_match(line) {
                let key = line[..idx].trim().to_string();
                let value = line[idx + 1..].trim().to_string();
                if !key.is_empty() && !value.is_empty() {
                    fields.insert(key, value);
                }
            }
        }
    }
    fields
}
