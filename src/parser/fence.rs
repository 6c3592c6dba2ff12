//! Fence scanner (component 1): locates fenced code-block boundaries,
//! respecting the nesting-by-fence-length rule that lets an outer
//! 4-backtick fence safely contain an inner 3-backtick example.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{FenceType, FencedBlock};

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(`{3,}|~{3,})\s*([^\s`]*)?\s*$").unwrap());

/// Scan all lines and return fenced blocks in document order. `lines`
/// must already have had CRLF/CR line endings normalized to LF.
pub fn scan_fences(lines: &[&str], warnings: &mut Vec<String>) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if let Some((indent, fence_char, fence_len, language)) = match_fence_open(lines[i]) {
            let open_line = i + 1; // 1-indexed
            let mut close_line = None;
            let mut j = i + 1;
            while j < lines.len() {
                if let Some((close_indent, close_char, close_len, _)) = match_fence_open(lines[j])
                {
                    if close_char == fence_char && close_len >= fence_len && close_indent <= indent
                    {
                        close_line = Some(j + 1);
                        break;
                    }
                }
                j += 1;
            }

            let (end_line, unclosed) = match close_line {
                Some(line) => (line, false),
                None => {
                    warnings.push(format!("unclosed_fence at line {}", open_line));
                    (lines.len(), true)
                }
            };

            blocks.push(FencedBlock {
                start_line: open_line,
                end_line,
                fence_type: fence_char,
                fence_length: fence_len,
                indent,
                language,
                nesting_level: 0,
                unclosed,
            });

            i = end_line; // resume scanning after the closer (end_line is 1-indexed, body is [i, end_line))
        } else {
            i += 1;
        }
    }
    blocks
}

/// Matches a fence-open (or candidate-close) line; returns
/// `(indent, fence_type, length, language)`.
fn match_fence_open(line: &str) -> Option<(usize, FenceType, usize, Option<String>)> {
    let caps = FENCE_OPEN.captures(line)?;
    let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count());
    let fence_str = caps.get(2)?.as_str();
    let fence_type = if fence_str.starts_with('`') {
        FenceType::Backtick
    } else {
        FenceType::Tilde
    };
    let language = caps
        .get(3)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    Some((indent, fence_type, fence_str.len(), language))
}

/// True if `line` is within `[start_line, end_line]` of any block.
pub fn line_in_any_block(blocks: &[FencedBlock], line: usize) -> bool {
    blocks
        .iter()
        .any(|b| line >= b.start_line && line <= b.end_line)
}
