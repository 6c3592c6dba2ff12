//! Element detector (component 2): headers, tables, lists, and URL runs.
//! Lines already claimed by a fenced code block are skipped entirely —
//! headers, list markers, and table syntax inside code are not elements.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{
    Alignment, FencedBlock, Header, ListBlock, ListType, TableBlock, UrlRun,
};

static ATX_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$").unwrap());
static SETEXT_H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"^=+\s*$").unwrap());
static SETEXT_H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-+\s*$").unwrap());
static TABLE_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\|.*\|\s*$").unwrap());
static TABLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\|?(\s*:?-{3,}:?\s*\|)+\s*:?-{3,}:?\s*\|?\s*$").unwrap());
static UNORDERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)([-*+])\s+").unwrap());
static ORDERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)(\d+)\.\s+").unwrap());
static TASK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([-*+])\s+\[([ xX])\]\s+").unwrap());
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

fn byte_offset_of_line(lines: &[&str], line_idx: usize) -> usize {
    lines[..line_idx].iter().map(|l| l.len() + 1).sum()
}

/// Scan headers (ATX and Setext), skipping lines inside `fences`.
pub fn scan_headers(lines: &[&str], fences: &[FencedBlock]) -> Vec<Header> {
    let mut headers = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line_num = i + 1;
        if crate::parser::fence::line_in_any_block(fences, line_num) {
            i += 1;
            continue;
        }
        let line = lines[i];
        if let Some(caps) = ATX_HEADER.captures(line) {
            let level = caps.get(1).unwrap().as_str().len() as u8;
            let text = caps.get(2).unwrap().as_str().trim().to_string();
            headers.push(Header {
                line: line_num,
                level,
                text,
                byte_offset: byte_offset_of_line(lines, i),
            });
            i += 1;
            continue;
        }
        // Setext: current line is text, next line is the underline.
        if i + 1 < lines.len() && !line.trim().is_empty() {
            let next = lines[i + 1];
            let next_line_num = i + 2;
            if !crate::parser::fence::line_in_any_block(fences, next_line_num)
                && !is_list_marker(line)
            {
                if SETEXT_H1.is_match(next) {
                    headers.push(Header {
                        line: line_num,
                        level: 1,
                        text: line.trim().to_string(),
                        byte_offset: byte_offset_of_line(lines, i),
                    });
                    i += 2;
                    continue;
                }
                if SETEXT_H2.is_match(next) {
                    headers.push(Header {
                        line: line_num,
                        level: 2,
                        text: line.trim().to_string(),
                        byte_offset: byte_offset_of_line(lines, i),
                    });
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }
    headers
}

fn is_list_marker(line: &str) -> bool {
    UNORDERED_MARKER.is_match(line) || ORDERED_MARKER.is_match(line) || TASK_MARKER.is_match(line)
}

/// Scan GFM pipe tables: header row + separator row + >=1 data row.
pub fn scan_tables(lines: &[&str], fences: &[FencedBlock]) -> Vec<TableBlock> {
    let mut tables = Vec::new();
    let mut i = 0;
    while i + 1 < lines.len() {
        let line_num = i + 1;
        if crate::parser::fence::line_in_any_block(fences, line_num) {
            i += 1;
            continue;
        }
        if TABLE_ROW.is_match(lines[i]) && TABLE_SEPARATOR.is_match(lines[i + 1]) {
            let header_cols = split_row(lines[i]).len();
            let sep_cols = split_row(lines[i + 1]).len();
            if header_cols == sep_cols && header_cols > 0 {
                let alignments = alignments_from_separator(lines[i + 1]);
                let mut j = i + 2;
                let mut data_rows = 0;
                while j < lines.len()
                    && TABLE_ROW.is_match(lines[j])
                    && !crate::parser::fence::line_in_any_block(fences, j + 1)
                {
                    data_rows += 1;
                    j += 1;
                }
                if data_rows > 0 {
                    tables.push(TableBlock {
                        start_line: line_num,
                        end_line: j,
                        column_count: header_cols,
                        header_row_line: line_num,
                        separator_row_line: line_num + 1,
                        data_row_count: data_rows,
                        alignments,
                    });
                    i = j;
                    continue;
                }
            }
        }
        i += 1;
    }
    tables
}

fn split_row(line: &str) -> Vec<&str> {
    let trimmed = line.trim().trim_start_matches('|').trim_end_matches('|');
    trimmed.split('|').collect()
}

fn alignments_from_separator(line: &str) -> Vec<Alignment> {
    split_row(line)
        .iter()
        .map(|cell| {
            let cell = cell.trim();
            let left = cell.starts_with(':');
            let right = cell.ends_with(':');
            match (left, right) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            }
        })
        .collect()
}

/// Scan ordered/unordered/task lists, grouping contiguous list-item runs.
pub fn scan_lists(lines: &[&str], fences: &[FencedBlock], warnings: &mut Vec<String>) -> Vec<ListBlock> {
    let mut lists = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line_num = i + 1;
        if crate::parser::fence::line_in_any_block(fences, line_num) {
            i += 1;
            continue;
        }
        if let Some(kind) = marker_kind(lines[i]) {
            let start = i;
            let mut item_count = 0;
            let mut max_depth = 1;
            let mut kinds_seen = std::collections::HashSet::new();
            let mut saw_tab_indent = false;
            let mut j = i;
            while j < lines.len() {
                let jl = j + 1;
                if crate::parser::fence::line_in_any_block(fences, jl) {
                    break;
                }
                let line = lines[j];
                if line.trim().is_empty() {
                    // Blank line: list continues only if next non-blank line is still a marker.
                    if let Some(next_nonblank) = (j + 1..lines.len()).find(|&k| !lines[k].trim().is_empty()) {
                        if marker_kind(lines[next_nonblank]).is_some() && next_nonblank - j <= 1 {
                            j += 1;
                            continue;
                        }
                    }
                    break;
                }
                match marker_kind(line) {
                    Some(k) => {
                        kinds_seen.insert(k);
                        item_count += 1;
                        let indent = leading_spaces(line);
                        if line.starts_with('\t') {
                            saw_tab_indent = true;
                        }
                        let depth = indent / 2 + 1;
                        max_depth = max_depth.max(depth);
                        j += 1;
                    }
                    None => {
                        // continuation line (indented text) belongs to the previous item
                        if leading_spaces(line) >= 2 {
                            j += 1;
                        } else {
                            break;
                        }
                    }
                }
            }
            if saw_tab_indent {
                warnings.push(format!("mixed tab/space list indentation near line {}", line_num));
            }
            let list_type = if kinds_seen.len() > 1 {
                ListType::Mixed
            } else {
                match kinds_seen.iter().next() {
                    Some(MarkerKind::Ordered) => ListType::Ordered,
                    Some(MarkerKind::Task) => ListType::Task,
                    _ => ListType::Unordered,
                }
            };
            lists.push(ListBlock {
                start_line: start + 1,
                end_line: j,
                list_type,
                item_count,
                max_nesting_depth: max_depth,
            });
            i = j;
            let _ = kind;
            continue;
        }
        i += 1;
    }
    lists
}

fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MarkerKind {
    Ordered,
    Unordered,
    Task,
}

fn marker_kind(line: &str) -> Option<MarkerKind> {
    if TASK_MARKER.is_match(line) {
        Some(MarkerKind::Task)
    } else if ORDERED_MARKER.is_match(line) {
        Some(MarkerKind::Ordered)
    } else if UNORDERED_MARKER.is_match(line) {
        Some(MarkerKind::Unordered)
    } else {
        None
    }
}

/// Three or more consecutive lines that each contain a URL.
pub fn scan_url_runs(lines: &[&str], fences: &[FencedBlock]) -> Vec<UrlRun> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if crate::parser::fence::line_in_any_block(fences, i + 1) || !URL_PATTERN.is_match(lines[i])
        {
            i += 1;
            continue;
        }
        let start = i;
        let mut j = i;
        while j < lines.len()
            && !crate::parser::fence::line_in_any_block(fences, j + 1)
            && URL_PATTERN.is_match(lines[j])
        {
            j += 1;
        }
        if j - start >= 3 {
            runs.push(UrlRun {
                start_line: start + 1,
                end_line: j,
            });
        }
        i = j.max(i + 1);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx_header_detected() {
        let lines = vec!["# Title", "", "body"];
        let headers = scan_headers(&lines, &[]);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].level, 1);
        assert_eq!(headers[0].text, "Title");
    }

    #[test]
    fn setext_headers_detected() {
        let lines = vec!["Title", "=====", "", "Sub", "---", "text"];
        let headers = scan_headers(&lines, &[]);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].level, 1);
        assert_eq!(headers[1].level, 2);
    }

    #[test]
    fn headers_inside_fence_ignored() {
        let fence = FencedBlock {
            start_line: 1,
            end_line: 3,
            fence_type: crate::types::FenceType::Backtick,
            fence_length: 3,
            indent: 0,
            language: None,
            nesting_level: 0,
            unclosed: false,
        };
        let lines = vec!["```", "# not a header", "```"];
        let headers = scan_headers(&lines, &[fence]);
        assert!(headers.is_empty());
    }

    #[test]
    fn table_with_data_row_detected() {
        let lines = vec!["| A | B |", "|---|---|", "| 1 | 2 |"];
        let tables = scan_tables(&lines, &[]);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].column_count, 2);
        assert_eq!(tables[0].data_row_count, 1);
    }

    #[test]
    fn table_without_data_row_rejected() {
        let lines = vec!["| A | B |", "|---|---|"];
        let tables = scan_tables(&lines, &[]);
        assert!(tables.is_empty());
    }

    #[test]
    fn unordered_list_detected() {
        let lines = vec!["- one", "- two", "- three"];
        let mut warnings = Vec::new();
        let lists = scan_lists(&lines, &[], &mut warnings);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].item_count, 3);
        assert_eq!(lists[0].list_type, ListType::Unordered);
    }

    #[test]
    fn task_list_detected() {
        let lines = vec!["- [ ] todo", "- [x] done"];
        let mut warnings = Vec::new();
        let lists = scan_lists(&lines, &[], &mut warnings);
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].list_type, ListType::Task);
    }

    #[test]
    fn url_run_requires_three_lines() {
        let lines = vec!["http://a.com", "http://b.com"];
        assert!(scan_url_runs(&lines, &[]).is_empty());
        let lines = vec!["http://a.com", "http://b.com", "http://c.com"];
        assert_eq!(scan_url_runs(&lines, &[]).len(), 1);
    }
}
