//! Metadata enricher (component 11): populates positional, structural,
//! and semantic metadata on every chunk after merging and overlap.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::textutil::split_sentences;
use crate::types::{Chunk, ContentType, Link, LinkType};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*[^*]+\*\*|__[^_]+__").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:[^*]|^)\*[^*]+\*(?:[^*]|$)|_[^_]+_").unwrap());
static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`\n]+`").unwrap());
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*(`{3,}|~{3,})(\S*)\s*$").unwrap());
static TABLE_ROW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*\|.*\|\s*$").unwrap());
static TABLE_SEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\|?(\s*:?-{3,}:?\s*\|)+\s*:?-{3,}:?\s*\|?\s*$").unwrap());
static ORDERED_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(\s*)\d+\.\s+").unwrap());
static TASK_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(\s*)[-*+]\s+\[[ xX]\]\s+").unwrap());
static UNORDERED_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(\s*)[-*+]\s+").unwrap());

const PREVIEW_MAX_CHARS: usize = 100;

/// Enrich every chunk in place. Must run after merging and overlap so
/// that `chunk_index`/`total_chunks` reflect the final sequence.
pub fn enrich(chunks: &mut [Chunk], document_id: Option<&str>) {
    let total = chunks.len();
    for (i, chunk) in chunks.iter_mut().enumerate() {
        chunk.metadata.chunk_index = i;
        chunk.metadata.total_chunks = total;
        chunk.metadata.is_first_chunk = i == 0;
        chunk.metadata.is_last_chunk = i + 1 == total;
        chunk.metadata.document_id = document_id.map(|s| s.to_string());

        chunk.metadata.size = chunk.content.chars().count();
        chunk.metadata.line_count = chunk.line_count();
        chunk.metadata.word_count = chunk.content.split_whitespace().count();

        enrich_content_specific(chunk);
        enrich_semantic_features(chunk);
        chunk.metadata.links = extract_links(&chunk.content);
        chunk.metadata.preview = preview(&chunk.content);
    }
}

fn enrich_content_specific(chunk: &mut Chunk) {
    match chunk.metadata.content_type {
        ContentType::Code => {
            if chunk.metadata.code_block_count.is_none() {
                chunk.metadata.code_block_count = Some(FENCE_RE.find_iter(&chunk.content).count() / 2);
            }
            chunk.metadata.has_imports.get_or_insert_with(|| has_import_keywords(&chunk.content));
            chunk.metadata.has_comments.get_or_insert_with(|| has_comment_markers(&chunk.content));
        }
        _ => {
            let fence_lines = FENCE_RE.find_iter(&chunk.content).count();
            if fence_lines >= 2 {
                chunk.metadata.code_block_count = Some(fence_lines / 2);
            }
        }
    }

    let table_rows: usize = TABLE_ROW_RE.find_iter(&chunk.content).count();
    if table_rows >= 2 && TABLE_SEP_RE.is_match(&chunk.content) {
        chunk.metadata.table_row_count = Some(table_rows.saturating_sub(2));
        chunk.metadata.has_column_alignment = Some(true);
        if let Some(first_row) = TABLE_ROW_RE.find(&chunk.content) {
            chunk.metadata.column_count =
                Some(first_row.as_str().trim().matches('|').count().saturating_sub(1));
        }
    }

    let ordered = ORDERED_ITEM_RE.find_iter(&chunk.content).count();
    let unordered_total = UNORDERED_ITEM_RE.find_iter(&chunk.content).count();
    let task = TASK_ITEM_RE.find_iter(&chunk.content).count();
    let unordered = unordered_total.saturating_sub(task);
    if ordered + unordered + task > 0 {
        chunk.metadata.ordered_item_count = Some(ordered);
        chunk.metadata.unordered_item_count = Some(unordered);
        chunk.metadata.task_item_count = Some(task);
        let depths: Vec<usize> = chunk
            .content
            .lines()
            .filter(|l| {
                ORDERED_ITEM_RE.is_match(l) || UNORDERED_ITEM_RE.is_match(l)
            })
            .map(|l| leading_spaces(l) / 2 + 1)
            .collect();
        chunk.metadata.max_list_depth = depths.iter().copied().max();
        chunk.metadata.has_nested_lists = Some(depths.iter().any(|d| *d > 1));
    }
}

fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

fn enrich_semantic_features(chunk: &mut Chunk) {
    let content = &chunk.content;
    chunk.metadata.has_urls = URL_RE.is_match(content);
    chunk.metadata.has_emails = EMAIL_RE.is_match(content);
    chunk.metadata.has_numbers = NUMBER_RE.is_match(content);
    chunk.metadata.has_bold = BOLD_RE.is_match(content);
    chunk.metadata.has_italic = ITALIC_RE.is_match(content);
    chunk.metadata.has_inline_code = INLINE_CODE_RE.is_match(content);
}

fn has_import_keywords(content: &str) -> bool {
    ["import ", "use ", "require(", "from ", "#include"]
        .iter()
        .any(|kw| content.contains(kw))
}

fn has_comment_markers(content: &str) -> bool {
    ["//", "#", "/*", "--"]
        .iter()
        .any(|marker| content.lines().any(|l| l.trim_start().starts_with(marker)))
}

fn preview(content: &str) -> String {
    let first_sentence = split_sentences(content.trim())
        .into_iter()
        .next()
        .unwrap_or_default();
    if first_sentence.chars().count() <= PREVIEW_MAX_CHARS {
        first_sentence
    } else {
        first_sentence.chars().take(PREVIEW_MAX_CHARS).collect()
    }
}

/// Extract markdown, wiki, reference, and autolink-style links.
/// Grounded in the teacher's link extractor; adapted to this crate's
/// `Link`/`LinkType` types.
pub fn extract_links(content: &str) -> Vec<Link> {
    let mut links = Vec::new();
    extract_markdown_links(content, &mut links);
    extract_wiki_links(content, &mut links);
    extract_reference_links(content, &mut links);
    extract_autolinks(content, &mut links);
    links
}

fn extract_markdown_links(content: &str, links: &mut Vec<Link>) {
    let mut chars = content.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '[' {
            continue;
        }
        if i > 0 && content.as_bytes().get(i - 1) == Some(&b'!') {
            continue;
        }
        let text_start = i + 1;
        let mut bracket_depth = 1;
        let mut text_end = None;
        for (j, ch) in chars.by_ref() {
            match ch {
                '[' => bracket_depth += 1,
                ']' => {
                    bracket_depth -= 1;
                    if bracket_depth == 0 {
                        text_end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(text_end) = text_end else { continue };
        if let Some(&(_, '(')) = chars.peek() {
            chars.next();
            let url_start = text_end + 2;
            let mut paren_depth = 1;
            let mut url_end = None;
            for (j, ch) in chars.by_ref() {
                match ch {
                    '(' => paren_depth += 1,
                    ')' => {
                        paren_depth -= 1;
                        if paren_depth == 0 {
                            url_end = Some(j);
                            break;
                        }
                    }
                    _ => {}
                }
            }
            if let Some(url_end) = url_end {
                let text = &content[text_start..text_end];
                let target_raw = &content[url_start..url_end];
                if !text.is_empty() && !target_raw.is_empty() {
                    let target = target_raw
                        .split_once(['"', '\''])
                        .map(|(url, _)| url.trim())
                        .unwrap_or(target_raw)
                        .trim();
                    links.push(Link {
                        text: text.to_string(),
                        target: target.to_string(),
                        link_type: LinkType::Markdown,
                    });
                }
            }
        }
    }
}

fn extract_wiki_links(content: &str, links: &mut Vec<Link>) {
    let bytes = content.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'[' && bytes[i + 1] == b'[' {
            let start = i + 2;
            let mut end = None;
            let mut j = start;
            while j + 1 < bytes.len() {
                if bytes[j] == b']' && bytes[j + 1] == b']' {
                    end = Some(j);
                    break;
                }
                j += 1;
            }
            if let Some(end) = end {
                let inner = &content[start..end];
                let (target, text) = match inner.find('|') {
                    Some(pipe) => (&inner[..pipe], &inner[pipe + 1..]),
                    None => (inner, inner),
                };
                if !target.is_empty() {
                    links.push(Link {
                        text: text.trim().to_string(),
                        target: target.trim().to_string(),
                        link_type: LinkType::Wiki,
                    });
                }
                i = end + 2;
                continue;
            }
        }
        i += 1;
    }
}

fn extract_reference_links(content: &str, links: &mut Vec<Link>) {
    let mut chars = content.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '[' {
            continue;
        }
        if i > 0 && content.as_bytes().get(i - 1) == Some(&b'!') {
            continue;
        }
        let text_start = i + 1;
        let mut bracket_depth = 1;
        let mut text_end = None;
        for (j, ch) in chars.by_ref() {
            match ch {
                '[' => bracket_depth += 1,
                ']' => {
                    bracket_depth -= 1;
                    if bracket_depth == 0 {
                        text_end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(text_end) = text_end else { continue };
        if let Some(&(_, '[')) = chars.peek() {
            chars.next();
            let ref_start = text_end + 2;
            let mut ref_end = None;
            for (j, ch) in chars.by_ref() {
                if ch == ']' {
                    ref_end = Some(j);
                    break;
                }
            }
            if let Some(ref_end) = ref_end {
                let text = &content[text_start..text_end];
                let reference = &content[ref_start..ref_end];
                if !text.is_empty() {
                    let target = if reference.is_empty() { text } else { reference };
                    links.push(Link {
                        text: text.to_string(),
                        target: target.to_string(),
                        link_type: LinkType::Reference,
                    });
                }
            }
        }
    }
}

fn extract_autolinks(content: &str, links: &mut Vec<Link>) {
    let bytes = content.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            let start = i + 1;
            if let Some(end_offset) = content[start..].find('>') {
                let inner = &content[start..start + end_offset];
                if inner.starts_with("http://")
                    || inner.starts_with("https://")
                    || inner.starts_with("mailto:")
                    || inner.starts_with("ftp://")
                {
                    links.push(Link {
                        text: inner.to_string(),
                        target: inner.to_string(),
                        link_type: LinkType::Autolink,
                    });
                }
                i = start + end_offset + 1;
                continue;
            }
        }
        i += 1;
    }
}
