//! Paragraph, sentence, and word splitting shared by the code-aware
//! and fallback strategies.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::segmentation::{has_arabic, has_cjk, SentenceSegmenter};

static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.?!])(\s+|$)").unwrap());

const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
    "inc.", "ltd.", "co.", "u.s.", "u.k.", "fig.", "no.", "approx.",
];

/// Split an absolute line range into paragraph line-ranges (1-indexed,
/// inclusive), treating runs of blank lines as separators.
pub fn paragraphs_in_range(lines: &[&str], start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut i = start;
    while i <= end && i >= 1 && i <= lines.len() {
        if lines[i - 1].trim().is_empty() {
            i += 1;
            continue;
        }
        let p_start = i;
        while i <= end && i <= lines.len() && !lines[i - 1].trim().is_empty() {
            i += 1;
        }
        out.push((p_start, i - 1));
    }
    out
}

/// Join a 1-indexed inclusive line range into a single string.
pub fn join_lines(lines: &[&str], start: usize, end: usize) -> String {
    if start == 0 || start > end || end > lines.len() {
        return String::new();
    }
    lines[start - 1..end].join("\n")
}

/// Split text at sentence boundaries, keeping common abbreviations
/// intact. Dispatches to the CJK/Arabic-aware segmenter when the text
/// contains non-Latin scripts.
pub fn split_sentences(text: &str) -> Vec<String> {
    if has_cjk(text) || has_arabic(text) {
        return SentenceSegmenter::split_auto(text);
    }

    let mut sentences = Vec::new();
    let mut last = 0;
    for caps in SENTENCE_BOUNDARY.captures_iter(text) {
        let m = caps.get(0).unwrap();
        let candidate = text[last..m.end()].trim();
        if candidate.is_empty() {
            continue;
        }
        if ends_with_abbreviation(candidate) {
            continue; // keep accumulating into the next boundary
        }
        sentences.push(candidate.to_string());
        last = m.end();
    }
    let tail = text[last..].trim();
    if !tail.is_empty() {
        if let Some(last_sentence) = sentences.last_mut() {
            if ends_with_abbreviation(last_sentence) {
                last_sentence.push(' ');
                last_sentence.push_str(tail);
                return sentences;
            }
        }
        sentences.push(tail.to_string());
    }
    if sentences.is_empty() && !text.trim().is_empty() {
        sentences.push(text.trim().to_string());
    }
    sentences
}

fn ends_with_abbreviation(sentence: &str) -> bool {
    let last_word = sentence.split_whitespace().last().unwrap_or("").to_lowercase();
    if ABBREVIATIONS.contains(&last_word.as_str()) {
        return true;
    }
    // Single capital letter followed by a period, e.g. an initial: "A."
    let chars: Vec<char> = last_word.chars().collect();
    chars.len() == 2 && chars[0].is_ascii_alphabetic() && chars[1] == '.'
}

/// Split text into words as a last resort when a single sentence still
/// exceeds the size bound.
pub fn split_words(text: &str) -> Vec<&str> {
    text.unicode_words().collect()
}

/// A unit of text ready to be packed into a chunk: its content, and
/// the 1-indexed inclusive line range it was drawn from. Units
/// produced by splitting a single line (sentence/word fallback) all
/// report that line's own range, since intra-line position is not
/// tracked (the teacher's recursive splitter does the same).
struct Unit {
    content: String,
    start_line: usize,
    end_line: usize,
}

fn paragraph_to_units(lines: &[&str], start: usize, end: usize, max_chunk_size: usize) -> Vec<Unit> {
    let text = join_lines(lines, start, end);
    if text.chars().count() <= max_chunk_size {
        return vec![Unit {
            content: text,
            start_line: start,
            end_line: end,
        }];
    }

    let mut units = Vec::new();
    for sentence in split_sentences(&text) {
        if sentence.chars().count() <= max_chunk_size {
            units.push(Unit {
                content: sentence,
                start_line: start,
                end_line: end,
            });
            continue;
        }
        // Last resort: pack words greedily under the bound.
        let words = split_words(&sentence);
        let mut current = String::new();
        for word in words {
            let candidate_len = current.chars().count() + word.chars().count() + 1;
            if !current.is_empty() && candidate_len > max_chunk_size {
                units.push(Unit {
                    content: std::mem::take(&mut current),
                    start_line: start,
                    end_line: end,
                });
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            units.push(Unit {
                content: current,
                start_line: start,
                end_line: end,
            });
        }
    }
    units
}

/// Split an absolute line range into paragraphs, recursively splitting
/// any paragraph too large to fit in one chunk at sentence then word
/// boundaries, then pack the resulting units greedily under
/// `max_chunk_size`. Returns `(content, start_line, end_line)` triples
/// in document order.
pub fn pack_greedy(
    lines: &[&str],
    start: usize,
    end: usize,
    max_chunk_size: usize,
) -> Vec<(String, usize, usize)> {
    let paragraphs = paragraphs_in_range(lines, start, end);
    let mut units = Vec::new();
    for (p_start, p_end) in paragraphs {
        units.extend(paragraph_to_units(lines, p_start, p_end, max_chunk_size));
    }

    let mut packed = Vec::new();
    let mut current = String::new();
    let mut current_start = 0;
    let mut current_end = 0;

    for unit in units {
        let joined_len = if current.is_empty() {
            unit.content.chars().count()
        } else {
            current.chars().count() + 2 + unit.content.chars().count()
        };
        if !current.is_empty() && joined_len > max_chunk_size {
            packed.push((std::mem::take(&mut current), current_start, current_end));
        }
        if current.is_empty() {
            current_start = unit.start_line;
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(&unit.content);
        current_end = unit.end_line;
    }
    if !current.is_empty() {
        packed.push((current, current_start, current_end));
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_separated_by_blank_lines() {
        let text = "a\nb\n\nc\n\n\nd\n";
        let lines: Vec<&str> = text.lines().collect();
        let paragraphs = paragraphs_in_range(&lines, 1, lines.len());
        assert_eq!(paragraphs, vec![(1, 2), (4, 4), (7, 7)]);
    }

    #[test]
    fn sentence_split_basic() {
        let sentences = split_sentences("One. Two. Three.");
        assert_eq!(sentences, vec!["One.", "Two.", "Three."]);
    }

    #[test]
    fn sentence_split_keeps_abbreviation_intact() {
        let sentences = split_sentences("Dr. Smith arrived. He left soon after.");
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].starts_with("Dr. Smith arrived."));
    }

    #[test]
    fn sentence_split_keeps_initials_intact() {
        let sentences = split_sentences("J. R. R. Tolkien wrote this. It is long.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn word_split_last_resort() {
        let words = split_words("one two three");
        assert_eq!(words, vec!["one", "two", "three"]);
    }

    #[test]
    fn pack_greedy_merges_small_paragraphs() {
        let text = "one\n\ntwo\n\nthree\n";
        let lines: Vec<&str> = text.lines().collect();
        let packed = pack_greedy(&lines, 1, lines.len(), 100);
        assert_eq!(packed.len(), 1);
    }

    #[test]
    fn pack_greedy_splits_oversized_paragraph() {
        let long = "word ".repeat(50);
        let lines: Vec<&str> = long.lines().collect();
        let packed = pack_greedy(&lines, 1, lines.len(), 20);
        assert!(packed.len() > 1);
        for (content, _, _) in &packed {
            assert!(content.chars().count() <= 20 || !content.contains(' '));
        }
    }
}
