//! Structural parser: fence scanning, element detection, and preamble
//! extraction over a line-ending-normalized document.

pub mod elements;
pub mod fence;
pub mod preamble;

pub use elements::{scan_headers, scan_lists, scan_tables, scan_url_runs};
pub use fence::scan_fences;
pub use preamble::extract_preamble;

/// Normalize CRLF and bare CR line endings to LF, per the input
/// constraint that scanning always proceeds over LF-only text.
pub fn normalize_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}
