//! Script detection and sentence segmentation shared by the content
//! analyzer, the fallback strategy, and the overlap manager.

pub mod cjk;
pub mod unicode;

pub use cjk::{detect_cjk_language, has_arabic, has_cjk};
pub use unicode::SentenceSegmenter;
