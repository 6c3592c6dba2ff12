// src/segmentation/unicode.rs
//! Sentence segmentation for the fallback strategy's sentence-split tier
//! and for the overlap manager's sentence-suffix/prefix extraction.

use unicode_segmentation::UnicodeSegmentation;

pub struct SentenceSegmenter;

impl SentenceSegmenter {
    /// Universal (works for all languages)
    pub fn split_universal(text: &str) -> Vec<String> {
        text.unicode_sentences().map(str::to_string).collect()
    }

    /// Language-specific (better accuracy)
    pub fn split_with_language(text: &str, language: &str) -> Vec<String> {
        match language {
            "ja" => Self::split_japanese(text),
            "zh" | "zh-CN" | "zh-TW" => Self::split_chinese(text),
            "ar" | "ar-SA" | "ar-EG" => Self::split_arabic(text),
            _ => Self::split_universal(text),
        }
    }

    pub fn split_japanese(text: &str) -> Vec<String> {
        text.split(['。', '！', '？'])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn split_chinese(text: &str) -> Vec<String> {
        text.split(['。', '！', '？', '；'])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn split_arabic(text: &str) -> Vec<String> {
        // Arabic uses period (.), question mark (؟), and exclamation mark (!) for sentences
        text.split(['.', '؟', '!', '،'])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Segment using the best available strategy: detected CJK language,
    /// else Arabic, else the universal Unicode sentence-break algorithm.
    pub fn split_auto(text: &str) -> Vec<String> {
        if let Some(lang) = super::cjk::detect_cjk_language(text) {
            return Self::split_with_language(text, lang);
        }
        if super::cjk::has_arabic(text) {
            return Self::split_arabic(text);
        }
        Self::split_universal(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_english_sentences() {
        let sentences = SentenceSegmenter::split_universal("One. Two. Three.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn splits_japanese_sentences() {
        let sentences = SentenceSegmenter::split_japanese("これは文です。これも文です。");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn splits_chinese_sentences() {
        let sentences = SentenceSegmenter::split_chinese("第一句。第二句！第三句；");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn splits_arabic_sentences() {
        let sentences = SentenceSegmenter::split_arabic("جملة أولى. جملة ثانية؟");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn auto_dispatches_by_detected_script() {
        let sentences = SentenceSegmenter::split_auto("これは文です。これも文です。");
        assert_eq!(sentences.len(), 2);
        let sentences = SentenceSegmenter::split_auto("One sentence. Another sentence.");
        assert_eq!(sentences.len(), 2);
    }
}
