// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text segmentation for the storyboard view.
//!
//! Splits a script into a target number of on-screen segments, either by
//! sentence, by word, or by raw character count.

use std::fmt;
use std::str::FromStr;

/// Strategy used to cut a script into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentMode {
    #[default]
    Sentence,
    Word,
    Even,
}

impl SegmentMode {
    pub const ALL: [SegmentMode; 3] = [SegmentMode::Sentence, SegmentMode::Word, SegmentMode::Even];

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentMode::Sentence => "sentence",
            SegmentMode::Word => "word",
            SegmentMode::Even => "even",
        }
    }
}

impl fmt::Display for SegmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentence" => Ok(SegmentMode::Sentence),
            "word" => Ok(SegmentMode::Word),
            "even" => Ok(SegmentMode::Even),
            other => Err(anyhow::anyhow!("Unknown segment mode: {}", other)),
        }
    }
}

/// Upper bound on the number of segments [`segment_text`] produces.
pub const MAX_SEGMENTS: usize = 64;

/// Split `text` into at most `segments` display segments.
///
/// Whitespace is collapsed first; empty input yields no segments. The segment
/// count is clamped to `1..=MAX_SEGMENTS`.
pub fn segment_text(text: &str, mode: SegmentMode, segments: usize) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Vec::new();
    }
    let segments = segments.clamp(1, MAX_SEGMENTS);

    match mode {
        SegmentMode::Sentence => merge_sentences(split_sentences(&collapsed), segments),
        SegmentMode::Word => {
            let words: Vec<&str> = collapsed.split(' ').filter(|w| !w.is_empty()).collect();
            chunk_evenly(&words, segments)
                .into_iter()
                .map(|chunk| chunk.join(" "))
                .collect()
        }
        SegmentMode::Even => {
            let chars: Vec<char> = collapsed.chars().collect();
            chunk_evenly(&chars, segments)
                .into_iter()
                .map(|chunk| chunk.iter().collect())
                .collect()
        }
    }
}

/// Split on whitespace that follows `.`, `!` or `?`. Expects collapsed input.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev = None;

    for (idx, ch) in text.char_indices() {
        if ch == ' ' && matches!(prev, Some('.' | '!' | '?')) {
            parts.push(&text[start..idx]);
            start = idx + 1;
        }
        prev = Some(ch);
    }
    parts.push(&text[start..]);
    parts.retain(|p| !p.is_empty());
    parts
}

/// Merge sentences into exactly `segments` buckets whose sizes differ by at
/// most one. Sentences that already fit are returned untouched.
fn merge_sentences(sentences: Vec<&str>, segments: usize) -> Vec<String> {
    if sentences.len() <= segments {
        return sentences.into_iter().map(str::to_string).collect();
    }

    let base = sentences.len() / segments;
    let extra = sentences.len() % segments;
    let mut out = Vec::with_capacity(segments);
    let mut start = 0;
    for i in 0..segments {
        let size = base + usize::from(i < extra);
        out.push(sentences[start..start + size].join(" "));
        start += size;
    }
    out
}

/// Ceiling-sized chunks, always `segments` of them; trailing chunks are
/// empty once the input runs out.
fn chunk_evenly<T>(values: &[T], segments: usize) -> Vec<&[T]> {
    let per = values.len().div_ceil(segments).max(1);
    (0..segments)
        .map(|i| {
            let start = (i * per).min(values.len());
            let end = ((i + 1) * per).min(values.len());
            &values[start..end]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_nothing() {
        for mode in SegmentMode::ALL {
            assert!(segment_text("", mode, 4).is_empty());
            assert!(segment_text("   \n\t ", mode, 4).is_empty());
        }
    }

    #[test]
    fn test_huge_segment_count_is_capped() {
        let segments = crate::util::number::parse_str_loose("1e20", 6.0).max(0.0) as usize;
        assert_eq!(segments, usize::MAX);

        let out = segment_text("a b c", SegmentMode::Word, segments);
        assert_eq!(out.len(), MAX_SEGMENTS);
        assert_eq!(&out[..3], &["a", "b", "c"]);
        assert!(out[3..].iter().all(String::is_empty));

        let out = segment_text("abc", SegmentMode::Even, usize::MAX);
        assert_eq!(out.len(), MAX_SEGMENTS);

        let out = segment_text("One. Two.", SegmentMode::Sentence, usize::MAX);
        assert_eq!(out, vec!["One.", "Two."]);
    }

    #[test]
    fn test_sentences_merge_into_buckets() {
        let out = segment_text("One. Two. Three.", SegmentMode::Sentence, 2);
        assert_eq!(out, vec!["One. Two.", "Three."]);
    }

    #[test]
    fn test_sentences_that_fit_are_not_padded() {
        let out = segment_text("Hi there!  How are you?\nFine.", SegmentMode::Sentence, 6);
        assert_eq!(out, vec!["Hi there!", "How are you?", "Fine."]);
    }

    #[test]
    fn test_sentence_buckets_are_balanced() {
        for sentence_count in 2..20usize {
            let text: Vec<String> = (0..sentence_count).map(|i| format!("S{}.", i)).collect();
            let text = text.join(" ");
            for segments in 1..sentence_count {
                let out = segment_text(&text, SegmentMode::Sentence, segments);
                assert_eq!(out.len(), segments);

                let sizes: Vec<usize> = out.iter().map(|b| b.split(' ').count()).collect();
                let max = *sizes.iter().max().unwrap();
                let min = *sizes.iter().min().unwrap();
                assert!(max - min <= 1, "unbalanced {:?}", sizes);
                assert_eq!(out.join(" "), text);
            }
        }
    }

    #[test]
    fn test_word_mode_pads_with_empty_buckets() {
        let out = segment_text("a b c d e", SegmentMode::Word, 4);
        assert_eq!(out, vec!["a b", "c d", "e", ""]);
    }

    #[test]
    fn test_even_mode_chunks_by_char() {
        let out = segment_text("abcdefg", SegmentMode::Even, 3);
        assert_eq!(out, vec!["abc", "def", "g"]);

        let out = segment_text("ab", SegmentMode::Even, 4);
        assert_eq!(out, vec!["a", "b", "", ""]);
    }

    #[test]
    fn test_zero_segments_treated_as_one() {
        assert_eq!(segment_text("a b c", SegmentMode::Word, 0), vec!["a b c"]);
        assert_eq!(segment_text("A. B.", SegmentMode::Sentence, 0), vec!["A. B."]);
        assert_eq!(segment_text("abc", SegmentMode::Even, 0), vec!["abc"]);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Word".parse::<SegmentMode>().unwrap(), SegmentMode::Word);
        assert!("paragraph".parse::<SegmentMode>().is_err());
    }
}
