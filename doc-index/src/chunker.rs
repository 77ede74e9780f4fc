//! Sliding-window chunking of page text.
//!
//! Whitespace is normalized before windowing (runs collapse to one space,
//! ends trimmed) so that window offsets are stable for a given page text and
//! chunk boundaries are meaningful. All window arithmetic is done in
//! characters; slicing maps back to byte offsets, so multibyte text is safe.

use tracing::trace;

use crate::config::ChunkConfig;
use crate::record::Segment;

/// Chunks one page into overlapping segments.
///
/// Pure function of `(text, page, cfg)`: the returned iterator is lazy and
/// finite, and calling again with the same inputs yields an identical
/// sequence, ids included. Candidates shorter than `cfg.min_chars` after
/// trimming are skipped; short trailing fragments carry no retrievable
/// signal.
pub fn chunk_page(text: &str, page: u32, cfg: &ChunkConfig) -> PageChunks {
    let normalized = normalize_whitespace(text);

    // Byte offset of every char boundary, plus the end; windows slice by
    // these so a window of N chars never splits a UTF-8 sequence.
    let mut byte_at: Vec<usize> = normalized.char_indices().map(|(i, _)| i).collect();
    byte_at.push(normalized.len());

    trace!(
        "chunk_page: page={} chars={} window={} step={}",
        page,
        byte_at.len() - 1,
        cfg.window_chars,
        cfg.step()
    );

    PageChunks {
        normalized,
        byte_at,
        page,
        window: cfg.window_chars,
        step: cfg.step(),
        min_chars: cfg.min_chars,
        start: 0,
    }
}

/// Lazy iterator over one page's segments. Created by [`chunk_page`].
pub struct PageChunks {
    normalized: String,
    byte_at: Vec<usize>,
    page: u32,
    window: usize,
    step: usize,
    min_chars: usize,
    /// Next window start, in characters.
    start: usize,
}

impl Iterator for PageChunks {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let total_chars = self.byte_at.len() - 1;

        while self.start < total_chars {
            let start = self.start;
            let end = (start + self.window).min(total_chars);
            self.start += self.step;

            let text = self.normalized[self.byte_at[start]..self.byte_at[end]].trim();
            if text.chars().count() >= self.min_chars {
                return Some(Segment {
                    id: format!("p{}-{}", self.page, start),
                    text: text.to_string(),
                    page: self.page,
                    embedding: None,
                });
            }
        }

        None
    }
}

/// Collapses every whitespace run into a single ASCII space and trims both
/// ends.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(window: usize, overlap: usize, min: usize) -> ChunkConfig {
        ChunkConfig {
            window_chars: window,
            overlap_chars: overlap,
            min_chars: min,
        }
    }

    fn offsets(segments: &[Segment], page: u32) -> Vec<usize> {
        segments
            .iter()
            .map(|s| {
                s.id.strip_prefix(&format!("p{page}-"))
                    .unwrap()
                    .parse()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn normalize_collapses_runs_and_trims() {
        assert_eq!(normalize_whitespace("  a\t\tb\n\n c  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn window_starts_advance_by_step() {
        let text = "x".repeat(3000);
        let segments: Vec<Segment> = chunk_page(&text, 1, &cfg(1000, 200, 50)).collect();
        let starts = offsets(&segments, 1);
        assert_eq!(starts, vec![0, 800, 1600, 2400]);
        for pair in starts.windows(2) {
            assert_eq!(pair[1] - pair[0], 800);
        }
    }

    #[test]
    fn twelve_hundred_chars_yield_two_windows() {
        let text = "a".repeat(1200);
        let segments: Vec<Segment> = chunk_page(&text, 1, &cfg(1000, 200, 50)).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].id, "p1-0");
        assert_eq!(segments[1].id, "p1-800");
        assert_eq!(segments[0].text.len(), 1000);
        assert_eq!(segments[1].text.len(), 400);
    }

    #[test]
    fn short_fragments_are_dropped() {
        // Second window would be 40 chars of trailing text: below the floor.
        let text = "b".repeat(140);
        let segments: Vec<Segment> = chunk_page(&text, 2, &cfg(100, 0, 50)).collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, "p2-0");

        let nothing: Vec<Segment> = chunk_page("too short", 2, &cfg(100, 0, 50)).collect();
        assert!(nothing.is_empty());
    }

    #[test]
    fn chunking_is_idempotent() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(60);
        let a: Vec<Segment> = chunk_page(&text, 7, &cfg(300, 60, 50)).collect();
        let b: Vec<Segment> = chunk_page(&text, 7, &cfg(300, 60, 50)).collect();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.text, y.text);
        }
    }

    #[test]
    fn multibyte_text_never_splits_a_char() {
        let text = "é".repeat(250);
        let segments: Vec<Segment> = chunk_page(&text, 1, &cfg(100, 20, 50)).collect();
        assert!(!segments.is_empty());
        for s in &segments {
            assert!(s.text.chars().count() <= 100);
            assert!(s.text.chars().all(|c| c == 'é'));
        }
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert_eq!(chunk_page("", 1, &ChunkConfig::default()).count(), 0);
        assert_eq!(chunk_page("   \n ", 1, &ChunkConfig::default()).count(), 0);
    }
}
