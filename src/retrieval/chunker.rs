//! Overlapping text splitting for ingestion.
//!
//! Splits on the strongest boundary available — paragraph, then line, then
//! sentence, then word — and only hard-splits a fragment that still exceeds
//! the chunk size with no boundary to cut at. Adjacent chunks share a tail
//! of roughly `overlap` characters so sentence context survives the cut.

use std::collections::VecDeque;

const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

pub struct TextSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let fragments = split_recursive(text, SEPARATORS, self.chunk_size);
        self.merge(fragments)
    }

    /// Merge boundary fragments into chunks of at most `chunk_size` bytes,
    /// carrying a fragment tail of up to `overlap` bytes into the next chunk.
    fn merge(&self, fragments: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<String> = VecDeque::new();
        let mut window_len = 0usize;

        for frag in fragments {
            let frag_len = frag.len();
            if window_len + frag_len > self.chunk_size && !window.is_empty() {
                chunks.push(join_window(&window));
                while window_len > self.overlap
                    || (window_len + frag_len > self.chunk_size && !window.is_empty())
                {
                    match window.pop_front() {
                        Some(removed) => window_len -= removed.len(),
                        None => break,
                    }
                }
            }
            window_len += frag_len;
            window.push_back(frag);
        }
        if window_len > 0 {
            chunks.push(join_window(&window));
        }

        chunks
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }
}

fn join_window(window: &VecDeque<String>) -> String {
    window.iter().map(String::as_str).collect()
}

/// Break `text` into fragments no longer than `chunk_size`, preferring the
/// earliest separator in the list that applies.
fn split_recursive(text: &str, separators: &[&str], chunk_size: usize) -> Vec<String> {
    if text.len() <= chunk_size {
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
    }

    let Some((sep, rest)) = separators.split_first() else {
        return hard_split(text, chunk_size);
    };

    let mut fragments = Vec::new();
    for piece in text.split_inclusive(*sep) {
        if piece.len() <= chunk_size {
            fragments.push(piece.to_string());
        } else {
            fragments.extend(split_recursive(piece, rest, chunk_size));
        }
    }
    fragments
}

/// Last resort: cut at char boundaries every `chunk_size` bytes
fn hard_split(text: &str, chunk_size: usize) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if current.len() + ch.len_utf8() > chunk_size && !current.is_empty() {
            fragments.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}
