//! Pointwise mutual information over sliding-window co-occurrence.
//!
//! Each document contributes windows of `window` consecutive tokens; a document
//! shorter than the window contributes itself as one window. With `W` windows,
//! `W(i)` windows containing word `i` and `W(i, j)` windows containing both:
//!
//! `pmi(i, j) = ln(W(i, j) · W / (W(i) · W(j)))`
//!
//! Pairs are emitted once, ordered by the first-seen position of both words,
//! with `word1` the earlier-seen word.

use crate::stats::WordPairScore;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

pub fn sliding_window_pmi(docs: &[Vec<&str>], window: usize, min_score: f32) -> Vec<WordPairScore> {
    let window = window.max(1);

    // first-seen order doubles as a compact word index
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut words: Vec<&str> = Vec::new();
    for doc in docs {
        for &w in doc {
            index.entry(w).or_insert_with(|| {
                words.push(w);
                words.len() - 1
            });
        }
    }

    let mut total_windows = 0u64;
    let mut word_windows = vec![0u64; words.len()];
    let mut pair_windows: BTreeMap<(usize, usize), u64> = BTreeMap::new();

    for doc in docs {
        if doc.is_empty() {
            continue;
        }
        let spans: Vec<&[&str]> = if doc.len() <= window {
            vec![doc.as_slice()]
        } else {
            doc.windows(window).collect()
        };
        for span in spans {
            total_windows += 1;
            let present: BTreeSet<usize> = span.iter().map(|w| index[w]).collect();
            for &i in &present {
                word_windows[i] += 1;
            }
            let present: Vec<usize> = present.into_iter().collect();
            for (k, &a) in present.iter().enumerate() {
                for &b in &present[k + 1..] {
                    *pair_windows.entry((a, b)).or_insert(0) += 1;
                }
            }
        }
    }

    let w = total_windows as f64;
    let out: Vec<WordPairScore> = pair_windows
        .into_iter()
        .filter_map(|((a, b), count)| {
            let score =
                ((count as f64 * w) / (word_windows[a] as f64 * word_windows[b] as f64)).ln() as f32;
            (score > min_score).then(|| WordPairScore {
                word1: words[a].to_string(),
                word2: words[b].to_string(),
                score,
            })
        })
        .collect();

    debug!(windows = total_windows, pairs = out.len(), "pmi computed");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_documents_link_within_only() {
        let docs = vec![vec!["a", "b"], vec!["c", "d"]];
        let scores = sliding_window_pmi(&docs, 20, 0.0);

        assert_eq!(scores.len(), 2);
        assert_eq!((scores[0].word1.as_str(), scores[0].word2.as_str()), ("a", "b"));
        assert_eq!((scores[1].word1.as_str(), scores[1].word2.as_str()), ("c", "d"));
        assert!((scores[0].score - 2f32.ln()).abs() < 1e-6);
    }

    #[test]
    fn windows_slide_over_long_documents() {
        let docs = vec![vec!["a", "b", "c"]];
        let scores = sliding_window_pmi(&docs, 2, -1.0);

        let pairs: Vec<_> = scores
            .iter()
            .map(|s| (s.word1.as_str(), s.word2.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "c")]);
        assert!(scores.iter().all(|s| s.score.abs() < 1e-6));
    }

    #[test]
    fn repeated_word_is_not_paired_with_itself() {
        let docs = vec![vec!["a", "a", "b"], vec!["c"]];
        let scores = sliding_window_pmi(&docs, 20, f32::NEG_INFINITY);
        assert!(scores.iter().all(|s| s.word1 != s.word2));
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn empty_corpus_has_no_pairs() {
        assert!(sliding_window_pmi(&[], 20, 0.0).is_empty());
    }
}
