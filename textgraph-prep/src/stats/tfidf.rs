//! TF-IDF over the tokenized corpus, columns restricted to the vocabulary.
//!
//! - tf: raw count, or `1 + ln(count)` when sublinear;
//! - idf: `ln((1 + n) / (1 + df)) + 1` when smoothed, else `ln(n / df) + 1`;
//! - rows optionally L2-normalized.
//!
//! The table is sparse: only words present in a document get a cell, in vocabulary-id order.

use crate::config::model::StatsConfig;
use crate::core::registry::Vocabulary;
use crate::stats::TfIdfTable;
use std::collections::BTreeMap;
use tracing::debug;

pub fn tf_idf_table(docs: &[Vec<&str>], vocab: &Vocabulary, cfg: &StatsConfig) -> TfIdfTable {
    let n = docs.len() as f64;

    let counts: Vec<BTreeMap<usize, u32>> = docs
        .iter()
        .map(|doc| {
            let mut m = BTreeMap::new();
            for w in doc {
                if let Some(id) = vocab.id_of(w) {
                    *m.entry(id).or_insert(0) += 1;
                }
            }
            m
        })
        .collect();

    let mut df = vec![0u32; vocab.len()];
    for row in &counts {
        for &id in row.keys() {
            df[id] += 1;
        }
    }

    let idf = |id: usize| -> f64 {
        let d = df[id] as f64;
        if cfg.tfidf_smooth_idf {
            ((1.0 + n) / (1.0 + d)).ln() + 1.0
        } else {
            (n / d).ln() + 1.0
        }
    };

    let rows = counts
        .into_iter()
        .map(|row| {
            let mut cells: Vec<(usize, f64)> = row
                .into_iter()
                .map(|(id, c)| {
                    let tf = if cfg.tfidf_sublinear_tf {
                        1.0 + (c as f64).ln()
                    } else {
                        c as f64
                    };
                    (id, tf * idf(id))
                })
                .collect();
            if cfg.tfidf_normalize {
                let norm = cells.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in cells.iter_mut() {
                        *v /= norm;
                    }
                }
            }
            cells
                .into_iter()
                .filter(|(_, v)| *v != 0.0)
                .filter_map(|(id, v)| vocab.entry(id).map(|e| (e.text.clone(), v as f32)))
                .collect()
        })
        .collect();

    let table = TfIdfTable { rows };
    debug!(cells = table.cell_count(), "tf-idf computed");
    table
}
