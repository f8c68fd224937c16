use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::normalize::tokenize;

pub type TermId = u32;

/// Sparse TF-IDF vector. Terms are sorted by `TermId` and carry nonzero
/// weights only; `dims` is the vocabulary size the vector was embedded in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparseVector {
    pub dims: usize,
    pub terms: Vec<(TermId, f32)>,
}

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.terms
            .iter()
            .map(|(_, w)| w * w)
            .sum::<f32>()
            .sqrt()
    }

    /// Dot product by merging the two sorted term lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut acc = 0.0f32;
        while i < self.terms.len() && j < other.terms.len() {
            let (ta, wa) = self.terms[i];
            let (tb, wb) = other.terms[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }
}

/// Frozen vocabulary plus per-term inverse document frequency. Built once
/// from the catalog corpus; queries embed against it without mutation, so a
/// built model is safe to share across threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorSpaceModel {
    pub vocabulary: HashMap<String, TermId>,
    pub idf: Vec<f32>,
}

impl VectorSpaceModel {
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Build the vocabulary and IDF weights from a corpus and produce one
    /// TF-IDF vector per document under the same term ordering.
    ///
    /// An empty corpus yields an empty model and no vectors. IDF uses the
    /// smoothed form `ln((1 + n) / (1 + df)) + 1`, which never zeroes out a
    /// term that occurs in every document.
    pub fn build(corpus: &[String]) -> (VectorSpaceModel, Vec<SparseVector>) {
        let mut vocabulary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut doc_counts: Vec<HashMap<TermId, u32>> = Vec::with_capacity(corpus.len());

        for text in corpus {
            let mut counts: HashMap<TermId, u32> = HashMap::new();
            for term in tokenize(text) {
                let next_id = vocabulary.len() as TermId;
                let tid = *vocabulary.entry(term).or_insert(next_id);
                if tid as usize >= df.len() {
                    df.resize(tid as usize + 1, 0);
                }
                *counts.entry(tid).or_insert(0) += 1;
            }
            for tid in counts.keys() {
                df[*tid as usize] += 1;
            }
            doc_counts.push(counts);
        }

        let n = corpus.len() as f32;
        let idf: Vec<f32> = df
            .iter()
            .map(|&df_t| ((1.0 + n) / (1.0 + df_t as f32)).ln() + 1.0)
            .collect();

        let model = VectorSpaceModel { vocabulary, idf };
        let vectors = doc_counts
            .into_iter()
            .map(|counts| model.vector_from_counts(counts))
            .collect();
        (model, vectors)
    }

    /// Embed text against the frozen vocabulary. Out-of-vocabulary terms are
    /// dropped silently; text with no known terms embeds to the zero vector.
    pub fn embed(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for term in tokenize(text) {
            if let Some(&tid) = self.vocabulary.get(&term) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        self.vector_from_counts(counts)
    }

    fn vector_from_counts(&self, counts: HashMap<TermId, u32>) -> SparseVector {
        let mut terms: Vec<(TermId, f32)> = counts
            .into_iter()
            .map(|(tid, tf)| (tid, tf as f32 * self.idf[tid as usize]))
            .collect();
        terms.sort_by_key(|(tid, _)| *tid);
        SparseVector {
            dims: self.vocabulary.len(),
            terms,
        }
    }
}
