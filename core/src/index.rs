use crate::tokenizer::Analyzer;
use crate::{DestinationId, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// How document frequency turns into a term weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdfMode {
    /// `ln((1 + N) / (1 + df)) + 1`
    #[default]
    Smooth,
    /// `ln(N / df)`; a term present in every description weighs zero.
    Plain,
}

impl FromStr for IdfMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smooth" => Ok(IdfMode::Smooth),
            "plain" => Ok(IdfMode::Plain),
            other => Err(format!("unknown idf mode `{other}` (expected smooth or plain)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Weighting {
    pub idf: IdfMode,
    /// Use `1 + ln(tf)` instead of the raw term count.
    pub sublinear_tf: bool,
}

impl Weighting {
    fn idf_weight(&self, n: u32, df: u32) -> f32 {
        let (n, df) = (n as f32, df.max(1) as f32);
        match self.idf {
            IdfMode::Smooth => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
            IdfMode::Plain => (n / df).ln(),
        }
    }

    fn tf_weight(&self, raw: u32) -> f32 {
        if raw == 0 {
            0.0
        } else if self.sublinear_tf {
            1.0 + (raw as f32).ln()
        } else {
            raw as f32
        }
    }
}

/// Sparse vector with entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    fn from_weights(weights: HashMap<TermId, f32>) -> Self {
        let mut entries: Vec<(TermId, f32)> = weights.into_iter().filter(|(_, w)| *w != 0.0).collect();
        entries.sort_by_key(|(tid, _)| *tid);
        let mut v = Self { entries };
        v.normalize();
        v
    }

    fn normalize(&mut self) {
        let norm = self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm == 0.0 { return; }
        for (_, w) in self.entries.iter_mut() { *w /= norm; }
    }

    pub fn entries(&self) -> &[(TermId, f32)] { &self.entries }

    pub fn is_zero(&self) -> bool { self.entries.is_empty() }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j, mut acc) = (0, 0, 0.0f32);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }
}

/// A query projected into an index's term space. Only [`TermIndex::project`] creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    vector: SparseVector,
    dim: usize,
}

impl QueryVector {
    pub fn vector(&self) -> &SparseVector { &self.vector }

    /// Vocabulary size of the index that produced this vector.
    pub fn dim(&self) -> usize { self.dim }

    pub fn is_zero(&self) -> bool { self.vector.is_zero() }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DestinationId,
    pub weight: f32, // normalized tf-idf weight
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub vocabulary: usize,
    pub postings: usize,
    pub empty_documents: usize,
}

/// TF-IDF vector space over destination descriptions. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct TermIndex {
    analyzer: Analyzer,
    weighting: Weighting,
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    idf: Vec<f32>,
    documents: Vec<SparseVector>, // catalog order
    postings: HashMap<TermId, Vec<Posting>>, // sorted by doc_id
}

impl TermIndex {
    pub fn build<'a, I>(descriptions: I, analyzer: Analyzer, weighting: Weighting) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut counts: Vec<HashMap<TermId, u32>> = Vec::new();

        for text in descriptions {
            let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
            for term in analyzer.analyze(text) {
                let next = dictionary.len() as TermId;
                let tid = *dictionary.entry(term).or_insert_with(|| {
                    df.push(0);
                    next
                });
                let c = tf_counts.entry(tid).or_insert(0);
                if *c == 0 { df[tid as usize] += 1; }
                *c += 1;
            }
            counts.push(tf_counts);
        }

        let n = counts.len() as u32;
        let idf: Vec<f32> = df.iter().map(|&d| weighting.idf_weight(n, d)).collect();

        let documents: Vec<SparseVector> = counts
            .into_iter()
            .map(|tf_counts| {
                let weights = tf_counts
                    .into_iter()
                    .map(|(tid, raw)| (tid, weighting.tf_weight(raw) * idf[tid as usize]))
                    .collect();
                SparseVector::from_weights(weights)
            })
            .collect();

        let mut postings: HashMap<TermId, Vec<Posting>> = HashMap::new();
        for (doc_id, vector) in documents.iter().enumerate() {
            for &(tid, weight) in vector.entries() {
                postings.entry(tid).or_default().push(Posting { doc_id: doc_id as DestinationId, weight });
            }
        }

        let index = Self { analyzer, weighting, dictionary, df, idf, documents, postings };
        let stats = index.stats();
        tracing::info!(
            documents = stats.documents,
            vocabulary = stats.vocabulary,
            postings = stats.postings,
            "built term index"
        );
        index
    }

    /// Project free text into the index's term space. Unknown terms are ignored.
    pub fn project(&self, text: &str) -> QueryVector {
        let mut tf_q_raw: HashMap<TermId, u32> = HashMap::new();
        for term in self.analyzer.analyze(text) {
            if let Some(&tid) = self.dictionary.get(&term) {
                *tf_q_raw.entry(tid).or_insert(0) += 1;
            }
        }
        let weights = tf_q_raw
            .into_iter()
            .map(|(tid, raw)| (tid, self.weighting.tf_weight(raw) * self.idf[tid as usize]))
            .collect();
        QueryVector { vector: SparseVector::from_weights(weights), dim: self.vocabulary_len() }
    }

    pub fn postings(&self, term: TermId) -> &[Posting] {
        self.postings.get(&term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn document(&self, id: DestinationId) -> Option<&SparseVector> {
        self.documents.get(id as usize)
    }

    /// IDF of a term after analysis (so `"Beaches"` looks up `"beach"` when stemming).
    pub fn idf(&self, term: &str) -> Option<f32> {
        let analyzed = self.analyzer.analyze(term);
        let first = analyzed.first()?;
        self.dictionary.get(first).map(|&tid| self.idf[tid as usize])
    }

    pub fn document_frequency(&self, term: TermId) -> u32 {
        self.df.get(term as usize).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn vocabulary_len(&self) -> usize { self.dictionary.len() }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.documents.len(),
            vocabulary: self.dictionary.len(),
            postings: self.postings.values().map(Vec::len).sum(),
            empty_documents: self.documents.iter().filter(|d| d.is_zero()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(docs: &[&str]) -> TermIndex {
        TermIndex::build(docs.iter().copied(), Analyzer::default(), Weighting::default())
    }

    #[test]
    fn one_vector_per_document_in_order() {
        let idx = build(&["beach paradise", "romantic city", "the of and"]);
        assert_eq!(idx.len(), 3);
        assert!(!idx.document(0).unwrap().is_zero());
        // stop words only
        assert!(idx.document(2).unwrap().is_zero());
        assert_eq!(idx.stats().empty_documents, 1);
    }

    #[test]
    fn document_vectors_are_unit_length() {
        let idx = build(&["beach beach paradise sunset", "mountain trek"]);
        for id in 0..2 {
            let v = idx.document(id).unwrap();
            let norm: f32 = v.entries().iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn rare_terms_outweigh_common_ones() {
        let idx = build(&["temple city", "beach city", "museum city"]);
        assert!(idx.idf("temple").unwrap() > idx.idf("city").unwrap());
    }

    #[test]
    fn plain_idf_zeroes_ubiquitous_terms() {
        let w = Weighting { idf: IdfMode::Plain, sublinear_tf: false };
        let idx = TermIndex::build(["temple city", "beach city"], Analyzer::default(), w);
        assert_eq!(idx.idf("city"), Some(0.0));
        assert!(idx.project("city").is_zero());
    }

    #[test]
    fn projection_ignores_unknown_terms() {
        let idx = build(&["beach paradise", "romantic city"]);
        let q = idx.project("beach volcano");
        assert_eq!(q.dim(), idx.vocabulary_len());
        assert_eq!(q.vector().entries().len(), 1);
        assert!(idx.project("volcano glacier").is_zero());
        assert!(idx.project("").is_zero());
    }

    #[test]
    fn postings_are_sorted_by_doc() {
        let idx = build(&["beach", "city", "beach city", "beach"]);
        let tid = *idx.dictionary.get("beach").unwrap();
        let docs: Vec<u32> = idx.postings(tid).iter().map(|p| p.doc_id).collect();
        assert_eq!(docs, vec![0, 2, 3]);
        assert_eq!(idx.document_frequency(tid), 3);
    }

    #[test]
    fn sublinear_tf_dampens_repeated_terms() {
        let docs = ["beach beach beach beach sunset", "mountain"];
        let raw = TermIndex::build(docs, Analyzer::default(), Weighting::default());
        let damped = TermIndex::build(docs, Analyzer::default(), Weighting { idf: IdfMode::Smooth, sublinear_tf: true });
        let weight = |idx: &TermIndex, term: &str| {
            let tid = *idx.dictionary.get(term).unwrap();
            idx.postings(tid)[0].weight
        };
        // beach:sunset is 4:1 with raw counts and (1 + ln 4):1 when damped
        assert!(weight(&damped, "beach") < weight(&raw, "beach"));
        assert!(weight(&damped, "sunset") > weight(&raw, "sunset"));
        let ratio = weight(&damped, "beach") / weight(&damped, "sunset");
        assert!((ratio - (1.0 + 4f32.ln())).abs() < 1e-4);
    }

    #[test]
    fn idf_mode_parses() {
        assert_eq!("Smooth".parse::<IdfMode>().unwrap(), IdfMode::Smooth);
        assert_eq!("plain".parse::<IdfMode>().unwrap(), IdfMode::Plain);
        assert!("bm25".parse::<IdfMode>().is_err());
    }
}
