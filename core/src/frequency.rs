//! Counting, tf, df, idf and tf-idf.
//!
//! Each step is a plain function from one table to the next so callers can
//! stop anywhere in the chain. [`FrequencyEngine`] runs the whole chain.
//!
//! Costs: counting is O(total tokens); the tf-idf join is
//! O(distinct terms x documents).

use crate::config::{EngineConfig, IdfWeighting};
use crate::corpus::Document;
use crate::error::{Error, Result};
use crate::ngram;
use crate::stopwords::StopwordSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Term occurrences within one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCounts {
    pub doc_id: String,
    /// Token count of the document; always the sum of `terms` values.
    pub total: u32,
    pub terms: HashMap<String, u32>,
}

impl DocumentCounts {
    /// Fails when the document holds more than `u32::MAX` tokens.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let total = u32::try_from(doc.tokens.len()).map_err(|_| {
            Error::InvariantViolation(format!("document '{}' has {} tokens, above u32::MAX", doc.id, doc.tokens.len()))
        })?;
        let mut terms: HashMap<String, u32> = HashMap::new();
        for token in &doc.tokens {
            *terms.entry(token.clone()).or_insert(0) += 1;
        }
        Ok(Self { doc_id: doc.id.clone(), total, terms })
    }

    pub fn get(&self, term: &str) -> u32 { self.terms.get(term).copied().unwrap_or(0) }

    pub fn is_empty(&self) -> bool { self.total == 0 }

    /// Document length as the tf denominator.
    fn length(&self) -> Result<f64> {
        if self.total == 0 {
            return Err(Error::DivisionByZero(self.doc_id.clone()));
        }
        Ok(f64::from(self.total))
    }

    pub fn term_frequency(&self, term: &str) -> Result<f64> {
        Ok(f64::from(self.get(term)) / self.length()?)
    }
}

/// Per-document counts in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermCounts {
    docs: Vec<DocumentCounts>,
}

impl TermCounts {
    pub fn documents(&self) -> &[DocumentCounts] { &self.docs }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn get(&self, doc_id: &str) -> Option<&DocumentCounts> {
        self.docs.iter().find(|d| d.doc_id == doc_id)
    }

    pub fn count(&self, doc_id: &str, term: &str) -> u32 {
        self.get(doc_id).map(|d| d.get(term)).unwrap_or(0)
    }
}

pub fn count<'a, I>(documents: I) -> Result<TermCounts>
where
    I: IntoIterator<Item = &'a Document>,
{
    let docs = documents.into_iter().map(DocumentCounts::from_document).collect::<Result<Vec<_>>>()?;
    tracing::debug!(num_docs = docs.len(), "counted terms");
    Ok(TermCounts { docs })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfEntry {
    pub doc_id: String,
    pub term: String,
    pub count: u32,
    pub tf: f64,
}

/// Term frequencies, grouped by document in input order, terms ascending
/// within a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfTable {
    pub entries: Vec<TfEntry>,
}

impl TfTable {
    pub fn get(&self, doc_id: &str, term: &str) -> Option<&TfEntry> {
        self.entries.iter().find(|e| e.doc_id == doc_id && e.term == term)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// `tf = count / document length`. Documents without tokens are skipped
/// and reported rather than producing NaN.
pub fn term_frequency(counts: &TermCounts) -> TfTable {
    let mut entries = Vec::new();
    for doc in counts.documents() {
        let length = match doc.length() {
            Ok(length) => length,
            Err(err) => {
                tracing::warn!(error = %err, "excluded from term frequency");
                continue;
            }
        };
        let mut terms: Vec<(&String, &u32)> = doc.terms.iter().collect();
        terms.sort_by(|a, b| a.0.cmp(b.0));
        for (term, &count) in terms {
            let tf = f64::from(count) / length;
            entries.push(TfEntry { doc_id: doc.doc_id.clone(), term: term.clone(), count, tf });
        }
    }
    TfTable { entries }
}

/// Number of documents containing each term, and the number of documents
/// that contributed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFrequency {
    pub df: HashMap<String, u32>,
    pub num_docs: u32,
}

impl DocumentFrequency {
    pub fn get(&self, term: &str) -> u32 { self.df.get(term).copied().unwrap_or(0) }

    pub fn len(&self) -> usize { self.df.len() }

    pub fn is_empty(&self) -> bool { self.df.is_empty() }

    /// Combine tallies from disjoint document sets.
    pub fn merge(&mut self, other: &DocumentFrequency) {
        for (term, n) in &other.df {
            *self.df.entry(term.clone()).or_insert(0) += n;
        }
        self.num_docs += other.num_docs;
    }
}

pub fn document_frequency(counts: &TermCounts) -> DocumentFrequency {
    let mut out = DocumentFrequency::default();
    for doc in counts.documents() {
        if doc.is_empty() { continue; }
        out.num_docs += 1;
        for (term, &n) in &doc.terms {
            if n > 0 {
                *out.df.entry(term.clone()).or_insert(0) += 1;
            }
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    pub idf: HashMap<String, f64>,
    pub total_docs: u32,
}

impl IdfTable {
    pub fn get(&self, term: &str) -> Option<f64> { self.idf.get(term).copied() }

    pub fn len(&self) -> usize { self.idf.len() }

    pub fn is_empty(&self) -> bool { self.idf.is_empty() }
}

/// `idf = ln(total_docs / df)`.
pub fn inverse_document_frequency(df: &DocumentFrequency, total_docs: u32) -> Result<IdfTable> {
    inverse_document_frequency_with(df, total_docs, IdfWeighting::Standard)
}

pub fn inverse_document_frequency_with(
    df: &DocumentFrequency,
    total_docs: u32,
    weighting: IdfWeighting,
) -> Result<IdfTable> {
    let mut idf = HashMap::with_capacity(df.len());
    for (term, &n) in &df.df {
        if n == 0 || n > total_docs {
            return Err(Error::InvariantViolation(format!(
                "term '{term}' has document frequency {n} with {total_docs} documents"
            )));
        }
        idf.insert(term.clone(), weighting.idf(total_docs, n));
    }
    Ok(IdfTable { idf, total_docs })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfRecord {
    pub doc_id: String,
    pub term: String,
    pub count: u32,
    pub tf: f64,
    pub idf: f64,
    pub tf_idf: f64,
}

/// Most distinctive first; ties by document id then term.
fn by_score(a: &TfIdfRecord, b: &TfIdfRecord) -> Ordering {
    b.tf_idf
        .total_cmp(&a.tf_idf)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
        .then_with(|| a.term.cmp(&b.term))
}

pub fn tf_idf(tf: &TfTable, idf: &IdfTable) -> Result<Vec<TfIdfRecord>> {
    let mut records = Vec::with_capacity(tf.len());
    for e in &tf.entries {
        let w = idf
            .get(&e.term)
            .ok_or_else(|| Error::InvariantViolation(format!("term '{}' has no idf", e.term)))?;
        records.push(TfIdfRecord {
            doc_id: e.doc_id.clone(),
            term: e.term.clone(),
            count: e.count,
            tf: e.tf,
            idf: w,
            tf_idf: e.tf * w,
        });
    }
    records.sort_by(by_score);
    Ok(records)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub term: String,
    pub count: u64,
}

/// Every table produced by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub counts: TermCounts,
    pub tf: TfTable,
    pub df: DocumentFrequency,
    pub idf: IdfTable,
    pub records: Vec<TfIdfRecord>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn record(&self, doc_id: &str, term: &str) -> Option<&TfIdfRecord> {
        self.records.iter().find(|r| r.doc_id == doc_id && r.term == term)
    }

    /// The `k` highest-scoring terms of each document, keyed by document id.
    pub fn top_terms(&self, k: usize) -> BTreeMap<&str, Vec<&TfIdfRecord>> {
        let mut out: BTreeMap<&str, Vec<&TfIdfRecord>> = BTreeMap::new();
        // records are already in score order
        for r in &self.records {
            let slot = out.entry(r.doc_id.as_str()).or_default();
            if slot.len() < k {
                slot.push(r);
            }
        }
        out
    }

    /// Corpus-wide term totals, most frequent first, ties by term.
    pub fn word_counts(&self) -> Vec<WordCount> {
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for doc in self.counts.documents() {
            for (term, &n) in &doc.terms {
                *totals.entry(term.as_str()).or_insert(0) += u64::from(n);
            }
        }
        let mut out: Vec<WordCount> =
            totals.into_iter().map(|(term, count)| WordCount { term: term.to_string(), count }).collect();
        out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        out
    }
}

/// Runs count, tf, df, idf and tf-idf over whatever documents it is given.
/// Each call depends only on its input, so subsets and the full corpus can
/// be analyzed side by side.
///
/// With n-grams enabled, stopwords are applied to whole n-grams: the
/// tokens must arrive with stopwords still in place so windows stay
/// contiguous, and any n-gram containing a stopword is dropped.
#[derive(Debug, Clone)]
pub struct FrequencyEngine {
    weighting: IdfWeighting,
    ngram: usize,
    ngram_stopwords: StopwordSet,
    ngram_min_len: usize,
}

impl Default for FrequencyEngine {
    fn default() -> Self {
        Self { weighting: IdfWeighting::Standard, ngram: 1, ngram_stopwords: StopwordSet::empty(), ngram_min_len: 1 }
    }
}

impl FrequencyEngine {
    pub fn new() -> Self { Self::default() }

    pub fn from_config(cfg: &EngineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            weighting: cfg.idf,
            ngram: cfg.ngram,
            ngram_stopwords: cfg.stopword_set(),
            ngram_min_len: cfg.min_token_len,
        })
    }

    pub fn with_weighting(mut self, weighting: IdfWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Count `n`-token windows instead of single tokens.
    pub fn with_ngram(mut self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidConfig("ngram must be at least 1".into()));
        }
        self.ngram = n;
        Ok(self)
    }

    /// N-grams containing any of these words are dropped.
    pub fn with_ngram_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.ngram_stopwords = stopwords;
        self
    }

    pub fn analyze<'a, I>(&self, documents: I) -> Result<Analysis>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let counts = if self.ngram > 1 {
            let grams = documents
                .into_iter()
                .map(|d| ngram::ngram_document_filtered(d, self.ngram, &self.ngram_stopwords, self.ngram_min_len))
                .collect::<Result<Vec<_>>>()?;
            count(&grams)?
        } else {
            count(documents)?
        };
        self.analyze_counts(counts)
    }

    /// Second half of the pipeline, for callers that already hold counts.
    pub fn analyze_counts(&self, counts: TermCounts) -> Result<Analysis> {
        if counts.is_empty() {
            return Ok(Analysis::default());
        }
        let tf = term_frequency(&counts);
        let df = document_frequency(&counts);
        let idf = inverse_document_frequency_with(&df, df.num_docs, self.weighting)?;
        let records = tf_idf(&tf, &idf)?;
        tracing::info!(num_docs = counts.len(), num_terms = df.len(), num_records = records.len(), "tf-idf computed");
        Ok(Analysis { counts, tf, df, idf, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Document> {
        vec![
            Document::from_text("doc1", "cat sat"),
            Document::from_text("doc2", "dog ran"),
        ]
    }

    #[test]
    fn counts_sum_to_length() {
        let d = Document::from_text("a", "to be or not to be");
        let c = DocumentCounts::from_document(&d).unwrap();
        assert_eq!(c.terms.values().sum::<u32>(), 6);
        assert_eq!(c.get("to"), 2);
        assert_eq!(c.get("missing"), 0);
    }

    #[test]
    fn empty_document_divides_by_zero() {
        let c = DocumentCounts::from_document(&Document::new("blank", Vec::<String>::new())).unwrap();
        assert!(matches!(c.term_frequency("x"), Err(Error::DivisionByZero(id)) if id == "blank"));
    }

    #[test]
    fn idf_rejects_zero_df() {
        let mut df = DocumentFrequency::default();
        df.df.insert("ghost".into(), 0);
        df.num_docs = 2;
        assert!(matches!(inverse_document_frequency(&df, 2), Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn tf_idf_requires_idf_for_every_term() {
        let tf = term_frequency(&count(&docs()).unwrap());
        let err = tf_idf(&tf, &IdfTable::default()).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn ties_break_on_doc_then_term() {
        let a = FrequencyEngine::new().analyze(&docs()).unwrap();
        let order: Vec<(&str, &str)> = a.records.iter().map(|r| (r.doc_id.as_str(), r.term.as_str())).collect();
        assert_eq!(order, vec![("doc1", "cat"), ("doc1", "sat"), ("doc2", "dog"), ("doc2", "ran")]);
    }

    #[test]
    fn merge_matches_single_pass() {
        let all = vec![
            Document::from_text("a", "x y"),
            Document::from_text("b", "y z"),
            Document::from_text("c", "z z w"),
        ];
        let full = document_frequency(&count(&all).unwrap());
        let mut left = document_frequency(&count(&all[..1]).unwrap());
        left.merge(&document_frequency(&count(&all[1..]).unwrap()));
        assert_eq!(left, full);
    }

    #[test]
    fn empty_documents_skip_tf_through_division_check() {
        let docs = vec![Document::new("blank", Vec::<String>::new()), Document::from_text("a", "liberty")];
        let counts = count(&docs).unwrap();
        assert!(matches!(counts.documents()[0].length(), Err(Error::DivisionByZero(_))));
        let tf = term_frequency(&counts);
        assert_eq!(tf.len(), 1);
        assert_eq!(tf.entries[0].doc_id, "a");
    }

    #[test]
    fn zero_ngram_rejected() {
        assert!(matches!(FrequencyEngine::new().with_ngram(0), Err(Error::InvalidConfig(_))));
    }
}
