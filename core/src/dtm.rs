use crate::frequency::TermCounts;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Sparse document-term matrix: rows are documents in count order, columns
/// are terms in ascending order, `entries` holds `(row, column, count)` for
/// every nonzero cell sorted by row then column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    pub documents: Vec<String>,
    pub terms: Vec<String>,
    pub entries: Vec<(usize, usize, u32)>,
}

pub fn cast_dtm(counts: &TermCounts) -> DocumentTermMatrix {
    let vocabulary: BTreeSet<&str> =
        counts.documents().iter().flat_map(|d| d.terms.keys().map(String::as_str)).collect();
    let terms: Vec<String> = vocabulary.into_iter().map(str::to_string).collect();
    let column: HashMap<&str, usize> = terms.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();

    let mut entries = Vec::new();
    let mut documents = Vec::with_capacity(counts.len());
    for (row, doc) in counts.documents().iter().enumerate() {
        documents.push(doc.doc_id.clone());
        let mut cells: Vec<(usize, usize, u32)> = doc
            .terms
            .iter()
            .filter(|(_, &n)| n > 0)
            .map(|(t, &n)| (row, column[t.as_str()], n))
            .collect();
        cells.sort_unstable();
        entries.extend(cells);
    }
    DocumentTermMatrix { documents, terms, entries }
}

impl DocumentTermMatrix {
    pub fn shape(&self) -> (usize, usize) { (self.documents.len(), self.terms.len()) }

    pub fn nnz(&self) -> usize { self.entries.len() }

    pub fn get(&self, doc_id: &str, term: &str) -> u32 {
        let row = self.documents.iter().position(|d| d == doc_id);
        let col = self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok();
        match (row, col) {
            (Some(r), Some(c)) => self
                .entries
                .binary_search_by(|&(er, ec, _)| (er, ec).cmp(&(r, c)))
                .map(|i| self.entries[i].2)
                .unwrap_or(0),
            _ => 0,
        }
    }

    pub fn row_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.documents.len()];
        for &(r, _, n) in &self.entries {
            sums[r] += u64::from(n);
        }
        sums
    }

    /// Row-major dense copy.
    pub fn to_dense(&self) -> Vec<Vec<u32>> {
        let mut m = vec![vec![0u32; self.terms.len()]; self.documents.len()];
        for &(r, c, n) in &self.entries {
            m[r][c] = n;
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;
    use crate::frequency::count;

    #[test]
    fn casts_counts_including_empty_rows() {
        let docs = vec![
            Document::from_text("a", "peace war peace"),
            Document::new("blank", Vec::<String>::new()),
            Document::from_text("b", "war"),
        ];
        let dtm = cast_dtm(&count(&docs).unwrap());
        assert_eq!(dtm.shape(), (3, 2));
        assert_eq!(dtm.terms, vec!["peace", "war"]);
        assert_eq!(dtm.get("a", "peace"), 2);
        assert_eq!(dtm.get("b", "peace"), 0);
        assert_eq!(dtm.get("nope", "war"), 0);
        assert_eq!(dtm.row_sums(), vec![3, 0, 1]);
        assert_eq!(dtm.to_dense(), vec![vec![2, 1], vec![0, 0], vec![0, 1]]);
        assert_eq!(dtm.nnz(), 3);
    }
}
