use crate::stopwords::StopwordSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub author: Option<String>,
    pub year: Option<i32>,
}

/// A tokenized document. Tokens are expected to be normalized already.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub tokens: Vec<String>,
    #[serde(default)]
    pub meta: DocMeta,
}

impl Document {
    pub fn new<I, T>(id: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self { id: id.into(), tokens: tokens.into_iter().map(Into::into).collect(), meta: DocMeta::default() }
    }

    /// Convenience for tests and demos: split on whitespace.
    pub fn from_text(id: impl Into<String>, text: &str) -> Self {
        Self::new(id, text.split_whitespace())
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.meta.author = Some(author.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.meta.year = Some(year);
        self
    }

    pub fn len(&self) -> usize { self.tokens.len() }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn author(&self) -> Option<&str> { self.meta.author.as_deref() }

    /// Copy of this document with every stopword token dropped.
    pub fn without_stopwords(&self, stopwords: &StopwordSet) -> Document {
        Document {
            id: self.id.clone(),
            tokens: self.tokens.iter().filter(|t| !stopwords.contains(t)).cloned().collect(),
            meta: self.meta.clone(),
        }
    }
}

/// An ordered collection of documents. Subsets borrow from it and never
/// alter it, so results computed over the full corpus stay valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, doc: Document) { self.docs.push(doc); }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn documents(&self) -> &[Document] { &self.docs }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> { self.docs.iter() }

    pub fn get(&self, id: &str) -> Option<&Document> { self.docs.iter().find(|d| d.id == id) }

    pub fn filter<P>(&self, mut predicate: P) -> Vec<&Document>
    where
        P: FnMut(&Document) -> bool,
    {
        self.docs.iter().filter(|d| predicate(d)).collect()
    }

    pub fn by_author(&self, author: &str) -> Vec<&Document> {
        self.filter(|d| d.author() == Some(author))
    }

    /// Documents whose year lies in `from..=to`. Documents without a year are skipped.
    pub fn by_year_range(&self, from: i32, to: i32) -> Vec<&Document> {
        self.filter(|d| matches!(d.meta.year, Some(y) if (from..=to).contains(&y)))
    }

    /// Sorted, deduplicated author names.
    pub fn authors(&self) -> Vec<&str> {
        let mut authors: Vec<&str> = self.docs.iter().filter_map(|d| d.author()).collect();
        authors.sort_unstable();
        authors.dedup();
        authors
    }

    /// One document per author, its tokens being the concatenation of that
    /// author's documents in corpus order. Documents without an author are
    /// left out. The merged document id is the author name.
    pub fn merge_by_author(&self) -> Corpus {
        let mut groups: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
        for doc in &self.docs {
            if let Some(author) = doc.author() {
                groups.entry(author).or_default().push(doc);
            }
        }
        let docs = groups
            .into_iter()
            .map(|(author, members)| {
                let tokens = members.iter().flat_map(|d| d.tokens.iter().cloned()).collect();
                let year = members.iter().filter_map(|d| d.meta.year).min();
                Document { id: author.to_string(), tokens, meta: DocMeta { author: Some(author.to_string()), year } }
            })
            .collect();
        Corpus { docs }
    }

    pub fn without_stopwords(&self, stopwords: &StopwordSet) -> Corpus {
        Corpus { docs: self.docs.iter().map(|d| d.without_stopwords(stopwords)).collect() }
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Corpus { docs: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter { self.docs.iter() }
}
