use crate::corpus::{DocMeta, Document};
use crate::stopwords::StopwordSet;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Turns raw speech text into the normalized tokens the engine counts:
/// NFKC normalization, lowercase, word extraction, stopword removal and
/// optional English stemming, in that order.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: StopwordSet,
    stem: bool,
    min_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self { Self::new(StopwordSet::english()) }
}

impl Tokenizer {
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords, stem: false, min_len: 1 }
    }

    pub fn with_stemming(mut self, stem: bool) -> Self {
        self.stem = stem;
        self
    }

    /// Tokens shorter than `min_len` characters are dropped.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in RE.find_iter(&normalized) {
            let token = mat.as_str();
            if self.stopwords.contains(token) { continue; }
            if token.chars().count() < self.min_len { continue; }
            if self.stem {
                tokens.push(STEMMER.stem(token).into_owned());
            } else {
                tokens.push(token.to_string());
            }
        }
        tokens
    }

    pub fn document(&self, id: impl Into<String>, text: &str, meta: DocMeta) -> Document {
        Document { id: id.into(), tokens: self.tokenize(text), meta }
    }
}
