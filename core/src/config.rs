//! Engine configuration.
//!
//! Everything the pipeline would otherwise read from process-wide state
//! (stopword lists, idf weighting, window sizes) lives here and is handed to
//! the engine explicitly. Files are JSON; every field has a default so a
//! partial file such as `{"ngram": 2}` is valid.

use crate::error::{Error, Result};
use crate::stopwords::StopwordSet;
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdfWeighting {
    /// `ln(N / df)`
    #[default]
    Standard,
    /// `ln(1 + N / df)`, never zero
    Smoothed,
}

impl IdfWeighting {
    pub fn idf(self, total_docs: u32, df: u32) -> f64 {
        let ratio = f64::from(total_docs) / f64::from(df);
        match self {
            IdfWeighting::Standard => ratio.ln(),
            IdfWeighting::Smoothed => (1.0 + ratio).ln(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "words")]
pub enum StopwordPolicy {
    #[default]
    English,
    None,
    Custom(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stopwords: StopwordPolicy,
    /// Appended to whatever `stopwords` selects.
    pub extra_stopwords: Vec<String>,
    pub stem: bool,
    pub min_token_len: usize,
    /// Term length in tokens; 1 counts single words.
    pub ngram: usize,
    pub idf: IdfWeighting,
    /// Distinctive terms reported per document.
    pub top_k: usize,
    /// Co-occurrence window: the final N tokens of each document, or the
    /// whole document when unset.
    pub cooccur_tail: Option<usize>,
    pub cooccur_min_count: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stopwords: StopwordPolicy::English,
            extra_stopwords: Vec::new(),
            stem: false,
            min_token_len: 1,
            ngram: 1,
            idf: IdfWeighting::Standard,
            top_k: 10,
            cooccur_tail: None,
            cooccur_min_count: 1,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref())?;
        let cfg: EngineConfig = serde_json::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ngram == 0 {
            return Err(Error::InvalidConfig("ngram must be at least 1".into()));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".into()));
        }
        if self.cooccur_tail == Some(0) {
            return Err(Error::InvalidConfig("cooccur_tail must be at least 1 when set".into()));
        }
        Ok(())
    }

    pub fn stopword_set(&self) -> StopwordSet {
        let mut set = match &self.stopwords {
            StopwordPolicy::English => StopwordSet::english(),
            StopwordPolicy::None => StopwordSet::empty(),
            StopwordPolicy::Custom(words) => StopwordSet::from_words(words),
        };
        set.extend(&self.extra_stopwords);
        set
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.stopword_set()).with_stemming(self.stem).with_min_len(self.min_token_len)
    }

    /// Tokenizer for tf-idf terms. For n-grams it keeps every token so
    /// windows stay contiguous; the engine drops n-grams holding stopwords.
    pub fn term_tokenizer(&self) -> Tokenizer {
        if self.ngram > 1 {
            Tokenizer::new(StopwordSet::empty()).with_stemming(self.stem)
        } else {
            self.tokenizer()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"ngram": 2, "idf": "smoothed"}"#).unwrap();
        assert_eq!(cfg.ngram, 2);
        assert_eq!(cfg.idf, IdfWeighting::Smoothed);
        assert_eq!(cfg.top_k, 10);
        assert_eq!(cfg.stopwords, StopwordPolicy::English);
    }

    #[test]
    fn custom_stopwords_plus_extras() {
        let cfg: EngineConfig = serde_json::from_str(
            r#"{"stopwords": {"kind": "custom", "words": ["Thee"]}, "extra_stopwords": ["thou"]}"#,
        )
        .unwrap();
        let set = cfg.stopword_set();
        assert!(set.contains("thee") && set.contains("thou"));
        assert!(!set.contains("the"));
    }

    #[test]
    fn rejects_zero_ngram_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"ngram": 0}}"#).unwrap();
        let err = EngineConfig::from_json_file(f.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn ngram_term_tokenizer_keeps_stopwords() {
        let cfg = EngineConfig { ngram: 2, ..EngineConfig::default() };
        assert_eq!(cfg.term_tokenizer().tokenize("The Union"), vec!["the", "union"]);
        assert_eq!(EngineConfig::default().term_tokenizer().tokenize("The Union"), vec!["union"]);
    }

    #[test]
    fn smoothed_idf_is_positive_for_ubiquitous_terms() {
        assert_eq!(IdfWeighting::Standard.idf(4, 4), 0.0);
        assert!((IdfWeighting::Smoothed.idf(4, 4) - 2f64.ln()).abs() < 1e-12);
    }
}
