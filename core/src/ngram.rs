use crate::corpus::Document;
use crate::error::{Error, Result};
use crate::stopwords::StopwordSet;

/// Separator between tokens inside an n-gram term.
pub const JOINER: &str = " ";

/// Contiguous `n`-token windows, each joined into one term. Shorter inputs
/// produce nothing.
pub fn ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> Result<Vec<String>> {
    if n == 0 {
        return Err(Error::InvalidConfig("ngram size must be at least 1".into()));
    }
    Ok(tokens
        .windows(n)
        .map(|w| w.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(JOINER))
        .collect())
}

/// The same document with its tokens replaced by its `n`-grams, ready for
/// the unchanged counting pipeline.
pub fn ngram_document(doc: &Document, n: usize) -> Result<Document> {
    Ok(Document { id: doc.id.clone(), tokens: ngrams(&doc.tokens, n)?, meta: doc.meta.clone() })
}

/// Like [`ngram_document`], but windows are built over the unfiltered
/// tokens and then any window holding a stopword or a token shorter than
/// `min_len` characters is dropped. Filtering tokens first would join words
/// that were never adjacent.
pub fn ngram_document_filtered(doc: &Document, n: usize, stopwords: &StopwordSet, min_len: usize) -> Result<Document> {
    if n == 0 {
        return Err(Error::InvalidConfig("ngram size must be at least 1".into()));
    }
    let tokens = doc
        .tokens
        .windows(n)
        .filter(|w| w.iter().all(|t| !stopwords.contains(t) && t.chars().count() >= min_len))
        .map(|w| w.join(JOINER))
        .collect();
    Ok(Document { id: doc.id.clone(), tokens, meta: doc.meta.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bigrams_of_sentence() {
        let toks: Vec<&str> = "the cat sat on the mat".split_whitespace().collect();
        let grams = ngrams(&toks, 2).unwrap();
        assert_eq!(grams, vec!["the cat", "cat sat", "sat on", "on the", "the mat"]);
    }

    #[test]
    fn short_documents_have_no_trigrams() {
        assert!(ngrams(&["only", "two"], 3).unwrap().is_empty());
        assert_eq!(ngrams(&["one"], 1).unwrap(), vec!["one"]);
    }

    #[test]
    fn filtered_bigrams_stay_contiguous() {
        let doc = Document::from_text("lincoln", "the union of these united states is perpetual");
        let stop = StopwordSet::english();
        let grams = ngram_document_filtered(&doc, 2, &stop, 1).unwrap();
        assert_eq!(grams.tokens, vec!["united states"]);
        assert!(ngram_document_filtered(&doc, 0, &stop, 1).is_err());
    }
}
