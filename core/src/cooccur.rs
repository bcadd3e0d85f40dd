use crate::corpus::Document;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Which tokens of a document are considered together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Window {
    #[default]
    Whole,
    /// The final N tokens.
    Tail(usize),
}

impl Window {
    pub fn slice<'a>(&self, tokens: &'a [String]) -> &'a [String] {
        match *self {
            Window::Whole => tokens,
            Window::Tail(n) => &tokens[tokens.len().saturating_sub(n)..],
        }
    }
}

/// Number of documents whose window holds both terms. Always `a < b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub a: String,
    pub b: String,
    pub count: u32,
}

/// Count unordered pairs of distinct terms sharing a document window. A
/// pair counts once per document however often its terms repeat. Sorted by
/// count descending, then `a`, then `b`.
pub fn cooccurrence<'a, I>(documents: I, window: Window) -> Vec<PairCount>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut pairs: HashMap<(String, String), u32> = HashMap::new();
    for doc in documents {
        // sorted and deduplicated, so i < j yields canonical pairs
        let terms: Vec<&String> = window.slice(&doc.tokens).iter().collect::<BTreeSet<_>>().into_iter().collect();
        for (i, a) in terms.iter().enumerate() {
            for b in &terms[i + 1..] {
                *pairs.entry(((*a).clone(), (*b).clone())).or_insert(0) += 1;
            }
        }
    }
    let mut out: Vec<PairCount> = pairs.into_iter().map(|((a, b), count)| PairCount { a, b, count }).collect();
    out.sort_by(|x, y| y.count.cmp(&x.count).then_with(|| x.a.cmp(&y.a)).then_with(|| x.b.cmp(&y.b)));
    tracing::debug!(num_pairs = out.len(), "co-occurrence pairs counted");
    out
}

/// [`cooccurrence`] keeping only pairs seen in at least `min_count` documents.
pub fn cooccurrence_min<'a, I>(documents: I, window: Window, min_count: u32) -> Vec<PairCount>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut out = cooccurrence(documents, window);
    out.retain(|p| p.count >= min_count);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_canonical_and_counted_per_document() {
        let docs = vec![
            Document::from_text("1", "liberty union liberty"),
            Document::from_text("2", "union liberty nation"),
        ];
        let pairs = cooccurrence(&docs, Window::Whole);
        assert_eq!(pairs[0], PairCount { a: "liberty".into(), b: "union".into(), count: 2 });
        assert!(pairs.iter().all(|p| p.a < p.b));
        assert!(!pairs.iter().any(|p| p.a == "union" && p.b == "liberty"));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn tail_window_limits_tokens() {
        let docs = vec![Document::from_text("1", "war peace freedom justice")];
        let pairs = cooccurrence(&docs, Window::Tail(2));
        assert_eq!(pairs, vec![PairCount { a: "freedom".into(), b: "justice".into(), count: 1 }]);
        assert_eq!(Window::Tail(10).slice(&docs[0].tokens).len(), 4);
    }

    #[test]
    fn min_count_filters() {
        let docs = vec![Document::from_text("1", "a b"), Document::from_text("2", "a b c")];
        let pairs = cooccurrence_min(&docs, Window::Whole, 2);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].a.as_str(), pairs[0].b.as_str()), ("a", "b"));
    }
}
