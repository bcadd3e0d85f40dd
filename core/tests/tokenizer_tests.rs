use tidyfreq_core::{EngineConfig, StopwordSet, Tokenizer};

#[test]
fn it_normalizes_and_stems() {
    let words = Tokenizer::default().with_stemming(true).tokenize("Running Runners RUN! The café's menu.");
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // NFKC composes the accent and case is folded
    let plain = Tokenizer::default().tokenize("CAFE\u{301}");
    assert_eq!(plain, vec!["caf\u{e9}"]);
}

#[test]
fn it_filters_stopwords() {
    let words = Tokenizer::default().tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_uses_only_the_given_stopwords() {
    let words = Tokenizer::new(StopwordSet::from_words(["fox"])).tokenize("The quick fox");
    assert_eq!(words, vec!["the", "quick"]);
}

#[test]
fn it_drops_short_tokens() {
    let cfg = EngineConfig { min_token_len: 3, ..EngineConfig::default() };
    let words = cfg.tokenizer().tokenize("we go to war as one");
    assert_eq!(words, vec!["war", "one"]);
}
