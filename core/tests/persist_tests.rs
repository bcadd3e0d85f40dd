use tidyfreq_core::persist::{
    load_cooccurrence, load_document_frequency, load_dtm, load_meta, load_tfidf, load_word_counts, save_cooccurrence,
    save_document_frequency, save_dtm, save_meta, save_tfidf, save_word_counts, MetaFile, OutputPaths, FORMAT_VERSION,
};
use tidyfreq_core::{cast_dtm, cooccurrence, Document, FrequencyEngine, Window};
use tempfile::tempdir;

fn docs() -> Vec<Document> {
    vec![
        Document::from_text("jefferson-1801", "every difference opinion difference principle"),
        Document::from_text("adams-1797", "principle union liberty"),
    ]
}

#[test]
fn writes_every_table_into_output_dir() {
    let dir = tempdir().unwrap();
    let paths = OutputPaths::new(dir.path().join("out"));
    let analysis = FrequencyEngine::new().analyze(&docs()).unwrap();

    save_tfidf(&paths, &analysis.records).unwrap();
    save_document_frequency(&paths, &analysis.df).unwrap();
    save_word_counts(&paths, &analysis.word_counts()).unwrap();
    let pairs = cooccurrence(&docs(), Window::Whole);
    save_cooccurrence(&paths, &pairs).unwrap();
    let dtm = cast_dtm(&analysis.counts);
    save_dtm(&paths, &dtm).unwrap();
    save_meta(&paths, &MetaFile::now(2, analysis.df.len() as u32)).unwrap();

    assert_eq!(load_tfidf(&paths).unwrap(), analysis.records);
    assert_eq!(load_document_frequency(&paths).unwrap(), analysis.df);
    assert_eq!(load_word_counts(&paths).unwrap()[0].term, "difference");
    assert_eq!(load_cooccurrence(&paths).unwrap(), pairs);
    assert_eq!(load_dtm(&paths).unwrap().get("jefferson-1801", "difference"), 2);

    let meta = load_meta(&paths).unwrap();
    assert_eq!(meta.num_docs, 2);
    assert_eq!(meta.version, FORMAT_VERSION);
    assert!(!meta.created_at.is_empty());
}

#[test]
fn tfidf_file_is_one_record_per_line() {
    let dir = tempdir().unwrap();
    let paths = OutputPaths::new(dir.path());
    let analysis = FrequencyEngine::new().analyze(&docs()).unwrap();
    save_tfidf(&paths, &analysis.records).unwrap();
    let text = std::fs::read_to_string(paths.tfidf()).unwrap();
    assert_eq!(text.lines().count(), analysis.records.len());
    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["term"], "difference");
}
