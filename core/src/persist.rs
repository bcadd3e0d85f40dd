use crate::cooccur::PairCount;
use crate::dtm::DocumentTermMatrix;
use crate::error::Result;
use crate::frequency::{DocumentFrequency, TfIdfRecord, WordCount};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn now(num_docs: u32, num_terms: u32) -> Self {
        let created_at = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        Self { num_docs, num_terms, created_at, version: FORMAT_VERSION }
    }
}

/// Layout of an analysis output directory.
pub struct OutputPaths {
    pub root: PathBuf,
}

impl OutputPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn tfidf(&self) -> PathBuf { self.root.join("tfidf.jsonl") }
    pub fn df(&self) -> PathBuf { self.root.join("df.bin") }
    pub fn word_counts(&self) -> PathBuf { self.root.join("word_counts.json") }
    pub fn cooccur(&self) -> PathBuf { self.root.join("cooccur.jsonl") }
    pub fn dtm(&self) -> PathBuf { self.root.join("dtm.json") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut w, row)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        rows.push(serde_json::from_str(&line)?);
    }
    Ok(rows)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let json = serde_json::to_string_pretty(value)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut f = File::open(path)?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

pub fn save_tfidf(paths: &OutputPaths, records: &[TfIdfRecord]) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_jsonl(&paths.tfidf(), records)
}

pub fn load_tfidf(paths: &OutputPaths) -> Result<Vec<TfIdfRecord>> { read_jsonl(&paths.tfidf()) }

pub fn save_document_frequency(paths: &OutputPaths, df: &DocumentFrequency) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.df())?;
    let bytes = bincode::serialize(df)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_document_frequency(paths: &OutputPaths) -> Result<DocumentFrequency> {
    let mut f = File::open(paths.df())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(bincode::deserialize(&buf)?)
}

pub fn save_word_counts(paths: &OutputPaths, counts: &[WordCount]) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_json(&paths.word_counts(), counts)
}

pub fn load_word_counts(paths: &OutputPaths) -> Result<Vec<WordCount>> { read_json(&paths.word_counts()) }

pub fn save_cooccurrence(paths: &OutputPaths, pairs: &[PairCount]) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_jsonl(&paths.cooccur(), pairs)
}

pub fn load_cooccurrence(paths: &OutputPaths) -> Result<Vec<PairCount>> { read_jsonl(&paths.cooccur()) }

pub fn save_dtm(paths: &OutputPaths, dtm: &DocumentTermMatrix) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_json(&paths.dtm(), dtm)
}

pub fn load_dtm(paths: &OutputPaths) -> Result<DocumentTermMatrix> { read_json(&paths.dtm()) }

pub fn save_meta(paths: &OutputPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_json(&paths.meta(), meta)
}

pub fn load_meta(paths: &OutputPaths) -> Result<MetaFile> { read_json(&paths.meta()) }
