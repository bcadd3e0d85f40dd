use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tidyfreq_core::cooccur::cooccurrence_min;
use tidyfreq_core::persist::{
    save_cooccurrence, save_document_frequency, save_dtm, save_meta, save_tfidf, save_word_counts, MetaFile, OutputPaths,
};
use tidyfreq_core::{
    cast_dtm, count, Corpus, DocMeta, Document, EngineConfig, FrequencyEngine, IdfWeighting, StopwordPolicy, Tokenizer,
    Window,
};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputSpeech {
    id: String,
    text: String,
    author: Option<String>,
    year: Option<i32>,
}

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(about = "Word frequency, tf-idf and co-occurrence over a speech corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long)]
    input: String,
    /// Output directory
    #[arg(long)]
    output: String,
    /// JSON engine configuration; flags below override it
    #[arg(long)]
    config: Option<String>,
    /// Keep stopwords instead of removing them
    #[arg(long, default_value_t = false)]
    keep_stopwords: bool,
    /// Apply English stemming to tokens
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Only analyze speeches by this author
    #[arg(long)]
    author: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the most distinctive terms of each speech
    Tfidf {
        #[command(flatten)]
        common: Common,
        /// Treat each author's speeches as a single document
        #[arg(long, default_value_t = false)]
        by_author: bool,
        /// Count n-token phrases instead of single words
        #[arg(long)]
        ngram: Option<usize>,
        /// Terms reported per document in the log summary
        #[arg(long)]
        top: Option<usize>,
        /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
        #[arg(long, default_value_t = false)]
        smoothed_idf: bool,
    },
    /// Count pairs of words that appear in the same speech window
    Cooccur {
        #[command(flatten)]
        common: Common,
        /// Only look at the final N tokens of each speech
        #[arg(long)]
        tail: Option<usize>,
        #[arg(long)]
        min_count: Option<u32>,
    },
    /// Write the document-term matrix
    Dtm {
        #[command(flatten)]
        common: Common,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tfidf { common, by_author, ngram, top, smoothed_idf } => {
            let mut cfg = load_config(&common)?;
            if let Some(n) = ngram { cfg.ngram = n; }
            if let Some(k) = top { cfg.top_k = k; }
            if smoothed_idf { cfg.idf = IdfWeighting::Smoothed; }
            cfg.validate()?;
            run_tfidf(&common, &cfg, by_author)
        }
        Commands::Cooccur { common, tail, min_count } => {
            let mut cfg = load_config(&common)?;
            if tail.is_some() { cfg.cooccur_tail = tail; }
            if let Some(c) = min_count { cfg.cooccur_min_count = c; }
            cfg.validate()?;
            run_cooccur(&common, &cfg)
        }
        Commands::Dtm { common } => {
            let cfg = load_config(&common)?;
            run_dtm(&common, &cfg)
        }
    }
}

fn load_config(common: &Common) -> Result<EngineConfig> {
    let mut cfg = match &common.config {
        Some(path) => EngineConfig::from_json_file(path).with_context(|| format!("loading config {path}"))?,
        None => EngineConfig::default(),
    };
    if common.keep_stopwords { cfg.stopwords = StopwordPolicy::None; cfg.extra_stopwords.clear(); }
    if common.stem { cfg.stem = true; }
    Ok(cfg)
}

/// Load the corpus and narrow it to `--author` when given.
fn load_selected(common: &Common, tokenizer: &Tokenizer) -> Result<Corpus> {
    let corpus = load_corpus(Path::new(&common.input), tokenizer)?;
    if corpus.is_empty() {
        bail!("no speeches found under {}", common.input);
    }
    Ok(match &common.author {
        Some(author) => corpus.by_author(author).into_iter().cloned().collect(),
        None => corpus,
    })
}

fn run_tfidf(common: &Common, cfg: &EngineConfig, by_author: bool) -> Result<()> {
    let mut corpus = load_selected(common, &cfg.term_tokenizer())?;
    if by_author {
        corpus = corpus.merge_by_author();
    }
    let engine = FrequencyEngine::from_config(cfg)?;
    let analysis = engine.analyze(&corpus)?;

    let paths = OutputPaths::new(&common.output);
    save_tfidf(&paths, &analysis.records)?;
    save_document_frequency(&paths, &analysis.df)?;
    save_word_counts(&paths, &analysis.word_counts())?;
    save_meta(&paths, &MetaFile::now(analysis.df.num_docs, analysis.df.len() as u32))?;

    for (doc_id, terms) in analysis.top_terms(cfg.top_k) {
        let listed: Vec<String> = terms.iter().map(|r| format!("{}={:.4}", r.term, r.tf_idf)).collect();
        tracing::info!(doc_id, top = %listed.join(", "), "distinctive terms");
    }
    tracing::info!(output = %common.output, "tf-idf written");
    Ok(())
}

fn run_cooccur(common: &Common, cfg: &EngineConfig) -> Result<()> {
    let corpus = load_selected(common, &cfg.tokenizer())?;
    let window = cfg.cooccur_tail.map(Window::Tail).unwrap_or(Window::Whole);
    let pairs = cooccurrence_min(&corpus, window, cfg.cooccur_min_count);

    let paths = OutputPaths::new(&common.output);
    save_cooccurrence(&paths, &pairs)?;
    save_meta(&paths, &MetaFile::now(corpus.len() as u32, 0))?;
    tracing::info!(num_pairs = pairs.len(), output = %common.output, "co-occurrence written");
    Ok(())
}

fn run_dtm(common: &Common, cfg: &EngineConfig) -> Result<()> {
    let corpus = load_selected(common, &cfg.tokenizer())?;
    let dtm = cast_dtm(&count(&corpus)?);

    let paths = OutputPaths::new(&common.output);
    save_dtm(&paths, &dtm)?;
    save_meta(&paths, &MetaFile::now(corpus.len() as u32, dtm.terms.len() as u32))?;
    let (rows, cols) = dtm.shape();
    tracing::info!(rows, cols, nnz = dtm.nnz(), output = %common.output, "document-term matrix written");
    Ok(())
}

fn load_corpus(input_path: &Path, tokenizer: &Tokenizer) -> Result<Corpus> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("input path {} does not exist", input_path.display());
    }

    let mut corpus = Corpus::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    for file in files {
        let speeches = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for (record, s) in speeches {
            if !seen_ids.insert(s.id.clone()) {
                bail!("{}:{}: duplicate document id '{}'", file.display(), record, s.id);
            }
            corpus.push(to_document(s, tokenizer));
        }
    }
    tracing::info!(num_docs = corpus.len(), "loaded speeches");
    Ok(corpus)
}

/// Speeches paired with their 1-based line number.
fn read_jsonl(file: &Path) -> Result<Vec<(usize, InputSpeech)>> {
    let reader = BufReader::new(File::open(file)?);
    let mut out = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let speech: InputSpeech = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        out.push((lineno + 1, speech));
    }
    Ok(out)
}

/// Speeches paired with their 1-based position in the file.
fn read_json(file: &Path) -> Result<Vec<(usize, InputSpeech)>> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let speeches: Vec<InputSpeech> = match json {
        serde_json::Value::Array(arr) => {
            arr.into_iter().map(serde_json::from_value).collect::<std::result::Result<Vec<_>, _>>()?
        }
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => {
            tracing::warn!(file = %file.display(), "skipping JSON that is neither an object nor an array");
            Vec::new()
        }
    };
    Ok(speeches.into_iter().enumerate().map(|(i, s)| (i + 1, s)).collect())
}

fn to_document(speech: InputSpeech, tokenizer: &Tokenizer) -> Document {
    let meta = DocMeta { author: speech.author, year: speech.year };
    tokenizer.document(speech.id, &speech.text, meta)
}
