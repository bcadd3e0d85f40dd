//! Term-frequency analysis over tokenized document corpora.
//!
//! The engine ([`frequency`], [`ngram`], [`cooccur`], [`dtm`]) works on
//! in-memory [`Document`]s and never touches the filesystem. [`tokenizer`]
//! and [`persist`] are the collaborators that feed it and store its output.

pub mod config;
pub mod cooccur;
pub mod corpus;
pub mod dtm;
pub mod error;
pub mod frequency;
pub mod ngram;
pub mod persist;
pub mod stopwords;
pub mod tokenizer;

pub use config::{EngineConfig, IdfWeighting, StopwordPolicy};
pub use cooccur::{cooccurrence, cooccurrence_min, PairCount, Window};
pub use corpus::{Corpus, DocMeta, Document};
pub use dtm::{cast_dtm, DocumentTermMatrix};
pub use error::{Error, Result};
pub use frequency::{
    count, document_frequency, inverse_document_frequency, term_frequency, tf_idf, Analysis,
    DocumentCounts, DocumentFrequency, FrequencyEngine, IdfTable, TermCounts, TfEntry, TfIdfRecord,
    TfTable, WordCount,
};
pub use stopwords::StopwordSet;
pub use tokenizer::Tokenizer;
