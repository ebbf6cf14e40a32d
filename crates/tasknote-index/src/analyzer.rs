//! Text analysis shared by both indices.
//!
//! Text fields go through `SimpleTokenizer`, `LowerCaser`, a 40-byte
//! `RemoveLongFilter` and a `Stemmer`, in that order. Queries are analyzed with
//! the same pipeline, so "Buying" finds "buy".

use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer,
};

use crate::IndexError;

/// Name of the custom tokenizer registered with Tantivy.
pub const TASKNOTE_TOKENIZER: &str = "tasknote_text";

/// Maximum token length in bytes before filtering.
const MAX_TOKEN_LENGTH: usize = 40;

/// Stemmer languages by configuration name.
const LANGUAGES: &[(&str, Language)] = &[
    ("arabic", Language::Arabic),
    ("danish", Language::Danish),
    ("dutch", Language::Dutch),
    ("english", Language::English),
    ("finnish", Language::Finnish),
    ("french", Language::French),
    ("german", Language::German),
    ("greek", Language::Greek),
    ("hungarian", Language::Hungarian),
    ("italian", Language::Italian),
    ("norwegian", Language::Norwegian),
    ("portuguese", Language::Portuguese),
    ("romanian", Language::Romanian),
    ("russian", Language::Russian),
    ("spanish", Language::Spanish),
    ("swedish", Language::Swedish),
    ("tamil", Language::Tamil),
    ("turkish", Language::Turkish),
];

/// Parses a stemmer language name, case-insensitively.
pub fn parse_language(name: &str) -> Result<Language, IndexError> {
    let lower = name.to_lowercase();
    LANGUAGES
        .iter()
        .find(|(candidate, _)| *candidate == lower)
        .map(|(_, language)| *language)
        .ok_or(IndexError::InvalidLanguage(lower))
}

/// Builds the text analyzer for the given stemmer language name.
pub fn build_analyzer(language_name: &str) -> Result<TextAnalyzer, IndexError> {
    let language = parse_language(language_name)?;
    Ok(TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LENGTH))
        .filter(Stemmer::new(language))
        .build())
}
