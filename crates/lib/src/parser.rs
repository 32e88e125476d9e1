//! # Structured Response Parsing
//!
//! Model replies are free text that should contain one JSON document, often with
//! commentary or markdown around it. This module extracts that document and
//! decodes it into a typed record. Each stage supplies its own fallback record,
//! so a decode failure is never surfaced past the stage that asked for it.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Why a reply could not be decoded into a structured record.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("no brace-delimited document found in the reply")]
    NoStructuredDocument,
    #[error("malformed structured document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The outcome of decoding a reply with a stage-specific fallback.
#[derive(Debug)]
pub enum Decoded<T> {
    /// The reply contained a well-formed document.
    Parsed(T),
    /// The reply could not be decoded; `record` is the stage's fallback.
    Fallback { record: T, reason: ParseFailure },
}

impl<T> Decoded<T> {
    /// Returns the usable record, whichever way it was obtained.
    pub fn into_record(self) -> T {
        match self {
            Decoded::Parsed(record) | Decoded::Fallback { record, .. } => record,
        }
    }

    pub fn record(&self) -> &T {
        match self {
            Decoded::Parsed(record) | Decoded::Fallback { record, .. } => record,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback { .. })
    }

    /// Applies `f` to the record, keeping the parsed/fallback tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        match self {
            Decoded::Parsed(record) => Decoded::Parsed(f(record)),
            Decoded::Fallback { record, reason } => Decoded::Fallback {
                record: f(record),
                reason,
            },
        }
    }
}

fn block_regex() -> &'static Regex {
    static BLOCK: OnceLock<Regex> = OnceLock::new();
    // Greedy on purpose: first `{` through last `}` across the whole reply.
    BLOCK.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"))
}

/// Returns the span from the first `{` to the last `}` in `text`, if any.
pub fn extract_structured_block(text: &str) -> Option<&str> {
    block_regex().find(text).map(|m| m.as_str())
}

/// Extracts and strictly decodes the structured document embedded in `text`.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, ParseFailure> {
    let block = extract_structured_block(text).ok_or(ParseFailure::NoStructuredDocument)?;
    Ok(serde_json::from_str(block)?)
}

/// Decodes `text`, substituting `fallback()` when no valid document is found.
pub fn decode_or<T: DeserializeOwned>(text: &str, fallback: impl FnOnce() -> T) -> Decoded<T> {
    match parse_structured(text) {
        Ok(record) => Decoded::Parsed(record),
        Err(reason) => {
            debug!(%reason, "Falling back to default record");
            Decoded::Fallback {
                record: fallback(),
                reason,
            }
        }
    }
}
