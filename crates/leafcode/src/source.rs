//! Reading Leafcode source files and validating them line by line.
//!
//! Every line must end with `;`. Lines are handed out one at a time so that a
//! bad line only stops processing once the lines before it have run.

use std::path::Path;

use anyhow::Context;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("line {line}: lines must end with ';'")]
    MissingSemicolon { line: usize },
}

/// A validated line: trimmed, with its trailing `;` removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based.
    pub number: usize,
    pub text: String,
}

pub fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("couldn't open source file {}", path.display()))
}

pub fn validate(number: usize, raw: &str) -> Result<SourceLine, SourceError> {
    let text = raw
        .trim()
        .strip_suffix(';')
        .ok_or(SourceError::MissingSemicolon { line: number })?;
    Ok(SourceLine {
        number,
        text: text.to_string(),
    })
}

pub fn lines(source: &str) -> impl Iterator<Item = Result<SourceLine, SourceError>> + '_ {
    source
        .lines()
        .enumerate()
        .map(|(index, raw)| validate(index + 1, raw))
}
