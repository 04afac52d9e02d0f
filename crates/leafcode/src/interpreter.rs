use serde::Serialize;
use tracing::debug;

use crate::evaluator;
use crate::parser::{self, Node};
use crate::source::SourceLine;
use crate::tokenizer::{self, TokenStream};

/// Everything produced while running one line.
#[derive(Clone, Debug, Serialize)]
pub struct LineReport {
    pub line: usize,
    pub source: String,
    pub tokens: TokenStream,
    pub tree: Node,
    pub result: String,
}

#[tracing::instrument(level = "trace", skip_all, fields(line = line.number))]
pub fn process_line(line: &SourceLine) -> LineReport {
    let tokens = tokenizer::tokenize(&line.text);
    let tree = parser::parse(tokens.clone());
    let result = evaluator::evaluate(&tree);
    debug!(%result, "Evaluated line");

    LineReport {
        line: line.number,
        source: line.text.clone(),
        tokens,
        tree,
        result,
    }
}
