//! A word-at-a-time tokenizer for Leafcode lines.
//!
//! Leafcode words are separated by whitespace (and by the `;` that terminates
//! every line), so there is no character-level scanning: each word is looked
//! up in the keyword table, and whatever is not a keyword is either a numeral
//! or an identifier. Classification never fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Everything the tokenizer can classify a word as.
///
/// The declaration order is the token's numeric value as shown by the lexer
/// demo, so new kinds go at the end (before `Eof`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenKind {
    Bloom,
    Wither,
    Petal,
    Vine,
    Tree,
    Stump,
    /// The `:` delimiter.
    Lilly,
    /// The `"` quote marker.
    Water,
    Num,
    Var,
    Poppy,
    Rose,
    Bush,
    Add,
    Sub,
    Mul,
    Div,
    Equal,
    NotEqual,
    RightCroc,
    LeftCroc,
    Print,
    Plant,
    Pot,
    /// Marks the end of a token stream. Never produced from source text.
    Eof,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Bloom => "BLOOM",
            TokenKind::Wither => "WITHER",
            TokenKind::Petal => "PETAL",
            TokenKind::Vine => "VINE",
            TokenKind::Tree => "TREE",
            TokenKind::Stump => "STUMP",
            TokenKind::Lilly => "LILLY",
            TokenKind::Water => "WATER",
            TokenKind::Num => "NUM",
            TokenKind::Var => "VAR",
            TokenKind::Poppy => "POPPY",
            TokenKind::Rose => "ROSE",
            TokenKind::Bush => "BUSH",
            TokenKind::Add => "ADD",
            TokenKind::Sub => "SUB",
            TokenKind::Mul => "MUL",
            TokenKind::Div => "DIV",
            TokenKind::Equal => "EQUAL",
            TokenKind::NotEqual => "NOTEQUAL",
            TokenKind::RightCroc => "RIGHTCROC",
            TokenKind::LeftCroc => "LEFTCROC",
            TokenKind::Print => "PRINT",
            TokenKind::Plant => "PLANT",
            TokenKind::Pot => "POT",
            TokenKind::Eof => "EOF",
        }
    }

    /// Numeric token value, i.e. the position in the declaration order.
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scanned linearly, first match wins. Matching is case-sensitive.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("BLOOM", TokenKind::Bloom),
    ("wither", TokenKind::Wither),
    ("petal", TokenKind::Petal),
    ("vine", TokenKind::Vine),
    ("tree", TokenKind::Tree),
    ("stump", TokenKind::Stump),
    (":", TokenKind::Lilly),
    ("\"", TokenKind::Water),
    ("Poppy", TokenKind::Poppy),
    ("Rose", TokenKind::Rose),
    ("Bush", TokenKind::Bush),
    ("sprout", TokenKind::Add),
    ("shed", TokenKind::Sub),
    ("branch", TokenKind::Mul),
    ("decay", TokenKind::Div),
    ("=", TokenKind::Equal),
    ("!=", TokenKind::NotEqual),
    ("rightcroc", TokenKind::RightCroc),
    ("leftcroc", TokenKind::LeftCroc),
    ("stampa", TokenKind::Print),
    ("plant", TokenKind::Plant),
    ("pot", TokenKind::Pot),
    // Conventional spellings.
    ("+", TokenKind::Add),
    ("-", TokenKind::Sub),
    ("*", TokenKind::Mul),
    ("/", TokenKind::Div),
    ("print", TokenKind::Print),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn terminator() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn is_terminator(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// The tokens of one line, always ending with exactly one terminator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.retain(|token| !token.is_terminator());
        tokens.push(Token::terminator());
        Self { tokens }
    }

    /// All tokens, terminator included.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The tokens produced from source words, without the terminator.
    pub fn words(&self) -> &[Token] {
        &self.tokens[..self.tokens.len() - 1]
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

pub fn classify(word: &str) -> TokenKind {
    if let Some((_, kind)) = KEYWORDS.iter().find(|(keyword, _)| *keyword == word) {
        return *kind;
    }
    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        TokenKind::Num
    } else {
        TokenKind::Var
    }
}

pub fn tokenize_word(word: &str) -> Token {
    Token::new(classify(word), word)
}

/// Splits a line into words on whitespace and `;`.
pub fn words(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ';')
        .filter(|word| !word.is_empty())
}

#[tracing::instrument(level = "trace", skip_all)]
pub fn tokenize(line: &str) -> TokenStream {
    let tokens = words(line).map(tokenize_word).collect::<Vec<_>>();
    trace!(?tokens, "Tokenized line");
    TokenStream::new(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_exactly() {
        for (keyword, kind) in KEYWORDS {
            assert_eq!(classify(keyword), *kind, "keyword {keyword:?}");
        }
        assert_eq!(classify("bloom"), TokenKind::Var);
        assert_eq!(classify("Print"), TokenKind::Var);
        assert_eq!(classify("sprouts"), TokenKind::Var);
    }

    #[test]
    fn digit_words_are_numerals() {
        assert_eq!(classify("0"), TokenKind::Num);
        assert_eq!(classify("0042"), TokenKind::Num);
        assert_eq!(classify("12a"), TokenKind::Var);
        assert_eq!(classify("-3"), TokenKind::Var);
        assert_eq!(classify("x"), TokenKind::Var);
    }

    #[test]
    fn token_text_is_verbatim() {
        let token = tokenize_word("007");
        assert_eq!(token, Token::new(TokenKind::Num, "007"));
    }

    #[test]
    fn line_ends_with_single_terminator() {
        let stream = tokenize("  print 3 + x;");
        let kinds = stream.tokens().iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Print,
                TokenKind::Num,
                TokenKind::Add,
                TokenKind::Var,
                TokenKind::Eof
            ]
        );
        assert_eq!(stream.words().len(), 4);
        assert_eq!(stream.tokens().last(), Some(&Token::terminator()));
    }

    #[test]
    fn semicolons_separate_words() {
        let texts = tokenize("2;3\t4")
            .words()
            .iter()
            .map(|t| t.text.clone())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["2", "3", "4"]);
    }

    #[test]
    fn empty_line_is_just_the_terminator() {
        assert_eq!(tokenize("   ").tokens(), &[Token::terminator()]);
    }

    #[test]
    fn stream_never_holds_two_terminators() {
        let stream = TokenStream::new(vec![Token::new(TokenKind::Num, "1"), Token::terminator()]);
        assert_eq!(stream.tokens().len(), 2);
    }

    #[test]
    fn names_follow_declaration_order() {
        assert_eq!(TokenKind::Bloom.index(), 0);
        assert_eq!(TokenKind::Num.index(), 8);
        assert_eq!(TokenKind::Add.index(), 13);
        assert_eq!(TokenKind::Print.index(), 21);
        assert_eq!(TokenKind::Pot.index(), 23);
        assert_eq!(TokenKind::Pot.to_string(), "POT");
        assert_eq!(TokenKind::NotEqual.to_string(), "NOTEQUAL");
    }

    #[test]
    fn token_serializes_kind_and_text() {
        insta::assert_json_snapshot!(tokenize_word("42"), @r###"
        {
          "kind": "Num",
          "text": "42"
        }
        "###);
    }
}
