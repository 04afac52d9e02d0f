use std::iter::Peekable;
use std::vec;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::tokenizer::{Token, TokenKind, TokenStream};

/// Expression tree for a single line.
///
/// Every node owns its children. `Program` and `Expression` are wrappers the
/// parser never builds; the renderer understands them, the evaluator rejects
/// them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Node {
    #[allow(dead_code)]
    Program(Box<Node>),
    #[allow(dead_code)]
    Expression(Box<Node>),
    Operation {
        operator: Token,
        left: Box<Node>,
        right: Box<Node>,
    },
    Literal(Token),
    Variable(Token),
    Print {
        keyword: Token,
        operand: Box<Node>,
    },
}

impl Node {
    pub fn operation(operator: Token, left: Node, right: Node) -> Self {
        Self::Operation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn print(keyword: Token, operand: Node) -> Self {
        Self::Print {
            keyword,
            operand: Box::new(operand),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Node::Program(_) => "Program",
            Node::Expression(_) => "Expression",
            Node::Operation { .. } => "Operation",
            Node::Literal(_) => "Literal",
            Node::Variable(_) => "Variable",
            Node::Print { .. } => "Print",
        }
    }
}

/// Cursor over a token stream. Reads at the end keep returning the
/// terminator instead of running off the stream.
struct Parser {
    tokens: Peekable<vec::IntoIter<Token>>,
}

impl Parser {
    fn new(tokens: TokenStream) -> Self {
        Self {
            tokens: tokens.into_tokens().into_iter().peekable(),
        }
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.tokens.peek().map_or(TokenKind::Eof, |token| token.kind)
    }

    fn advance(&mut self) -> Token {
        self.tokens
            .next_if(|token| !token.is_terminator())
            .unwrap_or_else(Token::terminator)
    }

    fn advance_if(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.contains(&self.peek_kind()) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn remaining(&mut self) -> Vec<Token> {
        self.tokens
            .by_ref()
            .filter(|token| !token.is_terminator())
            .collect()
    }

    fn parse_expression(&mut self) -> Node {
        trace!(next = %self.peek_kind(), "Parsing expression");

        if let Some(keyword) = self.advance_if(&[TokenKind::Print]) {
            let operand = self.parse_expression();
            return Node::print(keyword, operand);
        }
        self.parse_term()
    }

    fn parse_term(&mut self) -> Node {
        let mut left = self.parse_factor();
        while let Some(operator) = self.advance_if(&[TokenKind::Add, TokenKind::Sub]) {
            let right = self.parse_factor();
            left = Node::operation(operator, left, right);
        }
        left
    }

    fn parse_factor(&mut self) -> Node {
        let mut left = self.parse_literal();
        while let Some(operator) = self.advance_if(&[TokenKind::Mul, TokenKind::Div]) {
            let right = self.parse_literal();
            left = Node::operation(operator, left, right);
        }
        left
    }

    fn parse_literal(&mut self) -> Node {
        let token = self.advance();
        match token.kind {
            TokenKind::Num => Node::Literal(token),
            TokenKind::Eof => {
                warn!("Expected an operand but reached the end of the line");
                Node::Variable(token)
            }
            _ => Node::Variable(token),
        }
    }
}

/// Parses one line. Malformed input never fails: a missing operand becomes a
/// variable over the terminator and tokens after the expression are dropped.
#[tracing::instrument(level = "trace", skip_all)]
pub fn parse(tokens: TokenStream) -> Node {
    let mut parser = Parser::new(tokens);
    let tree = parser.parse_expression();

    let ignored = parser.remaining();
    if !ignored.is_empty() {
        warn!(?ignored, "Ignoring tokens after the end of the expression");
    }
    debug!(root = tree.tag(), "Parsed line");
    tree
}
