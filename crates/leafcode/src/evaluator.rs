//! Tree-walking evaluation.
//!
//! Values travel between nodes as text: literals and variables evaluate to
//! their own spelling, operations re-read their operands as integers. A
//! variable therefore evaluates to its name, which reads back as `0`.

use thiserror::Error;
use tracing::error;

use crate::parser::Node;
use crate::tokenizer::TokenKind;

/// The `Display` of each variant is the text a failed evaluation yields.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("Error: divide by zero")]
    DivideByZero,
    #[error("Error: Unknown operation")]
    UnknownOperation { kind: TokenKind },
    #[error("Error: Unrecognized node type")]
    UnrecognizedNode { node: &'static str },
}

/// Evaluates `node`, turning a failure into its error text.
pub fn evaluate(node: &Node) -> String {
    match try_evaluate(node) {
        Ok(value) => value,
        Err(err) => {
            error!(?err, "{err}");
            err.to_string()
        }
    }
}

pub fn try_evaluate(node: &Node) -> Result<String, EvalError> {
    match node {
        Node::Literal(token) | Node::Variable(token) => Ok(token.text.clone()),
        Node::Operation {
            operator,
            left,
            right,
        } => {
            // A failed operand keeps its error text, which reads as zero here.
            let lhs = parse_int(&evaluate(left));
            let rhs = parse_int(&evaluate(right));
            apply(operator.kind, lhs, rhs).map(|value| value.to_string())
        }
        Node::Print { operand, .. } => try_evaluate(operand),
        Node::Program(_) | Node::Expression(_) => {
            Err(EvalError::UnrecognizedNode { node: node.tag() })
        }
    }
}

fn apply(kind: TokenKind, lhs: i32, rhs: i32) -> Result<i32, EvalError> {
    match kind {
        TokenKind::Add => Ok(lhs.wrapping_add(rhs)),
        TokenKind::Sub => Ok(lhs.wrapping_sub(rhs)),
        TokenKind::Mul => Ok(lhs.wrapping_mul(rhs)),
        TokenKind::Div if rhs == 0 => Err(EvalError::DivideByZero),
        TokenKind::Div => Ok(lhs.wrapping_div(rhs)),
        kind => Err(EvalError::UnknownOperation { kind }),
    }
}

/// Best-effort integer parse: optional leading whitespace and sign, then the
/// longest run of digits. No digits means zero. Overflow wraps.
pub fn parse_int(text: &str) -> i32 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add(i32::from(digit - b'0'))
        });

    if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::tokenizer::{tokenize, Token};

    fn eval_line(line: &str) -> String {
        evaluate(&parse(tokenize(line)))
    }

    #[test]
    fn multiplication_before_addition() {
        assert_eq!(eval_line("2 + 3 * 4"), "14");
    }

    #[test]
    fn division_is_left_associative() {
        assert_eq!(eval_line("6 / 3 / 2"), "1");
        assert_eq!(eval_line("10 - 4 - 3"), "3");
    }

    #[test]
    fn integer_division_truncates() {
        assert_eq!(eval_line("7 / 2"), "3");
        assert_eq!(eval_line("0 - 7 / 2"), "-3");
    }

    #[test]
    fn garden_spellings_evaluate() {
        assert_eq!(eval_line("stampa 8 decay 2 sprout 1 branch 3 shed 2"), "5");
    }

    #[test]
    fn divide_by_zero_is_an_error_value() {
        assert_eq!(eval_line("5 / 0"), "Error: divide by zero");
        assert_eq!(
            try_evaluate(&parse(tokenize("5 / 0"))),
            Err(EvalError::DivideByZero)
        );
    }

    #[test]
    fn failed_operand_reads_as_zero() {
        assert_eq!(eval_line("5 / 0 + 1"), "1");
    }

    #[test]
    fn print_does_not_change_the_value() {
        assert_eq!(eval_line("print 3 + 4"), "7");
        assert_eq!(eval_line("print 3 + 4"), eval_line("3 + 4"));
        assert_eq!(eval_line("print 5 / 0"), "Error: divide by zero");
    }

    #[test]
    fn unbound_identifier_reads_as_zero() {
        assert_eq!(eval_line("x + 1"), "1");
        assert_eq!(eval_line("x"), "x");
    }

    #[test]
    fn numerals_keep_their_spelling_until_used() {
        assert_eq!(eval_line("007"), "007");
        assert_eq!(eval_line("007 + 0"), "7");
    }

    #[test]
    fn dangling_operator_uses_zero() {
        assert_eq!(eval_line("5 +"), "5");
        assert_eq!(eval_line("5 /"), "Error: divide by zero");
        assert_eq!(eval_line(""), "");
    }

    #[test]
    fn evaluation_is_repeatable() {
        let tree = parse(tokenize("9 - 2 * 3 + y"));
        let first = evaluate(&tree);
        assert_eq!(evaluate(&tree), first);
        assert_eq!(first, "3");
    }

    #[test]
    fn comparison_operator_is_unknown() {
        let tree = Node::operation(
            Token::new(TokenKind::Equal, "="),
            Node::Literal(Token::new(TokenKind::Num, "1")),
            Node::Literal(Token::new(TokenKind::Num, "1")),
        );
        assert_eq!(
            try_evaluate(&tree),
            Err(EvalError::UnknownOperation {
                kind: TokenKind::Equal
            })
        );
        assert_eq!(evaluate(&tree), "Error: Unknown operation");
    }

    #[test]
    fn wrapper_nodes_are_unrecognized() {
        let tree = Node::Program(Box::new(Node::Literal(Token::new(TokenKind::Num, "1"))));
        assert_eq!(evaluate(&tree), "Error: Unrecognized node type");
        let tree = Node::Expression(Box::new(Node::Literal(Token::new(TokenKind::Num, "1"))));
        assert_eq!(
            try_evaluate(&tree),
            Err(EvalError::UnrecognizedNode { node: "Expression" })
        );
    }

    #[test]
    fn arithmetic_wraps_on_overflow() {
        assert_eq!(eval_line("2147483647 + 1"), "-2147483648");
    }

    #[test]
    fn best_effort_parse() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("  -17"), -17);
        assert_eq!(parse_int("+5"), 5);
        assert_eq!(parse_int("12abc"), 12);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("-"), 0);
        assert_eq!(parse_int("Error: divide by zero"), 0);
    }
}
