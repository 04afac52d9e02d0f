//! Diagnostic renderings of a parsed line.

use std::fmt::Write;

use crate::parser::Node;

/// Single-line form, e.g. `PRINT((2 ADD (3 MUL 4)))`.
pub fn inline(node: &Node) -> String {
    let mut out = String::new();
    write_inline(node, &mut out);
    out
}

fn write_inline(node: &Node, out: &mut String) {
    match node {
        Node::Program(inner) | Node::Expression(inner) => write_inline(inner, out),
        Node::Operation {
            operator,
            left,
            right,
        } => {
            out.push('(');
            write_inline(left, out);
            let _ = write!(out, " {} ", operator.kind);
            write_inline(right, out);
            out.push(')');
        }
        Node::Literal(token) => out.push_str(&token.text),
        Node::Variable(token) => {
            let _ = write!(out, "var({})", token.text);
        }
        Node::Print { operand, .. } => {
            out.push_str("PRINT(");
            write_inline(operand, out);
            out.push(')');
        }
    }
}

/// One node per line, children indented by two spaces.
pub fn indented(node: &Node) -> String {
    let mut lines = Vec::new();
    collect_indented(node, 0, &mut lines);
    lines.join("\n")
}

fn collect_indented(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    match node {
        Node::Program(inner) | Node::Expression(inner) => {
            lines.push(format!("{pad}{}", node.tag()));
            collect_indented(inner, depth + 1, lines);
        }
        Node::Operation {
            operator,
            left,
            right,
        } => {
            lines.push(format!("{pad}{}", operator.kind));
            collect_indented(left, depth + 1, lines);
            collect_indented(right, depth + 1, lines);
        }
        Node::Literal(token) => lines.push(format!("{pad}literal {}", token.text)),
        Node::Variable(token) => lines.push(format!("{pad}variable {}", token.text)),
        Node::Print { operand, .. } => {
            lines.push(format!("{pad}PRINT"));
            collect_indented(operand, depth + 1, lines);
        }
    }
}
