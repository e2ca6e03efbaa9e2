//! First-error extraction from a Tree-sitter parse tree.
//!
//! Tree-sitter recovers from every error, so a tree can hold many `ERROR` and `MISSING` nodes.
//! A one-shot compile reports only one; this module picks it the way the interpreter's own
//! front end does:
//!
//! - an unmatched or mismatched closing bracket is a tokenizer error, reported where it occurs;
//! - an opening bracket never closed is reported at the bracket;
//! - bracket errors lose only to a parse error that ends before the offending bracket;
//! - otherwise the first `ERROR`/`MISSING` node in document order wins.
//!
//! `MISSING` closing brackets are skipped: the bracket scan reports their opener instead.

use crate::error::PySyntaxError;
use tree_sitter::{Node, Tree};

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Leaves under `root` in document order. Iterative, so deeply nested input cannot overflow.
fn leaves<'t>(root: Node<'t>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let kids = children(node);
        if kids.is_empty() {
            out.push(node);
        } else {
            stack.extend(kids.into_iter().rev());
        }
    }
    out
}

/// The first `ERROR` or `MISSING` node in document order.
fn first_error_node<'t>(root: Node<'t>) -> Option<Node<'t>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || (node.is_missing() && !is_closing(node.kind())) {
            return Some(node);
        }
        if node.has_error() {
            stack.extend(children(node).into_iter().rev());
        }
    }
    None
}

fn is_closing(kind: &str) -> bool {
    matches!(kind, ")" | "]" | "}")
}

fn closing_for(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

#[derive(Debug, Clone)]
struct Located {
    row: usize,
    byte_column: usize,
    /// Byte range of the construct the error belongs to.
    span: (usize, usize),
    message: String,
    indentation: bool,
}

impl Located {
    fn at(node: Node<'_>, message: String) -> Self {
        let start = node.start_position();
        Self {
            row: start.row,
            byte_column: start.column,
            span: (node.start_byte(), node.end_byte()),
            message,
            indentation: false,
        }
    }

    fn spanning(mut self, node: Node<'_>) -> Self {
        self.span = (node.start_byte(), node.end_byte());
        self
    }
}

fn bracket_error(tokens: &[Node<'_>]) -> Option<Located> {
    let mut stack: Vec<Node<'_>> = Vec::new();
    for token in tokens {
        if token.is_missing() {
            continue;
        }
        match token.kind() {
            "(" | "[" | "{" => stack.push(*token),
            close @ (")" | "]" | "}") => match stack.pop() {
                None => {
                    return Some(Located::at(*token, format!("unmatched '{close}'")));
                }
                Some(open) if closing_for(open.kind()) != close => {
                    let open_row = open.start_position().row;
                    let message = if open_row == token.start_position().row {
                        format!(
                            "closing parenthesis '{close}' does not match opening parenthesis '{}'",
                            open.kind()
                        )
                    } else {
                        format!(
                            "closing parenthesis '{close}' does not match opening parenthesis '{}' on line {}",
                            open.kind(),
                            open_row + 1
                        )
                    };
                    return Some(Located::at(*token, message));
                }
                Some(_) => {}
            },
            _ => {}
        }
    }
    stack
        .last()
        .map(|open| Located::at(*open, format!("'{}' was never closed", open.kind())))
}

fn describe(node: Node<'_>) -> Located {
    if node.is_missing() {
        let kind = node.kind();
        if kind.contains("indent") {
            let mut located = Located::at(node, "expected an indented block".to_string());
            located.indentation = true;
            return located;
        }
        let message = if kind.chars().all(|c| c.is_alphanumeric() || c == '_') {
            format!("expected {kind}")
        } else {
            format!("expected '{kind}'")
        };
        return Located::at(node, message);
    }
    // Report an ERROR node at its first real token, never at a leading comment.
    let anchor = leaves(node)
        .into_iter()
        .find(|leaf| leaf.kind() != "comment")
        .unwrap_or(node);
    Located::at(anchor, "invalid syntax".to_string()).spanning(node)
}

/// The single error a one-shot compile of `source` reports, if any.
pub(crate) fn first_error(tree: &Tree, source: &str) -> Option<PySyntaxError> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let parse_error = first_error_node(root).map(describe);
    let bracket = bracket_error(&leaves(root));
    let chosen = match (parse_error, bracket) {
        (Some(parse), Some(bracket)) if parse.span.1 <= bracket.span.0 => parse,
        (_, Some(bracket)) => bracket,
        (Some(parse), None) => parse,
        (None, None) => return None,
    };

    let line_text = source.split('\n').nth(chosen.row).unwrap_or("");
    let column = line_text
        .get(..chosen.byte_column)
        .map_or(chosen.byte_column, |prefix| prefix.chars().count())
        + 1;
    let line = chosen.row + 1;
    Some(if chosen.indentation {
        PySyntaxError::indentation(line, column, chosen.message)
    } else {
        PySyntaxError::syntax(line, column, chosen.message)
    })
}
