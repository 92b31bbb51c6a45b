//! Syntax tree parsing and visitor-based rewriting
//!
//! A [`SyntaxTree`] wraps a parsed JavaScript source. [`SyntaxTree::transform`]
//! walks it in pre-order handing each node to a visitor; the visitor answers
//! [`Visit::Keep`] or [`Visit::Replace`] with replacement expression text.
//! A replaced node's subtree is substituted wholesale and its children are
//! not revisited in the same pass (a later parse of the output sees the
//! replacement as ordinary nodes).

use ast_grep_core::source::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::JavaScript;
use std::fmt;

use crate::error::ParseError;

/// Closed set of node kinds the visitor distinguishes. Everything the
/// grammar produces beyond these is folded into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    StringLiteral,
    TemplateString,
    Call,
    Identifier,
    Other,
}

impl NodeKind {
    fn classify(kind: &str) -> Self {
        match kind {
            "string" => NodeKind::StringLiteral,
            "template_string" => NodeKind::TemplateString,
            "call_expression" => NodeKind::Call,
            "identifier" => NodeKind::Identifier,
            _ => NodeKind::Other,
        }
    }
}

/// The visitor's read-only view of one node.
#[derive(Debug)]
pub struct NodeView {
    pub kind: NodeKind,
    /// Full node text, including quotes for string literals.
    pub text: String,
    /// For string literals: the value between the quotes. Escape sequences
    /// are kept verbatim.
    pub string_value: Option<String>,
}

/// Visitor verdict for one node.
pub enum Visit {
    /// Leave the node alone and descend into its children.
    Keep,
    /// Substitute the node's whole subtree with this expression text and
    /// skip its children.
    Replace(String),
}

/// A visitor is a function over syntax nodes, invoked in pre-order.
pub type Visitor<'v> = dyn FnMut(&NodeView) -> Visit + 'v;

struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

/// A parsed source file, subject to visitor-based rewriting.
pub struct SyntaxTree {
    source: String,
    grep: AstGrep<StrDoc<JavaScript>>,
}

// the inner AstGrep is not Debug; the source is the tree's identity
impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("source", &self.source)
            .finish()
    }
}

impl SyntaxTree {
    /// Parse JavaScript source. Tree-sitter always produces a tree, so a
    /// parse failure is detected by the presence of `ERROR` nodes.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let grep = AstGrep::new(source, JavaScript);

        if let Some(node) = find_error_node(&grep.root()) {
            let range = node.range();
            return Err(ParseError::Syntax {
                offset: range.start,
                snippet: node.text().chars().take(40).collect(),
            });
        }

        Ok(SyntaxTree {
            source: source.to_string(),
            grep,
        })
    }

    /// The current source text (serialized form of the tree).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Apply a visitor in one pre-order pass and reparse the result.
    ///
    /// Replacement text must parse as an expression; a bad replacement
    /// fails the whole transform.
    pub fn transform(self, visitor: &mut Visitor<'_>) -> Result<SyntaxTree, ParseError> {
        let mut edits: Vec<Edit> = Vec::new();
        collect_edits(&self.grep.root(), visitor, &mut edits)?;

        if edits.is_empty() {
            return Ok(self);
        }

        // Edits are disjoint (children of replaced nodes are skipped) and
        // arrive in pre-order; apply back to front to keep offsets valid.
        let mut output = self.source.clone();
        for edit in edits.iter().rev() {
            output.replace_range(edit.start..edit.end, &edit.replacement);
        }

        SyntaxTree::parse(&output)
    }

    /// Serialize the tree back to source text.
    pub fn serialize(self) -> String {
        self.source
    }
}

/// Validate that `snippet` parses as a single JavaScript expression and
/// return it in canonical (trimmed) form.
pub fn parse_expression(snippet: &str) -> Result<String, ParseError> {
    let trimmed = snippet.trim();
    if trimmed.is_empty() {
        return Err(ParseError::BadReplacement(snippet.to_string()));
    }

    let grep = AstGrep::new(trimmed, JavaScript);
    let root = grep.root();
    if find_error_node(&root).is_some() || root.children().count() != 1 {
        return Err(ParseError::BadReplacement(snippet.to_string()));
    }

    Ok(trimmed.to_string())
}

fn find_error_node<'r>(
    node: &Node<'r, StrDoc<JavaScript>>,
) -> Option<Node<'r, StrDoc<JavaScript>>> {
    if node.kind() == "ERROR" {
        return Some(node.clone());
    }
    for child in node.children() {
        if let Some(found) = find_error_node(&child) {
            return Some(found);
        }
    }
    None
}

fn collect_edits(
    node: &Node<'_, StrDoc<JavaScript>>,
    visitor: &mut Visitor<'_>,
    edits: &mut Vec<Edit>,
) -> Result<(), ParseError> {
    let kind = NodeKind::classify(&node.kind());
    let text = node.text().to_string();

    let string_value = if kind == NodeKind::StringLiteral && text.len() >= 2 {
        Some(text[1..text.len() - 1].to_string())
    } else {
        None
    };

    let view = NodeView {
        kind,
        text,
        string_value,
    };

    match visitor(&view) {
        Visit::Replace(replacement) => {
            let replacement = parse_expression(&replacement)?;
            let range = node.range();
            edits.push(Edit {
                start: range.start,
                end: range.end,
                replacement,
            });
            // replaced subtree: do not revisit children in this pass
        }
        Visit::Keep => {
            for child in node.children() {
                collect_edits(&child, visitor, edits)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_broken_source() {
        let err = SyntaxTree::parse("const x = {").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_untouched_tree_serializes_byte_identical() {
        let source = "const url = 'a/b.png';\nconsole.log(url);\n";
        let tree = SyntaxTree::parse(source).unwrap();
        let out = tree.transform(&mut |_| Visit::Keep).unwrap();
        assert_eq!(out.serialize(), source);
    }

    #[test]
    fn test_replace_string_literal() {
        let source = r#"load("a/b.png");"#;
        let tree = SyntaxTree::parse(source).unwrap();

        let out = tree
            .transform(&mut |node| {
                if node.string_value.as_deref() == Some("a/b.png") {
                    Visit::Replace("resolve(\"a/b.hashed.png\")".to_string())
                } else {
                    Visit::Keep
                }
            })
            .unwrap();

        assert_eq!(out.serialize(), r#"load(resolve("a/b.hashed.png"));"#);
    }

    #[test]
    fn test_replacement_children_not_revisited_in_same_pass() {
        let source = r#"f("x");"#;
        let tree = SyntaxTree::parse(source).unwrap();

        let mut visits = 0;
        let out = tree
            .transform(&mut |node| {
                if node.string_value.is_some() {
                    visits += 1;
                    Visit::Replace("g(\"x\")".to_string())
                } else {
                    Visit::Keep
                }
            })
            .unwrap();

        // the "x" inside the replacement is not visited again
        assert_eq!(visits, 1);
        assert_eq!(out.serialize(), r#"f(g("x"));"#);
    }

    #[test]
    fn test_bad_replacement_fails() {
        let tree = SyntaxTree::parse(r#"f("x");"#).unwrap();
        let err = tree
            .transform(&mut |node| {
                if node.string_value.is_some() {
                    Visit::Replace("not (((valid".to_string())
                } else {
                    Visit::Keep
                }
            })
            .unwrap_err();
        assert!(matches!(err, ParseError::BadReplacement(_)));
    }

    #[test]
    fn test_debug_shows_source() {
        let tree = SyntaxTree::parse("var x = 1;").unwrap();
        assert!(format!("{:?}", tree).contains("var x = 1;"));
    }

    #[test]
    fn test_parse_expression() {
        assert!(parse_expression("_ADAPT_RT_.adaptStaticURL(\"a/b.png\")").is_ok());
        assert!(parse_expression("").is_err());
        assert!(parse_expression("const x = 1; const y = 2;").is_err());
    }
}
