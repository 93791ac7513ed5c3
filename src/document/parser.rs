//! Builds the document model from YAML text.

use super::{Document, Provenance};
use crate::error::ParseError;
use crate::value::{Mapping, Node};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

/// Parses every `---` separated document in `bytes`.
///
/// Mapping key order and sequence order are kept as written. Quoted and
/// block scalars stay strings; plain scalars resolve to int, float, bool,
/// null or timestamp by the YAML core schema.
pub fn parse_documents(location: &str, bytes: &[u8]) -> Result<Vec<Document>, ParseError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| ParseError::new(location, e.to_string()))?;
    let mut builder = TreeBuilder::default();
    Parser::new(text.chars())
        .load(&mut builder, true)
        .map_err(|e| ParseError::from_scan(location, &e))?;

    let documents: Vec<Document> = builder
        .documents
        .into_iter()
        .enumerate()
        .map(|(index, root)| Document::new(root, Provenance::new(location, index)))
        .collect();
    tracing::debug!(location, documents = documents.len(), "parsed input");
    Ok(documents)
}

/// Parses documents from a string.
pub fn parse_str(location: &str, text: &str) -> Result<Vec<Document>, ParseError> {
    parse_documents(location, text.as_bytes())
}

enum Frame {
    Sequence {
        anchor: usize,
        items: Vec<Node>,
    },
    Mapping {
        anchor: usize,
        entries: Mapping,
        key: Option<String>,
    },
}

/// Assembles nodes from parser events, one root per document.
#[derive(Default)]
struct TreeBuilder {
    documents: Vec<Node>,
    stack: Vec<Frame>,
    anchors: HashMap<usize, Node>,
}

impl TreeBuilder {
    fn finish(&mut self, node: Node, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            None => self.documents.push(node),
            Some(Frame::Sequence { items, .. }) => items.push(node),
            Some(Frame::Mapping { entries, key, .. }) => match key.take() {
                Some(k) => {
                    entries.set(k, node);
                }
                None => *key = Some(key_text(&node)),
            },
        }
    }
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event) {
        match event {
            Event::Scalar(value, style, anchor, tag) => {
                let forced_string = tag
                    .as_ref()
                    .is_some_and(|t| t.suffix == "str" && t.handle != "!");
                let node = if forced_string || !matches!(style, TScalarStyle::Plain) {
                    Node::string(value)
                } else {
                    Node::from_plain(&value)
                };
                self.finish(node, anchor);
            }
            Event::SequenceStart(anchor, ..) => self.stack.push(Frame::Sequence {
                anchor,
                items: Vec::new(),
            }),
            Event::MappingStart(anchor, ..) => self.stack.push(Frame::Mapping {
                anchor,
                entries: Mapping::new(),
                key: None,
            }),
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence { anchor, items }) => self.finish(Node::Sequence(items), anchor),
                Some(Frame::Mapping { anchor, entries, .. }) => {
                    self.finish(Node::Mapping(entries), anchor)
                }
                None => {}
            },
            Event::Alias(id) => {
                let node = self.anchors.get(&id).cloned().unwrap_or_default();
                self.finish(node, 0);
            }
            _ => {}
        }
    }
}

/// Renders a mapping key as text. Non-scalar keys use their JSON form.
fn key_text(key: &Node) -> String {
    match key {
        Node::Scalar(scalar) => scalar.raw().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Scalar, ScalarKind};
    use pretty_assertions::assert_eq;

    fn keys(node: &Node) -> Vec<String> {
        node.as_mapping().unwrap().keys().cloned().collect()
    }

    #[test]
    fn test_key_order_is_preserved() {
        let orders = [
            vec!["zeta", "alpha", "mid", "beta"],
            vec!["beta", "mid", "zeta", "alpha"],
            vec!["alpha", "beta", "mid", "zeta"],
        ];
        for order in orders {
            let text: String = order.iter().map(|k| format!("{k}: 1\n")).collect();
            let docs = parse_str("order.yaml", &text).unwrap();
            assert_eq!(keys(docs[0].root()), order);
        }
    }

    #[test]
    fn test_nested_order_is_preserved() {
        let docs = parse_str("nested.yaml", "outer:\n  z: 1\n  a:\n    y: 2\n    b: 3\n").unwrap();
        let outer = docs[0].root().get("outer").unwrap();
        assert_eq!(keys(outer), vec!["z", "a"]);
        assert_eq!(keys(outer.get("a").unwrap()), vec!["y", "b"]);
    }

    #[test]
    fn test_scalar_kinds() {
        let docs = parse_str(
            "kinds.yaml",
            r#"
int: 42
float: 1.5
bool: true
null_value: ~
quoted: "42"
plain: hello
stamp: 2024-01-15T10:30:00Z
"#,
        )
        .unwrap();
        let root = docs[0].root();
        let kind = |key: &str| root.get(key).and_then(Node::as_scalar).map(Scalar::kind);

        assert_eq!(kind("int"), Some(ScalarKind::Int));
        assert_eq!(kind("float"), Some(ScalarKind::Float));
        assert_eq!(kind("bool"), Some(ScalarKind::Bool));
        assert_eq!(kind("quoted"), Some(ScalarKind::String));
        assert_eq!(kind("plain"), Some(ScalarKind::String));
        assert_eq!(kind("stamp"), Some(ScalarKind::Timestamp));
        assert!(root.get("null_value").unwrap().is_null());
        assert_eq!(root.get("quoted").and_then(Node::as_str), Some("42"));
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        let docs = parse_str(
            "quoted.yaml",
            "q: \"2024-01-15\"\np: 2024-01-15\ns: '42'\nn: 42\nt: !!str 7\nb: |\n  true\n",
        )
        .unwrap();
        let root = docs[0].root();
        let kind = |key: &str| root.get(key).and_then(Node::as_scalar).map(Scalar::kind);

        assert_eq!(kind("q"), Some(ScalarKind::String));
        assert_eq!(kind("p"), Some(ScalarKind::Timestamp));
        assert_eq!(kind("s"), Some(ScalarKind::String));
        assert_eq!(kind("n"), Some(ScalarKind::Int));
        assert_eq!(kind("t"), Some(ScalarKind::String));
        assert_eq!(kind("b"), Some(ScalarKind::String));
        assert_ne!(root.get("q"), root.get("p"));
    }

    #[test]
    fn test_empty_documents_are_null() {
        assert!(parse_str("empty.yaml", "").unwrap().is_empty());
        let docs = parse_str("gap.yaml", "a: 1\n---\n# nothing rendered\n---\nb: 2\n").unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[1].root().is_null());
        assert_eq!(docs[2].provenance().index, 2);
    }

    #[test]
    fn test_aliases_copy_anchored_values() {
        let docs = parse_str("alias.yaml", "base: &b {x: 1}\ncopy: *b\n").unwrap();
        let root = docs[0].root();
        assert_eq!(root.get("copy"), root.get("base"));
        assert_eq!(root.get_in(&["copy", "x"]).and_then(Node::as_str), Some("1"));
    }

    #[test]
    fn test_multiple_documents() {
        let docs = parse_str("multi.yaml", "a: 1\n---\nb: 2\n---\n- x\n").unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[1].provenance().index, 1);
        assert_eq!(docs[1].provenance().location, "multi.yaml");
        assert!(docs[2].root().is_sequence());
    }

    #[test]
    fn test_tags_are_dropped() {
        let docs = parse_str("tag.yaml", "value: !custom 12\n").unwrap();
        assert_eq!(docs[0].root().get("value").and_then(Node::as_str), Some("12"));
    }

    #[test]
    fn test_parse_error_position() {
        let err = parse_str("broken.yaml", "a: 1\nb: [1, 2\n").unwrap_err();
        assert_eq!(err.location, "broken.yaml");
        assert!(err.line.is_some());
        assert!(err.column.is_some());
        assert!(!err.message.is_empty());
    }
}
