//! Structural similarity between two nodes.

use crate::fieldpath::PathElement;
use crate::value::Node;
use std::collections::HashMap;

/// Flattens a node into `(path elements, leaf)` pairs.
///
/// Empty containers count as leaves so that `{}` and `[]` still contribute.
pub fn leaves(node: &Node) -> HashMap<Vec<PathElement>, &Node> {
    let mut out = HashMap::new();
    collect(node, &mut Vec::new(), &mut out);
    out
}

fn collect<'a>(
    node: &'a Node,
    prefix: &mut Vec<PathElement>,
    out: &mut HashMap<Vec<PathElement>, &'a Node>,
) {
    match node {
        Node::Mapping(map) if !map.is_empty() => {
            for (key, value) in map {
                prefix.push(PathElement::field(key.as_str()));
                collect(value, prefix, out);
                prefix.pop();
            }
        }
        Node::Sequence(items) if !items.is_empty() => {
            for (i, item) in items.iter().enumerate() {
                prefix.push(PathElement::index(i));
                collect(item, prefix, out);
                prefix.pop();
            }
        }
        _ => {
            out.insert(prefix.clone(), node);
        }
    }
}

fn is_field_chain(path: &[PathElement], fields: &[&str]) -> bool {
    path.len() == fields.len()
        && path
            .iter()
            .zip(fields)
            .all(|(element, field)| element.as_field() == Some(*field))
}

/// Scores how alike two nodes are, from 0.0 (nothing shared) to 1.0.
///
/// The score is the Dice coefficient over leaf `(path, value)` pairs:
/// twice the number of leaves present with equal values on both sides,
/// divided by the total leaf count. Leaves at one of the `ignored` field
/// chains (e.g. `["metadata", "name"]`) are left out on both sides. The
/// function is symmetric.
pub fn similarity(a: &Node, b: &Node, ignored: &[&[&str]]) -> f64 {
    let mut left = leaves(a);
    let mut right = leaves(b);
    let kept = |path: &Vec<PathElement>, _: &mut &Node| {
        !ignored.iter().any(|fields| is_field_chain(path, fields))
    };
    left.retain(kept);
    right.retain(kept);

    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }
    let shared = left
        .iter()
        .filter(|&(path, value)| right.get(path) == Some(value))
        .count();
    (2 * shared) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;

    fn node(text: &str) -> Node {
        parse_str("test", text).unwrap()[0].root().clone()
    }

    fn fields(names: &[&str]) -> Vec<PathElement> {
        names.iter().map(|n| PathElement::field(*n)).collect()
    }

    #[test]
    fn test_leaves() {
        let n = node("a: 1\nb:\n  c: [x, y]\n  d: {}\n");
        let flat = leaves(&n);
        assert_eq!(flat.len(), 4);
        assert!(flat.contains_key(&fields(&["a"])));
        let mut item = fields(&["b", "c"]);
        item.push(PathElement::index(1));
        assert!(flat.contains_key(&item));
        assert!(flat.contains_key(&fields(&["b", "d"])));
    }

    #[test]
    fn test_dotted_keys_are_not_nested_paths() {
        let dotted = node("a.b: 1\n");
        let nested = node("a:\n  b: 1\n");
        assert_eq!(similarity(&dotted, &nested, &[]), 0.0);

        let secret = node("data:\n  tls.crt: x\n");
        assert_eq!(similarity(&secret, &secret, &[&["data", "tls"]]), 1.0);
        assert_eq!(leaves(&secret).len(), 1);
    }

    #[test]
    fn test_similarity_bounds() {
        let a = node("a: 1\nb: 2\n");
        assert_eq!(similarity(&a, &a, &[]), 1.0);
        assert_eq!(similarity(&a, &node("c: 3\n"), &[]), 0.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = node("a: 1\nb: 2\nc: 3\n");
        let b = node("a: 1\nb: 5\n");
        let ab = similarity(&a, &b, &[]);
        assert_eq!(ab, similarity(&b, &a, &[]));
        // one shared leaf out of 5
        assert!((ab - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_ignores_paths() {
        let a = node("metadata:\n  name: web-v1\nspec: 1\n");
        let b = node("metadata:\n  name: web-v2\nspec: 1\n");
        assert_eq!(similarity(&a, &b, &[&["metadata", "name"]]), 1.0);
        assert_eq!(similarity(&a, &b, &[]), 0.5);
    }
}
