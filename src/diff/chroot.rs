//! Narrowing documents to a sub-tree before comparing.

use crate::document::{Document, Provenance};
use crate::error::{Error, Result};
use crate::fieldpath::PathSpec;
use crate::value::Node;

/// Replaces each document by the node at `chroot`.
///
/// With `list_to_documents` the node must be a sequence, and each of its
/// items becomes a document of its own. Every document must contain the
/// path; the first one that does not fails the whole call.
pub fn apply_chroot(
    docs: Vec<Document>,
    chroot: Option<&str>,
    list_to_documents: bool,
) -> Result<Vec<Document>> {
    if chroot.is_none() && !list_to_documents {
        return Ok(docs);
    }
    let spec = PathSpec::parse(chroot.unwrap_or_default())?;

    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        let node = spec
            .navigate(doc.root())
            .ok_or_else(|| Error::path_not_found(spec.source(), doc.provenance().to_string()))?;

        if !list_to_documents {
            out.push(Document::new(node.clone(), doc.provenance().clone()));
            continue;
        }
        let Node::Sequence(items) = node else {
            return Err(Error::ChrootNotSequence {
                path: spec.source().to_string(),
                location: doc.provenance().to_string(),
            });
        };
        out.extend(items.iter().enumerate().map(|(i, item)| {
            Document::new(item.clone(), Provenance::new(doc.location(), i))
        }));
    }

    tracing::debug!(chroot = spec.source(), documents = out.len(), "applied chroot");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;

    const INPUT: &str = "spec:\n  items:\n    - name: a\n    - name: b\n  mode: fast\n";

    #[test]
    fn test_no_chroot_is_identity() {
        let docs = parse_str("in.yaml", INPUT).unwrap();
        assert_eq!(apply_chroot(docs.clone(), None, false).unwrap(), docs);
    }

    #[test]
    fn test_chroot_to_subtree() {
        let docs = parse_str("in.yaml", INPUT).unwrap();
        let rooted = apply_chroot(docs, Some("spec.mode"), false).unwrap();
        assert_eq!(rooted.len(), 1);
        assert_eq!(rooted[0].root().as_str(), Some("fast"));
        assert_eq!(rooted[0].location(), "in.yaml");
    }

    #[test]
    fn test_list_to_documents() {
        let docs = parse_str("in.yaml", INPUT).unwrap();
        let rooted = apply_chroot(docs, Some("/spec/items"), true).unwrap();
        assert_eq!(rooted.len(), 2);
        assert_eq!(rooted[1].root().get("name").and_then(Node::as_str), Some("b"));
        assert_eq!(rooted[1].provenance().index, 1);
    }

    #[test]
    fn test_missing_path() {
        let docs = parse_str("in.yaml", INPUT).unwrap();
        let err = apply_chroot(docs, Some("spec.nope"), false).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { ref path, .. } if path == "spec.nope"));
    }

    #[test]
    fn test_list_to_documents_needs_a_list() {
        let docs = parse_str("in.yaml", INPUT).unwrap();
        let err = apply_chroot(docs, Some("spec.mode"), true).unwrap_err();
        assert!(matches!(err, Error::ChrootNotSequence { .. }));
    }
}
