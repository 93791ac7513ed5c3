//! Recursive tree comparison.

use super::change::ChangeEntry;
use super::options::DiffOptions;
use crate::certificate;
use crate::document::Document;
use crate::fieldpath::Path;
use crate::kubernetes;
use crate::value::{Mapping, Node, Scalar};

/// Slack allowed when comparing a relative change against the threshold,
/// so that e.g. 100 → 110 with a 0.1 threshold stays minor.
const MINOR_EPSILON: f64 = 1e-12;

/// Differ compares document trees under one set of options.
///
/// It holds no state besides the options, so one Differ can be shared
/// freely between comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Differ<'a> {
    options: &'a DiffOptions,
}

impl<'a> Differ<'a> {
    pub fn new(options: &'a DiffOptions) -> Self {
        Differ { options }
    }

    pub fn options(&self) -> &'a DiffOptions {
        self.options
    }

    /// Compares two document lists.
    ///
    /// Kubernetes resources are matched by identity when every document on
    /// both sides looks like one; otherwise documents pair up by position.
    pub fn compare_documents(&self, from: &[Document], to: &[Document]) -> Vec<ChangeEntry> {
        if self.options.detect_kubernetes && kubernetes::applies(from, to) {
            tracing::debug!(
                from = from.len(),
                to = to.len(),
                "comparing documents as kubernetes resources"
            );
            return kubernetes::compare_resources(self, from, to);
        }

        let mut out = Vec::new();
        let common = from.len().min(to.len());
        for i in 0..common {
            self.diff_into(from[i].root(), to[i].root(), &Path::document(i), &mut out);
        }
        for (i, doc) in from.iter().enumerate().skip(common) {
            out.push(ChangeEntry::removed(Path::document(i), doc.root().clone()));
        }
        for (i, doc) in to.iter().enumerate().skip(common) {
            out.push(ChangeEntry::added(Path::document(i), doc.root().clone()));
        }
        out
    }

    /// Compares two nodes rooted at `path`.
    pub fn compare_nodes(&self, from: &Node, to: &Node, path: &Path) -> Vec<ChangeEntry> {
        let mut out = Vec::new();
        self.diff_into(from, to, path, &mut out);
        out
    }

    /// Appends the differences between `from` and `to` to `out`.
    pub(crate) fn diff_into(&self, from: &Node, to: &Node, path: &Path, out: &mut Vec<ChangeEntry>) {
        match (from, to) {
            (Node::Null, Node::Null) => {}
            (Node::Scalar(a), Node::Scalar(b)) => self.compare_scalars(a, b, path, out),
            (Node::Mapping(a), Node::Mapping(b)) => self.compare_mappings(a, b, path, out),
            (Node::Sequence(a), Node::Sequence(b)) => self.compare_sequences(a, b, path, out),
            _ => {
                // A change of type is structural unless both sides are leaves.
                if self.options.ignore_value_changes && from.is_leaf() && to.is_leaf() {
                    return;
                }
                out.push(ChangeEntry::modified(path.clone(), from.clone(), to.clone()));
            }
        }
    }

    fn compare_scalars(&self, from: &Scalar, to: &Scalar, path: &Path, out: &mut Vec<ChangeEntry>) {
        if self.scalars_equal(from, to) {
            return;
        }

        if !self.options.no_cert_inspection && from.is_textual() && to.is_textual() {
            if let (Some(old), Some(new)) =
                (certificate::decode(from.raw()), certificate::decode(to.raw()))
            {
                self.diff_into(&old.to_node(), &new.to_node(), &path.with_field("certificate"), out);
                return;
            }
        }

        if self.options.ignore_value_changes {
            return;
        }

        let minor = self.is_minor_change(from, to);
        out.push(
            ChangeEntry::modified(path.clone(), Node::Scalar(from.clone()), Node::Scalar(to.clone()))
                .with_minor(minor),
        );
    }

    fn compare_mappings(&self, from: &Mapping, to: &Mapping, path: &Path, out: &mut Vec<ChangeEntry>) {
        for (key, from_value) in from {
            let child = path.with_field(key.as_str());
            match to.get(key.as_str()) {
                Some(to_value) => self.diff_into(from_value, to_value, &child, out),
                None => out.push(ChangeEntry::removed(child, from_value.clone())),
            }
        }
        for (key, to_value) in to {
            if !from.contains_key(key.as_str()) {
                out.push(ChangeEntry::added(path.with_field(key.as_str()), to_value.clone()));
            }
        }
    }

    /// Scalar equality under the whitespace option.
    pub fn scalars_equal(&self, a: &Scalar, b: &Scalar) -> bool {
        if a.kind() != b.kind() {
            return false;
        }
        if a.raw() == b.raw() {
            return true;
        }
        self.options.ignore_whitespace_changes
            && a.is_textual()
            && normalize_whitespace(a.raw()) == normalize_whitespace(b.raw())
    }

    /// Node equality under the options: whitespace normalisation for
    /// strings and, with `ignore_order_changes`, multiset sequences.
    pub fn nodes_equal(&self, a: &Node, b: &Node) -> bool {
        match (a, b) {
            (Node::Null, Node::Null) => true,
            (Node::Scalar(x), Node::Scalar(y)) => self.scalars_equal(x, y),
            (Node::Mapping(x), Node::Mapping(y)) => {
                x.len() == y.len()
                    && x.iter().all(|(key, value)| {
                        y.get(key.as_str()).is_some_and(|other| self.nodes_equal(value, other))
                    })
            }
            (Node::Sequence(x), Node::Sequence(y)) => {
                if x.len() != y.len() {
                    return false;
                }
                if !self.options.ignore_order_changes {
                    return x.iter().zip(y).all(|(p, q)| self.nodes_equal(p, q));
                }
                let mut used = vec![false; y.len()];
                x.iter().all(|item| {
                    let found = y
                        .iter()
                        .enumerate()
                        .position(|(j, other)| !used[j] && self.nodes_equal(item, other));
                    match found {
                        Some(j) => {
                            used[j] = true;
                            true
                        }
                        None => false,
                    }
                })
            }
            _ => false,
        }
    }

    /// Returns true if a numeric change is within the minor threshold.
    pub fn is_minor_change(&self, from: &Scalar, to: &Scalar) -> bool {
        let (Some(old), Some(new)) = (from.as_f64(), to.as_f64()) else {
            return false;
        };
        if old == 0.0 || !old.is_finite() || !new.is_finite() {
            return false;
        }
        let relative = (new - old).abs() / old.abs();
        relative <= self.options.minor_change_threshold + MINOR_EPSILON
    }
}

/// Trims a string and collapses each run of whitespace to one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
