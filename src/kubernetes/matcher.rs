//! Pairing Kubernetes resources between two document lists.

use super::resource_key::{is_kubernetes_resource, name_field, NameField, ResourceKey};
use crate::diff::{similarity, ChangeEntry, Differ};
use crate::document::Document;
use crate::fieldpath::{Path, PathElement};
use crate::value::Node;
use std::collections::{HashMap, VecDeque};

/// Leaves skipped when scoring a rename; they are expected to differ.
const NAME_LEAVES: [&[&str]; 2] = [&["metadata", "name"], &["metadata", "generateName"]];

/// Returns true if the lists hold at least one resource and every other
/// document is empty.
///
/// Empty documents are what templating tools leave behind when a template
/// renders nothing; they do not count against resource matching.
pub fn applies(from: &[Document], to: &[Document]) -> bool {
    let mut contents = from.iter().chain(to).map(Document::root).filter(|root| !root.is_null());
    let Some(first) = contents.next() else {
        return false;
    };
    is_kubernetes_resource(first) && contents.all(is_kubernetes_resource)
}

/// Compares two lists of Kubernetes resources by identity.
///
/// Resources with equal keys are compared field by field. Among the rest,
/// pairs with the same kind whose similarity reaches the rename threshold
/// are reported as renames; everything else is added or removed. Empty
/// documents are skipped on both sides.
pub fn compare_resources(differ: &Differ<'_>, from: &[Document], to: &[Document]) -> Vec<ChangeEntry> {
    let options = differ.options();
    let from_keys = resource_keys(from, options.ignore_api_version);
    let to_keys = resource_keys(to, options.ignore_api_version);

    let mut to_by_key: HashMap<&ResourceKey, VecDeque<usize>> = HashMap::new();
    for (ti, key) in to_keys.iter().enumerate() {
        if let Some(key) = key {
            to_by_key.entry(key).or_default().push_back(ti);
        }
    }

    let mut from_match: Vec<Option<usize>> = vec![None; from.len()];
    let mut to_matched = vec![false; to.len()];
    for (fi, key) in from_keys.iter().enumerate() {
        let Some(key) = key else { continue };
        if let Some(ti) = to_by_key.get_mut(key).and_then(VecDeque::pop_front) {
            from_match[fi] = Some(ti);
            to_matched[ti] = true;
        }
    }

    let renames = if options.detect_renames {
        detect_renames(
            from,
            to,
            (from_keys.as_slice(), to_keys.as_slice()),
            (from_match.as_slice(), to_matched.as_slice()),
            options.rename_similarity_threshold,
        )
    } else {
        HashMap::new()
    };

    let mut out = Vec::new();
    for (fi, doc) in from.iter().enumerate() {
        if doc.root().is_null() {
            continue;
        }
        let base = resource_path(fi, from_keys[fi].as_ref());
        if let Some(ti) = from_match[fi] {
            out.extend(field_changes(differ, doc, &to[ti], &base));
        } else if let Some(&ti) = renames.get(&fi) {
            out.push(rename_entry(differ, &base, doc, &to[ti], &from_keys[fi], &to_keys[ti]));
        } else {
            out.push(ChangeEntry::removed(base, doc.root().clone()));
        }
    }

    let renamed_to: Vec<usize> = renames.values().copied().collect();
    for (ti, doc) in to.iter().enumerate() {
        if !to_matched[ti] && !renamed_to.contains(&ti) && !doc.root().is_null() {
            out.push(ChangeEntry::added(
                resource_path(ti, to_keys[ti].as_ref()),
                doc.root().clone(),
            ));
        }
    }
    out
}

fn resource_keys(docs: &[Document], ignore_api_version: bool) -> Vec<Option<ResourceKey>> {
    docs.iter()
        .map(|doc| ResourceKey::from_node(doc.root(), ignore_api_version))
        .collect()
}

fn resource_path(document: usize, key: Option<&ResourceKey>) -> Path {
    let path = Path::document(document);
    match key {
        Some(key) => path.with_resource(key.clone()),
        None => path,
    }
}

/// Pairs leftover resources greedily by descending similarity. Ties go to
/// the earlier from document, then the earlier to document.
fn detect_renames(
    from: &[Document],
    to: &[Document],
    (from_keys, to_keys): (&[Option<ResourceKey>], &[Option<ResourceKey>]),
    (from_match, to_matched): (&[Option<usize>], &[bool]),
    threshold: f64,
) -> HashMap<usize, usize> {
    let mut candidates = Vec::new();
    for (fi, from_key) in from_keys.iter().enumerate() {
        let (None, Some(from_key)) = (from_match[fi], from_key) else {
            continue;
        };
        for (ti, to_key) in to_keys.iter().enumerate() {
            let Some(to_key) = to_key else { continue };
            if to_matched[ti] || !from_key.is_rename_candidate(to_key) {
                continue;
            }
            let score = similarity(from[fi].root(), to[ti].root(), &NAME_LEAVES);
            tracing::debug!(from = %from_key, to = %to_key, score, "scored rename candidate");
            if score >= threshold {
                candidates.push((score, fi, ti));
            }
        }
    }
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut pairs = HashMap::new();
    let mut taken = vec![false; to.len()];
    for (score, fi, ti) in candidates {
        if pairs.contains_key(&fi) || taken[ti] {
            continue;
        }
        tracing::debug!(from = fi, to = ti, score, "detected resource rename");
        pairs.insert(fi, ti);
        taken[ti] = true;
    }
    pairs
}

fn rename_entry(
    differ: &Differ<'_>,
    base: &Path,
    from: &Document,
    to: &Document,
    from_key: &Option<ResourceKey>,
    to_key: &Option<ResourceKey>,
) -> ChangeEntry {
    let field = name_field(from.root()).unwrap_or(NameField::Name);
    let name_path = base.with_field("metadata").with_field(field.as_str());
    let old_name = name_of(from.root());
    let new_name = name_of(to.root());

    let changes = field_changes(differ, from, to, base)
        .into_iter()
        .filter(|change| !is_top_level(&change.path, &["name", "generateName"], true))
        .collect();

    // detect_renames only pairs documents that have keys
    let from_key = from_key.clone().unwrap_or_default();
    let to_key = to_key.clone().unwrap_or_default();
    ChangeEntry::renamed(name_path, from_key, to_key, old_name, new_name, changes)
}

fn name_of(node: &Node) -> Node {
    name_field(node)
        .and_then(|field| node.get_in(&["metadata", field.as_str()]))
        .cloned()
        .unwrap_or_default()
}

/// Diffs two matched resources. The `apiVersion` field is skipped when
/// API versions are not part of resource identity.
fn field_changes(differ: &Differ<'_>, from: &Document, to: &Document, base: &Path) -> Vec<ChangeEntry> {
    let mut changes = differ.compare_nodes(from.root(), to.root(), base);
    if differ.options().ignore_api_version {
        changes.retain(|change| !is_top_level(&change.path, &["apiVersion"], false));
    }
    changes
}

/// Returns true if `path` is one of `fields`, directly under `metadata`
/// when `in_metadata` is set or at the document root otherwise.
fn is_top_level(path: &Path, fields: &[&str], in_metadata: bool) -> bool {
    match (path.as_slice(), in_metadata) {
        ([PathElement::Field(field)], false) => fields.contains(&field.as_str()),
        ([PathElement::Field(parent), PathElement::Field(field)], true) => {
            parent == "metadata" && fields.contains(&field.as_str())
        }
        _ => false,
    }
}
