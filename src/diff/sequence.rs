//! Sequence comparison: positional, identifier keyed and order-insensitive.

use super::change::ChangeEntry;
use super::engine::Differ;
use super::similarity::similarity;
use crate::fieldpath::Path;
use crate::value::Node;
use std::collections::{HashMap, HashSet};

/// Minimum similarity for two unequal containers of an unordered list to
/// be compared as the same element.
pub const PAIRING_THRESHOLD: f64 = 0.5;

impl Differ<'_> {
    pub(crate) fn compare_sequences(
        &self,
        from: &[Node],
        to: &[Node],
        path: &Path,
        out: &mut Vec<ChangeEntry>,
    ) {
        if let Some(identifier) = self.list_identifier(from, to) {
            self.compare_keyed(identifier, from, to, path, out);
        } else if self.options().ignore_order_changes {
            self.compare_unordered(from, to, path, out);
        } else {
            self.compare_positional(from, to, path, out);
        }
    }

    /// Finds the first configured identifier that every element on both
    /// sides carries as a scalar, unique within its side.
    fn list_identifier(&self, from: &[Node], to: &[Node]) -> Option<&str> {
        if from.is_empty() && to.is_empty() {
            return None;
        }
        self.options()
            .additional_identifiers
            .iter()
            .map(String::as_str)
            .find(|identifier| {
                identifier_values(from, identifier).is_some()
                    && identifier_values(to, identifier).is_some()
            })
    }

    fn compare_positional(&self, from: &[Node], to: &[Node], path: &Path, out: &mut Vec<ChangeEntry>) {
        let common = from.len().min(to.len());
        for i in 0..common {
            self.diff_into(&from[i], &to[i], &path.with_index(i), out);
        }
        for (i, item) in from.iter().enumerate().skip(common) {
            out.push(ChangeEntry::removed(path.with_index(i), item.clone()));
        }
        for (i, item) in to.iter().enumerate().skip(common) {
            out.push(ChangeEntry::added(path.with_index(i), item.clone()));
        }
    }

    fn compare_keyed(
        &self,
        identifier: &str,
        from: &[Node],
        to: &[Node],
        path: &Path,
        out: &mut Vec<ChangeEntry>,
    ) {
        // list_identifier already checked both sides
        let from_keys = identifier_values(from, identifier).unwrap_or_default();
        let to_keys = identifier_values(to, identifier).unwrap_or_default();
        let from_index: HashMap<&str, usize> =
            from_keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        let to_index: HashMap<&str, usize> =
            to_keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        let moved = if self.options().ignore_order_changes {
            HashSet::new()
        } else {
            moved_keys(&from_keys, &to_keys, &from_index, &to_index)
        };

        for (fi, key) in from_keys.iter().enumerate() {
            let item_path = path.with_keyed(identifier, *key);
            match to_index.get(key) {
                Some(&ti) => {
                    if moved.contains(key) {
                        out.push(ChangeEntry::moved(item_path.clone(), fi, ti));
                    }
                    self.diff_into(&from[fi], &to[ti], &item_path, out);
                }
                None => out.push(ChangeEntry::removed(item_path, from[fi].clone())),
            }
        }
        for (ti, key) in to_keys.iter().enumerate() {
            if !from_index.contains_key(key) {
                out.push(ChangeEntry::added(path.with_keyed(identifier, *key), to[ti].clone()));
            }
        }
    }

    /// Multiset comparison. Equal elements pair first, then similar
    /// containers; whatever is left over is added or removed. Added items
    /// are addressed after the end of the old list since positions carry no
    /// meaning here.
    fn compare_unordered(&self, from: &[Node], to: &[Node], path: &Path, out: &mut Vec<ChangeEntry>) {
        let mut from_match: Vec<Option<usize>> = vec![None; from.len()];
        let mut to_matched = vec![false; to.len()];

        for (ti, target) in to.iter().enumerate() {
            let found = (0..from.len())
                .find(|&fi| from_match[fi].is_none() && self.nodes_equal(&from[fi], target));
            if let Some(fi) = found {
                from_match[fi] = Some(ti);
                to_matched[ti] = true;
            }
        }

        let mut candidates = Vec::new();
        for (fi, source) in from.iter().enumerate() {
            if from_match[fi].is_some() || source.is_leaf() {
                continue;
            }
            for (ti, target) in to.iter().enumerate() {
                if to_matched[ti] || !same_container(source, target) {
                    continue;
                }
                let score = similarity(source, target, &[]);
                if score >= PAIRING_THRESHOLD {
                    candidates.push((score, fi, ti));
                }
            }
        }
        candidates.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });
        for (_, fi, ti) in candidates {
            if from_match[fi].is_none() && !to_matched[ti] {
                from_match[fi] = Some(ti);
                to_matched[ti] = true;
            }
        }

        for (fi, source) in from.iter().enumerate() {
            match from_match[fi] {
                Some(ti) => self.diff_into(source, &to[ti], &path.with_index(fi), out),
                None => out.push(ChangeEntry::removed(path.with_index(fi), source.clone())),
            }
        }
        let mut next = from.len();
        for (ti, target) in to.iter().enumerate() {
            if !to_matched[ti] {
                out.push(ChangeEntry::added(path.with_index(next), target.clone()));
                next += 1;
            }
        }
    }
}

/// Collects the identifier value of every element, or `None` if some
/// element lacks a scalar value for it or a value repeats.
fn identifier_values<'a>(items: &'a [Node], identifier: &str) -> Option<Vec<&'a str>> {
    let mut seen = HashSet::new();
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        let value = item.as_mapping()?.get(identifier)?.as_scalar()?.raw();
        if !seen.insert(value) {
            return None;
        }
        values.push(value);
    }
    Some(values)
}

fn same_container(a: &Node, b: &Node) -> bool {
    matches!(
        (a, b),
        (Node::Mapping(_), Node::Mapping(_)) | (Node::Sequence(_), Node::Sequence(_))
    )
}

/// Returns the keys present on both sides that changed relative order.
///
/// Items on a longest common ordering stay put; every other shared item
/// is reported as moved.
fn moved_keys<'a>(
    from_keys: &[&'a str],
    to_keys: &[&'a str],
    from_index: &HashMap<&str, usize>,
    to_index: &HashMap<&str, usize>,
) -> HashSet<&'a str> {
    let shared: Vec<&str> = from_keys
        .iter()
        .copied()
        .filter(|key| to_index.contains_key(key))
        .collect();
    let rank: HashMap<&str, usize> = to_keys
        .iter()
        .copied()
        .filter(|key| from_index.contains_key(key))
        .enumerate()
        .map(|(r, key)| (key, r))
        .collect();
    let ranks: Vec<usize> = shared.iter().map(|key| rank[key]).collect();
    let stable = longest_increasing(&ranks);
    shared
        .into_iter()
        .zip(stable)
        .filter(|(_, keep)| !keep)
        .map(|(key, _)| key)
        .collect()
}

/// Marks the members of one longest strictly increasing subsequence.
fn longest_increasing(values: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; values.len()];
    for i in 0..values.len() {
        let pos = tails.partition_point(|&t| values[t] < values[i]);
        if pos > 0 {
            previous[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }
    let mut keep = vec![false; values.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        keep[i] = true;
        cursor = previous[i];
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;

    #[test]
    fn test_longest_increasing() {
        assert_eq!(longest_increasing(&[1, 2, 0]), vec![true, true, false]);
        assert_eq!(longest_increasing(&[0, 1, 2]), vec![true, true, true]);
        assert_eq!(longest_increasing(&[]), Vec::<bool>::new());
        assert_eq!(longest_increasing(&[2, 1, 0]).iter().filter(|k| **k).count(), 1);
    }

    #[test]
    fn test_identifier_values() {
        let items = parse_str("test", "[{name: a}, {name: b, port: 80}]").unwrap()[0]
            .root()
            .as_sequence()
            .unwrap()
            .to_vec();
        assert_eq!(identifier_values(&items, "name"), Some(vec!["a", "b"]));
        assert_eq!(identifier_values(&items, "id"), None);

        let duplicated = vec![items[0].clone(), items[0].clone()];
        assert_eq!(identifier_values(&duplicated, "name"), None);
    }
}
