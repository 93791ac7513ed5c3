//! Change entries produced by a comparison.

use crate::fieldpath::Path;
use crate::kubernetes::ResourceKey;
use crate::value::Node;
use serde::Serialize;
use std::fmt;

/// ChangeKind classifies one difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    /// A list item kept its identity but changed position.
    Moved { from_index: usize, to_index: usize },
    /// A Kubernetes resource whose name changed, with the field changes
    /// found between the old and new object.
    #[serde(rename_all = "camelCase")]
    RenamedResource {
        from: ResourceKey,
        to: ResourceKey,
        changes: Vec<ChangeEntry>,
    },
}

impl ChangeKind {
    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
            ChangeKind::Moved { .. } => "moved",
            ChangeKind::RenamedResource { .. } => "renamed",
        }
    }

    /// Symbol used in listings.
    pub fn symbol(&self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
            ChangeKind::Modified => '~',
            ChangeKind::Moved { .. } => '⇆',
            ChangeKind::RenamedResource { .. } => '→',
        }
    }
}

/// ChangeEntry is one reported difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEntry {
    pub path: Path,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Node>,
    /// Numeric modification within the minor change threshold.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub minor: bool,
}

impl ChangeEntry {
    pub fn added(path: Path, to: Node) -> Self {
        ChangeEntry {
            path,
            kind: ChangeKind::Added,
            from: None,
            to: Some(to),
            minor: false,
        }
    }

    pub fn removed(path: Path, from: Node) -> Self {
        ChangeEntry {
            path,
            kind: ChangeKind::Removed,
            from: Some(from),
            to: None,
            minor: false,
        }
    }

    pub fn modified(path: Path, from: Node, to: Node) -> Self {
        ChangeEntry {
            path,
            kind: ChangeKind::Modified,
            from: Some(from),
            to: Some(to),
            minor: false,
        }
    }

    pub fn moved(path: Path, from_index: usize, to_index: usize) -> Self {
        ChangeEntry {
            path,
            kind: ChangeKind::Moved {
                from_index,
                to_index,
            },
            from: None,
            to: None,
            minor: false,
        }
    }

    pub fn renamed(
        path: Path,
        from: ResourceKey,
        to: ResourceKey,
        old_name: Node,
        new_name: Node,
        changes: Vec<ChangeEntry>,
    ) -> Self {
        ChangeEntry {
            path,
            kind: ChangeKind::RenamedResource { from, to, changes },
            from: Some(old_name),
            to: Some(new_name),
            minor: false,
        }
    }

    /// Marks the entry as a minor change.
    pub fn with_minor(mut self, minor: bool) -> Self {
        self.minor = minor;
        self
    }

    /// Nested changes carried by a rename, empty for every other kind.
    pub fn nested(&self) -> &[ChangeEntry] {
        match &self.kind {
            ChangeKind::RenamedResource { changes, .. } => changes,
            _ => &[],
        }
    }

    /// Text that follows the path in a listing, e.g. ` 1 → 3 (minor)`.
    pub fn detail(&self) -> String {
        match &self.kind {
            ChangeKind::Added => value_text(self.to.as_ref()),
            ChangeKind::Removed => value_text(self.from.as_ref()),
            ChangeKind::Modified => {
                let mut text = format!(
                    "{} →{}",
                    value_text(self.from.as_ref()),
                    value_text(self.to.as_ref())
                );
                if self.minor {
                    text.push_str(" (minor)");
                }
                text
            }
            ChangeKind::Moved {
                from_index,
                to_index,
            } => format!(": position {} → {}", from_index, to_index),
            ChangeKind::RenamedResource { from, to, .. } => format!(": {} → {}", from, to),
        }
    }

    /// Renders the path in the requested notation.
    pub fn render_path(&self, go_patch_style: bool) -> String {
        if go_patch_style {
            self.path.to_go_patch_style()
        } else {
            self.path.to_dot_style()
        }
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.kind.symbol(), self.path, self.detail())?;
        for change in self.nested() {
            write!(f, "\n    {}", change)?;
        }
        Ok(())
    }
}

fn value_text(value: Option<&Node>) -> String {
    value.map(|node| format!(" {}", node)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Node;

    #[test]
    fn test_display() {
        let path = Path::new().with_field("spec").with_field("replicas");
        let entry = ChangeEntry::modified(path.clone(), Node::from_plain("1"), Node::from_plain("3"));
        assert_eq!(entry.to_string(), "~ spec.replicas 1 → 3");

        let entry = entry.with_minor(true);
        assert!(entry.to_string().ends_with("(minor)"));

        let added = ChangeEntry::added(path.clone(), Node::from_plain("2"));
        assert_eq!(added.to_string(), "+ spec.replicas 2");
        assert!(added.nested().is_empty());
    }

    #[test]
    fn test_render_path() {
        let path = Path::new().with_field("spec").with_index(0);
        let entry = ChangeEntry::removed(path, Node::Null);
        assert_eq!(entry.render_path(false), "spec[0]");
        assert_eq!(entry.render_path(true), "/spec/0");
    }

    #[test]
    fn test_json_shape() {
        let entry = ChangeEntry::modified(
            Path::new().with_field("replicas"),
            Node::from_plain("1"),
            Node::from_plain("3"),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["path"], "replicas");
        assert_eq!(json["kind"]["type"], "modified");
        assert_eq!(json["from"], 1);
        assert_eq!(json["to"], 3);
        assert!(json.get("minor").is_none());
    }
}
