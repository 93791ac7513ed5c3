//! Tests for the sequence comparison modes.

#[cfg(test)]
mod tests {
    use crate::diff::{ChangeEntry, ChangeKind, DiffOptions, Differ};
    use crate::document::parse_str;
    use crate::fieldpath::Path;
    use pretty_assertions::assert_eq;

    fn diff(from: &str, to: &str, options: &DiffOptions) -> Vec<ChangeEntry> {
        let from = parse_str("from.yaml", from).unwrap();
        let to = parse_str("to.yaml", to).unwrap();
        Differ::new(options).compare_nodes(from[0].root(), to[0].root(), &Path::new())
    }

    fn listing(entries: &[ChangeEntry]) -> Vec<String> {
        entries.iter().map(ToString::to_string).collect()
    }

    fn unordered() -> DiffOptions {
        DiffOptions {
            ignore_order_changes: true,
            ..DiffOptions::default()
        }
    }

    fn keyed_by_name() -> DiffOptions {
        DiffOptions {
            additional_identifiers: vec!["name".into()],
            ..DiffOptions::default()
        }
    }

    #[test]
    fn test_rotation_is_positional_by_default() {
        let entries = diff("[a, b, c]", "[c, a, b]", &DiffOptions::default());
        assert_eq!(
            listing(&entries),
            vec!["~ [0] a → c", "~ [1] b → a", "~ [2] c → b"]
        );
    }

    #[test]
    fn test_rotation_is_ignored_when_order_does_not_matter() {
        assert!(diff("[a, b, c]", "[c, a, b]", &unordered()).is_empty());
    }

    #[test]
    fn test_positional_length_changes() {
        let entries = diff("[1, 2, 3]", "[1, 5]", &DiffOptions::default());
        assert_eq!(listing(&entries), vec!["~ [1] 2 → 5", "- [2] 3"]);

        let entries = diff("[1]", "[1, 2, 3]", &DiffOptions::default());
        assert_eq!(listing(&entries), vec!["+ [1] 2", "+ [2] 3"]);
    }

    #[test]
    fn test_unordered_multiset_counts_duplicates() {
        let entries = diff("[x, x, y]", "[y, x]", &unordered());
        assert_eq!(listing(&entries), vec!["- [1] x"]);
    }

    #[test]
    fn test_unordered_pairs_similar_mappings() {
        let entries = diff(
            "- {host: a, port: 80, tls: false}\n- {host: b, port: 81, tls: false}\n",
            "- {host: b, port: 81, tls: false}\n- {host: a, port: 80, tls: true}\n",
            &unordered(),
        );
        assert_eq!(listing(&entries), vec!["~ [0].tls false → true"]);
    }

    #[test]
    fn test_unordered_unmatched_items() {
        let entries = diff("[a, b]", "[b, c, d]", &unordered());
        // additions are addressed past the end of the original list
        assert_eq!(listing(&entries), vec!["- [0] a", "+ [2] c", "+ [3] d"]);
    }

    #[test]
    fn test_keyed_list_addresses_items_by_identifier() {
        let entries = diff(
            "containers:\n  - {name: app, image: app:1}\n  - {name: sidecar, image: proxy:1}\n",
            "containers:\n  - {name: app, image: app:2}\n  - {name: sidecar, image: proxy:1}\n",
            &keyed_by_name(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.to_dot_style(), "containers.app.image");
        assert_eq!(entries[0].path.to_go_patch_style(), "/containers/name=app/image");
    }

    #[test]
    fn test_keyed_list_reports_moves() {
        let from = "- {name: a, v: 1}\n- {name: b, v: 1}\n- {name: c, v: 1}\n";
        let to = "- {name: c, v: 1}\n- {name: a, v: 1}\n- {name: b, v: 2}\n";

        let entries = diff(from, to, &keyed_by_name());
        assert_eq!(listing(&entries), vec!["~ b.v 1 → 2", "⇆ c: position 2 → 0"]);
        assert_eq!(
            entries[1].kind,
            ChangeKind::Moved {
                from_index: 2,
                to_index: 0
            }
        );

        let options = DiffOptions {
            ignore_order_changes: true,
            ..keyed_by_name()
        };
        assert_eq!(listing(&diff(from, to, &options)), vec!["~ b.v 1 → 2"]);
    }

    #[test]
    fn test_keyed_list_added_and_removed_items() {
        let entries = diff(
            "- {name: a}\n- {name: b}\n",
            "- {name: b}\n- {name: z, port: 1}\n",
            &keyed_by_name(),
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, ChangeKind::Removed);
        assert_eq!(entries[0].path.to_dot_style(), "a");
        assert_eq!(entries[1].kind, ChangeKind::Added);
        assert_eq!(entries[1].path.to_go_patch_style(), "/name=z");
    }

    #[test]
    fn test_identifier_must_be_unique_to_apply() {
        let entries = diff(
            "- {name: a, v: 1}\n- {name: a, v: 2}\n",
            "- {name: a, v: 2}\n- {name: a, v: 1}\n",
            &keyed_by_name(),
        );
        // falls back to positional comparison
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path.to_dot_style(), "[0].v");
    }

    #[test]
    fn test_first_qualifying_identifier_wins() {
        let options = DiffOptions {
            additional_identifiers: vec!["id".into(), "name".into()],
            ..DiffOptions::default()
        };
        let entries = diff(
            "- {name: a, v: 1}\n- {name: b, v: 1}\n",
            "- {name: a, v: 1}\n- {name: b, v: 3}\n",
            &options,
        );
        assert_eq!(listing(&entries), vec!["~ b.v 1 → 3"]);
    }
}
