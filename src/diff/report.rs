//! Comparison entry point and its result.

use super::chroot::apply_chroot;
use super::change::{ChangeEntry, ChangeKind};
use super::engine::Differ;
use super::options::DiffOptions;
use crate::document::{load_documents, Document, Loader, Provenance};
use crate::error::Result;
use crate::filter::Filter;
use serde::Serialize;
use std::fmt;

/// Report holds the result of comparing two document lists.
///
/// Entries are ordered by the traversal that found them. If there are no
/// entries the inputs are equal under the options used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub entries: Vec<ChangeEntry>,
    /// Documents compared on the from side, after chroot.
    pub from: Vec<Provenance>,
    /// Documents compared on the to side, after chroot.
    pub to: Vec<Provenance>,
}

impl Report {
    /// Returns true if there are no changes.
    pub fn is_same(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_differences(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns true if anything was added.
    pub fn has_added(&self) -> bool {
        self.count(|kind| matches!(kind, ChangeKind::Added)) > 0
    }

    /// Returns true if anything was removed.
    pub fn has_removed(&self) -> bool {
        self.count(|kind| matches!(kind, ChangeKind::Removed)) > 0
    }

    /// Returns true if anything was modified.
    pub fn has_modified(&self) -> bool {
        self.count(|kind| matches!(kind, ChangeKind::Modified)) > 0
    }

    fn count(&self, predicate: impl Fn(&ChangeKind) -> bool) -> usize {
        self.entries.iter().filter(|entry| predicate(&entry.kind)).count()
    }

    /// One-line summary such as `3 differences (1 added, 2 modified)`.
    pub fn brief(&self) -> String {
        if self.entries.is_empty() {
            return "no differences".to_string();
        }
        let mut parts = Vec::new();
        for label in ["added", "removed", "modified", "moved", "renamed"] {
            let n = self.count(|kind| kind.label() == label);
            if n > 0 {
                parts.push(format!("{} {}", n, label));
            }
        }
        let noun = if self.entries.len() == 1 { "difference" } else { "differences" };
        format!("{} {} ({})", self.entries.len(), noun, parts.join(", "))
    }

    /// Renders one entry per line, paths in the requested notation.
    pub fn render(&self, go_patch_style: bool) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            render_entry(&mut out, entry, go_patch_style, "");
        }
        out
    }
}

fn render_entry(out: &mut String, entry: &ChangeEntry, go_patch_style: bool, indent: &str) {
    out.push_str(indent);
    out.push(entry.kind.symbol());
    out.push(' ');
    out.push_str(&entry.render_path(go_patch_style));
    out.push_str(&entry.detail());
    if let Some(resource) = entry.path.resource() {
        out.push_str(&format!("  ({})", resource));
    }
    out.push('\n');
    for nested in entry.nested() {
        render_entry(out, nested, go_patch_style, "    ");
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Compares two document lists.
///
/// Filter rules are compiled and chroots applied before any comparison
/// work, so every fatal error surfaces before a report exists.
pub fn compare(from: Vec<Document>, to: Vec<Document>, options: &DiffOptions) -> Result<Report> {
    let filter = Filter::compile(options)?;
    let from = apply_chroot(from, options.from_chroot(), options.chroot_list_to_documents)?;
    let to = apply_chroot(to, options.to_chroot(), options.chroot_list_to_documents)?;

    let differ = Differ::new(options);
    let entries = filter.apply(differ.compare_documents(&from, &to));
    tracing::debug!(changes = entries.len(), "comparison finished");

    Ok(Report {
        entries,
        from: from.iter().map(|doc| doc.provenance().clone()).collect(),
        to: to.iter().map(|doc| doc.provenance().clone()).collect(),
    })
}

/// Loads both locations through `loader` and compares them.
pub fn compare_locations(
    loader: &dyn Loader,
    from: &str,
    to: &str,
    options: &DiffOptions,
) -> Result<Report> {
    let from_docs = load_documents(loader, from)?;
    let to_docs = load_documents(loader, to)?;
    compare(from_docs, to_docs, options)
}

/// Summarizer turns a report into free text, e.g. through a language
/// model service.
pub trait Summarizer {
    fn summarize(
        &self,
        report: &Report,
    ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Asks `summarizer` for a summary of a report with differences.
///
/// A failing summarizer only produces a warning; the report itself is
/// never affected.
pub fn summarize_report(summarizer: &dyn Summarizer, report: &Report) -> Option<String> {
    if report.is_same() {
        return None;
    }
    match summarizer.summarize(report) {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::warn!(error = %err, "failed to summarize differences");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_str;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn docs(text: &str) -> Vec<Document> {
        parse_str("test.yaml", text).unwrap()
    }

    #[test]
    fn test_report_is_same() {
        let report = compare(docs("a: 1\n"), docs("a: 1\n"), &DiffOptions::default()).unwrap();
        assert!(report.is_same());
        assert_eq!(report.brief(), "no differences");
        assert_eq!(report.from.len(), 1);
    }

    #[test]
    fn test_report_has_changes() {
        let report = compare(
            docs("a: 1\nb: 2\n"),
            docs("a: 5\nc: 3\n"),
            &DiffOptions::default(),
        )
        .unwrap();
        assert!(report.has_differences());
        assert!(report.has_added());
        assert!(report.has_removed());
        assert!(report.has_modified());
        assert_eq!(report.brief(), "3 differences (1 added, 1 removed, 1 modified)");
    }

    #[test]
    fn test_render_styles() {
        let report = compare(
            docs("spec:\n  ports: [80]\n"),
            docs("spec:\n  ports: [8080]\n"),
            &DiffOptions::default(),
        )
        .unwrap();
        assert_eq!(report.render(false), "~ spec.ports[0] 80 → 8080\n");
        assert_eq!(report.render(true), "~ /spec/ports/0 80 → 8080\n");
        assert_eq!(report.to_string(), report.render(false));
    }

    #[test]
    fn test_regex_error_comes_first() {
        let options = DiffOptions {
            exclude_regexps: vec!["[".into()],
            chroot: Some("missing".into()),
            ..DiffOptions::default()
        };
        let err = compare(docs("a: 1\n"), docs("a: 2\n"), &options).unwrap_err();
        assert!(matches!(err, Error::RegexCompile { .. }));
    }

    #[test]
    fn test_extra_documents_are_root_changes() {
        let report = compare(docs("a: 1\n"), docs("a: 1\n---\nb: 2\n"), &DiffOptions::default())
            .unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].kind, ChangeKind::Added);
        assert!(report.entries[0].path.is_root());
        assert_eq!(report.entries[0].path.document_index(), 1);
    }

    struct Inline;

    impl Loader for Inline {
        fn load(&self, location: &str) -> Result<Vec<u8>> {
            Ok(location.replace(';', "\n").into_bytes())
        }
    }

    #[test]
    fn test_compare_locations_uses_loader() {
        let report =
            compare_locations(&Inline, "a: 1;b: 2", "a: 1;b: 3", &DiffOptions::default()).unwrap();
        assert_eq!(report.render(false), "~ b 2 → 3\n");
        assert_eq!(report.from[0].location, "a: 1;b: 2");
    }

    struct Fixed(Option<&'static str>);

    impl Summarizer for Fixed {
        fn summarize(
            &self,
            _report: &Report,
        ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
            self.0.map(str::to_string).ok_or_else(|| "service unavailable".into())
        }
    }

    #[test]
    fn test_summarizer_port() {
        let report = compare(docs("a: 1\n"), docs("a: 2\n"), &DiffOptions::default()).unwrap();
        assert_eq!(
            summarize_report(&Fixed(Some("one value changed")), &report).as_deref(),
            Some("one value changed")
        );
        assert_eq!(summarize_report(&Fixed(None), &report), None);
        assert_eq!(report.entries.len(), 1);

        let same = compare(docs("a: 1\n"), docs("a: 1\n"), &DiffOptions::default()).unwrap();
        assert_eq!(summarize_report(&Fixed(Some("x")), &same), None);
    }
}
