//! Filter module - Narrowing a change list by path.
//!
//! Include and exclude rules are written as paths (dotted or go-patch) or
//! as regular expressions. Rules are always matched against the dotted
//! rendering of a change path, regardless of the output style.

use crate::diff::{ChangeEntry, ChangeKind, DiffOptions};
use crate::error::{Error, Result};
use crate::fieldpath::{Path, PathSpec};
use regex::Regex;

/// Filter holds compiled include and exclude rules.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    include_paths: Vec<String>,
    exclude_paths: Vec<String>,
    include_patterns: Vec<Regex>,
    exclude_patterns: Vec<Regex>,
}

impl Filter {
    /// Compiles the filter settings of `options`.
    ///
    /// Fails on the first path that does not parse or regular expression
    /// that does not compile.
    pub fn compile(options: &DiffOptions) -> Result<Filter> {
        Ok(Filter {
            include_paths: normalize_paths(&options.filter_paths)?,
            exclude_paths: normalize_paths(&options.exclude_paths)?,
            include_patterns: compile_patterns(&options.filter_regexps)?,
            exclude_patterns: compile_patterns(&options.exclude_regexps)?,
        })
    }

    /// Returns true if the filter keeps everything.
    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.exclude_paths.is_empty()
            && self.include_patterns.is_empty()
            && self.exclude_patterns.is_empty()
    }

    /// Returns true if a change at `path` survives the filter.
    ///
    /// With no include rules every path is included. A path rule matches
    /// the path itself and everything below it.
    pub fn retains(&self, path: &Path) -> bool {
        let rendered = path.to_dot_style();
        let has_includes = !self.include_paths.is_empty() || !self.include_patterns.is_empty();
        let included = !has_includes
            || self.include_paths.iter().any(|rule| covers(rule, &rendered))
            || self.include_patterns.iter().any(|re| re.is_match(&rendered));
        let excluded = self.exclude_paths.iter().any(|rule| covers(rule, &rendered))
            || self.exclude_patterns.iter().any(|re| re.is_match(&rendered));
        included && !excluded
    }

    /// Drops the changes the filter does not retain.
    ///
    /// A rename whose own path is filtered out is replaced by whichever of
    /// its nested changes survive; a retained rename keeps only its
    /// surviving nested changes. Applying a filter twice gives the same
    /// result as applying it once.
    pub fn apply(&self, entries: Vec<ChangeEntry>) -> Vec<ChangeEntry> {
        if self.is_empty() {
            return entries;
        }
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                ChangeEntry {
                    path,
                    kind: ChangeKind::RenamedResource { from, to, changes },
                    from: old_name,
                    to: new_name,
                    minor,
                } => {
                    let changes = self.apply(changes);
                    if self.retains(&path) {
                        out.push(ChangeEntry {
                            path,
                            kind: ChangeKind::RenamedResource { from, to, changes },
                            from: old_name,
                            to: new_name,
                            minor,
                        });
                    } else {
                        out.extend(changes);
                    }
                }
                entry => {
                    if self.retains(&entry.path) {
                        out.push(entry);
                    }
                }
            }
        }
        out
    }
}

/// Returns true if `rule` names `rendered` or one of its ancestors.
fn covers(rule: &str, rendered: &str) -> bool {
    if rule == "(root)" || rule == rendered {
        return true;
    }
    rendered
        .strip_prefix(rule)
        .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
}

fn normalize_paths(rules: &[String]) -> Result<Vec<String>> {
    rules
        .iter()
        .map(|rule| PathSpec::parse(rule).map(|spec| spec.to_dot_style()))
        .collect()
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| Error::RegexCompile {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}
