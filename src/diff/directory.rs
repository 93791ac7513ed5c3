//! Comparing two directory trees of YAML files.

use super::options::DiffOptions;
use super::report::{compare, Report};
use crate::document::{load_documents, Document, Loader};
use crate::error::{Error, Result};
use crate::filter::Filter;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path as FsPath, PathBuf};
use walkdir::WalkDir;

/// FileComparison is the outcome for one relative path.
#[derive(Debug)]
pub struct FileComparison {
    /// Path relative to both roots.
    pub relative_path: PathBuf,
    pub outcome: FileOutcome,
}

/// FileOutcome tells whether a file pair was compared.
#[derive(Debug)]
pub enum FileOutcome {
    /// A file present on only one side compares against no documents.
    Compared(Report),
    /// One side failed to parse; the other pairs were still compared.
    Skipped(Error),
}

impl FileComparison {
    pub fn report(&self) -> Option<&Report> {
        match &self.outcome {
            FileOutcome::Compared(report) => Some(report),
            FileOutcome::Skipped(_) => None,
        }
    }

    pub fn has_differences(&self) -> bool {
        self.report().is_some_and(Report::has_differences)
    }
}

/// Compares every `.yaml`/`.yml` file under `from_root` with the file at
/// the same relative path under `to_root`.
///
/// File pairs are compared in parallel; results come back ordered by
/// relative path. Files that fail to parse are skipped with a warning,
/// any other error aborts the whole comparison.
pub fn compare_directories(
    loader: &dyn Loader,
    from_root: &FsPath,
    to_root: &FsPath,
    options: &DiffOptions,
) -> Result<Vec<FileComparison>> {
    Filter::compile(options)?;

    let mut pairs: BTreeMap<PathBuf, (bool, bool)> = BTreeMap::new();
    for relative in discover(from_root)? {
        pairs.entry(relative).or_default().0 = true;
    }
    for relative in discover(to_root)? {
        pairs.entry(relative).or_default().1 = true;
    }
    tracing::debug!(
        files = pairs.len(),
        from = %from_root.display(),
        to = %to_root.display(),
        "comparing directories"
    );

    let pairs: Vec<(PathBuf, (bool, bool))> = pairs.into_iter().collect();
    pairs
        .into_par_iter()
        .map(|(relative, (in_from, in_to))| {
            let from = side(loader, from_root, &relative, in_from);
            let to = side(loader, to_root, &relative, in_to);
            let outcome = match (from, to) {
                (Ok(from), Ok(to)) => FileOutcome::Compared(compare(from, to, options)?),
                (Err(err @ Error::Parse(_)), _) | (_, Err(err @ Error::Parse(_))) => {
                    tracing::warn!(file = %relative.display(), error = %err, "skipping file that failed to parse");
                    FileOutcome::Skipped(err)
                }
                (Err(err), _) | (_, Err(err)) => return Err(err),
            };
            Ok(FileComparison {
                relative_path: relative,
                outcome,
            })
        })
        .collect()
}

fn side(loader: &dyn Loader, root: &FsPath, relative: &FsPath, present: bool) -> Result<Vec<Document>> {
    if !present {
        return Ok(Vec::new());
    }
    load_documents(loader, &root.join(relative).to_string_lossy())
}

/// Lists YAML files below `root`, relative to it.
fn discover(root: &FsPath) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| Error::load(root.display().to_string(), e.into()))?;
        if !entry.file_type().is_file() || !is_yaml(entry.path()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

fn is_yaml(path: &FsPath) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}
