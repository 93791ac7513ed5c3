//! # Structured YAML Diff
//!
//! Semantic comparison of YAML documents.
//!
//! Two inputs are parsed into order-preserving trees and compared
//! structurally: reordered mapping keys are not differences, sequences can
//! be compared by position, by an identifier field or as multisets, and
//! Kubernetes resources are matched by identity, including renames.
//!
//! ## Modules
//!
//! - [`value`] - Order-preserving document tree (`Node`, `OrderedMap`)
//! - [`document`] - YAML parsing and the input loader port
//! - [`fieldpath`] - Paths produced by the diff and path strings given by users
//! - [`diff`] - The diff engine, chroot, reports and directory comparison
//! - [`kubernetes`] - Resource identity, matching and rename detection
//! - [`certificate`] - Field-level comparison of embedded X.509 certificates
//! - [`filter`] - Include/exclude rules applied to a change list
//!
//! ## Example
//!
//! ```
//! use structured_yaml_diff::{compare, parse_str, DiffOptions};
//!
//! let from = parse_str("from.yaml", "spec:\n  replicas: 1\n").unwrap();
//! let to = parse_str("to.yaml", "spec:\n  replicas: 3\n").unwrap();
//! let report = compare(from, to, &DiffOptions::default()).unwrap();
//! assert_eq!(report.to_string(), "~ spec.replicas 1 → 3\n");
//! ```

pub mod certificate;
pub mod diff;
pub mod document;
pub mod error;
pub mod fieldpath;
pub mod filter;
pub mod kubernetes;
pub mod value;

pub use diff::{
    compare, compare_directories, compare_locations, summarize_report, ChangeEntry, ChangeKind,
    DiffOptions, Differ, FileComparison, FileOutcome, Report, Summarizer,
};
pub use document::{load_documents, parse_documents, parse_str, Document, FileLoader, Loader};
pub use error::{Error, ParseError, Result};
pub use fieldpath::{Path, PathElement, PathSpec};
pub use filter::Filter;
pub use kubernetes::ResourceKey;
pub use value::{Mapping, Node, OrderedMap, Scalar, ScalarKind};
