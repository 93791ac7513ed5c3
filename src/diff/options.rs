//! Comparison settings.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path as FsPath;

/// DiffOptions controls every aspect of a comparison.
///
/// It deserializes from YAML with kebab-case keys; absent keys take their
/// defaults, so a config file only needs the settings it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DiffOptions {
    /// Compare sequences as multisets.
    pub ignore_order_changes: bool,
    /// Trim and collapse whitespace in strings before comparing.
    pub ignore_whitespace_changes: bool,
    /// Drop leaf value modifications, keeping structural changes.
    pub ignore_value_changes: bool,
    /// Match Kubernetes resources by identity instead of position.
    pub detect_kubernetes: bool,
    /// Pair removed and added resources that look like renames.
    pub detect_renames: bool,
    /// Leave `apiVersion` out of resource identity.
    #[serde(alias = "ignore-apiversion")]
    pub ignore_api_version: bool,
    /// Compare certificates as opaque strings.
    pub no_cert_inspection: bool,
    /// Fields that identify items of a list of mappings, e.g. `name`.
    #[serde(alias = "additional-identifier")]
    pub additional_identifiers: Vec<String>,
    #[serde(alias = "filter")]
    pub filter_paths: Vec<String>,
    #[serde(alias = "exclude")]
    pub exclude_paths: Vec<String>,
    #[serde(alias = "filter-regexp")]
    pub filter_regexps: Vec<String>,
    #[serde(alias = "exclude-regexp")]
    pub exclude_regexps: Vec<String>,
    /// Compare only the sub-tree at this path, on both sides.
    pub chroot: Option<String>,
    pub chroot_of_from: Option<String>,
    pub chroot_of_to: Option<String>,
    /// Treat the items of a chrooted list as separate documents.
    pub chroot_list_to_documents: bool,
    /// Relative change up to which a numeric modification counts as minor.
    pub minor_change_threshold: f64,
    /// Minimum similarity for two differently named resources to be a rename.
    pub rename_similarity_threshold: f64,
    /// Render paths in go-patch notation. Output only, never filtering.
    pub use_go_patch_style: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            ignore_order_changes: false,
            ignore_whitespace_changes: false,
            ignore_value_changes: false,
            detect_kubernetes: true,
            detect_renames: true,
            ignore_api_version: false,
            no_cert_inspection: false,
            additional_identifiers: Vec::new(),
            filter_paths: Vec::new(),
            exclude_paths: Vec::new(),
            filter_regexps: Vec::new(),
            exclude_regexps: Vec::new(),
            chroot: None,
            chroot_of_from: None,
            chroot_of_to: None,
            chroot_list_to_documents: false,
            minor_change_threshold: 0.1,
            rename_similarity_threshold: 0.8,
            use_go_patch_style: false,
        }
    }
}

impl DiffOptions {
    /// Parses options from YAML text.
    pub fn from_yaml(text: &str) -> Result<DiffOptions> {
        if text.trim().is_empty() {
            return Ok(DiffOptions::default());
        }
        let options: DiffOptions =
            serde_yaml::from_str(text).map_err(|e| Error::config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a YAML config file.
    pub fn load(path: &FsPath) -> Result<DiffOptions> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::load(path.display().to_string(), e))?;
        DiffOptions::from_yaml(&text)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Checks the numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.minor_change_threshold.is_nan() || self.minor_change_threshold < 0.0 {
            return Err(Error::config(format!(
                "minor-change-threshold must be a non-negative number, got {}",
                self.minor_change_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.rename_similarity_threshold) {
            return Err(Error::config(format!(
                "rename-similarity-threshold must be between 0 and 1, got {}",
                self.rename_similarity_threshold
            )));
        }
        Ok(())
    }

    /// Chroot applied to the from side, if any.
    pub fn from_chroot(&self) -> Option<&str> {
        self.chroot_of_from.as_deref().or(self.chroot.as_deref())
    }

    /// Chroot applied to the to side, if any.
    pub fn to_chroot(&self) -> Option<&str> {
        self.chroot_of_to.as_deref().or(self.chroot.as_deref())
    }
}
