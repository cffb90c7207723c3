//! Browser package option sets
//!
//! A browser package carries the list of command-line options enabled for a
//! browser variant. Several package files can target the same browser and
//! are merged into one option set, keyed by each option's primary alias.

use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One configuration option and its aliases
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserOpt {
    pub option: Vec<String>,
}

impl BrowserOpt {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            option: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// First alias, used as the merge key
    pub fn primary(&self) -> Option<&str> {
        self.option.first().map(String::as_str)
    }

    /// Trim aliases and drop empty or repeated ones, keeping first occurrence order.
    pub fn minimize(&mut self) {
        let mut seen = HashSet::new();
        let aliases = std::mem::take(&mut self.option);

        self.option = aliases
            .into_iter()
            .map(|alias| alias.trim().to_string())
            .filter(|alias| !alias.is_empty() && seen.insert(alias.clone()))
            .collect();
    }
}

/// Error raised by option set operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Trying to merge package {package} with {other}")]
    PackageMismatch { package: String, other: String },
}

/// A browser package and its enabled options
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserPackage {
    pub package: String,

    #[serde(rename = "options", default)]
    pub enabled_options: Vec<BrowserOpt>,
}

impl BrowserPackage {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            enabled_options: Vec::new(),
        }
    }

    /// Load a package definition from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read browser package file {}", path.display()))?;

        let mut pkg: BrowserPackage = serde_json::from_str(&data)
            .with_context(|| format!("Invalid browser package file {}", path.display()))?;

        let opts = std::mem::take(&mut pkg.enabled_options);
        pkg.set_enabled_options(opts);

        debug!("Loaded browser package {} with {} options from {}",
               pkg.package, pkg.enabled_options.len(), path.display());

        Ok(pkg)
    }

    /// Load several package files and merge them, in order, into the first
    pub fn load_merged(paths: &[PathBuf]) -> Result<Self> {
        let Some((first, rest)) = paths.split_first() else {
            bail!("No browser package files given");
        };

        let mut pkg = Self::load(first)?;
        for path in rest {
            let other = Self::load(path)?;
            pkg.merge(&other)
                .with_context(|| format!("Failed to merge {}", path.display()))?;
        }

        Ok(pkg)
    }

    pub fn has_options(&self) -> bool {
        !self.enabled_options.is_empty()
    }

    pub fn clear_options(&mut self) {
        self.enabled_options.clear();
    }

    /// Every alias of every enabled option, in order
    pub fn get_all_options(&self) -> Vec<String> {
        self.enabled_options
            .iter()
            .flat_map(|opt| opt.option.iter().cloned())
            .collect()
    }

    pub fn set_enabled_options(&mut self, opts: Vec<BrowserOpt>) {
        self.enabled_options = opts
            .into_iter()
            .map(|mut opt| {
                opt.minimize();
                opt
            })
            .collect();
    }

    /// Add the options of `other` whose primary alias is not already enabled.
    ///
    /// Only the primary alias is compared: an option already present keeps
    /// its own alias list even if `other` lists different secondary aliases.
    pub fn merge(&mut self, other: &BrowserPackage) -> Result<(), BrowserError> {
        if self.package != other.package {
            return Err(BrowserError::PackageMismatch {
                package: self.package.clone(),
                other: other.package.clone(),
            });
        }

        let present: HashSet<String> = self
            .enabled_options
            .iter()
            .filter_map(|opt| opt.primary().map(str::to_string))
            .collect();

        for opt in &other.enabled_options {
            match opt.primary() {
                Some(key) if !present.contains(key) => {
                    self.enabled_options.push(opt.clone());
                }
                Some(key) => debug!("[{}] Option {} already enabled", self.package, key),
                None => debug!("[{}] Skipping option without aliases", self.package),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str, opts: &[&[&str]]) -> BrowserPackage {
        let mut pkg = BrowserPackage::new(name);
        pkg.enabled_options = opts.iter().map(|aliases| BrowserOpt::new(aliases.iter().copied())).collect();
        pkg
    }

    #[test]
    fn test_has_and_clear_options() {
        let mut pkg = package("www-client/chromium", &[&["--enable-gpu"]]);
        assert!(pkg.has_options());

        pkg.clear_options();
        assert!(!pkg.has_options());
        assert!(pkg.get_all_options().is_empty());
    }

    #[test]
    fn test_get_all_options_flattens_in_order() {
        let pkg = package("www-client/chromium", &[&["a", "a2"], &["b"]]);
        assert_eq!(pkg.get_all_options(), vec!["a", "a2", "b"]);
    }

    #[test]
    fn test_set_enabled_options_minimizes() {
        let mut pkg = package("www-client/chromium", &[&["stale"]]);

        pkg.set_enabled_options(vec![
            BrowserOpt::new([" --ozone-platform=wayland ", "", "--ozone-platform=wayland"]),
            BrowserOpt::new(["--disable-sync"]),
        ]);

        assert_eq!(pkg.enabled_options.len(), 2);
        assert_eq!(pkg.enabled_options[0].option, vec!["--ozone-platform=wayland"]);
        assert_eq!(pkg.get_all_options(), vec!["--ozone-platform=wayland", "--disable-sync"]);
    }

    #[test]
    fn test_merge_disjoint_appends_in_order() {
        let mut pkg = package("www-client/chromium", &[&["a"], &["b"]]);
        let other = package("www-client/chromium", &[&["d"], &["c"]]);

        pkg.merge(&other).unwrap();

        assert_eq!(pkg.enabled_options.len(), 4);
        assert_eq!(pkg.get_all_options(), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_merge_overlapping_keeps_receiver() {
        let mut pkg = package("www-client/chromium", &[&["a", "a2"], &["b"]]);
        let before = pkg.clone();
        let other = package("www-client/chromium", &[&["b", "b-other"], &["a"]]);

        pkg.merge(&other).unwrap();

        assert_eq!(pkg, before);
    }

    #[test]
    fn test_merge_compares_primary_alias_only() {
        let mut pkg = package("www-client/chromium", &[&["x", "y"]]);
        let other = package("www-client/chromium", &[&["y"], &["x", "z"]]);

        pkg.merge(&other).unwrap();

        assert_eq!(pkg.get_all_options(), vec!["x", "y", "y"]);
    }

    #[test]
    fn test_merge_package_mismatch() {
        let mut pkg = package("www-client/chromium", &[&["a"]]);
        let other = package("www-client/firefox", &[&["b"]]);
        let (pkg_before, other_before) = (pkg.clone(), other.clone());

        let err = pkg.merge(&other).unwrap_err();

        assert!(matches!(err, BrowserError::PackageMismatch { .. }));
        assert_eq!(err.to_string(),
                   "Trying to merge package www-client/chromium with www-client/firefox");
        assert_eq!(pkg, pkg_before);
        assert_eq!(other, other_before);
    }

    #[test]
    fn test_merge_skips_options_without_aliases() {
        let mut pkg = package("www-client/chromium", &[&["a"]]);
        let other = package("www-client/chromium", &[&[], &["b"]]);

        pkg.merge(&other).unwrap();

        assert_eq!(pkg.get_all_options(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_package_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chromium.json");
        fs::write(&path, r#"{"package":"www-client/chromium",
            "options":[{"option":["--enable-features=VaapiVideoDecoder", " "]},{"option":["--disable-sync"]}]}"#).unwrap();

        let pkg = BrowserPackage::load(&path).unwrap();

        assert_eq!(pkg.package, "www-client/chromium");
        assert_eq!(pkg.get_all_options(),
                   vec!["--enable-features=VaapiVideoDecoder", "--disable-sync"]);
    }

    fn write_package(dir: &Path, file: &str, json: &str) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_merged_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_package(dir.path(), "base.json", r#"{"package":"www-client/chromium",
            "options":[{"option":["--ozone-platform=wayland"]},{"option":["--disable-sync"]}]}"#);
        let extra = write_package(dir.path(), "extra.json", r#"{"package":"www-client/chromium",
            "options":[{"option":["--disable-sync","--no-sync"]},{"option":["--enable-gpu"]}]}"#);

        let pkg = BrowserPackage::load_merged(&[base, extra]).unwrap();

        assert_eq!(pkg.get_all_options(),
                   vec!["--ozone-platform=wayland", "--disable-sync", "--enable-gpu"]);
    }

    #[test]
    fn test_load_merged_package_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_package(dir.path(), "chromium.json",
            r#"{"package":"www-client/chromium","options":[{"option":["a"]}]}"#);
        let other = write_package(dir.path(), "firefox.json",
            r#"{"package":"www-client/firefox","options":[{"option":["b"]}]}"#);

        let err = BrowserPackage::load_merged(&[base, other.clone()]).unwrap_err();

        assert_eq!(err.to_string(), format!("Failed to merge {}", other.display()));
        assert!(matches!(err.downcast_ref::<BrowserError>(),
                         Some(BrowserError::PackageMismatch { .. })));
    }

    #[test]
    fn test_load_merged_requires_files() {
        assert!(BrowserPackage::load_merged(&[]).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BrowserPackage::load(&dir.path().join("missing.json")).is_err());
    }
}
