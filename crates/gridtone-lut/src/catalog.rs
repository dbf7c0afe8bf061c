//! Named LUT catalog.
//!
//! A catalog is the enumerated set of LUTs the editor offers: every
//! `*.cube` file in one directory, named by its file stem. Names that parse
//! as numbers come first in numeric order, the rest follow alphabetically.
//!
//! ```rust,ignore
//! let catalog = LutCatalog::scan("assets/lut")?;
//! for (label, name) in catalog.options() {
//!     println!("{label}: {name:?}");
//! }
//! let lut = catalog.load("vivid")?;
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Lut3D, LutError, LutResult, cube};

/// One LUT available in a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct LutEntry {
    /// Identifier stored in `ImageProperties::lut` (the file stem)
    pub name: String,
    /// Human-readable label
    pub display_name: String,
    /// Path to the `.cube` file
    pub path: PathBuf,
}

/// The LUTs found in one directory.
#[derive(Debug, Clone, Default)]
pub struct LutCatalog {
    root: PathBuf,
    entries: Vec<LutEntry>,
}

impl LutCatalog {
    /// Scans a directory for `.cube` files.
    pub fn scan<P: AsRef<Path>>(dir: P) -> LutResult<Self> {
        let root = dir.as_ref().to_path_buf();
        let mut entries = Vec::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("cube") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.push(LutEntry {
                name: stem.to_string(),
                display_name: display_name(stem),
                path: path.clone(),
            });
        }
        entries.sort_by(|a, b| catalog_order(&a.name, &b.name));
        debug!(dir = %root.display(), count = entries.len(), "scanned LUT catalog");
        Ok(Self { root, entries })
    }

    /// Directory the catalog was scanned from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &[LutEntry] {
        &self.entries
    }

    /// Number of LUTs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog holds no LUTs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selector options: `("None", None)` followed by every LUT.
    pub fn options(&self) -> Vec<(String, Option<String>)> {
        std::iter::once(("None".to_string(), None))
            .chain(
                self.entries
                    .iter()
                    .map(|e| (e.display_name.clone(), Some(e.name.clone()))),
            )
            .collect()
    }

    /// Looks up a LUT by name.
    pub fn get(&self, name: &str) -> Option<&LutEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Resolves a LUT name to its file path.
    pub fn resolve(&self, name: &str) -> LutResult<&Path> {
        self.get(name)
            .map(|e| e.path.as_path())
            .ok_or_else(|| LutError::NotFound(name.to_string()))
    }

    /// Resolves and parses a LUT.
    pub fn load(&self, name: &str) -> LutResult<Lut3D> {
        cube::read_3d(self.resolve(name)?)
    }
}

/// Turns a file stem into a label: underscores become spaces and the first
/// letter is capitalized.
pub fn display_name(stem: &str) -> String {
    let spaced = stem.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn catalog_order(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_identity(dir: &Path, stem: &str) {
        cube::write_3d(dir.join(format!("{stem}.cube")), &Lut3D::identity(2)).unwrap();
    }

    #[test]
    fn numeric_names_sort_first() {
        let dir = tempfile::tempdir().unwrap();
        for stem in ["warm_film", "10", "2", "bleach", "1"] {
            touch_identity(dir.path(), stem);
        }
        std::fs::write(dir.path().join("notes.txt"), "not a lut").unwrap();

        let catalog = LutCatalog::scan(dir.path()).unwrap();
        let names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["1", "2", "10", "bleach", "warm_film"]);
    }

    #[test]
    fn options_start_with_none() {
        let dir = tempfile::tempdir().unwrap();
        touch_identity(dir.path(), "warm_film");
        let catalog = LutCatalog::scan(dir.path()).unwrap();
        let opts = catalog.options();
        assert_eq!(opts[0], ("None".to_string(), None));
        assert_eq!(opts[1], ("Warm film".to_string(), Some("warm_film".to_string())));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = LutCatalog::scan(dir.path()).unwrap();
        assert!(matches!(catalog.load("vivid"), Err(LutError::NotFound(n)) if n == "vivid"));
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name("kodak_portra_400"), "Kodak portra 400");
        assert_eq!(display_name("12"), "12");
        assert_eq!(display_name(""), "");
    }
}
