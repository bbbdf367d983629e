// brickforge-core/src/domain/project/tree.rs

use std::collections::{BTreeMap, BTreeSet};

/// In-memory output of one generation run: relative path (always `/`
/// separated) to file body. Nothing touches disk until the whole tree is
/// rendered and verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTree {
    files: BTreeMap<String, String>,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous body if the path was already present.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.files.insert(path.into(), content.into())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Every parent directory implied by the file paths.
    pub fn directories(&self) -> BTreeSet<String> {
        let mut dirs = BTreeSet::new();
        for path in self.files.keys() {
            let mut current = path.as_str();
            while let Some((parent, _)) = current.rsplit_once('/') {
                dirs.insert(parent.to_string());
                current = parent;
            }
        }
        dirs
    }

    /// Paths of the files whose body contains `needle`.
    pub fn files_containing(&self, needle: &str) -> Vec<&str> {
        self.iter()
            .filter(|(_, content)| content.contains(needle))
            .map(|(path, _)| path)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_include_every_ancestor() {
        let mut tree = ProjectTree::new();
        tree.insert("README.md", "# acme");
        tree.insert(".azure/devops_pipelines/acme_bundle_cicd.yml", "");
        tree.insert("src/jobs/ingest_to_raw.py", "print()");

        let dirs: Vec<String> = tree.directories().into_iter().collect();
        assert_eq!(dirs, [".azure", ".azure/devops_pipelines", "src", "src/jobs"]);
    }

    #[test]
    fn test_files_containing() {
        let mut tree = ProjectTree::new();
        tree.insert("a.yml", "host: WORKSPACE_HOST_PLACEHOLDER_STAGE");
        tree.insert("b.yml", "host: https://example.cloud.databricks.com");
        assert_eq!(tree.files_containing("PLACEHOLDER"), ["a.yml"]);
    }

    #[test]
    fn test_insert_reports_overwrite() {
        let mut tree = ProjectTree::new();
        assert!(tree.insert("a", "1").is_none());
        assert_eq!(tree.insert("a", "2").as_deref(), Some("1"));
        assert_eq!(tree.get("a"), Some("2"));
        assert_eq!(tree.len(), 1);
    }
}
