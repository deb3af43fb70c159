//! Finding image files to scan from the command line.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;

/// Collects scan targets from a file or directory argument.
pub struct FileDiscovery {
    config: ScanConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Resolve a path argument into the files to scan.
    ///
    /// A file named explicitly is always returned, whatever its extension;
    /// the codec sniffs content anyway. Directories are walked recursively,
    /// keeping files with a supported extension and skipping hidden entries.
    /// Results are sorted for deterministic output.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_file() {
            return vec![path.to_path_buf()];
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .map(DirEntry::into_path)
            .collect();

        files.sort();
        files
    }

    /// Check if a file has a supported extension (case-insensitive).
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery() -> FileDiscovery {
        FileDiscovery::new(ScanConfig::default())
    }

    #[test]
    fn test_is_supported() {
        let discovery = discovery();
        assert!(discovery.is_supported(Path::new("code.jpg")));
        assert!(discovery.is_supported(Path::new("code.JPG")));
        assert!(discovery.is_supported(Path::new("code.png")));
        assert!(discovery.is_supported(Path::new("code.webp")));
        assert!(!discovery.is_supported(Path::new("notes.txt")));
        assert!(!discovery.is_supported(Path::new("README")));
    }

    #[test]
    fn test_directory_walk_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        std::fs::write(dir.path().join("a.jpeg"), b"").unwrap();
        std::fs::write(dir.path().join("nested/c.gif"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join(".cache/d.png"), b"").unwrap();

        let files = discovery().discover(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.jpeg"),
                PathBuf::from("b.png"),
                PathBuf::from("nested/c.gif"),
            ]
        );
    }

    #[test]
    fn test_explicit_file_is_kept_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.bin");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(discovery().discover(&path), vec![path]);
    }

    #[test]
    fn test_missing_path_yields_nothing() {
        assert!(discovery()
            .discover(Path::new("/nonexistent/qrscan/dir"))
            .is_empty());
    }
}
