use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maps a session id (file stem) to its path relative to the log root.
///
/// The cache is built by a single recursive walk on the first `resolve` call
/// and is never rebuilt within a process run; a run is a one-shot batch job,
/// so a snapshot taken at first use is acceptable.
#[derive(Debug)]
pub struct SessionLocator {
    root: PathBuf,
    cache: Option<HashMap<String, PathBuf>>,
}

impl SessionLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: None,
        }
    }

    /// Resolve a session id to a path relative to the log root.
    ///
    /// Unknown ids fall back to `{id}.jsonl`; the loader then degrades to an
    /// empty record list when that file does not exist.
    pub fn resolve(&mut self, session_id: &str) -> PathBuf {
        if self.cache.is_none() {
            self.cache = Some(build_cache(&self.root));
        }
        match self.cache.as_ref().and_then(|c| c.get(session_id)) {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("{}.jsonl", session_id)),
        }
    }
}

/// Walk the log root once, recording every `.jsonl` file by its stem.
/// Later entries overwrite earlier ones for duplicate stems. A missing root
/// yields an empty cache.
fn build_cache(root: &Path) -> HashMap<String, PathBuf> {
    let mut cache = HashMap::new();
    collect(root, root, &mut cache);
    cache
}

fn collect(root: &Path, dir: &Path, cache: &mut HashMap<String, PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect(root, &path, cache);
            } else if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if let Ok(relative) = path.strip_prefix(root) {
                        cache.insert(stem.to_string(), relative.to_path_buf());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project-a");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("abc123.jsonl"), "{}\n").unwrap();
        fs::write(dir.path().join("top.jsonl"), "{}\n").unwrap();

        let mut locator = SessionLocator::new(dir.path());
        assert_eq!(
            locator.resolve("abc123"),
            PathBuf::from("project-a").join("abc123.jsonl")
        );
        assert_eq!(locator.resolve("top"), PathBuf::from("top.jsonl"));
    }

    #[test]
    fn test_resolve_falls_back_for_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut locator = SessionLocator::new(dir.path());
        assert_eq!(locator.resolve("missing"), PathBuf::from("missing.jsonl"));
    }

    #[test]
    fn test_missing_root_builds_empty_cache() {
        let mut locator = SessionLocator::new("/nonexistent/neousage-test-root");
        assert_eq!(locator.resolve("any"), PathBuf::from("any.jsonl"));
    }

    #[test]
    fn test_cache_is_not_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("first.jsonl"), "{}\n").unwrap();

        let mut locator = SessionLocator::new(dir.path());
        assert_eq!(locator.resolve("first"), PathBuf::from("first.jsonl"));

        // Files added after the first resolve are not picked up; a rebuilt
        // cache would find sub/second.jsonl, the stale one falls back
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("second.jsonl"), "{}\n").unwrap();
        assert_eq!(locator.resolve("second"), PathBuf::from("second.jsonl"));
    }

    #[test]
    fn test_ignores_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let mut locator = SessionLocator::new(dir.path());
        assert_eq!(locator.resolve("notes"), PathBuf::from("notes.jsonl"));
    }
}
