//! File maps: the desired or resulting state of a sandbox workspace.

use std::collections::BTreeMap;

use crate::{hash::ObjectHash, path::WorkspacePath};

/// A mapping from absolute workspace path to object hash.
///
/// An empty map represents an empty workspace. Ordered by path so that
/// serialized output (and log lines) are deterministic.
pub type FileMap = BTreeMap<WorkspacePath, ObjectHash>;

/// Computes the minimal result file map per the `files` entry rule in the
/// data model: only paths whose final hash differs from the input hash (or
/// that did not exist in the input) and whose final hash is non-empty.
///
/// `outputs` is the full set of `(path, old_hash, new_hash)` triples reported
/// by the sandbox for this execution; `new_hash` of `""` means the file was
/// deleted.
#[must_use]
pub fn changed_files<'a>(
    outputs: impl IntoIterator<Item = (&'a WorkspacePath, Option<&'a ObjectHash>, &'a str)>,
) -> FileMap {
    let mut changed = FileMap::new();
    for (path, old_hash, new_hash) in outputs {
        if new_hash.is_empty() {
            continue;
        }
        let unchanged = old_hash.is_some_and(|old| old.as_str() == new_hash);
        if unchanged {
            continue;
        }
        if let Ok(hash) = ObjectHash::parse(new_hash) {
            changed.insert(path.clone(), hash);
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> WorkspacePath {
        WorkspacePath::parse(s).expect("valid path")
    }

    #[test]
    fn changed_files_omits_unchanged() {
        let hash = ObjectHash::of(b"same");
        let p = path("/workspace/a.txt");
        let result = changed_files([(&p, Some(&hash), hash.as_str())]);
        assert!(result.is_empty(), "identical hash must not be reported");
    }

    #[test]
    fn changed_files_omits_deleted() {
        let p = path("/workspace/a.txt");
        let old = ObjectHash::of(b"gone");
        let result = changed_files([(&p, Some(&old), "")]);
        assert!(result.is_empty(), "empty new_hash (deletion) must not be reported");
    }

    #[test]
    fn changed_files_includes_new_file() {
        let p = path("/workspace/new.txt");
        let new_hash = ObjectHash::of(b"content");
        let result = changed_files([(&p, None, new_hash.as_str())]);
        assert_eq!(result.get(&p), Some(&new_hash));
    }

    #[test]
    fn changed_files_includes_modified_file() {
        let p = path("/workspace/a.txt");
        let old = ObjectHash::of(b"old");
        let new_hash = ObjectHash::of(b"new");
        let result = changed_files([(&p, Some(&old), new_hash.as_str())]);
        assert_eq!(result.get(&p), Some(&new_hash));
    }
}
