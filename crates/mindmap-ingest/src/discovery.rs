//! Inbox scanning and file loading

use crate::{source_date_for, IngestError};
use mindmap_domain::{ConversationFile, Platform};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Extension of conversation exports
const CONVERSATION_EXTENSION: &str = "txt";

/// An intake folder bound to its platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbox {
    /// Platform every file in this folder is treated as
    pub platform: Platform,
    /// Absolute folder path
    pub dir: PathBuf,
}

impl Inbox {
    /// Bind `dir` to `platform`
    pub fn new(platform: Platform, dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            dir: dir.into(),
        }
    }
}

/// A file found in an inbox, not yet read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path
    pub path: PathBuf,
    /// Platform of the containing inbox
    pub platform: Platform,
}

/// List every conversation file across `inboxes`
///
/// Inboxes are scanned in the order given, files within an inbox in path
/// order. A missing inbox is skipped with a warning.
pub fn scan_inboxes(inboxes: &[Inbox]) -> Result<Vec<Candidate>, IngestError> {
    let mut candidates = Vec::new();

    for inbox in inboxes {
        if !inbox.dir.is_dir() {
            warn!(platform = %inbox.platform, path = %inbox.dir.display(), "inbox folder missing; skipping");
            continue;
        }

        let entries = fs::read_dir(&inbox.dir).map_err(|source| IngestError::Scan {
            path: inbox.dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| IngestError::Scan {
                path: inbox.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && has_conversation_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        debug!(platform = %inbox.platform, files = paths.len(), "scanned inbox");
        candidates.extend(paths.into_iter().map(|path| Candidate {
            path,
            platform: inbox.platform,
        }));
    }

    Ok(candidates)
}

/// Platform of the inbox that directly contains `path`, if any
pub fn inbox_for(path: &Path, inboxes: &[Inbox]) -> Option<Platform> {
    let parent = path.parent()?;
    inboxes
        .iter()
        .find(|inbox| inbox.dir == parent)
        .map(|inbox| inbox.platform)
}

/// Read a candidate into an immutable snapshot
///
/// `vault_root` is used to compute the registry key; it must be in the same
/// (canonical) form as `candidate.path`.
pub fn load_conversation(
    candidate: &Candidate,
    vault_root: &Path,
) -> Result<ConversationFile, IngestError> {
    let read_err = |source| IngestError::Read {
        path: candidate.path.clone(),
        source,
    };

    let content = fs::read(&candidate.path).map_err(read_err)?;
    let metadata = fs::metadata(&candidate.path).map_err(read_err)?;
    let source_date = source_date_for(&candidate.path, &metadata);

    Ok(ConversationFile::new(
        candidate.path.clone(),
        relative_key(&candidate.path, vault_root),
        candidate.platform,
        content,
        source_date,
    ))
}

/// Vault-relative path with `/` separators
fn relative_key(path: &Path, vault_root: &Path) -> String {
    let relative = path.strip_prefix(vault_root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn has_conversation_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(CONVERSATION_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault() -> (TempDir, Vec<Inbox>) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let inboxes: Vec<Inbox> = Platform::ALL
            .into_iter()
            .map(|p| Inbox::new(p, root.join("00-Inbox").join(p.as_str())))
            .collect();
        for inbox in &inboxes {
            fs::create_dir_all(&inbox.dir).unwrap();
        }
        (dir, inboxes)
    }

    #[test]
    fn test_scan_finds_txt_files_in_order() {
        let (_dir, inboxes) = vault();
        fs::write(inboxes[0].dir.join("b.txt"), "x").unwrap();
        fs::write(inboxes[0].dir.join("a.txt"), "x").unwrap();
        fs::write(inboxes[0].dir.join("notes.md"), "x").unwrap();
        fs::write(inboxes[1].dir.join("export.txt"), "{}").unwrap();

        let found = scan_inboxes(&inboxes).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|c| c.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.txt", "export.txt"]);
        assert_eq!(found[0].platform, Platform::Claude);
        assert_eq!(found[2].platform, Platform::ChatGpt);
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let (_dir, inboxes) = vault();
        let nested = inboxes[0].dir.join("archive");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("old.txt"), "x").unwrap();

        assert!(scan_inboxes(&inboxes).unwrap().is_empty());
    }

    #[test]
    fn test_missing_inbox_is_skipped() {
        let (_dir, inboxes) = vault();
        fs::remove_dir_all(&inboxes[2].dir).unwrap();
        fs::write(inboxes[0].dir.join("a.txt"), "x").unwrap();

        assert_eq!(scan_inboxes(&inboxes).unwrap().len(), 1);
    }

    #[test]
    fn test_inbox_for_direct_children_only() {
        let (_dir, inboxes) = vault();
        let direct = inboxes[2].dir.join("a.txt");
        let nested = inboxes[2].dir.join("sub").join("a.txt");

        assert_eq!(inbox_for(&direct, &inboxes), Some(Platform::Gemini));
        assert_eq!(inbox_for(&nested, &inboxes), None);
    }

    #[test]
    fn test_load_conversation() {
        let (dir, inboxes) = vault();
        let root = dir.path().canonicalize().unwrap();
        let path = inboxes[0].dir.join("2024-12-07-demo.txt");
        fs::write(&path, "User: hi").unwrap();

        let candidate = Candidate {
            path: path.clone(),
            platform: Platform::Claude,
        };
        let file = load_conversation(&candidate, &root).unwrap();

        assert_eq!(file.relative_path, "00-Inbox/claude/2024-12-07-demo.txt");
        assert_eq!(file.source_date.to_string(), "2024-12-07");
        assert_eq!(file.content, b"User: hi");
        assert_eq!(file.hash.as_str().len(), 64);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let (dir, _inboxes) = vault();
        let candidate = Candidate {
            path: dir.path().join("gone.txt"),
            platform: Platform::Claude,
        };
        assert!(matches!(
            load_conversation(&candidate, dir.path()),
            Err(IngestError::Read { .. })
        ));
    }
}
