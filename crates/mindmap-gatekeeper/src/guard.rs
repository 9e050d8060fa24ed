//! Vault containment checks

use crate::GatekeeperError;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Confines paths to a vault root
///
/// The root is canonicalised once at construction. Candidates are resolved to
/// their canonical form (following symlinks for every component that exists)
/// and must then equal the root or sit beneath it, compared component by
/// component. String prefixes are never compared.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for an existing vault directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self, GatekeeperError> {
        let root = root.as_ref();
        let canonical = root
            .canonicalize()
            .map_err(|e| GatekeeperError::InvalidRoot {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !canonical.is_dir() {
            return Err(GatekeeperError::InvalidRoot {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        Ok(Self { root: canonical })
    }

    /// Canonical vault root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `candidate` and confirm it lies within the vault
    ///
    /// Relative candidates are interpreted relative to the vault root. The
    /// candidate does not need to exist: the deepest existing ancestor is
    /// canonicalised and the remaining components are appended lexically.
    ///
    /// # Errors
    ///
    /// - [`GatekeeperError::PathSecurity`] if the resolved path is outside the
    ///   root, or passes through a dangling symlink
    /// - [`GatekeeperError::Resolve`] on any other I/O failure
    pub fn validate(&self, candidate: impl AsRef<Path>) -> Result<PathBuf, GatekeeperError> {
        let candidate = candidate.as_ref();
        let absolute = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };

        let resolved = resolve(&absolute).map_err(|e| match e {
            ResolveError::DanglingLink => GatekeeperError::PathSecurity {
                path: candidate.to_path_buf(),
            },
            ResolveError::Io(source) => GatekeeperError::Resolve {
                path: candidate.to_path_buf(),
                source,
            },
        })?;

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            warn!(path = %candidate.display(), "rejected path outside vault root");
            Err(GatekeeperError::PathSecurity {
                path: candidate.to_path_buf(),
            })
        }
    }

    /// True if `candidate` validates
    pub fn contains(&self, candidate: impl AsRef<Path>) -> bool {
        self.validate(candidate).is_ok()
    }
}

enum ResolveError {
    DanglingLink,
    Io(io::Error),
}

/// Canonicalise the longest existing prefix of `path`, then append the rest.
fn resolve(path: &Path) -> Result<PathBuf, ResolveError> {
    let components: Vec<Component<'_>> = path.components().collect();

    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();

        match fs::symlink_metadata(&prefix) {
            Ok(_) => {
                let mut resolved = prefix.canonicalize().map_err(|e| {
                    if e.kind() == io::ErrorKind::NotFound {
                        // The entry exists but its target does not
                        ResolveError::DanglingLink
                    } else {
                        ResolveError::Io(e)
                    }
                })?;

                // Nothing below this point exists, so there are no links to follow
                for component in &components[split..] {
                    match component {
                        Component::Normal(name) => resolved.push(name),
                        Component::ParentDir => {
                            resolved.pop();
                        }
                        Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
                    }
                }
                return Ok(resolved);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ResolveError::Io(e)),
        }
    }

    Err(ResolveError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        "no existing ancestor",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault() -> (TempDir, PathGuard) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("TestVault");
        fs::create_dir_all(root.join("00-Inbox").join("claude")).unwrap();
        let guard = PathGuard::new(&root).unwrap();
        (dir, guard)
    }

    #[test]
    fn test_file_in_vault_root() {
        let (_dir, guard) = vault();
        let file = guard.root().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert_eq!(guard.validate(&file).unwrap(), file);
    }

    #[test]
    fn test_vault_root_itself() {
        let (_dir, guard) = vault();
        assert_eq!(guard.validate(guard.root()).unwrap(), guard.root());
    }

    #[test]
    fn test_nonexistent_target_inside_vault() {
        let (_dir, guard) = vault();
        let target = guard.root().join("01-Processed/2024-12-07/item-abc.md");
        assert_eq!(guard.validate(&target).unwrap(), target);
    }

    #[test]
    fn test_relative_candidate_resolved_against_root() {
        let (_dir, guard) = vault();
        let resolved = guard.validate("00-Inbox/claude/a.txt").unwrap();
        assert_eq!(resolved, guard.root().join("00-Inbox/claude/a.txt"));
    }

    #[test]
    fn test_parent_traversal_rejected() {
        let (_dir, guard) = vault();
        let escape = guard.root().join("..").join("..").join("etc").join("passwd");
        assert!(matches!(
            guard.validate(&escape),
            Err(GatekeeperError::PathSecurity { .. })
        ));
    }

    #[test]
    fn test_traversal_from_subdirectory_rejected() {
        let (_dir, guard) = vault();
        let escape = guard.root().join("00-Inbox/../../outside.txt");
        assert!(guard.validate(&escape).is_err());
    }

    #[test]
    fn test_traversal_through_missing_directory_rejected() {
        let (_dir, guard) = vault();
        let escape = guard.root().join("missing/../../outside.txt");
        assert!(matches!(
            guard.validate(&escape),
            Err(GatekeeperError::PathSecurity { .. })
        ));
    }

    #[test]
    fn test_traversal_that_returns_inside_is_allowed() {
        let (_dir, guard) = vault();
        let inside = guard.root().join("00-Inbox/../01-Processed/x.md");
        assert_eq!(
            guard.validate(&inside).unwrap(),
            guard.root().join("01-Processed/x.md")
        );
    }

    #[test]
    fn test_absolute_path_outside_rejected() {
        let (_dir, guard) = vault();
        assert!(!guard.contains("/etc/passwd"));
    }

    #[test]
    fn test_sibling_with_shared_prefix_rejected() {
        let (dir, guard) = vault();
        let sibling = dir.path().join("TestVault-evil");
        fs::create_dir_all(&sibling).unwrap();
        assert!(matches!(
            guard.validate(sibling.join("file.txt")),
            Err(GatekeeperError::PathSecurity { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_outside_rejected() {
        let (dir, guard) = vault();
        let secret = dir.path().join("secret.txt");
        fs::write(&secret, "secret").unwrap();
        let link = guard.root().join("link.txt");
        std::os::unix::fs::symlink(&secret, &link).unwrap();

        assert!(matches!(
            guard.validate(&link),
            Err(GatekeeperError::PathSecurity { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_to_outside_rejected() {
        let (dir, guard) = vault();
        let outside = dir.path().join("outside");
        fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, guard.root().join("escape")).unwrap();

        assert!(guard.validate(guard.root().join("escape/new.md")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_within_vault_allowed() {
        let (_dir, guard) = vault();
        let real = guard.root().join("real.txt");
        fs::write(&real, "x").unwrap();
        let link = guard.root().join("alias.txt");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert_eq!(guard.validate(&link).unwrap(), real);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_rejected() {
        let (dir, guard) = vault();
        let link = guard.root().join("dangling.md");
        std::os::unix::fs::symlink(dir.path().join("nowhere.md"), &link).unwrap();

        assert!(matches!(
            guard.validate(&link),
            Err(GatekeeperError::PathSecurity { .. })
        ));
    }

    #[test]
    fn test_missing_root_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            PathGuard::new(dir.path().join("nope")),
            Err(GatekeeperError::InvalidRoot { .. })
        ));
    }

    #[test]
    fn test_file_root_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "").unwrap();
        assert!(PathGuard::new(&file).is_err());
    }
}
