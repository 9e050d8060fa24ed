//! Context ("Bible") document loading

use mindmap_extractor::ContextDocument;
use mindmap_gatekeeper::PathGuard;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Read the configured context documents
///
/// Every path goes through `guard` first. Missing, unreadable, escaping or
/// blank files are skipped with a warning; processing continues without them.
pub fn load_context(guard: &PathGuard, files: &[PathBuf]) -> Vec<ContextDocument> {
    let mut documents = Vec::with_capacity(files.len());

    for relative in files {
        let path = match guard.validate(relative) {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping context document {}: {}", relative.display(), e);
                continue;
            }
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Context document not found: {}", path.display());
                continue;
            }
            Err(e) => {
                warn!("Failed to read context document {}: {}", path.display(), e);
                continue;
            }
        };

        if content.trim().is_empty() {
            warn!("Context document is empty: {}", path.display());
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative.display().to_string());
        debug!(name = %name, chars = content.len(), "loaded context document");
        documents.push(ContextDocument::new(name, content));
    }

    documents
}
