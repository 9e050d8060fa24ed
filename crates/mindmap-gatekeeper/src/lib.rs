//! Mindmap Gatekeeper
//!
//! Guards every filesystem path the pipeline touches.
//!
//! The Gatekeeper provides:
//! - Vault containment checks on canonical (symlink-resolved) paths
//! - Filename sanitisation for untrusted, generated text
//!
//! Every write target derived from generated content goes through both
//! operations before any filesystem interaction.
//!
//! # Examples
//!
//! ```no_run
//! use mindmap_gatekeeper::{sanitize_filename, PathGuard};
//!
//! let guard = PathGuard::new("/home/me/Vault").unwrap();
//! let name = sanitize_filename("../../etc/passwd");
//! assert_eq!(name, "etc-passwd");
//!
//! let target = guard.validate(format!("01-Processed/2024-12-07/{}.md", name)).unwrap();
//! assert!(target.starts_with(guard.root()));
//! ```

#![warn(missing_docs)]

mod error;
mod guard;
mod sanitize;

pub use error::GatekeeperError;
pub use guard::PathGuard;
pub use sanitize::{
    sanitize_filename, sanitize_filename_with_limit, FALLBACK_NAME, MAX_FILENAME_LENGTH,
    RESERVED_NAMES, RESERVED_PREFIX,
};
