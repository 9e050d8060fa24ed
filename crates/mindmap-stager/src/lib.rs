//! Mindmap Staging Writer
//!
//! Renders extracted items and their summary as frontmatter-tagged markdown
//! under `<vault>/<staging>/<YYYY-MM-DD>/`, ready for manual review.
//!
//! # Layout
//!
//! ```text
//! 01-Processed/2024-12-07/
//!   launch-timing-3f2a9c1b7d04.md
//!   launch-in-march-9b1e44c0a2f7.md
//!   _summary-claude-2024-12-07.md
//! ```
//!
//! # Guarantees
//!
//! - Every target path is built from a sanitized name and validated by
//!   [`PathGuard`](mindmap_gatekeeper::PathGuard) before anything touches disk.
//! - Documents contain no wall-clock timestamps, so re-staging identical
//!   extraction output produces byte-identical files and is a no-op.
//! - Existing files are never overwritten. A different document under an
//!   existing name is handled by the [`ConflictPolicy`].
//! - One failed document does not stop the others; failures are returned in
//!   the [`WriteReport`].

#![warn(missing_docs)]

mod error;
pub mod frontmatter;
mod render;
mod writer;

pub use error::StagerError;
pub use frontmatter::{split_frontmatter, ItemFrontmatter, SummaryFrontmatter, STAGED_STATUS};
pub use render::{render_item, render_summary};
pub use writer::{
    ConflictPolicy, StagedDocument, StagingWriter, WriteFailure, WriteReport, WriteStatus,
    MAX_VERSIONS,
};
