//! Output generation for the published documents.
//!
//! # Submodules
//!
//! - [`json`]: Builds the [`PopularList`](crate::models::PopularList) documents
//!   and serializes them to UTF-8 JSON bytes
//!
//! # Output Structure
//!
//! ```text
//! gs://{bucket}/{gcs_path}
//! ├── popularlist.json              # popular articles
//! └── popular-videonews-list.json   # popular videos
//! ```

pub mod json;
