//! gfwpac Core Library
//!
//! This crate provides the building blocks shared by the compiler and the CLI:
//! the public suffix table used for domain reduction and a small hostname
//! extractor for filter-rule text.
//!
//! # Modules
//!
//! - `psl`: Public Suffix List loading and suffix-chain reduction
//! - `url`: Hostname extraction from rule text treated as a URL
//! - `error`: Error taxonomy shared by every crate in the workspace

pub mod error;
pub mod psl;
pub mod url;

// Re-export commonly used types
pub use error::{Error, Result};
pub use psl::{walk_host_suffixes, Reduction, SuffixSet};
pub use url::extract_hostname;
