//! Public Suffix List (PSL) utilities for domain reduction
//!
//! The suffix table is built once per run from raw list text and is read-only
//! afterwards. Reduction walks a hostname's suffixes from the rightmost label
//! outward and keeps the longest chain that is still present in the table.
//!
//! # Examples
//!
//! ```
//! use gp_core::psl::{Reduction, SuffixSet};
//!
//! let suffixes = SuffixSet::load("uk\nco.uk\n");
//! assert_eq!(suffixes.reduce_host("www.example.co.uk", Reduction::SuffixChain), Some("co.uk"));
//! assert_eq!(suffixes.reduce_host("www.example.co.uk", Reduction::Registrable), Some("example.co.uk"));
//! assert_eq!(suffixes.reduce_host("example.org", Reduction::SuffixChain), None);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

// =============================================================================
// Reduction Mode
// =============================================================================

/// How a hostname is collapsed once its suffix chain is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    /// Keep the longest suffix that is itself a table member.
    #[default]
    SuffixChain,
    /// Keep the matched suffix plus the next label to its left (eTLD+1).
    Registrable,
}

// =============================================================================
// Suffix Set
// =============================================================================

/// Set of known public suffixes (e.g., "com", "co.uk").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixSet {
    suffixes: HashSet<String>,
}

impl SuffixSet {
    /// Create an empty suffix set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a suffix set from public suffix list text.
    ///
    /// Blank lines, `//` and `#` comments and `!` exception rules are skipped.
    /// A leading `*.` wildcard marker is stripped before the entry is stored.
    pub fn load(text: &str) -> Self {
        let mut suffixes = HashSet::new();
        let mut skipped = 0usize;

        for raw_line in text.lines() {
            match normalize_line(raw_line) {
                Some(suffix) => {
                    suffixes.insert(suffix);
                }
                None => skipped += 1,
            }
        }

        log::debug!("loaded {} public suffixes ({} lines skipped)", suffixes.len(), skipped);
        Self { suffixes }
    }

    /// Read and parse a suffix list from a local file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read '{}'", path.display()), e))?;
        Ok(Self::load(&text))
    }

    /// Check whether `suffix` is a known public suffix.
    #[inline]
    pub fn contains(&self, suffix: &str) -> bool {
        self.suffixes.contains(suffix)
    }

    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    /// Serialize the normalized set as sorted, newline-terminated lines.
    ///
    /// Feeding the result back into [`SuffixSet::load`] yields the same set.
    pub fn to_cache_text(&self) -> String {
        let mut sorted: Vec<&str> = self.iter().collect();
        sorted.sort_unstable();

        let mut out = String::with_capacity(sorted.iter().map(|s| s.len() + 1).sum());
        for suffix in sorted {
            out.push_str(suffix);
            out.push('\n');
        }
        out
    }

    /// Collapse a hostname using this table.
    ///
    /// Returns `None` when the rightmost label is not a known suffix. The
    /// returned slice always borrows from `host`.
    pub fn reduce_host<'a>(&self, host: &'a str, reduction: Reduction) -> Option<&'a str> {
        let mut suffixes = walk_host_suffixes(host);

        let tld = suffixes.next()?;
        if !self.contains(tld) {
            return None;
        }

        let mut best = tld;
        for suffix in suffixes {
            if self.contains(suffix) {
                best = suffix;
                continue;
            }
            if reduction == Reduction::Registrable {
                best = suffix;
            }
            break;
        }

        Some(best)
    }
}

impl<S: Into<String>> FromIterator<S> for SuffixSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            suffixes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

fn normalize_line(raw_line: &str) -> Option<String> {
    let line = raw_line.split_whitespace().next()?;

    if line.starts_with("//") || line.starts_with('#') || line.starts_with('!') {
        return None;
    }

    let line = line.strip_prefix("*.").unwrap_or(line);
    if line.is_empty() {
        return None;
    }

    Some(line.to_lowercase())
}

// =============================================================================
// Suffix Walking
// =============================================================================

/// Iterator over a host's suffixes, shortest first.
///
/// `www.example.co.uk` yields `uk`, `co.uk`, `example.co.uk` and finally the
/// full host. Every item is a slice of the original host.
pub struct HostSuffixIter<'a> {
    host: &'a str,
    head_end: Option<usize>,
}

impl<'a> HostSuffixIter<'a> {
    pub fn new(host: &'a str) -> Self {
        Self {
            host,
            head_end: if host.is_empty() { None } else { Some(host.len()) },
        }
    }
}

impl<'a> Iterator for HostSuffixIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.head_end?;

        match self.host[..end].rfind('.') {
            Some(dot) => {
                self.head_end = Some(dot);
                Some(&self.host[dot + 1..])
            }
            None => {
                self.head_end = None;
                Some(self.host)
            }
        }
    }
}

/// Walk host suffixes from least specific to most specific.
pub fn walk_host_suffixes(host: &str) -> HostSuffixIter<'_> {
    HostSuffixIter::new(host)
}
