//! gfwpac Rule Compiler
//!
//! This crate turns gfwlist-style rule text into a proxy auto-config script.

pub mod parser;
pub mod reducer;
pub mod optimizer;
pub mod builder;

pub use builder::{build_fast_pac, build_precise_pac, BuildError, JsonStyle};
pub use optimizer::{build_domain_set, DomainSet};
pub use parser::{combine_lists, decode_gfwlist, filter_precise_rules, parse_rules, ParseStats};
pub use reducer::reduce_domains;

/// Rules appended after the primary list on every run.
pub const BUILTIN_RULES: &str = include_str!("../../../resources/builtin.txt");
