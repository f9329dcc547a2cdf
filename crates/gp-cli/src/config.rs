//! Run configuration.
//!
//! Built once from the command line and passed by reference everywhere else.

use std::fmt;
use std::path::PathBuf;

use gp_core::psl::Reduction;

pub const GFWLIST_URL: &str = "https://raw.githubusercontent.com/gfwlist/gfwlist/master/gfwlist.txt";
pub const PUBLIC_SUFFIX_URL: &str = "https://publicsuffix.org/list/public_suffix_list.dat";
pub const DEFAULT_PROXY: &str = "SOCKS5 127.0.0.1:1080; SOCKS 127.0.0.1:1080; DIRECT";
pub const DEFAULT_OUTPUT: &str = "proxy.pac";
pub const DEFAULT_SUFFIX_CACHE: &str = "resources/tld.txt";
pub const DEFAULT_PRECISE_TEMPLATE: &str = "resources/abp.js";

/// Where a text input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` strings are URLs, everything else is a path.
    pub fn parse(value: &str) -> Self {
        let lower = value.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(value.trim().to_string())
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// gfwlist location, plain or base64-encoded.
    pub input: Source,
    pub output: PathBuf,
    /// Proxy directive returned by the PAC script, e.g. `SOCKS5 127.0.0.1:1080`.
    pub proxy: String,
    /// Extra rules appended after the builtin rules.
    pub user_rule: Option<Source>,
    /// Emit the raw rule list for an Adblock engine template instead of a domain map.
    pub precise: bool,
    /// Ignore `suffix_cache` and download the suffix list again.
    pub force_refresh_suffixes: bool,
    pub suffix_list: Source,
    pub suffix_cache: PathBuf,
    /// Template override. Precise mode falls back to `DEFAULT_PRECISE_TEMPLATE`.
    pub template: Option<PathBuf>,
    pub reduction: Reduction,
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: Source::Url(GFWLIST_URL.to_string()),
            output: PathBuf::from(DEFAULT_OUTPUT),
            proxy: DEFAULT_PROXY.to_string(),
            user_rule: None,
            precise: false,
            force_refresh_suffixes: false,
            suffix_list: Source::Url(PUBLIC_SUFFIX_URL.to_string()),
            suffix_cache: PathBuf::from(DEFAULT_SUFFIX_CACHE),
            template: None,
            reduction: Reduction::default(),
            pretty: false,
        }
    }
}

impl Config {
    pub fn json_style(&self) -> gp_compiler::JsonStyle {
        if self.pretty {
            gp_compiler::JsonStyle::Pretty
        } else {
            gp_compiler::JsonStyle::Compact
        }
    }
}
