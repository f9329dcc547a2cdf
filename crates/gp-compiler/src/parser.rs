use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use gp_core::error::{Error, Result};
use gp_core::url::extract_hostname;

/// Why a rule line produced no hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    /// Contains `.*`, too broad for a domain lookup table.
    Wildcard,
    Comment,
    Header,
    Exception,
}

/// Outcome of parsing a single rule line.
#[derive(Debug)]
pub enum RuleLine {
    Host(String),
    Skipped(SkipReason),
    Invalid(Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub hosts: usize,
    pub blank: usize,
    pub wildcard: usize,
    pub comments: usize,
    pub headers: usize,
    pub exceptions: usize,
    pub invalid: usize,
}

impl ParseStats {
    pub fn skipped(&self) -> usize {
        self.blank + self.wildcard + self.comments + self.headers + self.exceptions
    }

    fn record(&mut self, outcome: &RuleLine) {
        self.lines += 1;
        match outcome {
            RuleLine::Host(_) => self.hosts += 1,
            RuleLine::Invalid(_) => self.invalid += 1,
            RuleLine::Skipped(SkipReason::Blank) => self.blank += 1,
            RuleLine::Skipped(SkipReason::Wildcard) => self.wildcard += 1,
            RuleLine::Skipped(SkipReason::Comment) => self.comments += 1,
            RuleLine::Skipped(SkipReason::Header) => self.headers += 1,
            RuleLine::Skipped(SkipReason::Exception) => self.exceptions += 1,
        }
    }
}

/// Decode a gfwlist payload.
///
/// Plain rule text always contains a `.` somewhere; anything without one is
/// treated as base64 (line breaks and other whitespace are ignored).
pub fn decode_gfwlist(content: &str) -> Result<Cow<'_, str>> {
    if content.contains('.') {
        return Ok(Cow::Borrowed(content));
    }

    let compact: Vec<u8> = content.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(&compact)
        .map_err(|e| Error::Encoding(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))?;

    Ok(Cow::Owned(text))
}

/// Concatenate the primary list, builtin rules and optional user rules line-wise.
pub fn combine_lists<'a>(primary: &'a str, builtin: &'a str, user: Option<&'a str>) -> Vec<&'a str> {
    primary
        .lines()
        .chain(builtin.lines())
        .chain(user.into_iter().flat_map(str::lines))
        .collect()
}

/// Turn one filter-list line into a candidate hostname.
pub fn parse_rule_line(raw_line: &str) -> RuleLine {
    let line = raw_line.trim();
    if line.is_empty() {
        return RuleLine::Skipped(SkipReason::Blank);
    }

    if line.contains(".*") {
        return RuleLine::Skipped(SkipReason::Wildcard);
    }

    let line: Cow<'_, str> = if line.contains('*') {
        Cow::Owned(line.replace('*', "/"))
    } else {
        Cow::Borrowed(line)
    };

    let rest = strip_anchor(&line);

    match rest.as_bytes().first() {
        Some(b'!') => return RuleLine::Skipped(SkipReason::Comment),
        Some(b'[') => return RuleLine::Skipped(SkipReason::Header),
        Some(b'@') => return RuleLine::Skipped(SkipReason::Exception),
        _ => {}
    }

    match extract_hostname(rest) {
        Ok(host) => RuleLine::Host(host),
        Err(e) => RuleLine::Invalid(e),
    }
}

/// Strip at most one leading anchor: `||`, then `|`, then `.`.
pub fn strip_anchor(line: &str) -> &str {
    line.strip_prefix("||")
        .or_else(|| line.strip_prefix('|'))
        .or_else(|| line.strip_prefix('.'))
        .unwrap_or(line)
}

/// Parse every line, keeping hostnames in input order (duplicates included).
pub fn parse_rules<'a, I>(lines: I) -> (Vec<String>, ParseStats)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hosts = Vec::new();
    let mut stats = ParseStats::default();

    for line in lines {
        let outcome = parse_rule_line(line);
        stats.record(&outcome);

        match outcome {
            RuleLine::Host(host) => hosts.push(host),
            RuleLine::Invalid(e) => log::debug!("dropping rule: {e}"),
            RuleLine::Skipped(reason) => log::trace!("skipping {reason:?} line: {line}"),
        }
    }

    log::info!(
        "parsed {} lines: {} hostnames, {} skipped, {} invalid",
        stats.lines,
        stats.hosts,
        stats.skipped(),
        stats.invalid
    );

    (hosts, stats)
}

/// Rules handed to the precise-mode engine: comments, headers and blank lines removed.
///
/// Blank lines are dropped along with `!` and `[` lines because an empty
/// Adblock filter matches every URL.
pub fn filter_precise_rules<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter(|line| !line.is_empty() && !line.starts_with('!') && !line.starts_with('['))
        .collect()
}
