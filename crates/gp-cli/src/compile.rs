use std::time::Instant;

use gp_compiler::{
    build_domain_set, build_fast_pac, build_precise_pac, combine_lists, decode_gfwlist,
    filter_precise_rules, parse_rules, reduce_domains, DomainSet, BUILTIN_RULES,
};
use gp_core::psl::{Reduction, SuffixSet};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::fetch;

/// Raw rule text gathered before compilation.
#[derive(Debug, Clone)]
pub struct RuleSources {
    pub gfwlist: String,
    pub builtin: String,
    pub user: Option<String>,
}

impl RuleSources {
    /// Fetch the primary list and user rules named by the config.
    pub fn fetch(config: &Config) -> Result<Self> {
        let gfwlist = fetch(&config.input)?;
        let user = config.user_rule.as_ref().map(fetch).transpose()?;

        Ok(Self {
            gfwlist,
            builtin: BUILTIN_RULES.to_string(),
            user,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompileStats {
    pub lines: usize,
    pub hostnames: usize,
    pub skipped: usize,
    pub invalid: usize,
    pub domains_before: usize,
    pub domains_after: usize,
    pub deduped: usize,
    pub precise_rules: usize,
    pub total_ms: f64,
}

/// Parse, reduce and deduplicate every rule into a domain set.
pub fn compile_domain_set(
    sources: &RuleSources,
    suffixes: &SuffixSet,
    reduction: Reduction,
) -> Result<(DomainSet, CompileStats)> {
    let start = Instant::now();

    let gfwlist = decode_gfwlist(&sources.gfwlist)?;
    let lines = combine_lists(&gfwlist, &sources.builtin, sources.user.as_deref());

    let (hosts, parse_stats) = parse_rules(lines);
    let reduced = reduce_domains(&hosts, suffixes, reduction);
    let (domains, set_stats) = build_domain_set(reduced);

    let stats = CompileStats {
        lines: parse_stats.lines,
        hostnames: parse_stats.hosts,
        skipped: parse_stats.skipped(),
        invalid: parse_stats.invalid,
        domains_before: set_stats.before,
        domains_after: set_stats.after,
        deduped: set_stats.deduped,
        precise_rules: 0,
        total_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    Ok((domains, stats))
}

/// Fast mode: embed a domain lookup table into the template.
pub fn compile_fast_pac(
    config: &Config,
    sources: &RuleSources,
    suffixes: &SuffixSet,
    template: &str,
) -> Result<(String, CompileStats)> {
    let start = Instant::now();

    let (domains, mut stats) = compile_domain_set(sources, suffixes, config.reduction)?;
    let pac = build_fast_pac(template, &config.proxy, &domains, config.json_style())?;

    stats.total_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok((pac, stats))
}

/// Precise mode: embed the filtered rule list for an Adblock-style engine.
pub fn compile_precise_pac(config: &Config, sources: &RuleSources, template: &str) -> Result<(String, CompileStats)> {
    let start = Instant::now();

    let gfwlist = decode_gfwlist(&sources.gfwlist)?;
    let lines = combine_lists(&gfwlist, &sources.builtin, sources.user.as_deref());
    let line_count = lines.len();

    let rules = filter_precise_rules(lines);
    log::info!("keeping {} of {} lines for precise matching", rules.len(), line_count);

    let pac = build_precise_pac(template, &config.proxy, &rules, config.json_style())?;

    let stats = CompileStats {
        lines: line_count,
        skipped: line_count - rules.len(),
        precise_rules: rules.len(),
        total_ms: start.elapsed().as_secs_f64() * 1000.0,
        ..CompileStats::default()
    };

    Ok((pac, stats))
}
