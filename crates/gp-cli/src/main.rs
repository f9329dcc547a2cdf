//! gfwpac CLI
//!
//! Converts gfwlist into a proxy auto-config (PAC) script.

mod compile;
mod config;
mod error;
mod fetch;
mod logging;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gp_compiler::builder::FAST_TEMPLATE;
use gp_core::psl::Reduction;

use crate::compile::{compile_domain_set, compile_fast_pac, compile_precise_pac, RuleSources};
use crate::config::{
    Config, Source, DEFAULT_OUTPUT, DEFAULT_PRECISE_TEMPLATE, DEFAULT_PROXY, DEFAULT_SUFFIX_CACHE, GFWLIST_URL,
    PUBLIC_SUFFIX_URL,
};
use crate::error::Result;
use crate::fetch::{load_suffixes, read_text, write_atomic};

#[derive(Parser)]
#[command(name = "gfwpac")]
#[command(about = "Generate a proxy auto-config script from gfwlist")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a PAC script
    Generate {
        #[command(flatten)]
        rules: RuleArgs,

        /// Output PAC file
        #[arg(short = 'f', long = "file", visible_alias = "output", default_value = DEFAULT_OUTPUT)]
        file: PathBuf,

        /// Proxy directive used for matched hosts, e.g. "SOCKS5 127.0.0.1:1080;"
        #[arg(short, long, default_value = DEFAULT_PROXY)]
        proxy: String,

        /// Embed the raw rules for an Adblock Plus engine instead of an O(1) domain lookup
        #[arg(long)]
        precise: bool,

        /// PAC template (defaults to the bundled template, or resources/abp.js with --precise)
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Print the reduced domain set as a JSON array
    Domains {
        #[command(flatten)]
        rules: RuleArgs,

        /// Write to a file instead of stdout
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RuleArgs {
    /// gfwlist path or URL (plain or base64-encoded)
    #[arg(short, long, default_value = GFWLIST_URL)]
    input: String,

    /// User rule file or URL, appended after gfwlist and the builtin rules
    #[arg(long)]
    user_rule: Option<String>,

    /// Public suffix list path or URL
    #[arg(long, default_value = PUBLIC_SUFFIX_URL)]
    suffix_list: String,

    /// Cached, normalized copy of the public suffix list
    #[arg(long, default_value = DEFAULT_SUFFIX_CACHE)]
    suffix_cache: PathBuf,

    /// Download the public suffix list even if a cached copy exists
    #[arg(long)]
    force_refresh: bool,

    /// How hostnames are collapsed against the public suffix list
    #[arg(long, value_enum, default_value_t = ReductionArg::SuffixChain)]
    reduction: ReductionArg,

    /// Indent embedded JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReductionArg {
    /// Longest suffix that is itself a public suffix
    SuffixChain,
    /// Public suffix plus one label (eTLD+1)
    Registrable,
}

impl From<ReductionArg> for Reduction {
    fn from(arg: ReductionArg) -> Self {
        match arg {
            ReductionArg::SuffixChain => Reduction::SuffixChain,
            ReductionArg::Registrable => Reduction::Registrable,
        }
    }
}

impl RuleArgs {
    fn into_config(self) -> Config {
        Config {
            input: Source::parse(&self.input),
            user_rule: self.user_rule.as_deref().map(Source::parse),
            suffix_list: Source::parse(&self.suffix_list),
            suffix_cache: self.suffix_cache,
            force_refresh_suffixes: self.force_refresh,
            reduction: self.reduction.into(),
            pretty: self.pretty,
            ..Config::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = logging::init(cli.verbose, cli.quiet).and_then(|()| match cli.command {
        Commands::Generate {
            rules,
            file,
            proxy,
            precise,
            template,
        } => {
            let config = Config {
                output: file,
                proxy,
                precise,
                template,
                ..rules.into_config()
            };
            cmd_generate(&config)
        }
        Commands::Domains { rules, file } => cmd_domains(&rules.into_config(), file),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_generate(config: &Config) -> Result<()> {
    let sources = RuleSources::fetch(config)?;

    let (pac, stats) = if config.precise {
        let template_path = config
            .template
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PRECISE_TEMPLATE));
        let template = read_text(&template_path)?;
        compile_precise_pac(config, &sources, &template)?
    } else {
        let template = match &config.template {
            Some(path) => read_text(path)?,
            None => FAST_TEMPLATE.to_string(),
        };
        let suffixes = load_suffixes(config)?;
        compile_fast_pac(config, &sources, &suffixes, &template)?
    };

    write_atomic(&config.output, &pac)?;

    println!("Wrote '{}' from {}", config.output.display(), config.input);
    println!("  Lines:    {} ({} skipped, {} invalid)", stats.lines, stats.skipped, stats.invalid);
    if config.precise {
        println!("  Rules:    {}", stats.precise_rules);
    } else {
        println!("  Hosts:    {}", stats.hostnames);
        println!(
            "  Domains:  {} -> {} (dedupe removed {})",
            stats.domains_before, stats.domains_after, stats.deduped
        );
    }
    println!("  Size:     {} bytes ({:.1} KB)", pac.len(), pac.len() as f64 / 1024.0);
    println!("  Time:     {:.1}ms", stats.total_ms);

    Ok(())
}

fn cmd_domains(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let sources = RuleSources::fetch(config)?;
    let suffixes = load_suffixes(config)?;
    let (domains, stats) = compile_domain_set(&sources, &suffixes, config.reduction)?;

    let list: Vec<&str> = domains.iter().collect();
    let json = if config.pretty {
        serde_json::to_string_pretty(&list)?
    } else {
        serde_json::to_string(&list)?
    };

    match file {
        Some(path) => {
            write_atomic(&path, &json)?;
            log::info!("wrote {} domains to '{}'", stats.domains_after, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").map_err(|e| gp_core::Error::io("Failed to write to stdout", e))?;
        }
    }

    Ok(())
}
