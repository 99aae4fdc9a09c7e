//! `peel` — recover plaintext from an unknown stack of encodings and
//! classical ciphers.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use peel_analysis::{ConfirmPort, DenyAll};
use peel_codecs::builtin_catalog;
use peel_search::{render_chain, DecodeCache, SearchEngine, SearchOutcome};

mod config;
mod confirm;

use config::{load_wordlist, ConfigError, ConfigFile};
use confirm::StdinConfirm;

#[derive(Parser)]
#[command(name = "peel")]
#[command(version, about = "Automatically decode multi-layer encoded text", long_about = None)]
struct Cli {
    /// Text to decode
    #[arg(short = 't', long, value_name = "TEXT", conflicts_with = "file")]
    text: Option<String>,

    /// Read input from a file (stdin when neither -t nor -f is given)
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Verbose output (repeat for more detail)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet: no logging, no interactive prompts
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Greppable: print only the recovered plaintext
    #[arg(short = 'g', long)]
    greppable: bool,

    /// Checker selection, comma-separated (quadgram, script, dictionary)
    #[arg(short = 'C', long, value_name = "CHECKERS", value_delimiter = ',')]
    checker: Option<Vec<String>>,

    /// Configuration file (JSON)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wordlist of candidate keys for keyed ciphers
    #[arg(short = 'w', long, value_name = "FILE")]
    wordlist: Option<PathBuf>,

    /// List decoders, priorities, and parameters, then exit
    #[arg(short = 'l', long)]
    list: bool,

    /// Search ordering: astar (best-first) or bfs
    #[arg(long, value_name = "SEARCHER", default_value = "astar")]
    searcher: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("peel: {err}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Off
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode, ConfigError> {
    let config = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let wordlist = cli.wordlist.as_deref().map(load_wordlist).transpose()?;
    let mut catalog = builtin_catalog(wordlist);
    config.apply_to_catalog(&mut catalog)?;

    if cli.list {
        println!("{:#}", catalog.listing());
        return Ok(ExitCode::SUCCESS);
    }

    let confirm: Arc<dyn ConfirmPort> = if cli.quiet || cli.greppable {
        Arc::new(DenyAll)
    } else {
        Arc::new(StdinConfirm)
    };
    let checkers = config.build_checkers(cli.checker.as_deref(), confirm)?;
    let policy = config.build_policy(&cli.searcher)?;

    let input = read_input(cli)?;
    let input = input.trim_end_matches(['\n', '\r']);

    let cache = DecodeCache::new();
    let engine = SearchEngine::new(&catalog, &checkers, &policy, &cache);
    let report = match engine.run(input) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("peel: {err}");
            return Ok(ExitCode::from(2));
        }
    };

    match &report.outcome {
        SearchOutcome::Found(found) => {
            println!("{}", found.plaintext);
            if cli.verbose > 0 && !cli.greppable {
                let chain = if found.chain.is_empty() {
                    "(input was already plaintext)".to_string()
                } else {
                    render_chain(&found.chain)
                };
                eprintln!("chain: {chain}");
                eprintln!(
                    "checker: {} (confidence {:.2}); {} nodes, {} expansions, cache {}/{} hits",
                    found.checker,
                    found.confidence,
                    report.nodes.len(),
                    report.expanded.len(),
                    report.cache.hits,
                    report.cache.hits + report.cache.misses,
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        SearchOutcome::Exhausted { best_guess, reason } => {
            if !cli.greppable {
                eprintln!("no confident decoding found ({})", reason.as_str());
            }
            if let Some(guess) = best_guess {
                if cli.greppable {
                    println!("{}", guess.text);
                } else {
                    eprintln!(
                        "best guess (confidence {:.2}, chain [{}]):",
                        guess.confidence,
                        render_chain(&guess.chain)
                    );
                    println!("{}", guess.text);
                }
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn read_input(cli: &Cli) -> Result<String, ConfigError> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            detail: e.to_string(),
        });
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| ConfigError::Io {
            path: "<stdin>".to_string(),
            detail: e.to_string(),
        })?;
    Ok(buffer)
}
