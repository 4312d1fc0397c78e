//! Command-line interface for EBNF grammars
//!
//! Usage:
//!   ebnf check `<grammar>` [--format text|json]             - Report diagnostics
//!   ebnf match `<grammar>` `<sample>` [--format text|json]  - Match a sample file against a grammar
//!   ebnf symbols `<grammar>`                                - List definitions, references and literals
//!   ebnf tokens `<grammar>`                                 - Dump the EBNF token stream
//!
//! Every command accepts `--config <file>`, a TOML file layered over the built-in defaults.
//! Exit status is 2 when a file or the configuration cannot be read, 1 when `check` finds errors
//! or `match` leaves part of the sample unmatched, 0 otherwise.

mod render;

use clap::{value_parser, Arg, ArgMatches, Command};
use ebnf_analysis::{match_with, Analyzer, Severity, SymbolTracker, TokenOffsetMap};
use ebnf_config::{ConfigError, EbnfConfig, Loader};
use ebnf_parser::{lex, tokenize, GrammarParser, ParseError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("grammar does not compile: {0}")]
    Grammar(#[from] ParseError),

    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();
    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn cli() -> Command {
    Command::new("ebnf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Checks EBNF grammars and matches sample text against them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("TOML file layered over the built-in defaults")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("check")
                .about("Report syntax errors, logic issues and undefined symbols")
                .arg(grammar_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("match")
                .about("Match a sample file against the grammar's first rule")
                .arg(grammar_arg())
                .arg(
                    Arg::new("sample")
                        .help("Path to the sample text")
                        .value_parser(value_parser!(PathBuf))
                        .required(true)
                        .index(2),
                )
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("symbols")
                .about("List definitions, references and literals in source order")
                .arg(grammar_arg()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Dump the token stream of a grammar")
                .arg(grammar_arg()),
        )
}

fn grammar_arg() -> Arg {
    Arg::new("grammar")
        .help("Path to the EBNF grammar")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .index(1)
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["text", "json"])
        .default_value("text")
}

fn run(matches: &ArgMatches) -> Result<ExitCode, CliError> {
    let Some((name, args)) = matches.subcommand() else {
        return Ok(ExitCode::from(2));
    };
    let config = load_config(args.get_one::<PathBuf>("config"))?;
    log::debug!("running {name} with {config:?}");

    match name {
        "check" => check(args, &config),
        "match" => match_sample(args),
        "symbols" => symbols(args),
        "tokens" => tokens(args),
        other => unreachable!("unknown subcommand {other}"),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EbnfConfig, CliError> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    Ok(loader.build()?)
}

fn check(args: &ArgMatches, config: &EbnfConfig) -> Result<ExitCode, CliError> {
    let path = grammar_path(args);
    let text = read(path)?;

    let mut diagnostics = Analyzer::new(config.analyzer_options()).analyze(&text);
    diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);

    match output_format(args) {
        Format::Json => println!("{}", serde_json::to_string_pretty(&diagnostics)?),
        Format::Text => print!(
            "{}",
            render::diagnostics(&path.display().to_string(), &text, &diagnostics)
        ),
    }

    let failed = diagnostics
        .iter()
        .any(|diagnostic| diagnostic.severity == Severity::Error);
    Ok(exit_status(failed))
}

fn match_sample(args: &ArgMatches) -> Result<ExitCode, CliError> {
    let grammar = read(grammar_path(args))?;
    let sample_path = args
        .get_one::<PathBuf>("sample")
        .expect("sample is a required argument");
    let sample = read(sample_path)?;

    let parser = GrammarParser::from_source(&grammar)?;
    log::debug!("matching against start rule '{}'", parser.start_rule());
    let report = match_with(&parser, &sample);

    match output_format(args) {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print!("{}", render::match_report(&sample, &report)),
    }
    let failed = report.unmatched().next().is_some();
    Ok(exit_status(failed))
}

fn symbols(args: &ArgMatches) -> Result<ExitCode, CliError> {
    let text = read(grammar_path(args))?;
    let offsets = TokenOffsetMap::build(&text, &lex(&text));
    let (_, tracker) = SymbolTracker::scan(&text);

    let mut found: Vec<_> = tracker
        .definitions()
        .iter()
        .chain(tracker.references())
        .chain(tracker.literals())
        .collect();
    found.sort_by_key(|symbol| symbol.start_token);

    print!("{}", render::symbols(&text, &offsets, &found));
    Ok(ExitCode::SUCCESS)
}

fn tokens(args: &ArgMatches) -> Result<ExitCode, CliError> {
    let text = read(grammar_path(args))?;
    print!("{}", render::tokens(&text, &tokenize(&text)));
    Ok(ExitCode::SUCCESS)
}

fn grammar_path(args: &ArgMatches) -> &Path {
    args.get_one::<PathBuf>("grammar")
        .expect("grammar is a required argument")
}

fn output_format(args: &ArgMatches) -> Format {
    match args.get_one::<String>("format").map(String::as_str) {
        Some("json") => Format::Json,
        _ => Format::Text,
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn exit_status(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn format_defaults_to_text() {
        let matches = cli().get_matches_from(["ebnf", "check", "g.ebnf"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(output_format(args), Format::Text);

        let matches = cli().get_matches_from(["ebnf", "match", "g.ebnf", "s.txt", "-f", "json"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(output_format(args), Format::Json);
    }

    #[test]
    fn global_config_reaches_subcommands() {
        let matches = cli().get_matches_from(["ebnf", "--config", "a.toml", "tokens", "g.ebnf"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(
            args.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("a.toml"))
        );
    }
}
