//! colorcode - color coding for flashcard HTML
//!
//! Command-line front end: annotate HTML files, run over exported notes,
//! preview results in the terminal and maintain the term dictionary.

use std::fs;
use std::io::{self, Read, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use colorcode::batch::{self, BatchOptions, BatchReport};
use colorcode::config::Config;
use colorcode::dictionary::TermTable;
use colorcode::engine::{strip_annotations, Annotator, ColoringOptions, CompiledMatcher};
use colorcode::error::{ColorCodeError, Result};
use colorcode::preview;

#[derive(Parser)]
#[command(name = "colorcode", version, about = "Color-code dictionary terms in flashcard HTML")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of ~/.colorcode.toml
    #[arg(long, global = true, env = "COLORCODE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DictArg {
    /// Term dictionary (JSON array of {word, group, color})
    #[arg(short, long, value_name = "PATH")]
    dict: Option<PathBuf>,
}

#[derive(Args)]
struct OptionArgs {
    /// Match whole words only
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    whole_words: Option<bool>,

    /// Ignore letter case when matching
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    case_insensitive: Option<bool>,

    /// Make matches bold
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    bold: Option<bool>,

    /// Make matches italic
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    italic: Option<bool>,

    /// Also match plural forms of a term's last word
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    bold_plurals: Option<bool>,

    /// Color matches (turn off to decolor)
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    colorize: Option<bool>,

    /// Remember these options in the config file
    #[arg(long)]
    save_options: bool,
}

impl OptionArgs {
    fn apply(&self, base: ColoringOptions) -> ColoringOptions {
        ColoringOptions {
            whole_words: self.whole_words.unwrap_or(base.whole_words),
            case_insensitive: self.case_insensitive.unwrap_or(base.case_insensitive),
            bold: self.bold.unwrap_or(base.bold),
            italic: self.italic.unwrap_or(base.italic),
            bold_plurals: self.bold_plurals.unwrap_or(base.bold_plurals),
            colorize: self.colorize.unwrap_or(base.colorize),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Annotate HTML files (or stdin) with the dictionary's colors
    Annotate {
        /// Files to annotate; reads stdin when none are given
        files: Vec<PathBuf>,
        /// Rewrite changed files instead of printing them
        #[arg(long)]
        in_place: bool,
        #[command(flatten)]
        dict: DictArg,
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Remove every annotation wrapper
    Strip {
        files: Vec<PathBuf>,
        #[arg(long)]
        in_place: bool,
    },

    /// Color all fields of notes exported from the flashcard host
    Batch {
        /// Notes file (JSON)
        notes: PathBuf,
        /// Only notes in this deck (repeatable)
        #[arg(long = "deck", value_name = "NAME")]
        decks: Vec<String>,
        /// Do not descend into subdecks
        #[arg(long)]
        no_subdecks: bool,
        /// Leave cloze notes alone (overrides `skip_cloze` in the config)
        #[arg(
            long,
            value_name = "BOOL",
            num_args = 0..=1,
            default_missing_value = "true",
            value_parser = BoolishValueParser::new()
        )]
        skip_cloze: Option<bool>,
        /// Refuse to run on more notes than this
        #[arg(long, value_name = "N")]
        max_notes: Option<usize>,
        /// Write results here instead of back to the notes file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        #[command(flatten)]
        dict: DictArg,
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Annotate a file (or stdin) and show the result in the terminal
    Preview {
        file: Option<PathBuf>,
        #[command(flatten)]
        dict: DictArg,
        #[command(flatten)]
        options: OptionArgs,
    },

    /// Show the dictionary with color swatches
    List {
        #[command(flatten)]
        dict: DictArg,
    },

    /// Append entries from another dictionary, keeping existing words
    Merge {
        /// Dictionary to take new words from
        incoming: PathBuf,
        #[command(flatten)]
        dict: DictArg,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("colorcode={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Annotate {
            files,
            in_place,
            dict,
            options,
        } => {
            let opts = effective_options(&mut config, cli.config.as_deref(), &options)?;
            let table = load_dictionary(dict.dict.as_deref(), &config)?;
            annotate_files(&files, in_place, &table, &opts)
        }
        Command::Strip { files, in_place } => strip_files(&files, in_place),
        Command::Batch {
            notes,
            decks,
            no_subdecks,
            skip_cloze,
            max_notes,
            output,
            dict,
            options,
        } => {
            let opts = effective_options(&mut config, cli.config.as_deref(), &options)?;
            let table = load_dictionary(dict.dict.as_deref(), &config)?;
            let batch_opts = BatchOptions {
                decks,
                include_subdecks: !no_subdecks,
                skip_cloze: skip_cloze.unwrap_or(config.skip_cloze),
                max_notes,
            };
            run_batch(&notes, output.as_deref(), &table, &opts, &batch_opts)
        }
        Command::Preview {
            file,
            dict,
            options,
        } => {
            let opts = effective_options(&mut config, cli.config.as_deref(), &options)?;
            let table = load_dictionary(dict.dict.as_deref(), &config)?;
            let matcher = CompiledMatcher::compile(&table, &opts)?;
            let html = read_input(file.as_deref())?;
            let out = Annotator::new(&matcher, &opts).apply(&html);
            preview::print_fragment(&mut io::stdout(), &preview::render_fragment(&out.html))?;
            eprintln!("{} replacement(s)", out.replacements);
            Ok(())
        }
        Command::List { dict } => {
            let table = load_dictionary(dict.dict.as_deref(), &config)?;
            preview::print_table(&mut io::stdout(), &table)
        }
        Command::Merge { incoming, dict } => {
            let path = dictionary_path(dict.dict.as_deref(), &config)?;
            merge_dictionary(&path, &incoming)
        }
    }
}

/// Config options overridden by the command line, saved on request
fn effective_options(
    config: &mut Config,
    config_path: Option<&Path>,
    args: &OptionArgs,
) -> Result<ColoringOptions> {
    let opts = args.apply(config.options);
    if args.save_options {
        config.options = opts;
        match config_path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
    }
    Ok(opts)
}

fn dictionary_path(arg: Option<&Path>, config: &Config) -> Result<PathBuf> {
    arg.map(Path::to_path_buf)
        .or_else(|| config.dictionary.clone())
        .ok_or_else(|| {
            ColorCodeError::Message(
                "no dictionary given; pass --dict or set `dictionary` in the config".to_string(),
            )
        })
}

fn load_dictionary(arg: Option<&Path>, config: &Config) -> Result<TermTable> {
    let path = dictionary_path(arg, config)?;
    let loaded = TermTable::load(&path)?;
    if loaded.dropped > 0 {
        warn!(
            "{}: skipped {} record(s) without a word or color",
            path.display(),
            loaded.dropped
        );
    }
    if loaded.table.is_empty() {
        warn!("{}: dictionary is empty, nothing will be colored", path.display());
    }
    Ok(loaded.table)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Apply `f` to each file (or stdin), writing back or printing
fn rewrite_files<F>(files: &[PathBuf], in_place: bool, mut f: F) -> Result<usize>
where
    F: FnMut(&str) -> String,
{
    let mut stdout = io::stdout().lock();
    if files.is_empty() {
        let input = read_input(None)?;
        stdout.write_all(f(&input).as_bytes())?;
        return Ok(0);
    }

    let mut changed = 0;
    for path in files {
        let original = fs::read_to_string(path)?;
        let updated = f(&original);
        if in_place {
            if updated != original {
                fs::write(path, &updated)?;
                changed += 1;
            }
        } else {
            stdout.write_all(updated.as_bytes())?;
        }
    }
    Ok(changed)
}

fn annotate_files(
    files: &[PathBuf],
    in_place: bool,
    table: &TermTable,
    opts: &ColoringOptions,
) -> Result<()> {
    let matcher = CompiledMatcher::compile(table, opts)?;
    let annotator = Annotator::new(&matcher, opts);
    let mut replacements = 0;
    let changed = rewrite_files(files, in_place, |html| {
        let out = annotator.apply(html);
        replacements += out.replacements;
        out.html
    })?;

    if in_place {
        eprintln!("{} file(s) changed, {} replacement(s)", changed, replacements);
    } else {
        eprintln!("{} replacement(s)", replacements);
    }
    Ok(())
}

fn strip_files(files: &[PathBuf], in_place: bool) -> Result<()> {
    let changed = rewrite_files(files, in_place, |html| strip_annotations(html).into_owned())?;
    if in_place {
        eprintln!("{} file(s) changed", changed);
    }
    Ok(())
}

fn run_batch(
    notes_path: &Path,
    output: Option<&Path>,
    table: &TermTable,
    opts: &ColoringOptions,
    batch_opts: &BatchOptions,
) -> Result<()> {
    let mut notes = batch::load_notes(notes_path)?;
    let report = batch::run(&mut notes, table, opts, batch_opts, |_| ControlFlow::Continue(()))?;
    batch::save_notes(output.unwrap_or(notes_path), &notes)?;
    print_report(batch_opts, &report);
    Ok(())
}

fn print_report(batch_opts: &BatchOptions, report: &BatchReport) {
    let decks = if batch_opts.decks.is_empty() {
        "(all)".to_string()
    } else {
        batch_opts.decks.join(", ")
    };
    println!("Color coding complete.");
    println!();
    println!("Decks: {}", decks);
    println!(
        "Include subdecks: {}",
        if batch_opts.include_subdecks { "Yes" } else { "No" }
    );
    println!("Notes scanned: {}", report.notes_seen);
    println!("Notes modified: {}", report.notes_modified);
    println!("Total replacements: {}", report.total_replacements);
}

fn merge_dictionary(path: &Path, incoming_path: &Path) -> Result<()> {
    let mut table = if path.exists() {
        TermTable::load(path)?.table
    } else {
        TermTable::new()
    };
    let incoming = TermTable::load(incoming_path)?.table;

    let report = table.merge(incoming.entries().iter().cloned());
    table.save(path)?;

    println!(
        "Appended {} new entr{}.",
        report.added,
        if report.added == 1 { "y" } else { "ies" }
    );
    println!(
        "Skipped {} duplicate{}.",
        report.skipped,
        if report.skipped == 1 { "" } else { "s" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skip_cloze_arg(args: &[&str]) -> Option<bool> {
        let argv = ["colorcode", "batch", "notes.json"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Batch { skip_cloze, .. } => skip_cloze,
            _ => panic!("expected batch"),
        }
    }

    #[test]
    fn test_skip_cloze_flag_forms() {
        assert_eq!(skip_cloze_arg(&[]), None);
        assert_eq!(skip_cloze_arg(&["--skip-cloze"]), Some(true));
        assert_eq!(skip_cloze_arg(&["--skip-cloze", "false"]), Some(false));
        assert_eq!(skip_cloze_arg(&["--skip-cloze=no"]), Some(false));
    }

    #[test]
    fn test_skip_cloze_overrides_config() {
        let config = Config {
            skip_cloze: true,
            ..Default::default()
        };
        assert!(!skip_cloze_arg(&["--skip-cloze", "false"]).unwrap_or(config.skip_cloze));
        assert!(skip_cloze_arg(&[]).unwrap_or(config.skip_cloze));
    }

    #[test]
    fn test_option_overrides() {
        let cli = Cli::try_parse_from(["colorcode", "annotate", "--bold", "off", "--italic", "yes"]).unwrap();
        let Command::Annotate { options, .. } = cli.command else {
            panic!("expected annotate");
        };
        let opts = options.apply(ColoringOptions::default());
        assert!(!opts.bold);
        assert!(opts.italic);
        assert!(opts.whole_words);
    }
}
