mod checker;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use nobook::{Document, Encoder, ParseError};
use notebook::{Converter, Notebook};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "nobook", version, about = "Plain source files with # @block markers as notebooks")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (defaults to ./nobook.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List block names in order
    List(ListArgs),

    /// Validate files: unique block names and a stable re-encode
    Check(CheckArgs),

    /// Rewrite a file in canonical form
    Fmt(FmtArgs),

    /// Convert a source file to notebook JSON
    ToNotebook(ConvertArgs),

    /// Convert notebook JSON back to a source file
    FromNotebook(ConvertArgs),
}

#[derive(clap::Args)]
struct ListArgs {
    /// Source file to inspect
    file: PathBuf,

    /// Also report the preamble size
    #[arg(long)]
    preamble: bool,

    /// Show the 1-based line of each marker
    #[arg(long)]
    lines: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// A source file or a directory to search for marked .py files
    path: PathBuf,
}

#[derive(clap::Args)]
struct FmtArgs {
    /// Source file to format
    file: PathBuf,

    /// Overwrite the file instead of printing to stdout
    #[arg(short, long)]
    write: bool,
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Input file
    file: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let reporter = Reporter::new(cli.no_color);

    match cli.command {
        Command::List(args) => do_list(args, &reporter),
        Command::Check(args) => {
            let encoder = Encoder::new(config.naming);
            process::exit(checker::run_checks(&args.path, cli.no_color, &encoder));
        }
        Command::Fmt(args) => do_fmt(args, &config, &reporter),
        Command::ToNotebook(args) => do_to_notebook(args, &config, &reporter),
        Command::FromNotebook(args) => do_from_notebook(args, &config),
    }
}

/// Emits source diagnostics for one input file.
struct Reporter {
    color_choice: ColorChoice,
}

impl Reporter {
    fn new(no_color: bool) -> Self {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Reporter { color_choice }
    }

    fn emit(&self, files: &SimpleFiles<String, String>, errors: &[ParseError]) {
        let writer = StandardStream::stderr(self.color_choice);
        let config = term::Config::default();
        for error in errors {
            let diagnostic = error.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
        }
    }
}

fn read_or_exit(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn write_or_exit(output: Option<&Path>, content: &str) {
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, content) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
            log::info!("wrote {}", path.display());
        }
        None => print!("{}", content),
    }
}

/// Read and strictly decode `path`, reporting a duplicate name as a diagnostic.
fn decode_or_exit(path: &Path, reporter: &Reporter) -> Document {
    let source = read_or_exit(path);
    let mut files = SimpleFiles::new();
    let file_id = files.add(path.display().to_string(), source.clone());

    match nobook::Parser::new(source, file_id).parse() {
        Ok(doc) => doc,
        Err(err) => {
            reporter.emit(&files, &[err.to_parse_error()]);
            process::exit(1);
        }
    }
}

fn do_list(args: ListArgs, reporter: &Reporter) {
    let document = decode_or_exit(&args.file, reporter);

    if args.preamble {
        println!("(preamble: {} lines)", document.preamble.len());
    }
    for block in &document.blocks {
        if args.lines {
            println!("{}\t{}", block.start_line + 1, block.name);
        } else {
            println!("{}", block.name);
        }
    }
}

fn do_fmt(args: FmtArgs, config: &Config, reporter: &Reporter) {
    let document = decode_or_exit(&args.file, reporter);
    let formatted = Encoder::new(config.naming.clone()).encode_document(&document);

    if args.write {
        if formatted == document.source() {
            log::info!("{} already formatted", args.file.display());
            return;
        }
        write_or_exit(Some(&args.file), &formatted);
    } else {
        write_or_exit(None, &formatted);
    }
}

fn do_to_notebook(args: ConvertArgs, config: &Config, reporter: &Reporter) {
    let source = read_or_exit(&args.file);
    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.display().to_string(), source.clone());

    let converter = Converter::new(config.naming.clone());
    let (notebook, warnings) = converter.to_notebook(&source, file_id);
    reporter.emit(&files, &warnings);

    match notebook.to_json() {
        Ok(json) => write_or_exit(args.output.as_deref(), &format!("{}\n", json)),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn do_from_notebook(args: ConvertArgs, config: &Config) {
    let json = read_or_exit(&args.file);
    let mut notebook = match Notebook::from_json(&json) {
        Ok(nb) => nb,
        Err(e) => {
            eprintln!("error: '{}': {}", args.file.display(), e);
            process::exit(1);
        }
    };

    let converter = Converter::new(config.naming.clone());
    for rename in converter.ensure_unique_block_names(&mut notebook) {
        match &rename.from {
            Some(from) => log::warn!("cell {}: block '{}' renamed to '{}'", rename.index, from, rename.to),
            None => log::info!("cell {}: named '{}'", rename.index, rename.to),
        }
    }

    write_or_exit(args.output.as_deref(), &converter.to_source(&notebook));
}
