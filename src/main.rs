use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueHint};
use jane::{ConvertOptions, convert, inspect_data, inspect_file};
use jane_config::{Config, EditorConfigResolver};
use jane_format::{Charset, LineEnding};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "jane - Inspect and convert the on-disk format of text files",
    long_about = None
)]
struct Args {
    /// Configuration file to use instead of the discovered ones
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the detected encoding, line ending and indentation of files
    Inspect {
        /// Files to inspect; standard input when empty
        #[arg(value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
    /// Rewrite a file in another format
    Convert {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Target encoding, e.g. utf-8, utf-8-sig, utf-16-le, windows-1252
        /// (`jane config --encodings` lists them)
        #[arg(short, long, value_parser = parse_charset)]
        encoding: Option<Charset>,

        /// Target line ending: crlf, lf or cr
        #[arg(short, long, value_parser = parse_line_ending)]
        line_ending: Option<LineEnding>,

        /// Target indentation: 0 for tabs, 1 to 8 for spaces
        #[arg(short, long)]
        indent: Option<usize>,

        /// Write here instead of overwriting the input
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config {
        /// Write a configuration file with default settings to this path
        #[arg(long, value_hint = ValueHint::FilePath)]
        init: Option<PathBuf>,

        /// List the encodings that can be picked by name
        #[arg(long, conflicts_with = "init")]
        encodings: bool,
    },
}

fn parse_charset(label: &str) -> Result<Charset, String> {
    Charset::resolve(label).ok_or_else(|| format!("unknown encoding '{}'", label))
}

fn parse_line_ending(name: &str) -> Result<LineEnding, String> {
    LineEnding::from_name(name).ok_or_else(|| format!("expected crlf, lf or cr, got '{}'", name))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Error reading config '{}'", path.display())),
        None => Config::load().context("Failed to load configuration"),
    }
}

fn inspect(config: &Config, files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read standard input")?;
        println!("{}", inspect_data(config, &bytes));
        return Ok(());
    }

    let styles = EditorConfigResolver::new();
    for file in files {
        println!("{}", inspect_file(config, file, &styles)?);
    }
    Ok(())
}

fn show_config(config: &Config, init: Option<&Path>, encodings: bool) -> Result<()> {
    if let Some(path) = init {
        Config::create_default_config(path)
            .with_context(|| format!("Error writing config '{}'", path.display()))?;
        println!("wrote default configuration to {}", path.display());
        return Ok(());
    }
    if encodings {
        for charset in Charset::common() {
            println!("{}", charset);
        }
        return Ok(());
    }

    print!("{}", config.to_ini_string());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    log::debug!("configuration sources: {:?}", config.sources);

    match args.command {
        Command::Inspect { files } => inspect(&config, &files),
        Command::Convert { file, encoding, line_ending, indent, output } => {
            let options = ConvertOptions { encoding, line_ending, indent, output };
            let report = convert(&config, &file, &options, &EditorConfigResolver::new())?;
            println!("{}", report);
            Ok(())
        }
        Command::Config { init, encodings } => show_config(&config, init.as_deref(), encodings),
    }
}
