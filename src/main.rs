//! # charset-stream CLI
//!
//! Streams files between character sets using the charset catalog.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use charset_stream::Charsets;

/// charset-stream: convert text between character sets
#[derive(Parser)]
#[command(name = "charset-stream")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Directory holding charsets.json and the code tables
    #[arg(long, global = true, env = "CHARSET_STREAM_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file from one character set to another
    Convert(ConvertArgs),

    /// List all known character sets
    List(ListArgs),

    /// Display information about a character set
    Info(InfoArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Source character set
    #[arg(short = 'f', long = "from", default_value = "utf-8")]
    from: String,

    /// Target character set
    #[arg(short = 't', long = "to", default_value = "utf-8")]
    to: String,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Buffer size for reading and writing (KB)
    #[arg(long, default_value = "64")]
    buffer_size: usize,
}

#[derive(Args)]
struct ListArgs {
    /// Show aliases and descriptions
    #[arg(long)]
    details: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Character set name or alias
    charset: String,
}

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ConversionResult {
    success: bool,
    from: String,
    to: String,
    bytes_written: u64,
    processing_time_ms: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = Charsets::builder();
    if let Some(ref dir) = cli.data_dir {
        builder = builder.data_dir(dir);
    }
    let charsets = builder.build();

    match cli.command {
        Commands::Convert(ref args) => convert_command(&charsets, args, &cli)?,
        Commands::List(ref args) => list_command(&charsets, args, &cli)?,
        Commands::Info(ref args) => info_command(&charsets, args, &cli)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn convert_command(charsets: &Charsets, args: &ConvertArgs, cli: &Cli) -> Result<()> {
    let start_time = Instant::now();
    let buffer_size = args.buffer_size.max(1) * 1024;

    if cli.verbose {
        eprintln!("Converting from {} to {}", args.from, args.to);
    }

    let input: Box<dyn Read> = match args.input {
        Some(ref path) => Box::new(
            File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match args.output {
        Some(ref path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut reader = charsets
        .new_reader(&args.from, BufReader::with_capacity(buffer_size, input))
        .with_context(|| format!("Cannot decode from {}", args.from))?;
    let mut writer = charsets
        .new_writer(&args.to, BufWriter::with_capacity(buffer_size, output))
        .with_context(|| format!("Cannot encode to {}", args.to))?;

    let bytes_written = io::copy(&mut reader, &mut writer).context("Conversion failed")?;
    writer.close().context("Failed to flush output")?;

    let processing_time = start_time.elapsed();
    if cli.verbose {
        eprintln!(
            "Converted {} bytes of UTF-8 in {:?}",
            bytes_written, processing_time
        );
    }

    if let OutputFormat::Json = cli.format {
        let result = ConversionResult {
            success: true,
            from: args.from.clone(),
            to: args.to.clone(),
            bytes_written,
            processing_time_ms: processing_time.as_millis() as u64,
        };
        eprintln!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

fn list_command(charsets: &Charsets, args: &ListArgs, cli: &Cli) -> Result<()> {
    let infos: Vec<_> = charsets
        .names()
        .iter()
        .filter_map(|name| charsets.info(name))
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let list: Vec<_> = infos.iter().map(|info| info.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        OutputFormat::Text => {
            println!("Known character sets ({} total):", infos.len());
            println!();
            for info in &infos {
                println!(
                    "{:15} {:6} {}",
                    info.name,
                    format!("[{}]", info.class),
                    info.description
                );
                if args.details && !info.aliases.is_empty() {
                    println!("                Aliases: {}", info.aliases.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn info_command(charsets: &Charsets, args: &InfoArgs, cli: &Cli) -> Result<()> {
    let info = charsets
        .info(&args.charset)
        .with_context(|| format!("Unknown character set: {}", args.charset))?;
    let decoder = charsets.decoder(&info.name).is_ok();
    let encoder = charsets.encoder(&info.name).is_ok();

    match cli.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "name": info.name,
                "aliases": info.aliases,
                "description": info.description,
                "class": info.class,
                "arg": info.arg,
                "decode": decoder,
                "encode": encoder,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("Character set: {}", info.name);
            println!("Description: {}", info.description);
            if !info.aliases.is_empty() {
                println!("Aliases: {}", info.aliases.join(", "));
            }
            println!("Class: {} ({})", info.class, info.arg);
            println!("Decode: {}", if decoder { "Yes" } else { "No" });
            println!("Encode: {}", if encoder { "Yes" } else { "No" });
        }
    }

    Ok(())
}
