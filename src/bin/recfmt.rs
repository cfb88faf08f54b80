//! CLI tool to decode, encode and inspect fixed-width record files.
//!
//! Usage:
//!   recfmt decode <record.layout> [input.data] [--date-layout %d%m%Y]
//!   recfmt encode <record.layout> --set name=value [--set ...]
//!   recfmt describe <record.layout>
//!
//! Layout files list one field per line: `<name> <kind> [directive]`.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::process;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use fixedrec::{DEFAULT_DATE_LAYOUT, DecodeError, Decoder, DecoderOptions, DynRecord, Layout};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Decode, encode and inspect fixed-width record files.
#[derive(Parser)]
#[command(name = "recfmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log codec activity on stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Decode every line of a data file
    Decode {
        /// Layout file
        layout: String,

        /// Input data file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// chrono format for date fields
        #[arg(long, default_value = DEFAULT_DATE_LAYOUT)]
        date_layout: String,
    },
    /// Encode one record from field values
    Encode {
        /// Layout file
        layout: String,

        /// Field value as name=value (repeatable)
        #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
        values: Vec<String>,
    },
    /// Print the column map of a layout
    Describe {
        /// Layout file
        layout: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Command::Decode {
            layout,
            input,
            date_layout,
        } => run_decode(layout, input, date_layout),
        Command::Encode { layout, values } => run_encode(layout, values),
        Command::Describe { layout } => run_describe(layout),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn load_layout(path: &str) -> Result<Rc<Layout>, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("reading layout file '{path}': {e}"))?;
    let layout = Layout::parse(&text).map_err(|e| format!("{path}: {e}"))?;
    Ok(Rc::new(layout))
}

/// Returns `Ok(false)` if any line failed to decode.
fn run_decode(layout_path: &str, input: &str, date_layout: &str) -> Result<bool, String> {
    let layout = load_layout(layout_path)?;
    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input).map_err(|e| format!("opening input file '{input}': {e}"))?;
        Box::new(BufReader::new(file))
    };

    let options = DecoderOptions::new().with_date_layout(date_layout);
    let mut decoder = Decoder::with_options(reader, options);
    let mut stdout = io::stdout().lock();
    let (mut decoded, mut failed) = (0usize, 0usize);

    loop {
        let mut record = DynRecord::new(Rc::clone(&layout));
        match decoder.decode(&mut record) {
            Ok(()) => decoded += 1,
            Err(e) if e.is_exhausted() => break,
            Err(e) if e.is_end_of_input() => {
                failed += 1;
                eprintln!("line {}: {e}", decoder.line_number() + 1);
                break;
            }
            Err(DecodeError::Fields(errors)) => {
                failed += 1;
                for error in &errors {
                    eprintln!("line {}: {error}", decoder.line_number());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("line {}: {e}", decoder.line_number());
                continue;
            }
        }

        let fields: Vec<String> = record
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        writeln!(stdout, "{}", fields.join("  ")).map_err(|e| format!("writing output: {e}"))?;
    }

    info!(decoded, failed, "decode finished");
    Ok(failed == 0)
}

fn run_encode(layout_path: &str, values: &[String]) -> Result<bool, String> {
    let layout = load_layout(layout_path)?;
    let mut record = DynRecord::new(layout);

    for pair in values {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{pair}'"))?;
        record.set_str(name, value)?;
        debug!(field = name, value, "set field");
    }

    let line = fixedrec::encode(&record).map_err(|e| e.to_string())?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&line)
        .and_then(|_| writeln!(stdout))
        .map_err(|e| format!("writing output: {e}"))?;
    Ok(true)
}

fn run_describe(layout_path: &str) -> Result<bool, String> {
    let layout = load_layout(layout_path)?;
    println!("{:<16} {:<8} {:>5} {:>5}  directive", "field", "kind", "start", "width");
    for (field, column) in layout.columns() {
        let width = column
            .width
            .map_or_else(|| "rest".to_string(), |w| w.to_string());
        println!(
            "{:<16} {:<8} {:>5} {:>5}  {}",
            field.name,
            field.kind.to_string(),
            column.start,
            width,
            field.directive
        );
    }
    Ok(true)
}
