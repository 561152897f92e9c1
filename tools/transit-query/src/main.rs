use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::Level;

use transit_catalog::requests::{process_document, process_lines};
use transit_catalog::value::WriteOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Protocol {
    /// Structured document with base_requests / stat_requests
    Document,
    /// Legacy line-oriented text
    Lines,
}

#[derive(Parser, Debug)]
#[command(
    name = "transit-query",
    author,
    version,
    about = "Answer bus and stop queries over a transit catalog request",
    long_about = "Reads a whole request (stops, bus routes and queries), builds the catalog \
                  and writes one answer per query.\n\n\
                  Route lengths use recorded road distances when every leg has one, \
                  great-circle distances otherwise."
)]
struct Args {
    /// Request protocol, also used for the response
    #[arg(short, long, value_enum, default_value_t = Protocol::Document)]
    protocol: Protocol,

    /// Request file (standard input when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Response file (standard output when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the response document
    #[arg(long)]
    pretty: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr, stdout carries the response
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            tracing::info!("Input: {}", path.display());
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => {
            tracing::info!("Output: {}", path.display());
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    run(&args, input, &mut output)?;
    output.flush().context("Failed to flush response")?;
    Ok(())
}

fn run(args: &Args, input: impl BufRead, output: &mut impl Write) -> Result<()> {
    match args.protocol {
        Protocol::Document => {
            let options = WriteOptions {
                pretty: args.pretty,
                ..WriteOptions::default()
            };
            process_document(input, output, &options).context("Failed to process request document")
        }
        Protocol::Lines => {
            if args.pretty {
                bail!("--pretty only applies to the document protocol");
            }
            process_lines(input, output).context("Failed to process line requests")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(argv: &[&str], input: &str) -> Result<String> {
        let args = Args::try_parse_from(argv)?;
        let mut output = Vec::new();
        run(&args, input.as_bytes(), &mut output)?;
        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn test_default_arguments() {
        let args = Args::try_parse_from(["transit-query"]).unwrap();
        assert_eq!(args.protocol, Protocol::Document);
        assert!(args.input.is_none());
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["transit-query", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_document_protocol() {
        let input = r#"{
          "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0, "road_distances": {"B": 1000}},
            {"type": "Stop", "name": "B", "latitude": 55.005, "longitude": 37.0},
            {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
          ],
          "stat_requests": [{"type": "Stop", "name": "B", "id": 9}, {"type": "Bus", "name": "2", "id": 10}]
        }"#;

        let output = run_with(&["transit-query"], input).unwrap();
        assert_eq!(
            output,
            "[{\"buses\":[\"1\"],\"request_id\":9},{\"error_message\":\"not found\",\"request_id\":10}]\n"
        );
    }

    #[test]
    fn test_lines_protocol() {
        let input = "2\nStop A: 55.0, 37.0\nBus 1: A > A\n2\nStop A\nBus 1\n";

        let output = run_with(&["transit-query", "--protocol", "lines"], input).unwrap();
        assert_eq!(output, "Stop A: buses 1\nBus 1: 2 stops on route, 1 unique stops, 0 route length\n");
    }

    #[test]
    fn test_pretty_rejected_for_lines() {
        assert!(run_with(&["transit-query", "--protocol", "lines", "--pretty"], "0\n0\n").is_err());
    }

    #[test]
    fn test_fatal_errors_propagate() {
        let err = run_with(&["transit-query"], "{\"base_requests\": [").unwrap_err();
        assert!(format!("{:#}", err).contains("Parse error"));
    }
}
