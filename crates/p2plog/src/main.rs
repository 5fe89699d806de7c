mod exit;
mod logging;
mod output;
mod session;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use p2plog_wire::{Registry, StandardHashFields};
use tracing::info;

use crate::exit::{io_error, session_error, CliResult, SUCCESS};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;
use crate::session::{Direction, Session};

#[derive(Parser, Debug)]
#[command(
    name = "p2plog",
    version,
    about = "Decode binary P2P message capture files into a JSON record stream"
)]
struct Cli {
    /// Capture files to decode. A file whose name contains "recv" is
    /// tagged as received traffic, everything else as sent.
    #[arg(required = true, value_name = "FILE")]
    captures: Vec<PathBuf>,

    /// Output file. If unset print to stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: Cli) -> CliResult<i32> {
    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::default_for(cli.output.is_some()));

    let registry = Registry::standard();
    let hash_fields = StandardHashFields;
    let mut session = Session::new(&registry, &hash_fields);

    for path in &cli.captures {
        let direction = Direction::from_path(path);
        let file = File::open(path)
            .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
        session
            .add_source(BufReader::new(file), direction)
            .map_err(|err| session_error(&path.display().to_string(), err))?;
        info!(path = %path.display(), ?direction, "capture decoded");
    }

    let records = session.finish();
    output::emit(&records, cli.output.as_deref(), format)?;
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_output() {
        let cli = Cli::try_parse_from([
            "p2plog",
            "msgs_recv.dat",
            "msgs_sent.dat",
            "-o",
            "out.json",
            "--format",
            "json",
        ])
        .expect("args should parse");

        assert_eq!(cli.captures.len(), 2);
        assert_eq!(cli.output.as_deref(), Some(std::path::Path::new("out.json")));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }

    #[test]
    fn requires_at_least_one_capture() {
        let err = Cli::try_parse_from(["p2plog"]).expect_err("no paths should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn rejects_unknown_format() {
        let err = Cli::try_parse_from(["p2plog", "a.dat", "--format", "xml"])
            .expect_err("bad format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
