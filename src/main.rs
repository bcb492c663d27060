//! enigma - rotor cipher machine simulator
//! Command-line interface: reads a machine configuration and converts the
//! messages of an input transcript.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use enigma::{MachineConfig, Session};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "enigma")]
#[command(version)]
#[command(about = "Rotor cipher machine simulator", long_about = None)]
struct Cli {
    /// Machine configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Input transcript (settings lines and messages); defaults to stdin
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file; defaults to stdout
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("Error: {}", usage_error(&e));
            std::process::exit(1);
        }
    };
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Renders a command-line parse error without clap's own `error:` prefix.
fn usage_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    rendered
        .trim_start_matches("error: ")
        .trim_end()
        .to_string()
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "enigma=warn",
        1 => "enigma=info",
        2 => "enigma=debug",
        _ => "enigma=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let machine = config.build_machine()?;
    info!(
        config = %cli.config.display(),
        slots = config.num_rotors(),
        pawls = config.pawls(),
        "machine ready"
    );

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("could not open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("could not open {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    process(Session::new(machine), input, BufWriter::new(output))
}

fn load_config(path: &Path) -> Result<MachineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    MachineConfig::parse(&text).with_context(|| format!("invalid configuration {}", path.display()))
}

fn process<R: BufRead, W: Write>(mut session: Session, input: R, mut output: W) -> Result<()> {
    for (number, line) in input.lines().enumerate() {
        let line = line.context("could not read input")?;
        let line = line.trim_end_matches('\r');
        let converted = session
            .process_line(line)
            .with_context(|| format!("input line {}", number + 1))?;
        if let Some(converted) = converted {
            writeln!(output, "{}", converted)?;
        }
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enigma::EnigmaError;

    const CONFIG: &str = "\
ABCDEFGHIJKLMNOPQRSTUVWXYZ
4 3
B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
";

    fn session() -> Session {
        Session::new(MachineConfig::parse(CONFIG).unwrap().build_machine().unwrap())
    }

    #[test]
    fn test_cli_accepts_one_to_three_paths() {
        let cli = Cli::try_parse_from(["enigma", "m.conf"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("m.conf"));
        assert!(cli.input.is_none() && cli.output.is_none());

        let cli = Cli::try_parse_from(["enigma", "-vv", "m.conf", "in", "out"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("in")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_wrong_argument_count() {
        let err = Cli::try_parse_from(["enigma", "m.conf", "a", "b", "c"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(!usage_error(&err).starts_with("error:"));

        let err = Cli::try_parse_from(["enigma"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_help_is_not_a_usage_error() {
        let err = Cli::try_parse_from(["enigma", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_process_writes_converted_lines() {
        let input = "* B I II III AAA\r\naaaaa\r\n\r\nAAAAA\n";
        let mut out = Vec::new();
        process(session(), input.as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "BDZGO\n\nWCXLT\n");
    }

    #[test]
    fn test_process_reports_input_line() {
        let input = "* B I II III AAA\nAAAAA\n* B I I III AAA\n";
        let mut out = Vec::new();
        let err = process(session(), input.as_bytes(), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "input line 3");
        assert_eq!(
            err.downcast_ref::<EnigmaError>(),
            Some(&EnigmaError::DuplicateRotor("I".to_string()))
        );
    }
}
