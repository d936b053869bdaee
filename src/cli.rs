//! Command-line parsing.

use crate::error::CliError;
use crate::output::OutputFormat;
use sheetrow_core::{Criteria, Record};
use std::path::PathBuf;

pub(crate) fn print_usage() {
    eprintln!("Usage: sheetrow [OPTIONS] <COMMAND>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  sheets                    List the sheets of the workbook");
    eprintln!("  header                    Print the header of a sheet");
    eprintln!("  fetch                     Print the records of a sheet");
    eprintln!("  update                    Set --set values on rows matching --where");
    eprintln!("  insert                    Append a row built from --set values");
    eprintln!("  delete                    Delete rows matching --where");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -w, --workbook <DIR>      Directory holding one <title>.csv per sheet");
    eprintln!("  -s, --sheet <TITLE>       Sheet to work on");
    eprintln!("      --where <KEY=VALUE>   Match rows where KEY equals VALUE (can be repeated)");
    eprintln!("      --set <KEY=VALUE>     Value to write (can be repeated)");
    eprintln!("      --all                 Let delete remove every row");
    eprintln!("      --format <FORMAT>     Output format for fetch: markdown (default) or csv");
    eprintln!("  -o, --output <FILE>       Write fetch output to a file");
    eprintln!("  -c, --config <FILE>       Load settings from this TOML file");
    eprintln!("  -v, --verbose             Log store round-trips to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Sheets,
    Header,
    Fetch,
    Update,
    Insert,
    Delete,
}

impl Command {
    fn parse(name: &str) -> Result<Self, CliError> {
        match name {
            "sheets" => Ok(Command::Sheets),
            "header" => Ok(Command::Header),
            "fetch" => Ok(Command::Fetch),
            "update" => Ok(Command::Update),
            "insert" => Ok(Command::Insert),
            "delete" => Ok(Command::Delete),
            other => Err(CliError::UnknownCommand(other.to_string())),
        }
    }
}

/// A fully parsed command line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Invocation {
    pub command: Command,
    pub workbook: Option<PathBuf>,
    pub sheet: Option<String>,
    pub criteria: Criteria,
    pub values: Record,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Parsed {
    Help,
    Run(Invocation),
}

/// Parse the arguments after the program name.
pub(crate) fn parse_args(args: &[String]) -> Result<Parsed, CliError> {
    let mut command: Option<Command> = None;
    let mut workbook: Option<PathBuf> = None;
    let mut sheet: Option<String> = None;
    let mut criteria = Criteria::any();
    let mut values = Record::new();
    let mut all = false;
    let mut format: Option<OutputFormat> = None;
    let mut output: Option<PathBuf> = None;
    let mut config_file: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => return Ok(Parsed::Help),
            "-v" | "--verbose" => verbose = true,
            "--all" => all = true,
            "-w" | "--workbook" => workbook = Some(PathBuf::from(value_of(args, &mut i)?)),
            "-s" | "--sheet" => sheet = Some(value_of(args, &mut i)?.to_string()),
            "-o" | "--output" => output = Some(PathBuf::from(value_of(args, &mut i)?)),
            "-c" | "--config" => config_file = Some(PathBuf::from(value_of(args, &mut i)?)),
            "--format" => format = Some(value_of(args, &mut i)?.parse()?),
            "--where" => {
                let (key, value) = parse_assignment(value_of(args, &mut i)?)?;
                criteria = criteria.with(key, value);
            }
            "--set" => {
                let (key, value) = parse_assignment(value_of(args, &mut i)?)?;
                values.insert(key, value);
            }
            _ if arg.starts_with('-') => return Err(CliError::UnknownOption(arg.to_string())),
            _ if command.is_none() => command = Some(Command::parse(arg)?),
            _ => return Err(CliError::UnexpectedArgument(arg.to_string())),
        }
        i += 1;
    }

    let command = command.ok_or(CliError::MissingCommand)?;
    match command {
        Command::Update if values.is_empty() => {
            return Err(CliError::NothingToSet { command: "update" });
        }
        Command::Insert if values.is_empty() => {
            return Err(CliError::NothingToSet { command: "insert" });
        }
        Command::Delete if criteria.is_empty() && !all => return Err(CliError::UnboundedDelete),
        _ => {}
    }

    Ok(Parsed::Run(Invocation {
        command,
        workbook,
        sheet,
        criteria,
        values,
        format,
        output,
        config_file,
        verbose,
    }))
}

/// Step past the flag at `args[*i]` and return its value.
fn value_of<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, CliError> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue(flag.clone()))
}

/// Split `KEY=VALUE` at the first `=`. The value may be empty; the key may not.
pub(crate) fn parse_assignment(text: &str) -> Result<(String, String), CliError> {
    match text.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::InvalidAssignment(text.to_string())),
    }
}
