use std::fmt;
use std::path::PathBuf;

use aid_core::model::{Difficulty, Theme, Topic};
use services::SessionMode;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidTopic { raw: String },
    InvalidDifficulty { raw: String },
    InvalidTheme { raw: String },
    InvalidDbUrl { raw: String },
    ConflictingModes,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidTopic { raw } => write!(f, "unknown topic: {raw}"),
            ArgsError::InvalidDifficulty { raw } => write!(f, "unknown difficulty: {raw}"),
            ArgsError::InvalidTheme { raw } => write!(f, "unknown theme: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::ConflictingModes => {
                write!(f, "choose only one of --topic, --general, --weak")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quiz(SessionMode),
    Stats,
    Import(PathBuf),
    Generate { topic: Topic, difficulty: Difficulty },
    Ask(String),
    SetKey(String),
    Theme(Theme),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub db_url: Option<String>,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [--db <sqlite_url>] quiz [--topic <KEY> | --general | --weak]");
    eprintln!("  app [--db <sqlite_url>] stats");
    eprintln!("  app [--db <sqlite_url>] import <file>");
    eprintln!("  app [--db <sqlite_url>] generate <TOPIC> [--difficulty easy|medium|hard]");
    eprintln!("  app [--db <sqlite_url>] ask <message>");
    eprintln!("  app [--db <sqlite_url>] set-key <api_key>");
    eprintln!("  app [--db <sqlite_url>] theme <light|dark|system>");
    eprintln!();
    eprintln!("Topics:");
    let keys: Vec<&str> = Topic::ALL.iter().map(|t| t.key()).collect();
    eprintln!("  {}", keys.join(", "));
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FIRSTAID_DB_URL, FIRSTAID_AI_API_KEY, FIRSTAID_AI_BASE_URL, FIRSTAID_AI_MODEL, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_arg(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    args.next()
        .ok_or(ArgsError::MissingArgument { command, name })
}

fn parse_topic(raw: String) -> Result<Topic, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidTopic { raw })
}

/// Parse arguments after the program name. No command means a general quiz.
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Cli, ArgsError> {
    let mut args = args.into_iter().peekable();
    let mut db_url = None;

    while let Some(arg) = args.next_if(|a| a.starts_with('-')) {
        match arg.as_str() {
            "--db" => {
                let value = require_value(&mut args, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                db_url = Some(value);
            }
            "--help" | "-h" => {
                return Ok(Cli {
                    db_url,
                    command: Command::Help,
                });
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    let command = match args.next() {
        None => Command::Quiz(SessionMode::General),
        Some(cmd) => match cmd.as_str() {
            "quiz" => Command::Quiz(parse_quiz(&mut args)?),
            "stats" => Command::Stats,
            "import" => Command::Import(PathBuf::from(require_arg(&mut args, "import", "file")?)),
            "generate" => parse_generate(&mut args)?,
            "ask" => Command::Ask(args.by_ref().collect::<Vec<_>>().join(" ")),
            "set-key" => Command::SetKey(require_arg(&mut args, "set-key", "api_key")?),
            "theme" => {
                let raw = require_arg(&mut args, "theme", "theme")?;
                Command::Theme(raw.parse().map_err(|_| ArgsError::InvalidTheme { raw })?)
            }
            "help" => Command::Help,
            _ => return Err(ArgsError::UnknownCommand(cmd)),
        },
    };

    if let Some(extra) = args.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(Cli { db_url, command })
}

fn parse_quiz(args: &mut impl Iterator<Item = String>) -> Result<SessionMode, ArgsError> {
    let mut mode = None;
    while let Some(arg) = args.next() {
        let next = match arg.as_str() {
            "--topic" => SessionMode::ByTopic(parse_topic(require_value(args, "--topic")?)?),
            "--general" => SessionMode::General,
            "--weak" => SessionMode::Weakness,
            _ => return Err(ArgsError::UnknownArg(arg)),
        };
        if mode.replace(next).is_some() {
            return Err(ArgsError::ConflictingModes);
        }
    }
    Ok(mode.unwrap_or(SessionMode::General))
}

fn parse_generate(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let topic = parse_topic(require_arg(args, "generate", "TOPIC")?)?;
    let mut difficulty = Difficulty::Hard;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--difficulty" => {
                let raw = require_value(args, "--difficulty")?;
                difficulty = raw
                    .parse()
                    .map_err(|_| ArgsError::InvalidDifficulty { raw })?;
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Command::Generate { topic, difficulty })
}
