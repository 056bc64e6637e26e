//! Command-line argument parsing.
//!
//! Usage:
//!
//! ```text
//! spellkit [--config <path>] worksheet --grade <g> --categories <id,id,..>
//!          [--title <text>] [--size <n>] [--story]
//! spellkit [--config <path>] hint --target <word> --attempt <word>
//!          --category <id> --grade <g>
//! spellkit [--config <path>] status
//! spellkit [--config <path>] reset
//! ```

use spellkit_core::{CategoryId, GradeLevel};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Worksheet {
        grade: GradeLevel,
        categories: Vec<CategoryId>,
        title: Option<String>,
        size: Option<usize>,
        story: bool,
    },
    Hint {
        target: String,
        attempt: String,
        category: CategoryId,
        grade: GradeLevel,
    },
    Status,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("No command given (expected worksheet, hint, status or reset)")]
    MissingCommand,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Unknown option for {command}: {option}")]
    UnknownOption { command: &'static str, option: String },
    #[error("Option {0} needs a value")]
    MissingValue(String),
    #[error("Missing required option {0}")]
    MissingOption(&'static str),
    #[error("Invalid value for {option}: {value}")]
    InvalidValue { option: &'static str, value: String },
}

impl Invocation {
    pub fn from_env() -> Result<Self, ArgsError> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let mut config_path = None;

        let name = loop {
            match args.next() {
                Some(arg) if arg == "--config" => {
                    let value = args.next().ok_or_else(|| ArgsError::MissingValue(arg))?;
                    config_path = Some(PathBuf::from(value));
                }
                Some(arg) => break arg,
                None => return Err(ArgsError::MissingCommand),
            }
        };

        let rest: Vec<String> = args.collect();
        let command = match name.as_str() {
            "worksheet" => parse_worksheet(rest)?,
            "hint" => parse_hint(rest)?,
            "status" => {
                reject_options("status", &rest)?;
                Command::Status
            }
            "reset" => {
                reject_options("reset", &rest)?;
                Command::Reset
            }
            _ => return Err(ArgsError::UnknownCommand(name)),
        };

        Ok(Self {
            config_path,
            command,
        })
    }
}

fn parse_worksheet(args: Vec<String>) -> Result<Command, ArgsError> {
    let mut grade = None;
    let mut categories = None;
    let mut title = None;
    let mut size = None;
    let mut story = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--grade" => grade = Some(parse_grade(&value(&mut args, &arg)?)?),
            "--categories" => categories = Some(parse_categories(&value(&mut args, &arg)?)?),
            "--title" => title = Some(value(&mut args, &arg)?),
            "--size" => {
                let raw = value(&mut args, &arg)?;
                size = Some(raw.parse().map_err(|_| ArgsError::InvalidValue {
                    option: "--size",
                    value: raw,
                })?);
            }
            "--story" => story = true,
            _ => {
                return Err(ArgsError::UnknownOption {
                    command: "worksheet",
                    option: arg,
                })
            }
        }
    }

    Ok(Command::Worksheet {
        grade: grade.ok_or(ArgsError::MissingOption("--grade"))?,
        categories: categories.ok_or(ArgsError::MissingOption("--categories"))?,
        title,
        size,
        story,
    })
}

fn parse_hint(args: Vec<String>) -> Result<Command, ArgsError> {
    let mut target = None;
    let mut attempt = None;
    let mut category = None;
    let mut grade = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--target" => target = Some(value(&mut args, &arg)?),
            "--attempt" => attempt = Some(value(&mut args, &arg)?),
            "--category" => {
                let raw = value(&mut args, &arg)?;
                category = Some(raw.trim().parse().map_err(|_| ArgsError::InvalidValue {
                    option: "--category",
                    value: raw,
                })?);
            }
            "--grade" => grade = Some(parse_grade(&value(&mut args, &arg)?)?),
            _ => {
                return Err(ArgsError::UnknownOption {
                    command: "hint",
                    option: arg,
                })
            }
        }
    }

    Ok(Command::Hint {
        target: target.ok_or(ArgsError::MissingOption("--target"))?,
        attempt: attempt.ok_or(ArgsError::MissingOption("--attempt"))?,
        category: category.ok_or(ArgsError::MissingOption("--category"))?,
        grade: grade.ok_or(ArgsError::MissingOption("--grade"))?,
    })
}

fn reject_options(command: &'static str, rest: &[String]) -> Result<(), ArgsError> {
    match rest.first() {
        Some(option) => Err(ArgsError::UnknownOption {
            command,
            option: option.clone(),
        }),
        None => Ok(()),
    }
}

fn value(args: &mut impl Iterator<Item = String>, option: &str) -> Result<String, ArgsError> {
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(option.to_string()))
}

fn parse_grade(raw: &str) -> Result<GradeLevel, ArgsError> {
    GradeLevel::from_db_str(raw).map_err(|_| ArgsError::InvalidValue {
        option: "--grade",
        value: raw.to_string(),
    })
}

fn parse_categories(raw: &str) -> Result<Vec<CategoryId>, ArgsError> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim().parse().map_err(|_| ArgsError::InvalidValue {
                option: "--categories",
                value: raw.to_string(),
            })
        })
        .collect()
}
