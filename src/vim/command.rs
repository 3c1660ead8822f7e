use std::path::PathBuf;
use thiserror::Error;

use crate::setup::{StorageMode, WizardMode};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Back,
    Reset,
    Mode(WizardMode),
    Storage(StorageMode),
    Template(String),
    Save(String),
    Load(String),
    Delete(String),
    Export(PathBuf),
    Import(PathBuf),
    Bootstrap,
    Write,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("Invalid argument for :{command}: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

fn required(command: &'static str, arg: Option<String>) -> Result<String, CommandError> {
    arg.filter(|a| !a.is_empty())
        .ok_or(CommandError::MissingArgument(command))
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().map(|s| s.trim().to_string());

    match cmd {
        "next" | "n" => Ok(Command::Next),
        "back" | "b" | "prev" => Ok(Command::Back),
        "reset" => Ok(Command::Reset),
        "mode" => {
            let value = required("mode", arg)?;
            WizardMode::parse(&value)
                .map(Command::Mode)
                .ok_or(CommandError::InvalidArgument {
                    command: "mode",
                    value,
                })
        }
        "storage" => {
            let value = required("storage", arg)?;
            StorageMode::parse(&value)
                .map(Command::Storage)
                .ok_or(CommandError::InvalidArgument {
                    command: "storage",
                    value,
                })
        }
        "template" | "t" => required("template", arg).map(Command::Template),
        "save" => required("save", arg).map(Command::Save),
        "load" => required("load", arg).map(Command::Load),
        "delete" | "del" => required("delete", arg).map(Command::Delete),
        "export" => required("export", arg).map(|p| Command::Export(PathBuf::from(p))),
        "import" => required("import", arg).map(|p| Command::Import(PathBuf::from(p))),
        "bootstrap" => Ok(Command::Bootstrap),
        "write" | "w" => Ok(Command::Write),
        "help" | "h" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "" => Err(CommandError::Unknown("empty command".to_string())),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
