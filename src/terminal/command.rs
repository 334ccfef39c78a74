use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::{reminder::ReminderId, selection::PickerResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Schedule(String),
    Task(String),
    Date(PickerResult<NaiveDate>),
    Time(PickerResult<NaiveTime>),
    Add,
    List,
    Delete(ReminderId),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command \"{0}\". Type help to see the supported commands.")]
    Unknown(String),

    #[error("Could not parse date \"{0}\". Please use the format 2025-05-31 or cancel.")]
    InvalidDate(String),

    #[error("Could not parse time \"{0}\". Please use the format 13:00 or cancel.")]
    InvalidTime(String),

    #[error("Could not parse reminder id \"{0}\".")]
    InvalidId(String),
}

pub const HELP: &str = "\
These commands are supported:
  schedule <text>         set the class schedule
  task <text>             set the assignment
  date <YYYY-MM-DD>|cancel  pick the deadline date
  time <HH:MM>|cancel       pick the deadline time
  add                     add the reminder to the list
  list                    show all reminders
  delete <id>             remove a reminder
  help                    show this message
  quit                    exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (line, ""),
        };

        match name.to_lowercase().as_str() {
            "schedule" => Ok(Command::Schedule(argument.to_owned())),
            "task" => Ok(Command::Task(argument.to_owned())),
            "date" => parse_picker(argument, |text| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
            })
            .map(Command::Date)
            .ok_or_else(|| CommandError::InvalidDate(argument.to_owned())),
            "time" => parse_picker(argument, |text| {
                NaiveTime::parse_from_str(text, "%H:%M").ok()
            })
            .map(Command::Time)
            .ok_or_else(|| CommandError::InvalidTime(argument.to_owned())),
            "add" => Ok(Command::Add),
            "list" => Ok(Command::List),
            "delete" => argument
                .parse()
                .map(Command::Delete)
                .map_err(|_| CommandError::InvalidId(argument.to_owned())),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name.to_owned())),
        }
    }
}

fn parse_picker<T>(
    argument: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<PickerResult<T>> {
    if argument.eq_ignore_ascii_case("cancel") {
        return Some(PickerResult::Dismissed);
    }

    parse(argument).map(PickerResult::Selected)
}
