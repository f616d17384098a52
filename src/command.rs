//! Line commands typed at the prompt.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick a team on a match
    Select { match_id: i64, team_id: i64 },
    /// Enter a stake (typed, then field left)
    Amount(String),
    /// Preset stake button, 1-based
    Quick(usize),
    Place,
    Reset,
    Cancel(i64),
    Balance,
    Details(i64),
    Search(String),
    Login {
        email: String,
        password: String,
        remember_me: bool,
    },
    Register {
        email: String,
        username: String,
        password: String,
        confirm_password: String,
        full_name: String,
    },
    Deposit {
        amount: Decimal,
        description: Option<String>,
    },
    Withdraw {
        amount: Decimal,
        description: Option<String>,
    },
    Dismiss(usize),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
select <match> <team>      pick a team
amount <stake>             enter a stake
quick <n>                  use preset stake n
place                      place the bet
reset                      clear the bet form
cancel <bet>               cancel a pending bet
balance                    refresh balance
details <match>            refresh one match
search [text]              list matches (filtered)
login <email> <password> [remember]
register <email> <username> <password> <confirm> <full name>
deposit <amount> [note]    add funds
withdraw <amount> [note]   withdraw funds
dismiss <n>                close advisory n
status                     show the bet form
quit";

fn id<T: FromStr>(arg: Option<&str>, usage: &'static str) -> Result<T, CommandError> {
    arg.and_then(|s| s.parse().ok())
        .ok_or(CommandError::Usage(usage))
}

fn rest(args: &[&str]) -> Option<String> {
    let joined = args.join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (head, args) = words.split_first().ok_or(CommandError::Empty)?;

        match head.to_ascii_lowercase().as_str() {
            "select" => Ok(Command::Select {
                match_id: id(args.first().copied(), "select <match> <team>")?,
                team_id: id(args.get(1).copied(), "select <match> <team>")?,
            }),
            "amount" => Ok(Command::Amount(args.join(" "))),
            "quick" => Ok(Command::Quick(id(args.first().copied(), "quick <n>")?)),
            "place" => Ok(Command::Place),
            "reset" => Ok(Command::Reset),
            "cancel" => Ok(Command::Cancel(id(args.first().copied(), "cancel <bet>")?)),
            "balance" => Ok(Command::Balance),
            "details" => Ok(Command::Details(id(args.first().copied(), "details <match>")?)),
            "search" | "matches" => Ok(Command::Search(args.join(" "))),
            "login" => match args {
                [email, password] | [email, password, _] => Ok(Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                    remember_me: args.len() == 3,
                }),
                _ => Err(CommandError::Usage("login <email> <password> [remember]")),
            },
            "register" => match args {
                [email, username, password, confirm, name @ ..] if !name.is_empty() => {
                    Ok(Command::Register {
                        email: email.to_string(),
                        username: username.to_string(),
                        password: password.to_string(),
                        confirm_password: confirm.to_string(),
                        full_name: name.join(" "),
                    })
                }
                _ => Err(CommandError::Usage(
                    "register <email> <username> <password> <confirm> <full name>",
                )),
            },
            "deposit" => Ok(Command::Deposit {
                amount: id(args.first().copied(), "deposit <amount> [note]")?,
                description: rest(args.get(1..).unwrap_or(&[])),
            }),
            "withdraw" => Ok(Command::Withdraw {
                amount: id(args.first().copied(), "withdraw <amount> [note]")?,
                description: rest(args.get(1..).unwrap_or(&[])),
            }),
            "dismiss" => Ok(Command::Dismiss(id(args.first().copied(), "dismiss <n>")?)),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
