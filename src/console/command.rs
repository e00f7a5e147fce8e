//! Console commands
//!
//! One command per input line, whitespace separated.

use crate::access::{Feature, Role};
use crate::error::{AccessError, CommandError};
use crate::util::SecretString;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  login <email> <password>   sign in with a password
  token <access-token>       sign in with an existing access token
  logout                     sign out
  whoami                     show session state and active tab
  nav                        show the navigation menu
  open <feature>             switch the active tab
  matrix                     show the permission editor
  toggle <role> <feature>    enable/disable a feature for a role
  help                       show this help
  quit                       leave the console";

#[derive(Debug, Clone)]
pub enum Command {
    Login {
        email: String,
        password: SecretString,
    },
    Token(SecretString),
    Logout,
    WhoAmI,
    Nav,
    Open(Feature),
    Matrix,
    Toggle {
        role: Role,
        feature: Feature,
    },
    Help,
    Quit,
}

fn parse_role(s: &str) -> Result<Role, CommandError> {
    Role::try_parse(s).ok_or_else(|| AccessError::unknown_role(s).into())
}

fn parse_feature(s: &str) -> Result<Feature, CommandError> {
    Feature::try_parse(&s.to_ascii_lowercase()).ok_or_else(|| AccessError::invalid_feature(s).into())
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Err(CommandError::Usage(HELP));
        };

        match (name.to_ascii_lowercase().as_str(), args) {
            ("login", [email, password]) => Ok(Command::Login {
                email: email.to_string(),
                password: SecretString::new(*password),
            }),
            ("login", _) => Err(CommandError::Usage("login <email> <password>")),
            ("token", [token]) => Ok(Command::Token(SecretString::new(*token))),
            ("token", _) => Err(CommandError::Usage("token <access-token>")),
            ("logout", []) => Ok(Command::Logout),
            ("whoami", []) => Ok(Command::WhoAmI),
            ("nav", []) => Ok(Command::Nav),
            ("open", [feature]) => Ok(Command::Open(parse_feature(feature)?)),
            ("open", _) => Err(CommandError::Usage("open <feature>")),
            ("matrix", []) => Ok(Command::Matrix),
            ("toggle", [role, feature]) => Ok(Command::Toggle {
                role: parse_role(role)?,
                feature: parse_feature(feature)?,
            }),
            ("toggle", _) => Err(CommandError::Usage("toggle <role> <feature>")),
            ("help" | "?", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
