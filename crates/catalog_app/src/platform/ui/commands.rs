use catalog_core::{CampaignType, Msg, PriceBracket};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  campaign free|prepaid|unset   choose the fibre campaign
  toggle <provider-code>        select or deselect a provider
  price any|low|mid|high        filter by R0-R699, R700-R999 or R1000+
  more                          load more providers
  show                          redraw the catalog
  help                          show this help
  quit                          exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid value for {command}: {value}")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

/// Parses one input line. Blank lines redraw the catalog.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Show);
    };
    let arg = words.next();

    match head.to_ascii_lowercase().as_str() {
        "campaign" => {
            let value = arg.ok_or(CommandError::MissingArgument("campaign"))?;
            let campaign = match value.to_ascii_lowercase().as_str() {
                "free" => CampaignType::Free,
                "prepaid" => CampaignType::Prepaid,
                "unset" | "all" => CampaignType::Unset,
                _ => {
                    return Err(CommandError::InvalidArgument {
                        command: "campaign",
                        value: value.to_string(),
                    })
                }
            };
            Ok(Command::Dispatch(Msg::CampaignSelected(campaign)))
        }
        "toggle" => {
            let code = arg.ok_or(CommandError::MissingArgument("toggle"))?;
            Ok(Command::Dispatch(Msg::ProviderToggled(code.to_string())))
        }
        "price" => {
            let value = arg.ok_or(CommandError::MissingArgument("price"))?;
            let bracket = match value.to_ascii_lowercase().as_str() {
                "any" | "none" => PriceBracket::Any,
                "low" => PriceBracket::Low,
                "mid" => PriceBracket::Mid,
                "high" => PriceBracket::High,
                _ => {
                    return Err(CommandError::InvalidArgument {
                        command: "price",
                        value: value.to_string(),
                    })
                }
            };
            Ok(Command::Dispatch(Msg::PriceBracketSelected(bracket)))
        }
        "more" => Ok(Command::Dispatch(Msg::LoadMoreClicked)),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
