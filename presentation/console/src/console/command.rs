use std::str::FromStr;

use business::application::product::form::FieldName;
use business::application::product::list::PageSize;
use business::domain::shared::value_objects::ProductId;

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    List,
    Reload,
    /// An empty term clears the filter.
    Search(String),
    Page(usize),
    Next,
    Previous,
    Size(PageSize),
    Delete(ProductId),
    Confirm,
    Cancel,
    New,
    Edit(ProductId),
    Set(FieldName, String),
    Submit,
    Restart,
    Back,
    Seed(usize),
    Toasts,
    Dismiss(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument { command: &'static str, value: String },
}

pub const HELP: &str = "\
list | reload                 show / refetch products
search [term]                 filter by name (empty clears)
page <n> | next | prev        move between pages
size <5|10|20>                rows per page
delete <id> | confirm | cancel
new | edit <id>               open the product form
set <field> <value>           field: id, name, description, logo, release
submit | restart | back       form actions
seed [n]                      create n random products (default 10)
toasts | dismiss <id>
help | quit";

fn field_name(value: &str) -> Option<FieldName> {
    match value {
        "id" => Some(FieldName::Id),
        "name" => Some(FieldName::Name),
        "description" => Some(FieldName::Description),
        "logo" => Some(FieldName::Logo),
        "release" | "date_release" => Some(FieldName::DateRelease),
        _ => None,
    }
}

fn required<'a>(
    argument: Option<&'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    argument
        .filter(|argument| !argument.is_empty())
        .ok_or(CommandError::MissingArgument { command, expected })
}

fn number<T: FromStr>(value: &str, command: &'static str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (line, None),
        };

        match name {
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "list" | "ls" => Ok(Command::List),
            "reload" => Ok(Command::Reload),
            "search" => Ok(Command::Search(rest.unwrap_or_default().to_string())),
            "page" => {
                let page = required(rest, "page", "a page number")?;
                Ok(Command::Page(number(page, "page")?))
            }
            "next" => Ok(Command::Next),
            "prev" | "previous" => Ok(Command::Previous),
            "size" => {
                let rows = required(rest, "size", "5, 10 or 20")?;
                PageSize::try_from(number::<usize>(rows, "size")?)
                    .map(Command::Size)
                    .map_err(|_| CommandError::InvalidArgument {
                        command: "size",
                        value: rows.to_string(),
                    })
            }
            "delete" | "rm" => {
                let id = required(rest, "delete", "a product id")?;
                Ok(Command::Delete(ProductId::new(id)))
            }
            "confirm" => Ok(Command::Confirm),
            "cancel" => Ok(Command::Cancel),
            "new" => Ok(Command::New),
            "edit" => {
                let id = required(rest, "edit", "a product id")?;
                Ok(Command::Edit(ProductId::new(id)))
            }
            "set" => {
                let rest = required(rest, "set", "a field and a value")?;
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field = field_name(field).ok_or_else(|| CommandError::InvalidArgument {
                    command: "set",
                    value: field.to_string(),
                })?;
                Ok(Command::Set(field, value.trim().to_string()))
            }
            "submit" | "save" => Ok(Command::Submit),
            "restart" | "reset" => Ok(Command::Restart),
            "back" => Ok(Command::Back),
            "seed" => match rest.filter(|rest| !rest.is_empty()) {
                Some(count) => Ok(Command::Seed(number(count, "seed")?)),
                None => Ok(Command::Seed(10)),
            },
            "toasts" => Ok(Command::Toasts),
            "dismiss" => {
                let id = required(rest, "dismiss", "a toast id")?;
                Ok(Command::Dismiss(number(id, "dismiss")?))
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_list_navigation() {
        assert_eq!("list".parse::<Command>(), Ok(Command::List));
        assert_eq!(" page 3 ".parse::<Command>(), Ok(Command::Page(3)));
        assert_eq!("size 10".parse::<Command>(), Ok(Command::Size(PageSize::Ten)));
        assert_eq!("prev".parse::<Command>(), Ok(Command::Previous));
    }

    #[test]
    fn should_keep_search_term_with_spaces() {
        assert_eq!(
            "search credit card".parse::<Command>(),
            Ok(Command::Search("credit card".to_string()))
        );
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
    }

    #[test]
    fn should_parse_field_assignment_with_spaces_in_value() {
        assert_eq!(
            "set name Tarjeta de credito".parse::<Command>(),
            Ok(Command::Set(FieldName::Name, "Tarjeta de credito".to_string()))
        );
        assert_eq!(
            "set release 16/08/2025".parse::<Command>(),
            Ok(Command::Set(FieldName::DateRelease, "16/08/2025".to_string()))
        );
        assert_eq!("set id".parse::<Command>(), Ok(Command::Set(FieldName::Id, String::new())));
    }

    #[test]
    fn should_default_seed_count() {
        assert_eq!("seed".parse::<Command>(), Ok(Command::Seed(10)));
        assert_eq!("seed 3".parse::<Command>(), Ok(Command::Seed(3)));
    }

    #[test]
    fn should_reject_bad_input() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "fly".parse::<Command>(),
            Err(CommandError::Unknown("fly".to_string()))
        );
        assert_eq!(
            "size 7".parse::<Command>(),
            Err(CommandError::InvalidArgument {
                command: "size",
                value: "7".to_string()
            })
        );
        assert!(matches!(
            "edit".parse::<Command>(),
            Err(CommandError::MissingArgument { command: "edit", .. })
        ));
        assert!(matches!(
            "set revision 2025-01-01".parse::<Command>(),
            Err(CommandError::InvalidArgument { command: "set", .. })
        ));
    }
}
